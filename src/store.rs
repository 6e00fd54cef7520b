//! Record storage on both sides of the wire.
//!
//! - [`DocumentStore`]: backend persistence, holding the seed documents verbatim.
//! - [`DataStore`]: the session's read-only record collection, loaded once and
//!   shared by every chart.

use crate::error::{DashError, Result};
use crate::filter::{FacetOptions, facet_options};
use crate::models::Record;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Backend persistence for the record documents.
pub trait DocumentStore: Send + Sync {
    /// Every stored document, as loaded.
    fn find_all(&self) -> Result<Vec<Value>>;
}

/// In-memory mirror of a static seed file.
#[derive(Debug, Clone, Default)]
pub struct SeedStore {
    docs: Arc<Vec<Value>>,
}

impl SeedStore {
    pub fn new(docs: Vec<Value>) -> Self {
        Self {
            docs: Arc::new(docs),
        }
    }

    /// Mirror the documents of a seed file.
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let docs = crate::storage::load_seed(path)
            .map_err(|e| DashError::Store(format!("{:#}", e)))?;
        log::info!("mirrored {} documents from {}", docs.len(), path.display());
        Ok(Self::new(docs))
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl DocumentStore for SeedStore {
    fn find_all(&self) -> Result<Vec<Value>> {
        Ok(self.docs.as_ref().clone())
    }
}

/// Decode documents into records. Documents that are not JSON objects are
/// skipped with a warning; malformed fields inside an object never fail.
pub fn decode_records(docs: Vec<Value>) -> Vec<Record> {
    let total = docs.len();
    let records: Vec<Record> = docs
        .into_iter()
        .filter_map(|d| match serde_json::from_value::<Record>(d) {
            Ok(r) => Some(r),
            Err(e) => {
                log::warn!("skipping undecodable document: {}", e);
                None
            }
        })
        .collect();
    if records.len() != total {
        log::warn!("decoded {} of {} documents", records.len(), total);
    }
    records
}

/// The session's record collection. Cloning shares the same records.
#[derive(Debug, Clone)]
pub struct DataStore {
    records: Arc<[Record]>,
    facets: Arc<[FacetOptions]>,
}

impl DataStore {
    /// Take ownership of a loaded record set and derive the facet options once.
    pub fn new(records: Vec<Record>) -> Self {
        let facets = facet_options(&records);
        Self {
            records: records.into(),
            facets: facets.into(),
        }
    }

    pub fn from_documents(docs: Vec<Value>) -> Self {
        Self::new(decode_records(docs))
    }

    /// Load a seed file directly, bypassing the backend.
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let docs = SeedStore::from_seed_file(path)?.find_all()?;
        Ok(Self::from_documents(docs))
    }

    /// Fetch the record set from a running backend.
    pub fn fetch(client: &crate::api::Client) -> Result<Self> {
        Ok(Self::new(client.fetch_records()?))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn shared(&self) -> Arc<[Record]> {
        Arc::clone(&self.records)
    }

    pub fn facets(&self) -> &[FacetOptions] {
        &self.facets
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
