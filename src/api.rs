//! Synchronous client for the dashboard backend.
//!
//! The backend exposes a single read-only route, `GET /api/data`, returning the whole
//! record collection as a JSON array. There are no query parameters and no pagination.
//!
//! ### Notes
//! - Transient failures (5xx / network errors) are retried with a short backoff.
//! - Any other non-2xx status is surfaced as [`DashError::Status`], carrying the
//!   server's `message` when the body has one.
//!
//! Typical usage:
//! ```no_run
//! # use insight_dash::Client;
//! let client = Client::new("http://localhost:5000");
//! let records = client.fetch_records()?;
//! # Ok::<(), insight_dash::DashError>(())
//! ```

use crate::error::{DashError, Result};
use crate::models::Record;
use crate::store::decode_records;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

/// Route serving the record collection.
pub const DATA_ROUTE: &str = "/api/data";

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::new("http://localhost:5000")
    }
}

/// Shared HTTP client settings for the backend and the boundary dataset.
pub(crate) fn http_client() -> HttpClient {
    HttpClient::builder()
        .timeout(Duration::from_secs(30)) // total request timeout
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(5))
        .user_agent(concat!("insight-dash/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("falling back to default http client: {}", e);
            HttpClient::new()
        })
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: http_client(),
        }
    }

    /// URL of the record route on this backend.
    pub fn data_url(&self) -> String {
        format!("{}{}", self.base_url, DATA_ROUTE)
    }

    /// Fetch the full record collection.
    ///
    /// ### Errors
    /// - Network/HTTP error (after retries for transient failures)
    /// - A body that is not a JSON array
    pub fn fetch_records(&self) -> Result<Vec<Record>> {
        let url = self.data_url();
        let v = get_json(&self.http, &url)?;
        let docs = match v {
            Value::Array(docs) => docs,
            _ => return Err(DashError::decode("record payload", "expected a JSON array")),
        };
        let records = decode_records(docs);
        log::info!("fetched {} records from {}", records.len(), url);
        Ok(records)
    }
}

/// Waits before each retry of a transient failure.
const RETRY_BACKOFF_MS: [u64; 3] = [100, 300, 700];

/// GET a JSON document, retrying 5xx responses and transport errors.
///
/// One initial attempt plus one retry per [`RETRY_BACKOFF_MS`] entry; the last
/// failure is returned without a trailing wait.
pub(crate) fn get_json(http: &HttpClient, url: &str) -> Result<Value> {
    let mut retries = RETRY_BACKOFF_MS.iter();
    loop {
        let err = match http.get(url).send() {
            Ok(r) if r.status().is_success() => {
                return r.json().map_err(|e| DashError::decode("json response", e));
            }
            Ok(r) => {
                let err = status_error(url, r);
                if !matches!(err, DashError::Status { status, .. } if status >= 500) {
                    return Err(err);
                }
                err
            }
            Err(e) => DashError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            },
        };
        match retries.next() {
            Some(&backoff_ms) => {
                log::warn!("GET {} failed ({}), retrying in {} ms", url, err, backoff_ms);
                std::thread::sleep(Duration::from_millis(backoff_ms));
            }
            None => return Err(err),
        }
    }
}

fn status_error(url: &str, r: reqwest::blocking::Response) -> DashError {
    let status = r.status().as_u16();
    let message = r
        .json::<Value>()
        .ok()
        .and_then(|b| b.get("message").and_then(Value::as_str).map(str::to_string));
    DashError::Status {
        url: url.to_string(),
        status,
        message,
    }
}
