//! insight_dash
//!
//! An analytics dashboard over a static collection of insight records: a small
//! read-only HTTP backend, a filtering and aggregation engine, and three charts
//! (ranked bars, yearly lines, and a world choropleth) rendered to SVG or PNG.
//!
//! ### Features
//! - Serve the record documents at `GET /api/data`
//! - Facet filters (topic, sector, region, country, source) and a year range
//! - Group/reduce/rank aggregation with fixed per-view axis bounds
//! - Threshold color scales, tooltips, and hover highlighting
//! - Export aggregate tables as CSV or JSON
//!
//! ### Example
//! ```no_run
//! use insight_dash::{Dashboard, DataStore, Dimensions, geo::RemoteBoundaries};
//! use insight_dash::config::ImageFormat;
//!
//! let store = DataStore::from_seed_file("jsondata.json")?;
//! let mut dash = Dashboard::new(store, Box::new(RemoteBoundaries::default()));
//! dash.resize_all(Dimensions::new(1000.0, 500.0));
//! dash.render_all("charts", ImageFormat::Svg)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod geo;
pub mod models;
pub mod scale;
pub mod server;
pub mod storage;
pub mod store;
pub mod surface;
pub mod viz;

pub use api::Client;
pub use dashboard::{ChartKind, Dashboard};
pub use error::DashError;
pub use filter::{Facet, FilterEvent, FilterPanel, FilterSet};
pub use models::{AggregateFn, AggregateRow, Dimension, Dimensions, Measure, Record, ViewState};
pub use store::{DataStore, DocumentStore, SeedStore};
