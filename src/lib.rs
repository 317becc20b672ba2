//! Sales dashboard SDK for Rust.
//!
//! Fetches sale records from the sales API, loads them into an in-process
//! DuckDB database, and exposes filters, grouped aggregates, CSV export and
//! ready-to-render page view-models (metrics plus plotly chart specs).
//!
//! # Quick start
//!
//! ```no_run
//! use sales_dashboard::{Metric, Region, RemoteQuery, SalesDashboard, SalesFilter};
//!
//! let dash = SalesDashboard::builder().build().unwrap();
//!
//! // One fetch, filtered server-side by region and year
//! let data = dash.fetch(&RemoteQuery::new(Region::Sudeste, Some(2022))).unwrap();
//!
//! // Revenue per state for two sellers
//! let filter = SalesFilter {
//!     sellers: vec!["Ana Duarte".into(), "Thiago Silva".into()],
//!     ..Default::default()
//! };
//! let states = data.aggregates().by_state(&filter, Metric::Revenue).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod connection;
pub mod dataset;
pub mod error;
pub mod export;
pub mod models;
pub mod presentation;
pub mod queries;
pub mod source;
pub mod sql_builder;

#[cfg(feature = "async")]
pub use async_client::AsyncSalesDashboard;
pub use cache::CsvCache;
pub use connection::Connection;
pub use dataset::Dataset;
pub use error::{DashboardError, Result};
pub use models::{Column, Metric, Range, Region, RemoteQuery, SaleRecord, SalesFilter};
pub use presentation::{DashboardPage, RawTablePage};
pub use source::DataSource;
pub use sql_builder::SqlBuilder;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

// ---------------------------------------------------------------------------
// SalesDashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`SalesDashboard`] instance.
///
/// Use [`SalesDashboard::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](SalesDashboardBuilder::build) to create it.
pub struct SalesDashboardBuilder {
    base_url: Option<String>,
    timeout: Duration,
    csv_cache_capacity: usize,
}

impl Default for SalesDashboardBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            csv_cache_capacity: config::DEFAULT_CSV_CACHE_CAPACITY,
        }
    }
}

impl SalesDashboardBuilder {
    /// Point the dashboard at another sales endpoint.
    ///
    /// Defaults to [`config::API_URL`].
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of CSV encodings kept in memory. Defaults to 16.
    pub fn csv_cache_capacity(mut self, capacity: usize) -> Self {
        self.csv_cache_capacity = capacity;
        self
    }

    /// Build the dashboard and its HTTP client. No request is made until the
    /// first fetch.
    pub fn build(self) -> Result<SalesDashboard> {
        if let Some(url) = &self.base_url {
            if url.trim().is_empty() {
                return Err(DashboardError::InvalidArgument("empty base URL".into()));
            }
        }
        Ok(SalesDashboard {
            source: DataSource::new(self.base_url, self.timeout)?,
            csv_cache: Mutex::new(CsvCache::new(self.csv_cache_capacity)),
        })
    }
}

// ---------------------------------------------------------------------------
// SalesDashboard
// ---------------------------------------------------------------------------

/// The main entry point: fetches data and builds pages.
///
/// Every fetch produces a fresh [`Dataset`]; the only state kept between
/// calls is the HTTP client and the CSV memo. The dashboard is `Sync`:
/// fetches and page builds on different threads run in parallel, and only
/// CSV memo lookups take a lock.
pub struct SalesDashboard {
    source: DataSource,
    csv_cache: Mutex<CsvCache>,
}

impl SalesDashboard {
    /// Create a new builder for configuring the dashboard.
    pub fn builder() -> SalesDashboardBuilder {
        SalesDashboardBuilder::default()
    }

    /// Fetch the records selected by `query` and load them into a new
    /// [`Dataset`].
    pub fn fetch(&self, query: &RemoteQuery) -> Result<Dataset> {
        let records = self.source.fetch(query)?;
        Dataset::load(&records, query.clone())
    }

    /// Fetch and build the main dashboard page.
    pub fn dashboard_page(
        &self,
        query: &RemoteQuery,
        filter: &SalesFilter,
        seller_count: usize,
    ) -> Result<DashboardPage> {
        let dataset = self.fetch(query)?;
        DashboardPage::build(&dataset, filter, seller_count)
    }

    /// Fetch every record and build the raw-data page.
    pub fn raw_page(&self, filter: &SalesFilter, columns: &[Column]) -> Result<RawTablePage> {
        let dataset = self.fetch(&RemoteQuery::default())?;
        RawTablePage::build(&dataset, filter, columns)
    }

    /// CSV of `dataset` narrowed by `filter` and projected on `columns`
    /// (all columns when empty). Repeated exports of the same table content
    /// are served from the memo.
    pub fn export_csv(
        &self,
        dataset: &Dataset,
        filter: &SalesFilter,
        columns: &[Column],
    ) -> Result<Arc<Vec<u8>>> {
        let columns = presentation::layout::selected_columns(columns);
        let records = dataset.records().list(filter)?;
        self.cache().get_or_encode(&records, &columns)
    }

    /// `(hits, misses)` of the CSV memo.
    pub fn csv_cache_stats(&self) -> (u64, u64) {
        self.cache().stats()
    }

    /// Endpoint the dashboard fetches from.
    pub fn base_url(&self) -> &str {
        self.source.base_url()
    }

    /// Consume the dashboard and release all resources.
    pub fn close(self) {
        drop(self);
    }

    // A panic mid-encode leaves the memo consistent: entries are only
    // inserted once fully encoded.
    fn cache(&self) -> MutexGuard<'_, CsvCache> {
        self.csv_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for SalesDashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hits, misses) = self.csv_cache_stats();
        write!(
            f,
            "SalesDashboard(base_url={}, csv_cache={}/{} hits)",
            self.base_url(),
            hits,
            hits + misses
        )
    }
}
