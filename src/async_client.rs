//! Async wrapper around [`SalesDashboard`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all dashboard operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free. The
//! HTTP fetch is blocking and DuckDB queries are CPU-bound, so neither may
//! run on a runtime worker.
//!
//! # Example
//!
//! ```no_run
//! use sales_dashboard::{AsyncSalesDashboard, RemoteQuery, SalesFilter};
//!
//! #[tokio::main]
//! async fn main() {
//!     let dash = AsyncSalesDashboard::builder().build().await.unwrap();
//!
//!     // Run any sync dashboard method via closure
//!     let page = dash.run(|d| {
//!         d.dashboard_page(&RemoteQuery::default(), &SalesFilter::default(), 5)
//!     }).await.unwrap();
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::config;
use crate::error::{DashboardError, Result};
use crate::models::{Column, RemoteQuery, SalesFilter};
use crate::presentation::{DashboardPage, RawTablePage};
use crate::SalesDashboard;

// ---------------------------------------------------------------------------
// AsyncSalesDashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncSalesDashboard`] instance.
pub struct AsyncSalesDashboardBuilder {
    base_url: Option<String>,
    timeout: Duration,
    csv_cache_capacity: usize,
}

impl Default for AsyncSalesDashboardBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            csv_cache_capacity: config::DEFAULT_CSV_CACHE_CAPACITY,
        }
    }
}

impl AsyncSalesDashboardBuilder {
    /// Point the dashboard at another sales endpoint.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of CSV encodings kept in memory.
    pub fn csv_cache_capacity(mut self, capacity: usize) -> Self {
        self.csv_cache_capacity = capacity;
        self
    }

    /// Build the async dashboard.
    pub async fn build(self) -> Result<AsyncSalesDashboard> {
        tokio::task::spawn_blocking(move || {
            let mut builder = SalesDashboard::builder()
                .timeout(self.timeout)
                .csv_cache_capacity(self.csv_cache_capacity);
            if let Some(url) = self.base_url {
                builder = builder.base_url(url);
            }
            let dash = builder.build()?;
            Ok(AsyncSalesDashboard {
                inner: Arc::new(dash),
            })
        })
        .await
        .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncSalesDashboard
// ---------------------------------------------------------------------------

/// Async wrapper around [`SalesDashboard`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The shared [`SalesDashboard`] is `Sync`,
/// so concurrent calls run in parallel.
#[derive(Clone)]
pub struct AsyncSalesDashboard {
    inner: Arc<SalesDashboard>,
}

impl AsyncSalesDashboard {
    /// Create a new builder for configuring the async dashboard.
    pub fn builder() -> AsyncSalesDashboardBuilder {
        AsyncSalesDashboardBuilder::default()
    }

    /// Run a sync dashboard operation on the blocking thread pool.
    ///
    /// The closure receives a `&SalesDashboard` reference and should return
    /// a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SalesDashboard) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let dash = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&dash))
        .await
        .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Fetch and build the main dashboard page asynchronously.
    pub async fn dashboard_page(
        &self,
        query: RemoteQuery,
        filter: SalesFilter,
        seller_count: usize,
    ) -> Result<DashboardPage> {
        self.run(move |d| d.dashboard_page(&query, &filter, seller_count))
            .await
    }

    /// Fetch every record and build the raw-data page asynchronously.
    pub async fn raw_page(&self, filter: SalesFilter, columns: Vec<Column>) -> Result<RawTablePage> {
        self.run(move |d| d.raw_page(&filter, &columns)).await
    }

    /// Fetch every record and encode the filtered CSV asynchronously.
    pub async fn export_csv(&self, filter: SalesFilter, columns: Vec<Column>) -> Result<Arc<Vec<u8>>> {
        self.run(move |d| {
            let dataset = d.fetch(&RemoteQuery::default())?;
            d.export_csv(&dataset, &filter, &columns)
        })
        .await
    }

    /// Endpoint the dashboard fetches from.
    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }
}
