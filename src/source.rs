//! HTTP data source for the sales API.
//!
//! One blocking GET per fetch, no retries. The response must be a JSON array
//! of sale records; anything else is reported as an error.

use crate::config;
use crate::error::{DashboardError, Result};
use crate::models::{RemoteQuery, SaleRecord};
use reqwest::blocking::Client;
use std::time::{Duration, Instant};

/// Fetches sale records from the remote API.
///
/// Cloning is cheap: the underlying HTTP client is reference counted, and
/// `fetch` takes `&self`, so one source can serve many threads at once.
#[derive(Clone)]
pub struct DataSource {
    base_url: String,
    client: Client,
}

impl DataSource {
    /// Create a data source for `base_url` (defaults to [`config::API_URL`]).
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.unwrap_or_else(|| config::API_URL.to_string()),
            client,
        })
    }

    /// Endpoint queried by [`fetch`](Self::fetch).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET the record list for `query`.
    ///
    /// Wildcard region/year are sent as empty `regiao` / `ano` values, which
    /// the API reads as "no restriction".
    pub fn fetch(&self, query: &RemoteQuery) -> Result<Vec<SaleRecord>> {
        let pairs = query.query_pairs()?;
        let started = Instant::now();

        let resp = self
            .client
            .get(&self.base_url)
            .query(&pairs)
            .send()?
            .error_for_status()?;
        let body = resp.text()?;

        let records = parse_records(&body)?;
        tracing::info!(
            url = %self.base_url,
            region = %query.region,
            year = ?query.year,
            records = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched sales data"
        );
        Ok(records)
    }
}

/// Parse an API response body into validated records.
pub fn parse_records(body: &str) -> Result<Vec<SaleRecord>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_array() {
        return Err(DashboardError::InvalidData(format!(
            "expected a JSON array of sales, got {}",
            json_kind(&value)
        )));
    }
    let records: Vec<SaleRecord> = serde_json::from_value(value)?;
    for record in &records {
        record.validate()?;
    }
    Ok(records)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
