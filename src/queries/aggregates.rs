//! Grouped summaries of the `sales` table.
//!
//! Every method takes the active [`SalesFilter`], so the aggregates always
//! describe the same row subset the rest of the page shows.

use std::collections::HashMap;

use chrono::Month;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::SALES_TABLE;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{
    CategoryTotal, Metric, MonthlyTotal, SalesFilter, SellerTotal, StateTotal, Totals,
};
use crate::queries::RecordQuery;
use crate::sql_builder::SqlBuilder;

const REVENUE: &str = "COALESCE(SUM(price), 0) AS revenue";
const SALES: &str = "COUNT(price) AS sales";

#[derive(Deserialize)]
struct MonthRow {
    year: i32,
    month: u32,
    revenue: f64,
    sales: i64,
}

// ---------------------------------------------------------------------------
// AggregateQuery
// ---------------------------------------------------------------------------

/// Query interface for revenue and sales-count aggregates.
pub struct AggregateQuery<'a> {
    conn: &'a Connection,
}

impl<'a> AggregateQuery<'a> {
    /// Create a new `AggregateQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Revenue and sales for the whole filtered table.
    pub fn totals(&self, filter: &SalesFilter) -> Result<Totals> {
        RecordQuery::new(self.conn).totals(filter)
    }

    /// Metrics per purchase location, ordered by `metric` descending.
    ///
    /// Each state carries the coordinates of its first sale in fetch order.
    pub fn by_state(&self, filter: &SalesFilter, metric: Metric) -> Result<Vec<StateTotal>> {
        self.grouped(
            "purchase_location",
            "state",
            &["arg_min(lat, row_id) AS lat", "arg_min(lon, row_id) AS lon"],
            filter,
            metric,
            None,
        )
    }

    /// Metrics per product category, ordered by `metric` descending.
    pub fn by_category(&self, filter: &SalesFilter, metric: Metric) -> Result<Vec<CategoryTotal>> {
        self.grouped("category", "category", &[], filter, metric, None)
    }

    /// Metrics per seller, ordered by `metric` descending.
    pub fn by_seller(&self, filter: &SalesFilter, metric: Metric) -> Result<Vec<SellerTotal>> {
        self.grouped("seller", "seller", &[], filter, metric, None)
    }

    /// The `n` best sellers by `metric`.
    pub fn top_sellers(
        &self,
        filter: &SalesFilter,
        metric: Metric,
        n: usize,
    ) -> Result<Vec<SellerTotal>> {
        self.grouped("seller", "seller", &[], filter, metric, Some(n))
    }

    /// Metrics per calendar month, in chronological order.
    ///
    /// Every month between the first and the last one present gets a row;
    /// months without sales report zero revenue and zero sales.
    pub fn by_month(&self, filter: &SalesFilter) -> Result<Vec<MonthlyTotal>> {
        self.conn.ensure_table(SALES_TABLE)?;

        let mut qb = SqlBuilder::new(SALES_TABLE);
        qb.select(&[
            "CAST(year(purchase_date) AS INTEGER) AS year",
            "CAST(month(purchase_date) AS INTEGER) AS month",
            REVENUE,
            SALES,
        ]);
        filter.apply(&mut qb)?;
        qb.group_by(&["year(purchase_date)", "month(purchase_date)"]);
        qb.order_by(&["year ASC", "month ASC"]);

        let (sql, params) = qb.build();
        let rows: Vec<MonthRow> = self.conn.execute_into(&sql, &params)?;
        Ok(fill_months(rows))
    }

    fn grouped<T: DeserializeOwned>(
        &self,
        key_column: &str,
        key_alias: &str,
        extra: &[&str],
        filter: &SalesFilter,
        metric: Metric,
        limit: Option<usize>,
    ) -> Result<Vec<T>> {
        self.conn.ensure_table(SALES_TABLE)?;

        let key_expr = format!("{} AS {}", key_column, key_alias);
        let mut cols: Vec<&str> = vec![key_expr.as_str()];
        cols.extend_from_slice(extra);
        cols.push(REVENUE);
        cols.push(SALES);

        let metric_order = format!("{} DESC", metric.column());
        let key_order = format!("{} ASC", key_alias);

        let mut qb = SqlBuilder::new(SALES_TABLE);
        qb.select(&cols);
        filter.apply(&mut qb)?;
        qb.group_by(&[key_column]);
        qb.order_by(&[metric_order.as_str(), key_order.as_str()]);
        if let Some(n) = limit {
            qb.limit(n);
        }

        let (sql, params) = qb.build();
        self.conn.execute_into(&sql, &params)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Expand sparse (year, month) rows into a contiguous monthly series.
fn fill_months(rows: Vec<MonthRow>) -> Vec<MonthlyTotal> {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Vec::new();
    };
    let (mut year, mut month) = (first.year, first.month);
    let end = (last.year, last.month);

    let by_key: HashMap<(i32, u32), (f64, i64)> = rows
        .iter()
        .map(|r| ((r.year, r.month), (r.revenue, r.sales)))
        .collect();

    let mut out = Vec::new();
    while (year, month) <= end {
        let (revenue, sales) = by_key.get(&(year, month)).copied().unwrap_or((0.0, 0));
        out.push(MonthlyTotal {
            year,
            month,
            month_name: month_name(month),
            revenue,
            sales,
        });
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    out
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_default()
}
