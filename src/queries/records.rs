//! Row-level queries against the DuckDB `sales` table.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::config::SALES_TABLE;
use crate::connection::Connection;
use crate::error::{DashboardError, Result};
use crate::models::{Column, SaleRecord, SalesFilter, Totals};
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// FilterOptions
// ---------------------------------------------------------------------------

/// Choices offered by the sidebar widgets, derived from the loaded table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub sellers: Vec<String>,
    pub products: Vec<String>,
    pub categories: Vec<String>,
    pub locations: Vec<String>,
    pub payment_types: Vec<String>,
    /// First and last purchase date, `None` for an empty table.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
}

// ---------------------------------------------------------------------------
// RecordQuery
// ---------------------------------------------------------------------------

/// Query interface for individual sale records.
pub struct RecordQuery<'a> {
    conn: &'a Connection,
}

impl<'a> RecordQuery<'a> {
    /// Create a new `RecordQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Records matching `filter`, in fetch order.
    pub fn list(&self, filter: &SalesFilter) -> Result<Vec<SaleRecord>> {
        self.conn.ensure_table(SALES_TABLE)?;

        let exprs: Vec<String> = Column::ALL.iter().map(|c| c.select_expr()).collect();
        let mut qb = SqlBuilder::new(SALES_TABLE);
        qb.select(&exprs);
        filter.apply(&mut qb)?;
        qb.order_by(&["row_id ASC"]);

        let (sql, params) = qb.build();
        self.conn.execute_into(&sql, &params)
    }

    /// Number of records matching `filter`.
    pub fn count(&self, filter: &SalesFilter) -> Result<usize> {
        self.conn.ensure_table(SALES_TABLE)?;

        let mut qb = SqlBuilder::new(SALES_TABLE);
        qb.select(&["COUNT(*)"]);
        filter.apply(&mut qb)?;

        let (sql, params) = qb.build();
        match self.conn.execute_scalar(&sql, &params)? {
            Some(value) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| DashboardError::InvalidData(format!("bad row count: {}", value))),
            // COUNT(*) always yields a row; treat a missing one as an empty table
            None => Ok(0),
        }
    }

    /// Total revenue and number of sales matching `filter`.
    pub fn totals(&self, filter: &SalesFilter) -> Result<Totals> {
        self.conn.ensure_table(SALES_TABLE)?;

        let mut qb = SqlBuilder::new(SALES_TABLE);
        qb.select(&["COALESCE(SUM(price), 0) AS revenue", "COUNT(*) AS sales"]);
        filter.apply(&mut qb)?;

        let (sql, params) = qb.build();
        let rows: Vec<Totals> = self.conn.execute_into(&sql, &params)?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    /// Distinct values of `column`, in order of first appearance.
    pub fn distinct(&self, column: Column) -> Result<Vec<String>> {
        self.conn.ensure_table(SALES_TABLE)?;

        let col = column.sql_name();
        let value_expr = format!("{} AS value", col);
        let (sql, params) = SqlBuilder::new(SALES_TABLE)
            .select(&[value_expr.as_str()])
            .group_by(&[col])
            .order_by(&["MIN(row_id) ASC"])
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows
            .into_iter()
            .filter_map(|mut r| r.remove("value"))
            .filter(|v| !v.is_null())
            .map(|v| match v {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect())
    }

    /// Earliest and latest purchase date, `None` if the table is empty.
    pub fn date_bounds(&self) -> Result<Option<(NaiveDate, NaiveDate)>> {
        self.conn.ensure_table(SALES_TABLE)?;

        let (sql, params) = SqlBuilder::new(SALES_TABLE)
            .select(&[
                "MIN(purchase_date) AS first_date",
                "MAX(purchase_date) AS last_date",
            ])
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };
        match (
            row.get("first_date").and_then(Value::as_str),
            row.get("last_date").and_then(Value::as_str),
        ) {
            (Some(first), Some(last)) => Ok(Some((parse_iso(first)?, parse_iso(last)?))),
            _ => Ok(None),
        }
    }

    /// Everything the sidebar widgets need to render their choices.
    pub fn filter_options(&self) -> Result<FilterOptions> {
        Ok(FilterOptions {
            sellers: self.distinct(Column::Seller)?,
            products: self.distinct(Column::Product)?,
            categories: self.distinct(Column::Category)?,
            locations: self.distinct(Column::PurchaseLocation)?,
            payment_types: self.distinct(Column::PaymentType)?,
            date_bounds: self.date_bounds()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_iso(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DashboardError::InvalidData(format!("bad date '{}': {}", s, e)))
}
