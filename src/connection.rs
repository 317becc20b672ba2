//! DuckDB connection wrapper with table loading and query execution.
//!
//! Each [`Connection`] owns a private in-memory database. Sale records are
//! streamed into it through a newline-delimited JSON temp file and read back
//! with explicit column types, so the table schema never depends on DuckDB's
//! type sniffing.

use crate::config;
use crate::error::{DashboardError, Result};
use crate::models::SaleRecord;
use chrono::NaiveDate;
use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::{BufWriter, Write};
use tempfile::NamedTempFile;

/// One row of the sales table as written to the NDJSON staging file.
#[derive(Serialize)]
struct TableRow<'a> {
    row_id: usize,
    product: &'a str,
    category: &'a str,
    price: f64,
    freight: f64,
    purchase_date: NaiveDate,
    seller: &'a str,
    purchase_location: &'a str,
    rating: i64,
    payment_type: &'a str,
    installments: i64,
    lat: f64,
    lon: f64,
}

impl<'a> TableRow<'a> {
    fn new(row_id: usize, r: &'a SaleRecord) -> Self {
        Self {
            row_id,
            product: &r.product,
            category: &r.category,
            price: r.price,
            freight: r.freight,
            purchase_date: r.purchase_date,
            seller: &r.seller,
            purchase_location: &r.purchase_location,
            rating: r.rating,
            payment_type: &r.payment_type,
            installments: r.installments,
            lat: r.lat,
            lon: r.lon,
        }
    }
}

/// Wraps an in-memory DuckDB connection and tracks the tables loaded into it.
#[derive(Debug)]
pub struct Connection {
    conn: DuckDbConnection,
    registered_tables: RefCell<HashSet<String>>,
}

impl Connection {
    /// Open a fresh in-memory DuckDB database.
    pub fn new() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            conn,
            registered_tables: RefCell::new(HashSet::new()),
        })
    }

    /// (Re)create the sales table and fill it with `records`.
    ///
    /// Records keep their slice position in the hidden `row_id` column, which
    /// queries use for first-occurrence semantics.
    pub fn load_records(&self, records: &[SaleRecord]) -> Result<()> {
        let table = config::SALES_TABLE;
        let schema = config::table_schema();

        let ddl: Vec<String> = schema
            .iter()
            .map(|(name, ty)| format!("{} {}", name, ty))
            .collect();
        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {}; CREATE TABLE {} ({})",
            table,
            table,
            ddl.join(", ")
        ))?;

        // read_json rejects an empty file, and there is nothing to insert anyway
        if !records.is_empty() {
            let mut file = NamedTempFile::new()?;
            {
                let mut writer = BufWriter::new(&mut file);
                for (i, record) in records.iter().enumerate() {
                    serde_json::to_writer(&mut writer, &TableRow::new(i, record))?;
                    writer.write_all(b"\n")?;
                }
                writer.flush()?;
            }

            let columns: Vec<String> = schema
                .iter()
                .map(|(name, ty)| format!("'{}': '{}'", name, ty))
                .collect();
            let path = file.path().to_string_lossy().replace('\\', "/");
            self.conn.execute_batch(&format!(
                "INSERT INTO {} SELECT * FROM read_json('{}', \
                 format='newline_delimited', columns={{{}}})",
                table,
                path,
                columns.join(", ")
            ))?;
        }

        self.registered_tables.borrow_mut().insert(table.to_string());
        tracing::debug!(table, rows = records.len(), "loaded sales table");
        Ok(())
    }

    /// Fail with `NotFound` unless `table` has been loaded.
    pub fn ensure_table(&self, table: &str) -> Result<()> {
        if self.has_table(table) {
            Ok(())
        } else {
            Err(DashboardError::NotFound(format!("Table not loaded: {}", table)))
        }
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// Automatically converts DuckDB types to `serde_json::Value`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the statement has run
        let (column_names, column_count) = {
            let executed = rows_result.as_ref().ok_or_else(|| {
                DashboardError::InvalidData("statement produced no result set".into())
            })?;
            let names: Vec<String> = executed
                .column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect();
            (names, executed.column_count())
        };

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_count);
            for (i, col_name) in column_names.iter().enumerate() {
                let value = convert_value_ref(row.get_ref(i)?);
                map.insert(col_name.clone(), value);
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    ///
    /// First executes the query as `HashMap` rows, then deserializes each
    /// row using `serde_json`.
    pub fn execute_into<T: DeserializeOwned>(&self, sql: &str, params: &[String]) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            let item: T = serde_json::from_value(value)?;
            results.push(item);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            let value = convert_value_ref(row.get_ref(0)?);
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Check whether a table has been loaded.
    pub fn has_table(&self, name: &str) -> bool {
        self.registered_tables.borrow().contains(name)
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UTinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::USmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // SUM over BIGINT widens to HUGEINT
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).to_string()),
        ValueRef::Date32(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days as i64)))
            .map(|d| serde_json::Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(serde_json::Value::Null),
        _ => {
            // Other types (Time, Timestamp, Interval, List, ...) never appear
            // in the sales table
            serde_json::Value::Null
        }
    }
}
