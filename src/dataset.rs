//! A request-scoped, queryable snapshot of one fetch.

use crate::connection::Connection;
use crate::error::Result;
use crate::models::{RemoteQuery, SaleRecord};
use crate::queries::{AggregateQuery, RecordQuery};

/// Sale records loaded into their own in-memory DuckDB database.
///
/// A `Dataset` is built per request and dropped with it; nothing is shared
/// between datasets.
#[derive(Debug)]
pub struct Dataset {
    conn: Connection,
    query: RemoteQuery,
    len: usize,
}

impl Dataset {
    /// Load `records` that were fetched with `query`.
    pub fn load(records: &[SaleRecord], query: RemoteQuery) -> Result<Self> {
        let conn = Connection::new()?;
        conn.load_records(records)?;
        Ok(Self {
            conn,
            query,
            len: records.len(),
        })
    }

    /// Load records that did not come from the API (tests, local files).
    pub fn from_records(records: &[SaleRecord]) -> Result<Self> {
        Self::load(records, RemoteQuery::default())
    }

    /// Access the record query interface.
    pub fn records(&self) -> RecordQuery<'_> {
        RecordQuery::new(&self.conn)
    }

    /// Access the aggregate query interface.
    pub fn aggregates(&self) -> AggregateQuery<'_> {
        AggregateQuery::new(&self.conn)
    }

    /// The remote query this dataset was fetched with.
    pub fn query(&self) -> &RemoteQuery {
        &self.query
    }

    /// Number of records loaded.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
