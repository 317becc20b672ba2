//! Query modules for the sales dashboard.
//!
//! Each module provides a query struct that borrows from a [`Connection`](crate::connection::Connection)
//! holding a loaded `sales` table and exposes methods returning typed `Result<T>` rows.

pub mod aggregates;
pub mod records;

pub use aggregates::AggregateQuery;
pub use records::{FilterOptions, RecordQuery};
