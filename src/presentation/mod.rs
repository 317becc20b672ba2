//! Formatting, chart specifications and page view-models.

pub mod charts;
pub mod format;
pub mod layout;

pub use charts::Chart;
pub use format::{format_currency, format_number};
pub use layout::{DashboardPage, Panel, RawTablePage, Tab};
