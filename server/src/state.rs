use sales_dashboard::AsyncSalesDashboard;

/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// Fetches, filters and aggregates on the blocking pool. Every request
    /// builds its own dataset; only the CSV memo is shared.
    pub dashboard: AsyncSalesDashboard,
}
