use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, Json};
use sales_dashboard::DashboardPage;

use crate::error::AppError;
use crate::params::{dashboard_params, DashboardParams};
use crate::render;
use crate::state::AppState;

async fn build_page(state: &AppState, pairs: &[(String, String)]) -> Result<DashboardPage, AppError> {
    let DashboardParams {
        query,
        filter,
        seller_count,
    } = dashboard_params(pairs)?;
    tracing::debug!(region = %query.region, year = ?query.year, sellers = filter.sellers.len(), "dashboard");
    Ok(state
        .dashboard
        .dashboard_page(query, filter, seller_count)
        .await?)
}

/// GET /?regiao=Sudeste&ano=2022&vendedor=...&qtd_vendedores=5
///
/// The main dashboard: metrics and charts in three tabs.
pub async fn page(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>, AppError> {
    let page = build_page(&state, &pairs).await?;
    Ok(Html(render::dashboard(&page)))
}

/// GET /api/dashboard
///
/// Same parameters as `/`, returning the page view-model as JSON.
pub async fn json(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<DashboardPage>, AppError> {
    Ok(Json(build_page(&state, &pairs).await?))
}
