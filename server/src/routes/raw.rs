use std::sync::Arc;

use axum::extract::{Query, RawQuery, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Json, Response};
use sales_dashboard::export::csv_file_name;
use sales_dashboard::RawTablePage;

use crate::error::AppError;
use crate::params::raw_params;
use crate::render;
use crate::state::AppState;

/// GET /dados-brutos
///
/// The filterable raw table with a CSV download link.
pub async fn page(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
    RawQuery(raw): RawQuery,
) -> Result<Html<String>, AppError> {
    let params = raw_params(&pairs)?;
    let page = state.dashboard.raw_page(params.filter, params.columns).await?;
    let file_name = csv_file_name(&params.file_name);
    Ok(Html(render::raw_table(
        &page,
        &file_name,
        raw.as_deref().unwrap_or(""),
    )))
}

/// GET /api/dados
pub async fn json(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<RawTablePage>, AppError> {
    let params = raw_params(&pairs)?;
    Ok(Json(
        state.dashboard.raw_page(params.filter, params.columns).await?,
    ))
}

/// GET /dados-brutos/csv
///
/// The filtered table as a CSV attachment named after `arquivo`.
pub async fn csv(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let params = raw_params(&pairs)?;
    let file_name = csv_file_name(&params.file_name);
    let bytes = state
        .dashboard
        .export_csv(params.filter, params.columns)
        .await?;
    tracing::info!(file = %file_name, bytes = bytes.len(), "csv export");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes.as_ref().clone(),
    )
        .into_response())
}
