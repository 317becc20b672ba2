mod error;
mod params;
mod render;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use clap::Parser;
use sales_dashboard::{config, AsyncSalesDashboard};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use state::AppState;

/// Serve the sales dashboard and its raw-data page.
#[derive(Parser, Debug)]
#[command(name = "sales-dashboard-server", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "SALES_BIND", default_value = "0.0.0.0:8501")]
    bind: String,

    /// Sales endpoint to fetch records from
    #[arg(long, env = "SALES_API_URL", default_value = config::API_URL)]
    api_url: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "SALES_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Number of CSV exports kept in memory
    #[arg(long, env = "SALES_CSV_CACHE", default_value_t = config::DEFAULT_CSV_CACHE_CAPACITY)]
    csv_cache: usize,
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::dashboard::page))
        .route("/dados-brutos", get(routes::raw::page))
        .route("/dados-brutos/csv", get(routes::raw::csv))
        .route("/api/dashboard", get(routes::dashboard::json))
        .route("/api/dados", get(routes::raw::json))
        .route("/healthz", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let dashboard = AsyncSalesDashboard::builder()
        .base_url(args.api_url)
        .timeout(Duration::from_secs(args.timeout_secs))
        .csv_cache_capacity(args.csv_cache)
        .build()
        .await?;
    tracing::info!(source = %dashboard.base_url(), "dashboard ready");

    let state = Arc::new(AppState { dashboard });

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    tracing::info!("listening on http://{}", args.bind);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
