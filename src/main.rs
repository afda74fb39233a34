use crate::jwt::JwtSettings;
use anyhow::Context;
use axum::extract::State;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

mod api;
mod app_env;
mod db;
mod domain;
mod dto;
mod external_connections;
mod jwt;
mod logging;
mod persistence;
mod routing_utils;

/// Address the HTTP server listens on
const LISTEN_ADDRESS: &str = "0.0.0.0:8080";

/// Everything route handlers need, shared across requests
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
    pub jwt: Arc<JwtSettings>,
}

/// Extractor type route handlers use to reach [SharedData]
pub type AppState = State<Arc<SharedData>>;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let dotenv_result = dotenv();

    let otel_exporters = match (
        env::var(app_env::OTEL_SPAN_EXPORT_URL),
        env::var(app_env::OTEL_METRIC_EXPORT_URL),
    ) {
        (Ok(span_url), Ok(metric_url)) => Some(logging::init_exporters(&span_url, &metric_url)?),
        _ => None,
    };
    let telemetry_enabled = otel_exporters.is_some();
    logging::setup_logging_and_tracing(logging::init_env_filter()?, otel_exporters);

    if dotenv_result.is_err() {
        info!("No .env file found, using the process environment as-is");
    }
    if !telemetry_enabled {
        warn!(
            "OpenTelemetry export is off. Set {} and {} to turn it on.",
            app_env::OTEL_SPAN_EXPORT_URL,
            app_env::OTEL_METRIC_EXPORT_URL
        );
    }

    let db_url = env::var(app_env::DB_URL)
        .with_context(|| format!("{} must be set", app_env::DB_URL))?;
    let pool = db::connect_sqlx(&db_url).await?;
    db::ensure_schema(&pool).await?;

    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(pool),
        jwt: Arc::new(JwtSettings::from_env()?),
    });

    let router = logging::attach_tracing_http(api::build_router(shared_data));

    let listener = TcpListener::bind(LISTEN_ADDRESS)
        .await
        .with_context(|| format!("binding to {LISTEN_ADDRESS}"))?;
    info!("Listening on {LISTEN_ADDRESS}");

    axum::serve(listener, router)
        .await
        .context("serving HTTP requests")
}
