//! Ingestion Service - Scheduled Content Pipeline
//!
//! Port: 8085
//! SLA: 99.5% availability

use actix_web::{web, App, HttpResponse, HttpServer};
use media_catalog_core::config::{load_dotenv, ConfigLoader, DatabaseConfig, ServiceConfig};
use media_catalog_core::database::DatabasePool;
use media_catalog_ingestion::config::{ProviderConfig, ScheduleConfig};
use media_catalog_ingestion::pipeline::IngestionPipeline;
use media_catalog_ingestion::provider::{SportsDbClient, TmdbClient};
use media_catalog_ingestion::repository::PostgresContentRepository;
use std::sync::Arc;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .json()
        .init();

    load_dotenv();

    let service_config = ServiceConfig::from_env()?;
    service_config.validate()?;
    let database_config = DatabaseConfig::from_env()?;
    database_config.validate()?;
    let provider_config = ProviderConfig::from_env()?;
    provider_config.validate()?;
    let schedule_config = ScheduleConfig::from_env()?;
    schedule_config.validate()?;

    info!("Starting Ingestion Service...");

    let pool = DatabasePool::new(&database_config).await?;
    let repository = Arc::new(PostgresContentRepository::new(pool.pool().clone()));

    let tmdb = Arc::new(TmdbClient::with_base_url(
        &provider_config.tmdb_api_key,
        &provider_config.tmdb_base_url,
        provider_config.request_timeout,
    )?);
    let sportsdb = Arc::new(SportsDbClient::with_base_url(
        &provider_config.sportsdb_api_key,
        &provider_config.sportsdb_base_url,
        provider_config.request_timeout,
    )?);

    let pipeline = Arc::new(IngestionPipeline::new(
        tmdb,
        sportsdb,
        repository,
        schedule_config,
    ));
    let _scheduler = pipeline.spawn_daily_task();

    info!(
        host = %service_config.host,
        port = service_config.port,
        "Ingestion service listening"
    );

    HttpServer::new(|| App::new().route("/health", web::get().to(health_check)))
        .bind((service_config.host.as_str(), service_config.port))?
        .workers(service_config.workers)
        .run()
        .await?;

    Ok(())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "ingestion-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
