use std::sync::Arc;

use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::cookie::Key;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;

mod api;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod routes;
mod service;
mod utils;
mod view;

use config::Config;
use db::init_db;
use service::EmployeeDirectory;
use service::memory::InMemoryDirectory;
use service::mysql::MySqlDirectory;

use crate::docs::ApiDoc;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

/// Per-IP limiter allowing `requests_per_min` with an equal burst.
fn build_limiter(
    requests_per_min: u32,
) -> anyhow::Result<GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = (60_000 / u64::from(requests_per_min.max(1))).max(1);
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .context("invalid rate limit configuration")
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(addr = %config.server_addr, "Server starting...");

    let directory: Arc<dyn EmployeeDirectory> = match &config.database_url {
        Some(url) => Arc::new(MySqlDirectory::new(init_db(url).await?)),
        None => {
            warn!("DATABASE_URL not set, serving the seeded in-memory directory");
            Arc::new(InMemoryDirectory::seeded())
        }
    };
    let directory = Data::from(directory);

    let session_key = match &config.session_key {
        Some(secret) => Key::from(secret.as_bytes()),
        None => {
            warn!("SESSION_KEY not set, flash messages will not survive a restart");
            Key::generate()
        }
    };

    let limiter = build_limiter(config.rate_per_min)?;
    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config.clone());

    HttpServer::new(move || {
        App::new()
            .wrap(view::flash_session(session_key.clone(), config.cookie_secure))
            .wrap(Governor::new(&limiter))
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(directory.clone())
            .app_data(config_data.clone())
            .configure(routes::configure)
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
