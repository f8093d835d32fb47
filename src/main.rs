use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;

mod api;
mod auth;
mod config;
mod docs;
mod model;
mod models;
mod roster;
mod routes;
mod views;

use auth::revocation::RevokedTokens;
use config::Config;
use roster::RosterClient;

use crate::docs::ApiDoc;
use tracing::{Level, info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let parsed_level = config.log_level.parse::<Level>().ok();
    let level = parsed_level.unwrap_or(Level::DEBUG);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    if parsed_level.is_none() {
        warn!(log_level = %config.log_level, "Unrecognised LOG_LEVEL, using debug");
    }

    info!(roster_url = %config.roster_url, "Server starting...");

    let roster = RosterClient::from_config(&config).context("Failed to build roster client")?;
    let revoked = RevokedTokens::new(config.refresh_token_ttl);
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(roster.clone()))
            .app_data(Data::new(revoked.clone()))
            // Configure auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
