use std::net::SocketAddr;

use axum::Router;
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};
use service::auth::service::AuthSettings;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: load config, connect the database, migrate, serve.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = configs::AppConfig::load_and_validate()?;
    common::env::ensure_env(&cfg.server.static_dir).await?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    Migrator::up(&db, None).await?;
    info!("database connected and migrated");

    let state = ServerState {
        db,
        auth: AuthSettings::new(cfg.auth.jwt_secret.clone(), cfg.auth.token_ttl_hours),
    };
    let app: Router = routes::build_router(build_cors(), state, &cfg.server.static_dir);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, static_dir = %cfg.server.static_dir, "starting http server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
