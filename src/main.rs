//! Entry point: load config, wire dependencies, and run the server.

use std::sync::Arc;

use roster::auth::TokenKey;
use roster::config::Config;
use roster::db::{self, PgUserRepository};
use roster::services::AccountService;
use roster::{create_app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_pool = db::create_pool(&config.database_url).await?;
    let repo = Arc::new(PgUserRepository::new(db_pool));
    let token_key = TokenKey::new(config.jwt_secret.clone());
    let account_service = AccountService::new(repo, token_key.clone());

    let state = AppState {
        account_service,
        token_key,
    };
    let app = create_app(state);

    tracing::info!(addr = %config.server_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
