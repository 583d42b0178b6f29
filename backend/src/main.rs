//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::PasswordPolicy;
use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use backend::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let policy = PasswordPolicy::new(settings.min_password_length()?);
    let mut config = ServerConfig::new(settings.bind_addr()?).with_password_policy(policy);

    let health_state = web::Data::new(HealthState::new());
    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations {
            let applied = run_pending_migrations(&database_url)
                .await
                .wrap_err("failed to apply migrations")?;
            info!(applied, "database schema up to date");
        }
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.pool_max_size()),
        )
        .await
        .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    server.await.wrap_err("server terminated abnormally")?;
    Ok(())
}

#[cfg(test)]
mod tests;
