//! Provision an administrative account with staff and superuser flags set.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::sync::Arc;

use backend::domain::ports::{CreateSuperuserRequest, UserAccounts};
use backend::domain::{PasswordPolicy, UserAccountService};
use backend::outbound::persistence::{
    DbPool, DieselTokenRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use backend::outbound::security::{Argon2PasswordHasher, RandomTokenGenerator};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tokio::runtime::Builder;

/// `create-superuser` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-superuser",
    about = "Create an account with staff and superuser privileges",
    version
)]
struct CliArgs {
    #[arg(long, value_name = "email")]
    email: String,
    /// Clear-text password; prefer `RECIPES_SUPERUSER_PASSWORD` to keep it
    /// out of shell history.
    #[arg(long, value_name = "password")]
    password: Option<String>,
    #[arg(long, value_name = "name")]
    name: Option<String>,
    /// Must be `true` when given.
    #[arg(long = "is-staff", value_name = "bool")]
    is_staff: Option<bool>,
    #[arg(long = "is-superuser", value_name = "bool")]
    is_superuser: Option<bool>,
    #[arg(long = "min-password-length", value_name = "n")]
    min_password_length: Option<usize>,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

const PASSWORD_ENV: &str = "RECIPES_SUPERUSER_PASSWORD";

fn main() -> Result<()> {
    color_eyre::install()?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = CliArgs::parse();
    let password = args
        .password
        .or_else(|| env::var(PASSWORD_ENV).ok())
        .ok_or_else(|| eyre!("pass --password or set {PASSWORD_ENV}"))?;
    let database_url = args
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .ok_or_else(|| eyre!("pass --database-url or set DATABASE_URL"))?;

    run_pending_migrations(&database_url)
        .await
        .wrap_err("apply migrations")?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .wrap_err("create database pool")?;

    let policy = args
        .min_password_length
        .map_or_else(PasswordPolicy::default, PasswordPolicy::new);
    let accounts = UserAccountService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselTokenRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(RandomTokenGenerator),
    )
    .with_password_policy(policy);

    let user = accounts
        .create_superuser(CreateSuperuserRequest {
            email: args.email,
            password,
            name: args.name,
            is_staff: args.is_staff,
            is_superuser: args.is_superuser,
        })
        .await
        .map_err(|error| eyre!("create superuser failed: {error}"))?;

    println!("id={}", user.id());
    println!("email={}", user.email());
    Ok(())
}
