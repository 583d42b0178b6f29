//! Throwaway PostgreSQL databases for the Diesel adapter suites.
//!
//! Each [`PgDatabase`] owns an embedded cluster and a freshly migrated
//! database seeded with two users, so tests never share rows. Administration
//! and assertions go through the synchronous `postgres` client; the schema
//! comes from the crate's embedded Diesel migrations.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::future::Future;

use backend::domain::UserId;
use backend::outbound::persistence::{DbPool, MIGRATIONS, PoolConfig};
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use tokio::runtime::Runtime;
use uuid::Uuid;

use crate::pg_embed::test_cluster;

/// A migrated database plus the runtime and pool used to drive adapters.
///
/// Fields drop in declaration order: the pool closes before the runtime
/// stops, and the cluster shuts down last.
pub struct PgDatabase {
    pub pool: DbPool,
    pub alice: UserId,
    pub bob: UserId,
    url: String,
    runtime: Runtime,
    _cluster: TestCluster,
}

impl PgDatabase {
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Direct connection for assertions and schema surgery.
    pub fn client(&self) -> Client {
        Client::connect(&self.url, NoTls)
            .unwrap_or_else(|err| panic!("connect: {}", format_postgres_error(&err)))
    }

    /// First column of a single-row query returning a `BIGINT`.
    pub fn scalar(&self, sql: &str) -> i64 {
        self.client()
            .query_one(sql, &[])
            .unwrap_or_else(|err| panic!("{sql}: {}", format_postgres_error(&err)))
            .get(0)
    }

    pub fn execute(&self, sql: &str) {
        self.client()
            .batch_execute(sql)
            .unwrap_or_else(|err| panic!("{sql}: {}", format_postgres_error(&err)));
    }
}

/// Render a `postgres` error with its SQLSTATE and detail.
///
/// `Display` collapses server errors to "db error", which hides the cause.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!(
        "postgres error {}: {}",
        db_error.code().code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

fn migrate(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|err| format!("migration: {err}"))
}

fn seed_user(client: &mut Client, email: &str) -> Result<UserId, String> {
    let row = client
        .query_one(
            "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) RETURNING id",
            &[&email, &"Repository test user", &"$argon2id$unused"],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(UserId::new(row.get(0)))
}

/// Start a cluster, create and migrate a database, and seed two users.
pub fn provision() -> Result<PgDatabase, String> {
    let cluster = test_cluster()?;
    let name = format!("recipes_{}", Uuid::new_v4().simple());

    let admin_url = cluster.connection().database_url("postgres");
    let mut admin = Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    admin
        .batch_execute(&format!("CREATE DATABASE \"{name}\""))
        .map_err(|err| format_postgres_error(&err))?;

    let url = cluster.connection().database_url(&name);
    migrate(&url)?;

    let mut client = Client::connect(&url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let alice = seed_user(&mut client, "alice@example.com")?;
    let bob = seed_user(&mut client, "bob@example.com")?;

    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let config = PoolConfig::new(&url)
        .with_max_size(4)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(PgDatabase {
        pool,
        alice,
        bob,
        url,
        runtime,
        _cluster: cluster,
    })
}

/// True when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when `SKIP_TEST_CLUSTER` is set, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
