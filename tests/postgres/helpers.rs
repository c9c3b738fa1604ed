//! Shared test helpers for `PostgreSQL` integration tests.

pub use super::cluster::{BoxError, PostgresCluster};
use super::cluster::shared_cluster;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use rstest::fixture;
use std::sync::atomic::{AtomicUsize, Ordering};
use taskledger::scheduler::adapters::postgres::PostgresTaskRecordRepository;
use tokio::runtime::Runtime;

/// SQL creating the `task_schedulers` table.
pub const CREATE_TASK_SCHEDULERS_SQL: &str =
    include_str!("../../migrations/2026-03-02-000000_create_task_schedulers/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "taskledger_test_template";

/// Set to any value to fail, rather than skip, when no cluster can start.
pub const REQUIRE_POSTGRES_ENV: &str = "TASKLEDGER_REQUIRE_POSTGRES";

static DATABASE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Builds the runtime used to drive async repository calls from sync tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
pub fn test_runtime() -> Result<Runtime, BoxError> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|err| Box::new(err) as BoxError)
}

/// Ensures the template database exists with the migration applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: PostgresCluster) -> Result<(), BoxError> {
    let connection = cluster.connection();
    cluster.ensure_template_exists(TEMPLATE_DB, move |db_name| {
        apply_migrations(&connection.database_url(db_name))
    })
}

fn apply_migrations(url: &str) -> Result<(), BoxError> {
    let mut conn = PgConnection::establish(url).map_err(|err| Box::new(err) as BoxError)?;
    conn.batch_execute(CREATE_TASK_SCHEDULERS_SQL)
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok(())
}

/// Database cloned from the template for a single test, dropped with it.
pub struct TemporaryDatabase {
    cluster: PostgresCluster,
    name: String,
}

impl TemporaryDatabase {
    /// Creates a uniquely named database from the template.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn from_template(cluster: PostgresCluster) -> Result<Self, BoxError> {
        let name = format!(
            "taskledger_test_{}_{}",
            std::process::id(),
            DATABASE_COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        cluster.create_database_from_template(&name, TEMPLATE_DB)?;
        Ok(Self { cluster, name })
    }

    /// Returns the connection URL of the database.
    #[must_use]
    pub fn url(&self) -> String {
        self.cluster.connection().database_url(&self.name)
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(&self.name));
    }
}

/// Repository over a fresh database, plus the runtime that drives it.
///
/// Fields drop in declaration order, so the pool closes before the database
/// is dropped.
pub struct PostgresContext {
    /// Repository under test.
    pub repo: PostgresTaskRecordRepository,
    /// Runtime for `block_on` calls.
    pub rt: Runtime,
    /// Database backing the repository.
    pub temp_db: TemporaryDatabase,
}

impl PostgresContext {
    /// Opens a direct connection for seeding or inspecting rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn raw_connection(&self) -> Result<PgConnection, BoxError> {
        PgConnection::establish(&self.temp_db.url()).map_err(|err| Box::new(err) as BoxError)
    }
}

fn prepare_context(cluster: PostgresCluster) -> Result<PostgresContext, BoxError> {
    ensure_template(cluster)?;
    let temp_db = TemporaryDatabase::from_template(cluster)?;
    let manager = ConnectionManager::<PgConnection>::new(temp_db.url());
    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok(PostgresContext {
        repo: PostgresTaskRecordRepository::new(pool),
        rt: test_runtime()?,
        temp_db,
    })
}

/// Provides a migrated database, or `None` when no cluster can be started
/// and [`REQUIRE_POSTGRES_ENV`] is unset.
#[fixture]
pub fn postgres_context() -> Option<PostgresContext> {
    let cluster = match shared_cluster() {
        Ok(cluster) => cluster,
        Err(err) if std::env::var_os(REQUIRE_POSTGRES_ENV).is_none() => {
            tracing::warn!(error = %err, "skipping PostgreSQL test");
            return None;
        }
        Err(err) => panic!("{err}"),
    };
    Some(prepare_context(cluster).expect("prepare PostgreSQL test database"))
}
