use anyhow::{anyhow, Result as Fallible};
use diesel::{
    connection::SimpleConnection as _, r2d2, result::Error as DieselError,
    sqlite::SqliteConnection, Connection as _,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use lonb_core::{repositories::LocationRepo, usecases as uc};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::{cell::RefCell, sync::Arc};

mod models;
mod repo_impl;
mod schema;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

type ConnectionManager = r2d2::ConnectionManager<SqliteConnection>;
type ConnectionPool = r2d2::Pool<ConnectionManager>;
type PooledConnection = r2d2::PooledConnection<ConnectionManager>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    ReadOnly,
    ReadWrite,
}

enum PoolLock<'a> {
    Shared { _guard: RwLockReadGuard<'a, ConnectionPool> },
    Exclusive { _guard: RwLockWriteGuard<'a, ConnectionPool> },
}

/// A pooled connection that is locked for reading or writing.
///
/// Many read sessions may exist at the same time, but a write session
/// excludes all others.
pub struct Session<'a> {
    conn: PooledConnection,
    access: Access,
    _lock: PoolLock<'a>,
}

impl Session<'_> {
    /// Runs a usecase inside a single transaction.
    ///
    /// The transaction is rolled back if the usecase fails.
    /// Modifications fail in read-only sessions.
    pub fn run<T, F>(mut self, f: F) -> Result<T, uc::Error>
    where
        F: FnOnce(&dyn LocationRepo) -> Result<T, uc::Error>,
    {
        let access = self.access;
        let conn: &mut SqliteConnection = &mut self.conn;
        // diesel only rolls back on its own errors, so the usecase
        // error is kept aside until the transaction has finished.
        let mut usecase_error = None;
        conn.transaction(|conn| {
            f(&DbConnection::new(conn, access)).map_err(|err| {
                usecase_error = Some(err);
                DieselError::RollbackTransaction
            })
        })
        .map_err(|err| match usecase_error {
            Some(usecase_error) => usecase_error,
            None => uc::Error::Repo(repo_impl::from_diesel_err(err)),
        })
    }
}

/// The repository as seen from inside a transaction.
struct DbConnection<'a> {
    conn: RefCell<&'a mut SqliteConnection>,
    access: Access,
}

impl<'a> DbConnection<'a> {
    fn new(conn: &'a mut SqliteConnection, access: Access) -> Self {
        Self {
            conn: RefCell::new(conn),
            access,
        }
    }
}

#[derive(Clone)]
pub struct Connections {
    // Only a single connection with write access will be
    // handed out at a time from the pool. Multiple read
    // connections can be accessed concurrently. This locking
    // pattern around the connection pool prevents SQLITE_LOCKED
    // ("database is locked") errors.
    pool: Arc<RwLock<ConnectionPool>>,
}

/// Configure the database engine
///
/// Some values like the text encoding can only be changed once after
/// the database has initially been created.
fn initialize_database(connection: &mut SqliteConnection) -> Fallible<()> {
    connection.batch_execute(
        r#"
PRAGMA journal_mode = WAL;        -- better write-concurrency
PRAGMA synchronous = NORMAL;      -- fsync only in critical moments, safe for journal_mode = WAL
PRAGMA foreign_keys = 1;          -- check foreign key constraints
PRAGMA encoding = 'UTF-8';
"#,
    )?;
    Ok(())
}

impl Connections {
    /// Opens the database and applies all pending migrations.
    pub fn open(url: &str, pool_size: u32) -> Fallible<Self> {
        // r2d2 keeps retrying inaccessible files instead of failing,
        // so a single connection is established first.
        SqliteConnection::establish(url)?;
        let pool = ConnectionPool::builder()
            .max_size(pool_size)
            .build(ConnectionManager::new(url))?;
        let connections = Self {
            pool: Arc::new(RwLock::new(pool)),
        };
        connections.migrate()?;
        Ok(connections)
    }

    fn migrate(&self) -> Fallible<()> {
        let pool = self.pool.write();
        let mut pooled = pool.get()?;
        let conn: &mut SqliteConnection = &mut pooled;
        initialize_database(conn)?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| anyhow!("Failed to run database migrations: {err}"))?;
        for version in applied {
            log::info!("Applied database migration {version}");
        }
        Ok(())
    }

    pub fn shared(&self) -> Fallible<Session<'_>> {
        let guard = self.pool.read();
        let conn = guard.get().inspect_err(|err| {
            log::error!("Failed to obtain pooled database connection for read-only access: {err}");
        })?;
        Ok(Session {
            conn,
            access: Access::ReadOnly,
            _lock: PoolLock::Shared { _guard: guard },
        })
    }

    pub fn exclusive(&self) -> Fallible<Session<'_>> {
        let guard = self.pool.write();
        let conn = guard.get().inspect_err(|err| {
            log::error!("Failed to obtain pooled database connection for read/write access: {err}");
        })?;
        Ok(Session {
            conn,
            access: Access::ReadWrite,
            _lock: PoolLock::Exclusive { _guard: guard },
        })
    }
}
