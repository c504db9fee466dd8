// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded pool of reusable physical SQLite connections.
//!
//! The pool is fixed-size: `max_size` connections are opened at construction
//! against one database file and never grown. `acquire` blocks the calling
//! thread until a connection becomes idle or the configured timeout elapses.
//!
//! Ownership discipline: an idle connection is owned exclusively by the pool;
//! a checked-out connection is owned by whoever acquired it (the coordinator
//! for bound connections, a [`ConnectionLease`](crate::registry::ConnectionLease)
//! for ephemeral ones) until it is released back, exactly once per checkout.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use satchel_config::{PoolConfig, StorageConfig};
use satchel_core::SatchelError;
use tracing::{debug, warn};

use crate::migrations;
use crate::translate;

/// One live session handle to the database.
///
/// Wraps the underlying `rusqlite::Connection` behind a mutex so the handle
/// can be shared between the binding registry and repository code within one
/// execution context. No two contexts ever hold the same physical connection
/// at the same time; the mutex is not a concurrency mechanism, it is what
/// lets `&self` hand out `&mut Connection`.
pub struct PhysicalConnection {
    id: u64,
    conn: Mutex<rusqlite::Connection>,
}

impl PhysicalConnection {
    /// Stable identity of this connection within its pool. Useful in logs
    /// and identity assertions.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Run one closure against the underlying connection.
    pub fn with<T>(
        &self,
        f: impl FnOnce(&mut rusqlite::Connection) -> rusqlite::Result<T>,
    ) -> rusqlite::Result<T> {
        let mut conn = self.conn.lock();
        f(&mut conn)
    }

    /// Whether the session is currently in auto-commit mode (no open
    /// transaction).
    pub fn is_autocommit(&self) -> bool {
        self.conn.lock().is_autocommit()
    }
}

impl std::fmt::Debug for PhysicalConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicalConnection")
            .field("id", &self.id)
            .finish()
    }
}

/// Bounded set of reusable physical connections with timed acquisition.
pub struct ConnectionPool {
    idle: Mutex<Vec<Arc<PhysicalConnection>>>,
    available: Condvar,
    max_size: usize,
    acquire_timeout: Duration,
    released_total: AtomicU64,
}

impl ConnectionPool {
    /// Open a pool per the given configuration sections.
    ///
    /// Opens `max_size` connections up front and runs embedded migrations on
    /// the first one.
    pub fn open_with(
        storage: &StorageConfig,
        pool: &PoolConfig,
    ) -> Result<Self, SatchelError> {
        Self::open(
            Path::new(&storage.path),
            storage.wal_mode,
            pool.max_size,
            Duration::from_millis(pool.acquire_timeout_ms),
        )
    }

    /// Open a pool of `max_size` connections to the database at `path`.
    pub fn open(
        path: &Path,
        wal_mode: bool,
        max_size: usize,
        acquire_timeout: Duration,
    ) -> Result<Self, SatchelError> {
        let mut idle = Vec::with_capacity(max_size);
        for n in 0..max_size {
            let mut conn =
                crate::database::open_connection(path, wal_mode).map_err(translate::acquisition)?;
            if n == 0 {
                migrations::run_migrations(&mut conn)?;
            }
            idle.push(Arc::new(PhysicalConnection {
                id: n as u64 + 1,
                conn: Mutex::new(conn),
            }));
        }
        debug!(path = %path.display(), max_size, "connection pool opened");
        Ok(Self {
            idle: Mutex::new(idle),
            available: Condvar::new(),
            max_size,
            acquire_timeout,
            released_total: AtomicU64::new(0),
        })
    }

    /// Check out an idle connection, waiting up to the configured acquire
    /// timeout.
    pub fn acquire(&self) -> Result<Arc<PhysicalConnection>, SatchelError> {
        self.acquire_within(self.acquire_timeout)
    }

    /// Check out an idle connection, waiting up to `timeout`.
    ///
    /// Fails with [`SatchelError::PoolExhausted`] if no connection becomes
    /// idle in time. This is the only blocking point in the crate.
    pub fn acquire_within(
        &self,
        timeout: Duration,
    ) -> Result<Arc<PhysicalConnection>, SatchelError> {
        let deadline = Instant::now() + timeout;
        let mut idle = self.idle.lock();
        loop {
            if let Some(conn) = idle.pop() {
                debug!(connection = conn.id(), "connection checked out");
                return Ok(conn);
            }
            if Instant::now() >= deadline
                || self.available.wait_until(&mut idle, deadline).timed_out()
            {
                // A release may have slipped in right at the deadline.
                if let Some(conn) = idle.pop() {
                    debug!(connection = conn.id(), "connection checked out");
                    return Ok(conn);
                }
                warn!(waited = ?timeout, "connection pool exhausted");
                return Err(SatchelError::PoolExhausted { waited: timeout });
            }
        }
    }

    /// Return a connection to the idle set and wake one waiter.
    ///
    /// Session state is restored first: a connection handed back mid-
    /// transaction is rolled back so the next borrower starts in
    /// auto-commit. A failure while restoring is logged and swallowed; it
    /// must never mask an in-flight business error.
    pub fn release(&self, conn: Arc<PhysicalConnection>) {
        if !conn.is_autocommit() {
            warn!(
                connection = conn.id(),
                "connection released mid-transaction; rolling back"
            );
            if let Err(e) = conn.with(|c| c.execute_batch("ROLLBACK")) {
                warn!(
                    connection = conn.id(),
                    error = %e,
                    "session state restore on release failed"
                );
            }
        }
        debug!(connection = conn.id(), "connection released");
        self.idle.lock().push(conn);
        self.released_total.fetch_add(1, Ordering::SeqCst);
        self.available.notify_one();
    }

    /// Number of connections currently idle in the pool.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// Fixed pool size chosen at construction.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Total number of releases since the pool opened. Each checkout must
    /// account for exactly one increment.
    pub fn released_total(&self) -> u64 {
        self.released_total.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tempfile::{TempDir, tempdir};

    fn open_pool(dir: &TempDir, max_size: usize, timeout_ms: u64) -> ConnectionPool {
        ConnectionPool::open(
            &dir.path().join("pool.db"),
            true,
            max_size,
            Duration::from_millis(timeout_ms),
        )
        .unwrap()
    }

    #[test]
    fn acquire_release_conserves_the_idle_set() {
        let dir = tempdir().unwrap();
        let pool = open_pool(&dir, 2, 100);
        assert_eq!(pool.idle_count(), 2);

        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        assert_eq!(pool.idle_count(), 0);
        assert_ne!(a.id(), b.id());

        pool.release(a);
        pool.release(b);
        assert_eq!(pool.idle_count(), 2);
        assert_eq!(pool.released_total(), 2);
    }

    #[test]
    fn exhausted_pool_fails_after_the_timeout() {
        let dir = tempdir().unwrap();
        let pool = open_pool(&dir, 1, 100);
        let held = pool.acquire().unwrap();

        let started = Instant::now();
        let err = pool.acquire_within(Duration::from_millis(50)).unwrap_err();
        assert!(matches!(err, SatchelError::PoolExhausted { .. }));
        assert!(started.elapsed() >= Duration::from_millis(50));

        // A failed acquire must not perturb accounting.
        pool.release(held);
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn blocked_acquire_proceeds_once_a_connection_is_released() {
        let dir = tempdir().unwrap();
        let pool = Arc::new(open_pool(&dir, 1, 2_000));
        let held = pool.acquire().unwrap();

        let waiter = {
            let pool = Arc::clone(&pool);
            thread::spawn(move || pool.acquire().map(|conn| conn.id()))
        };
        thread::sleep(Duration::from_millis(50));
        let held_id = held.id();
        pool.release(held);

        let acquired_id = waiter.join().unwrap().unwrap();
        assert_eq!(acquired_id, held_id);
    }

    #[test]
    fn release_restores_autocommit() {
        let dir = tempdir().unwrap();
        let pool = open_pool(&dir, 1, 100);

        let conn = pool.acquire().unwrap();
        conn.with(|c| c.execute_batch("BEGIN IMMEDIATE")).unwrap();
        assert!(!conn.is_autocommit());
        pool.release(conn);

        let conn = pool.acquire().unwrap();
        assert!(conn.is_autocommit());
        pool.release(conn);
    }

    #[test]
    fn pool_can_be_built_from_config_sections() {
        let dir = tempdir().unwrap();
        let storage = StorageConfig {
            path: dir.path().join("cfg.db").display().to_string(),
            wal_mode: true,
        };
        let config = PoolConfig {
            max_size: 3,
            acquire_timeout_ms: 250,
        };
        let pool = ConnectionPool::open_with(&storage, &config).unwrap();
        assert_eq!(pool.max_size(), 3);
        assert_eq!(pool.idle_count(), 3);
    }
}
