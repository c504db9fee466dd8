// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat, single-level unit-of-work coordination.
//!
//! The coordinator owns the transaction lifecycle: `begin` checks a
//! connection out of the pool, opens a transaction, and binds the connection
//! to the caller's execution context; `commit`/`rollback` finalize, unbind,
//! and release. Repository code in between resolves the bound connection
//! through the registry without knowing a transaction exists.
//!
//! State machine per context:
//! `NotActive --begin--> Active --commit/rollback--> Finalizing --> Closed`.
//! There is no nesting: a second `begin` on an Active context is rejected
//! rather than silently reusing the outer transaction.

use std::sync::Arc;

use satchel_core::{ExecutionContext, SatchelError};
use tracing::{debug, warn};

use crate::pool::ConnectionPool;
use crate::registry::ConnectionBindingRegistry;
use crate::translate;

/// Begins, commits, and rolls back units of work, guaranteeing that every
/// connection checked out by `begin` is released exactly once.
pub struct TransactionCoordinator {
    pool: Arc<ConnectionPool>,
    registry: Arc<ConnectionBindingRegistry>,
}

impl TransactionCoordinator {
    pub fn new(pool: Arc<ConnectionPool>, registry: Arc<ConnectionBindingRegistry>) -> Self {
        Self { pool, registry }
    }

    /// Start a unit of work for the context.
    ///
    /// Acquires a connection, opens a transaction (auto-commit stays off for
    /// the whole Active window), and binds the connection to the context.
    /// Fails with `TransactionAlreadyActive` if the context already holds a
    /// transaction, without touching the pool.
    pub fn begin(&self, ctx: &ExecutionContext) -> Result<(), SatchelError> {
        if self.registry.is_bound(ctx) {
            return Err(SatchelError::TransactionAlreadyActive {
                context: ctx.clone(),
            });
        }
        let conn = self.pool.acquire()?;
        // IMMEDIATE takes the write lock up front; a deferred BEGIN can hit
        // SQLITE_BUSY when upgrading mid-transaction.
        if let Err(e) = conn.with(|c| c.execute_batch("BEGIN IMMEDIATE")) {
            self.pool.release(conn);
            return Err(translate::boundary("begin", e));
        }
        if let Err(raced) = self.registry.bind(ctx, Arc::clone(&conn)) {
            // Lost a race with a concurrent begin on the same context.
            if let Err(e) = conn.with(|c| c.execute_batch("ROLLBACK")) {
                warn!(context = %ctx, error = %e, "rollback of raced begin failed");
            }
            self.pool.release(conn);
            return Err(raced);
        }
        debug!(context = %ctx, "transaction begun");
        Ok(())
    }

    /// Commit the context's unit of work.
    ///
    /// Valid only from Active. On success the binding is destroyed and the
    /// connection released. On commit failure the rollback path runs instead
    /// (its own failure is logged, never substituted) and the commit cause
    /// surfaces as a `TransactionBoundary` error. Either way the context
    /// ends up Closed and the connection is back in the pool.
    pub fn commit(&self, ctx: &ExecutionContext) -> Result<(), SatchelError> {
        let conn = self.registry.begin_finalizing(ctx, "commit")?;
        let outcome = conn.with(|c| c.execute_batch("COMMIT"));
        match outcome {
            Ok(()) => {
                self.registry.close(ctx);
                self.pool.release(conn);
                debug!(context = %ctx, "transaction committed");
                Ok(())
            }
            Err(commit_err) => {
                warn!(context = %ctx, error = %commit_err, "commit failed; rolling back");
                if let Err(e) = conn.with(|c| c.execute_batch("ROLLBACK")) {
                    warn!(context = %ctx, error = %e, "rollback after failed commit failed");
                }
                self.registry.close(ctx);
                self.pool.release(conn);
                Err(translate::boundary("commit", commit_err))
            }
        }
    }

    /// Roll back the context's unit of work.
    ///
    /// Valid only from Active. The backend rollback is best-effort: its own
    /// failure is logged, not rethrown, so a triggering business error is
    /// never masked. The binding is always destroyed and the connection
    /// always released.
    pub fn rollback(&self, ctx: &ExecutionContext) -> Result<(), SatchelError> {
        let conn = self.registry.begin_finalizing(ctx, "rollback")?;
        if let Err(e) = conn.with(|c| c.execute_batch("ROLLBACK")) {
            warn!(context = %ctx, error = %e, "rollback failed");
        }
        self.registry.close(ctx);
        self.pool.release(conn);
        debug!(context = %ctx, "transaction rolled back");
        Ok(())
    }

    /// Run a closure as one unit of work: begin, invoke, commit on `Ok`,
    /// roll back and rethrow on `Err`.
    ///
    /// Generic over the closure's error type so business code can layer its
    /// own failures on top of [`SatchelError`]. If the closure panics, a
    /// drop guard still rolls back and releases, so cleanup holds on every
    /// exit path.
    pub fn run_in_transaction<T, E, F>(
        &self,
        ctx: &ExecutionContext,
        unit_of_work: F,
    ) -> Result<T, E>
    where
        E: From<SatchelError>,
        F: FnOnce() -> Result<T, E>,
    {
        self.begin(ctx)?;
        let mut guard = RollbackGuard {
            coordinator: self,
            context: ctx,
            armed: true,
        };
        let outcome = unit_of_work();
        guard.armed = false;
        drop(guard);

        match outcome {
            Ok(value) => {
                self.commit(ctx)?;
                Ok(value)
            }
            Err(unit_err) => {
                if let Err(e) = self.rollback(ctx) {
                    warn!(context = %ctx, error = %e, "rollback after unit-of-work failure failed");
                }
                Err(unit_err)
            }
        }
    }
}

/// Rolls the context back if the unit of work unwinds.
struct RollbackGuard<'a> {
    coordinator: &'a TransactionCoordinator,
    context: &'a ExecutionContext,
    armed: bool,
}

impl Drop for RollbackGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(context = %self.context, "unit of work unwound; rolling back");
            if let Err(e) = self.coordinator.rollback(self.context) {
                warn!(context = %self.context, error = %e, "rollback during unwind failed");
            }
        }
    }
}
