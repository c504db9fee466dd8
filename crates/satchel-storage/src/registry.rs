// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-context connection binding.
//!
//! The registry associates at most one physical connection with an execution
//! context for the lifetime of a unit of work. Repositories resolve "the
//! current connection" here and stay unaware of whether a transaction is
//! active; `bind`/`unbind` are crate-private and driven exclusively by the
//! [`TransactionCoordinator`](crate::coordinator::TransactionCoordinator).

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::Mutex;
use satchel_core::{ExecutionContext, SatchelError};
use tracing::debug;

use crate::pool::{ConnectionPool, PhysicalConnection};
use crate::translate;

/// Lifecycle of one bound transaction.
///
/// `NotActive` is reported for contexts with no binding. `Finalizing` is
/// entered exactly once per transaction and is irreversible; `Closed` always
/// follows it, success or failure, at which point the binding is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    NotActive,
    Active,
    Finalizing,
    Closed,
}

struct Binding {
    conn: Arc<PhysicalConnection>,
    state: TransactionState,
}

/// Associates execution contexts with their bound connections.
pub struct ConnectionBindingRegistry {
    pool: Arc<ConnectionPool>,
    bindings: Mutex<HashMap<ExecutionContext, Binding>>,
}

impl ConnectionBindingRegistry {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            pool,
            bindings: Mutex::new(HashMap::new()),
        }
    }

    /// Whether the context currently holds a bound connection.
    pub fn is_bound(&self, ctx: &ExecutionContext) -> bool {
        self.bindings.lock().contains_key(ctx)
    }

    /// Transaction state for the context; `NotActive` when nothing is bound.
    pub fn state(&self, ctx: &ExecutionContext) -> TransactionState {
        self.bindings
            .lock()
            .get(ctx)
            .map(|binding| binding.state)
            .unwrap_or(TransactionState::NotActive)
    }

    /// Resolve the connection repository operations should run on.
    ///
    /// A bound context gets a lease over the identical bound connection; an
    /// unbound context gets an ephemeral lease over a freshly acquired pooled
    /// connection, which goes back to the pool when the lease drops. One
    /// lease covers exactly one caller-visible operation.
    pub fn resolve(&self, ctx: &ExecutionContext) -> Result<ConnectionLease, SatchelError> {
        if let Some(binding) = self.bindings.lock().get(ctx) {
            return Ok(ConnectionLease {
                conn: Arc::clone(&binding.conn),
                reclaim: None,
            });
        }
        let conn = self.pool.acquire()?;
        debug!(context = %ctx, connection = conn.id(), "ephemeral connection resolved");
        Ok(ConnectionLease {
            conn,
            reclaim: Some(Arc::clone(&self.pool)),
        })
    }

    /// Bind a connection to the context for the duration of a transaction.
    ///
    /// Fails with `TransactionAlreadyActive` if the context is already bound;
    /// the caller still owns the connection in that case.
    pub(crate) fn bind(
        &self,
        ctx: &ExecutionContext,
        conn: Arc<PhysicalConnection>,
    ) -> Result<(), SatchelError> {
        match self.bindings.lock().entry(ctx.clone()) {
            Entry::Occupied(_) => Err(SatchelError::TransactionAlreadyActive {
                context: ctx.clone(),
            }),
            Entry::Vacant(slot) => {
                debug!(context = %ctx, connection = conn.id(), "connection bound");
                slot.insert(Binding {
                    conn,
                    state: TransactionState::Active,
                });
                Ok(())
            }
        }
    }

    /// Transition the context's binding from `Active` to `Finalizing` and
    /// hand the bound connection to the coordinator.
    ///
    /// Fails when the context has no Active binding, so commit/rollback on
    /// an idle context is rejected instead of touching a foreign connection.
    pub(crate) fn begin_finalizing(
        &self,
        ctx: &ExecutionContext,
        operation: &'static str,
    ) -> Result<Arc<PhysicalConnection>, SatchelError> {
        let mut bindings = self.bindings.lock();
        match bindings.get_mut(ctx) {
            Some(binding) if binding.state == TransactionState::Active => {
                binding.state = TransactionState::Finalizing;
                Ok(Arc::clone(&binding.conn))
            }
            Some(binding) => Err(translate::boundary(
                operation,
                format!(
                    "context {ctx} is {:?}, not Active",
                    binding.state
                ),
            )),
            None => Err(translate::boundary(
                operation,
                format!("no active transaction for context {ctx}"),
            )),
        }
    }

    /// Mark the binding `Closed` and destroy it, returning the connection
    /// for release. Idempotent: a second close is a no-op returning `None`.
    pub(crate) fn close(&self, ctx: &ExecutionContext) -> Option<Arc<PhysicalConnection>> {
        let mut bindings = self.bindings.lock();
        if let Some(binding) = bindings.get_mut(ctx) {
            binding.state = TransactionState::Closed;
            debug!(context = %ctx, connection = binding.conn.id(), "transaction closed");
        }
        bindings.remove(ctx).map(|binding| binding.conn)
    }
}

/// Scoped access to a resolved connection.
///
/// Bound leases borrow the transaction's connection and leave it bound on
/// drop; ephemeral leases own their checkout and return it to the pool on
/// drop, so release is guaranteed on every exit path.
pub struct ConnectionLease {
    conn: Arc<PhysicalConnection>,
    reclaim: Option<Arc<ConnectionPool>>,
}

impl ConnectionLease {
    /// Run one closure against the leased connection.
    pub fn with<T>(
        &self,
        f: impl FnOnce(&mut rusqlite::Connection) -> rusqlite::Result<T>,
    ) -> rusqlite::Result<T> {
        self.conn.with(f)
    }

    /// The leased physical connection. Identity comparisons use
    /// `Arc::ptr_eq` on this.
    pub fn connection(&self) -> &Arc<PhysicalConnection> {
        &self.conn
    }

    /// Whether this lease came from the no-active-transaction path.
    pub fn is_ephemeral(&self) -> bool {
        self.reclaim.is_some()
    }
}

impl Drop for ConnectionLease {
    fn drop(&mut self) {
        if let Some(pool) = self.reclaim.take() {
            pool.release(Arc::clone(&self.conn));
        }
    }
}
