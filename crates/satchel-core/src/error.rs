// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Satchel data-access toolkit.
//!
//! Backend-native errors are translated into this taxonomy at the
//! repository/coordinator boundary and never cross above it in raw form.
//! Every translated variant keeps the original failure as its source so the
//! causal chain stays available for diagnostics.

use thiserror::Error;

use crate::context::ExecutionContext;

/// The primary error type surfaced by repositories and the transaction
/// coordinator.
///
/// Four categories: connection acquisition (including pool exhaustion),
/// statement execution, business-level absence, and transaction boundary
/// failures (`TransactionAlreadyActive` is the begin-refused flavor of the
/// boundary category).
#[derive(Debug, Error)]
pub enum SatchelError {
    /// A connection could not be opened or checked out of the pool.
    #[error("connection acquisition failed: {source}")]
    ConnectionAcquisition {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No pooled connection became idle within the acquire timeout.
    #[error("connection pool exhausted after waiting {waited:?}")]
    PoolExhausted { waited: std::time::Duration },

    /// The backend rejected a statement.
    #[error("statement execution failed: {source}")]
    StatementExecution {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No row matched the requested id. This is a business-level absence,
    /// not a connection problem, and triggers no rollback by itself.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A second `begin` was issued for a context that already holds a
    /// transaction. Transactions are flat; there is no nesting.
    #[error("transaction already active for context {context}")]
    TransactionAlreadyActive { context: ExecutionContext },

    /// The transaction machinery itself failed (`begin` or `commit`).
    #[error("transaction {operation} failed: {source}")]
    TransactionBoundary {
        operation: &'static str,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
