// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite connection pooling and unit-of-work coordination.
//!
//! Provides a fixed-size connection pool, per-context connection binding, a
//! flat transaction coordinator with guaranteed release on every exit path,
//! and a transaction-agnostic account repository on top.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use satchel_config::SatchelConfig;
//! use satchel_core::{Account, AccountStore, ExecutionContext};
//! use satchel_storage::{
//!     ConnectionBindingRegistry, ConnectionPool, SqliteAccountRepository,
//!     TransactionCoordinator,
//! };
//!
//! # fn main() -> Result<(), satchel_core::SatchelError> {
//! let config = SatchelConfig::default();
//! let pool = Arc::new(ConnectionPool::open_with(&config.storage, &config.pool)?);
//! let registry = Arc::new(ConnectionBindingRegistry::new(Arc::clone(&pool)));
//! let coordinator = TransactionCoordinator::new(Arc::clone(&pool), Arc::clone(&registry));
//! let accounts = SqliteAccountRepository::new(Arc::clone(&registry));
//!
//! let ctx = ExecutionContext::new();
//! coordinator.run_in_transaction::<_, satchel_core::SatchelError, _>(&ctx, || {
//!     accounts.create(&ctx, Account::new("a-1", 100))?;
//!     accounts.update(&ctx, &"a-1".into(), 75)?;
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod coordinator;
mod database;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod registry;
pub mod repository;
pub mod transfer;
pub mod translate;

pub use coordinator::TransactionCoordinator;
pub use pool::{ConnectionPool, PhysicalConnection};
pub use registry::{ConnectionBindingRegistry, ConnectionLease, TransactionState};
pub use repository::SqliteAccountRepository;
pub use transfer::{TransferError, TransferService};
