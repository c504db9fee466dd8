// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`AccountStore`] contract.
//!
//! Each operation is one registry resolve followed by one statement. Inside
//! a coordinated unit of work the resolve yields the transaction's bound
//! connection; outside one it yields an ephemeral pooled connection that is
//! released as soon as the lease drops. The repository itself never begins,
//! commits, or rolls anything back.

use std::sync::Arc;

use satchel_core::{Account, AccountId, AccountStore, ExecutionContext, SatchelError};
use tracing::debug;

use crate::queries;
use crate::registry::ConnectionBindingRegistry;
use crate::translate;

/// Transaction-agnostic account repository over the binding registry.
pub struct SqliteAccountRepository {
    registry: Arc<ConnectionBindingRegistry>,
}

impl SqliteAccountRepository {
    pub fn new(registry: Arc<ConnectionBindingRegistry>) -> Self {
        Self { registry }
    }
}

impl AccountStore for SqliteAccountRepository {
    fn create(&self, ctx: &ExecutionContext, account: Account) -> Result<Account, SatchelError> {
        let lease = self.registry.resolve(ctx)?;
        lease
            .with(|conn| queries::accounts::insert(conn, &account))
            .map_err(translate::statement)?;
        Ok(account)
    }

    fn find_by_id(&self, ctx: &ExecutionContext, id: &AccountId) -> Result<Account, SatchelError> {
        let lease = self.registry.resolve(ctx)?;
        let found = lease
            .with(|conn| queries::accounts::select_by_id(conn, id))
            .map_err(translate::statement)?;
        found.ok_or_else(|| SatchelError::NotFound {
            entity: "account",
            id: id.to_string(),
        })
    }

    fn update(
        &self,
        ctx: &ExecutionContext,
        id: &AccountId,
        balance: i64,
    ) -> Result<(), SatchelError> {
        let lease = self.registry.resolve(ctx)?;
        let rows = lease
            .with(|conn| queries::accounts::update_balance(conn, id, balance))
            .map_err(translate::statement)?;
        debug!(account = %id, rows, "account updated");
        Ok(())
    }

    fn delete(&self, ctx: &ExecutionContext, id: &AccountId) -> Result<(), SatchelError> {
        let lease = self.registry.resolve(ctx)?;
        let rows = lease
            .with(|conn| queries::accounts::delete(conn, id))
            .map_err(translate::statement)?;
        debug!(account = %id, rows, "account deleted");
        Ok(())
    }
}
