// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository contract for account persistence backends.

use crate::context::ExecutionContext;
use crate::error::SatchelError;
use crate::types::{Account, AccountId};

/// CRUD contract over the `accounts` store.
///
/// Implementations resolve "the current connection" for the given context
/// themselves and stay unaware of whether a transaction is active: the same
/// call works inside a coordinated unit of work (running on the bound
/// connection) and outside one (running on a short-lived pooled connection).
///
/// Implementations never begin, commit, or roll back transactions; that is
/// the coordinator's job.
pub trait AccountStore: Send + Sync {
    /// Persist a new account and return it.
    fn create(&self, ctx: &ExecutionContext, account: Account) -> Result<Account, SatchelError>;

    /// Look up an account by id. Fails with [`SatchelError::NotFound`] when
    /// no row matches.
    fn find_by_id(&self, ctx: &ExecutionContext, id: &AccountId) -> Result<Account, SatchelError>;

    /// Set an account's balance to a new value.
    fn update(
        &self,
        ctx: &ExecutionContext,
        id: &AccountId,
        balance: i64,
    ) -> Result<(), SatchelError>;

    /// Delete an account by id.
    fn delete(&self, ctx: &ExecutionContext, id: &AccountId) -> Result<(), SatchelError>;
}
