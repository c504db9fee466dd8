// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Money transfer between two accounts as one unit of work.
//!
//! The canonical consumer of the coordinator: debit the source, validate the
//! destination, credit the destination. A failure anywhere between `begin`
//! and `commit` rolls the whole transfer back, so a half-applied debit can
//! never survive.

use std::collections::HashSet;
use std::sync::Arc;

use satchel_core::{Account, AccountId, AccountStore, ExecutionContext, SatchelError};
use thiserror::Error;
use tracing::debug;

use crate::coordinator::TransactionCoordinator;

/// Failures surfaced by [`TransferService::transfer`].
#[derive(Debug, Error)]
pub enum TransferError {
    /// The destination account is on the blocked list.
    #[error("transfer rejected: destination account {id} is blocked")]
    DestinationBlocked { id: AccountId },

    /// The underlying store failed (missing account, statement error,
    /// transaction boundary failure).
    #[error(transparent)]
    Store(#[from] SatchelError),
}

/// Transfers balance between accounts inside a coordinated transaction.
pub struct TransferService<S: AccountStore> {
    coordinator: Arc<TransactionCoordinator>,
    accounts: Arc<S>,
    blocked: HashSet<AccountId>,
}

impl<S: AccountStore> TransferService<S> {
    pub fn new(coordinator: Arc<TransactionCoordinator>, accounts: Arc<S>) -> Self {
        Self {
            coordinator,
            accounts,
            blocked: HashSet::new(),
        }
    }

    /// Mark account ids that may never receive transfers.
    pub fn with_blocked_accounts(mut self, ids: impl IntoIterator<Item = AccountId>) -> Self {
        self.blocked.extend(ids);
        self
    }

    /// Move `amount` from `from` to `to` atomically.
    ///
    /// Runs as one unit of work on the context's bound connection; on any
    /// failure (missing account, blocked destination, statement error) the
    /// debit is rolled back before the error surfaces.
    pub fn transfer(
        &self,
        ctx: &ExecutionContext,
        from: &AccountId,
        to: &AccountId,
        amount: i64,
    ) -> Result<(), TransferError> {
        self.coordinator.run_in_transaction(ctx, || {
            let source = self.accounts.find_by_id(ctx, from)?;
            let destination = self.accounts.find_by_id(ctx, to)?;

            self.accounts.update(ctx, from, source.balance - amount)?;
            self.validate(&destination)?;
            self.accounts
                .update(ctx, to, destination.balance + amount)?;

            debug!(%from, %to, amount, "transfer applied");
            Ok(())
        })
    }

    fn validate(&self, destination: &Account) -> Result<(), TransferError> {
        if self.blocked.contains(&destination.id) {
            return Err(TransferError::DestinationBlocked {
                id: destination.id.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::ConnectionPool;
    use crate::registry::ConnectionBindingRegistry;
    use crate::repository::SqliteAccountRepository;
    use std::time::Duration;
    use tempfile::{TempDir, tempdir};

    struct Fixture {
        pool: Arc<ConnectionPool>,
        repository: Arc<SqliteAccountRepository>,
        service: TransferService<SqliteAccountRepository>,
        _dir: TempDir,
    }

    fn setup(blocked: &[&str]) -> Fixture {
        let dir = tempdir().unwrap();
        let pool = Arc::new(
            ConnectionPool::open(
                &dir.path().join("transfer.db"),
                true,
                2,
                Duration::from_millis(200),
            )
            .unwrap(),
        );
        let registry = Arc::new(ConnectionBindingRegistry::new(Arc::clone(&pool)));
        let coordinator = Arc::new(TransactionCoordinator::new(
            Arc::clone(&pool),
            Arc::clone(&registry),
        ));
        let repository = Arc::new(SqliteAccountRepository::new(Arc::clone(&registry)));
        let service = TransferService::new(coordinator, Arc::clone(&repository))
            .with_blocked_accounts(blocked.iter().map(|id| AccountId::from(*id)));
        Fixture {
            pool,
            repository,
            service,
            _dir: dir,
        }
    }

    fn balance(f: &Fixture, id: &str) -> i64 {
        let ctx = ExecutionContext::named("assert");
        f.repository.find_by_id(&ctx, &id.into()).unwrap().balance
    }

    #[test]
    fn transfer_moves_balance_between_accounts() {
        let f = setup(&[]);
        let ctx = ExecutionContext::named("t-1");
        f.repository.create(&ctx, Account::new("a", 100)).unwrap();
        f.repository.create(&ctx, Account::new("b", 50)).unwrap();

        f.service
            .transfer(&ctx, &"a".into(), &"b".into(), 30)
            .unwrap();

        assert_eq!(balance(&f, "a"), 70);
        assert_eq!(balance(&f, "b"), 80);
        assert_eq!(f.pool.idle_count(), 2);
    }

    #[test]
    fn blocked_destination_rolls_the_debit_back() {
        let f = setup(&["ex"]);
        let ctx = ExecutionContext::named("t-1");
        f.repository.create(&ctx, Account::new("a", 100)).unwrap();
        f.repository.create(&ctx, Account::new("ex", 50)).unwrap();

        let err = f
            .service
            .transfer(&ctx, &"a".into(), &"ex".into(), 30)
            .unwrap_err();
        assert!(matches!(err, TransferError::DestinationBlocked { .. }));

        // The debit ran before validation; rollback must undo it.
        assert_eq!(balance(&f, "a"), 100);
        assert_eq!(balance(&f, "ex"), 50);
        assert_eq!(f.pool.idle_count(), 2);
    }

    #[test]
    fn missing_destination_fails_before_any_update() {
        let f = setup(&[]);
        let ctx = ExecutionContext::named("t-1");
        f.repository.create(&ctx, Account::new("a", 100)).unwrap();

        let err = f
            .service
            .transfer(&ctx, &"a".into(), &"ghost".into(), 30)
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::Store(SatchelError::NotFound { .. })
        ));
        assert_eq!(balance(&f, "a"), 100);
    }

    #[test]
    fn transfer_rejects_a_context_already_in_a_transaction() {
        let f = setup(&[]);
        let ctx = ExecutionContext::named("t-1");
        f.repository.create(&ctx, Account::new("a", 100)).unwrap();
        f.repository.create(&ctx, Account::new("b", 50)).unwrap();

        // Simulate a caller that already began a unit of work on this
        // context: flat transactions mean the nested begin must refuse.
        let coordinator = Arc::clone(&f.service.coordinator);
        coordinator.begin(&ctx).unwrap();
        let err = f
            .service
            .transfer(&ctx, &"a".into(), &"b".into(), 10)
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::Store(SatchelError::TransactionAlreadyActive { .. })
        ));
        coordinator.rollback(&ctx).unwrap();
    }
}
