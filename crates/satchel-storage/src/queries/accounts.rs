// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account CRUD statements.

use rusqlite::params;
use satchel_core::{Account, AccountId};

/// Insert a new account row.
pub fn insert(conn: &mut rusqlite::Connection, account: &Account) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO accounts (id, balance) VALUES (?1, ?2)",
        params![account.id.as_str(), account.balance],
    )?;
    Ok(())
}

/// Select one account by id. Returns `None` when no row matches.
pub fn select_by_id(
    conn: &mut rusqlite::Connection,
    id: &AccountId,
) -> rusqlite::Result<Option<Account>> {
    let result = conn.query_row(
        "SELECT id, balance FROM accounts WHERE id = ?1",
        params![id.as_str()],
        |row| {
            Ok(Account {
                id: AccountId(row.get(0)?),
                balance: row.get(1)?,
            })
        },
    );
    match result {
        Ok(account) => Ok(Some(account)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Set an account's balance. Returns the number of affected rows.
pub fn update_balance(
    conn: &mut rusqlite::Connection,
    id: &AccountId,
    balance: i64,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE accounts SET balance = ?1 WHERE id = ?2",
        params![balance, id.as_str()],
    )
}

/// Delete an account row. Returns the number of affected rows.
pub fn delete(conn: &mut rusqlite::Connection, id: &AccountId) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM accounts WHERE id = ?1",
        params![id.as_str()],
    )
}
