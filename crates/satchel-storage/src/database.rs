// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level connection opening with PRAGMA setup.
//!
//! Every physical connection in the pool goes through [`open_connection`] so
//! all of them share the same journal mode, busy timeout, and foreign-key
//! enforcement.

use std::path::Path;
use std::time::Duration;

use tracing::debug;

/// SQLite-level wait before a locked database surfaces `SQLITE_BUSY`.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open one physical connection with the standard session setup applied.
pub(crate) fn open_connection(
    path: &Path,
    wal_mode: bool,
) -> Result<rusqlite::Connection, rusqlite::Error> {
    let conn = rusqlite::Connection::open(path)?;
    if wal_mode {
        // journal_mode returns the resulting mode as a row, so it cannot go
        // through execute_batch.
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
    }
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    debug!(path = %path.display(), wal_mode, "connection opened");
    Ok(conn)
}
