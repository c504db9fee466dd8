// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules: CRUD statements over an explicit connection.
//!
//! Functions here take `&mut rusqlite::Connection` and return raw
//! `rusqlite::Result`s; translation into the [`SatchelError`] taxonomy
//! happens one layer up, in the repository adapter.
//!
//! [`SatchelError`]: satchel_core::SatchelError

pub mod accounts;
