// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Embedded engine boundary.
//!
//! Opens SQLite databases through [`SqliteFactory`], installs one
//! [`Trampoline`] per remotely implemented function, and runs statements on
//! the resulting [`SqliteHandle`]. Invocations leave the engine through the
//! per-connection [`ChannelPair`].

mod channel;
mod classify;
mod connection;
mod handle;
mod path;
mod trampoline;
mod value;

pub use channel::{ChannelPair, Invocation, InvocationOutcome, RequestStream};
pub use classify::{StatementKind, classify};
pub use handle::{SqliteFactory, SqliteHandle};
pub use path::{DEFAULT_DB_NAME, DbPath, MEMORY, normalize_db_name};
pub use trampoline::Trampoline;
pub use value::{render_value, timestamp_type};
