// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SQLite connection utilities.

use rusqlite::{Connection, OpenFlags};
use sqliteog_type::{Result, diagnostic::connection::open_failed, error};

use crate::path::{DbPath, ensure_parent};

pub(crate) fn default_flags() -> OpenFlags {
	OpenFlags::SQLITE_OPEN_READ_WRITE
		| OpenFlags::SQLITE_OPEN_CREATE
		| OpenFlags::SQLITE_OPEN_URI
		| OpenFlags::SQLITE_OPEN_NO_MUTEX
}

/// Open a database, creating the parent directory of file databases.
pub(crate) fn connect(path: &DbPath, flags: OpenFlags) -> Result<Connection> {
	ensure_parent(path).map_err(|e| error!(open_failed(&path.display_name(), e.to_string())))?;

	match path {
		DbPath::Memory => Connection::open_in_memory_with_flags(flags),
		DbPath::File(file) => Connection::open_with_flags(file, flags),
	}
	.map_err(|e| error!(open_failed(&path.display_name(), e.to_string())))
}
