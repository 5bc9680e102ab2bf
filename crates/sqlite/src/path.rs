// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::{Component, Path, PathBuf};

use sqliteog_type::{Result, diagnostic::connection, return_error};
use tracing::warn;

pub const MEMORY: &str = ":memory:";
pub const DEFAULT_DB_NAME: &str = "test";

/// Location of a database as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbPath {
	Memory,
	File(PathBuf),
}

impl DbPath {
	/// Resolve a client supplied database name below `data_dir`. The name
	/// must be a plain file name; absolute paths, separators and `..` are
	/// rejected.
	pub fn resolve(data_dir: &Path, name: &str) -> Result<Self> {
		let normalized = normalize_db_name(name);
		if normalized == MEMORY {
			return Ok(DbPath::Memory);
		}

		if normalized.contains(['/', '\\']) || normalized.contains("..") {
			return_error!(connection::open_failed(name, "database name must not contain path separators or '..'"));
		}
		let mut components = Path::new(&normalized).components();
		if !matches!((components.next(), components.next()), (Some(Component::Normal(_)), None)) {
			return_error!(connection::open_failed(name, "database name must be a plain file name"));
		}

		Ok(DbPath::File(data_dir.join(normalized)))
	}

	pub fn display_name(&self) -> String {
		match self {
			DbPath::Memory => MEMORY.to_string(),
			DbPath::File(path) => path.display().to_string(),
		}
	}
}

/// Normalise a database name: `:memory:` is kept, a blank name becomes the
/// default database, anything else gets exactly one `.db` suffix.
pub fn normalize_db_name(name: &str) -> String {
	if name == MEMORY {
		return name.to_string();
	}

	let trimmed = name.trim();
	if trimmed.is_empty() {
		warn!(dbname = DEFAULT_DB_NAME, "got empty database name, using default");
		return format!("{}.db", DEFAULT_DB_NAME);
	}

	let stem = trimmed.strip_suffix(".db").unwrap_or(trimmed).trim_end();
	format!("{}.db", stem)
}

/// Make sure the directory a database file lives in exists.
pub(crate) fn ensure_parent(path: &DbPath) -> std::io::Result<()> {
	match path {
		DbPath::Memory => Ok(()),
		DbPath::File(path) => match path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
			_ => Ok(()),
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_memory_is_kept() {
		assert_eq!(normalize_db_name(":memory:"), ":memory:");
		assert_eq!(DbPath::resolve(Path::new("/data"), ":memory:").unwrap(), DbPath::Memory);
	}

	#[test]
	fn test_blank_name_uses_default() {
		assert_eq!(normalize_db_name(""), "test.db");
		assert_eq!(normalize_db_name("   "), "test.db");
	}

	#[test]
	fn test_single_db_suffix() {
		assert_eq!(normalize_db_name("users"), "users.db");
		assert_eq!(normalize_db_name("users.db"), "users.db");
		assert_eq!(normalize_db_name("  users.db  "), "users.db");
		assert_eq!(normalize_db_name("users .db"), "users.db");
	}

	#[test]
	fn test_resolve_below_data_dir() {
		let path = DbPath::resolve(Path::new("/var/lib/sqliteog"), "orders").unwrap();
		assert_eq!(path, DbPath::File(PathBuf::from("/var/lib/sqliteog/orders.db")));
	}

	#[test]
	fn test_resolve_rejects_names_outside_data_dir() {
		for name in ["/etc/evil", "../../../tmp/evil", "nested/orders", "..\\evil", ".."] {
			let err = DbPath::resolve(Path::new("/var/lib/sqliteog"), name).unwrap_err();
			assert_eq!(err.code(), "CONNECTION_003", "{name}");
		}
	}
}
