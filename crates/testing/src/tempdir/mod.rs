// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	env, fs,
	path::{Path, PathBuf},
};

use uuid::Uuid;

/// Unique, not yet created path below the system temp directory.
pub fn temp_path() -> PathBuf {
	let mut path = env::temp_dir();
	path.push(format!("sqliteog-{}", Uuid::new_v4()));
	path
}

/// Run `f` with a fresh directory that is removed afterwards.
pub fn temp_dir<F>(f: F) -> std::io::Result<()>
where
	F: FnOnce(&Path) -> std::io::Result<()>,
{
	let path = temp_path();

	fs::create_dir(&path)?;
	let result = f(&path);

	let _ = fs::remove_dir_all(&path);
	result
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_temp_dir_is_removed() {
		let mut seen = None;
		temp_dir(|path| {
			assert!(path.is_dir());
			fs::write(path.join("a.db"), b"")?;
			seen = Some(path.to_path_buf());
			Ok(())
		})
		.unwrap();
		assert!(!seen.unwrap().exists());
	}
}
