// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	path::{Path, PathBuf},
	sync::Arc,
	time::Duration,
};

use parking_lot::Mutex;
use rusqlite::{Connection, params_from_iter};
use sqliteog_type::{
	Result,
	diagnostic::{connection, driver, engine},
	error,
};
use sqliteog_wire::{ExecuteResult, QueryResult, Row};
use tracing::{debug, instrument};

use crate::{
	channel::ChannelPair,
	connection::{connect, default_flags},
	path::DbPath,
	trampoline::Trampoline,
	value::render_value,
};

/// Opens engine handles with remote functions installed.
///
/// Every handle gets its own trampolines, so nothing is registered
/// process-wide and two connections never share a function table.
#[derive(Debug, Clone)]
pub struct SqliteFactory {
	data_dir: PathBuf,
	callback_timeout: Option<Duration>,
}

impl SqliteFactory {
	pub fn new(data_dir: impl Into<PathBuf>) -> Self {
		Self {
			data_dir: data_dir.into(),
			callback_timeout: None,
		}
	}

	pub fn with_callback_timeout(mut self, timeout: Option<Duration>) -> Self {
		self.callback_timeout = timeout;
		self
	}

	pub fn data_dir(&self) -> &Path {
		&self.data_dir
	}

	#[instrument(name = "sqlite::open", level = "debug", skip(self, channels))]
	pub fn open(&self, name: &str, functions: &[String], channels: Arc<ChannelPair>) -> Result<SqliteHandle> {
		let path = DbPath::resolve(&self.data_dir, name)?;
		let conn = connect(&path, default_flags())?;

		for function in functions {
			debug!(function = %function, "registering function");
			Trampoline::new(function.as_str(), channels.clone(), self.callback_timeout)
				.install(&conn)
				.map_err(|e| error!(connection::open_failed(&path.display_name(), e.to_string())))?;
		}

		Ok(SqliteHandle {
			path,
			conn: Mutex::new(Some(conn)),
		})
	}
}

/// An open engine handle. Closing releases the connection; every later call
/// fails.
#[derive(Debug)]
pub struct SqliteHandle {
	path: DbPath,
	conn: Mutex<Option<Connection>>,
}

impl SqliteHandle {
	pub fn path(&self) -> &DbPath {
		&self.path
	}

	pub fn is_closed(&self) -> bool {
		self.conn.lock().is_none()
	}

	/// Run a statement and materialise every row as text.
	///
	/// Blocks for as long as the statement runs, including any remote
	/// function invocations it makes.
	pub fn query(&self, sql: &str, params: &[String]) -> Result<QueryResult> {
		self.with_connection(|conn| {
			let mut stmt = conn.prepare(sql)?;
			let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
			let column_types: Vec<String> = stmt
				.columns()
				.iter()
				.map(|column| column.decl_type().map(str::to_uppercase).unwrap_or_default())
				.collect();

			let mut rows = stmt.query(params_from_iter(params.iter()))?;
			let mut result = Vec::new();
			while let Some(row) = rows.next()? {
				let mut fields = Vec::with_capacity(column_types.len());
				for (idx, declared) in column_types.iter().enumerate() {
					fields.push(render_value(row.get_ref(idx)?, declared));
				}
				result.push(Row {
					fields,
				});
			}

			Ok(QueryResult {
				columns,
				column_types,
				rows: result,
			})
		})
	}

	/// Run a statement for its side effects.
	///
	/// Rows the statement produces are stepped through and discarded, so a
	/// projection sent down this path reports zero affected rows instead of
	/// failing.
	pub fn execute(&self, sql: &str, params: &[String]) -> Result<ExecuteResult> {
		self.with_connection(|conn| {
			let mut stmt = conn.prepare(sql)?;
			let readonly = stmt.readonly();
			let mut rows = stmt.query(params_from_iter(params.iter()))?;
			while rows.next()?.is_some() {}
			drop(rows);

			let affected_rows = if readonly {
				0
			} else {
				conn.changes() as i64
			};
			Ok(ExecuteResult {
				last_insert_id: conn.last_insert_rowid(),
				affected_rows,
			})
		})
	}

	/// Release the connection. Closing twice is a no-op.
	pub fn close(&self) -> Result<()> {
		let Some(conn) = self.conn.lock().take() else {
			return Ok(());
		};
		conn.close().map_err(|(_, e)| error!(connection::close_failed(&self.path.display_name(), e.to_string())))
	}

	fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T> {
		let guard = self.conn.lock();
		let conn = guard.as_ref().ok_or_else(|| error!(driver::connection_closed()))?;
		f(conn).map_err(|e| error!(engine::engine_error(e.to_string())))
	}
}
