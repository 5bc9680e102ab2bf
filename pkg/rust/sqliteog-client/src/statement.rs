// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use sqliteog_type::{Result, diagnostic::driver::connection_closed, error};

use crate::{Connection, ExecResult, NamedValue, Rows, Value};

/// A statement prepared on a [`Connection`]. Nothing is sent to the server
/// until it is executed.
#[derive(Debug)]
pub struct Statement<'a> {
	conn: &'a Connection,
	sql: String,
	num_input: usize,
	closed: bool,
}

impl<'a> Statement<'a> {
	pub(crate) fn new(conn: &'a Connection, sql: &str) -> Self {
		Self {
			conn,
			sql: sql.to_string(),
			num_input: sql.matches('?').count(),
			closed: false,
		}
	}

	pub fn sql(&self) -> &str {
		&self.sql
	}

	/// Number of `?` placeholders in the statement text.
	pub fn num_input(&self) -> usize {
		self.num_input
	}

	pub async fn execute(&self, args: &[NamedValue]) -> Result<ExecResult> {
		self.ensure_open()?;
		self.conn.execute(&self.sql, args).await
	}

	pub async fn query(&self, args: &[NamedValue]) -> Result<Rows> {
		self.ensure_open()?;
		self.conn.query(&self.sql, args).await
	}

	/// Executes with positional values; the value at index `i` binds `?`
	/// number `i + 1`.
	pub async fn exec(&self, values: &[Value]) -> Result<ExecResult> {
		self.execute(&NamedValue::positional(values)).await
	}

	pub async fn query_values(&self, values: &[Value]) -> Result<Rows> {
		self.query(&NamedValue::positional(values)).await
	}

	pub fn close(&mut self) {
		self.closed = true;
	}

	fn ensure_open(&self) -> Result<()> {
		if self.closed {
			return Err(error!(connection_closed()));
		}
		Ok(())
	}
}
