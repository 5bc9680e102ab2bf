// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Synchronous client. Each handle owns a share of a multi-threaded runtime
//! that keeps the callback session running between calls.

use std::sync::Arc;

use sqliteog_type::{Result, diagnostic::driver::runtime_error, error};
use tokio::runtime::Runtime;

use crate::{ExecResult, NamedValue, Rows, StatementOutcome, Value};

#[derive(Debug, Clone)]
pub struct Driver {
	inner: crate::Driver,
	runtime: Arc<Runtime>,
}

impl Driver {
	pub fn new() -> Result<Self> {
		Self::from_driver(crate::Driver::new())
	}

	pub fn from_driver(inner: crate::Driver) -> Result<Self> {
		let runtime = tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.thread_name("sqliteog-client")
			.build()
			.map_err(|e| error!(runtime_error(e.to_string())))?;
		Ok(Self {
			inner,
			runtime: Arc::new(runtime),
		})
	}

	pub fn with_function<F>(mut self, name: impl Into<String>, function: F) -> Self
	where
		F: Fn(&[String]) -> Vec<String> + Send + Sync + 'static,
	{
		self.inner = self.inner.with_function(name, function);
		self
	}

	pub fn open(&self, dsn: &str) -> Result<Connection> {
		let inner = self.runtime.block_on(self.inner.open(dsn))?;
		Ok(Connection {
			inner,
			runtime: self.runtime.clone(),
		})
	}
}

#[derive(Debug)]
pub struct Connection {
	inner: crate::Connection,
	runtime: Arc<Runtime>,
}

impl Connection {
	pub fn id(&self) -> &str {
		self.inner.id()
	}

	pub fn prepare(&self, sql: &str) -> Result<Statement<'_>> {
		let inner = self.inner.prepare(sql)?;
		Ok(Statement {
			inner,
			runtime: &self.runtime,
		})
	}

	pub fn execute(&self, sql: &str, args: &[NamedValue]) -> Result<ExecResult> {
		self.runtime.block_on(self.inner.execute(sql, args))
	}

	pub fn query(&self, sql: &str, args: &[NamedValue]) -> Result<Rows> {
		self.runtime.block_on(self.inner.query(sql, args))
	}

	pub fn execute_or_query(&self, sql: &str, args: &[NamedValue]) -> Result<StatementOutcome> {
		self.runtime.block_on(self.inner.execute_or_query(sql, args))
	}

	pub fn ping(&self) -> Result<()> {
		self.runtime.block_on(self.inner.ping())
	}

	pub fn is_valid(&self) -> bool {
		self.runtime.block_on(self.inner.is_valid())
	}

	pub fn reset_session(&self) -> Result<()> {
		self.runtime.block_on(self.inner.reset_session())
	}

	pub fn begin(&self) -> Result<()> {
		self.inner.begin()
	}

	pub fn close(&self) -> Result<()> {
		self.runtime.block_on(self.inner.close())
	}
}

#[derive(Debug)]
pub struct Statement<'a> {
	inner: crate::Statement<'a>,
	runtime: &'a Runtime,
}

impl Statement<'_> {
	pub fn num_input(&self) -> usize {
		self.inner.num_input()
	}

	pub fn execute(&self, args: &[NamedValue]) -> Result<ExecResult> {
		self.runtime.block_on(self.inner.execute(args))
	}

	pub fn query(&self, args: &[NamedValue]) -> Result<Rows> {
		self.runtime.block_on(self.inner.query(args))
	}

	pub fn exec(&self, values: &[Value]) -> Result<ExecResult> {
		self.runtime.block_on(self.inner.exec(values))
	}

	pub fn query_values(&self, values: &[Value]) -> Result<Rows> {
		self.runtime.block_on(self.inner.query_values(values))
	}

	pub fn close(&mut self) {
		self.inner.close()
	}
}
