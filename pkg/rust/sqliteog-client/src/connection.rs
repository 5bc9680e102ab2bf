// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use sqliteog_type::{
	Result,
	diagnostic::driver::{connection_closed, empty_statement, transactions_unsupported},
	error, return_error,
};
use sqliteog_wire::{ConnectionId, Empty, SqliteOgClient};
use tonic::transport::Channel;
use tracing::{debug, instrument};

use crate::{
	Dsn, ExecResult, NamedValue, Rows, Statement, callback::CallbackSession, error::status_error,
	named_values_to_params,
};

/// Outcome of [`Connection::execute_or_query`]. Mutations carry an empty row
/// set; projections report the row count as affected rows.
#[derive(Debug, Clone)]
pub struct StatementOutcome {
	pub result: ExecResult,
	pub rows: Rows,
}

/// A connection to a database hosted by the server.
pub struct Connection {
	id: String,
	dsn: Dsn,
	client: SqliteOgClient<Channel>,
	session: Mutex<Option<CallbackSession>>,
	closed: AtomicBool,
}

impl Connection {
	pub(crate) fn new(id: String, dsn: Dsn, client: SqliteOgClient<Channel>, session: Option<CallbackSession>) -> Self {
		Self {
			id,
			dsn,
			client,
			session: Mutex::new(session),
			closed: AtomicBool::new(false),
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn dsn(&self) -> &Dsn {
		&self.dsn
	}

	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::Acquire)
	}

	pub fn prepare(&self, sql: &str) -> Result<Statement<'_>> {
		self.ensure_open()?;
		if sql.is_empty() {
			return_error!(empty_statement());
		}
		Ok(Statement::new(self, sql))
	}

	#[instrument(name = "connection::execute", level = "debug", skip(self, args), fields(cnx_id = %self.id))]
	pub async fn execute(&self, sql: &str, args: &[NamedValue]) -> Result<ExecResult> {
		let statement = self.statement(sql, args)?;
		let result = self.client.clone().execute(statement).await.map_err(status_error)?.into_inner();
		Ok(result.into())
	}

	#[instrument(name = "connection::query", level = "debug", skip(self, args), fields(cnx_id = %self.id))]
	pub async fn query(&self, sql: &str, args: &[NamedValue]) -> Result<Rows> {
		let statement = self.statement(sql, args)?;
		let result = self.client.clone().query(statement).await.map_err(status_error)?.into_inner();
		Ok(Rows::new(result))
	}

	#[instrument(name = "connection::execute_or_query", level = "debug", skip(self, args), fields(cnx_id = %self.id))]
	pub async fn execute_or_query(&self, sql: &str, args: &[NamedValue]) -> Result<StatementOutcome> {
		let statement = self.statement(sql, args)?;
		let outcome = self.client.clone().execute_or_query(statement).await.map_err(status_error)?.into_inner();
		Ok(StatementOutcome {
			result: outcome.execute_result.unwrap_or_default().into(),
			rows: Rows::new(outcome.query_result.unwrap_or_default()),
		})
	}

	pub async fn ping(&self) -> Result<()> {
		self.client.clone().ping(Empty {}).await.map_err(status_error)?;
		Ok(())
	}

	/// Whether the server still knows this connection.
	pub async fn is_valid(&self) -> bool {
		if self.is_closed() {
			return false;
		}
		self.client.clone().is_valid(self.connection_id()).await.is_ok()
	}

	/// Checks that the connection is still usable before it is reused.
	pub async fn reset_session(&self) -> Result<()> {
		self.ensure_open()?;
		self.client.clone().reset_session(self.connection_id()).await.map_err(status_error)?;
		Ok(())
	}

	pub fn begin(&self) -> Result<()> {
		return_error!(transactions_unsupported())
	}

	/// Stops the callback session, then releases the connection on the
	/// server. Closing twice is a no-op.
	#[instrument(name = "connection::close", level = "debug", skip(self), fields(cnx_id = %self.id))]
	pub async fn close(&self) -> Result<()> {
		if self.closed.swap(true, Ordering::AcqRel) {
			return Ok(());
		}

		let session = self.session.lock().take();
		if let Some(session) = session {
			session.close().await;
		}

		self.client.clone().close(self.connection_id()).await.map_err(status_error)?;
		debug!("connection closed");
		Ok(())
	}

	fn ensure_open(&self) -> Result<()> {
		if self.is_closed() {
			return Err(error!(connection_closed()));
		}
		Ok(())
	}

	fn connection_id(&self) -> ConnectionId {
		ConnectionId {
			id: self.id.clone(),
		}
	}

	fn statement(&self, sql: &str, args: &[NamedValue]) -> Result<sqliteog_wire::Statement> {
		self.ensure_open()?;
		let params = named_values_to_params(args).map_err(|e| error!(e))?;
		Ok(sqliteog_wire::Statement {
			sql: sql.to_string(),
			params,
			cnx_id: self.id.clone(),
		})
	}
}

impl Drop for Connection {
	fn drop(&mut self) {
		if let Some(session) = self.session.get_mut().take() {
			session.cancel();
		}
	}
}

impl std::fmt::Debug for Connection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Connection").field("id", &self.id).field("dsn", &self.dsn).field("closed", &self.is_closed()).finish()
	}
}
