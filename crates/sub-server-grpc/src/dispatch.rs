// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Statement dispatch.
//!
//! Resolves the statement's connection and runs it on a blocking thread, since
//! the engine may park inside a trampoline waiting for the client.

use std::sync::Arc;

use sqliteog_sqlite::{SqliteHandle, StatementKind, classify};
use sqliteog_type::{
	Error, Result,
	diagnostic::{connection, engine},
	error, return_error,
};
use sqliteog_wire::{ExecuteOrQueryResult, ExecuteResult, QueryResult, Statement};
use tokio::task::spawn_blocking;
use tracing::{debug, instrument};

use crate::registry::ConnectionRegistry;

#[derive(Clone)]
pub struct Dispatcher {
	registry: Arc<ConnectionRegistry>,
}

impl Dispatcher {
	pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
		Self {
			registry,
		}
	}

	/// Route a statement by kind and answer with the unified envelope.
	///
	/// Mutations fill the execute half and leave the row set empty.
	/// Projections fill the row set and report the row count as affected
	/// rows with a last insert id of -1.
	#[instrument(name = "dispatch::execute_or_query", level = "debug", skip_all, fields(cnx_id = %statement.cnx_id))]
	pub async fn execute_or_query(&self, statement: Statement) -> Result<ExecuteOrQueryResult> {
		match classify(&statement.sql) {
			StatementKind::Mutation => {
				let execute_result = self.execute(statement).await?;
				Ok(ExecuteOrQueryResult {
					query_result: Some(QueryResult::default()),
					execute_result: Some(execute_result),
				})
			}
			StatementKind::Projection => {
				let query_result = self.query(statement).await?;
				let affected_rows = query_result.rows.len() as i64;
				Ok(ExecuteOrQueryResult {
					query_result: Some(query_result),
					execute_result: Some(ExecuteResult {
						last_insert_id: -1,
						affected_rows,
					}),
				})
			}
		}
	}

	#[instrument(name = "dispatch::query", level = "debug", skip_all, fields(cnx_id = %statement.cnx_id))]
	pub async fn query(&self, statement: Statement) -> Result<QueryResult> {
		self.run(statement, SqliteHandle::query).await
	}

	#[instrument(name = "dispatch::execute", level = "debug", skip_all, fields(cnx_id = %statement.cnx_id))]
	pub async fn execute(&self, statement: Statement) -> Result<ExecuteResult> {
		self.run(statement, SqliteHandle::execute).await
	}

	async fn run<T>(&self, statement: Statement, f: fn(&SqliteHandle, &str, &[String]) -> Result<T>) -> Result<T>
	where
		T: Send + 'static,
	{
		if statement.cnx_id.is_empty() {
			return_error!(connection::empty_id());
		}
		let record = self.registry.get(&statement.cnx_id)?;
		debug!(sql = %statement.sql, params = ?statement.params, "running statement");

		spawn_blocking(move || {
			f(record.handle(), &statement.sql, &statement.params)
				.map_err(|Error(diagnostic)| Error(diagnostic.with_statement(statement.sql.as_str())))
		})
		.await
		.map_err(|e| error!(engine::task_failed(e.to_string())))?
	}
}

#[cfg(test)]
mod tests {
	use sqliteog_sqlite::SqliteFactory;

	use super::*;

	fn statement(cnx_id: &str, sql: &str, params: &[&str]) -> Statement {
		Statement {
			sql: sql.to_string(),
			params: params.iter().map(|p| p.to_string()).collect(),
			cnx_id: cnx_id.to_string(),
		}
	}

	async fn setup() -> (Dispatcher, String) {
		let registry = Arc::new(ConnectionRegistry::new(SqliteFactory::new(".")));
		let id = registry.connect(":memory:", vec![], vec![]).unwrap().to_string();
		let dispatcher = Dispatcher::new(registry);
		dispatcher
			.execute(statement(&id, "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)", &[]))
			.await
			.unwrap();
		(dispatcher, id)
	}

	#[tokio::test]
	async fn test_mutation_envelope() {
		let (dispatcher, id) = setup().await;
		let result = dispatcher
			.execute_or_query(statement(&id, "INSERT INTO t (name) VALUES (?)", &["alice"]))
			.await
			.unwrap();

		let execute = result.execute_result.unwrap();
		assert_eq!(execute.affected_rows, 1);
		assert_eq!(execute.last_insert_id, 1);
		assert!(result.query_result.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_projection_envelope() {
		let (dispatcher, id) = setup().await;
		for name in ["a", "b", "c"] {
			dispatcher.execute(statement(&id, "INSERT INTO t (name) VALUES (?)", &[name])).await.unwrap();
		}

		let result =
			dispatcher.execute_or_query(statement(&id, "SELECT name FROM t ORDER BY id", &[])).await.unwrap();
		let execute = result.execute_result.unwrap();
		assert_eq!(execute.last_insert_id, -1);
		assert_eq!(execute.affected_rows, 3);

		let query = result.query_result.unwrap();
		assert_eq!(query.columns, vec!["name"]);
		assert_eq!(query.rows.iter().map(|r| r.fields[0].as_str()).collect::<Vec<_>>(), vec!["a", "b", "c"]);
	}

	#[tokio::test]
	async fn test_update_of_missing_row() {
		let (dispatcher, id) = setup().await;
		let result = dispatcher
			.execute_or_query(statement(&id, "UPDATE t SET name = ? WHERE id = ?", &["bob", "42"]))
			.await
			.unwrap();
		assert_eq!(result.execute_result.unwrap().affected_rows, 0);
		assert!(result.query_result.unwrap().rows.is_empty());
	}

	#[tokio::test]
	async fn test_engine_error_is_returned_unchanged() {
		let (dispatcher, id) = setup().await;
		let err = dispatcher.query(statement(&id, "SELECT * FROM nope", &[])).await.unwrap_err();
		assert_eq!(err.code(), "ENGINE_001");
		assert_eq!(err.message, "no such table: nope");
		assert_eq!(err.statement.as_deref(), Some("SELECT * FROM nope"));
	}

	#[tokio::test]
	async fn test_connection_lookup_errors() {
		let (dispatcher, _) = setup().await;
		let err = dispatcher.query(statement("", "SELECT 1", &[])).await.unwrap_err();
		assert_eq!(err.code(), "CONNECTION_002");

		let err = dispatcher.execute(statement("ffffffff", "SELECT 1", &[])).await.unwrap_err();
		assert_eq!(err.code(), "CONNECTION_001");
	}
}
