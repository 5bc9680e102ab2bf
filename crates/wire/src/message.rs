// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#[derive(Clone, PartialEq, prost::Message)]
pub struct ConnectionRequest {
	#[prost(string, tag = "1")]
	pub db_name: String,
	/// Names of scalar functions implemented by the caller
	#[prost(string, repeated, tag = "2")]
	pub functions: Vec<String>,
	/// Names of aggregate functions; recorded by the server, never installed
	#[prost(string, repeated, tag = "3")]
	pub aggregators: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ConnectionId {
	#[prost(string, tag = "1")]
	pub id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Statement {
	#[prost(string, tag = "1")]
	pub sql: String,
	#[prost(string, repeated, tag = "2")]
	pub params: Vec<String>,
	#[prost(string, tag = "3")]
	pub cnx_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Row {
	#[prost(string, repeated, tag = "1")]
	pub fields: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct QueryResult {
	#[prost(string, repeated, tag = "1")]
	pub columns: Vec<String>,
	#[prost(string, repeated, tag = "2")]
	pub column_types: Vec<String>,
	#[prost(message, repeated, tag = "3")]
	pub rows: Vec<Row>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ExecuteResult {
	#[prost(int64, tag = "1")]
	pub last_insert_id: i64,
	#[prost(int64, tag = "2")]
	pub affected_rows: i64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ExecuteOrQueryResult {
	#[prost(message, optional, tag = "1")]
	pub query_result: Option<QueryResult>,
	#[prost(message, optional, tag = "2")]
	pub execute_result: Option<ExecuteResult>,
}

/// Server to client: evaluate `function_name` with `args`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Invoke {
	#[prost(string, tag = "1")]
	pub function_name: String,
	#[prost(string, repeated, tag = "2")]
	pub args: Vec<String>,
}

/// Client to server: the answer to the most recent [`Invoke`].
#[derive(Clone, PartialEq, prost::Message)]
pub struct InvocationResult {
	#[prost(bool, tag = "1")]
	pub initial: bool,
	#[prost(string, repeated, tag = "2")]
	pub result: Vec<String>,
	/// Set when the client could not evaluate the function.
	#[prost(string, optional, tag = "3")]
	pub error: Option<String>,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Empty {}

impl QueryResult {
	pub fn is_empty(&self) -> bool {
		self.columns.is_empty() && self.rows.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use prost::Message;

	use super::*;

	#[test]
	fn test_invocation_result_error_is_optional() {
		let ok = InvocationResult {
			initial: false,
			result: vec!["16".to_string()],
			error: None,
		};
		let decoded = InvocationResult::decode(ok.encode_to_vec().as_slice()).unwrap();
		assert_eq!(decoded.error, None);
		assert_eq!(decoded.result, vec!["16"]);

		let failed = InvocationResult {
			initial: false,
			result: vec![],
			error: Some("function cube is not registered".to_string()),
		};
		let decoded = InvocationResult::decode(failed.encode_to_vec().as_slice()).unwrap();
		assert_eq!(decoded.error.as_deref(), Some("function cube is not registered"));
	}

	#[test]
	fn test_envelope_defaults_to_absent_halves() {
		let envelope = ExecuteOrQueryResult::default();
		assert!(envelope.query_result.is_none());
		assert!(envelope.execute_result.is_none());
		assert!(QueryResult::default().is_empty());
	}
}
