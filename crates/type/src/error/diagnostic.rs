// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub mod callback;
pub mod connection;
pub mod driver;
pub mod engine;
pub mod internal;
pub mod network;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub statement: Option<String>,
	pub message: String,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

impl Diagnostic {
	/// Attach the SQL text the failure relates to.
	pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
		self.statement = Some(statement.into());
		self
	}

	pub fn with_cause(mut self, cause: Diagnostic) -> Self {
		self.cause = Some(Box::new(cause));
		self
	}
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.message)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_serialize_diagnostic() {
		let diagnostic = connection::not_found("deadbeef").with_statement("SELECT 1");
		let json = serde_json::to_string(&diagnostic).unwrap();
		assert!(json.contains("\"code\":\"CONNECTION_001\""));
		assert!(json.contains("\"statement\":\"SELECT 1\""));

		let back: Diagnostic = serde_json::from_str(&json).unwrap();
		assert_eq!(back, diagnostic);
	}

	#[test]
	fn test_cause_chain() {
		let diagnostic = connection::open_failed("users.db", "disk I/O error")
			.with_cause(engine::engine_error("disk I/O error"));
		let cause = diagnostic.cause.as_ref().unwrap();
		assert_eq!(cause.code, "ENGINE_001");
	}
}
