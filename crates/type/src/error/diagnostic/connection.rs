// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

/// No live connection is registered under the identifier
pub fn not_found(id: &str) -> Diagnostic {
	Diagnostic {
		code: "CONNECTION_001".to_string(),
		statement: None,
		message: format!("connection {} not found", id),
		label: None,
		help: Some("Open a new connection; the identifier is unknown or already closed".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// A request carried an empty connection identifier
pub fn empty_id() -> Diagnostic {
	Diagnostic {
		code: "CONNECTION_002".to_string(),
		statement: None,
		message: "connection id is empty".to_string(),
		label: None,
		help: Some("Pass the identifier returned by the Connection call".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// The embedded engine could not open the database
pub fn open_failed(name: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "CONNECTION_003".to_string(),
		statement: None,
		message: format!("failed to open database {}: {}", name, reason.into()),
		label: None,
		help: Some("Check that the data directory exists and is writable".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// Releasing an engine handle failed
pub fn close_failed(id: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "CONNECTION_004".to_string(),
		statement: None,
		message: format!("failed to close connection {}: {}", id, reason.into()),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}
