// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

pub fn invalid_dsn(dsn: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "DRIVER_001".to_string(),
		statement: None,
		message: format!("invalid data source name {:?}: {}", dsn, reason.into()),
		label: None,
		help: Some("Use the form host:port/databaseName".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn invalid_parameter(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "DRIVER_002".to_string(),
		statement: None,
		message: reason.into(),
		label: None,
		help: Some("Parameter ordinals start at 1 and must not exceed the argument count".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn empty_statement() -> Diagnostic {
	Diagnostic {
		code: "DRIVER_003".to_string(),
		statement: None,
		message: "empty query".to_string(),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn transactions_unsupported() -> Diagnostic {
	Diagnostic {
		code: "DRIVER_004".to_string(),
		statement: None,
		message: "transactions are not supported".to_string(),
		label: None,
		help: Some("Run each statement on its own".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn connection_closed() -> Diagnostic {
	Diagnostic {
		code: "DRIVER_005".to_string(),
		statement: None,
		message: "connection is closed".to_string(),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn runtime_error(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "DRIVER_006".to_string(),
		statement: None,
		message: format!("failed to start driver runtime: {}", reason.into()),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}
