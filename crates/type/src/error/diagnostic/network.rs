// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

pub fn transport_error(message: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "NETWORK_002".to_string(),
		statement: None,
		message: format!("Transport error: {}", message.into()),
		label: None,
		help: Some("Check network connectivity".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// A call completed with a non-OK gRPC status; the status message is kept as is
pub fn status_error(code: impl Into<String>, message: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "NETWORK_003".to_string(),
		statement: None,
		message: message.into(),
		label: Some(code.into()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn bind_error(addr: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "NETWORK_004".to_string(),
		statement: None,
		message: format!("failed to bind {}: {}", addr, reason.into()),
		label: None,
		help: Some("Choose a free port or stop the process holding it".to_string()),
		notes: vec![],
		cause: None,
	}
}
