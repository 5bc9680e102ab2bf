// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

/// Error reported by the embedded engine; the message is kept verbatim
pub fn engine_error(message: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "ENGINE_001".to_string(),
		statement: None,
		message: message.into(),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// Blocking engine work could not be joined
pub fn task_failed(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "ENGINE_002".to_string(),
		statement: None,
		message: format!("engine task failed: {}", reason.into()),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}
