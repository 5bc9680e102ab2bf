// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

pub fn internal(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "INTERNAL_001".to_string(),
		statement: None,
		message: format!("internal error: {}", reason.into()),
		label: None,
		help: Some("This is a bug, please report it".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn shutdown_failed(component: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "INTERNAL_002".to_string(),
		statement: None,
		message: format!("{} failed to shut down: {}", component, reason.into()),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}
