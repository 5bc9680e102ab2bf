// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

/// The callback stream was opened without a usable `cnx_id` metadata value
pub fn invalid_metadata(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "CALLBACK_001".to_string(),
		statement: None,
		message: format!("invalid callback metadata: {}", reason.into()),
		label: None,
		help: Some("Tag the callback stream with exactly one cnx_id metadata value".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// The peer delivered a result while no invocation was outstanding
pub fn unsolicited_result() -> Diagnostic {
	Diagnostic {
		code: "CALLBACK_002".to_string(),
		statement: None,
		message: "received invocation result with no invocation in flight".to_string(),
		label: None,
		help: Some("Send exactly one result per Invoke message".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// A second invocation started while one was still outstanding on the connection
pub fn concurrent_invocation(function_name: &str) -> Diagnostic {
	Diagnostic {
		code: "CALLBACK_003".to_string(),
		statement: None,
		message: format!("invocation of {} overlaps an outstanding invocation", function_name),
		label: None,
		help: None,
		notes: vec!["invocations on a connection carry no correlation id and must strictly alternate".to_string()],
		cause: None,
	}
}

/// A callback stream is already attached to the connection
pub fn stream_already_attached(id: &str) -> Diagnostic {
	Diagnostic {
		code: "CALLBACK_004".to_string(),
		statement: None,
		message: format!("a callback stream is already attached to connection {}", id),
		label: None,
		help: Some("Open at most one callback stream per connection".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// The peer was asked to evaluate a function it does not implement
pub fn unregistered_function(function_name: &str) -> Diagnostic {
	Diagnostic {
		code: "CALLBACK_005".to_string(),
		statement: None,
		message: format!("function {} is not registered", function_name),
		label: None,
		help: Some("Register the function with the driver before connecting".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// No result arrived for an invocation within the configured timeout
pub fn timeout(function_name: &str, millis: u128) -> Diagnostic {
	Diagnostic {
		code: "CALLBACK_006".to_string(),
		statement: None,
		message: format!("invocation of {} timed out after {}ms", function_name, millis),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// The callback stream went away while an invocation was waiting on it
pub fn channel_closed(function_name: &str) -> Diagnostic {
	Diagnostic {
		code: "CALLBACK_007".to_string(),
		statement: None,
		message: format!("callback channel closed while invoking {}", function_name),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// The implementing side reported a failure evaluating the function
pub fn remote_failure(function_name: &str, reason: &str) -> Diagnostic {
	Diagnostic {
		code: "CALLBACK_008".to_string(),
		statement: None,
		message: format!("{}: {}", function_name, reason),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// A client function panicked while being evaluated
pub fn function_panicked(function_name: &str) -> Diagnostic {
	Diagnostic {
		code: "CALLBACK_009".to_string(),
		statement: None,
		message: format!("function {} panicked", function_name),
		label: None,
		help: Some("The function's panic is reported to the server in place of a result".to_string()),
		notes: vec![],
		cause: None,
	}
}
