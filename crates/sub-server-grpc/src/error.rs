// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Mapping of diagnostics onto gRPC status codes.

use sqliteog_type::Error;
use tonic::{Code, Status};

pub trait IntoStatus {
	fn into_status(self) -> Status;
}

impl IntoStatus for Error {
	fn into_status(self) -> Status {
		Status::new(status_code(self.code()), self.0.message)
	}
}

/// gRPC code for a diagnostic code. Engine failures are reported as
/// `UNKNOWN` with the engine's message untouched.
pub fn status_code(code: &str) -> Code {
	match code {
		"CONNECTION_001" | "DRIVER_005" => Code::NotFound,
		"CONNECTION_002" | "CALLBACK_001" => Code::InvalidArgument,
		"CALLBACK_002" => Code::FailedPrecondition,
		"CALLBACK_004" => Code::AlreadyExists,
		"ENGINE_001" => Code::Unknown,
		_ => Code::Internal,
	}
}

#[cfg(test)]
mod tests {
	use sqliteog_type::{
		diagnostic::{callback, connection, engine},
		error,
	};

	use super::*;

	#[test]
	fn test_not_found() {
		let status = error!(connection::not_found("0badf00d")).into_status();
		assert_eq!(status.code(), Code::NotFound);
		assert!(status.message().contains("0badf00d"));
	}

	#[test]
	fn test_engine_message_unchanged() {
		let status = error!(engine::engine_error("near \"SELEC\": syntax error")).into_status();
		assert_eq!(status.code(), Code::Unknown);
		assert_eq!(status.message(), "near \"SELEC\": syntax error");
	}

	#[test]
	fn test_protocol_violations() {
		assert_eq!(error!(connection::empty_id()).into_status().code(), Code::InvalidArgument);
		assert_eq!(error!(callback::invalid_metadata("missing")).into_status().code(), Code::InvalidArgument);
		assert_eq!(error!(callback::unsolicited_result()).into_status().code(), Code::FailedPrecondition);
		assert_eq!(error!(callback::stream_already_attached("a")).into_status().code(), Code::AlreadyExists);
		assert_eq!(error!(connection::open_failed("x.db", "denied")).into_status().code(), Code::Internal);
	}
}
