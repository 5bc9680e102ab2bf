// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use sqliteog_type::{Error, diagnostic::network};

pub fn transport_error(err: tonic::transport::Error) -> Error {
	Error(network::transport_error(err.to_string()))
}

/// Error for a call the server answered with a non-OK status. The status
/// message, which carries engine errors verbatim, becomes the error message.
pub fn status_error(status: tonic::Status) -> Error {
	Error(network::status_error(format!("{:?}", status.code()), status.message()))
}

#[cfg(test)]
mod tests {
	use tonic::{Code, Status};

	use super::*;

	#[test]
	fn test_status_message_is_kept() {
		let err = status_error(Status::new(Code::Unknown, "no such table: t"));
		assert_eq!(err.code(), "NETWORK_003");
		assert_eq!(err.message, "no such table: t");
		assert_eq!(err.label.as_deref(), Some("Unknown"));
	}
}
