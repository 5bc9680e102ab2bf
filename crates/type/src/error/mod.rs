// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::Deref,
};

pub mod diagnostic;

pub use diagnostic::Diagnostic;

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Diagnostic);

impl Deref for Error {
	type Target = Diagnostic;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Error {
	pub fn diagnostic(self) -> Diagnostic {
		self.0
	}

	pub fn code(&self) -> &str {
		&self.0.code
	}
}

impl std::error::Error for Error {}

impl From<Diagnostic> for Error {
	fn from(diagnostic: Diagnostic) -> Self {
		Error(diagnostic)
	}
}

/// Conversion of a domain specific failure into a [`Diagnostic`].
pub trait IntoDiagnostic {
	fn into_diagnostic(self) -> Diagnostic;
}

impl IntoDiagnostic for Diagnostic {
	fn into_diagnostic(self) -> Diagnostic {
		self
	}
}

/// Builds an [`Error`] from anything that converts into a diagnostic.
#[macro_export]
macro_rules! error {
	($diagnostic:expr) => {
		$crate::Error($crate::IntoDiagnostic::into_diagnostic($diagnostic))
	};
}

/// Returns early with an [`Error`] built from the given diagnostic.
#[macro_export]
macro_rules! return_error {
	($diagnostic:expr) => {
		return Err($crate::error!($diagnostic).into())
	};
}

#[cfg(test)]
mod tests {
	use crate::diagnostic::{connection, engine};

	#[test]
	fn test_error_macro_wraps_diagnostic() {
		let err = crate::error!(connection::not_found("abcd1234"));
		assert_eq!(err.code(), "CONNECTION_001");
		assert!(err.message.contains("abcd1234"));
	}

	#[test]
	fn test_return_error_macro() {
		fn fails() -> crate::Result<()> {
			return_error!(connection::empty_id());
		}

		let err = fails().unwrap_err();
		assert_eq!(err.code(), "CONNECTION_002");
	}

	#[test]
	fn test_display_keeps_engine_message() {
		let err = crate::error!(engine::engine_error("no such table: t"));
		assert_eq!(err.to_string(), "no such table: t");
	}

	#[test]
	fn test_diagnostic_into_error() {
		let err: crate::Error = connection::empty_id().into();
		assert_eq!(err.clone().diagnostic().code, "CONNECTION_002");
	}
}
