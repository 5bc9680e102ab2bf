// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use sqliteog_type::{Diagnostic, IntoDiagnostic, diagnostic::driver::invalid_dsn};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DsnError {
	#[error("missing database name, expected host:port/databaseName")]
	MissingDatabase,
	#[error("missing port, expected host:port/databaseName")]
	MissingPort,
	#[error("missing host, expected host:port/databaseName")]
	MissingHost,
	#[error("invalid port {0:?}")]
	InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsnParseError {
	pub dsn: String,
	pub kind: DsnError,
}

impl IntoDiagnostic for DsnParseError {
	fn into_diagnostic(self) -> Diagnostic {
		invalid_dsn(&self.dsn, self.kind.to_string())
	}
}

/// Data source name of the form `host:port/databaseName`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
	pub host: String,
	pub port: u16,
	pub database: String,
}

impl Dsn {
	pub fn parse(dsn: &str) -> Result<Self, DsnParseError> {
		Self::parse_parts(dsn).map_err(|kind| DsnParseError {
			dsn: dsn.to_string(),
			kind,
		})
	}

	fn parse_parts(dsn: &str) -> Result<Self, DsnError> {
		let (address, database) = dsn.split_once('/').ok_or(DsnError::MissingDatabase)?;
		if database.trim().is_empty() {
			return Err(DsnError::MissingDatabase);
		}
		let (host, port) = address.rsplit_once(':').ok_or(DsnError::MissingPort)?;
		if host.is_empty() {
			return Err(DsnError::MissingHost);
		}
		if port.is_empty() {
			return Err(DsnError::MissingPort);
		}
		let port = port.parse::<u16>().map_err(|_| DsnError::InvalidPort(port.to_string()))?;

		Ok(Self {
			host: host.to_string(),
			port,
			database: database.to_string(),
		})
	}

	/// Endpoint URI for the gRPC channel.
	pub fn endpoint(&self) -> String {
		format!("http://{}:{}", self.host, self.port)
	}
}

impl FromStr for Dsn {
	type Err = DsnParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Dsn::parse(s)
	}
}

impl Display for Dsn {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}/{}", self.host, self.port, self.database)
	}
}
