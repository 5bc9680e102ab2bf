// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use sqliteog_type::{Result, diagnostic::internal::internal, error};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
	#[default]
	Text,
	Json,
}

impl FromStr for LogFormat {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"text" => Ok(LogFormat::Text),
			"json" => Ok(LogFormat::Json),
			other => Err(format!("unknown log format: {}", other)),
		}
	}
}

impl Display for LogFormat {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			LogFormat::Text => "text",
			LogFormat::Json => "json",
		})
	}
}

/// Builds and installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
#[derive(Debug, Clone)]
pub struct TracingBuilder {
	level: String,
	format: LogFormat,
	with_target: bool,
	with_time: bool,
}

impl Default for TracingBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl TracingBuilder {
	pub fn new() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Text,
			with_target: false,
			with_time: false,
		}
	}

	pub fn with_level(mut self, level: impl Into<String>) -> Self {
		self.level = level.into();
		self
	}

	pub fn with_format(mut self, format: LogFormat) -> Self {
		self.format = format;
		self
	}

	pub fn with_target(mut self, enabled: bool) -> Self {
		self.with_target = enabled;
		self
	}

	pub fn with_time(mut self, enabled: bool) -> Self {
		self.with_time = enabled;
		self
	}

	pub fn level(&self) -> &str {
		&self.level
	}

	pub fn format(&self) -> LogFormat {
		self.format
	}

	fn env_filter(&self) -> Result<EnvFilter> {
		if let Ok(filter) = EnvFilter::try_from_default_env() {
			return Ok(filter);
		}
		EnvFilter::try_new(&self.level)
			.map_err(|e| error!(internal(format!("invalid log level '{}': {}", self.level, e))))
	}

	/// Install the subscriber. Fails if one is already installed, which tests
	/// calling this repeatedly may ignore.
	pub fn try_init(self) -> Result<()> {
		let filter = self.env_filter()?;
		let registry = tracing_subscriber::registry().with(filter);

		let result = match (self.format, self.with_time) {
			(LogFormat::Text, true) => registry.with(fmt::layer().with_target(self.with_target)).try_init(),
			(LogFormat::Text, false) => {
				registry.with(fmt::layer().with_target(self.with_target).without_time()).try_init()
			}
			(LogFormat::Json, true) => {
				registry.with(fmt::layer().json().with_target(self.with_target)).try_init()
			}
			(LogFormat::Json, false) => {
				registry.with(fmt::layer().json().with_target(self.with_target).without_time()).try_init()
			}
		};
		result.map_err(|e| error!(internal(format!("failed to install tracing subscriber: {}", e))))
	}
}
