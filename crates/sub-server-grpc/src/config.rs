// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{path::PathBuf, time::Duration};

pub const DEFAULT_PORT: u16 = 9091;

/// Configuration of the gRPC server.
#[derive(Debug, Clone)]
pub struct GrpcConfig {
	/// Address and port to bind to.
	pub bind_addr: String,
	/// Directory file databases are created in.
	pub data_dir: PathBuf,
	/// Period of the connection stats log line; `None` disables it.
	pub stats_interval: Option<Duration>,
	/// Upper bound on a single remote function invocation; `None` waits
	/// forever.
	pub callback_timeout: Option<Duration>,
}

impl Default for GrpcConfig {
	fn default() -> Self {
		Self {
			bind_addr: format!("0.0.0.0:{}", DEFAULT_PORT),
			data_dir: PathBuf::from("."),
			stats_interval: None,
			callback_timeout: None,
		}
	}
}

impl GrpcConfig {
	pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
		self.bind_addr = addr.into();
		self
	}

	pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.data_dir = dir.into();
		self
	}

	pub fn stats_interval(mut self, interval: Option<Duration>) -> Self {
		self.stats_interval = interval.filter(|d| !d.is_zero());
		self
	}

	pub fn callback_timeout(mut self, timeout: Option<Duration>) -> Self {
		self.callback_timeout = timeout.filter(|d| !d.is_zero());
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = GrpcConfig::default();
		assert_eq!(config.bind_addr, "0.0.0.0:9091");
		assert_eq!(config.data_dir, PathBuf::from("."));
		assert!(config.stats_interval.is_none());
		assert!(config.callback_timeout.is_none());
	}

	#[test]
	fn test_zero_durations_disable() {
		let config = GrpcConfig::default()
			.stats_interval(Some(Duration::ZERO))
			.callback_timeout(Some(Duration::from_secs(0)));
		assert!(config.stats_interval.is_none());
		assert!(config.callback_timeout.is_none());

		let config = GrpcConfig::default().callback_timeout(Some(Duration::from_secs(30)));
		assert_eq!(config.callback_timeout, Some(Duration::from_secs(30)));
	}
}
