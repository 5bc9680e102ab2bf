// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use sqliteog_sub_server_grpc::{GrpcConfig, config::DEFAULT_PORT};
use sqliteog_sub_tracing::{LogFormat, TracingBuilder};

#[derive(Parser, Debug)]
#[command(name = "sqliteog-server", version, about = "SQLite databases over gRPC with caller-side SQL functions")]
pub struct Args {
	/// The server port.
	#[arg(long, default_value_t = DEFAULT_PORT)]
	pub port: u16,

	/// Address to bind to.
	#[arg(long, default_value = "0.0.0.0")]
	pub bind: String,

	/// Directory database files are created in.
	#[arg(long, default_value = ".")]
	pub data_dir: PathBuf,

	/// Interval in seconds for logging connection stats, 0 disables.
	#[arg(long, default_value_t = 0)]
	pub stats_interval: u64,

	/// Seconds to wait for a remote function result, 0 waits forever.
	#[arg(long, default_value_t = 0)]
	pub callback_timeout: u64,

	/// Minimum log level (debug, info, warn, error).
	#[arg(long, default_value = "info")]
	pub log_level: String,

	/// Log format (text, json).
	#[arg(long, default_value_t = LogFormat::Text)]
	pub log_format: LogFormat,
}

impl Args {
	pub fn grpc_config(&self) -> GrpcConfig {
		GrpcConfig::default()
			.bind_addr(format!("{}:{}", self.bind, self.port))
			.data_dir(&self.data_dir)
			.stats_interval(seconds(self.stats_interval))
			.callback_timeout(seconds(self.callback_timeout))
	}

	pub fn tracing(&self) -> TracingBuilder {
		TracingBuilder::new().with_level(self.log_level.to_lowercase()).with_format(self.log_format)
	}
}

fn seconds(secs: u64) -> Option<Duration> {
	(secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let args = Args::parse_from(["sqliteog-server"]);
		let config = args.grpc_config();
		assert_eq!(config.bind_addr, "0.0.0.0:9091");
		assert_eq!(config.stats_interval, None);
		assert_eq!(config.callback_timeout, None);
		assert_eq!(args.tracing().level(), "info");
		assert_eq!(args.tracing().format(), LogFormat::Text);
	}

	#[test]
	fn test_flags() {
		let args = Args::parse_from([
			"sqliteog-server",
			"--port",
			"7000",
			"--bind",
			"127.0.0.1",
			"--stats-interval",
			"10",
			"--callback-timeout",
			"3",
			"--log-level",
			"DEBUG",
			"--log-format",
			"json",
		]);
		let config = args.grpc_config();
		assert_eq!(config.bind_addr, "127.0.0.1:7000");
		assert_eq!(config.stats_interval, Some(Duration::from_secs(10)));
		assert_eq!(config.callback_timeout, Some(Duration::from_secs(3)));
		assert_eq!(args.tracing().level(), "debug");
		assert_eq!(args.tracing().format(), LogFormat::Json);
	}
}
