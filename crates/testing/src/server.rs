// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! In-process server for integration tests.

use std::{fs, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use sqliteog_sub_server_grpc::{ConnectionRegistry, GrpcConfig, GrpcServer};

use crate::tempdir::temp_path;

/// A [`GrpcServer`] on an ephemeral loopback port with its own data
/// directory, removed again on drop.
pub struct TestServer {
	server: GrpcServer,
	data_dir: PathBuf,
}

impl TestServer {
	pub async fn start() -> Self {
		Self::start_with(GrpcConfig::default()).await
	}

	pub async fn with_callback_timeout(timeout: Duration) -> Self {
		Self::start_with(GrpcConfig::default().callback_timeout(Some(timeout))).await
	}

	/// Start with `config`; its bind address and data directory are replaced.
	pub async fn start_with(config: GrpcConfig) -> Self {
		let data_dir = temp_path();
		fs::create_dir_all(&data_dir).expect("failed to create data dir");

		let mut server = GrpcServer::new(config.bind_addr("127.0.0.1:0").data_dir(&data_dir));
		server.start().await.expect("failed to start test server");
		Self {
			server,
			data_dir,
		}
	}

	pub fn addr(&self) -> SocketAddr {
		self.server.local_addr().expect("server is bound")
	}

	/// Data source name for `db` on this server.
	pub fn dsn(&self, db: &str) -> String {
		format!("{}/{}", self.addr(), db)
	}

	pub fn registry(&self) -> &Arc<ConnectionRegistry> {
		self.server.registry()
	}

	pub fn data_dir(&self) -> &PathBuf {
		&self.data_dir
	}

	pub async fn stop(mut self) {
		self.server.shutdown().await.expect("failed to stop test server");
	}
}

impl Drop for TestServer {
	fn drop(&mut self) {
		let _ = fs::remove_dir_all(&self.data_dir);
	}
}
