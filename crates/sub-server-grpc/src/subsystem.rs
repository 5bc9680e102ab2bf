// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Lifecycle of the gRPC server: bind, serve, graceful shutdown.

use std::{
	net::SocketAddr,
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	time::Duration,
};

use parking_lot::RwLock;
use sqliteog_sqlite::SqliteFactory;
use sqliteog_type::{
	Result,
	diagnostic::{internal::shutdown_failed, network::bind_error},
	error,
};
use sqliteog_wire::sqlite_og_server::SqliteOgServer;
use tokio::{
	net::TcpListener,
	sync::{oneshot, watch},
	task::JoinHandle,
};
use tokio_stream::wrappers::TcpListenerStream;
use tracing::{info, warn};

use crate::{config::GrpcConfig, registry::ConnectionRegistry, service::SqliteOgService, stats::spawn_stats_logger};

/// Time allowed for in-flight calls to finish once shutdown begins.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// gRPC server hosting the `SqliteOG` service.
///
/// # Example
///
/// ```ignore
/// let mut server = GrpcServer::new(GrpcConfig::default().bind_addr("127.0.0.1:0"));
/// server.start().await?;
/// println!("listening on {}", server.local_addr().unwrap());
/// server.shutdown().await?;
/// ```
pub struct GrpcServer {
	config: GrpcConfig,
	registry: Arc<ConnectionRegistry>,
	/// Actual bound address (available after start).
	actual_addr: RwLock<Option<SocketAddr>>,
	running: Arc<AtomicBool>,
	/// Stops callback sessions and the stats logger.
	sessions_tx: watch::Sender<bool>,
	shutdown_tx: Option<oneshot::Sender<()>>,
	shutdown_complete_rx: Option<oneshot::Receiver<()>>,
	stats: Option<JoinHandle<()>>,
}

impl GrpcServer {
	pub fn new(config: GrpcConfig) -> Self {
		let factory = SqliteFactory::new(config.data_dir.clone()).with_callback_timeout(config.callback_timeout);
		let (sessions_tx, _) = watch::channel(false);
		Self {
			config,
			registry: Arc::new(ConnectionRegistry::new(factory)),
			actual_addr: RwLock::new(None),
			running: Arc::new(AtomicBool::new(false)),
			sessions_tx,
			shutdown_tx: None,
			shutdown_complete_rx: None,
			stats: None,
		}
	}

	pub fn config(&self) -> &GrpcConfig {
		&self.config
	}

	pub fn registry(&self) -> &Arc<ConnectionRegistry> {
		&self.registry
	}

	/// Get the actual bound address (available after start).
	pub fn local_addr(&self) -> Option<SocketAddr> {
		*self.actual_addr.read()
	}

	/// Get the actual bound port (available after start).
	pub fn port(&self) -> Option<u16> {
		self.local_addr().map(|a| a.port())
	}

	pub fn is_running(&self) -> bool {
		self.running.load(Ordering::SeqCst)
	}

	/// Bind the listener and start serving in the background.
	pub async fn start(&mut self) -> Result<()> {
		if self.shutdown_tx.is_some() {
			return Ok(());
		}

		let addr = self.config.bind_addr.clone();
		let listener = TcpListener::bind(&addr).await.map_err(|e| error!(bind_error(&addr, e.to_string())))?;
		let actual_addr = listener.local_addr().map_err(|e| error!(bind_error(&addr, e.to_string())))?;
		*self.actual_addr.write() = Some(actual_addr);
		info!("gRPC server bound to {}", actual_addr);

		self.sessions_tx.send_replace(false);
		let (shutdown_tx, shutdown_rx) = oneshot::channel();
		let (complete_tx, complete_rx) = oneshot::channel();

		let service = SqliteOgService::new(self.registry.clone(), self.sessions_tx.subscribe());
		let running = self.running.clone();
		running.store(true, Ordering::SeqCst);

		tokio::spawn(async move {
			let server = tonic::transport::Server::builder()
				.add_service(SqliteOgServer::new(service))
				.serve_with_incoming_shutdown(TcpListenerStream::new(listener), async {
					shutdown_rx.await.ok();
					info!("gRPC server received shutdown signal");
				});

			if let Err(e) = server.await {
				tracing::error!("gRPC server error: {}", e);
			}

			running.store(false, Ordering::SeqCst);
			let _ = complete_tx.send(());
			info!("gRPC server stopped");
		});

		if let Some(period) = self.config.stats_interval {
			self.stats = Some(spawn_stats_logger(self.registry.clone(), period, self.sessions_tx.subscribe()));
		}

		self.shutdown_tx = Some(shutdown_tx);
		self.shutdown_complete_rx = Some(complete_rx);
		Ok(())
	}

	/// Stop accepting calls, end callback sessions, then close every open
	/// connection. Close failures are logged and reported once.
	pub async fn shutdown(&mut self) -> Result<()> {
		self.sessions_tx.send_replace(true);
		if let Some(stats) = self.stats.take() {
			let _ = stats.await;
		}

		if let Some(tx) = self.shutdown_tx.take() {
			let _ = tx.send(());
		}
		if let Some(rx) = self.shutdown_complete_rx.take() {
			if tokio::time::timeout(SHUTDOWN_GRACE, rx).await.is_err() {
				warn!("gRPC server did not stop within {:?}", SHUTDOWN_GRACE);
			}
		}

		let failures = self.registry.close_all();
		if failures > 0 {
			return Err(error!(shutdown_failed(
				"connection registry",
				format!("{} connection(s) failed to close", failures)
			)));
		}
		Ok(())
	}
}
