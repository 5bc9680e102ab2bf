// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod args;

use clap::Parser;
use sqliteog_sub_server_grpc::GrpcServer;
use sqliteog_type::Result;
use tokio::signal;
use tracing::{error, info};

use crate::args::Args;

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();
	args.tracing().try_init()?;

	let mut server = GrpcServer::new(args.grpc_config());
	server.start().await?;
	info!(addr = ?server.local_addr(), "server listening");

	shutdown_signal().await;

	info!("shutting down");
	if let Err(e) = server.shutdown().await {
		error!(error = %e, "at least one connection failed to close");
	}
	Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			error!(error = %e, "failed to install Ctrl+C handler");
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut sig) => {
				sig.recv().await;
			}
			Err(e) => {
				error!(error = %e, "failed to install SIGTERM handler");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
