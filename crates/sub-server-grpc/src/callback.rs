// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Callback stream handling.
//!
//! A session bridges one connection's channel pair to its client: invocations
//! raised by the engine are forwarded as `Invoke` messages and the client's
//! `InvocationResult`s are delivered back to the waiting trampoline.

use std::{
	fmt::{Display, Formatter},
	sync::Arc,
};

use sqliteog_sqlite::{InvocationOutcome, RequestStream};
use sqliteog_type::{
	Result,
	diagnostic::callback::{invalid_metadata, stream_already_attached},
	error, return_error,
};
use sqliteog_wire::{CNX_ID_METADATA, InvocationResult, Invoke};
use tokio::sync::{mpsc, watch};
use tonic::{Status, Streaming, metadata::MetadataMap};
use tracing::debug;

use crate::{error::IntoStatus, registry::ConnectionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
	Open,
	Running,
	Closing,
	Closed,
}

impl Display for SessionState {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			SessionState::Open => "open",
			SessionState::Running => "running",
			SessionState::Closing => "closing",
			SessionState::Closed => "closed",
		})
	}
}

/// Extract the connection identifier from the stream metadata. Exactly one
/// non-empty ASCII value is accepted.
pub(crate) fn connection_id(metadata: &MetadataMap) -> Result<String> {
	let mut values = metadata.get_all(CNX_ID_METADATA).iter();
	let Some(value) = values.next() else {
		return_error!(invalid_metadata(format!("{} is missing", CNX_ID_METADATA)));
	};
	if values.next().is_some() {
		return_error!(invalid_metadata(format!("{} has more than one value", CNX_ID_METADATA)));
	}

	let id = value.to_str().map_err(|_| error!(invalid_metadata(format!("{} is not ascii", CNX_ID_METADATA))))?;
	if id.is_empty() {
		return_error!(invalid_metadata(format!("{} is empty", CNX_ID_METADATA)));
	}
	Ok(id.to_string())
}

pub(crate) struct CallbackSession {
	record: Arc<ConnectionRecord>,
	requests: RequestStream,
}

impl CallbackSession {
	/// Claim the connection's request side. Only one session may be attached
	/// to a connection at a time.
	pub(crate) fn attach(record: Arc<ConnectionRecord>) -> Result<Self> {
		let requests = record
			.channels()
			.claim_requests()
			.ok_or_else(|| error!(stream_already_attached(record.id().as_str())))?;
		debug!(cnx_id = %record.id(), state = %SessionState::Open, "callback session");
		Ok(Self {
			record,
			requests,
		})
	}

	/// Run both pumps until either ends, the peer goes away or `shutdown`
	/// fires. Returns once both have finished.
	pub(crate) async fn run(
		self,
		inbound: Streaming<InvocationResult>,
		outbound: mpsc::Sender<std::result::Result<Invoke, Status>>,
		shutdown: watch::Receiver<bool>,
	) {
		let Self {
			record,
			requests,
		} = self;
		let id = record.id().clone();
		debug!(cnx_id = %id, state = %SessionState::Running, "callback session");

		let (stop_tx, stop_rx) = watch::channel(false);
		tokio::join!(
			engine_to_peer(requests, outbound.clone(), stop_rx.clone(), shutdown.clone(), &stop_tx),
			peer_to_engine(&record, inbound, outbound, stop_rx, shutdown, &stop_tx),
		);

		debug!(cnx_id = %id, state = %SessionState::Closed, "callback session");
	}
}

async fn engine_to_peer(
	mut requests: RequestStream,
	outbound: mpsc::Sender<std::result::Result<Invoke, Status>>,
	mut stop: watch::Receiver<bool>,
	mut shutdown: watch::Receiver<bool>,
	stop_tx: &watch::Sender<bool>,
) {
	loop {
		tokio::select! {
			_ = stopped(&mut stop) => break,
			_ = stopped(&mut shutdown) => break,
			_ = outbound.closed() => {
				debug!("callback peer went away");
				break;
			}
			invocation = requests.recv() => {
				let Some(invocation) = invocation else { break };
				let invoke = Invoke {
					function_name: invocation.function_name,
					args: invocation.args,
				};
				if outbound.send(Ok(invoke)).await.is_err() {
					debug!("failed to forward invocation");
					break;
				}
			}
		}
	}
	stop_tx.send_replace(true);
	debug!(state = %SessionState::Closing, "engine to peer pump stopped");
}

async fn peer_to_engine(
	record: &ConnectionRecord,
	mut inbound: Streaming<InvocationResult>,
	outbound: mpsc::Sender<std::result::Result<Invoke, Status>>,
	mut stop: watch::Receiver<bool>,
	mut shutdown: watch::Receiver<bool>,
	stop_tx: &watch::Sender<bool>,
) {
	loop {
		tokio::select! {
			_ = stopped(&mut stop) => break,
			_ = stopped(&mut shutdown) => break,
			message = inbound.message() => match message {
				Ok(Some(result)) => {
					let outcome = InvocationOutcome {
						initial: result.initial,
						result: result.result,
						error: result.error,
					};
					if let Err(e) = record.channels().deliver(outcome) {
						debug!(cnx_id = %record.id(), error = %e, "protocol violation on callback stream");
						let _ = outbound.send(Err(e.into_status())).await;
						break;
					}
				}
				Ok(None) => {
					debug!(cnx_id = %record.id(), "callback stream closed by peer");
					break;
				}
				Err(status) => {
					debug!(cnx_id = %record.id(), status = %status, "callback stream receive failed");
					break;
				}
			}
		}
	}
	stop_tx.send_replace(true);
	debug!(cnx_id = %record.id(), state = %SessionState::Closing, "peer to engine pump stopped");
}

pub(crate) async fn stopped(rx: &mut watch::Receiver<bool>) {
	let _ = rx.wait_for(|stop| *stop).await;
}
