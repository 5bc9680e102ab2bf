// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Client side of the callback stream: evaluates SQL functions the server
//! asks for and streams the results back.

use std::{collections::HashMap, sync::Arc};

use sqliteog_type::{
	Result,
	diagnostic::callback::{function_panicked, invalid_metadata, unregistered_function},
	error,
};
use sqliteog_wire::{CNX_ID_METADATA, InvocationResult, Invoke, SqliteOgClient};
use tokio::{
	sync::{mpsc, watch},
	task::JoinHandle,
};
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Streaming, metadata::MetadataValue, transport::Channel};
use tracing::{debug, warn};

use crate::{Function, error::status_error};

pub(crate) type FunctionTable = Arc<HashMap<String, Function>>;

pub(crate) struct CallbackSession {
	stop: watch::Sender<bool>,
	task: JoinHandle<()>,
}

impl CallbackSession {
	/// Opens the callback stream for connection `id` and starts serving
	/// invocations from `functions`.
	pub(crate) async fn start(
		mut client: SqliteOgClient<Channel>,
		id: &str,
		functions: FunctionTable,
	) -> Result<Self> {
		let (outbound_tx, outbound_rx) = mpsc::channel::<InvocationResult>(1);

		let mut request = Request::new(ReceiverStream::new(outbound_rx));
		let value = MetadataValue::try_from(id).map_err(|e| error!(invalid_metadata(e.to_string())))?;
		request.metadata_mut().insert(CNX_ID_METADATA, value);

		let inbound = client.callback(request).await.map_err(status_error)?.into_inner();

		let (stop, stop_rx) = watch::channel(false);
		let task = tokio::spawn(serve(id.to_string(), inbound, outbound_tx, functions, stop_rx));

		debug!(cnx_id = %id, "callback session started");
		Ok(Self {
			stop,
			task,
		})
	}

	pub(crate) fn cancel(&self) {
		self.stop.send_replace(true);
	}

	/// Cancels the session and waits until it has stopped.
	pub(crate) async fn close(self) {
		self.cancel();
		if let Err(e) = self.task.await {
			warn!(error = %e, "callback session task failed");
		}
	}
}

async fn serve(
	id: String,
	mut inbound: Streaming<Invoke>,
	outbound: mpsc::Sender<InvocationResult>,
	functions: FunctionTable,
	mut stop: watch::Receiver<bool>,
) {
	loop {
		let invoke = tokio::select! {
			_ = stopped(&mut stop) => break,
			message = inbound.message() => match message {
				Ok(Some(invoke)) => invoke,
				Ok(None) => {
					debug!(cnx_id = %id, "callback stream closed by server");
					break;
				}
				Err(status) => {
					debug!(cnx_id = %id, status = %status, "callback stream receive failed");
					break;
				}
			}
		};

		let (reply, keep_serving) = evaluate(&functions, invoke).await;
		if outbound.send(reply).await.is_err() {
			debug!(cnx_id = %id, "failed to send invocation result");
			break;
		}
		if !keep_serving {
			break;
		}
	}
	debug!(cnx_id = %id, "callback session stopped");
}

/// Runs the requested function on a blocking thread. An unknown name yields
/// an error reply and ends the session; a panicking function yields an error
/// reply and the session carries on.
async fn evaluate(functions: &HashMap<String, Function>, invoke: Invoke) -> (InvocationResult, bool) {
	let Some(function) = functions.get(&invoke.function_name).cloned() else {
		let diagnostic = unregistered_function(&invoke.function_name);
		warn!(function = %invoke.function_name, "invocation of unregistered function");
		return (
			InvocationResult {
				initial: false,
				result: vec![],
				error: Some(diagnostic.message),
			},
			false,
		);
	};

	let Invoke {
		function_name,
		args,
	} = invoke;
	match tokio::task::spawn_blocking(move || function(&args)).await {
		Ok(result) => (
			InvocationResult {
				initial: false,
				result,
				error: None,
			},
			true,
		),
		Err(e) => {
			let diagnostic = function_panicked(&function_name);
			warn!(function = %function_name, error = %e, "function evaluation failed");
			(
				InvocationResult {
					initial: false,
					result: vec![],
					error: Some(diagnostic.message),
				},
				true,
			)
		}
	}
}

async fn stopped(rx: &mut watch::Receiver<bool>) {
	let _ = rx.wait_for(|stop| *stop).await;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table() -> HashMap<String, Function> {
		let mut functions: HashMap<String, Function> = HashMap::new();
		functions.insert(
			"square".to_string(),
			Arc::new(|args: &[String]| {
				let n: i64 = args[0].parse().unwrap_or_default();
				vec![(n * n).to_string()]
			}),
		);
		functions.insert(
			"explode".to_string(),
			Arc::new(|_: &[String]| -> Vec<String> { panic!("boom") }),
		);
		functions
	}

	#[tokio::test]
	async fn test_evaluate_known_function() {
		let (reply, keep_serving) = evaluate(
			&table(),
			Invoke {
				function_name: "square".to_string(),
				args: vec!["4".to_string()],
			},
		)
		.await;
		assert!(keep_serving);
		assert!(!reply.initial);
		assert_eq!(reply.result, vec!["16"]);
		assert_eq!(reply.error, None);
	}

	#[tokio::test]
	async fn test_evaluate_unknown_function() {
		let (reply, keep_serving) = evaluate(
			&table(),
			Invoke {
				function_name: "cube".to_string(),
				args: vec!["2".to_string()],
			},
		)
		.await;
		assert!(!keep_serving);
		assert!(reply.result.is_empty());
		assert!(reply.error.unwrap().contains("cube"));
	}

	#[tokio::test]
	async fn test_evaluate_panicking_function() {
		let functions = table();
		let (reply, keep_serving) = evaluate(
			&functions,
			Invoke {
				function_name: "explode".to_string(),
				args: vec![],
			},
		)
		.await;
		assert!(keep_serving);
		assert!(reply.result.is_empty());
		assert_eq!(reply.error.as_deref(), Some("function explode panicked"));

		// the table is still usable after a panic
		let (reply, _) = evaluate(
			&functions,
			Invoke {
				function_name: "square".to_string(),
				args: vec!["3".to_string()],
			},
		)
		.await;
		assert_eq!(reply.result, vec!["9"]);
	}
}
