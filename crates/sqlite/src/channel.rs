// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
	time::Duration,
};

use crossbeam_channel::{RecvTimeoutError, TrySendError};
use sqliteog_type::{Result, diagnostic::callback, return_error};
use tokio::sync::{Mutex, OwnedMutexGuard, mpsc};
use tracing::debug;

/// Request the engine sends to the function's owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
	pub function_name: String,
	pub args: Vec<String>,
}

/// Answer delivered back to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationOutcome {
	pub initial: bool,
	pub result: Vec<String>,
	pub error: Option<String>,
}

/// Two single-slot conduits shared by a connection's trampolines and its
/// callback stream.
///
/// The request side is async because the stream handler awaits it; the
/// result side is a blocking channel because the trampoline runs on an
/// engine thread.
#[derive(Debug)]
pub struct ChannelPair {
	request_tx: mpsc::Sender<Invocation>,
	request_rx: Arc<Mutex<mpsc::Receiver<Invocation>>>,
	result_tx: crossbeam_channel::Sender<InvocationOutcome>,
	result_rx: crossbeam_channel::Receiver<InvocationOutcome>,
	in_flight: AtomicBool,
	/// Invocations that timed out after reaching the peer; their late
	/// answers are dropped on arrival.
	abandoned: AtomicUsize,
}

/// Exclusive claim on the request side of a [`ChannelPair`].
///
/// Dropping it releases the claim so a later stream can attach.
pub struct RequestStream {
	rx: OwnedMutexGuard<mpsc::Receiver<Invocation>>,
}

impl RequestStream {
	pub async fn recv(&mut self) -> Option<Invocation> {
		self.rx.recv().await
	}
}

impl Default for ChannelPair {
	fn default() -> Self {
		Self::new()
	}
}

impl ChannelPair {
	pub fn new() -> Self {
		let (request_tx, request_rx) = mpsc::channel(1);
		let (result_tx, result_rx) = crossbeam_channel::bounded(1);
		Self {
			request_tx,
			request_rx: Arc::new(Mutex::new(request_rx)),
			result_tx,
			result_rx,
			in_flight: AtomicBool::new(false),
			abandoned: AtomicUsize::new(0),
		}
	}

	/// Claim the request side. Returns `None` while another stream holds it.
	pub fn claim_requests(&self) -> Option<RequestStream> {
		let rx = self.request_rx.clone().try_lock_owned().ok()?;
		// a new peer never answers invocations sent to the previous one
		self.abandoned.store(0, Ordering::Release);
		Some(RequestStream {
			rx,
		})
	}

	pub fn is_in_flight(&self) -> bool {
		self.in_flight.load(Ordering::Acquire)
	}

	/// Hand a result to the waiting trampoline.
	///
	/// Fails when no invocation is outstanding, which the stream handler
	/// treats as a protocol violation.
	pub fn deliver(&self, outcome: InvocationOutcome) -> Result<()> {
		if self.abandoned.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1)).is_ok() {
			debug!(result = ?outcome.result, "dropping late result of a timed out invocation");
			return Ok(());
		}
		if !self.is_in_flight() {
			return_error!(callback::unsolicited_result());
		}
		match self.result_tx.try_send(outcome) {
			Ok(()) => Ok(()),
			Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
				return_error!(callback::unsolicited_result())
			}
		}
	}

	/// Send an invocation and block the calling thread until its result
	/// arrives, or until `timeout` elapses when one is given.
	///
	/// Must not be called from within an async context.
	pub fn invoke(&self, invocation: Invocation, timeout: Option<Duration>) -> Result<InvocationOutcome> {
		if self.in_flight.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
			return_error!(callback::concurrent_invocation(&invocation.function_name));
		}
		let _guard = InFlight(&self.in_flight);

		// A result left over from an abandoned invocation must not answer this one.
		while self.result_rx.try_recv().is_ok() {}

		let function_name = invocation.function_name.clone();
		debug!(function = %function_name, args = ?invocation.args, "sending invocation");
		if self.request_tx.blocking_send(invocation).is_err() {
			return_error!(callback::channel_closed(&function_name));
		}

		let outcome = match timeout {
			None => self.result_rx.recv().map_err(|_| sqliteog_type::error!(callback::channel_closed(&function_name)))?,
			Some(timeout) => match self.result_rx.recv_timeout(timeout) {
				Ok(outcome) => outcome,
				Err(RecvTimeoutError::Timeout) => {
					if !self.discard_pending_request() {
						self.abandoned.fetch_add(1, Ordering::AcqRel);
					}
					return_error!(callback::timeout(&function_name, timeout.as_millis()));
				}
				Err(RecvTimeoutError::Disconnected) => {
					return_error!(callback::channel_closed(&function_name));
				}
			},
		};
		debug!(function = %function_name, result = ?outcome.result, "received invocation result");
		Ok(outcome)
	}

	/// Fail the outstanding invocation, if any, so its trampoline returns.
	pub fn abort(&self, reason: &str) {
		if !self.is_in_flight() {
			return;
		}
		let _ = self.result_tx.try_send(InvocationOutcome {
			initial: false,
			result: vec![],
			error: Some(reason.to_string()),
		});
	}

	/// Withdraw an invocation no stream has picked up yet. Returns false
	/// when the request may already have reached the peer.
	fn discard_pending_request(&self) -> bool {
		match self.request_rx.try_lock() {
			Ok(mut rx) => {
				let _ = rx.try_recv();
				true
			}
			Err(_) => false,
		}
	}
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::Release);
	}
}

#[cfg(test)]
mod tests {
	use std::thread;

	use super::*;

	fn square(invocation: &Invocation) -> InvocationOutcome {
		let n: i64 = invocation.args[0].parse().unwrap();
		InvocationOutcome {
			initial: false,
			result: vec![(n * n).to_string()],
			error: None,
		}
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_round_trip() {
		let pair = Arc::new(ChannelPair::new());
		let mut requests = pair.claim_requests().unwrap();

		let engine = {
			let pair = pair.clone();
			thread::spawn(move || {
				pair.invoke(
					Invocation {
						function_name: "square".to_string(),
						args: vec!["4".to_string()],
					},
					None,
				)
			})
		};

		let invocation = requests.recv().await.unwrap();
		assert_eq!(invocation.function_name, "square");
		assert_eq!(invocation.args, vec!["4"]);
		assert!(pair.is_in_flight());
		pair.deliver(square(&invocation)).unwrap();

		let outcome = engine.join().unwrap().unwrap();
		assert_eq!(outcome.result, vec!["16"]);
		assert!(!pair.is_in_flight());
	}

	#[test]
	fn test_unsolicited_result_is_rejected() {
		let pair = ChannelPair::new();
		let err = pair.deliver(InvocationOutcome::default()).unwrap_err();
		assert_eq!(err.code(), "CALLBACK_002");
	}

	#[test]
	fn test_second_claim_is_refused_until_released() {
		let pair = ChannelPair::new();
		let first = pair.claim_requests().unwrap();
		assert!(pair.claim_requests().is_none());
		drop(first);
		assert!(pair.claim_requests().is_some());
	}

	#[test]
	fn test_timeout_clears_in_flight() {
		let pair = ChannelPair::new();
		let err = pair
			.invoke(
				Invocation {
					function_name: "slow".to_string(),
					args: vec![],
				},
				Some(Duration::from_millis(20)),
			)
			.unwrap_err();
		assert_eq!(err.code(), "CALLBACK_006");
		assert!(!pair.is_in_flight());

		// the abandoned request is not handed to a stream attaching later
		let mut requests = pair.claim_requests().unwrap();
		assert!(requests.rx.try_recv().is_err());
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_late_result_does_not_answer_next_invocation() {
		let pair = Arc::new(ChannelPair::new());
		let mut requests = pair.claim_requests().unwrap();

		let invoke = |n: &str, timeout: Option<Duration>| {
			let pair = pair.clone();
			let args = vec![n.to_string()];
			thread::spawn(move || {
				pair.invoke(
					Invocation {
						function_name: "square".to_string(),
						args,
					},
					timeout,
				)
			})
		};

		let first = invoke("2", Some(Duration::from_millis(50)));
		let late = requests.recv().await.unwrap();
		assert_eq!(first.join().unwrap().unwrap_err().code(), "CALLBACK_006");

		// arrives after the engine gave up; dropped without error
		pair.deliver(square(&late)).unwrap();

		let second = invoke("5", None);
		let invocation = requests.recv().await.unwrap();
		assert_eq!(invocation.args, vec!["5"]);
		pair.deliver(square(&invocation)).unwrap();
		assert_eq!(second.join().unwrap().unwrap().result, vec!["25"]);
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_late_result_arriving_during_next_invocation() {
		let pair = Arc::new(ChannelPair::new());
		let mut requests = pair.claim_requests().unwrap();

		let first = {
			let pair = pair.clone();
			thread::spawn(move || {
				pair.invoke(
					Invocation {
						function_name: "square".to_string(),
						args: vec!["2".to_string()],
					},
					Some(Duration::from_millis(50)),
				)
			})
		};
		let late = requests.recv().await.unwrap();
		assert!(first.join().unwrap().is_err());

		let second = {
			let pair = pair.clone();
			thread::spawn(move || {
				pair.invoke(
					Invocation {
						function_name: "square".to_string(),
						args: vec!["5".to_string()],
					},
					None,
				)
			})
		};
		let invocation = requests.recv().await.unwrap();
		pair.deliver(square(&late)).unwrap();
		pair.deliver(square(&invocation)).unwrap();
		assert_eq!(second.join().unwrap().unwrap().result, vec!["25"]);
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_abort_unblocks_trampoline() {
		let pair = Arc::new(ChannelPair::new());
		let mut requests = pair.claim_requests().unwrap();

		let engine = {
			let pair = pair.clone();
			thread::spawn(move || {
				pair.invoke(
					Invocation {
						function_name: "square".to_string(),
						args: vec!["2".to_string()],
					},
					None,
				)
			})
		};
		requests.recv().await.unwrap();
		pair.abort("connection closed");

		let outcome = engine.join().unwrap().unwrap();
		assert_eq!(outcome.error.as_deref(), Some("connection closed"));
		pair.abort("no-op without an invocation");
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_concurrent_invocation_is_rejected() {
		let pair = Arc::new(ChannelPair::new());
		let mut requests = pair.claim_requests().unwrap();

		let first = {
			let pair = pair.clone();
			thread::spawn(move || {
				pair.invoke(
					Invocation {
						function_name: "square".to_string(),
						args: vec!["3".to_string()],
					},
					None,
				)
			})
		};
		let invocation = requests.recv().await.unwrap();

		let second = {
			let pair = pair.clone();
			thread::spawn(move || {
				pair.invoke(
					Invocation {
						function_name: "square".to_string(),
						args: vec!["5".to_string()],
					},
					None,
				)
			})
			.join()
			.unwrap()
		};
		assert_eq!(second.unwrap_err().code(), "CALLBACK_003");

		pair.deliver(square(&invocation)).unwrap();
		assert_eq!(first.join().unwrap().unwrap().result, vec!["9"]);
	}
}
