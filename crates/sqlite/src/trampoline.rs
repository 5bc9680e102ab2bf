// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{panic::AssertUnwindSafe, sync::Arc, time::Duration};

use rusqlite::{Connection, functions::FunctionFlags};
use sqliteog_type::{Result, diagnostic::callback, return_error};

use crate::{
	channel::{ChannelPair, Invocation},
	value::render_value,
};

/// Engine-side stand-in for a function implemented by the remote client.
///
/// Each call serialises its arguments, hands them to the connection's
/// [`ChannelPair`] and blocks until the client answers.
#[derive(Debug, Clone)]
pub struct Trampoline {
	function_name: String,
	channels: Arc<ChannelPair>,
	timeout: Option<Duration>,
}

impl Trampoline {
	pub fn new(function_name: impl Into<String>, channels: Arc<ChannelPair>, timeout: Option<Duration>) -> Self {
		Self {
			function_name: function_name.into(),
			channels,
			timeout,
		}
	}

	/// Returns the first element of the client's result, or the empty string
	/// when the result is empty.
	pub fn invoke(&self, args: Vec<String>) -> Result<String> {
		let outcome = self.channels.invoke(
			Invocation {
				function_name: self.function_name.clone(),
				args,
			},
			self.timeout,
		)?;

		if let Some(error) = outcome.error {
			return_error!(callback::remote_failure(&self.function_name, &error));
		}

		Ok(outcome.result.into_iter().next().unwrap_or_default())
	}

	/// Register this trampoline as a variadic scalar function on `conn`.
	pub(crate) fn install(self, conn: &Connection) -> rusqlite::Result<()> {
		let name = self.function_name.clone();
		let trampoline = AssertUnwindSafe(self);
		conn.create_scalar_function(
			name.as_str(),
			-1,
			FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
			move |ctx| {
				let args = (0..ctx.len()).map(|i| render_value(ctx.get_raw(i), "")).collect();
				trampoline.invoke(args).map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e)))
			},
		)
	}
}
