// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	fmt::{Debug, Formatter},
	sync::Arc,
};

use sqliteog_type::{Result, error};
use sqliteog_wire::{ConnectionId, ConnectionRequest, SqliteOgClient};
use tonic::transport::Endpoint;
use tracing::{debug, instrument, warn};

use crate::{
	Connection, Dsn,
	callback::{CallbackSession, FunctionTable},
	error::{status_error, transport_error},
};

/// A SQL scalar function evaluated in this process. Receives the arguments
/// as text and returns the results as text; the first result is used.
pub type Function = Arc<dyn Fn(&[String]) -> Vec<String> + Send + Sync>;

/// Entry point of the client. Holds the functions offered to the server on
/// every connection it opens.
#[derive(Clone, Default)]
pub struct Driver {
	functions: HashMap<String, Function>,
}

impl Driver {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_function<F>(mut self, name: impl Into<String>, function: F) -> Self
	where
		F: Fn(&[String]) -> Vec<String> + Send + Sync + 'static,
	{
		self.functions.insert(name.into(), Arc::new(function));
		self
	}

	/// Registered function names, sorted.
	pub fn function_names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.functions.keys().cloned().collect();
		names.sort();
		names
	}

	pub fn open_connector(&self, dsn: &str) -> Result<Connector> {
		let dsn = Dsn::parse(dsn).map_err(|e| error!(e))?;
		Ok(Connector {
			dsn,
			functions: Arc::new(self.functions.clone()),
		})
	}

	pub async fn open(&self, dsn: &str) -> Result<Connection> {
		self.open_connector(dsn)?.connect().await
	}
}

impl Debug for Driver {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Driver").field("functions", &self.function_names()).finish()
	}
}

/// A parsed data source plus the function table, ready to open connections.
#[derive(Clone)]
pub struct Connector {
	dsn: Dsn,
	functions: FunctionTable,
}

impl Connector {
	pub fn dsn(&self) -> &Dsn {
		&self.dsn
	}

	#[instrument(name = "driver::connect", level = "debug", skip(self), fields(dsn = %self.dsn))]
	pub async fn connect(&self) -> Result<Connection> {
		let endpoint = Endpoint::new(self.dsn.endpoint()).map_err(transport_error)?;
		let channel = endpoint.connect().await.map_err(transport_error)?;
		let mut client = SqliteOgClient::new(channel);

		let mut functions: Vec<String> = self.functions.keys().cloned().collect();
		functions.sort();

		let id = client
			.connection(ConnectionRequest {
				db_name: self.dsn.database.clone(),
				functions,
				aggregators: vec![],
			})
			.await
			.map_err(status_error)?
			.into_inner()
			.id;
		debug!(cnx_id = %id, "connection opened");

		if self.functions.is_empty() {
			return Ok(Connection::new(id, self.dsn.clone(), client, None));
		}

		match CallbackSession::start(client.clone(), &id, self.functions.clone()).await {
			Ok(session) => Ok(Connection::new(id, self.dsn.clone(), client, Some(session))),
			Err(err) => {
				if let Err(status) = client
					.close(ConnectionId {
						id: id.clone(),
					})
					.await
				{
					warn!(cnx_id = %id, status = %status, "failed to release connection");
				}
				Err(err)
			}
		}
	}
}

impl Debug for Connector {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Connector").field("dsn", &self.dsn).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_function_names_sorted() {
		let driver = Driver::new().with_function("square", |_| vec![]).with_function("abs", |_| vec![]);
		assert_eq!(driver.function_names(), vec!["abs", "square"]);
	}

	#[test]
	fn test_open_connector_rejects_bad_dsn() {
		let err = Driver::new().open_connector("localhost:9091").unwrap_err();
		assert_eq!(err.code(), "DRIVER_001");
	}

	#[test]
	fn test_open_connector() {
		let connector = Driver::new().open_connector("localhost:9091/app").unwrap();
		assert_eq!(connector.dsn().endpoint(), "http://localhost:9091");
		assert_eq!(connector.dsn().database, "app");
	}
}
