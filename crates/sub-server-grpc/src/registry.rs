// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Registry of open connections.
//!
//! Each entry owns one engine handle together with the channel pair its
//! trampolines use. The map is the only state shared across connections.

use std::{
	collections::HashMap,
	fmt::{Display, Formatter},
	sync::Arc,
};

use parking_lot::RwLock;
use sqliteog_sqlite::{ChannelPair, SqliteFactory, SqliteHandle};
use sqliteog_type::{
	Result,
	diagnostic::connection::{empty_id, not_found},
	error, return_error,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Short identifier of a connection: the first group of a v4 UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
	pub fn generate() -> Self {
		let uuid = Uuid::new_v4().simple().to_string();
		Self(uuid[..8].to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for ConnectionId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ConnectionId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl From<ConnectionId> for String {
	fn from(id: ConnectionId) -> Self {
		id.0
	}
}

#[derive(Debug)]
pub struct ConnectionRecord {
	id: ConnectionId,
	name: String,
	functions: Vec<String>,
	aggregates: Vec<String>,
	handle: SqliteHandle,
	channels: Arc<ChannelPair>,
}

impl ConnectionRecord {
	pub fn new(
		id: ConnectionId,
		name: impl Into<String>,
		functions: Vec<String>,
		aggregates: Vec<String>,
		handle: SqliteHandle,
		channels: Arc<ChannelPair>,
	) -> Self {
		Self {
			id,
			name: name.into(),
			functions,
			aggregates,
			handle,
			channels,
		}
	}

	pub fn id(&self) -> &ConnectionId {
		&self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn functions(&self) -> &[String] {
		&self.functions
	}

	pub fn aggregates(&self) -> &[String] {
		&self.aggregates
	}

	pub fn handle(&self) -> &SqliteHandle {
		&self.handle
	}

	pub fn channels(&self) -> &Arc<ChannelPair> {
		&self.channels
	}

	pub fn is_closed(&self) -> bool {
		self.handle.is_closed()
	}

	/// Fail any invocation still waiting on the client, then release the
	/// engine handle.
	pub fn close(&self) -> Result<()> {
		self.channels.abort("connection closed");
		self.handle.close()
	}
}

#[derive(Debug)]
pub struct ConnectionRegistry {
	factory: SqliteFactory,
	connections: RwLock<HashMap<ConnectionId, Arc<ConnectionRecord>>>,
}

impl ConnectionRegistry {
	pub fn new(factory: SqliteFactory) -> Self {
		Self {
			factory,
			connections: RwLock::new(HashMap::new()),
		}
	}

	/// Open a database with the given remote functions installed and
	/// register it under a fresh identifier.
	///
	/// Blocks while the engine opens the database.
	pub fn connect(&self, name: &str, functions: Vec<String>, aggregates: Vec<String>) -> Result<ConnectionId> {
		if !aggregates.is_empty() {
			warn!(aggregates = ?aggregates, "aggregate functions are not supported, ignoring");
		}

		let channels = Arc::new(ChannelPair::new());
		let handle = self.factory.open(name, &functions, channels.clone())?;

		let mut connections = self.connections.write();
		let mut id = ConnectionId::generate();
		while connections.contains_key(&id) {
			id = ConnectionId::generate();
		}

		info!(id = %id, db = %handle.path().display_name(), functions = ?functions, "opened connection");
		let record = ConnectionRecord::new(id.clone(), name, functions, aggregates, handle, channels);
		connections.insert(id.clone(), Arc::new(record));
		Ok(id)
	}

	/// Look up a live connection.
	pub fn get(&self, id: &str) -> Result<Arc<ConnectionRecord>> {
		if id.is_empty() {
			return_error!(empty_id());
		}
		let record = self.connections.read().get(&ConnectionId::from(id)).cloned();
		match record {
			Some(record) if !record.is_closed() => Ok(record),
			_ => Err(error!(not_found(id))),
		}
	}

	/// Store `record` under its identifier. A record already stored under
	/// the same identifier is closed before it is replaced.
	///
	/// The previous record is closed after the map lock is released.
	pub fn insert(&self, record: ConnectionRecord) {
		let id = record.id().clone();
		let previous = self.connections.write().insert(id.clone(), Arc::new(record));
		if let Some(previous) = previous {
			warn!(id = %id, "replaced existing connection");
			if let Err(e) = previous.close() {
				tracing::error!(id = %id, error = %e, "failed to close replaced connection");
			}
		}
	}

	/// Remove a connection without closing it.
	pub fn delete(&self, id: &str) -> Option<Arc<ConnectionRecord>> {
		let removed = self.connections.write().remove(&ConnectionId::from(id));
		if removed.is_some() {
			debug!(id = %id, "removed connection");
		}
		removed
	}

	/// Close the connection's engine handle and forget it.
	pub fn close(&self, id: &str) -> Result<()> {
		let record = self.get(id)?;
		let result = record.close();
		self.delete(id);
		info!(id = %id, "closed connection");
		result
	}

	/// Close every connection. Failures are logged and counted, never
	/// stop the sweep.
	pub fn close_all(&self) -> usize {
		let records: Vec<_> = self.connections.write().drain().map(|(_, record)| record).collect();
		let mut failures = 0;
		for record in records {
			if let Err(e) = record.close() {
				failures += 1;
				tracing::error!(id = %record.id(), error = %e, "failed to close connection");
			}
		}
		failures
	}

	pub fn len(&self) -> usize {
		self.connections.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.connections.read().is_empty()
	}

	/// Identifiers of all registered connections, sorted.
	pub fn ids(&self) -> Vec<ConnectionId> {
		let mut ids: Vec<_> = self.connections.read().keys().cloned().collect();
		ids.sort();
		ids
	}

	pub fn factory(&self) -> &SqliteFactory {
		&self.factory
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	fn registry() -> ConnectionRegistry {
		ConnectionRegistry::new(SqliteFactory::new("."))
	}

	fn names(names: &[&str]) -> Vec<String> {
		names.iter().map(|n| n.to_string()).collect()
	}

	#[test]
	fn test_generated_id_shape() {
		let id = ConnectionId::generate();
		assert_eq!(id.as_str().len(), 8);
		assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
	}

	#[test]
	fn test_connect_records_requested_functions() {
		let registry = registry();
		let id = registry.connect(":memory:", names(&["square", "django_datetime_trunc"]), vec![]).unwrap();

		let record = registry.get(id.as_str()).unwrap();
		let functions: HashSet<_> = record.functions().iter().cloned().collect();
		assert_eq!(functions, HashSet::from(["square".to_string(), "django_datetime_trunc".to_string()]));
		assert_eq!(record.name(), ":memory:");
	}

	#[test]
	fn test_ids_unique_among_live_connections() {
		let registry = registry();
		let ids: HashSet<_> =
			(0..32).map(|_| registry.connect(":memory:", vec![], vec![]).unwrap()).collect();
		assert_eq!(ids.len(), 32);
		assert_eq!(registry.len(), 32);

		let mut sorted = registry.ids();
		let listed = sorted.clone();
		sorted.sort();
		assert_eq!(listed, sorted);
	}

	#[test]
	fn test_aggregates_are_recorded_not_installed() {
		let registry = registry();
		let id = registry.connect(":memory:", vec![], names(&["median"])).unwrap();
		let record = registry.get(id.as_str()).unwrap();
		assert_eq!(record.aggregates(), ["median".to_string()]);
		assert!(record.handle().query("SELECT median(1)", &[]).is_err());
	}

	#[test]
	fn test_close_removes_connection() {
		let registry = registry();
		let id = registry.connect(":memory:", vec![], vec![]).unwrap();
		let record = registry.get(id.as_str()).unwrap();

		registry.close(id.as_str()).unwrap();
		assert!(registry.is_empty());
		assert!(record.is_closed());
		assert_eq!(registry.get(id.as_str()).err().unwrap().code(), "CONNECTION_001");
		assert_eq!(registry.close(id.as_str()).err().unwrap().code(), "CONNECTION_001");
	}

	#[test]
	fn test_empty_id() {
		assert_eq!(registry().get("").err().unwrap().code(), "CONNECTION_002");
	}

	#[test]
	fn test_delete_does_not_close() {
		let registry = registry();
		let id = registry.connect(":memory:", vec![], vec![]).unwrap();
		let record = registry.delete(id.as_str()).unwrap();
		assert!(!record.is_closed());
		assert!(registry.get(id.as_str()).is_err());
		assert!(registry.delete(id.as_str()).is_none());
	}

	#[test]
	fn test_insert_closes_previous_record() {
		let registry = registry();
		let id = registry.connect(":memory:", vec![], vec![]).unwrap();
		let previous = registry.get(id.as_str()).unwrap();
		previous.handle().execute("CREATE TABLE marker (x INTEGER)", &[]).unwrap();

		let channels = Arc::new(ChannelPair::new());
		let handle = registry.factory().open(":memory:", &[], channels.clone()).unwrap();
		registry.insert(ConnectionRecord::new(id.clone(), ":memory:", vec![], vec![], handle, channels));

		assert!(previous.is_closed());
		assert_eq!(registry.len(), 1);
		let current = registry.get(id.as_str()).unwrap();
		assert!(current.handle().query("SELECT * FROM marker", &[]).is_err());
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_insert_aborts_statement_on_replaced_record() {
		let registry = Arc::new(registry());
		let id = registry.connect(":memory:", names(&["slow"]), vec![]).unwrap();
		let previous = registry.get(id.as_str()).unwrap();
		let mut requests = previous.channels().claim_requests().unwrap();

		let statement = {
			let previous = previous.clone();
			std::thread::spawn(move || previous.handle().query("SELECT slow(1)", &[]))
		};
		let invocation = requests.recv().await.unwrap();
		assert_eq!(invocation.function_name, "slow");

		let channels = Arc::new(ChannelPair::new());
		let handle = registry.factory().open(":memory:", &[], channels.clone()).unwrap();
		let replacing = {
			let registry = registry.clone();
			let id = id.clone();
			std::thread::spawn(move || {
				registry.insert(ConnectionRecord::new(id, ":memory:", vec![], vec![], handle, channels))
			})
		};

		let err = statement.join().unwrap().unwrap_err();
		assert!(err.message.contains("connection closed"), "{}", err.message);
		replacing.join().unwrap();

		assert!(previous.is_closed());
		assert!(!registry.get(id.as_str()).unwrap().is_closed());
	}

	#[test]
	fn test_close_all() {
		let registry = registry();
		let records: Vec<_> = (0..3)
			.map(|_| registry.connect(":memory:", vec![], vec![]).unwrap())
			.map(|id| registry.get(id.as_str()).unwrap())
			.collect();

		assert_eq!(registry.close_all(), 0);
		assert!(registry.is_empty());
		assert!(records.iter().all(|r| r.is_closed()));
	}
}
