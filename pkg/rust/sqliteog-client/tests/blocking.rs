// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use sqliteog_client::{NamedValue, Value, blocking::Driver};
use sqliteog_testing::server::TestServer;

#[test]
fn test_blocking_round_trip() {
	let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build().unwrap();
	let server = runtime.block_on(TestServer::start());

	let driver = Driver::new().unwrap().with_function("django_datetime_trunc", |args| {
		vec![args.get(1).and_then(|v| v.split(' ').next()).unwrap_or_default().to_string()]
	});
	let conn = driver.open(&server.dsn("blocking")).unwrap();

	conn.execute("CREATE TABLE events (at TEXT)", &[]).unwrap();
	conn.execute("INSERT INTO events (at) VALUES (?)", &[NamedValue::new(1, "2024-05-06 07:08:09")]).unwrap();

	let mut rows = conn.query("SELECT django_datetime_trunc('day', at) FROM events", &[]).unwrap();
	assert_eq!(rows.next().unwrap(), Some(vec![Value::Text("2024-05-06".to_string())]));

	// the callback session keeps serving between calls
	let stmt = conn.prepare("SELECT django_datetime_trunc('day', ?)").unwrap();
	let mut rows = stmt.query_values(&[Value::from("1999-12-31 23:59:59")]).unwrap();
	assert_eq!(rows.next().unwrap(), Some(vec![Value::Text("1999-12-31".to_string())]));

	assert!(conn.is_valid());
	conn.close().unwrap();
	assert!(!conn.is_valid());

	runtime.block_on(server.stop());
}
