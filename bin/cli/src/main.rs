// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod functions;

use clap::Parser;
use sqliteog_client::{Driver, NamedValue, StatementOutcome, Value};
use sqliteog_sub_tracing::TracingBuilder;
use sqliteog_type::Result;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "sqliteog-cli", version, about = "Run a statement against a SQLiteOG server")]
struct Args {
	/// Server address, host:port.
	#[arg(long, default_value = "localhost:9091")]
	addr: String,

	/// Database name on the server.
	#[arg(long, default_value = "test")]
	db: String,

	/// Statement to run.
	#[arg(long, default_value = "SELECT 1")]
	sql: String,

	/// Statement parameter, repeat for each `?` in order.
	#[arg(long = "param")]
	params: Vec<String>,

	/// Minimum log level (debug, info, warn, error).
	#[arg(long, default_value = "warn")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();
	TracingBuilder::new().with_level(args.log_level.to_lowercase()).try_init()?;

	let driver = functions::register(Driver::new());
	let conn = driver.open(&format!("{}/{}", args.addr, args.db)).await?;

	let params: Vec<Value> = args.params.into_iter().map(Value::from).collect();
	let outcome = conn.execute_or_query(&args.sql, &NamedValue::positional(&params)).await;

	if let Err(e) = conn.close().await {
		warn!(error = %e, "unable to close connection");
	}
	print(outcome?)
}

fn print(mut outcome: StatementOutcome) -> Result<()> {
	if outcome.rows.columns().is_empty() {
		println!(
			"last insert id: {}, rows affected: {}",
			outcome.result.last_insert_id, outcome.result.rows_affected
		);
		return Ok(());
	}

	println!("{}", outcome.rows.columns().join("\t\t"));
	println!("{}", "--".repeat(40));
	while let Some(row) = outcome.rows.next()? {
		let fields: Vec<String> = row.iter().map(Value::to_string).collect();
		println!("{}", fields.join("\t\t"));
	}
	Ok(())
}
