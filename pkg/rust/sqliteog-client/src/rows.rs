// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use chrono::{DateTime, Utc};
use sqliteog_type::Result;
use sqliteog_wire::QueryResult;
use tracing::warn;

use crate::Value;

/// Outcome of a statement that changed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecResult {
	pub last_insert_id: i64,
	pub rows_affected: i64,
}

impl From<sqliteog_wire::ExecuteResult> for ExecResult {
	fn from(result: sqliteog_wire::ExecuteResult) -> Self {
		Self {
			last_insert_id: result.last_insert_id,
			rows_affected: result.affected_rows,
		}
	}
}

/// Host type a column decodes into, chosen from its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanType {
	Integer,
	Real,
	Text,
	Bool,
	Time,
}

impl ScanType {
	pub fn from_database_type(name: &str) -> Self {
		match name {
			"INTEGER" | "INT" | "TINYINT" | "BIGINT" => ScanType::Integer,
			"REAL" | "FLOAT" | "DOUBLE" => ScanType::Real,
			"TEXT" | "BLOB" | "CHAR" | "VARCHAR" => ScanType::Text,
			"BOOL" => ScanType::Bool,
			"TIME" | "DATETIME" | "DATE" | "TIMESTAMP" => ScanType::Time,
			_ => ScanType::Text,
		}
	}
}

/// Declared types the server sends as RFC 3339 timestamps.
fn is_timestamp_type(name: &str) -> bool {
	matches!(name, "DATE" | "DATETIME" | "TIMESTAMP")
}

/// Upper-cased declared type without any size suffix, `VARCHAR(20)` gives
/// `VARCHAR`.
pub(crate) fn database_type_name(declared: &str) -> String {
	let upper = declared.to_uppercase();
	match upper.split_once('(') {
		Some((name, _)) => name.trim().to_string(),
		None => upper.trim().to_string(),
	}
}

/// Cursor over a materialized result set.
#[derive(Debug, Clone)]
pub struct Rows {
	result: QueryResult,
	index: usize,
	closed: bool,
}

impl Rows {
	pub(crate) fn new(result: QueryResult) -> Self {
		Self {
			result,
			index: 0,
			closed: false,
		}
	}

	pub fn columns(&self) -> &[String] {
		&self.result.columns
	}

	pub fn len(&self) -> usize {
		self.result.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.result.rows.is_empty()
	}

	pub fn column_type_database_type_name(&self, index: usize) -> String {
		self.result.column_types.get(index).map(|t| database_type_name(t)).unwrap_or_default()
	}

	pub fn column_type_scan_type(&self, index: usize) -> ScanType {
		ScanType::from_database_type(&self.column_type_database_type_name(index))
	}

	/// Decodes the next row. Returns `None` once the rows are exhausted or
	/// the cursor was closed.
	pub fn next(&mut self) -> Result<Option<Vec<Value>>> {
		if self.closed || self.index >= self.result.rows.len() {
			return Ok(None);
		}
		let row = &self.result.rows[self.index];
		self.index += 1;

		let mut values = Vec::with_capacity(row.fields.len());
		for (idx, field) in row.fields.iter().enumerate() {
			let column = self.result.columns.get(idx).map(String::as_str).unwrap_or_default();
			values.push(decode(column, &self.column_type_database_type_name(idx), field));
		}
		Ok(Some(values))
	}

	pub fn close(&mut self) {
		self.closed = true;
	}
}

/// Text of a field as a value of its column's scan type. Fields that do not
/// parse as that type are kept as text.
fn decode(column: &str, type_name: &str, field: &str) -> Value {
	let scan_type = ScanType::from_database_type(type_name);
	if field.is_empty() && scan_type != ScanType::Text {
		return Value::Null;
	}

	match scan_type {
		ScanType::Text => Value::Text(field.to_string()),
		ScanType::Integer => field.parse::<i64>().map(Value::Integer).unwrap_or_else(|_| Value::Text(field.to_string())),
		ScanType::Real => field.parse::<f64>().map(Value::Real).unwrap_or_else(|_| Value::Text(field.to_string())),
		ScanType::Bool => match field {
			"1" | "true" | "TRUE" => Value::Bool(true),
			"0" | "false" | "FALSE" => Value::Bool(false),
			other => Value::Text(other.to_string()),
		},
		ScanType::Time if is_timestamp_type(type_name) => match DateTime::parse_from_rfc3339(field) {
			Ok(ts) => Value::DateTime(ts.with_timezone(&Utc)),
			Err(err) => {
				warn!(column = %column, value = %field, error = %err, "timestamp column holds a non RFC 3339 value");
				Value::Text(field.to_string())
			}
		},
		ScanType::Time => Value::Text(field.to_string()),
	}
}
