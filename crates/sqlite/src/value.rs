// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::types::ValueRef;

const NAIVE_FORMATS: [&str; 4] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// Whether a declared column type holds timestamps.
pub fn timestamp_type(declared: &str) -> bool {
	matches!(declared, "DATE" | "DATETIME" | "TIMESTAMP")
}

/// Render a value the engine produced as text for the wire.
///
/// `declared` is the upper-cased declared type of the column, or empty for
/// expression columns and function arguments.
pub fn render_value(value: ValueRef<'_>, declared: &str) -> String {
	match value {
		ValueRef::Null => String::new(),
		ValueRef::Integer(i) => i.to_string(),
		ValueRef::Real(r) => r.to_string(),
		ValueRef::Text(bytes) => {
			let text = String::from_utf8_lossy(bytes);
			if timestamp_type(declared) {
				if let Some(ts) = parse_timestamp(&text) {
					return ts.to_rfc3339_opts(SecondsFormat::AutoSi, true);
				}
			}
			text.into_owned()
		}
		ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
	}
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
	let text = text.trim();
	if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
		return Some(ts.with_timezone(&Utc));
	}
	for format in NAIVE_FORMATS {
		if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
			return Some(ts.and_utc());
		}
	}
	NaiveDate::parse_from_str(text, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)).map(|ts| ts.and_utc())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_scalars() {
		assert_eq!(render_value(ValueRef::Null, ""), "");
		assert_eq!(render_value(ValueRef::Integer(-16), ""), "-16");
		assert_eq!(render_value(ValueRef::Real(2.5), ""), "2.5");
		assert_eq!(render_value(ValueRef::Text(b"alice"), "TEXT"), "alice");
		assert_eq!(render_value(ValueRef::Blob(b"raw"), "BLOB"), "raw");
	}

	#[test]
	fn test_timestamp_columns_render_rfc3339() {
		assert_eq!(render_value(ValueRef::Text(b"2024-03-01 10:20:30"), "DATETIME"), "2024-03-01T10:20:30Z");
		assert_eq!(render_value(ValueRef::Text(b"2024-03-01"), "DATE"), "2024-03-01T00:00:00Z");
		assert_eq!(
			render_value(ValueRef::Text(b"2024-03-01T10:20:30+02:00"), "TIMESTAMP"),
			"2024-03-01T08:20:30Z"
		);
	}

	#[test]
	fn test_unparseable_timestamp_is_kept() {
		assert_eq!(render_value(ValueRef::Text(b"yesterday"), "DATETIME"), "yesterday");
		assert_eq!(render_value(ValueRef::Text(b"2024-03-01 10:20:30"), "TEXT"), "2024-03-01 10:20:30");
	}
}
