// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use chrono::{DateTime, SecondsFormat, Utc};
use sqliteog_type::{Diagnostic, IntoDiagnostic, diagnostic::driver::invalid_parameter};
use thiserror::Error;

/// A value exchanged with the server. Everything travels as text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Null,
	Integer(i64),
	Real(f64),
	Bool(bool),
	Text(String),
	Blob(Vec<u8>),
	DateTime(DateTime<Utc>),
}

impl Value {
	/// Text form used as a statement parameter.
	pub fn to_param(&self) -> String {
		match self {
			Value::Null => String::new(),
			Value::Integer(i) => i.to_string(),
			Value::Real(r) => r.to_string(),
			Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
			Value::Text(s) => s.clone(),
			Value::Blob(b) => String::from_utf8_lossy(b).into_owned(),
			Value::DateTime(ts) => ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Integer(i) => Some(*i),
			Value::Bool(b) => Some(*b as i64),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Real(r) => Some(*r),
			Value::Integer(i) => Some(*i as f64),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Text(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
		match self {
			Value::DateTime(ts) => Some(*ts),
			_ => None,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Null => f.write_str("NULL"),
			other => f.write_str(&other.to_param()),
		}
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Integer(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Integer(v as i64)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Real(v)
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Text(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Text(v)
	}
}

impl From<Vec<u8>> for Value {
	fn from(v: Vec<u8>) -> Self {
		Value::Blob(v)
	}
}

impl From<DateTime<Utc>> for Value {
	fn from(v: DateTime<Utc>) -> Self {
		Value::DateTime(v)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		v.map(Into::into).unwrap_or(Value::Null)
	}
}

/// A statement argument with its 1-based position.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
	pub name: Option<String>,
	pub ordinal: usize,
	pub value: Value,
}

impl NamedValue {
	pub fn new(ordinal: usize, value: impl Into<Value>) -> Self {
		Self {
			name: None,
			ordinal,
			value: value.into(),
		}
	}

	pub fn named(name: impl Into<String>, ordinal: usize, value: impl Into<Value>) -> Self {
		Self {
			name: Some(name.into()),
			ordinal,
			value: value.into(),
		}
	}

	/// Positional arguments: the value at index `i` gets ordinal `i + 1`.
	pub fn positional(values: &[Value]) -> Vec<NamedValue> {
		values.iter().enumerate().map(|(idx, value)| NamedValue::new(idx + 1, value.clone())).collect()
	}
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
	#[error("ordinal cannot be < 1 {name} {value}")]
	OrdinalBelowOne {
		name: String,
		value: String,
	},
	#[error("ordinal {ordinal} exceeds the {count} supplied argument(s)")]
	OrdinalOutOfRange {
		ordinal: usize,
		count: usize,
	},
}

impl IntoDiagnostic for ParamError {
	fn into_diagnostic(self) -> Diagnostic {
		invalid_parameter(self.to_string())
	}
}

/// Lay arguments out in ordinal order as parameter text. Names are ignored.
pub fn named_values_to_params(values: &[NamedValue]) -> Result<Vec<String>, ParamError> {
	let mut params = vec![String::new(); values.len()];
	for value in values {
		if value.ordinal < 1 {
			return Err(ParamError::OrdinalBelowOne {
				name: value.name.clone().unwrap_or_default(),
				value: value.value.to_string(),
			});
		}
		if value.ordinal > values.len() {
			return Err(ParamError::OrdinalOutOfRange {
				ordinal: value.ordinal,
				count: values.len(),
			});
		}
		params[value.ordinal - 1] = value.value.to_param();
	}
	Ok(params)
}

#[cfg(test)]
mod tests {
	use chrono::TimeZone;

	use super::*;

	#[test]
	fn test_param_rendering() {
		assert_eq!(Value::Null.to_param(), "");
		assert_eq!(Value::from(4).to_param(), "4");
		assert_eq!(Value::from(2.5).to_param(), "2.5");
		assert_eq!(Value::from(true).to_param(), "1");
		assert_eq!(Value::from(false).to_param(), "0");
		assert_eq!(Value::from("alice").to_param(), "alice");
		assert_eq!(Value::from(b"raw".to_vec()).to_param(), "raw");
		assert_eq!(Value::from(None::<i64>), Value::Null);

		let ts = Utc.with_ymd_and_hms(2024, 3, 1, 10, 20, 30).unwrap();
		assert_eq!(Value::from(ts).to_param(), "2024-03-01T10:20:30Z");
	}

	#[test]
	fn test_out_of_order_ordinals() {
		let params = named_values_to_params(&[
			NamedValue::new(3, "c"),
			NamedValue::new(1, "a"),
			NamedValue::new(2, "b"),
		])
		.unwrap();
		assert_eq!(params, vec!["a", "b", "c"]);
	}

	#[test]
	fn test_ordinal_below_one() {
		let err = named_values_to_params(&[NamedValue::named("id", 0, 7)]).unwrap_err();
		assert_eq!(
			err,
			ParamError::OrdinalBelowOne {
				name: "id".to_string(),
				value: "7".to_string()
			}
		);
	}

	#[test]
	fn test_ordinal_beyond_count() {
		let err = named_values_to_params(&[NamedValue::new(2, "x")]).unwrap_err();
		assert_eq!(
			err,
			ParamError::OrdinalOutOfRange {
				ordinal: 2,
				count: 1
			}
		);
	}

	#[test]
	fn test_positional() {
		let values = NamedValue::positional(&[Value::from("bob"), Value::from(42)]);
		assert_eq!(named_values_to_params(&values).unwrap(), vec!["bob", "42"]);
	}
}
