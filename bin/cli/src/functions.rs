// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SQL functions the demo client serves to the server.

use sqliteog_client::Driver;
use tracing::warn;

pub fn register(driver: Driver) -> Driver {
	driver.with_function("square", square).with_function("django_datetime_trunc", django_datetime_trunc)
}

/// Integer square of the first argument; empty when it is not an integer.
pub fn square(args: &[String]) -> Vec<String> {
	let Some(arg) = args.first() else {
		return vec![String::new()];
	};
	match arg.trim().parse::<i64>() {
		Ok(n) => vec![n.saturating_mul(n).to_string()],
		Err(_) => {
			warn!(arg = %arg, "cannot convert argument to integer");
			vec![String::new()]
		}
	}
}

/// Date part of a `YYYY-MM-DD HH:MM:SS` timestamp passed as second argument.
pub fn django_datetime_trunc(args: &[String]) -> Vec<String> {
	let date = args.get(1).and_then(|ts| ts.split(' ').next()).unwrap_or_default();
	vec![date.to_string()]
}

#[cfg(test)]
mod tests {
	use super::*;

	fn args(values: &[&str]) -> Vec<String> {
		values.iter().map(|v| v.to_string()).collect()
	}

	#[test]
	fn test_square() {
		assert_eq!(square(&args(&["4"])), vec!["16"]);
		assert_eq!(square(&args(&["-3"])), vec!["9"]);
		assert_eq!(square(&args(&["four"])), vec![""]);
		assert_eq!(square(&[]), vec![""]);
	}

	#[test]
	fn test_django_datetime_trunc() {
		assert_eq!(django_datetime_trunc(&args(&["day", "2024-05-06 07:08:09"])), vec!["2024-05-06"]);
		assert_eq!(django_datetime_trunc(&args(&["day", "2024-05-06"])), vec!["2024-05-06"]);
		assert_eq!(django_datetime_trunc(&args(&["day"])), vec![""]);
	}
}
