// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
	/// INSERT, REPLACE, UPDATE or DELETE
	Mutation,
	/// Everything else, answered with a row set
	Projection,
}

/// Classify a statement by its leading keyword.
///
/// Leading whitespace, `--` and `/* */` comments and opening parentheses are
/// skipped. Only the first keyword is inspected, so `WITH ... INSERT` is a
/// projection.
pub fn classify(sql: &str) -> StatementKind {
	let keyword = leading_keyword(sql);
	if ["INSERT", "REPLACE", "UPDATE", "DELETE"].iter().any(|k| k.eq_ignore_ascii_case(keyword)) {
		StatementKind::Mutation
	} else {
		StatementKind::Projection
	}
}

fn leading_keyword(sql: &str) -> &str {
	let mut rest = sql;
	loop {
		let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '(');
		if let Some(comment) = trimmed.strip_prefix("--") {
			rest = comment.find('\n').map(|end| &comment[end + 1..]).unwrap_or("");
		} else if let Some(comment) = trimmed.strip_prefix("/*") {
			rest = comment.find("*/").map(|end| &comment[end + 2..]).unwrap_or("");
		} else {
			rest = trimmed;
			break;
		}
	}

	let end = rest.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(rest.len());
	&rest[..end]
}

#[cfg(test)]
mod tests {
	use super::{StatementKind::*, *};

	#[test]
	fn test_mutations() {
		assert_eq!(classify("INSERT INTO t VALUES (1)"), Mutation);
		assert_eq!(classify("replace into t values (1)"), Mutation);
		assert_eq!(classify("  Update t SET name = ? WHERE id = ?"), Mutation);
		assert_eq!(classify("delete from t"), Mutation);
	}

	#[test]
	fn test_projections() {
		assert_eq!(classify("SELECT square(?)"), Projection);
		assert_eq!(classify("CREATE TABLE t (id INTEGER)"), Projection);
		assert_eq!(classify("PRAGMA table_info(t)"), Projection);
		assert_eq!(classify("WITH x AS (SELECT 1) SELECT * FROM x"), Projection);
		assert_eq!(classify(""), Projection);
	}

	#[test]
	fn test_skips_comments_and_parentheses() {
		assert_eq!(classify("-- bump\nUPDATE t SET n = n + 1"), Mutation);
		assert_eq!(classify("/* batch */ INSERT INTO t VALUES (1)"), Mutation);
		assert_eq!(classify("((SELECT 1))"), Projection);
		assert_eq!(classify("/* unterminated"), Projection);
	}

	#[test]
	fn test_keyword_prefix_is_not_enough() {
		assert_eq!(classify("INSERTED"), Projection);
		assert_eq!(classify("updates"), Projection);
	}
}
