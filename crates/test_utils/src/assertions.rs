//! Custom Test Assertions
//!
//! Provides assertion helpers for statements and stored records that give
//! more meaningful error messages than standard assertions.

use chrono::{DateTime, Utc};
use mapping_core::Statement;

/// Asserts that a statement's SQL matches exactly
pub fn assert_sql(statement: &Statement, expected: &str) {
    assert_eq!(
        statement.sql, expected,
        "Unexpected SQL: actual={}, expected={}",
        statement.sql, expected
    );
}

/// Asserts that a statement does not assign a column in its SET clause
///
/// # Panics
///
/// Panics if the statement is not an UPDATE or assigns `column`
pub fn assert_not_assigned(statement: &Statement, column: &str) {
    let set_clause = statement
        .sql
        .split(" SET ")
        .nth(1)
        .and_then(|rest| rest.split(" WHERE ").next())
        .unwrap_or_else(|| panic!("Expected an UPDATE statement, got {}", statement.sql));

    let assigned: Vec<&str> = set_clause
        .split(", ")
        .filter_map(|assignment| assignment.split('=').next())
        .collect();

    assert!(
        !assigned.contains(&column),
        "Column {} must not be assigned, SET clause: {}",
        column,
        set_clause
    );
}

/// Asserts that two timestamps agree to the microsecond
///
/// PostgreSQL stores microseconds; anything finer is lost on the round trip.
pub fn assert_same_instant(actual: DateTime<Utc>, expected: DateTime<Utc>) {
    let diff = (actual - expected).num_microseconds().unwrap_or(i64::MAX).abs();
    assert!(
        diff < 1,
        "Timestamps differ: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts that a timestamp lies within `[from, to]`
pub fn assert_between(actual: DateTime<Utc>, from: DateTime<Utc>, to: DateTime<Utc>) {
    assert!(
        actual >= from && actual <= to,
        "Timestamp {} outside [{}, {}]",
        actual,
        from,
        to
    );
}
