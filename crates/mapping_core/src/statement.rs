//! SQL statement generation
//!
//! Builds the five single-table statements the repository issues. Every value,
//! including the primary key, is passed as a positional `$n` parameter.

use std::fmt;

use crate::value::Value;

/// A SQL text with its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Statement builder for one table and primary key
#[derive(Debug, Clone, Copy)]
pub struct StatementBuilder<'a> {
    table: &'a str,
    primary_key: &'a str,
}

impl<'a> StatementBuilder<'a> {
    pub fn new(table: &'a str, primary_key: &'a str) -> Self {
        Self { table, primary_key }
    }

    /// `SELECT * FROM <table>`
    pub fn select_all(&self) -> Statement {
        Statement::new(format!("SELECT * FROM {}", self.table), Vec::new())
    }

    /// `SELECT * FROM <table> WHERE <pk>=$1`
    pub fn select_by_id(&self, key: Value) -> Statement {
        Statement::new(
            format!("SELECT * FROM {} WHERE {}=$1", self.table, self.primary_key),
            vec![key],
        )
    }

    /// `INSERT INTO <table> (<cols>) VALUES ($1, …) RETURNING <pk>, <cols>`
    ///
    /// `fields` must already exclude the primary key.
    pub fn insert(&self, fields: Vec<(&str, Value)>) -> Statement {
        let (columns, params): (Vec<&str>, Vec<Value>) = fields.into_iter().unzip();
        if columns.is_empty() {
            let sql = format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", self.table, self.primary_key);
            return Statement::new(sql, params);
        }
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            self.table,
            columns.join(", "),
            placeholders.join(", "),
            self.returning(&columns)
        );
        Statement::new(sql, params)
    }

    /// `UPDATE <table> SET <c1>=$1, … WHERE <pk>=$n+1 RETURNING <pk>, <cols>`
    ///
    /// `fields` must already exclude the primary key; `key` is bound last.
    /// With no fields the key is assigned to itself, so the statement changes
    /// nothing but still returns the row.
    pub fn update(&self, fields: Vec<(&str, Value)>, key: Value) -> Statement {
        let (columns, mut params): (Vec<&str>, Vec<Value>) = fields.into_iter().unzip();
        let mut assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{}=${}", column, i + 1))
            .collect();
        if assignments.is_empty() {
            assignments.push(format!("{0}={0}", self.primary_key));
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE {}=${} RETURNING {}",
            self.table,
            assignments.join(", "),
            self.primary_key,
            columns.len() + 1,
            self.returning(&columns)
        );
        params.push(key);
        Statement::new(sql, params)
    }

    /// `DELETE FROM <table> WHERE <pk>=$1`
    pub fn delete(&self, key: Value) -> Statement {
        Statement::new(
            format!("DELETE FROM {} WHERE {}=$1", self.table, self.primary_key),
            vec![key],
        )
    }

    fn returning(&self, columns: &[&str]) -> String {
        std::iter::once(self.primary_key)
            .chain(columns.iter().copied())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> StatementBuilder<'static> {
        StatementBuilder::new("applications", "id")
    }

    #[test]
    fn test_select_statements() {
        let stmt = builder().select_all();
        assert_eq!(stmt.sql, "SELECT * FROM applications");
        assert!(stmt.params.is_empty());

        let stmt = builder().select_by_id(Value::Integer(2));
        assert_eq!(stmt.sql, "SELECT * FROM applications WHERE id=$1");
        assert_eq!(stmt.params, vec![Value::Integer(2)]);
    }

    #[test]
    fn test_insert_without_columns_uses_defaults() {
        let stmt = builder().insert(Vec::new());
        assert_eq!(stmt.sql, "INSERT INTO applications DEFAULT VALUES RETURNING id");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_insert_statement() {
        let stmt = builder().insert(vec![
            ("name", Value::from("new-app")),
            ("namespace", Value::from("staging")),
        ]);

        assert_eq!(
            stmt.sql,
            "INSERT INTO applications (name, namespace) VALUES ($1, $2) RETURNING id, name, namespace"
        );
        assert_eq!(stmt.params.len(), 2);
    }

    #[test]
    fn test_update_binds_key_last() {
        let stmt = builder().update(
            vec![("name", Value::from("app")), ("helm_version", Value::from("v3"))],
            Value::Integer(7),
        );

        assert_eq!(
            stmt.sql,
            "UPDATE applications SET name=$1, helm_version=$2 WHERE id=$3 RETURNING id, name, helm_version"
        );
        assert_eq!(stmt.params.last(), Some(&Value::Integer(7)));
        assert!(!stmt.sql.contains("'7'"));
    }

    #[test]
    fn test_update_without_columns_is_no_op() {
        let stmt = builder().update(Vec::new(), Value::Integer(7));

        assert_eq!(stmt.sql, "UPDATE applications SET id=id WHERE id=$1 RETURNING id");
        assert_eq!(stmt.params, vec![Value::Integer(7)]);
    }

    #[test]
    fn test_delete_statement() {
        let stmt = builder().delete(Value::Integer(4));
        assert_eq!(stmt.sql, "DELETE FROM applications WHERE id=$1");
        assert_eq!(stmt.to_string(), stmt.sql);
    }
}
