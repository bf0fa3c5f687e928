//! Predicate compiler for parameterized filter queries.
//!
//! # Responsibility
//! - Turn `{column, operator, value}` clauses into a WHERE conjunction.
//! - Keep every value out of the SQL text; values travel as named params.
//!
//! # Invariants
//! - Compiled SQL never contains a predicate value.
//! - Column tokens are plain identifiers; operators come from a closed set.
//! - An empty predicate list compiles to the base query unchanged.
//! - Conjunction only: no OR, no grouping.

use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;
use rusqlite::ToSql;
use std::error::Error;
use std::fmt::{Display, Formatter};

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Comparison operators accepted by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
}

impl Operator {
    /// SQL token emitted for this operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Like => "LIKE",
        }
    }

    /// Parses the textual operator form (`=`, `!=`, `<>`, `<`, `<=`, `>`, `>=`, `like`).
    pub fn parse(value: &str) -> Result<Self, QueryError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "=" | "==" => Ok(Self::Eq),
            "!=" | "<>" => Ok(Self::Ne),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "like" => Ok(Self::Like),
            _ => Err(QueryError::UnsupportedOperator(value.to_string())),
        }
    }
}

/// One filter clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
}

impl Predicate {
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Shorthand for an equality clause.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Operator::Eq, value)
    }

    /// Builds a clause from its loosely-typed wire shape.
    pub fn parse(
        column: impl Into<String>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Self, QueryError> {
        Ok(Self::new(column, Operator::parse(operator)?, value))
    }
}

/// Query text plus its named parameter bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<(String, Value)>,
}

impl CompiledQuery {
    /// Parameter slice in the shape `Statement::query` accepts.
    pub fn named_params(&self) -> Vec<(&str, &dyn ToSql)> {
        self.params
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect()
    }
}

/// Compiles `base_sql` plus an AND-conjunction of `predicates`.
///
/// `base_sql` must be a complete SELECT without a trailing WHERE or `;`.
pub fn compile(base_sql: &str, predicates: &[Predicate]) -> Result<CompiledQuery, QueryError> {
    let mut sql = base_sql.trim_end().trim_end_matches(';').to_string();
    let mut params = Vec::with_capacity(predicates.len());
    let mut clauses = Vec::with_capacity(predicates.len());

    for (index, predicate) in predicates.iter().enumerate() {
        if !is_identifier(&predicate.column) {
            return Err(QueryError::InvalidColumn(predicate.column.clone()));
        }
        let name = format!(":p{}", index + 1);
        clauses.push(format!(
            "{} {} {}",
            predicate.column,
            predicate.operator.as_sql(),
            name
        ));
        params.push((name, predicate.value.clone()));
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    Ok(CompiledQuery { sql, params })
}

pub fn is_identifier(value: &str) -> bool {
    IDENTIFIER_RE.is_match(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidColumn(String),
    UnknownColumn {
        table: &'static str,
        column: String,
    },
    UnsupportedOperator(String),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidColumn(column) => write!(f, "column is not a plain identifier: {column}"),
            Self::UnknownColumn { table, column } => {
                write!(f, "column `{column}` does not exist on `{table}`")
            }
            Self::UnsupportedOperator(op) => write!(f, "filter operator is unsupported: {op}"),
        }
    }
}

impl Error for QueryError {}

#[cfg(test)]
mod tests {
    use super::{compile, Operator, Predicate, QueryError};
    use rusqlite::types::Value;

    const BASE: &str = "SELECT id, name, price FROM games";

    #[test]
    fn empty_predicates_keep_base_query() {
        let compiled = compile(BASE, &[]).unwrap();
        assert_eq!(compiled.sql, BASE);
        assert!(compiled.params.is_empty());
    }

    #[test]
    fn joins_clauses_with_and_and_names_params_by_position() {
        let compiled = compile(
            BASE,
            &[
                Predicate::eq("name", "csgo".to_string()),
                Predicate::new("price", Operator::Gt, 1.5),
            ],
        )
        .unwrap();

        assert_eq!(
            compiled.sql,
            "SELECT id, name, price FROM games WHERE name = :p1 AND price > :p2"
        );
        assert_eq!(
            compiled.params,
            vec![
                (":p1".to_string(), Value::Text("csgo".to_string())),
                (":p2".to_string(), Value::Real(1.5)),
            ]
        );
    }

    #[test]
    fn repeated_column_gets_distinct_params() {
        let compiled = compile(
            BASE,
            &[
                Predicate::new("price", Operator::Ge, 1.0),
                Predicate::new("price", Operator::Le, 10.0),
            ],
        )
        .unwrap();
        assert!(compiled.sql.ends_with("price >= :p1 AND price <= :p2"));
        assert_eq!(compiled.named_params().len(), 2);
    }

    #[test]
    fn values_never_reach_sql_text() {
        let hostile = "x'; DROP TABLE games; --";
        let compiled = compile(BASE, &[Predicate::eq("name", hostile.to_string())]).unwrap();
        assert!(!compiled.sql.contains(hostile));
        assert!(!compiled.sql.contains("DROP"));
    }

    #[test]
    fn rejects_non_identifier_columns() {
        let err = compile(BASE, &[Predicate::eq("name = name OR 1", 1)]).unwrap_err();
        assert!(matches!(err, QueryError::InvalidColumn(_)));
    }

    #[test]
    fn parses_textual_operators() {
        assert_eq!(Operator::parse("<>").unwrap(), Operator::Ne);
        assert_eq!(Operator::parse(" LIKE ").unwrap(), Operator::Like);
        let predicate = Predicate::parse("price", ">", 0).unwrap();
        assert_eq!(predicate.operator, Operator::Gt);
        assert_eq!(predicate.value, Value::Integer(0));
        assert_eq!(
            Operator::parse("; --").unwrap_err(),
            QueryError::UnsupportedOperator("; --".to_string())
        );
    }
}
