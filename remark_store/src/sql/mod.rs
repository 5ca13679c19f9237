//! SQL statement composition.
//!
//! Statements are always built from fixed text plus bound arguments. Values
//! never end up in statement text.

use crate::value::Value;

pub use select::SqlSelectBuilder;

mod select;
mod utility;

pub use utility::get_argument_parameter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlDialect {
    #[default]
    Sqlite,
    Postgres,
}

/// How argument placeholders are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlArgumentStyle {
    /// Numbered placeholders, e.g. `$1, $2`.
    Indexed { prefix: String },
    /// Anonymous placeholders bound by position, e.g. `?, ?`.
    Positional { symbol: String },
}

impl SqlDialect {
    pub fn argument_style(self) -> SqlArgumentStyle {
        match self {
            Self::Sqlite => SqlArgumentStyle::Positional { symbol: "?".into() },
            Self::Postgres => SqlArgumentStyle::Indexed { prefix: "$".into() },
        }
    }
}

/// A statement with its arguments, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub arguments: Vec<Value>,
}

impl SqlStatement {
    pub fn new<S: Into<String>>(sql: S, arguments: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            arguments,
        }
    }

    /// Creates a statement from a fixed template written with `?`
    /// placeholders, rewritten into the dialect's placeholder style.
    pub fn with_dialect(dialect: SqlDialect, template: &str, arguments: Vec<Value>) -> Self {
        let argument_style = dialect.argument_style();
        let mut sql = String::with_capacity(template.len());
        let mut argument = 0;
        for c in template.chars() {
            if c == '?' {
                argument += 1;
                sql.push_str(&get_argument_parameter(&argument_style, argument));
            } else {
                sql.push(c);
            }
        }
        Self { sql, arguments }
    }
}
