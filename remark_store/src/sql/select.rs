use itertools::Itertools;

use crate::{
    sql::{
        SqlArgumentStyle, SqlDialect, SqlStatement,
        utility::{get_argument_list, get_argument_parameter},
    },
    value::Value,
};

/// Builder for filtered and paginated `SELECT` statements.
///
/// Starts from an always true predicate and ANDs one clause per added filter,
/// in the order the filters are added. Placeholders are numbered while the
/// statement is rendered, so their order always matches the argument order.
#[derive(Debug, Clone)]
pub struct SqlSelectBuilder {
    dialect: SqlDialect,
    argument_style: SqlArgumentStyle,
    table: String,
    columns: Vec<String>,
    predicates: Vec<Predicate>,
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Debug, Clone)]
enum Predicate {
    Equal { column: String, argument: Value },
    In { column: String, arguments: Vec<Value> },
}

impl SqlSelectBuilder {
    pub fn new<S: Into<String>>(dialect: SqlDialect, table: S) -> Self {
        Self {
            dialect,
            argument_style: dialect.argument_style(),
            table: table.into(),
            columns: Vec::new(),
            predicates: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Sets the selected columns. Selects `*` if never set.
    pub fn set_columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Adds `column = argument`.
    pub fn filter_equal<S, V>(&mut self, column: S, argument: V) -> &mut Self
    where
        S: Into<String>,
        V: Into<Value>,
    {
        self.predicates.push(Predicate::Equal {
            column: column.into(),
            argument: argument.into(),
        });
        self
    }

    /// Adds `column = argument` only if the argument is present.
    pub fn filter_equal_opt<S, V>(&mut self, column: S, argument: Option<V>) -> &mut Self
    where
        S: Into<String>,
        V: Into<Value>,
    {
        if let Some(argument) = argument {
            self.filter_equal(column, argument);
        }
        self
    }

    /// Adds `column IN (...)` with one placeholder per argument.
    /// An empty argument list matches nothing.
    pub fn filter_in<S, I, V>(&mut self, column: S, arguments: I) -> &mut Self
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.predicates.push(Predicate::In {
            column: column.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn set_limit(&mut self, limit: Option<u32>) -> &mut Self {
        self.limit = limit.map(i64::from);
        self
    }

    pub fn set_offset(&mut self, offset: Option<u32>) -> &mut Self {
        self.offset = offset.map(i64::from);
        self
    }

    pub fn build(&self) -> SqlStatement {
        let mut arguments = Vec::new();

        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.iter().join(", ")
        };
        let mut sql = format!("SELECT {columns} FROM {} WHERE 1=1", self.table);

        for predicate in &self.predicates {
            match predicate {
                Predicate::Equal { column, argument } => {
                    arguments.push(argument.clone());
                    sql.push_str(&format!(
                        " AND {column} = {}",
                        get_argument_parameter(&self.argument_style, arguments.len())
                    ));
                }
                Predicate::In {
                    arguments: in_arguments,
                    ..
                } if in_arguments.is_empty() => {
                    sql.push_str(" AND 1=0");
                }
                Predicate::In {
                    column,
                    arguments: in_arguments,
                } => {
                    let placeholders = get_argument_list(
                        &self.argument_style,
                        arguments.len(),
                        in_arguments.len(),
                    );
                    arguments.extend(in_arguments.iter().cloned());
                    sql.push_str(&format!(" AND {column} IN ({placeholders})"));
                }
            }
        }

        match (self.limit, self.offset) {
            (Some(limit), offset) => {
                arguments.push(limit.into());
                sql.push_str(&format!(
                    " LIMIT {}",
                    get_argument_parameter(&self.argument_style, arguments.len())
                ));
                if let Some(offset) = offset {
                    self.push_offset(&mut sql, &mut arguments, offset);
                }
            }
            (None, Some(offset)) => {
                // SQLite only accepts OFFSET after LIMIT, and a negative LIMIT
                // means no limit.
                if self.dialect == SqlDialect::Sqlite {
                    sql.push_str(" LIMIT -1");
                }
                self.push_offset(&mut sql, &mut arguments, offset);
            }
            (None, None) => {}
        }

        SqlStatement { sql, arguments }
    }

    fn push_offset(&self, sql: &mut String, arguments: &mut Vec<Value>, offset: i64) {
        arguments.push(offset.into());
        sql.push_str(&format!(
            " OFFSET {}",
            get_argument_parameter(&self.argument_style, arguments.len())
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let statement = SqlSelectBuilder::new(SqlDialect::Sqlite, "comments")
            .set_columns(["id", "page_id"])
            .filter_equal_opt("author_id", None::<String>)
            .filter_equal_opt("page_id", Some("p1"))
            .filter_equal("comment_id", "c")
            .set_limit(Some(10))
            .set_offset(Some(20))
            .build();
        assert_eq!(
            statement.sql,
            "SELECT id, page_id FROM comments WHERE 1=1 AND page_id = ? AND comment_id = ? LIMIT ? OFFSET ?"
        );
        assert_eq!(
            statement.arguments,
            vec!["p1".into(), "c".into(), 10.into(), 20.into()]
        );
    }

    #[test]
    fn unfiltered() {
        let statement = SqlSelectBuilder::new(SqlDialect::Sqlite, "authors").build();
        assert_eq!(statement.sql, "SELECT * FROM authors WHERE 1=1");
        assert!(statement.arguments.is_empty());
    }

    #[test]
    fn indexed() {
        let statement = SqlSelectBuilder::new(SqlDialect::Postgres, "comments")
            .filter_equal("author_id", "a")
            .filter_in("page_id", ["p1", "p2"])
            .set_limit(Some(5))
            .build();
        assert_eq!(
            statement.sql,
            "SELECT * FROM comments WHERE 1=1 AND author_id = $1 AND page_id IN ($2, $3) LIMIT $4"
        );
        assert_eq!(
            statement.arguments,
            vec!["a".into(), "p1".into(), "p2".into(), 5.into()]
        );
    }

    #[test]
    fn offset_without_limit() {
        let statement = SqlSelectBuilder::new(SqlDialect::Sqlite, "comments")
            .set_offset(Some(3))
            .build();
        assert_eq!(
            statement.sql,
            "SELECT * FROM comments WHERE 1=1 LIMIT -1 OFFSET ?"
        );
        assert_eq!(statement.arguments, vec![3.into()]);

        let statement = SqlSelectBuilder::new(SqlDialect::Postgres, "comments")
            .set_offset(Some(3))
            .build();
        assert_eq!(statement.sql, "SELECT * FROM comments WHERE 1=1 OFFSET $1");
    }

    #[test]
    fn empty_in() {
        let statement = SqlSelectBuilder::new(SqlDialect::Sqlite, "authors")
            .filter_in("id", Vec::<String>::new())
            .build();
        assert_eq!(
            statement.sql,
            "SELECT * FROM authors WHERE 1=1 AND 1=0"
        );
        assert!(statement.arguments.is_empty());
    }

    #[test]
    fn values_stay_out_of_text() {
        let statement = SqlSelectBuilder::new(SqlDialect::Sqlite, "comments")
            .filter_equal("page_id", "p1' OR '1'='1")
            .build();
        assert!(!statement.sql.contains("OR '1'"));
        assert_eq!(statement.arguments, vec!["p1' OR '1'='1".into()]);
    }
}
