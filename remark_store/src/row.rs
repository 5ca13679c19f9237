use std::collections::BTreeMap;

use tracing::error;

use crate::{
    error::{StoreError, StoreResult},
    value::Value,
};

/// A single result row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column<S: Into<String>, V: Into<Value>>(mut self, name: S, value: V) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert<S: Into<String>, V: Into<Value>>(&mut self, name: S, value: V) {
        self.columns.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.get(name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Gets a required text column.
    ///
    /// # Errors
    ///
    /// A missing, `NULL` or non-text column is a store failure and surfaces as
    /// [`StoreError::QueryFailed`].
    pub fn get_string(&self, name: &str) -> StoreResult<String> {
        match self.columns.get(name) {
            Some(Value::String(value)) => Ok(value.clone()),
            other => {
                error!(column = name, value = ?other, "expected text column");
                Err(StoreError::QueryFailed)
            }
        }
    }

    /// Gets an optional text column. `NULL` reads as `None`.
    ///
    /// # Errors
    ///
    /// A missing or non-text column surfaces as [`StoreError::QueryFailed`].
    pub fn get_optional_string(&self, name: &str) -> StoreResult<Option<String>> {
        match self.columns.get(name) {
            Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            other => {
                error!(column = name, value = ?other, "expected nullable text column");
                Err(StoreError::QueryFailed)
            }
        }
    }
}

impl<S: Into<String>, V: Into<Value>> FromIterator<(S, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (S, V)>>(iter: T) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
