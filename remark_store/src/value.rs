use std::fmt::{self, Display, Formatter, Write};

/// Statement argument or column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL`.
    Null,
    /// Integer value.
    Integer(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// Binary value.
    Bytes(Vec<u8>),
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(value) => value.fmt(f),
            Self::Float(value) => value.fmt(f),
            Self::String(value) => {
                f.write_char('"')?;
                value.fmt(f)?;
                f.write_char('"')
            }
            Self::Bytes(value) => write!(f, "<{} bytes>", value.len()),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

macro_rules! impl_from_integer {
    ( $( $source:ty ),* $(,)? ) => {
        $(impl From<$source> for Value {
            fn from(value: $source) -> Self {
                Self::Integer(value.into())
            }
        })*
    };
}
impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

#[cfg(feature = "sqlite")]
const _: () = {
    use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};

    impl ToSql for Value {
        fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
            Ok(match self {
                Self::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
                Self::Integer(value) => ToSqlOutput::from(*value),
                Self::Float(value) => ToSqlOutput::from(*value),
                Self::String(value) => ToSqlOutput::from(value.as_str()),
                Self::Bytes(value) => ToSqlOutput::from(value.as_slice()),
            })
        }
    }

    impl From<ValueRef<'_>> for Value {
        fn from(value: ValueRef<'_>) -> Self {
            match value {
                ValueRef::Null => Self::Null,
                ValueRef::Integer(value) => Self::Integer(value),
                ValueRef::Real(value) => Self::Float(value),
                ValueRef::Text(value) => Self::String(String::from_utf8_lossy(value).into_owned()),
                ValueRef::Blob(value) => Self::Bytes(value.to_vec()),
            }
        }
    }
};
