//! Entities and response payloads.

use remark_store::{error::StoreResult, row::Row};

pub mod author;
pub mod comment;

pub use author::Author;
pub use comment::{Comment, EnrichedComment};

/// Defines an opaque string identifier newtype.
///
/// Ids created by this service are ULIDs, but ids read from the store or given
/// by callers are taken as they are.
macro_rules! impl_string_id {
    ( $( $name:ident ),* $(,)? ) => {
        $(
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: Into<String>>(id: S) -> Self {
                Self(id.into())
            }

            /// Creates a new id from the generator.
            pub fn generate(id_generator: &remark_common::id::generator::IdGenerator) -> Self {
                Self(id_generator.generate().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Creation time embedded in the id, if it is a generated one.
            pub fn create_time(&self) -> Option<time::OffsetDateTime> {
                self.0
                    .parse::<remark_common::id::Id>()
                    .ok()
                    .map(remark_common::id::Id::timestamp)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<remark_common::id::Id> for $name {
            fn from(id: remark_common::id::Id) -> Self {
                Self(id.to_string())
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.into())
            }
        }

        impl From<$name> for remark_store::value::Value {
            fn from(id: $name) -> Self {
                Self::String(id.0)
            }
        }

        impl From<&$name> for remark_store::value::Value {
            fn from(id: &$name) -> Self {
                Self::String(id.0.clone())
            }
        }
        )*
    };
}
impl_string_id!(AuthorId, CommentId);

/// Reads an optional text column where an empty string stands for absent.
pub(crate) fn get_optional_non_empty(row: &Row, column: &str) -> StoreResult<Option<String>> {
    Ok(row
        .get_optional_string(column)?
        .filter(|value| !value.is_empty()))
}

/// Treats an empty string as absent.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
