use remark_store::{error::StoreError, row::Row};
use serde::{Deserialize, Serialize};

use super::{AuthorId, get_optional_non_empty};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub email: String,
    /// Identity of the author in a system owned by the caller.
    pub external_id: Option<String>,
}

impl Author {
    pub const TABLE: &str = "authors";
    pub const COLUMNS: [&str; 4] = ["id", "name", "email", "external_id"];
}

impl TryFrom<&Row> for Author {
    type Error = StoreError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AuthorId::new(row.get_string("id")?),
            name: row.get_string("name")?,
            email: row.get_string("email")?,
            external_id: get_optional_non_empty(row, "external_id")?,
        })
    }
}
