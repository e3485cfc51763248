//! Defines common, reusable AST nodes for building SQL queries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(name: &str) -> Self {
        TableRef {
            schema: None,
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderDir {
    #[default]
    Asc,
    Desc,
}

impl OrderDir {
    /// Descending when `reverse` is set, ascending otherwise.
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse { OrderDir::Desc } else { OrderDir::Asc }
    }
}
