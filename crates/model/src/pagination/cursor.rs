use crate::core::value::Value;
use serde::{Deserialize, Serialize};

/// Seek position for cursor pagination.
///
/// `value` is the ordering value of the last record on the previous page, or
/// `None` before the first page. `field` names the record field the next value
/// is read from; it usually mirrors the ordering column but need not be spelled
/// the same way (e.g. column `date_creation`, record field `DateCreation`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Cursor {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub field: String,
}

impl Cursor {
    pub fn new(field: impl Into<String>) -> Self {
        Cursor {
            value: None,
            field: field.into(),
        }
    }

    /// True before the first page has been fetched.
    pub fn is_start(&self) -> bool {
        self.value.is_none()
    }
}
