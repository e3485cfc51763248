use crate::{
    core::value::Value,
    pagination::{cursor::Cursor, mode::Mode},
};
use serde::{Deserialize, Serialize};

/// Request/response descriptor for one page.
///
/// The caller builds the first page; every paginate call hands back a fresh
/// descriptor for the following page. `count` and `has_next` are outputs and
/// are ignored on input.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page {
    #[serde(default)]
    pub mode: Mode,

    /// Records to skip (offset mode only).
    #[serde(default)]
    pub offset: u64,

    /// Seek position (cursor mode only).
    #[serde(default)]
    pub cursor: Cursor,

    /// Column used for ORDER BY in both modes and for the seek predicate in
    /// cursor mode.
    pub order_by: String,

    /// Descending order; in cursor mode also flips `>` to `<`.
    #[serde(default)]
    pub reverse: bool,

    /// Requested page size.
    pub limit: u64,

    /// Total matching records, populated by offset mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,

    #[serde(default)]
    pub has_next: bool,
}

impl Page {
    /// First page of an offset walk.
    pub fn offset(order_by: impl Into<String>, limit: u64) -> Self {
        Page {
            mode: Mode::Offset,
            offset: 0,
            cursor: Cursor::default(),
            order_by: order_by.into(),
            reverse: false,
            limit,
            count: None,
            has_next: false,
        }
    }

    /// First page of a cursor walk ordered by `order_by`, reading the next seek
    /// value from `cursor_field`.
    pub fn cursor(order_by: impl Into<String>, cursor_field: impl Into<String>, limit: u64) -> Self {
        Page {
            mode: Mode::Cursor,
            cursor: Cursor::new(cursor_field),
            ..Page::offset(order_by, limit)
        }
    }

    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn starting_at(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn after(mut self, value: impl Into<Value>) -> Self {
        self.cursor.value = Some(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_page_defaults() {
        let page = Page::cursor("id", "ID", 2);
        assert_eq!(page.mode, Mode::Cursor);
        assert_eq!(page.cursor.field, "ID");
        assert!(page.cursor.is_start());
        assert_eq!(page.offset, 0);
        assert!(!page.reverse);
    }

    #[test]
    fn test_replay_through_json() {
        let page = Page::cursor("id", "id", 10).reversed(true).after(42_i64);
        let json = serde_json::to_string(&page).unwrap();
        let back: Page = serde_json::from_str(&json).unwrap();
        assert_eq!(back, page);
        assert_eq!(back.cursor.value, Some(Value::Int(42)));
    }

    #[test]
    fn test_minimal_json_defaults_to_offset() {
        let page: Page = serde_json::from_str(r#"{"order_by":"id","limit":5}"#).unwrap();
        assert_eq!(page.mode, Mode::Offset);
        assert_eq!(page.offset, 0);
        assert_eq!(page.count, None);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let err = serde_json::from_str::<Page>(r#"{"mode":"keyset","order_by":"id","limit":5}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown pagination mode"));
    }
}
