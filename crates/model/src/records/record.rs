use crate::core::value::Value;

/// Named field access over a result record.
///
/// Cursor pagination reads the seek value for the next page off the last
/// record of a page, so every record type paged in cursor mode must expose
/// its fields by name. Unknown names yield `None`.
pub trait Record {
    fn field(&self, name: &str) -> Option<Value>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}
