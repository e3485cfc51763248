//! Generic access to the destination container a page is fetched into.
//!
//! The paginator is written once for every record shape; all it needs from the
//! destination is its length, the value of a named field on the last record,
//! and the ability to drop the over-fetched tail record in place.

use crate::{core::value::Value, records::record::Record};
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// The record type has no field with the requested name.
    #[error("record has no field named '{field}'")]
    UnknownField { field: String },
}

/// An ordered, appendable container of uniform records.
pub trait Sequence {
    type Item;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, item: Self::Item);

    /// Removes and returns the last record, truncating the container in place.
    /// Returns `None` when the container is empty.
    fn pop_last(&mut self) -> Option<Self::Item>;

    fn last(&self) -> Option<&Self::Item>;

    /// Reads `field` off the last record; `Ok(None)` when the container is empty.
    fn last_field(&self, field: &str) -> Result<Option<Value>, SequenceError>
    where
        Self::Item: Record,
    {
        match self.last() {
            None => Ok(None),
            Some(record) => record
                .field(field)
                .map(Some)
                .ok_or_else(|| SequenceError::UnknownField {
                    field: field.to_string(),
                }),
        }
    }
}

impl<T> Sequence for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn push(&mut self, item: T) {
        Vec::push(self, item);
    }

    fn pop_last(&mut self) -> Option<T> {
        self.pop()
    }

    fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }
}

impl<T> Sequence for VecDeque<T> {
    type Item = T;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn push(&mut self, item: T) {
        self.push_back(item);
    }

    fn pop_last(&mut self) -> Option<T> {
        self.pop_back()
    }

    fn last(&self) -> Option<&T> {
        self.back()
    }
}

impl<S: Sequence + ?Sized> Sequence for &mut S {
    type Item = S::Item;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn push(&mut self, item: Self::Item) {
        (**self).push(item);
    }

    fn pop_last(&mut self) -> Option<Self::Item> {
        (**self).pop_last()
    }

    fn last(&self) -> Option<&Self::Item> {
        (**self).last()
    }
}
