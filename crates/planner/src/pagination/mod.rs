//! Offset and cursor pagination over any [`QueryCapability`].
//!
//! ```text
//! let mut rows = Vec::new();
//! let next = paginate(&table, &Page::cursor("id", "id", 50), &mut rows)?;
//! // ... hand `next` back to the client; replay it for the following page.
//! ```

use crate::{capability::QueryCapability, error::PaginationError};
use model::{
    pagination::{mode::Mode, page::Page},
    records::{record::Record, sequence::Sequence},
};

mod cursor;
mod offset;

/// Fetches the page described by `page` into `dest` and returns the descriptor
/// of the following page.
///
/// `page` is never modified. Records are appended to `dest`; only the records
/// appended by this call are inspected. The returned descriptor is valid only
/// on `Ok`.
pub fn paginate<C, S>(
    capability: &C,
    page: &Page,
    dest: &mut S,
) -> Result<Page, PaginationError<C::Error>>
where
    C: QueryCapability + ?Sized,
    C::Record: Record,
    S: Sequence<Item = C::Record>,
{
    validate(page)?;

    match page.mode {
        Mode::Offset => offset::fetch_offset_page(capability, page, dest),
        Mode::Cursor => cursor::fetch_cursor_page(capability, page, dest),
    }
}

/// Checks a descriptor before any query is issued.
pub fn validate<E>(page: &Page) -> Result<(), PaginationError<E>> {
    if page.limit == 0 {
        return Err(PaginationError::InvalidLimit(page.limit));
    }
    if page.order_by.trim().is_empty() {
        return Err(PaginationError::MissingOrderField);
    }
    if page.mode == Mode::Cursor && page.cursor.field.trim().is_empty() {
        return Err(PaginationError::MissingCursorField);
    }
    Ok(())
}

/// One fetched page together with the descriptor for the page after it.
#[derive(Debug, Clone)]
pub struct PageResult<R> {
    pub records: Vec<R>,
    pub next: Page,
}

/// Walks every page starting from a first descriptor.
///
/// Yields pages until one reports `has_next = false` (that page included) or
/// an error occurs; an error ends the walk.
pub struct Pages<'a, C: ?Sized> {
    capability: &'a C,
    page: Option<Page>,
}

impl<'a, C> Pages<'a, C>
where
    C: QueryCapability + ?Sized,
    C::Record: Record,
{
    pub fn new(capability: &'a C, first: Page) -> Self {
        Self {
            capability,
            page: Some(first),
        }
    }
}

impl<C> Iterator for Pages<'_, C>
where
    C: QueryCapability + ?Sized,
    C::Record: Record,
{
    type Item = Result<PageResult<C::Record>, PaginationError<C::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        let page = self.page.take()?;
        let mut records = Vec::new();
        match paginate(self.capability, &page, &mut records) {
            Ok(next) => {
                if next.has_next {
                    self.page = Some(next.clone());
                }
                Some(Ok(PageResult { records, next }))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Shorthand for [`Pages::new`].
pub fn pages<C>(capability: &C, first: Page) -> Pages<'_, C>
where
    C: QueryCapability + ?Sized,
    C::Record: Record,
{
    Pages::new(capability, first)
}
