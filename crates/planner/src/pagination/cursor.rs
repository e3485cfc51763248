use crate::{
    capability::QueryCapability,
    error::PaginationError,
    query::{
        ast::common::OrderDir,
        spec::{CompareOp, QuerySpec},
    },
};
use model::{
    pagination::page::Page,
    records::{record::Record, sequence::Sequence},
};
use tracing::trace;

/// Fetches one cursor page and derives the descriptor of the page after it.
///
/// One record more than `limit` is requested; if it arrives it is dropped from
/// `dest` and signals that another page exists.
///
/// Records sharing the same ordering value across a page boundary may be
/// skipped, since the seek predicate is strict and has no tie-breaker.
pub(super) fn fetch_cursor_page<C, S>(
    capability: &C,
    page: &Page,
    dest: &mut S,
) -> Result<Page, PaginationError<C::Error>>
where
    C: QueryCapability + ?Sized,
    C::Record: Record,
    S: Sequence<Item = C::Record>,
{
    let probe_limit = page
        .limit
        .checked_add(1)
        .ok_or(PaginationError::InvalidLimit(page.limit))?;

    let mut spec = QuerySpec::new();
    if let Some(value) = &page.cursor.value {
        spec = spec.filter(&page.order_by, CompareOp::seek(page.reverse), value.clone());
    }
    let spec = spec
        .order_by(&page.order_by, OrderDir::from_reverse(page.reverse))
        .limit(probe_limit);

    let before = dest.len();
    capability
        .fetch(&spec, dest)
        .map_err(PaginationError::Capability)?;
    let mut fetched = dest.len().saturating_sub(before) as u64;

    let mut next = page.clone();
    next.has_next = fetched == probe_limit;
    if next.has_next {
        dest.pop_last();
        fetched -= 1;
    }

    next.cursor.value = if fetched == 0 {
        None
    } else {
        dest.last_field(&page.cursor.field)?
    };

    trace!(
        limit = page.limit,
        fetched,
        has_next = next.has_next,
        cursor = ?next.cursor.value,
        "cursor page fetched"
    );

    Ok(next)
}
