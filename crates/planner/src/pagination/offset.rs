use crate::{
    capability::QueryCapability,
    error::PaginationError,
    query::{ast::common::OrderDir, spec::QuerySpec},
};
use model::{pagination::page::Page, records::sequence::Sequence};
use tracing::trace;

/// Fetches one offset page and derives the descriptor of the page after it.
///
/// `has_next` is set when the page came back full. When the remaining rows are
/// an exact multiple of `limit` this reports one more page than exists; that
/// page is empty and reports `has_next = false`.
pub(super) fn fetch_offset_page<C, S>(
    capability: &C,
    page: &Page,
    dest: &mut S,
) -> Result<Page, PaginationError<C::Error>>
where
    C: QueryCapability + ?Sized,
    S: Sequence<Item = C::Record>,
{
    let spec = QuerySpec::new()
        .order_by(&page.order_by, OrderDir::from_reverse(page.reverse))
        .limit(page.limit)
        .offset(page.offset);

    let before = dest.len();
    capability
        .fetch(&spec, dest)
        .map_err(PaginationError::Capability)?;
    let fetched = dest.len().saturating_sub(before) as u64;

    let mut next = page.clone();
    next.offset = page.offset.saturating_add(page.limit);
    next.has_next = fetched == page.limit;

    let count = capability
        .count(&spec.unbounded())
        .map_err(PaginationError::Capability)?;
    next.count = Some(count);

    trace!(
        offset = page.offset,
        limit = page.limit,
        fetched,
        count,
        has_next = next.has_next,
        "offset page fetched"
    );

    Ok(next)
}
