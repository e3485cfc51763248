//! The contract a query backend satisfies so pages can be fetched from it.

use crate::query::spec::QuerySpec;
use model::records::sequence::Sequence;

/// Executes [`QuerySpec`]s against some tabular source.
///
/// Implementations own nothing but the handle to their backend; the query
/// shape arrives whole on every call, so one instance can serve any number of
/// sequential pagination calls. Connection lifecycle, cancellation and
/// timeouts belong to the implementation.
pub trait QueryCapability {
    type Record;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs the query and appends the resulting records to `dest` in order.
    fn fetch<S>(&self, spec: &QuerySpec, dest: &mut S) -> Result<(), Self::Error>
    where
        S: Sequence<Item = Self::Record>;

    /// Counts the records matching the spec's filters. Limit and offset are
    /// ignored.
    fn count(&self, spec: &QuerySpec) -> Result<u64, Self::Error>;
}

impl<C: QueryCapability + ?Sized> QueryCapability for &C {
    type Record = C::Record;
    type Error = C::Error;

    fn fetch<S>(&self, spec: &QuerySpec, dest: &mut S) -> Result<(), Self::Error>
    where
        S: Sequence<Item = Self::Record>,
    {
        (**self).fetch(spec, dest)
    }

    fn count(&self, spec: &QuerySpec) -> Result<u64, Self::Error> {
        (**self).count(spec)
    }
}
