use model::records::sequence::SequenceError;
use thiserror::Error;

/// Failure of a single paginate call. The returned page descriptor is only
/// meaningful when no error occurred.
#[derive(Debug, Error)]
pub enum PaginationError<E> {
    /// The cursor field does not exist on the fetched record type.
    #[error("record has no field named '{0}'")]
    UnknownField(String),

    #[error("page limit must be a positive integer, got {0}")]
    InvalidLimit(u64),

    #[error("page has no ordering field")]
    MissingOrderField,

    #[error("cursor page has no cursor field")]
    MissingCursorField,

    /// The backend failed to fetch or count; the error is passed through as is.
    #[error("query execution failed: {0}")]
    Capability(#[source] E),
}

impl<E> PaginationError<E> {
    /// The backend error, if this failure came from the capability.
    pub fn into_capability(self) -> Option<E> {
        match self {
            PaginationError::Capability(err) => Some(err),
            _ => None,
        }
    }
}

impl<E> From<SequenceError> for PaginationError<E> {
    fn from(err: SequenceError) -> Self {
        match err {
            SequenceError::UnknownField { field } => PaginationError::UnknownField(field),
        }
    }
}
