use crate::error::ConnectorError;
use model::{core::value::Value, records::row::RowData};

/// Runs rendered SQL against a live connection.
///
/// Parameters are positional and line up with the dialect's placeholders.
/// Opening, pooling and closing connections is the implementor's concern;
/// driver failures are reported as [`ConnectorError::Executor`].
pub trait SqlExecutor {
    /// Runs a row-returning statement.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<RowData>, ConnectorError>;

    /// Runs a statement that yields a single count.
    fn query_count(&self, sql: &str, params: &[Value]) -> Result<u64, ConnectorError>;
}

impl<X: SqlExecutor + ?Sized> SqlExecutor for &X {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<RowData>, ConnectorError> {
        (**self).query(sql, params)
    }

    fn query_count(&self, sql: &str, params: &[Value]) -> Result<u64, ConnectorError> {
        (**self).query_count(sql, params)
    }
}
