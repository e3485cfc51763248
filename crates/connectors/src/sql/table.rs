use crate::{error::ConnectorError, sql::executor::SqlExecutor};
use model::{core::value::Value, records::row::RowData, records::sequence::Sequence};
use planner::{
    capability::QueryCapability,
    query::{
        ast::{common::TableRef, expr::Expr},
        dialect::DialectKind,
        ident,
        renderer::render_sql,
        spec::QuerySpec,
    },
};
use tracing::debug;

/// A query backend for one SQL table.
///
/// Each spec is lowered to a `SELECT` (or `SELECT COUNT(*)`) in the configured
/// dialect and handed to the executor together with its bound parameters.
pub struct SqlTable<X> {
    executor: X,
    table: TableRef,
    dialect: DialectKind,
    columns: Vec<String>,
}

impl<X: SqlExecutor> SqlTable<X> {
    pub fn new(executor: X, table: TableRef, dialect: DialectKind) -> Self {
        SqlTable {
            executor,
            table,
            dialect,
            columns: Vec::new(),
        }
    }

    /// Restricts the projection; an empty list selects `*`.
    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn render_select(&self, spec: &QuerySpec) -> (String, Vec<Value>) {
        let select = spec.to_select(&self.table, self.projection());
        render_sql(&select, self.dialect.dialect().as_ref())
    }

    pub fn render_count(&self, spec: &QuerySpec) -> (String, Vec<Value>) {
        render_sql(&spec.to_count(&self.table), self.dialect.dialect().as_ref())
    }

    fn projection(&self) -> Vec<Expr> {
        if self.columns.is_empty() {
            vec![Expr::Wildcard]
        } else {
            self.columns.iter().map(|c| ident(c)).collect()
        }
    }
}

impl<X: SqlExecutor> QueryCapability for SqlTable<X> {
    type Record = RowData;
    type Error = ConnectorError;

    fn fetch<S>(&self, spec: &QuerySpec, dest: &mut S) -> Result<(), Self::Error>
    where
        S: Sequence<Item = RowData>,
    {
        let (sql, params) = self.render_select(spec);
        debug!(table = %self.table.name, %sql, params = params.len(), "Executing select");

        for row in self.executor.query(&sql, &params)? {
            dest.push(row);
        }
        Ok(())
    }

    fn count(&self, spec: &QuerySpec) -> Result<u64, Self::Error> {
        let (sql, params) = self.render_count(spec);
        debug!(table = %self.table.name, %sql, params = params.len(), "Executing count");

        self.executor.query_count(&sql, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner::query::{ast::common::OrderDir, spec::CompareOp};
    use std::cell::RefCell;

    /// Records statements and answers them with canned rows.
    #[derive(Default)]
    struct RecordingExecutor {
        statements: RefCell<Vec<(String, Vec<Value>)>>,
        rows: Vec<RowData>,
        fail: bool,
    }

    impl SqlExecutor for RecordingExecutor {
        fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<RowData>, ConnectorError> {
            self.statements
                .borrow_mut()
                .push((sql.to_string(), params.to_vec()));
            if self.fail {
                return Err(ConnectorError::Executor("connection reset".into()));
            }
            Ok(self.rows.clone())
        }

        fn query_count(&self, sql: &str, params: &[Value]) -> Result<u64, ConnectorError> {
            self.statements
                .borrow_mut()
                .push((sql.to_string(), params.to_vec()));
            Ok(self.rows.len() as u64)
        }
    }

    fn row(id: i64) -> RowData {
        RowData::from_pairs("projects", [("id", id)])
    }

    #[test]
    fn test_fetch_renders_postgres_select() {
        let executor = RecordingExecutor {
            rows: vec![row(3), row(4)],
            ..Default::default()
        };
        let table = SqlTable::new(&executor, TableRef::new("projects"), DialectKind::Postgres)
            .with_columns(&["id", "name"]);
        let spec = QuerySpec::new()
            .filter("id", CompareOp::Gt, 2_i64)
            .order_by("id", OrderDir::Asc)
            .limit(3);

        let mut rows = Vec::new();
        table.fetch(&spec, &mut rows).unwrap();

        assert_eq!(rows, vec![row(3), row(4)]);
        assert_eq!(
            executor.statements.borrow()[0],
            (
                r#"SELECT "id", "name" FROM "projects" WHERE ("id" > $1) ORDER BY "id" ASC LIMIT $2"#
                    .to_string(),
                vec![Value::Int(2), Value::Uint(3)]
            )
        );
    }

    #[test]
    fn test_count_renders_mysql_count() {
        let executor = RecordingExecutor {
            rows: vec![row(1), row(2), row(3)],
            ..Default::default()
        };
        let table = SqlTable::new(&executor, TableRef::new("projects"), DialectKind::MySql);
        let spec = QuerySpec::new()
            .order_by("date_creation", OrderDir::Desc)
            .limit(2)
            .offset(2)
            .unbounded();

        assert_eq!(table.count(&spec).unwrap(), 3);
        assert_eq!(
            executor.statements.borrow()[0].0,
            "SELECT COUNT(*) FROM `projects`"
        );
    }

    #[test]
    fn test_executor_error_is_returned() {
        let executor = RecordingExecutor {
            fail: true,
            ..Default::default()
        };
        let table = SqlTable::new(&executor, TableRef::new("projects"), DialectKind::MySql);

        let mut rows = Vec::new();
        let err = table.fetch(&QuerySpec::new(), &mut rows).unwrap_err();
        assert!(matches!(err, ConnectorError::Executor(_)));
        assert!(rows.is_empty());
    }
}
