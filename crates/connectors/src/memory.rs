//! A query backend over records held in memory.

use crate::error::ConnectorError;
use model::{
    core::value::Value,
    records::{record::Record, sequence::Sequence},
};
use planner::{
    capability::QueryCapability,
    query::{
        ast::common::OrderDir,
        spec::{Filter, Order, QuerySpec},
    },
};
use std::cmp::Ordering;
use tracing::debug;

/// Evaluates query specs over an owned vector of records.
///
/// Filters follow SQL semantics for nulls: a predicate involving a null value
/// never matches. When ordering, nulls sort before every other value in
/// ascending order. The sort is stable.
#[derive(Debug, Clone)]
pub struct MemoryTable<R> {
    name: String,
    rows: Vec<R>,
}

impl<R: Record + Clone> MemoryTable<R> {
    pub fn new(name: impl Into<String>, rows: Vec<R>) -> Self {
        MemoryTable {
            name: name.into(),
            rows,
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Applies filters, ordering and window, in that order.
    pub fn select(&self, spec: &QuerySpec) -> Result<Vec<&R>, ConnectorError> {
        let mut rows = self.filtered(&spec.filters)?;

        if let Some(order) = &spec.order {
            rows = sort_rows(rows, order)?;
        }

        let offset = to_usize(spec.offset.unwrap_or(0));
        let limit = spec.limit.map_or(usize::MAX, to_usize);

        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    fn filtered(&self, filters: &[Filter]) -> Result<Vec<&R>, ConnectorError> {
        let mut matched = Vec::new();
        for row in &self.rows {
            if matches_all(row, filters)? {
                matched.push(row);
            }
        }
        Ok(matched)
    }
}

impl<R: Record + Clone> QueryCapability for MemoryTable<R> {
    type Record = R;
    type Error = ConnectorError;

    fn fetch<S>(&self, spec: &QuerySpec, dest: &mut S) -> Result<(), Self::Error>
    where
        S: Sequence<Item = R>,
    {
        let rows = self.select(spec)?;
        debug!(
            table = %self.name,
            filters = spec.filters.len(),
            limit = ?spec.limit,
            offset = ?spec.offset,
            returned = rows.len(),
            "Fetched rows from memory table"
        );

        for row in rows {
            dest.push(row.clone());
        }
        Ok(())
    }

    fn count(&self, spec: &QuerySpec) -> Result<u64, Self::Error> {
        let count = self.filtered(&spec.filters)?.len() as u64;
        debug!(table = %self.name, count, "Counted rows in memory table");
        Ok(count)
    }
}

fn column_value<R: Record>(row: &R, column: &str) -> Result<Value, ConnectorError> {
    row.field(column)
        .ok_or_else(|| ConnectorError::UnknownColumn(column.to_string()))
}

fn matches_all<R: Record>(row: &R, filters: &[Filter]) -> Result<bool, ConnectorError> {
    for filter in filters {
        let actual = column_value(row, &filter.field)?;
        if actual.is_null() || filter.value.is_null() {
            return Ok(false);
        }

        let ordering = actual
            .compare(&filter.value)
            .ok_or_else(|| ConnectorError::Incomparable {
                column: filter.field.clone(),
                left: actual.clone(),
                right: filter.value.clone(),
            })?;

        if !filter.op.matches(ordering) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn sort_rows<'a, R: Record>(rows: Vec<&'a R>, order: &Order) -> Result<Vec<&'a R>, ConnectorError> {
    let mut keyed = rows
        .into_iter()
        .map(|row| column_value(row, &order.field).map(|key| (key, row)))
        .collect::<Result<Vec<_>, _>>()?;

    // Every non-null key must be comparable with the first one, otherwise the
    // resulting order would be meaningless.
    if let Some(anchor) = keyed.iter().map(|(key, _)| key).find(|key| !key.is_null())
        && let Some((other, _)) = keyed
            .iter()
            .find(|(key, _)| !key.is_null() && anchor.compare(key).is_none())
    {
        return Err(ConnectorError::Incomparable {
            column: order.field.clone(),
            left: anchor.clone(),
            right: other.clone(),
        });
    }

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = compare_keys(a, b);
        match order.dir {
            OrderDir::Asc => ordering,
            OrderDir::Desc => ordering.reverse(),
        }
    });

    Ok(keyed.into_iter().map(|(_, row)| row).collect())
}

fn compare_keys(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.compare(b).unwrap_or(Ordering::Equal),
    }
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::records::row::RowData;
    use planner::query::spec::CompareOp;

    fn table() -> MemoryTable<RowData> {
        let rows = vec![
            RowData::from_pairs("projects", [("id", Value::Int(1)), ("team", Value::from("core"))]),
            RowData::from_pairs("projects", [("id", Value::Int(2)), ("team", Value::from("web"))]),
            RowData::from_pairs("projects", [("id", Value::Int(3)), ("team", Value::from("core"))]),
            RowData::from_pairs("projects", [("id", Value::Int(4)), ("team", Value::Null)]),
        ];
        MemoryTable::new("projects", rows)
    }

    fn ids(rows: &[RowData]) -> Vec<i64> {
        rows.iter()
            .filter_map(|r| r.get_value("id").as_i64())
            .collect()
    }

    #[test]
    fn test_fetch_applies_filter_order_and_window() {
        let table = table();
        let spec = QuerySpec::new()
            .filter("id", CompareOp::GtEq, 2_i64)
            .order_by("id", OrderDir::Desc)
            .limit(2)
            .offset(1);

        let mut rows = Vec::new();
        table.fetch(&spec, &mut rows).unwrap();
        assert_eq!(ids(&rows), vec![3, 2]);
    }

    #[test]
    fn test_count_ignores_window() {
        let table = table();
        let spec = QuerySpec::new()
            .filter("team", CompareOp::Eq, "core")
            .limit(1)
            .offset(1);
        assert_eq!(table.count(&spec).unwrap(), 2);
    }

    #[test]
    fn test_null_never_matches_a_filter() {
        let table = table();
        let spec = QuerySpec::new().filter("team", CompareOp::NotEq, "core");

        let mut rows = Vec::new();
        table.fetch(&spec, &mut rows).unwrap();
        assert_eq!(ids(&rows), vec![2]);
    }

    #[test]
    fn test_nulls_sort_first_ascending() {
        let table = table();
        let spec = QuerySpec::new().order_by("team", OrderDir::Asc);

        let mut rows = Vec::new();
        table.fetch(&spec, &mut rows).unwrap();
        // Stable: ties keep insertion order.
        assert_eq!(ids(&rows), vec![4, 1, 3, 2]);
    }

    #[test]
    fn test_unknown_column() {
        let table = table();
        let spec = QuerySpec::new().order_by("DateCreation", OrderDir::Asc);

        let mut rows = Vec::new();
        let err = table.fetch(&spec, &mut rows).unwrap_err();
        assert!(matches!(err, ConnectorError::UnknownColumn(ref c) if c == "DateCreation"));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_incomparable_filter_value() {
        let table = table();
        let spec = QuerySpec::new().filter("id", CompareOp::Gt, "two");

        let err = table.count(&spec).unwrap_err();
        assert!(matches!(err, ConnectorError::Incomparable { ref column, .. } if column == "id"));
    }

    #[test]
    fn test_mixed_kinds_cannot_be_sorted() {
        let rows = vec![
            RowData::from_pairs("t", [("k", Value::Int(1))]),
            RowData::from_pairs("t", [("k", Value::from("a"))]),
        ];
        let table = MemoryTable::new("t", rows);
        let spec = QuerySpec::new().order_by("k", OrderDir::Asc);

        assert!(matches!(
            table.select(&spec),
            Err(ConnectorError::Incomparable { .. })
        ));
    }
}
