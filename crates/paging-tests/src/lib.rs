//! Cross-crate pagination walks over the bundled backends.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use model::{
    core::value::Value,
    pagination::page::Page,
    records::{record::Record, row::RowData},
};
use planner::{
    capability::QueryCapability,
    error::PaginationError,
    pagination::{PageResult, pages},
};
use tracing::debug;


/// A typed record whose struct-side field names differ from its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub date_creation: DateTime<Utc>,
}

impl Record for Project {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" | "ID" => Some(Value::Int(self.id)),
            "name" | "Name" => Some(Value::String(self.name.clone())),
            "date_creation" | "DateCreation" => Some(Value::Timestamp(self.date_creation)),
            _ => None,
        }
    }
}

/// `n` projects with ids `1..=n`, created one second apart.
pub fn projects(n: i64) -> Vec<Project> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single();
    let start = start.unwrap_or_default();
    (1..=n)
        .map(|id| Project {
            id,
            name: format!("project-{id}"),
            date_creation: start + TimeDelta::seconds(id - 1),
        })
        .collect()
}

/// The same projects as dynamic rows, inserted in a scrambled order.
pub fn project_rows(n: i64) -> Vec<RowData> {
    let mut rows: Vec<RowData> = projects(n)
        .into_iter()
        .map(|p| {
            RowData::from_pairs(
                "projects",
                [
                    ("id", Value::Int(p.id)),
                    ("name", Value::String(p.name)),
                    ("date_creation", Value::Timestamp(p.date_creation)),
                ],
            )
        })
        .collect();
    // Deterministic shuffle: odd ids first, then even ids reversed.
    rows.sort_by_key(|r| {
        let id = r.get_value("id").as_i64().unwrap_or_default();
        (id % 2 == 0, if id % 2 == 0 { -id } else { id })
    });
    rows
}

/// Follows descriptors from `first` until a page reports no successor.
pub fn walk<C>(
    capability: &C,
    first: Page,
) -> Result<Vec<PageResult<C::Record>>, PaginationError<C::Error>>
where
    C: QueryCapability,
    C::Record: Record,
{
    let mut walked = Vec::new();
    for page in pages(capability, first) {
        let page = page?;
        debug!(
            page = walked.len() + 1,
            records = page.records.len(),
            has_next = page.next.has_next,
            "page walked"
        );
        walked.push(page);
    }
    Ok(walked)
}

/// Concatenates the records of every walked page.
pub fn flatten<R: Clone>(walked: &[PageResult<R>]) -> Vec<R> {
    walked.iter().flat_map(|p| p.records.iter().cloned()).collect()
}
