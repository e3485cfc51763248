use chrono::{DateTime, NaiveDate, Utc};
use model::{core::value::Value, records::record::Record};
use uuid::Uuid;

/// The detection order for a column's first non-empty cell.
const CHAIN: &[ColumnType] = &[
    ColumnType::Int,
    ColumnType::Float,
    ColumnType::Boolean,
    ColumnType::Date,
    ColumnType::Timestamp,
    ColumnType::Uuid,
    ColumnType::String,
];

/// Type inferred for a column of textual cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Boolean,
    Date,
    Timestamp,
    Uuid,
    String,
}

impl ColumnType {
    /// First type in the chain able to hold `cell`.
    pub fn detect(cell: &str) -> ColumnType {
        CHAIN
            .iter()
            .copied()
            .find(|t| t.parse(cell).is_some())
            .unwrap_or(ColumnType::String)
    }

    /// Widens `self` so it also holds `cell`. Integers widen to floats; any
    /// other conflict falls back to strings.
    pub fn promote(self, cell: &str) -> ColumnType {
        if cell.is_empty() || self.parse(cell).is_some() {
            return self;
        }
        match self {
            ColumnType::Int if ColumnType::Float.parse(cell).is_some() => ColumnType::Float,
            _ => ColumnType::String,
        }
    }

    /// Parses a non-empty cell as this type.
    pub fn parse(&self, cell: &str) -> Option<Value> {
        match self {
            ColumnType::Int => cell.parse::<i64>().ok().map(Value::Int),
            ColumnType::Float => cell
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float),
            ColumnType::Boolean => match cell.to_ascii_lowercase().as_str() {
                "true" => Some(Value::Boolean(true)),
                "false" => Some(Value::Boolean(false)),
                _ => None,
            },
            ColumnType::Date => NaiveDate::parse_from_str(cell, "%Y-%m-%d")
                .ok()
                .map(Value::Date),
            ColumnType::Timestamp => DateTime::parse_from_rfc3339(cell)
                .ok()
                .map(|ts| Value::Timestamp(ts.with_timezone(&Utc))),
            ColumnType::Uuid => Uuid::parse_str(cell).ok().map(Value::Uuid),
            ColumnType::String => Some(Value::String(cell.to_string())),
        }
    }

    /// The type whose cells parse back into `value`'s variant. `None` for null.
    pub fn of(value: &Value) -> Option<ColumnType> {
        match value {
            Value::Int(_) | Value::Uint(_) => Some(ColumnType::Int),
            Value::Float(_) => Some(ColumnType::Float),
            Value::Boolean(_) => Some(ColumnType::Boolean),
            Value::Date(_) => Some(ColumnType::Date),
            Value::Timestamp(_) => Some(ColumnType::Timestamp),
            Value::Uuid(_) => Some(ColumnType::Uuid),
            Value::String(_) => Some(ColumnType::String),
            Value::Null => None,
        }
    }

    /// Converts a cell of a column of this type. Empty cells are null.
    pub fn value(&self, cell: &str) -> Value {
        if cell.is_empty() {
            return Value::Null;
        }
        self.parse(cell)
            .unwrap_or_else(|| Value::String(cell.to_string()))
    }
}

/// Infers one type per column. Columns with no non-empty cell are strings.
pub fn infer_columns<'a, I>(width: usize, rows: I) -> Vec<ColumnType>
where
    I: IntoIterator<Item = Vec<&'a str>>,
{
    let mut types: Vec<Option<ColumnType>> = vec![None; width];
    for cells in rows {
        for (slot, cell) in types.iter_mut().zip(cells) {
            if cell.is_empty() {
                continue;
            }
            *slot = Some(match slot {
                Some(current) => current.promote(cell),
                None => ColumnType::detect(cell),
            });
        }
    }
    types
        .into_iter()
        .map(|t| t.unwrap_or(ColumnType::String))
        .collect()
}

/// Type of `field` in loaded records, taken from its first non-null value.
pub fn column_type<R: Record>(rows: &[R], field: &str) -> Option<ColumnType> {
    rows.iter()
        .find_map(|row| row.field(field).and_then(|v| ColumnType::of(&v)))
}

/// Lower-cases a header and replaces separators with underscores.
pub fn normalize_col_name(name: &str) -> String {
    name.trim()
        .replace([' ', '-', '.', '(', ')', ','], "_")
        .to_lowercase()
}
