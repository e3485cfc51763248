use crate::{
    error::ConnectorError,
    file::{entity_name, types::ColumnType},
};
use model::{
    core::value::Value,
    records::row::{FieldValue, RowData},
};
use serde_json::{Map, Value as JsonValue};
use std::{collections::HashMap, fs::File, io::BufReader, path::Path};
use tracing::debug;

/// String encodings recognised inside JSON string values.
const STRING_TYPES: &[ColumnType] = &[ColumnType::Timestamp, ColumnType::Date, ColumnType::Uuid];

/// Reads a JSON file holding an array of flat objects.
pub fn load_json(path: impl AsRef<Path>) -> Result<Vec<RowData>, ConnectorError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let document: JsonValue = serde_json::from_reader(reader)?;
    let rows = rows_from_json(document, &entity_name(path))?;
    debug!(path = %path.display(), rows = rows.len(), "Loaded JSON dataset");
    Ok(rows)
}

/// Converts an already parsed document. Nested arrays and objects are
/// rejected. String fields are typed per column: a column whose strings all
/// read as timestamps, dates or uuids gets that type, any other column keeps
/// plain strings.
pub fn rows_from_json(document: JsonValue, entity: &str) -> Result<Vec<RowData>, ConnectorError> {
    let JsonValue::Array(items) = document else {
        return Err(ConnectorError::InvalidDataset(
            "expected a top-level JSON array".into(),
        ));
    };

    let objects = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            JsonValue::Object(object) => Ok(object),
            _ => Err(ConnectorError::InvalidDataset(format!(
                "element {index} is not an object"
            ))),
        })
        .collect::<Result<Vec<_>, ConnectorError>>()?;

    let string_types = infer_string_columns(&objects);

    objects
        .into_iter()
        .enumerate()
        .map(|(index, object)| {
            let field_values = object
                .into_iter()
                .map(|(name, value)| {
                    let column = string_types
                        .get(&name)
                        .copied()
                        .unwrap_or(ColumnType::String);
                    let value = scalar(value, column).ok_or_else(|| {
                        ConnectorError::InvalidDataset(format!(
                            "field '{name}' of element {index} is not a scalar"
                        ))
                    })?;
                    Ok(FieldValue { name, value })
                })
                .collect::<Result<Vec<_>, ConnectorError>>()?;

            Ok(RowData::new(entity, field_values))
        })
        .collect()
}

/// One type per field over the string cells of every object. A cell the
/// current type cannot hold, including an empty string, demotes the column
/// to `String`.
fn infer_string_columns(objects: &[Map<String, JsonValue>]) -> HashMap<String, ColumnType> {
    let mut types: HashMap<String, ColumnType> = HashMap::new();
    for (name, value) in objects.iter().flatten() {
        let JsonValue::String(cell) = value else {
            continue;
        };
        let detected = match types.get(name) {
            Some(current) if current.parse(cell).is_some() => *current,
            Some(_) => ColumnType::String,
            None => STRING_TYPES
                .iter()
                .copied()
                .find(|t| t.parse(cell).is_some())
                .unwrap_or(ColumnType::String),
        };
        types.insert(name.clone(), detected);
    }
    types
}

fn scalar(value: JsonValue, column: ColumnType) -> Option<Value> {
    match value {
        JsonValue::Null => Some(Value::Null),
        JsonValue::Bool(b) => Some(Value::Boolean(b)),
        JsonValue::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .or_else(|| n.as_u64().map(Value::Uint))
            .or_else(|| n.as_f64().map(Value::Float)),
        JsonValue::String(s) => Some(column.parse(&s).unwrap_or(Value::String(s))),
        JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_rows_from_json() {
        let doc = json!([
            {"id": 1, "name": "alpha", "created": "2024-01-01T12:00:00Z", "big": 18446744073709551615u64},
            {"id": 2, "name": null, "day": "2024-02-29", "score": 0.5}
        ]);

        let rows = rows_from_json(doc, "projects").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_value("id"), Value::Int(1));
        assert!(matches!(rows[0].get_value("created"), Value::Timestamp(_)));
        assert_eq!(rows[0].get_value("big"), Value::Uint(u64::MAX));
        assert_eq!(rows[1].get_value("name"), Value::Null);
        assert!(matches!(rows[1].get_value("day"), Value::Date(_)));
        assert_eq!(rows[1].get_value("score"), Value::Float(0.5));
    }

    #[test]
    fn test_string_column_with_mixed_shapes_stays_string() {
        let doc = json!([
            {"id": 1, "code": "2024-01-01", "day": "2024-01-02"},
            {"id": 2, "code": "abc", "day": null},
            {"id": 3, "code": "2024-03-01", "day": "2024-01-01"}
        ]);

        let rows = rows_from_json(doc, "projects").unwrap();
        let codes: Vec<Value> = rows.iter().map(|r| r.get_value("code")).collect();
        assert_eq!(
            codes,
            vec![
                Value::from("2024-01-01"),
                Value::from("abc"),
                Value::from("2024-03-01")
            ]
        );
        assert!(matches!(rows[0].get_value("day"), Value::Date(_)));
        assert_eq!(rows[1].get_value("day"), Value::Null);
        assert!(matches!(rows[2].get_value("day"), Value::Date(_)));
    }

    #[test]
    fn test_empty_string_keeps_column_textual() {
        let doc = json!([{"seen": "2024-01-01T12:00:00Z"}, {"seen": ""}]);

        let rows = rows_from_json(doc, "t").unwrap();
        assert_eq!(rows[0].get_value("seen"), Value::from("2024-01-01T12:00:00Z"));
        assert_eq!(rows[1].get_value("seen"), Value::from(""));
    }

    #[test]
    fn test_rejects_non_tabular_documents() {
        assert!(matches!(
            rows_from_json(json!({"id": 1}), "t"),
            Err(ConnectorError::InvalidDataset(_))
        ));
        assert!(matches!(
            rows_from_json(json!([1, 2]), "t"),
            Err(ConnectorError::InvalidDataset(_))
        ));
        assert!(matches!(
            rows_from_json(json!([{"tags": ["a"]}]), "t"),
            Err(ConnectorError::InvalidDataset(_))
        ));
    }

    #[test]
    fn test_load_json_file() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, r#"[{{"id": 1}}, {{"id": 2}}]"#).unwrap();

        let rows = load_json(file.path()).unwrap();
        assert_eq!(rows.len(), 2);

        let mut broken = NamedTempFile::new().unwrap();
        write!(broken, "[{{").unwrap();
        assert!(matches!(load_json(broken.path()), Err(ConnectorError::Json(_))));
    }
}
