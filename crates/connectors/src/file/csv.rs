use crate::{
    error::ConnectorError,
    file::{
        entity_name,
        types::{infer_columns, normalize_col_name},
    },
};
use model::records::row::{FieldValue, RowData};
use std::{fs::File, io::Read, path::Path};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct CsvSettings {
    pub delimiter: char,
    pub has_headers: bool,
}

impl Default for CsvSettings {
    fn default() -> Self {
        CsvSettings {
            delimiter: ',',
            has_headers: true,
        }
    }
}

/// Reads a CSV file with a header row and `,` delimiter.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<RowData>, ConnectorError> {
    load_csv_with(path, &CsvSettings::default())
}

pub fn load_csv_with(
    path: impl AsRef<Path>,
    settings: &CsvSettings,
) -> Result<Vec<RowData>, ConnectorError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let rows = read_csv(file, &entity_name(path), settings)?;
    debug!(path = %path.display(), rows = rows.len(), "Loaded CSV dataset");
    Ok(rows)
}

/// Parses CSV from any reader. Column types are inferred from every record
/// before conversion; cells missing from short records are null.
pub fn read_csv<R: Read>(
    reader: R,
    entity: &str,
    settings: &CsvSettings,
) -> Result<Vec<RowData>, ConnectorError> {
    if !settings.delimiter.is_ascii() {
        return Err(ConnectorError::InvalidDataset(format!(
            "delimiter '{}' is not a single byte",
            settings.delimiter
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(settings.delimiter as u8)
        .has_headers(settings.has_headers)
        .flexible(true)
        .from_reader(reader);

    let records = reader
        .records()
        .collect::<Result<Vec<csv::StringRecord>, _>>()?;

    let headers: Vec<String> = if settings.has_headers {
        reader.headers()?.iter().map(normalize_col_name).collect()
    } else {
        let width = records.iter().map(|r| r.len()).max().unwrap_or(0);
        (1..=width).map(|i| format!("column_{i}")).collect()
    };

    if headers.iter().any(|h| h.is_empty()) {
        return Err(ConnectorError::InvalidDataset(
            "CSV header contains an empty column name".into(),
        ));
    }

    let types = infer_columns(
        headers.len(),
        records.iter().map(|r| r.iter().collect::<Vec<_>>()),
    );

    let mut rows = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        if record.len() > headers.len() {
            warn!(
                line = index + 1,
                extra = record.len() - headers.len(),
                "Ignoring cells beyond the last CSV column"
            );
        }

        let field_values = headers
            .iter()
            .zip(&types)
            .enumerate()
            .map(|(i, (name, column_type))| FieldValue {
                name: name.clone(),
                value: column_type.value(record.get(i).unwrap_or("")),
            })
            .collect();

        rows.push(RowData::new(entity, field_values));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use model::core::value::Value;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_csv_infers_types() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "ID,Name,Date Creation,Active,Score").unwrap();
        writeln!(file, "1,alpha,2024-01-01T12:00:00Z,true,1").unwrap();
        writeln!(file, "2,beta,2024-01-01T12:00:01Z,false,").unwrap();
        writeln!(file, "3,gamma,2024-01-01T12:00:02Z,true,2.5").unwrap();

        let rows = load_csv(file.path()).unwrap();
        assert_eq!(rows.len(), 3);

        let first = &rows[0];
        assert_eq!(first.get_value("id"), Value::Int(1));
        assert_eq!(first.get_value("name"), Value::from("alpha"));
        assert_eq!(
            first.get_value("date_creation"),
            Value::Timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(first.get_value("active"), Value::Boolean(true));
        assert_eq!(first.get_value("score"), Value::Float(1.0));
        assert_eq!(rows[1].get_value("score"), Value::Null);
    }

    #[test]
    fn test_short_records_are_padded_with_null() {
        let data = "a;b\n1;x\n2\n";
        let settings = CsvSettings {
            delimiter: ';',
            has_headers: true,
        };

        let rows = read_csv(data.as_bytes(), "t", &settings).unwrap();
        assert_eq!(rows[1].get_value("a"), Value::Int(2));
        assert_eq!(rows[1].get_value("b"), Value::Null);
        assert_eq!(rows[0].entity, "t");
    }

    #[test]
    fn test_headerless_columns_are_numbered() {
        let settings = CsvSettings {
            delimiter: ',',
            has_headers: false,
        };

        let rows = read_csv("7,x\n8,y\n".as_bytes(), "t", &settings).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_value("column_1"), Value::Int(7));
        assert_eq!(rows[1].get_value("column_2"), Value::from("y"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_csv("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, ConnectorError::Io(_)));
    }
}
