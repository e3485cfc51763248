use crate::error::CliError;
use model::{core::value::Value, pagination::page::Page, records::row::RowData};
use serde_json::json;

fn page_json(records: &[RowData], next: &Page) -> serde_json::Value {
    json!({
        "records": records.iter().map(RowData::to_json).collect::<Vec<_>>(),
        "next": next,
    })
}

pub fn print_page(records: &[RowData], next: &Page, as_json: bool) -> Result<(), CliError> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&page_json(records, next))?);
    } else {
        print_records_table(records);
        println!("next: {}", serde_json::to_string(next)?);
    }
    Ok(())
}

fn print_records_table(records: &[RowData]) {
    let Some(first) = records.first() else {
        println!("(no records)");
        return;
    };

    let columns: Vec<&str> = first.field_names().collect();
    let cells: Vec<Vec<String>> = records
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| cell_text(&row.get_value(c)))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|row| row[i].len())
                .chain(std::iter::once(c.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect();
    println!("{}", header.join("  "));
    println!("{}", "-".repeat(header.join("  ").len()));

    for row in cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("{v:<w$}"))
            .collect();
        println!("{}", line.join("  "));
    }
}

fn cell_text(value: &Value) -> String {
    value.as_string().unwrap_or_else(|| "NULL".to_string())
}

/// Prints a rendered statement followed by its positional parameters.
pub fn print_statement(sql: &str, params: &[Value]) {
    println!("{sql}");
    for (i, param) in params.iter().enumerate() {
        println!("  #{} = {param}", i + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_json_shape() {
        let records = vec![RowData::from_pairs("projects", [("id", 1_i64)])];
        let next = Page::offset("id", 1).starting_at(1);

        let doc = page_json(&records, &next);
        assert_eq!(doc["records"], json!([{"id": 1}]));
        assert_eq!(doc["next"]["mode"], json!("offset"));
        assert_eq!(doc["next"]["offset"], json!(1));
    }

    #[test]
    fn test_null_cell_text() {
        assert_eq!(cell_text(&Value::Null), "NULL");
        assert_eq!(cell_text(&Value::Int(3)), "3");
    }
}
