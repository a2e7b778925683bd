//! CSV rendering
//!
//! Every field is quoted and embedded quotes are doubled, so commas and
//! newlines inside values never break the row structure.

use serde::Serialize;
use serde_json::Value;

use super::columns::ExportColumn;

/// Renders rows to CSV text using the column configuration.
///
/// Rows are any serializable records; each column's `key` is looked up in
/// the serialized object. Missing or null fields render as empty strings.
pub fn to_csv<T: Serialize>(columns: &[ExportColumn], rows: &[T]) -> String {
    let header = columns
        .iter()
        .map(|col| quote(col.header))
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = vec![header];
    for row in rows {
        let object = serde_json::to_value(row).unwrap_or(Value::Null);
        let line = columns
            .iter()
            .map(|col| quote(&field_text(&object, col.key)))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    lines.join("\n")
}

fn field_text(object: &Value, key: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::columns::ExportColumn;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Row {
        name: String,
        total: u32,
        note: Option<String>,
    }

    fn columns() -> Vec<ExportColumn> {
        vec![
            ExportColumn {
                header: "Name",
                key: "name",
                width: 20,
            },
            ExportColumn {
                header: "Total",
                key: "total",
                width: 10,
            },
            ExportColumn {
                header: "Note",
                key: "note",
                width: 20,
            },
        ]
    }

    #[test]
    fn test_header_row() {
        let csv = to_csv::<Row>(&columns(), &[]);
        assert_eq!(csv, "\"Name\",\"Total\",\"Note\"");
    }

    #[test]
    fn test_fields_are_always_quoted() {
        let csv = to_csv(
            &columns(),
            &[Row {
                name: "Asha, Rao".into(),
                total: 850,
                note: None,
            }],
        );

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "\"Asha, Rao\",\"850\",\"\"");
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let csv = to_csv(
            &columns(),
            &[Row {
                name: "the \"good\" clinic".into(),
                total: 1,
                note: Some("ok".into()),
            }],
        );

        assert!(csv.contains("\"the \"\"good\"\" clinic\""));
    }

    #[test]
    fn test_missing_key_renders_empty() {
        let cols = vec![ExportColumn {
            header: "Ghost",
            key: "missing",
            width: 5,
        }];
        let csv = to_csv(
            &cols,
            &[Row {
                name: "x".into(),
                total: 0,
                note: None,
            }],
        );

        assert_eq!(csv.lines().nth(1), Some("\"\""));
    }
}
