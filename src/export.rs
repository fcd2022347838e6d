use crate::models::EntityRecord;
use crate::schema::EntitySchema;
use serde_json::Value;

/// Form feed between pages of the document renderer.
const PAGE_BREAK: char = '\u{000C}';
const MAX_DOCUMENT_COLUMN_WIDTH: usize = 28;

/// Flatten one field value for export. Relation arrays of `{value,label}`
/// pairs or plain name strings become a single comma-joined label string;
/// scalars pass through unchanged.
pub fn flatten_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(elements)) => elements
            .iter()
            .map(|element| match element {
                Value::Object(pair) => pair
                    .get("label")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                Value::String(name) => name.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::Object(pair)) => pair
            .get("label")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Some(other) => other.to_string(),
    }
}

fn flatten_record(record: &EntityRecord, schema: &EntitySchema) -> Vec<String> {
    schema
        .export_columns
        .iter()
        .map(|column| {
            if column.field == "id" {
                record.id.to_string()
            } else {
                flatten_value(record.field(column.field))
            }
        })
        .collect()
}

/// Map the filtered/sorted sequence into flat export rows. Both renderers
/// consume this identical shape; there is exactly one flattening pass.
pub fn flatten_rows(items: &[EntityRecord], schema: &EntitySchema) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|record| flatten_record(record, schema))
        .collect()
}

fn escape_csv_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Render the rows as one spreadsheet sheet: a header line of the fixed
/// column titles followed by one CSV line per record.
pub fn render_sheet(rows: &[Vec<String>], schema: &EntitySchema) -> String {
    let mut output = String::new();
    let headers: Vec<String> = schema
        .export_columns
        .iter()
        .map(|column| escape_csv_cell(column.header))
        .collect();
    output.push_str(&headers.join(","));
    output.push('\n');
    for row in rows {
        let cells: Vec<String> = row.iter().map(|cell| escape_csv_cell(cell)).collect();
        output.push_str(&cells.join(","));
        output.push('\n');
    }
    output
}

/// Render the rows as a paginated document table: fixed column headers
/// repeated on every page, cells padded to per-column widths, pages
/// separated by form feeds.
pub fn render_document(rows: &[Vec<String>], schema: &EntitySchema, rows_per_page: usize) -> String {
    let headers: Vec<&str> = schema
        .export_columns
        .iter()
        .map(|column| column.header)
        .collect();
    let widths = column_widths(&headers, rows);
    let rows_per_page = rows_per_page.max(1);
    let page_count = rows.len().div_ceil(rows_per_page).max(1);

    let mut output = String::new();
    for (page_index, page_rows) in pages(rows, rows_per_page).into_iter().enumerate() {
        if page_index > 0 {
            output.push(PAGE_BREAK);
        }
        output.push_str(&format!(
            "{} (page {} of {})\n",
            schema.display_name,
            page_index + 1,
            page_count
        ));
        output.push_str(&format_row(&headers, &widths));
        let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        output.push_str(&"-".repeat(rule_width));
        output.push('\n');
        for row in page_rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            output.push_str(&format_row(&cells, &widths));
        }
    }
    output
}

fn pages<'a>(rows: &'a [Vec<String>], rows_per_page: usize) -> Vec<&'a [Vec<String>]> {
    if rows.is_empty() {
        return vec![rows];
    }
    rows.chunks(rows_per_page).collect()
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if index < widths.len() {
                widths[index] = widths[index].max(cell.chars().count());
            }
        }
    }
    widths
        .into_iter()
        .map(|width| width.min(MAX_DOCUMENT_COLUMN_WIDTH))
        .collect()
}

fn format_row(cells: &[&str], widths: &[usize]) -> String {
    let mut line = String::new();
    for (index, width) in widths.iter().copied().enumerate() {
        let cell = cells.get(index).copied().unwrap_or_default();
        let truncated: String = cell.chars().take(width).collect();
        if index > 0 {
            line.push_str("  ");
        }
        line.push_str(&format!("{:<width$}", truncated));
    }
    line.push('\n');
    line
}
