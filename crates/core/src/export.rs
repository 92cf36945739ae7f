//! CSV export of list views.
//!
//! Exports operate on the same filtered, sorted records the list endpoint
//! would return, minus pagination, so an export always has exactly
//! `total` data rows.

/// A record that can be written as one CSV row.
pub trait CsvRow {
    /// Header row, in column order.
    const HEADERS: &'static [&'static str];

    /// Field values in the same order as [`Self::HEADERS`].
    fn csv_fields(&self) -> Vec<String>;
}

/// Escape a value for CSV: wrap in quotes if it contains a comma, quote or
/// line break.
pub fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render an optional field; `None` becomes an empty cell.
pub fn opt_field<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Build a CSV document: header line followed by one line per record.
pub fn build_csv<T: CsvRow>(records: &[T]) -> String {
    let mut out = String::new();
    push_line(&mut out, T::HEADERS.iter().map(|h| h.to_string()));
    for record in records {
        push_line(&mut out, record.csv_fields().into_iter());
    }
    out
}

fn push_line(out: &mut String, fields: impl Iterator<Item = String>) {
    let line: Vec<String> = fields.map(|f| csv_escape(&f)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Parse a CSV document produced by [`build_csv`] back into rows of fields.
///
/// Handles quoted fields with embedded commas, quotes and line breaks. The
/// header line is returned as the first row.
pub fn parse_csv(input: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}
