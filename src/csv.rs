// src/csv.rs
//! Delimited text for the on-disk tabs. Quoted cells may hold the separator,
//! quotes and newlines.

use std::mem::take;

/// Rows of `text`, split on `sep`. Blank lines are dropped, so a trailing
/// newline never reads back as an empty row.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut cell = s!();
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if quoted {
            match ch {
                '"' if chars.next_if_eq(&'"').is_some() => cell.push('"'),
                '"' => quoted = false,
                _ => cell.push(ch),
            }
            continue;
        }
        match ch {
            '"' => quoted = true,
            c if c == sep => row.push(take(&mut cell)),
            '\r' | '\n' => {
                if ch == '\r' {
                    chars.next_if_eq(&'\n');
                }
                row.push(take(&mut cell));
                end_row(&mut rows, &mut row);
            }
            _ => cell.push(ch),
        }
    }
    row.push(cell);
    end_row(&mut rows, &mut row);
    rows
}

fn end_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>) {
    match row.as_slice() {
        [only] if only.is_empty() => row.clear(),
        _ => rows.push(take(row)),
    }
}

/// The whole tab as text, one newline-terminated line per row.
pub fn rows_to_string(rows: &[Vec<String>], sep: char) -> String {
    let mut out = s!();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                out.push(sep);
            }
            if cell.contains([sep, '"', '\n', '\r']) {
                out.push('"');
                out.push_str(&cell.replace('"', "\"\""));
                out.push('"');
            } else {
                out.push_str(cell);
            }
        }
        out.push('\n');
    }
    out
}
