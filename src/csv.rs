// src/csv.rs
//! Delimited text for the output tables. Quoting is RFC-4180 style for both
//! CSV and TSV: a cell is quoted only when it holds the separator, a quote or
//! a line break.

use std::mem::take;

/* ---------------- Parsing ---------------- */

/// Split `text` into rows of cells. Tolerates CRLF and a missing final newline;
/// blank lines are skipped.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = s!();
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    let end_row = |row: &mut Vec<String>, cell: &mut String, rows: &mut Vec<Vec<String>>| {
        row.push(take(cell));
        if row.len() == 1 && row[0].is_empty() {
            row.clear();
        } else {
            rows.push(take(row));
        }
    };

    while let Some(ch) = chars.next() {
        if quoted {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => quoted = false,
                _ => cell.push(ch),
            }
            continue;
        }
        match ch {
            '"' => quoted = true,
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                end_row(&mut row, &mut cell, &mut rows);
            }
            '\n' => end_row(&mut row, &mut cell, &mut rows),
            c if c == sep => row.push(take(&mut cell)),
            _ => cell.push(ch),
        }
    }

    if !cell.is_empty() || !row.is_empty() {
        end_row(&mut row, &mut cell, &mut rows);
    }
    rows
}

/* ---------------- Writing ---------------- */

fn push_cell(out: &mut String, cell: &str, sep: char) {
    if cell.contains([sep, '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&cell.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(cell);
    }
}

/// Append one row, newline-terminated.
pub fn push_row<S: AsRef<str>>(out: &mut String, row: &[S], sep: char) {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            out.push(sep);
        }
        push_cell(out, cell.as_ref(), sep);
    }
    out.push('\n');
}

/// Header line (if any) followed by every row.
pub fn rows_to_string(headers: &[String], rows: &[Vec<String>], sep: char) -> String {
    let mut out = s!();
    if !headers.is_empty() {
        push_row(&mut out, headers, sep);
    }
    for r in rows {
        push_row(&mut out, r, sep);
    }
    out
}
