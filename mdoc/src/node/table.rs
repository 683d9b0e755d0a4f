use crate::parser::tokenizer::{is_blank, is_delimiter_row};

/// A pipe-delimited table, kept as raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    raw: String,
}

/// Column alignment markers read from a delimiter cell (`:--`, `--:`, `:-:`).
#[derive(Debug, Clone, Copy, Default)]
struct Alignment {
    left: bool,
    right: bool,
}

impl Table {
    pub fn new(raw: impl Into<String>) -> Self {
        Table { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn raw_mut(&mut self) -> &mut String {
        &mut self.raw
    }

    /// Realign all columns.
    ///
    /// Each column is padded to its widest cell with one space of margin on
    /// each side, and the delimiter row is rebuilt with matching dashes.
    /// Widths are measured in characters. Reformatting twice is the same as
    /// reformatting once.
    pub fn reformat(&mut self) {
        let lines: Vec<&str> = self.raw.lines().filter(|line| !is_blank(line)).collect();
        if lines.is_empty() {
            return;
        }

        let delimiter = if lines.len() > 1 && is_delimiter_row(lines[1]) {
            Some(1)
        } else {
            None
        };
        let rows: Vec<Vec<String>> = lines.iter().map(|line| split_row(line)).collect();
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut widths = vec![1; columns];
        for (index, row) in rows.iter().enumerate() {
            if Some(index) == delimiter {
                continue;
            }
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let alignments: Vec<Alignment> = match delimiter {
            Some(index) => (0..columns)
                .map(|column| {
                    rows[index]
                        .get(column)
                        .map(|cell| Alignment {
                            left: cell.starts_with(':'),
                            right: cell.len() > 1 && cell.ends_with(':'),
                        })
                        .unwrap_or_default()
                })
                .collect(),
            None => vec![Alignment::default(); columns],
        };

        let mut out = String::new();
        for (index, row) in rows.iter().enumerate() {
            out.push('|');
            for column in 0..columns {
                if Some(index) == delimiter {
                    out.push_str(&delimiter_cell(widths[column], alignments[column]));
                } else {
                    let cell = row.get(column).map(String::as_str).unwrap_or("");
                    out.push_str(&format!(" {:<width$} ", cell, width = widths[column]));
                }
                out.push('|');
            }
            out.push('\n');
        }

        if !self.raw.ends_with('\n') {
            out.pop();
        }
        self.raw = out;
    }
}

/// Dashes spanning the cell and both margins, with alignment colons.
fn delimiter_cell(width: usize, alignment: Alignment) -> String {
    let dashes = width + 2;
    let mut cell = String::with_capacity(dashes);
    for i in 0..dashes {
        let colon = (i == 0 && alignment.left) || (i == dashes - 1 && alignment.right);
        cell.push(if colon { ':' } else { '-' });
    }
    cell
}

/// Split a table row into trimmed cells. Outer pipes are optional; escaped
/// pipes and pipes inside code spans do not separate cells. A backtick with
/// no closing backtick later on the row is plain text.
fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = match line.strip_suffix('|') {
        Some(inner) if !inner.ends_with('\\') => inner,
        _ => line,
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut escaped = false;
    let mut in_code = false;
    for (i, c) in line.char_indices() {
        match c {
            '|' if !escaped && !in_code => {
                cells.push(cell.trim().to_string());
                cell.clear();
                continue;
            }
            '`' if !escaped => {
                in_code = !in_code && closes_code_span(&line[i + 1..]);
            }
            _ => {}
        }
        escaped = c == '\\' && !escaped;
        cell.push(c);
    }
    cells.push(cell.trim().to_string());
    cells
}

/// Whether `rest` holds an unescaped backtick.
fn closes_code_span(rest: &str) -> bool {
    let mut escaped = false;
    for c in rest.chars() {
        if c == '`' && !escaped {
            return true;
        }
        escaped = c == '\\' && !escaped;
    }
    false
}
