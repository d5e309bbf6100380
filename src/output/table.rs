//! Aligned table output. Rows are buffered and padded when the footer is
//! requested, since column widths depend on every row.

use std::str::FromStr;

use super::Formatter;
use noteo_core::bail_unsupported;
use noteo_core::date::DateFormat;
use noteo_core::error::{NoteoError, Result};
use noteo_core::note::NoteView;

/// Width of the `BEGINNING` column
const BEGINNING_WIDTH: usize = 34;
const COLUMN_GAP: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    File,
    Beginning,
    Modified,
    Created,
    Tags,
}

impl Column {
    fn header(&self) -> &'static str {
        match self {
            Column::File => "FILE",
            Column::Beginning => "BEGINNING",
            Column::Modified => "MODIFIED",
            Column::Created => "CREATED",
            Column::Tags => "TAGS",
        }
    }

    fn value(&self, note: &dyn NoteView, date_format: DateFormat) -> String {
        match self {
            Column::File => note.path().display().to_string(),
            Column::Beginning => fit(&beginning(&note.body().unwrap_or_default()), BEGINNING_WIDTH),
            Column::Modified => match note.modified() {
                Ok(modified) => date_format.format(modified),
                Err(e) => error_cell(&e),
            },
            Column::Created => match note.created() {
                Ok(Some(created)) => date_format.format(created),
                Ok(None) => String::new(),
                Err(e) => error_cell(&e),
            },
            Column::Tags => note
                .tags()
                .map(|tags| {
                    tags.iter()
                        .map(|tag| tag.as_str())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .unwrap_or_default(),
        }
    }
}

impl FromStr for Column {
    type Err = NoteoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "FILE" => Ok(Column::File),
            "BEGINNING" => Ok(Column::Beginning),
            "MODIFIED" => Ok(Column::Modified),
            "CREATED" => Ok(Column::Created),
            "TAGS" => Ok(Column::Tags),
            other => bail_unsupported!(
                "output column",
                other,
                "file, beginning, modified, created, tags"
            ),
        }
    }
}

pub struct TableFormatter {
    columns: Vec<Column>,
    date_format: DateFormat,
    rows: Vec<Vec<String>>,
}

impl TableFormatter {
    pub fn new(columns: Vec<Column>, date_format: DateFormat) -> Self {
        TableFormatter {
            columns,
            date_format,
            rows: Vec::new(),
        }
    }

    fn flush(&mut self) -> String {
        let mut widths = vec![0usize; self.columns.len()];
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        for row in self.rows.drain(..) {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                if i + 1 == widths.len() {
                    line.push_str(cell);
                } else {
                    let pad = widths[i] - cell.chars().count();
                    line.push_str(cell);
                    line.extend(std::iter::repeat(' ').take(pad));
                    line.push_str(COLUMN_GAP);
                }
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

impl Formatter for TableFormatter {
    fn header(&mut self) -> String {
        let row = self
            .columns
            .iter()
            .map(|column| match column {
                Column::Beginning => fit(column.header(), BEGINNING_WIDTH),
                _ => column.header().to_string(),
            })
            .collect();
        self.rows.push(row);
        String::new()
    }

    fn note(&mut self, note: &dyn NoteView) -> String {
        let row = self
            .columns
            .iter()
            .map(|column| column.value(note, self.date_format))
            .collect();
        self.rows.push(row);
        String::new()
    }

    fn footer(&mut self) -> String {
        self.flush()
    }
}

/// First meaningful line of the body, without markdown heading or bullet marks
fn beginning(text: &str) -> String {
    let text = text.trim_matches('\n');
    let line = text.split('\n').next().unwrap_or_default();
    let mut line = line.replace('\t', " ");
    for _ in 0..5 {
        if let Some(rest) = line.strip_prefix('#') {
            line = rest.to_string();
        }
    }
    if let Some(rest) = line.strip_prefix('*') {
        line = rest.to_string();
    }
    line.replace('\r', "").trim_matches(' ').to_string()
}

/// Pad or cut `text` to exactly `width` characters, marking cuts with an ellipsis
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    } else {
        format!("{text:<width$}")
    }
}

fn error_cell(err: &NoteoError) -> String {
    err.to_string().replace('\t', " ")
}
