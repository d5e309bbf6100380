//! Output formatters for `noteo ls`
//!
//! A formatter renders a stream of notes as a header, one chunk per note and a
//! footer. Each call returns the text to print, which may be empty when the
//! formatter buffers.

pub mod json;
pub mod quiet;
pub mod table;
pub mod yaml;

use serde::Serialize;

use noteo_core::bail_unsupported;
use noteo_core::date::{DateFormat, Timestamp};
use noteo_core::error::Result;
use noteo_core::note::NoteView;

pub use table::{Column, TableFormatter};

/// Columns of `-o wide`
pub const WIDE_COLUMNS: [Column; 5] = [
    Column::File,
    Column::Beginning,
    Column::Modified,
    Column::Created,
    Column::Tags,
];

pub trait Formatter {
    fn header(&mut self) -> String;
    fn note(&mut self, note: &dyn NoteView) -> String;
    fn footer(&mut self) -> String;
}

/// Pick the formatter for an `--output` value. `quiet` wins over everything.
pub fn formatter(output: &str, quiet: bool, date_format: DateFormat) -> Result<Box<dyn Formatter>> {
    if quiet {
        return Ok(Box::new(quiet::QuietFormatter));
    }
    let output = output.to_lowercase();
    if let Some(columns) = output.strip_prefix("table=") {
        let columns = columns
            .split(',')
            .map(|column| column.trim().parse())
            .collect::<Result<Vec<Column>>>()?;
        return Ok(Box::new(TableFormatter::new(columns, date_format)));
    }
    match output.as_str() {
        "wide" => Ok(Box::new(TableFormatter::new(WIDE_COLUMNS.to_vec(), date_format))),
        "json" => Ok(Box::new(json::JsonFormatter)),
        "yaml" => Ok(Box::new(yaml::YamlFormatter)),
        other => bail_unsupported!(
            "output format in --output flag",
            other,
            "table=<columns>, wide, json, yaml"
        ),
    }
}

/// Serialized shape of a note in structured outputs
#[derive(Debug, Serialize)]
pub struct NoteRecord {
    pub file: String,
    pub modified: Timestamp,
    pub created: Option<Timestamp>,
    pub tags: Vec<String>,
    pub text: String,
}

impl NoteRecord {
    pub fn from_note(note: &dyn NoteView) -> Result<Self> {
        Ok(NoteRecord {
            file: note.path().display().to_string(),
            modified: note.modified()?,
            created: note.created()?,
            tags: note.tags()?.iter().map(ToString::to_string).collect(),
            text: note.body()?,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use noteo_core::error::NoteoError;

    #[test]
    fn test_formatter_selection() {
        assert!(formatter("json", false, DateFormat::default()).is_ok());
        assert!(formatter("YAML", false, DateFormat::default()).is_ok());
        assert!(formatter("wide", false, DateFormat::default()).is_ok());
        assert!(formatter("table=file,tags", false, DateFormat::default()).is_ok());
        assert!(formatter("anything", true, DateFormat::default()).is_ok());
    }

    #[test]
    fn test_unsupported_output() {
        assert!(matches!(
            formatter("xml", false, DateFormat::default()),
            Err(NoteoError::Unsupported { .. })
        ));
        assert!(matches!(
            formatter("table=file,size", false, DateFormat::default()),
            Err(NoteoError::Unsupported { .. })
        ));
    }
}
