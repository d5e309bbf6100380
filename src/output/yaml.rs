use super::{Formatter, NoteRecord};
use noteo_core::note::NoteView;

/// One YAML document per note
pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn header(&mut self) -> String {
        String::new()
    }

    fn note(&mut self, note: &dyn NoteView) -> String {
        let record = match NoteRecord::from_note(note) {
            Ok(record) => record,
            Err(e) => return format!("{}\n", e),
        };
        match serde_yaml::to_string(&record) {
            Ok(yaml) => format!("---\n{}", yaml),
            Err(e) => format!("error marshalling note: {}\n", e),
        }
    }

    fn footer(&mut self) -> String {
        String::new()
    }
}
