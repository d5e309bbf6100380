use super::{Formatter, NoteRecord};
use noteo_core::note::NoteView;

/// One JSON object per line
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn header(&mut self) -> String {
        String::new()
    }

    fn note(&mut self, note: &dyn NoteView) -> String {
        let record = match NoteRecord::from_note(note) {
            Ok(record) => record,
            Err(e) => return format!("{}\n", e),
        };
        match serde_json::to_string(&record) {
            Ok(json) => format!("{}\n", json),
            Err(e) => format!("error marshalling note: {}\n", e),
        }
    }

    fn footer(&mut self) -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_note::TestNote;

    #[test]
    fn test_note_line() {
        let out = JsonFormatter.note(&TestNote::new("a.md", "body text"));
        assert!(out.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["file"], "a.md");
        assert_eq!(value["modified"], "2020-09-10T16:30:11+02:00");
        assert_eq!(value["created"], "2020-09-01T08:00:00+02:00");
        assert_eq!(value["tags"], serde_json::json!(["foo", "priority:1"]));
        assert_eq!(value["text"], "body text");
    }

    #[test]
    fn test_missing_created_is_null() {
        let mut note = TestNote::new("a.md", "");
        note.created = None;
        let out = JsonFormatter.note(&note);
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert!(value["created"].is_null());
    }

    #[test]
    fn test_broken_note_prints_error() {
        let mut note = TestNote::new("a.md", "");
        note.broken = true;
        assert_eq!(JsonFormatter.note(&note), "broken note\n");
    }
}
