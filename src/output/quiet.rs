use super::Formatter;
use noteo_core::note::NoteView;

/// Paths only, one per line
pub struct QuietFormatter;

impl Formatter for QuietFormatter {
    fn header(&mut self) -> String {
        String::new()
    }

    fn note(&mut self, note: &dyn NoteView) -> String {
        format!("{}\n", note.path().display())
    }

    fn footer(&mut self) -> String {
        String::new()
    }
}
