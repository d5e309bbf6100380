//! `noteo add` command - create a note from arguments or from the editor

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Local};
use tracing::debug;

use noteo_core::error::{NoteoError, Result};
use noteo_core::repository::Repository;

/// Execute the add command
pub fn execute(work_dir: &Path, text: &[String]) -> Result<()> {
    let repo = Repository::for_work_dir(work_dir)?;
    let template = new_note_template(Local::now());

    let content = if text.is_empty() {
        let template = format!("{template}\n");
        let edited = text_from_editor(&repo, &template)?;
        if edited == template {
            println!("no new file added");
            return Ok(());
        }
        edited
    } else {
        format!("{template}{}", text.join(" "))
    };

    let file = repo.add(&content)?;
    println!("{} created", file.display());
    Ok(())
}

/// Front matter every new note starts with
pub fn new_note_template(created: DateTime<Local>) -> String {
    format!(
        "---\nCreated: {}\nTags: \n---\n\n",
        created.format("%a %b %e %H:%M:%S %z %Y")
    )
}

fn text_from_editor(repo: &Repository, template: &str) -> Result<String> {
    let file = temp_note_path();
    fs::write(&file, template).map_err(|e| NoteoError::io_operation("write", file.display(), e))?;

    let result = run_editor(&repo.config()?.editor_command(), &file).and_then(|()| {
        fs::read_to_string(&file).map_err(|e| NoteoError::io_operation("read", file.display(), e))
    });
    if let Err(e) = fs::remove_file(&file) {
        debug!(file = %file.display(), error = %e, "temporary note not removed");
    }
    result
}

fn run_editor(editor: &str, file: &Path) -> Result<()> {
    let mut parts = editor.split(' ').filter(|part| !part.is_empty());
    let Some(program) = parts.next() else {
        return Err(NoteoError::invalid_value("editor", "empty command"));
    };

    debug!(editor = %editor, path = %file.display(), "open_editor");
    let status = Command::new(program)
        .args(parts)
        .arg(file)
        .status()
        .map_err(|e| NoteoError::Other(format!("failed to open editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(NoteoError::Other(format!(
            "editor '{}' exited with non-zero status: {:?}",
            editor, status
        )));
    }
    Ok(())
}

fn temp_note_path() -> PathBuf {
    env::temp_dir().join(format!("{}.md", ulid::Ulid::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_template_has_parseable_created_date() {
        let created = Local.with_ymd_and_hms(2020, 9, 10, 16, 30, 11).unwrap();
        let template = new_note_template(created);
        assert!(template.starts_with("---\nCreated: Thu Sep 10 16:30:11 "));
        assert!(template.ends_with(" 2020\nTags: \n---\n\n"));

        let line = template.lines().nth(1).unwrap();
        let value = line.strip_prefix("Created: ").unwrap();
        let parsed = noteo_core::date::parse_absolute(value).unwrap();
        assert_eq!(parsed, created.fixed_offset());
    }

    #[test]
    fn test_empty_editor_command() {
        let file = temp_note_path();
        assert!(matches!(
            run_editor("  ", &file),
            Err(NoteoError::InvalidValue { .. })
        ));
    }
}
