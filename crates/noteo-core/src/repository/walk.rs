use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Local};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use walkdir::{DirEntry, WalkDir};

use crate::error::{NoteoError, Result};
use crate::note::Note;
use crate::notes::{send, CHANNEL_CAPACITY};
use crate::paths::relative_to;
use crate::trace_time;

/// Stream a note for every regular `*.md` file below `root`.
///
/// Note paths are expressed relative to `work_dir`, and file access is anchored
/// there as well. Errors are forwarded and the walk goes on with the remaining
/// entries. The walk stops as soon as `cancel` fires.
pub(crate) fn walk(
    cancel: CancellationToken,
    root: PathBuf,
    work_dir: PathBuf,
) -> (mpsc::Receiver<Note>, mpsc::Receiver<NoteoError>) {
    let (note_tx, note_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (err_tx, err_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let handle = Handle::current();

    tokio::task::spawn_blocking(move || {
        let start = Instant::now();
        let mut emitted = 0usize;
        tracing::debug!(root = %root.display(), "walking notes");

        for entry in WalkDir::new(&root) {
            if cancel.is_cancelled() {
                break;
            }
            let note = match entry.map_err(NoteoError::from).and_then(|entry| {
                if is_note_file(&entry) {
                    note_for(&entry, &work_dir).map(Some)
                } else {
                    Ok(None)
                }
            }) {
                Ok(Some(note)) => note,
                Ok(None) => continue,
                Err(err) => {
                    if !handle.block_on(send(&cancel, &err_tx, err)) && cancel.is_cancelled() {
                        break;
                    }
                    continue;
                }
            };
            if !handle.block_on(send(&cancel, &note_tx, note)) {
                break;
            }
            emitted += 1;
        }

        trace_time!(start, "walk_notes", notes = emitted);
    });

    (note_rx, err_rx)
}

fn is_note_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(".md")
}

fn note_for(entry: &DirEntry, work_dir: &Path) -> Result<Note> {
    let modified = entry
        .metadata()
        .map_err(NoteoError::from)?
        .modified()
        .map_err(|e| NoteoError::io_operation("stat", entry.path().display(), e))?;
    let path = relative_to(work_dir, entry.path()).ok_or_else(|| {
        NoteoError::io_operation(
            "relativize",
            entry.path().display(),
            format!("not reachable from {}", work_dir.display()),
        )
    })?;
    Ok(
        Note::with_modified(path, DateTime::<Local>::from(modified).fixed_offset())
            .anchored_at(work_dir),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    async fn collect(
        mut notes: mpsc::Receiver<Note>,
        mut errors: mpsc::Receiver<NoteoError>,
    ) -> (Vec<String>, usize) {
        let run = async {
            let mut paths = Vec::new();
            let mut error_count = 0;
            loop {
                tokio::select! {
                    Some(note) = notes.recv() => paths.push(crate::paths::to_slash(note.path())),
                    Some(_) = errors.recv() => error_count += 1,
                    else => break,
                }
            }
            paths.sort();
            (paths, error_count)
        };
        tokio::time::timeout(std::time::Duration::from_secs(10), run)
            .await
            .expect("walk finished in time")
    }

    #[tokio::test]
    async fn test_walks_markdown_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("a.md"), "a").unwrap();
        fs::write(root.join("sub/b.md"), "b").unwrap();
        fs::write(root.join("c.txt"), "c").unwrap();
        fs::create_dir_all(root.join("dir.md")).unwrap();

        let (notes, errors) = walk(CancellationToken::new(), root.clone(), root.clone());
        let (paths, error_count) = collect(notes, errors).await;
        assert_eq!(paths, vec!["a.md", "sub/b.md"]);
        assert_eq!(error_count, 0);
    }

    #[tokio::test]
    async fn test_paths_are_relative_to_work_dir() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("work")).unwrap();
        fs::write(root.join("top.md"), "top").unwrap();
        fs::write(root.join("work/inner.md"), "inner").unwrap();

        let (notes, errors) = walk(CancellationToken::new(), root.clone(), root.join("work"));
        let (paths, _) = collect(notes, errors).await;
        assert_eq!(paths, vec!["../top.md", "inner.md"]);
    }

    #[tokio::test]
    async fn test_notes_are_readable() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("work")).unwrap();
        fs::write(root.join("top.md"), "---\nTags: foo\n---\ntop").unwrap();

        let (mut notes, _errors) = walk(CancellationToken::new(), root.clone(), root.join("work"));
        let note = notes.recv().await.unwrap();
        assert_eq!(note.body().unwrap(), "top");
        assert!(note.modified().is_ok());
    }

    #[tokio::test]
    async fn test_missing_root_reports_error() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("missing");
        let (notes, errors) = walk(CancellationToken::new(), root.clone(), root);
        let (paths, error_count) = collect(notes, errors).await;
        assert!(paths.is_empty());
        assert_eq!(error_count, 1);
    }

    #[tokio::test]
    async fn test_cancelled_walk_emits_nothing() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::write(root.join("a.md"), "a").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (notes, errors) = walk(cancel, root.clone(), root);
        let (paths, _) = collect(notes, errors).await;
        assert!(paths.is_empty());
    }
}
