//! Moving notes and directories, with links rewritten across the repository.

use std::fs;
use std::path::Path;
use std::time::Duration;

use noteo_core::error::NoteoError;
use noteo_core::repository::{MoveChannels, Repository};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn setup() -> (TempDir, Repository) {
    let dir = TempDir::new().unwrap();
    Repository::init(dir.path()).unwrap();
    let repo = Repository::for_work_dir(dir.path()).unwrap();
    (dir, repo)
}

struct Outcome {
    updated: Vec<String>,
    success: bool,
    errors: Vec<NoteoError>,
}

async fn finish(channels: MoveChannels) -> Outcome {
    let (mut updated_rx, mut success_rx, mut err_rx) = channels;
    let run = async {
        let mut updated = Vec::new();
        let mut errors = Vec::new();
        let mut success = None;
        loop {
            tokio::select! {
                Some(note) = updated_rx.recv() => {
                    updated.push(noteo_core::paths::to_slash(note.path()));
                }
                Some(ok) = success_rx.recv() => success = Some(ok),
                Some(err) = err_rx.recv() => errors.push(err),
                else => break,
            }
        }
        Outcome {
            updated,
            success: success.expect("outcome reported"),
            errors,
        }
    };
    tokio::time::timeout(Duration::from_secs(10), run)
        .await
        .expect("move finished in time")
}

fn read(dir: &TempDir, file: &str) -> String {
    fs::read_to_string(dir.path().join(file)).unwrap()
}

#[tokio::test]
async fn test_rename_rewrites_links() {
    let (dir, repo) = setup();
    fs::write(dir.path().join("source.md"), "source").unwrap();
    fs::write(dir.path().join("link.md"), "[link](source.md)").unwrap();

    let cancel = CancellationToken::new();
    let outcome = finish(repo.move_note(cancel, Path::new("source.md"), Path::new("target.md"))).await;

    assert!(outcome.success);
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert_eq!(outcome.updated, vec!["link.md"]);
    assert!(!dir.path().join("source.md").exists());
    assert_eq!(read(&dir, "target.md"), "source");
    assert_eq!(read(&dir, "link.md"), "[link](target.md)");
}

#[tokio::test]
async fn test_move_into_existing_directory() {
    let (dir, repo) = setup();
    fs::create_dir_all(dir.path().join("target")).unwrap();
    fs::write(dir.path().join("source.md"), "source").unwrap();
    fs::write(dir.path().join("link.md"), "[link](source.md)").unwrap();

    let cancel = CancellationToken::new();
    let outcome = finish(repo.move_note(cancel, Path::new("source.md"), Path::new("target"))).await;

    assert!(outcome.success);
    assert!(dir.path().join("target/source.md").exists());
    assert_eq!(read(&dir, "link.md"), "[link](target/source.md)");
}

#[tokio::test]
async fn test_move_directory() {
    let (dir, repo) = setup();
    fs::create_dir_all(dir.path().join("source")).unwrap();
    fs::write(dir.path().join("source/foo.md"), "foo").unwrap();
    fs::write(dir.path().join("link.md"), "[link](source/foo.md)").unwrap();

    let cancel = CancellationToken::new();
    let outcome = finish(repo.move_note(cancel, Path::new("source"), Path::new("target"))).await;

    assert!(outcome.success);
    assert!(dir.path().join("target/foo.md").exists());
    assert_eq!(read(&dir, "link.md"), "[link](target/foo.md)");
}

#[tokio::test]
async fn test_links_from_other_directories() {
    let (dir, repo) = setup();
    fs::create_dir_all(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("source.md"), "source").unwrap();
    fs::write(
        dir.path().join("docs/index.md"),
        "see [it](../source.md#part) and [site](https://example.com/source.md)",
    )
    .unwrap();

    let cancel = CancellationToken::new();
    let outcome = finish(repo.move_note(cancel, Path::new("source.md"), Path::new("docs/moved.md"))).await;

    assert!(outcome.success);
    assert_eq!(
        read(&dir, "docs/index.md"),
        "see [it](moved.md#part) and [site](https://example.com/source.md)"
    );
}

#[tokio::test]
async fn test_missing_source_fails() {
    let (_dir, repo) = setup();
    let cancel = CancellationToken::new();
    let outcome = finish(repo.move_note(cancel, Path::new("missing.md"), Path::new("target.md"))).await;

    assert!(!outcome.success);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.updated.is_empty());
}

#[tokio::test]
async fn test_move_from_working_directory_below_root() {
    let (dir, _root) = setup();
    fs::create_dir_all(dir.path().join("work")).unwrap();
    fs::write(dir.path().join("work/source.md"), "source").unwrap();
    fs::write(dir.path().join("top.md"), "[link](work/source.md)").unwrap();
    fs::write(dir.path().join("work/near.md"), "[link](source.md)").unwrap();
    let work = Repository::for_work_dir(&dir.path().join("work")).unwrap();

    let cancel = CancellationToken::new();
    let outcome = finish(work.move_note(cancel, Path::new("source.md"), Path::new("target.md"))).await;

    assert!(outcome.success);
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    let mut updated = outcome.updated;
    updated.sort();
    assert_eq!(updated, vec!["../top.md", "near.md"]);
    assert_eq!(read(&dir, "top.md"), "[link](work/target.md)");
    assert_eq!(read(&dir, "work/near.md"), "[link](target.md)");
}

#[tokio::test]
async fn test_move_note_from_above_working_directory() {
    let (dir, _root) = setup();
    fs::create_dir_all(dir.path().join("work")).unwrap();
    fs::write(dir.path().join("a.md"), "a").unwrap();
    fs::write(dir.path().join("top.md"), "[x](a.md)").unwrap();
    let work = Repository::for_work_dir(&dir.path().join("work")).unwrap();

    let cancel = CancellationToken::new();
    let outcome = finish(work.move_note(cancel, Path::new("../a.md"), Path::new("b.md"))).await;

    assert!(outcome.success);
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert!(dir.path().join("work/b.md").exists());
    assert_eq!(read(&dir, "top.md"), "[x](work/b.md)");
}

#[tokio::test]
async fn test_errors_name_the_note() {
    let (dir, repo) = setup();
    fs::write(dir.path().join("source.md"), "source").unwrap();
    fs::write(dir.path().join("bad.md"), "---\nTags: [ok, foo bar]\n---\n[x](source.md)").unwrap();

    let cancel = CancellationToken::new();
    let outcome = finish(repo.move_note(cancel, Path::new("source.md"), Path::new("target.md"))).await;

    assert!(outcome.success);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].to_string().contains("bad.md"), "{}", outcome.errors[0]);
    assert!(outcome.updated.is_empty());
}

#[tokio::test]
async fn test_cancelled_move_still_reports_and_closes() {
    let (dir, repo) = setup();
    fs::write(dir.path().join("source.md"), "source").unwrap();
    fs::write(dir.path().join("link.md"), "[link](source.md)").unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let outcome = finish(repo.move_note(cancel, Path::new("source.md"), Path::new("target.md"))).await;

    // the rename is not rolled back, the link scan is abandoned
    assert!(outcome.success);
    assert!(outcome.updated.is_empty());
    assert!(dir.path().join("target.md").exists());
    assert_eq!(read(&dir, "link.md"), "[link](source.md)");
}
