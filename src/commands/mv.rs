//! `noteo mv` command - move a note and update links to it

use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::commands::helpers::{finish_errors, print_errors};
use noteo_core::error::{NoteoError, Result};
use noteo_core::repository::Repository;

/// Execute the mv command
pub async fn execute(work_dir: &Path, source: &Path, target: &Path) -> Result<()> {
    let repo = Repository::for_work_dir(work_dir)?;
    let cancel = CancellationToken::new();
    let (mut updated, mut success, errors) = repo.move_note(cancel, source, target);
    let printers = print_errors(vec![errors]);

    let mut moved = false;
    loop {
        tokio::select! {
            Some(note) = updated.recv() => println!("{} updated", note.path().display()),
            Some(ok) = success.recv() => moved = ok,
            else => break,
        }
    }
    finish_errors(printers).await;

    if !moved {
        return Err(NoteoError::MoveFailed);
    }
    println!("File moved");
    Ok(())
}
