//! Moving a note or directory and rewriting the links that point at it.
//!
//! The rename happens first; links are rewritten afterwards by scanning the
//! whole repository. The two steps are not atomic: an interrupted scan leaves
//! the file moved and only some links updated.

use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::Repository;
use crate::error::NoteoError;
use crate::note::Note;
use crate::notes::{send, CHANNEL_CAPACITY};

/// Channels of a running move: rewritten notes, the overall outcome, errors.
pub type MoveChannels = (
    mpsc::Receiver<Note>,
    mpsc::Receiver<bool>,
    mpsc::Receiver<NoteoError>,
);

impl Repository {
    /// Move `from` to `to` (a file path, or an existing directory to move into)
    /// and rewrite every link in the repository pointing at the old location.
    ///
    /// Both paths are relative to the working directory unless absolute. Links
    /// are compared as absolute paths, so notes anywhere below the root are
    /// rewritten. Each rewritten and saved note is sent on the first channel.
    /// One final `true` or `false` reports whether the rename happened; it is
    /// sent even when the scan is cancelled.
    #[tracing::instrument(skip_all, fields(from = %from.display(), to = %to.display()))]
    pub fn move_note(&self, cancel: CancellationToken, from: &Path, to: &Path) -> MoveChannels {
        let (updated_tx, updated_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (success_tx, success_rx) = mpsc::channel(1);
        let (err_tx, err_rx) = mpsc::channel(CHANNEL_CAPACITY);

        let repo = self.clone();
        let from = self.absolute(from);
        let mut to = self.absolute(to);

        tokio::spawn(async move {
            if to.is_dir() {
                if let Some(name) = from.file_name() {
                    to.push(name);
                }
            }

            if let Err(e) = fs::rename(&from, &to) {
                let err = NoteoError::io_operation(
                    "move",
                    format!("{} to {}", from.display(), to.display()),
                    e,
                );
                send(&cancel, &err_tx, err).await;
                // capacity 1 holds the single outcome, even after cancellation
                let _ = success_tx.try_send(false);
                return;
            }
            tracing::debug!(target = %to.display(), "renamed");

            let rewritten = repo
                .rewrite_links(&cancel, &from, &to, &updated_tx, &err_tx)
                .await;
            tracing::debug!(rewritten, "links updated");
            let _ = success_tx.try_send(true);
        });

        (updated_rx, success_rx, err_rx)
    }

    async fn rewrite_links(
        &self,
        cancel: &CancellationToken,
        from: &Path,
        to: &Path,
        updated_tx: &mpsc::Sender<Note>,
        err_tx: &mpsc::Sender<NoteoError>,
    ) -> usize {
        let (mut notes, mut walk_errors) = self.all_notes(cancel.clone());
        let mut rewritten = 0;
        let mut notes_open = true;
        let mut errors_open = true;
        while notes_open || errors_open {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                next = walk_errors.recv(), if errors_open => match next {
                    Some(err) => {
                        send(cancel, err_tx, err).await;
                    }
                    None => errors_open = false,
                },
                next = notes.recv(), if notes_open => match next {
                    Some(mut note) => {
                        match note.update_link(from, to).and_then(|()| note.save()) {
                            Ok(true) => {
                                rewritten += 1;
                                send(cancel, updated_tx, note).await;
                            }
                            Ok(false) => {}
                            Err(err) => {
                                send(cancel, err_tx, err.in_note(note.path())).await;
                            }
                        }
                    }
                    None => notes_open = false,
                },
            }
        }
        rewritten
    }

    /// Resolve `path` against the working directory, lexically.
    fn absolute(&self, path: &Path) -> PathBuf {
        crate::paths::normalize(&self.dir.join(path))
    }
}
