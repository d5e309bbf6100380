//! A repository is a directory tree of notes marked by a `.noteo.yml` file at
//! its root. Commands operate on a working directory somewhere inside it.

mod config;
pub mod filename;
mod moves;
mod walk;

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub use config::{RepoConfig, CONFIG_FILE};
pub use moves::MoveChannels;

use crate::bail_invalid;
use crate::error::{NoteoError, Result};
use crate::note::Note;
use crate::notes::{send, CHANNEL_CAPACITY};
use crate::tag::Tag;

#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
    dir: PathBuf,
}

impl Repository {
    /// Create the marker file in `dir`.
    ///
    /// Fails when `dir` already belongs to a repository. Returns the path of
    /// the created config file.
    #[tracing::instrument(fields(dir = %dir.display()), skip(dir))]
    pub fn init(dir: &Path) -> Result<PathBuf> {
        let file = RepoConfig::path(dir);
        match Repository::for_work_dir(dir) {
            Ok(existing) => {
                return Err(NoteoError::AlreadyInitialized {
                    path: RepoConfig::path(&existing.root),
                })
            }
            Err(err) if err.is_not_repository() => {}
            Err(err) => return Err(err),
        }
        fs::write(&file, config::CONFIG_TEMPLATE)
            .map_err(|e| NoteoError::io_operation("write", file.display(), e))?;
        tracing::debug!(file = %file.display(), "initialized repository");
        Ok(file)
    }

    /// Find the repository containing `dir` by looking for the marker file in
    /// `dir` and its ancestors.
    pub fn for_work_dir(dir: &Path) -> Result<Self> {
        let dir = dir
            .canonicalize()
            .map_err(|e| NoteoError::io_operation("resolve", dir.display(), e))?;
        for candidate in dir.ancestors() {
            let marker = RepoConfig::path(candidate);
            match fs::metadata(&marker) {
                Ok(_) => {
                    tracing::debug!(root = %candidate.display(), "found repository");
                    return Ok(Repository {
                        root: candidate.to_path_buf(),
                        dir,
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(NoteoError::io_operation("stat", marker.display(), e)),
            }
        }
        Err(NoteoError::RepositoryNotFound { search_root: dir })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Working directory, the base of every relative path given to or returned
    /// by the repository
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> Result<RepoConfig> {
        RepoConfig::load(&self.root)
    }

    /// Notes below the working directory
    pub fn notes(
        &self,
        cancel: CancellationToken,
    ) -> (mpsc::Receiver<Note>, mpsc::Receiver<NoteoError>) {
        walk::walk(cancel, self.dir.clone(), self.dir.clone())
    }

    /// Notes of the whole repository, with paths still relative to the
    /// working directory
    pub fn all_notes(
        &self,
        cancel: CancellationToken,
    ) -> (mpsc::Receiver<Note>, mpsc::Receiver<NoteoError>) {
        walk::walk(cancel, self.root.clone(), self.dir.clone())
    }

    /// Every tag of every note below the working directory, in walk order.
    /// Duplicates are not removed.
    pub fn tags(&self, cancel: CancellationToken) -> (mpsc::Receiver<Tag>, mpsc::Receiver<NoteoError>) {
        let (tag_tx, tag_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (err_tx, err_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (mut notes, mut walk_errors) = self.notes(cancel.clone());

        tokio::spawn(async move {
            let mut notes_open = true;
            let mut errors_open = true;
            while notes_open || errors_open {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    next = walk_errors.recv(), if errors_open => match next {
                        Some(err) => {
                            send(&cancel, &err_tx, err).await;
                        }
                        None => errors_open = false,
                    },
                    next = notes.recv(), if notes_open => match next.map(|note| (note.tags(), note)) {
                        Some((Ok(tags), _)) => {
                            for tag in tags {
                                if !send(&cancel, &tag_tx, tag).await {
                                    return;
                                }
                            }
                        }
                        Some((Err(err), note)) => {
                            send(&cancel, &err_tx, err.in_note(note.path())).await;
                        }
                        None => notes_open = false,
                    },
                }
            }
        });

        (tag_rx, err_rx)
    }

    /// Write a new note in the working directory. The file name is derived
    /// from the first line of the body; a random suffix is added when taken.
    ///
    /// Returns the file path relative to the working directory.
    #[tracing::instrument(skip_all)]
    pub fn add(&self, text: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| NoteoError::io_operation("create directory", self.dir.display(), e))?;
        let name = filename::generate_name(text);
        let mut file = PathBuf::from(format!("{name}.md"));
        if self.dir.join(&file).exists() {
            file = PathBuf::from(format!("{name}-{}.md", filename::collision_suffix()));
        }
        let path = self.dir.join(&file);
        fs::write(&path, text).map_err(|e| NoteoError::io_operation("write", path.display(), e))?;
        tracing::debug!(file = %file.display(), "added note");
        Ok(file)
    }

    /// Set `tag` on a note. Relative dates are stored as absolute ones.
    ///
    /// Returns whether the file changed.
    pub fn tag_file_with(&self, file: &Path, tag: &str) -> Result<bool> {
        let tag = Tag::new(tag)?;
        let mut note = self.open(file)?;
        note.set_tag(tag)?;
        note.save()
    }

    /// Remove `tag` from a note. Returns whether the file changed.
    pub fn untag_file(&self, file: &Path, tag: &str) -> Result<bool> {
        let tag = Tag::new(tag)?;
        let mut note = self.open(file)?;
        note.remove_tag(&tag)?;
        note.save()
    }

    /// Remove the first tag matching `pattern` from a note. Returns whether
    /// the file changed.
    pub fn untag_file_regex(&self, file: &Path, pattern: &str) -> Result<bool> {
        let regex = Regex::new(pattern).map_err(|e| NoteoError::invalid_regex(pattern, e))?;
        let mut note = self.open(file)?;
        note.remove_tag_regex(&regex)?;
        note.save()
    }

    fn open(&self, file: &Path) -> Result<Note> {
        if file.extension().and_then(|ext| ext.to_str()) != Some("md") {
            bail_invalid!("note file", format!("{} has no *.md extension", file.display()));
        }
        Ok(Note::new(file).anchored_at(&self.dir))
    }
}
