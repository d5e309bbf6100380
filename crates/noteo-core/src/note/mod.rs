//! A single markdown note: front matter plus body, loaded lazily from disk.
//!
//! Readers take `&self` and load what they need under a lock, so a note can be
//! inspected from any task. Mutators take `&mut self`: one owner at a time
//! changes a note, concurrent external mutation is not supported.

mod frontmatter;
mod links;
pub(crate) mod parse;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

use chrono::{DateTime, Local};
use regex::Regex;

pub use frontmatter::FrontMatter;

use crate::date::Timestamp;
use crate::error::{NoteoError, Result};
use crate::lazy::Lazy;
use crate::tag::Tag;
use parse::split_content;

/// Read-only view of a note, as seen by filter predicates and comparators.
pub trait NoteView: Send + Sync {
    fn path(&self) -> &Path;
    fn modified(&self) -> Result<Timestamp>;
    fn created(&self) -> Result<Option<Timestamp>>;
    fn tags(&self) -> Result<Vec<Tag>>;
    fn body(&self) -> Result<String>;
}

/// Find the first tag of `note` with the given name.
pub fn find_tag_by_name(note: &dyn NoteView, name: &str) -> Result<Option<Tag>> {
    Ok(crate::tag::find_by_name(&note.tags()?, name).cloned())
}

#[derive(Debug)]
pub struct Note {
    path: PathBuf,
    base: PathBuf,
    modified: Option<Timestamp>,
    original: OnceLock<Result<String>>,
    front_matter: Mutex<Lazy<FrontMatter>>,
    body: Mutex<Option<String>>,
}

impl Note {
    /// A note whose modification time is read from the filesystem on demand.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Note {
            path: path.into(),
            base: PathBuf::new(),
            modified: None,
            original: OnceLock::new(),
            front_matter: Mutex::new(Lazy::Unloaded),
            body: Mutex::new(None),
        }
    }

    /// A note with a fixed modification time.
    pub fn with_modified(path: impl Into<PathBuf>, modified: Timestamp) -> Self {
        Note {
            modified: Some(modified),
            ..Note::new(path)
        }
    }

    /// Resolve the note's path against `base` for file access. The reported
    /// `path` is left as given.
    pub fn anchored_at(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location used for reading and writing the file
    pub fn file_path(&self) -> PathBuf {
        if self.base.as_os_str().is_empty() {
            self.path.clone()
        } else {
            self.base.join(&self.path)
        }
    }

    pub fn modified(&self) -> Result<Timestamp> {
        if let Some(modified) = self.modified {
            return Ok(modified);
        }
        let file = self.file_path();
        let modified = fs::metadata(&file)
            .and_then(|metadata| metadata.modified())
            .map_err(|e| NoteoError::io_operation("stat", file.display(), e))?;
        Ok(DateTime::<Local>::from(modified).fixed_offset())
    }

    pub fn created(&self) -> Result<Option<Timestamp>> {
        self.with_front_matter(|front_matter| front_matter.created())
    }

    pub fn tags(&self) -> Result<Vec<Tag>> {
        self.with_front_matter(|front_matter| front_matter.tags().to_vec())
    }

    pub fn body(&self) -> Result<String> {
        let mut body = self.body.lock().unwrap_or_else(PoisonError::into_inner);
        if body.is_none() {
            let (_, original) = split_content(self.original()?);
            *body = Some(original.to_string());
        }
        Ok(body.clone().unwrap_or_default())
    }

    pub fn set_body(&mut self, text: impl Into<String>) {
        *self.body.get_mut().unwrap_or_else(PoisonError::into_inner) = Some(text.into());
    }

    pub fn set_tag(&mut self, tag: Tag) -> Result<()> {
        self.with_front_matter(|front_matter| front_matter.set_tag(tag))
    }

    pub fn remove_tag(&mut self, tag: &Tag) -> Result<()> {
        self.with_front_matter(|front_matter| front_matter.remove_tag(tag))
    }

    pub fn remove_tag_regex(&mut self, regex: &Regex) -> Result<()> {
        self.with_front_matter(|front_matter| front_matter.remove_tag_regex(regex))
    }

    /// Rewrite markdown links pointing at `from`, or at anything below it when
    /// `from` is a directory, so that they point at `to`. Both paths are
    /// expressed like [`Note::file_path`], absolute for an anchored note.
    pub fn update_link(&mut self, from: &Path, to: &Path) -> Result<()> {
        let body = self.body()?;
        let location = self.file_path();
        if let Some(rewritten) = links::rewrite_links(&self.path, &location, &body, from, to)? {
            self.set_body(rewritten);
        }
        Ok(())
    }

    /// Write the note if its serialized form differs from what was read.
    ///
    /// Returns whether the file was written.
    pub fn save(&mut self) -> Result<bool> {
        let front_matter = self.with_front_matter(|front_matter| front_matter.marshal())??;
        let content = front_matter + &self.body()?;
        if content == self.original()? {
            return Ok(false);
        }

        let file = self.file_path();
        fs::write(&file, &content)
            .map_err(|e| NoteoError::io_operation("write", file.display(), e))?;
        tracing::debug!(path = %self.path.display(), "saved note");
        self.original = OnceLock::from(Ok(content));
        Ok(true)
    }

    fn original(&self) -> Result<&str> {
        self.original
            .get_or_init(|| {
                let file = self.file_path();
                fs::read_to_string(&file)
                    .map_err(|e| NoteoError::io_operation("read", file.display(), e))
            })
            .as_deref()
            .map_err(Clone::clone)
    }

    fn with_front_matter<R>(&self, f: impl FnOnce(&mut FrontMatter) -> R) -> Result<R> {
        let mut cell = self
            .front_matter
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let front_matter = cell.get_or_load(|| {
            let (block, _) = split_content(self.original()?);
            FrontMatter::parse(&self.path, block)
        })?;
        Ok(f(front_matter))
    }
}

impl NoteView for Note {
    fn path(&self) -> &Path {
        Note::path(self)
    }

    fn modified(&self) -> Result<Timestamp> {
        Note::modified(self)
    }

    fn created(&self) -> Result<Option<Timestamp>> {
        Note::created(self)
    }

    fn tags(&self) -> Result<Vec<Tag>> {
        Note::tags(self)
    }

    fn body(&self) -> Result<String> {
        Note::body(self)
    }
}
