//! Streaming stages over notes.
//!
//! Every stage is a spawned task reading from one bounded channel and writing
//! to two: notes and errors. A stage owns its senders and drops them when its
//! input is exhausted or the cancellation token fires, which closes both
//! output channels exactly once.

pub mod filter;
pub mod top;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub use filter::{filter, Predicate};
pub use top::{top, Less};

/// Capacity of every stage's output channels
pub const CHANNEL_CAPACITY: usize = 16;

/// Send `value` unless `cancel` fires first.
///
/// Returns `false` when the value was not delivered, either because the stage
/// was cancelled or because the receiver is gone.
pub(crate) async fn send<T>(cancel: &CancellationToken, tx: &mpsc::Sender<T>, value: T) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        sent = tx.send(value) => sent.is_ok(),
    }
}

/// Receive the next value unless `cancel` fires first.
pub(crate) async fn recv<T>(cancel: &CancellationToken, rx: &mut mpsc::Receiver<T>) -> Option<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        next = rx.recv() => next,
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::path::{Path, PathBuf};

    use crate::date::Timestamp;
    use crate::error::{NoteoError, Result};
    use crate::note::NoteView;
    use crate::tag::Tag;

    /// In-memory note for stage tests
    #[derive(Debug, Clone, Default)]
    pub struct MockNote {
        pub path: PathBuf,
        pub modified: Option<Timestamp>,
        pub created: Option<Timestamp>,
        pub tags: Vec<String>,
        pub body: String,
        pub broken: bool,
    }

    impl MockNote {
        pub fn named(path: &str) -> Self {
            MockNote {
                path: PathBuf::from(path),
                ..MockNote::default()
            }
        }

        pub fn tagged(path: &str, tags: &[&str]) -> Self {
            MockNote {
                tags: tags.iter().map(|t| t.to_string()).collect(),
                ..MockNote::named(path)
            }
        }
    }

    impl NoteView for MockNote {
        fn path(&self) -> &Path {
            &self.path
        }

        fn modified(&self) -> Result<Timestamp> {
            self.modified
                .ok_or_else(|| NoteoError::Other("no modification time".into()))
        }

        fn created(&self) -> Result<Option<Timestamp>> {
            if self.broken {
                return Err(NoteoError::Other("broken front matter".into()));
            }
            Ok(self.created)
        }

        fn tags(&self) -> Result<Vec<Tag>> {
            if self.broken {
                return Err(NoteoError::Other("broken front matter".into()));
            }
            self.tags.iter().map(|t| Tag::new(t.as_str())).collect()
        }

        fn body(&self) -> Result<String> {
            Ok(self.body.clone())
        }
    }
}
