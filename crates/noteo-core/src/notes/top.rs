use std::time::Instant;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{send, CHANNEL_CAPACITY};
use crate::error::{NoteoError, Result};
use crate::note::{find_tag_by_name, NoteView};
use crate::tag::Tag;
use crate::trace_time;

/// Strict ordering between two notes: `Ok(true)` when the first sorts before
/// the second.
pub type Less = Box<dyn Fn(&dyn NoteView, &dyn NoteView) -> Result<bool> + Send + Sync>;

/// Collect the whole stream, sort it with `less` and emit at most `limit` notes.
///
/// A failing comparison counts as "not less" and is reported once sorting is
/// done. Cancellation while collecting discards everything.
pub fn top<N>(
    cancel: CancellationToken,
    limit: usize,
    mut notes: mpsc::Receiver<N>,
    less: Less,
) -> (mpsc::Receiver<N>, mpsc::Receiver<NoteoError>)
where
    N: NoteView + 'static,
{
    let (note_tx, note_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (err_tx, err_rx) = mpsc::channel(CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut collected = Vec::new();
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                next = notes.recv() => match next {
                    Some(note) => collected.push(note),
                    None => break,
                },
            }
        }

        let start = Instant::now();
        let count = collected.len();
        let mut errors = Vec::new();
        let sorted = merge_sort(collected, &mut |first: &N, second: &N| {
            match less(first as &dyn NoteView, second as &dyn NoteView) {
                Ok(is_less) => is_less,
                Err(err) => {
                    errors.push(NoteoError::Compare {
                        first: first.path().to_path_buf(),
                        second: second.path().to_path_buf(),
                        source: Box::new(err),
                    });
                    false
                }
            }
        });
        trace_time!(start, "sort_notes", notes = count);

        for err in errors {
            if !send(&cancel, &err_tx, err).await && cancel.is_cancelled() {
                return;
            }
        }
        for note in sorted.into_iter().take(limit) {
            if !send(&cancel, &note_tx, note).await {
                return;
            }
        }
    });

    (note_rx, err_rx)
}

/// Stable merge sort driven by a strict "less" predicate.
///
/// Unlike `slice::sort_by` it tolerates inconsistent answers, which happen when
/// some comparisons fail.
fn merge_sort<T>(mut items: Vec<T>, less: &mut dyn FnMut(&T, &T) -> bool) -> Vec<T> {
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, less);
    let right = merge_sort(right, less);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => less(r, l),
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    merged
}

pub fn modified_asc() -> Less {
    Box::new(|first: &dyn NoteView, second: &dyn NoteView| {
        Ok(first.modified()? < second.modified()?)
    })
}

pub fn modified_desc() -> Less {
    Box::new(|first: &dyn NoteView, second: &dyn NoteView| {
        Ok(first.modified()? > second.modified()?)
    })
}

/// Notes without a creation date come first
pub fn created_asc() -> Less {
    Box::new(|first: &dyn NoteView, second: &dyn NoteView| {
        Ok(first.created()? < second.created()?)
    })
}

pub fn created_desc() -> Less {
    Box::new(|first: &dyn NoteView, second: &dyn NoteView| {
        Ok(first.created()? > second.created()?)
    })
}

pub fn tag_date_asc(name: &str) -> Less {
    by_tag(name, |first, second| {
        Ok(first.absolute_date()? < second.absolute_date()?)
    })
}

pub fn tag_date_desc(name: &str) -> Less {
    by_tag(name, |first, second| {
        Ok(first.absolute_date()? > second.absolute_date()?)
    })
}

pub fn tag_number_asc(name: &str) -> Less {
    by_tag(name, |first, second| Ok(first.number()? < second.number()?))
}

pub fn tag_number_desc(name: &str) -> Less {
    by_tag(name, |first, second| Ok(first.number()? > second.number()?))
}

/// Compare notes on the value of the named tag. Notes lacking the tag sort
/// last in either direction.
fn by_tag(name: &str, compare: fn(&Tag, &Tag) -> Result<bool>) -> Less {
    let name = name.to_string();
    Box::new(move |first: &dyn NoteView, second: &dyn NoteView| {
        let Some(first) = find_tag_by_name(first, &name)? else {
            return Ok(false);
        };
        let Some(second) = find_tag_by_name(second, &name)? else {
            return Ok(true);
        };
        compare(&first, &second)
    })
}
