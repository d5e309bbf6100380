use regex::Regex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{recv, send, CHANNEL_CAPACITY};
use crate::date::{self, Timestamp};
use crate::error::{NoteoError, Result};
use crate::note::{find_tag_by_name, NoteView};
use crate::tag::Tag;

/// Note classifier. An error drops the note and is reported with its path.
pub type Predicate = Box<dyn Fn(&dyn NoteView) -> Result<bool> + Send + Sync>;

/// Forward only the notes every predicate accepts, keeping their order.
///
/// Predicates run in the given order; the first `false` or error decides.
pub fn filter<N>(
    cancel: CancellationToken,
    mut notes: mpsc::Receiver<N>,
    predicates: Vec<Predicate>,
) -> (mpsc::Receiver<N>, mpsc::Receiver<NoteoError>)
where
    N: NoteView + 'static,
{
    let (note_tx, note_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (err_tx, err_rx) = mpsc::channel(CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut forwarded = 0usize;
        while let Some(note) = recv(&cancel, &mut notes).await {
            match matches_all(&predicates, &note) {
                Ok(true) => {
                    if !send(&cancel, &note_tx, note).await {
                        break;
                    }
                    forwarded += 1;
                }
                Ok(false) => {}
                Err(err) => {
                    let err = err.on_note(note.path());
                    if !send(&cancel, &err_tx, err).await && cancel.is_cancelled() {
                        break;
                    }
                }
            }
        }
        tracing::debug!(forwarded, "filter stage finished");
    });

    (note_rx, err_rx)
}

fn matches_all(predicates: &[Predicate], note: &dyn NoteView) -> Result<bool> {
    for predicate in predicates {
        if !predicate(note)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Note carries exactly this tag
pub fn tag(expected: Tag) -> Predicate {
    Box::new(move |note: &dyn NoteView| Ok(note.tags()?.contains(&expected)))
}

/// Note does not carry this tag
pub fn no_tag(unexpected: Tag) -> Predicate {
    Box::new(move |note: &dyn NoteView| Ok(!note.tags()?.contains(&unexpected)))
}

/// Some tag of the note matches the regular expression
pub fn tag_grep(pattern: &str) -> Result<Predicate> {
    let regex = compile(pattern)?;
    Ok(Box::new(move |note: &dyn NoteView| {
        Ok(note.tags()?.iter().any(|t| regex.is_match(t.as_str())))
    }))
}

/// Numeric value of the named tag is greater, e.g. `priority:1`
pub fn tag_greater(name_value: &str) -> Result<Predicate> {
    tag_number(name_value, |found, expected| found > expected)
}

/// Numeric value of the named tag is lower, e.g. `priority:3`
pub fn tag_lower(name_value: &str) -> Result<Predicate> {
    tag_number(name_value, |found, expected| found < expected)
}

fn tag_number(name_value: &str, compare: fn(i64, i64) -> bool) -> Result<Predicate> {
    let spec = Tag::new(name_value)?;
    let expected = spec.number()?;
    let name = spec.name().to_string();
    Ok(Box::new(move |note: &dyn NoteView| match find_tag_by_name(note, &name)? {
        Some(found) => Ok(compare(found.number()?, expected)),
        None => Ok(false),
    }))
}

/// Date stored in the named tag is after the given date, e.g. `deadline:today`
pub fn tag_after(name_value: &str) -> Result<Predicate> {
    tag_date(name_value, |found, expected| found > expected)
}

/// Date stored in the named tag is before the given date
pub fn tag_before(name_value: &str) -> Result<Predicate> {
    tag_date(name_value, |found, expected| found < expected)
}

fn tag_date(name_value: &str, compare: fn(Timestamp, Timestamp) -> bool) -> Result<Predicate> {
    // The value may be a relative date with spaces ("3 days ago"), so only the
    // name has to be a valid tag.
    let (name, value) = name_value.split_once(':').ok_or_else(|| NoteoError::NoValue {
        tag: name_value.to_string(),
    })?;
    let name = Tag::new(name)?.name().to_string();
    let expected = date::parse_relative(value)?;
    Ok(Box::new(move |note: &dyn NoteView| match find_tag_by_name(note, &name)? {
        Some(found) => Ok(compare(found.absolute_date()?, expected)),
        None => Ok(false),
    }))
}

/// Note has no tags at all
pub fn no_tags() -> Predicate {
    Box::new(|note: &dyn NoteView| Ok(note.tags()?.is_empty()))
}

pub fn modified_after(when: &str) -> Result<Predicate> {
    let when = date::parse_relative(when)?;
    Ok(Box::new(move |note: &dyn NoteView| Ok(note.modified()? > when)))
}

pub fn modified_before(when: &str) -> Result<Predicate> {
    let when = date::parse_relative(when)?;
    Ok(Box::new(move |note: &dyn NoteView| Ok(note.modified()? < when)))
}

/// Notes without a creation date are never created after anything
pub fn created_after(when: &str) -> Result<Predicate> {
    let when = date::parse_relative(when)?;
    Ok(Box::new(move |note: &dyn NoteView| Ok(note.created()? > Some(when))))
}

/// Notes without a creation date count as created before everything
pub fn created_before(when: &str) -> Result<Predicate> {
    let when = date::parse_relative(when)?;
    Ok(Box::new(move |note: &dyn NoteView| Ok(note.created()? < Some(when))))
}

/// Body matches the regular expression
pub fn grep(pattern: &str) -> Result<Predicate> {
    let regex = compile(pattern)?;
    Ok(Box::new(move |note: &dyn NoteView| Ok(regex.is_match(&note.body()?))))
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| NoteoError::invalid_regex(pattern, e))
}
