//! Tags are `name` or `name:value` tokens stored in the `Tags` front matter key.
//!
//! Only the first colon separates the name from the value, so values may contain
//! further colons (e.g. `deadline:2020-09-10T16:30:11+02:00`).

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::date::{self, Timestamp};
use crate::error::{NoteoError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    /// Validate a candidate tag. The text is taken as-is: whitespace anywhere,
    /// an empty string or an empty name is rejected.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.is_empty() || text.chars().any(char::is_whitespace) || text.starts_with(':') {
            return Err(NoteoError::InvalidTag(text));
        }
        Ok(Tag(text))
    }

    pub fn name(&self) -> &str {
        match self.0.split_once(':') {
            Some((name, _)) => name,
            None => &self.0,
        }
    }

    pub fn value(&self) -> Result<&str> {
        self.0
            .split_once(':')
            .map(|(_, value)| value)
            .ok_or_else(|| NoteoError::NoValue {
                tag: self.0.clone(),
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn number(&self) -> Result<i64> {
        let value = self.value()?;
        value
            .parse::<i64>()
            .map_err(|e| NoteoError::parse(value, e))
    }

    pub fn absolute_date(&self) -> Result<Timestamp> {
        date::parse_absolute(self.value()?)
    }

    pub fn relative_date(&self) -> Result<Timestamp> {
        date::parse_relative(self.value()?)
    }

    pub fn relative_date_at(&self, now: Timestamp) -> Result<Timestamp> {
        date::parse_relative_at(self.value()?, now)
    }

    /// Resolve a relative date value and render it as an absolute date.
    pub fn make_date_absolute(&self) -> Result<Tag> {
        self.make_date_absolute_at(date::now())
    }

    pub fn make_date_absolute_at(&self, now: Timestamp) -> Result<Tag> {
        let resolved = self.relative_date_at(now)?;
        Ok(Tag(format!(
            "{}:{}",
            self.name(),
            date::format_absolute(resolved)
        )))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Tag {
    type Err = NoteoError;

    fn from_str(s: &str) -> Result<Self> {
        Tag::new(s)
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Find the first tag with the given name.
pub fn find_by_name<'a>(tags: &'a [Tag], name: &str) -> Option<&'a Tag> {
    tags.iter().find(|t| t.name() == name)
}
