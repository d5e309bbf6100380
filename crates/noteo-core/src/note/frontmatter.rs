use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde_yaml::{Mapping, Value};

use super::parse::strip_fences;
use crate::date::{self, Timestamp};
use crate::error::{NoteoError, Result};
use crate::tag::Tag;

const TAGS_KEY: &str = "Tags";
const CREATED_KEY: &str = "Created";

/// Parsed front matter of a note.
///
/// The YAML mapping keeps its key order so that unknown keys survive a
/// rewrite untouched. Keys are looked up case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct FrontMatter {
    mapping: Mapping,
    tags: Vec<Tag>,
    created: Option<Timestamp>,
    had_tags: bool,
}

impl FrontMatter {
    /// Parse a fenced front matter block. An empty block yields an empty mapping.
    pub fn parse(path: &Path, block: &str) -> Result<Self> {
        let yaml = strip_fences(block);
        let invalid = |reason: String| NoteoError::InvalidFrontMatter {
            path: path.to_path_buf(),
            reason,
        };

        let mapping = if yaml.trim().is_empty() {
            Mapping::new()
        } else {
            match serde_yaml::from_str::<Value>(yaml).map_err(|e| invalid(e.to_string()))? {
                Value::Null => Mapping::new(),
                Value::Mapping(mapping) => mapping,
                _ => return Err(invalid("front matter is not a mapping".to_string())),
            }
        };

        let had_tags = find_key(&mapping, TAGS_KEY).is_some();
        let tags = match lookup(&mapping, TAGS_KEY) {
            Some(value) => parse_tags(path, value)?,
            None => Vec::new(),
        };

        let created = match lookup(&mapping, CREATED_KEY) {
            None | Some(Value::Null) => None,
            Some(value) => {
                let text =
                    scalar_text(value).ok_or_else(|| invalid("Created is not a date".into()))?;
                let created = date::parse_absolute(&text)
                    .map_err(|e| invalid(format!("Created parse failed: {e}")))?;
                Some(created)
            }
        };

        Ok(FrontMatter {
            mapping,
            tags,
            created,
            had_tags,
        })
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn created(&self) -> Option<Timestamp> {
        self.created
    }

    /// Raw value of an arbitrary key
    pub fn get(&self, name: &str) -> Option<&Value> {
        lookup(&self.mapping, name)
    }

    /// Replace the tag with the same name in place, or append it.
    ///
    /// Date values are stored in their absolute form.
    pub fn set_tag(&mut self, tag: Tag) {
        self.set_tag_at(tag, date::now());
    }

    pub(crate) fn set_tag_at(&mut self, tag: Tag, now: Timestamp) {
        let tag = tag.make_date_absolute_at(now).unwrap_or(tag);
        match self.tags.iter_mut().find(|t| t.name() == tag.name()) {
            Some(existing) => *existing = tag,
            None => self.tags.push(tag),
        }
    }

    /// Remove the first tag equal to `tag`, if any.
    pub fn remove_tag(&mut self, tag: &Tag) {
        if let Some(index) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(index);
        }
    }

    /// Remove the first tag matching `regex`, if any.
    pub fn remove_tag_regex(&mut self, regex: &Regex) {
        if let Some(index) = self.tags.iter().position(|t| regex.is_match(t.as_str())) {
            self.tags.remove(index);
        }
    }

    /// Serialize back to a fenced block, or an empty string when there is nothing
    /// to write.
    pub fn marshal(&self) -> Result<String> {
        let mut mapping = self.mapping.clone();
        let joined = self
            .tags
            .iter()
            .map(Tag::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        if !joined.is_empty() || self.had_tags {
            set(&mut mapping, TAGS_KEY, Value::String(joined));
        }
        if mapping.is_empty() {
            return Ok(String::new());
        }
        let yaml = serde_yaml::to_string(&mapping)?;
        Ok(format!("---\n{yaml}---\n"))
    }
}

fn tag_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[,\s]+").expect("separator pattern compiles"))
}

fn parse_tags(path: &Path, value: &Value) -> Result<Vec<Tag>> {
    let tokens: Vec<String> = match value {
        Value::Null => Vec::new(),
        Value::String(text) => tag_separator()
            .split(text)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Sequence(items) => items.iter().filter_map(scalar_text).collect(),
        Value::Tagged(tagged) => return parse_tags(path, &tagged.value),
        Value::Mapping(_) => {
            return Err(NoteoError::InvalidFrontMatter {
                path: path.to_path_buf(),
                reason: "Tags must be a string or a list".to_string(),
            });
        }
        scalar => scalar_text(scalar).into_iter().collect(),
    };
    tokens.iter().map(|token| Tag::new(token.trim())).collect()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn key_matches(key: &Value, name: &str) -> bool {
    scalar_text(key).is_some_and(|text| text.to_lowercase() == name.to_lowercase())
}

fn find_key(mapping: &Mapping, name: &str) -> Option<Value> {
    mapping.keys().find(|key| key_matches(key, name)).cloned()
}

fn lookup<'a>(mapping: &'a Mapping, name: &str) -> Option<&'a Value> {
    mapping
        .iter()
        .find(|(key, _)| key_matches(key, name))
        .map(|(_, value)| value)
}

/// Set a key, keeping the position and spelling of an existing key.
fn set(mapping: &mut Mapping, name: &str, value: Value) {
    match find_key(mapping, name) {
        Some(key) => {
            if let Some(slot) = mapping.get_mut(&key) {
                *slot = value;
            }
        }
        None => {
            mapping.insert(Value::String(name.to_string()), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn parse(block: &str) -> FrontMatter {
        FrontMatter::parse(Path::new("note.md"), block).unwrap()
    }

    fn tag_strings(front_matter: &FrontMatter) -> Vec<&str> {
        front_matter.tags().iter().map(Tag::as_str).collect()
    }

    #[test]
    fn test_empty_block() {
        let front_matter = parse("");
        assert!(front_matter.tags().is_empty());
        assert!(front_matter.created().is_none());
        assert_eq!(front_matter.marshal().unwrap(), "");
    }

    #[test]
    fn test_tags_from_string() {
        assert_eq!(
            tag_strings(&parse("---\nTags: foo bar\n---\n")),
            vec!["foo", "bar"]
        );
        assert_eq!(
            tag_strings(&parse("---\ntags: foo,bar, baz\n---\n")),
            vec!["foo", "bar", "baz"]
        );
        assert_eq!(
            tag_strings(&parse("---\nTags: foo,\n---\n")),
            vec!["foo"]
        );
    }

    #[test]
    fn test_tags_from_list() {
        assert_eq!(
            tag_strings(&parse("---\nTags:\n  - foo\n  - priority:2\n  - 3\n---\n")),
            vec!["foo", "priority:2", "3"]
        );
    }

    #[test]
    fn test_empty_tags_key() {
        let front_matter = parse("---\nTags:\n---\n");
        assert!(front_matter.tags().is_empty());
        assert_eq!(front_matter.marshal().unwrap(), "---\nTags: ''\n---\n");
    }

    #[test]
    fn test_invalid_tag_in_list() {
        let err = FrontMatter::parse(Path::new("a.md"), "---\nTags:\n  - foo bar\n---\n")
            .unwrap_err();
        assert!(matches!(err, NoteoError::InvalidTag(ref t) if t == "foo bar"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = FrontMatter::parse(Path::new("a.md"), "---\nTags: [foo\n---\n").unwrap_err();
        assert!(matches!(err, NoteoError::InvalidFrontMatter { ref path, .. } if path == Path::new("a.md")));
    }

    #[test]
    fn test_not_a_mapping() {
        let err = FrontMatter::parse(Path::new("a.md"), "---\n- a\n- b\n---\n").unwrap_err();
        assert!(matches!(err, NoteoError::InvalidFrontMatter { .. }));
    }

    #[test]
    fn test_created() {
        let front_matter = parse("---\nCreated: 2020-10-15T16:30:10+02:00\n---\n");
        assert_eq!(
            front_matter.created().unwrap().to_rfc3339(),
            "2020-10-15T16:30:10+02:00"
        );
        let err = FrontMatter::parse(Path::new("a.md"), "---\nCreated: someday\n---\n")
            .unwrap_err();
        assert!(err.to_string().contains("Created parse failed"));
    }

    #[test]
    fn test_case_insensitive_keys() {
        let front_matter = parse("---\nTITLE: hello\nTAGS: foo\n---\n");
        assert_eq!(tag_strings(&front_matter), vec!["foo"]);
        assert_eq!(
            front_matter.get("title"),
            Some(&Value::String("hello".into()))
        );
    }

    #[test]
    fn test_set_tag_appends_and_replaces() {
        let mut front_matter = parse("---\nTags: foo priority:1 bar\n---\n");
        front_matter.set_tag(Tag::new("priority:2").unwrap());
        front_matter.set_tag(Tag::new("baz").unwrap());
        assert_eq!(
            tag_strings(&front_matter),
            vec!["foo", "priority:2", "bar", "baz"]
        );
    }

    #[test]
    fn test_set_tag_makes_dates_absolute() {
        let now = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2020, 9, 10, 16, 30, 11)
            .unwrap();
        let mut front_matter = parse("");
        front_matter.set_tag_at(Tag::new("deadline:now").unwrap(), now);
        front_matter.set_tag_at(Tag::new("start:today").unwrap(), now);
        assert_eq!(
            tag_strings(&front_matter),
            vec!["deadline:2020-09-10T16:30:11+02:00", "start:2020-09-10"]
        );
    }

    #[test]
    fn test_remove_tag() {
        let mut front_matter = parse("---\nTags: foo bar foo\n---\n");
        front_matter.remove_tag(&Tag::new("foo").unwrap());
        assert_eq!(tag_strings(&front_matter), vec!["bar", "foo"]);
        front_matter.remove_tag(&Tag::new("missing").unwrap());
        assert_eq!(tag_strings(&front_matter), vec!["bar", "foo"]);
    }

    #[test]
    fn test_remove_tag_regex() {
        let mut front_matter = parse("---\nTags: foo priority:1 priority:2\n---\n");
        front_matter.remove_tag_regex(&Regex::new("^priority").unwrap());
        assert_eq!(tag_strings(&front_matter), vec!["foo", "priority:2"]);
    }

    #[test]
    fn test_marshal_round_trip() {
        let block = "---\nTitle: Hello\nTags: foo bar\nOrder: 3\n---\n";
        assert_eq!(parse(block).marshal().unwrap(), block);
    }

    #[test]
    fn test_marshal_keeps_tags_position() {
        let mut front_matter = parse("---\nTitle: Hello\nTags: foo\nOrder: 3\n---\n");
        front_matter.set_tag(Tag::new("bar").unwrap());
        assert_eq!(
            front_matter.marshal().unwrap(),
            "---\nTitle: Hello\nTags: foo bar\nOrder: 3\n---\n"
        );
    }

    #[test]
    fn test_marshal_list_becomes_string() {
        let front_matter = parse("---\nTags:\n- foo\n- bar\n---\n");
        assert_eq!(front_matter.marshal().unwrap(), "---\nTags: foo bar\n---\n");
    }

    #[test]
    fn test_marshal_does_not_introduce_tags() {
        let front_matter = parse("---\nTitle: Hello\n---\n");
        assert_eq!(front_matter.marshal().unwrap(), "---\nTitle: Hello\n---\n");
    }

    #[test]
    fn test_marshal_appends_new_tags() {
        let mut front_matter = parse("---\nTitle: Hello\n---\n");
        front_matter.set_tag(Tag::new("foo").unwrap());
        assert_eq!(
            front_matter.marshal().unwrap(),
            "---\nTitle: Hello\nTags: foo\n---\n"
        );
    }
}
