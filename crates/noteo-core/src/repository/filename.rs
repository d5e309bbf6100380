//! File names for new notes, derived from the first line of their body.

use std::sync::OnceLock;

use regex::Regex;

use crate::note::parse::split_content;

const MAX_NAME_LEN: usize = 30;
const SUFFIX_LEN: usize = 7;

fn not_allowed() -> &'static Regex {
    static NOT_ALLOWED: OnceLock<Regex> = OnceLock::new();
    NOT_ALLOWED.get_or_init(|| Regex::new(r"[^a-zA-Z0-9.\- ]").expect("filename pattern compiles"))
}

/// File stem (without `.md`) for a note with the given content
pub fn generate_name(content: &str) -> String {
    let (_, body) = split_content(content);
    let first_line = body
        .trim_start_matches('\n')
        .split('\n')
        .next()
        .unwrap_or_default();

    let folded = fold_to_ascii(first_line);
    let mut name = not_allowed()
        .replace_all(&folded, "")
        .trim_matches(' ')
        .to_string();

    if name.len() > MAX_NAME_LEN {
        // a capitalized word past the first one is likely a proper title
        if let Some(word) = name
            .split_whitespace()
            .skip(1)
            .find(|word| word.starts_with(|c: char| c.is_uppercase()))
        {
            name = word.to_string();
        }
    }
    name.truncate(MAX_NAME_LEN);

    let name = name.replace(' ', "-").to_lowercase();
    if name.is_empty() {
        "unknown".to_string()
    } else {
        name
    }
}

/// Replace non-ASCII letters with their closest ASCII spelling, keeping case.
fn fold_to_ascii(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            folded.push(c);
            continue;
        }
        let ascii = slug::slugify(c.to_string());
        if c.is_uppercase() {
            folded.push_str(&ascii.to_uppercase());
        } else {
            folded.push_str(&ascii);
        }
    }
    folded
}

/// Random suffix used when the generated name is already taken
pub fn collision_suffix() -> String {
    let id = ulid::Ulid::new().to_string().to_lowercase();
    // the trailing characters are the random part of the ULID
    id[id.len() - SUFFIX_LEN..].to_string()
}
