use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{NoteoError, Result};
use crate::paths::{normalize, relative_to, to_slash};

fn link_regex() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| {
        Regex::new(r"(\[[^\]\[]+\])\(([^()]+)\)").expect("markdown link pattern compiles")
    })
}

fn scheme_regex() -> &'static Regex {
    static SCHEME: OnceLock<Regex> = OnceLock::new();
    SCHEME.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("url scheme pattern compiles")
    })
}

/// Rewrite markdown links in `body` that point at `from` (or below it) so they
/// point at `to`.
///
/// `note` names the note in errors. `location` is where the note lives; link
/// targets are resolved against its directory, and `from` and `to` must be
/// expressed the same way as `location` (all absolute, or all relative to one
/// directory). Returns `None` when no link changed.
pub(crate) fn rewrite_links(
    note: &Path,
    location: &Path,
    body: &str,
    from: &Path,
    to: &Path,
) -> Result<Option<String>> {
    let location = normalize(location);
    let note_dir = location.parent().unwrap_or_else(|| Path::new(""));
    let from = normalize(from);
    let to = normalize(to);

    let mut rewritten = String::with_capacity(body.len());
    let mut last = 0;
    let mut changed = false;

    for captures in link_regex().captures_iter(body) {
        let (Some(whole), Some(text), Some(target)) = (captures.get(0), captures.get(1), captures.get(2))
        else {
            continue;
        };
        let Some(new_target) = rewrite_target(note, note_dir, target.as_str(), &from, &to)? else {
            continue;
        };
        rewritten.push_str(&body[last..whole.start()]);
        rewritten.push_str(text.as_str());
        rewritten.push('(');
        rewritten.push_str(&new_target);
        rewritten.push(')');
        last = whole.end();
        changed = true;
    }

    if !changed {
        return Ok(None);
    }
    rewritten.push_str(&body[last..]);
    Ok(Some(rewritten))
}

fn rewrite_target(
    note: &Path,
    note_dir: &Path,
    target: &str,
    from: &Path,
    to: &Path,
) -> Result<Option<String>> {
    if scheme_regex().is_match(target) {
        return Ok(None);
    }
    let (link_path, fragment) = match target.find('#') {
        Some(index) => target.split_at(index),
        None => (target, ""),
    };
    if link_path.is_empty() {
        return Ok(None);
    }

    let resolved = normalize(&note_dir.join(link_path));
    let moved: PathBuf = if resolved == from {
        to.to_path_buf()
    } else {
        match resolved.strip_prefix(from) {
            Ok(suffix) if !suffix.as_os_str().is_empty() => to.join(suffix),
            _ => return Ok(None),
        }
    };

    let relative = relative_to(note_dir, &moved).ok_or_else(|| NoteoError::LinkResolution {
        path: note.to_path_buf(),
        link: target.to_string(),
        reason: format!(
            "{} cannot be made relative to {}",
            moved.display(),
            normalize(note_dir).display()
        ),
    })?;
    Ok(Some(format!("{}{fragment}", to_slash(&relative))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(note: &str, body: &str, from: &str, to: &str) -> Option<String> {
        rewrite_links(Path::new(note), Path::new(note), body, Path::new(from), Path::new(to)).unwrap()
    }

    #[test]
    fn test_rewrites_file_link() {
        assert_eq!(
            rewrite("note.md", "[x](source.md)", "source.md", "target.md"),
            Some("[x](target.md)".to_string())
        );
    }

    #[test]
    fn test_other_links_untouched() {
        assert_eq!(rewrite("note.md", "[x](other.md)", "source.md", "target.md"), None);
        assert_eq!(rewrite("note.md", "no links here", "source.md", "target.md"), None);
    }

    #[test]
    fn test_rewrites_directory_link() {
        assert_eq!(
            rewrite("note.md", "[x](source/file.md)", "source", "target"),
            Some("[x](target/file.md)".to_string())
        );
    }

    #[test]
    fn test_directory_prefix_must_be_whole_component() {
        assert_eq!(rewrite("note.md", "[x](sourcery/file.md)", "source", "target"), None);
    }

    #[test]
    fn test_link_relative_to_note_directory() {
        assert_eq!(
            rewrite("sub/note.md", "see [x](../source.md) and [y](./other.md)", "source.md", "dir/target.md"),
            Some("see [x](../dir/target.md) and [y](./other.md)".to_string())
        );
        assert_eq!(
            rewrite("sub/note.md", "[x](source.md)", "sub/source.md", "target.md"),
            Some("[x](../target.md)".to_string())
        );
    }

    #[test]
    fn test_multiple_links_and_surrounding_text() {
        let body = "a [one](source.md) b [two](source.md#top) c [three](keep.md)\n";
        assert_eq!(
            rewrite("note.md", body, "source.md", "target.md"),
            Some("a [one](target.md) b [two](target.md#top) c [three](keep.md)\n".to_string())
        );
    }

    #[test]
    fn test_absolute_locations_outside_the_working_directory() {
        // a note above the working directory, linking down into it
        let rewritten = rewrite_links(
            Path::new("../top.md"),
            Path::new("/repo/top.md"),
            "[x](work/source.md) [y](work/other.md)",
            Path::new("/repo/work/source.md"),
            Path::new("/repo/work/target.md"),
        )
        .unwrap();
        assert_eq!(rewritten, Some("[x](work/target.md) [y](work/other.md)".to_string()));

        let rewritten = rewrite_links(
            Path::new("../top.md"),
            Path::new("/repo/top.md"),
            "[x](a.md)",
            Path::new("/repo/a.md"),
            Path::new("/repo/work/b.md"),
        )
        .unwrap();
        assert_eq!(rewritten, Some("[x](work/b.md)".to_string()));
    }

    #[test]
    fn test_urls_are_skipped() {
        let body = "[web](https://example.com/source.md) [mail](mailto:source.md) [anchor](#source)";
        assert_eq!(rewrite("note.md", body, "source.md", "target.md"), None);
    }

    #[test]
    fn test_unresolvable_link_is_an_error() {
        let err = rewrite_links(
            Path::new("../outside/note.md"),
            Path::new("../outside/note.md"),
            "[x](source.md)",
            Path::new("../outside/source.md"),
            Path::new("target.md"),
        )
        .unwrap_err();
        assert!(matches!(err, NoteoError::LinkResolution { ref link, .. } if link == "source.md"));
    }
}
