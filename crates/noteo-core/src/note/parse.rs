/// Split note content into its front matter block and body.
///
/// The front matter is everything from a first line starting with `---` up to
/// and including the next line starting with `---`, fences and line endings
/// included. When the block is never closed the whole content is body.
pub(crate) fn split_content(content: &str) -> (&str, &str) {
    let mut lines = content.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return ("", content);
    };
    if !first.starts_with("---") {
        return ("", content);
    }

    let mut end = first.len();
    for line in lines {
        end += line.len();
        if line.starts_with("---") {
            return content.split_at(end);
        }
    }
    ("", content)
}

/// Strip the fence lines from a front matter block, leaving the YAML mapping.
pub(crate) fn strip_fences(front_matter: &str) -> &str {
    let Some((_, rest)) = front_matter.split_once('\n') else {
        return "";
    };
    // The closing fence is the last line
    let closing = rest.trim_end_matches('\n').rfind('\n').map_or(0, |i| i + 1);
    &rest[..closing]
}
