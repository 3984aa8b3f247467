/// Which part of a destination path a tag value ends up in.
///
/// Directory segments (artist, album) are trimmed because some filesystems
/// silently strip trailing spaces and dots from directory names, and a later
/// existence check would then miss the directory. A file stem is kept as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Directory,
    FileStem,
}

/// Characters that are never allowed to reach a path segment.
pub const RESERVED: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Map one character to its replacement, or `None` to drop it.
fn substitute(c: char) -> Option<char> {
    match c {
        '\\' | '/' | ':' | '<' | '>' | '|' => Some('-'),
        '*' | '?' => None,
        '"' => Some('\''),
        c if c.is_control() => None,
        c => Some(c),
    }
}

/// Turn a raw tag value into something safe to use as a single path segment.
///
/// Absent input stays absent and `""` stays `""`, so callers can still tell
/// "no album" apart from an album that was cleaned down to nothing. Never
/// fails: every input maps to exactly one output.
pub fn sanitize_segment(raw: Option<&str>, kind: SegmentKind) -> Option<String> {
    let raw = raw?;
    if raw.is_empty() {
        return Some(String::new());
    }

    let cleaned: String = raw.chars().filter_map(substitute).collect();

    Some(match kind {
        SegmentKind::FileStem => cleaned,
        // Trailing dots are dropped like trailing spaces; this also empties
        // "." and "..", which would resolve outside the destination root
        SegmentKind::Directory => cleaned
            .trim_start()
            .trim_end_matches(|c: char| c == '.' || c.is_whitespace())
            .to_string(),
    })
}
