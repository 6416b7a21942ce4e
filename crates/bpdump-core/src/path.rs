//! Content path helpers.
//!
//! Paths look like `/Game/Prototype/Player`. Both separators are accepted on
//! input; output always uses `/`.

/// The canonical separator.
pub const SEPARATOR: char = '/';

/// Trims whitespace, converts `\` to `/` and strips trailing separators.
///
/// `normalize(normalize(p)) == normalize(p)` for every `p`.
pub fn normalize(path: &str) -> String {
    let unified = path.trim().replace('\\', "/");
    unified.trim_end_matches(SEPARATOR).to_string()
}

/// Splits a path into its non-empty segments.
///
/// `"/Game/A/B"` becomes `["Game", "A", "B"]`.
pub fn split(path: &str) -> Vec<String> {
    normalize(path)
        .split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins the first `count` segments behind a single leading separator.
///
/// `count` is clamped to the number of segments; zero segments or a zero
/// count give an empty string.
pub fn join<S: AsRef<str>>(segments: &[S], count: usize) -> String {
    let count = count.min(segments.len());
    if count == 0 {
        return String::new();
    }

    let mut out = String::new();
    for segment in &segments[..count] {
        out.push(SEPARATOR);
        out.push_str(segment.as_ref());
    }
    out
}

/// Finds the deepest folder shared by every path.
///
/// Returns `None` when `paths` is empty, when any path has no segments, or
/// when the paths share no leading segment.
pub fn longest_common_prefix<S: AsRef<str>>(paths: &[S]) -> Option<String> {
    let all_segments: Vec<Vec<String>> = paths.iter().map(|p| split(p.as_ref())).collect();
    let first = all_segments.first()?;
    if all_segments.iter().any(Vec::is_empty) {
        return None;
    }

    let min_len = all_segments.iter().map(Vec::len).min().unwrap_or(0);
    let common_len = (0..min_len)
        .take_while(|&i| all_segments.iter().all(|segs| segs[i] == first[i]))
        .count();

    if common_len == 0 {
        return None;
    }

    let prefix = normalize(&join(first, common_len));
    (!prefix.is_empty()).then_some(prefix)
}
