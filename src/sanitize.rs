//! Filesystem-safe path and filename sanitizers.

/// Characters replaced with `_` in every path segment and filename.
const UNSAFE_CHARS: &[char] = &['"', '*', ':', '<', '>', '?', '|'];

fn clean_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| if c.is_control() || UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Sanitizes a relative path.
///
/// Empty, `.` and `..` segments are dropped, both separators (`/` and `\`) are
/// collapsed to `/`, and unsafe characters become `_`. The result is always
/// relative and never climbs above its starting point.
#[must_use]
pub fn sanitize_path(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .map(clean_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Sanitizes a single filename component.
///
/// Separators and unsafe characters become `_`. Names that would resolve to
/// the directory itself (`""`, `.`, `..`) are replaced with underscores.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() || UNSAFE_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    match cleaned.as_str() {
        "" => "_".to_string(),
        "." | ".." => "_".repeat(cleaned.len()),
        _ => cleaned,
    }
}
