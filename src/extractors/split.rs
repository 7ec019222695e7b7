// src/extractors/split.rs

/// Cuts `text` on every literal occurrence of `delimiter`.
///
/// Empty pieces (leading, trailing or between consecutive delimiters) are
/// dropped, so joining the result back with `delimiter` does not always
/// reproduce `text`. An empty delimiter yields the whole text as one piece.
pub fn split<'t>(text: &'t str, delimiter: &str) -> Vec<&'t str> {
    if delimiter.is_empty() {
        return if text.is_empty() { Vec::new() } else { vec![text] };
    }

    text.split(delimiter)
        .filter(|segment| !segment.is_empty())
        .collect()
}
