// src/utils/html_debug.rs
use std::fs;
use std::path::Path;
use crate::extractors::pattern::Pattern;
use crate::utils::error::AppError;

/// Span of the page to highlight: (start, end, label).
pub type Highlight<'a> = (usize, usize, &'a str);

/// Wraps every highlight in a labelled `<span>`. Highlights that overlap an
/// earlier one are skipped.
pub fn annotate_html(html: &str, highlights: &[Highlight]) -> String {
    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");

    // CSS for highlight colors
    debug_html.push_str(".highlight-release { background-color: #FFFF00; }\n");
    debug_html.push_str(".highlight-version { background-color: #90EE90; }\n");
    debug_html.push_str(".highlight-changelog { background-color: #ADD8E6; }\n");
    debug_html.push_str(".highlight-count { background-color: #FFA500; }\n");
    debug_html.push_str(".highlight-custom { background-color: #FFC0CB; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let mut sorted = highlights.to_vec();
    sorted.sort_by_key(|h| h.0);

    let mut last_pos = 0;
    for (start, end, label) in sorted {
        if start < last_pos || end > html.len() || !html.is_char_boundary(start) || !html.is_char_boundary(end) {
            tracing::trace!("Skipping highlight {}..{} ({})", start, end, label);
            continue;
        }

        debug_html.push_str(&html[last_pos..start]);

        let css_class = match label {
            "release" | "version" | "changelog" | "count" => format!("highlight-{}", label),
            _ => "highlight-custom".to_string(),
        };
        debug_html.push_str(&format!(
            "<span class=\"{}\" title=\"Position: {}-{}, Type: {}\">",
            css_class, start, end, label
        ));
        debug_html.push_str(&html[start..end]);
        debug_html.push_str("</span>");

        last_pos = end;
    }
    debug_html.push_str(&html[last_pos..]);

    debug_html.push_str("\n</body>\n</html>");
    debug_html
}

/// Finds every match of each wildcard pattern (and every occurrence of each
/// literal marker) in `html` and saves an annotated copy to `filename`.
pub fn create_debug_html(
    html: &str,
    filename: &Path,
    patterns: &[(&str, &str)],
    markers: &[(&str, &str)],
) -> Result<(), AppError> {
    let mut highlights: Vec<Highlight> = Vec::new();

    for (pattern, label) in patterns {
        let parsed = Pattern::parse(pattern)
            .map_err(|e| AppError::Config(format!("Debug pattern rejected: {}", e)))?;
        highlights.extend(parsed.find_all(html).map(|m| (m.start, m.next, *label)));
    }

    for (marker, label) in markers.iter().filter(|(m, _)| !m.is_empty()) {
        highlights.extend(html.match_indices(*marker).map(|(at, _)| (at, at + marker.len(), *label)));
    }

    fs::write(filename, annotate_html(html, &highlights))?;

    tracing::info!("Saved debug HTML with {} highlights to {}", highlights.len(), filename.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_spans_and_keeps_surrounding_text() {
        let out = annotate_html("ab[cd]ef", &[(2, 6, "version")]);
        assert!(out.contains("ab<span class=\"highlight-version\" title=\"Position: 2-6, Type: version\">[cd]</span>ef"));
    }

    #[test]
    fn overlapping_spans_are_skipped() {
        let out = annotate_html("0123456789", &[(5, 8, "count"), (2, 6, "custom-a")]);
        assert_eq!(out.matches("<span").count(), 1);
        assert!(out.contains(">2345</span>"));
        assert!(out.contains("</span>6789"));
    }

    #[test]
    fn writes_annotated_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("annotated.html");
        let page = "<div class=\"release-header\"><a href=\"/x\">x</a></div>";

        create_debug_html(page, &path, &[("<a href=\"*\"", "asset")], &[("release-header", "release")]).unwrap();

        let saved = fs::read_to_string(&path).unwrap();
        assert!(saved.contains("class=\"highlight-release\""));
        assert!(saved.contains("class=\"highlight-custom\""));
    }

    #[test]
    fn invalid_debug_pattern_is_a_config_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("never.html");
        let result = create_debug_html("text", &path, &[("no wildcard", "x")], &[]);
        assert!(matches!(result, Err(AppError::Config(_))));
        assert!(!path.exists());
    }
}
