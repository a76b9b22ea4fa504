const INVISIBLE: [char; 2] = ['\u{feff}', '\u{200b}'];

/// Collapses whitespace and strips invisible characters from display text.
pub(crate) fn clean_display(value: &str) -> Option<String> {
    let cleaned = value.replace(INVISIBLE, "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Lower-cased, whitespace-collapsed tag in the catalog's namespace form.
pub(crate) fn normalize_tag(value: &str) -> Option<String> {
    clean_display(value).map(|tag| tag.to_ascii_lowercase())
}

pub(crate) fn split_list(value: &str, separator: char) -> Vec<String> {
    value.split(separator).filter_map(clean_display).collect()
}

pub(crate) fn display_or(value: Option<&str>, fallback: &str) -> String {
    value
        .and_then(clean_display)
        .unwrap_or_else(|| fallback.to_string())
}
