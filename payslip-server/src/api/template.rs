//! Page shell helpers
//!
//! The pages are static HTML shells with `{{name}}` slots; no templating
//! engine is involved. Values are HTML-escaped before substitution because
//! some of them (the flash message, profile names) originate outside this
//! process.

/// Replace each `{{key}}` slot with its value
pub fn fill(shell: &str, slots: &[(&str, &str)]) -> String {
    let mut page = shell.to_string();
    for (key, value) in slots {
        page = page.replace(&format!("{{{{{}}}}}", key), value);
    }
    page
}

/// Minimal HTML escaping for text dropped into a page shell
pub fn html_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
