// src/core/html.rs
// Markup → plain text for the circular pages.
// The interesting content sits in a <pre> block, so line structure is kept.

use super::sanitize::normalize_entities;

/// Remove all `<...>` tags, decode entities and keep line breaks.
/// `<br>` and `<p>` become newlines; `\r` is dropped.
pub fn to_text(doc: &str) -> String {
    let mut out = String::with_capacity(doc.len());
    let mut tag = String::new();
    let mut in_tag = false;

    for ch in doc.chars() {
        match ch {
            '<' if !in_tag => { in_tag = true; tag.clear(); }
            '>' if in_tag => {
                in_tag = false;
                if breaks_line(&tag) { out.push('\n'); }
            }
            '\r' => {}
            _ if in_tag => tag.push(ch),
            _ => out.push(ch),
        }
    }
    normalize_entities(&out)
}

fn breaks_line(tag: &str) -> bool {
    let name: String = tag
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    matches!(name.as_str(), "br" | "p" | "li" | "tr" | "div")
}
