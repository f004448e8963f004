// src/core/sanitize.rs

/// Decode the handful of entities the circular pages actually use.
pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Trim and drop trailing sentence punctuation left over from label-anchored captures.
pub fn tidy_field(s: &str) -> Option<String> {
    let t = normalize_ws(s);
    let t = t.trim_end_matches(['.', ',', ';']).trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}
