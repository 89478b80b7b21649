// src/core/sanitize.rs

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

/// Site text quirks, fixed before any pattern matching:
/// - en/em dashes become ASCII `-`
/// - `2-1/2` style halves become `2.5`
/// - the `Xp` typo becomes `XP`
/// - non-breaking spaces become plain spaces
pub fn normalize_stat_text(s: &str) -> String {
    s.replace(['\u{2013}', '\u{2014}', '\u{2212}'], "-")
        .replace('\u{a0}', " ")
        .replace("-1/2", ".5")
        .replace("Xp", "XP")
}

/// Links are compared without their trailing slash.
pub fn normalize_link(s: &str) -> String {
    s.trim().trim_end_matches('/').to_string()
}

/// Third-party (non-Paizo) content markers used across the site.
pub fn is_third_party(s: &str) -> bool {
    let lc = s.to_ascii_lowercase();
    lc.contains("3pp") || lc.contains("tohc")
}

/// "monstrous humanoid" → "Monstrous humanoid"
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => s!(),
    }
}

/// Remove any `( ... )` segments; no nesting.
pub fn strip_parens(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for ch in s.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}
