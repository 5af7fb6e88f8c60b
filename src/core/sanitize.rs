// src/core/sanitize.rs

pub fn normalize_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
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

/// Text after the last `:`, trimmed. No colon → the whole text, trimmed.
pub fn after_last_colon(s: &str) -> &str {
    match s.rfind(':') {
        Some(i) => s[i + 1..].trim(),
        None => s.trim(),
    }
}

/// Text before the first `(`, trimmed. No `(` → the whole text, trimmed.
pub fn before_paren(s: &str) -> &str {
    match s.find('(') {
        Some(i) => s[..i].trim(),
        None => s.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_decode_amp_last() {
        assert_eq!(normalize_entities("O&#39;Neil&nbsp;&amp;lt;"), "O'Neil &lt;");
    }

    #[test]
    fn ws_collapses_and_trims() {
        assert_eq!(normalize_ws("  a \n\t b  "), "a b");
    }

    #[test]
    fn colon_and_paren_splits() {
        assert_eq!(after_last_colon("Vote Number: 115 "), "115");
        assert_eq!(after_last_colon("Vote Date: Jan 1, 2024, 12:30 PM"), "30 PM");
        assert_eq!(after_last_colon("no colon "), "no colon");
        assert_eq!(before_paren(" H.R. 123 (Amdt 456)"), "H.R. 123");
        assert_eq!(before_paren("H.R. 123 "), "H.R. 123");
    }
}
