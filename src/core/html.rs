// src/core/html.rs
// Tolerant, case-insensitive scanning over element markup snapshots.

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&super::sanitize::normalize_entities(&out))
}

/// Name of the tag in `<name attr…>` / `</name>` text (without the angle brackets).
/// Returns (is_close, lowercase name).
pub fn tag_name(tag_text: &str) -> (bool, String) {
    let t = tag_text.trim();
    let (is_close, rest) = match t.strip_prefix('/') {
        Some(r) => (true, r.trim_start()),
        None => (false, t),
    };
    let name: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    (is_close, name)
}

/// Value of attribute `name` inside an opening tag's text. Quoted or bare.
pub fn attr_value(tag_text: &str, name: &str) -> Option<String> {
    let lc = to_lower(tag_text);
    let needle = to_lower(name);
    let mut from = 0usize;

    while let Some(rel) = lc[from..].find(&needle) {
        let at = from + rel;
        from = at + needle.len();

        // whole attribute name only: preceded by whitespace, followed by '='
        let before_ok = lc[..at].chars().last().is_some_and(|c| c.is_whitespace());
        let after = lc[from..].trim_start();
        if !before_ok || !after.starts_with('=') {
            continue;
        }
        let eq = from + (lc[from..].len() - after.len());
        let raw = tag_text[eq + 1..].trim_start();

        let value = match raw.chars().next() {
            Some(q @ ('"' | '\'')) => raw[1..].split(q).next().unwrap_or(""),
            Some(_) => raw.split(|c: char| c.is_whitespace() || c == '>').next().unwrap_or(""),
            None => "",
        };
        return Some(value.to_string());
    }
    None
}

/// `href` of the first `<a>` in `block` that has one.
pub fn first_link_href(block: &str) -> Option<String> {
    let mut pos = 0usize;
    while let Some(lt) = block[pos..].find('<').map(|i| i + pos) {
        let gt = block[lt..].find('>')? + lt;
        let tag_text = &block[lt + 1..gt];
        pos = gt + 1;

        let (is_close, name) = tag_name(tag_text);
        if is_close || name != "a" {
            continue;
        }
        if let Some(href) = attr_value(tag_text, "href") {
            let href = super::sanitize::normalize_entities(href.trim());
            if !href.is_empty() {
                return Some(href);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_tags_collapses_whitespace_and_entities() {
        assert_eq!(strip_tags("<b>Vote&nbsp;Number:</b>\n   115 "), "Vote Number: 115");
    }

    #[test]
    fn tag_names() {
        assert_eq!(tag_name("B"), (false, s!("b")));
        assert_eq!(tag_name("/strong "), (true, s!("strong")));
        assert_eq!(tag_name("br/"), (false, s!("br")));
    }

    #[test]
    fn attr_value_quoted_and_bare() {
        assert_eq!(attr_value(r#"a class="x" HREF="/v/1.htm""#, "href").as_deref(), Some("/v/1.htm"));
        assert_eq!(attr_value("a href='/v/2.htm'", "href").as_deref(), Some("/v/2.htm"));
        assert_eq!(attr_value("a href=/v/3.htm title=x", "href").as_deref(), Some("/v/3.htm"));
        assert_eq!(attr_value(r#"a data-href="no""#, "href"), None);
    }

    #[test]
    fn first_link_skips_anchors_without_href() {
        let row = r#"<tr><td><a name="top"></a><a href="vote_118_2_00115.htm?a=1&amp;b=2">115</a></td></tr>"#;
        assert_eq!(first_link_href(row).as_deref(), Some("vote_118_2_00115.htm?a=1&b=2"));
        assert_eq!(first_link_href("<tr><td>115</td></tr>"), None);
    }
}
