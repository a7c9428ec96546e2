// Allow-list HTML sanitizer for the original embed markup
//
// Only the elements a rendered embed block (and its caption) can contain
// survive, each with a fixed attribute list. Other tags are removed but
// their text is kept; script/style elements and comments go entirely. A
// script or style with no matching closer swallows the rest of the input.

use regex::{Captures, Regex};

lazy_static::lazy_static! {
    static ref COMMENT_RE: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref SCRIPT_RE: Regex = Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap();
    static ref STYLE_RE: Regex = Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap();
    static ref UNCLOSED_RAW_RE: Regex = Regex::new(r"(?is)<(?:script|style)\b.*$").unwrap();
    static ref TAG_RE: Regex =
        Regex::new(r#"<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap();
    static ref ATTR_RE: Regex = Regex::new(
        r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#
    )
    .unwrap();
}

const URL_ATTRS: [&str; 2] = ["href", "src"];
const ALLOWED_PROTOCOLS: [&str; 4] = ["http", "https", "mailto", "tel"];

/// Attributes kept for an allowed element, `None` if the element is stripped
pub fn allowed_attributes(tag: &str) -> Option<&'static [&'static str]> {
    let attrs: &'static [&'static str] = match tag {
        "iframe" => &["src", "height", "width", "frameborder", "allowfullscreen"],
        "figure" | "figcaption" | "div" => &["class"],
        "a" => &["class", "href", "data-type"],
        "img" => &["class", "style", "src", "alt"],
        "mark" => &["style", "class"],
        "strong" | "em" | "sub" | "sup" | "s" | "kbd" | "code" => &[],
        _ => return None,
    };
    Some(attrs)
}

/// Strip everything outside the allow-list from `html`
pub fn sanitize_embed_html(html: &str) -> String {
    let html = COMMENT_RE.replace_all(html, "");
    let html = SCRIPT_RE.replace_all(&html, "");
    let html = STYLE_RE.replace_all(&html, "");
    let html = UNCLOSED_RAW_RE.replace(&html, "");

    let mut out = String::with_capacity(html.len());
    let mut last = 0;

    for caps in TAG_RE.captures_iter(&html) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        push_text(&mut out, &html[last..whole.start()]);
        last = whole.end();

        if let Some(tag) = rebuild_tag(&caps) {
            out.push_str(&tag);
        }
    }
    push_text(&mut out, &html[last..]);

    out
}

fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn rebuild_tag(caps: &Captures<'_>) -> Option<String> {
    let closing = caps.get(1).map_or(false, |m| !m.as_str().is_empty());
    let name = caps.get(2)?.as_str().to_ascii_lowercase();
    let allowed = allowed_attributes(&name)?;

    if closing {
        return Some(format!("</{}>", name));
    }

    let raw_attrs = caps.get(3).map_or("", |m| m.as_str());
    let mut tag = format!("<{}", name);

    for attr in ATTR_RE.captures_iter(raw_attrs) {
        let attr_name = match attr.get(1) {
            Some(m) => m.as_str().to_ascii_lowercase(),
            None => continue,
        };
        if !allowed.contains(&attr_name.as_str()) {
            continue;
        }

        let value = attr.get(2).or_else(|| attr.get(3)).or_else(|| attr.get(4));
        match value {
            Some(v) => {
                let decoded = html_escape::decode_html_entities(v.as_str());
                if URL_ATTRS.contains(&attr_name.as_str()) && !is_safe_url(&decoded) {
                    continue;
                }
                tag.push(' ');
                tag.push_str(&attr_name);
                tag.push_str("=\"");
                tag.push_str(&html_escape::encode_double_quoted_attribute(&decoded));
                tag.push('"');
            }
            None => {
                tag.push(' ');
                tag.push_str(&attr_name);
            }
        }
    }

    if raw_attrs.trim_end().ends_with('/') {
        tag.push_str(" /");
    }
    tag.push('>');
    Some(tag)
}

/// Relative URLs pass; absolute ones need an allowed protocol
fn is_safe_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();

    let scheme_end = compact.find(|c| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(idx) if compact[idx..].starts_with(':') => {
            let scheme = compact[..idx].to_ascii_lowercase();
            ALLOWED_PROTOCOLS.contains(&scheme.as_str())
        }
        _ => true,
    }
}
