// Normalize and parse raw embed URLs

use regex::Regex;
use url::Url;

lazy_static::lazy_static! {
    static ref HTTP_SCHEME_RE: Regex = Regex::new(r"(?i)^https?://").unwrap();
}

/// Structured view of an embed URL.
///
/// `host` is lowercased and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub scheme: String,
    pub host: String,
    pub path: String,
    pub query: Option<String>,
    /// Normalized input (scheme inserted) that was parsed
    pub original: String,
}

impl ParsedUrl {
    /// Path segments without empty pieces
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// First value of a query parameter
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

/// Parse a raw string into a [`ParsedUrl`].
///
/// Protocol-relative (`//host/...`) and bare-domain (`host/...`) inputs get
/// an `https` scheme. Returns `None` for blank input or when no host can be
/// extracted.
pub fn parse(raw: &str) -> Option<ParsedUrl> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let normalized = if raw.starts_with("//") {
        format!("https:{}", raw)
    } else if !HTTP_SCHEME_RE.is_match(raw) {
        format!("https://{}", raw.trim_start_matches('/'))
    } else {
        raw.to_string()
    };

    let url = Url::parse(&normalized).ok()?;
    let host = url.host_str()?.to_lowercase();
    if host.is_empty() {
        return None;
    }

    Some(ParsedUrl {
        scheme: url.scheme().to_string(),
        host,
        path: url.path().to_string(),
        query: url.query().map(str::to_string),
        original: normalized,
    })
}
