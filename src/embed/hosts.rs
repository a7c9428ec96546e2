// Allowed-host patterns

use std::fmt;

use regex::{Regex, RegexBuilder};

use super::errors::EmbedError;

/// One entry of a provider's allowed-hosts list.
///
/// Literal hosts are compared case-insensitively for equality. Regex
/// patterns are searched in the lowercased host, which lets a provider
/// accept arbitrary account subdomains.
#[derive(Debug, Clone)]
pub enum HostPattern {
    Literal(String),
    Regex(Regex),
}

impl HostPattern {
    pub fn literal(host: &str) -> Self {
        Self::Literal(host.trim().to_lowercase())
    }

    pub fn regex(pattern: &str) -> Result<Self, EmbedError> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(Self::Regex)
            .map_err(|e| EmbedError::InvalidPattern(format!("{}: {}", pattern, e)))
    }

    pub fn matches(&self, host: &str) -> bool {
        match self {
            Self::Literal(literal) => literal.eq_ignore_ascii_case(host),
            Self::Regex(re) => re.is_match(&host.to_lowercase()),
        }
    }

    /// Key used for de-duplication
    fn key(&self) -> (bool, &str) {
        match self {
            Self::Literal(l) => (false, l.as_str()),
            Self::Regex(re) => (true, re.as_str()),
        }
    }
}

impl PartialEq for HostPattern {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for HostPattern {}

impl fmt::Display for HostPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(l) => write!(f, "{}", l),
            Self::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// Whether any pattern in `patterns` accepts `host`
pub fn any_match(patterns: &[HostPattern], host: &str) -> bool {
    patterns.iter().any(|p| p.matches(host))
}

/// Drop duplicate patterns, keeping first occurrence order
pub fn dedupe(patterns: Vec<HostPattern>) -> Vec<HostPattern> {
    let mut out: Vec<HostPattern> = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        if !out.contains(&pattern) {
            out.push(pattern);
        }
    }
    out
}
