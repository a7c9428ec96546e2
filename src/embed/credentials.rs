// Persisted settings and provider credential resolution

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::DEFAULT_NAMESPACE;
use super::errors::EmbedError;

/// Deploy-time override for the Vimeo access token
pub const VIMEO_TOKEN_ENV: &str = "TRIBE_EMBED_VIMEO_TOKEN";
/// Deploy-time override for the Wistia API key
pub const WISTIA_TOKEN_ENV: &str = "TRIBE_EMBED_WISTIA_TOKEN";

/// Key-value settings persisted by the site administrator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub vimeo_access_token: String,
    #[serde(default)]
    pub wistia_api_key: String,
}

impl Settings {
    /// `<config dir>/tribe-embed/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(DEFAULT_NAMESPACE).join("settings.json"))
    }

    /// Load settings from `path`. A missing file is empty settings.
    pub fn load(path: &Path) -> Result<Self, EmbedError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("[Settings] No settings file at {}", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&content)?)
    }

    /// Load from an explicit path or the default location, never failing
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => return Self::default(),
        };

        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("[Settings] Ignoring unreadable {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Resolved provider secrets. Empty string means "not configured".
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub vimeo_token: String,
    pub wistia_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("vimeo_token", &redact(&self.vimeo_token))
            .field("wistia_token", &redact(&self.wistia_token))
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl Credentials {
    /// Environment first, then persisted settings, else empty
    pub fn resolve(settings: &Settings) -> Self {
        Self::resolve_with(settings, |name| std::env::var(name).ok())
    }

    pub fn resolve_with<F>(settings: &Settings, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            vimeo_token: pick(lookup(VIMEO_TOKEN_ENV), &settings.vimeo_access_token),
            wistia_token: pick(lookup(WISTIA_TOKEN_ENV), &settings.wistia_api_key),
        }
    }

    pub fn vimeo(&self) -> Option<&str> {
        non_empty(&self.vimeo_token)
    }

    pub fn wistia(&self) -> Option<&str> {
        non_empty(&self.wistia_token)
    }
}

fn pick(constant: Option<String>, stored: &str) -> String {
    constant
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| stored.trim().to_string())
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
