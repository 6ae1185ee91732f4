//! Client configuration and endpoint URL construction.
//!
//! `ClientConfig` is created once, handed to the client, and only read after
//! that. The API key is the one field that must be set before requests can be
//! built; its absence is reported as `ApiError::MissingCredential` before any
//! I/O happens.

use std::time::Duration;

use crate::error::ApiError;
use crate::types::Category;

pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org";
pub const DEFAULT_API_VERSION: &str = "3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the movie database API.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: Option<String>,
    api_base_url: String,
    api_version: String,
    image_base_url: String,
    language: String,
    request_timeout: Duration,
}

// Keeps the key out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("image_base_url", &self.image_base_url)
            .field("language", &self.language)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, DEFAULT_API_VERSION, DEFAULT_IMAGE_BASE_URL)
    }
}

impl ClientConfig {
    /// Create a configuration without an API key.
    ///
    /// Trailing slashes on both base URLs are stripped, as are slashes around
    /// `api_version`.
    pub fn new(api_base_url: &str, api_version: &str, image_base_url: &str) -> Self {
        Self {
            api_key: None,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_version: api_version.trim_matches('/').to_string(),
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load settings from `MOVIEDB_*` environment variables, falling back to
    /// the defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = lookup("MOVIEDB_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let version = lookup("MOVIEDB_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let images =
            lookup("MOVIEDB_IMAGE_BASE_URL").unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string());

        let mut config = Self::new(&base, &version, &images);
        if let Some(key) = lookup("MOVIEDB_API_KEY") {
            config.set_api_key(key);
        }
        if let Some(language) = lookup("MOVIEDB_LANGUAGE") {
            config.language = language;
        }
        if let Some(secs) = lookup("MOVIEDB_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            config.request_timeout = Duration::from_secs(secs);
        }
        config
    }

    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.api_key = Some(key.into());
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.set_api_key(key);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn api_url(&self) -> String {
        format!("{}/{}", self.api_base_url, self.api_version)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// URL of one page of a category's movie list.
    pub fn build_url(&self, category: Category, page: u32) -> Result<String, ApiError> {
        let key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ApiError::MissingCredential)?;
        Ok(format!(
            "{}{}?api_key={key}&language={}&page={page}",
            self.api_url(),
            category.path(),
            self.language,
        ))
    }

    /// URL of a poster image. Needs no credential.
    pub fn build_image_url(&self, poster_path: &str) -> Result<String, ApiError> {
        if poster_path.trim().is_empty() {
            return Err(ApiError::InvalidPosterPath(poster_path.to_string()));
        }
        if poster_path.starts_with('/') {
            Ok(format!("{}{poster_path}", self.image_base_url))
        } else {
            Ok(format!("{}/{poster_path}", self.image_base_url))
        }
    }
}

/// Replace the value of the `api_key` query parameter for logging.
pub fn redact_api_key(url: &str) -> String {
    let Some(start) = url.find("api_key=").map(|i| i + "api_key=".len()) else {
        return url.to_string();
    };
    let end = url[start..].find('&').map_or(url.len(), |i| start + i);
    format!("{}REDACTED{}", &url[..start], &url[end..])
}
