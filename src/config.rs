//! Process configuration from environment variables with code defaults.
//! Mirrors the deployment knobs of the platform: where the identity service
//! lives and where the persisted bearer token is kept.

use std::path::PathBuf;

/// Base address of the identity/profile HTTP service.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Token file location relative to the working directory.
pub const DEFAULT_TOKEN_FILE: &str = ".neuronet/token.json";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub token_file: PathBuf,
}

impl Settings {
    /// Read settings from `NEURONET_API_URL` and `NEURONET_TOKEN_FILE`,
    /// falling back to the defaults above.
    pub fn from_env() -> Self {
        let api_url = std::env::var("NEURONET_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let token_file = std::env::var("NEURONET_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_FILE));
        Self { api_url, token_file }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self { api_url: DEFAULT_API_URL.to_string(), token_file: PathBuf::from(DEFAULT_TOKEN_FILE) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        let s = Settings::default();
        assert_eq!(s.api_url, "http://localhost:8000");
        assert_eq!(s.token_file, PathBuf::from(".neuronet/token.json"));
    }
}
