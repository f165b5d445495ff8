use std::{collections::HashMap, fs};

use tracing::warn;
use url::Url;

const CONFIG_FILE: &str = "assistant.toml";
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
        }
    }
}

/// Resolves the analysis service base address once at startup:
/// defaults, then `assistant.toml`, then environment overrides.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(CONFIG_FILE) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("api_base_url") {
                settings.api_base_url = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("ANALYZE_API_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    settings.api_base_url = normalize_api_base_url(&settings.api_base_url);
    settings
}

pub fn normalize_api_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_API_BASE_URL.to_string();
    }

    match Url::parse(trimmed) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => trimmed.to_string(),
        _ => {
            warn!(base_url = trimmed, "invalid api base url; using default");
            DEFAULT_API_BASE_URL.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(
            normalize_api_base_url("http://analysis.internal:8000/"),
            "http://analysis.internal:8000"
        );
    }

    #[test]
    fn blank_and_unparseable_addresses_fall_back_to_the_default() {
        assert_eq!(normalize_api_base_url("   "), DEFAULT_API_BASE_URL);
        assert_eq!(normalize_api_base_url("not a url"), DEFAULT_API_BASE_URL);
        assert_eq!(
            normalize_api_base_url("ftp://analysis.internal"),
            DEFAULT_API_BASE_URL
        );
    }

    #[test]
    fn environment_overrides_the_default() {
        std::env::set_var("APP__API_BASE_URL", "https://analysis.example.com/");
        let settings = load_settings();
        std::env::remove_var("APP__API_BASE_URL");

        assert_eq!(settings.api_base_url, "https://analysis.example.com");
    }
}
