use crate::catalog::LanguageCatalog;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Translation service
    pub translation_api_url: String,
    pub translation_api_key: String,
    pub request_timeout_secs: u64,

    // Languages
    pub languages: Vec<String>,
    pub default_language: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Languages - comma-separated catalog, first entry is the default
        // editing language unless DEFAULT_LANGUAGE overrides it
        let languages: Vec<String> = std::env::var("CONTENT_LANGUAGES")
            .unwrap_or_else(|_| "tr,en".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let default_language = std::env::var("DEFAULT_LANGUAGE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| languages.first().cloned().unwrap_or_else(|| "tr".to_string()));

        Ok(Self {
            // Translation service
            translation_api_url: std::env::var("TRANSLATION_API_URL")
                .context("TRANSLATION_API_URL not set")?,
            translation_api_key: std::env::var("TRANSLATION_API_KEY")
                .context("TRANSLATION_API_KEY not set")?,
            request_timeout_secs: std::env::var("TRANSLATION_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),

            languages,
            default_language,
        })
    }

    /// The language catalog configured for this installation.
    pub fn catalog(&self) -> LanguageCatalog {
        LanguageCatalog::from_codes(self.languages.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "TRANSLATION_API_URL",
            "TRANSLATION_API_KEY",
            "TRANSLATION_TIMEOUT_SECS",
            "CONTENT_LANGUAGES",
            "DEFAULT_LANGUAGE",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_requires_api_url() {
        clear_env();
        std::env::set_var("TRANSLATION_API_KEY", "k");

        let err = Config::from_env().expect_err("should fail");
        assert!(err.to_string().contains("TRANSLATION_API_URL"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        std::env::set_var("TRANSLATION_API_URL", "https://translate.example.com");
        std::env::set_var("TRANSLATION_API_KEY", "k");

        let config = Config::from_env().expect("should load");
        assert_eq!(config.languages, vec!["tr", "en"]);
        assert_eq!(config.default_language, "tr");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn test_from_env_parses_language_list() {
        clear_env();
        std::env::set_var("TRANSLATION_API_URL", "https://translate.example.com");
        std::env::set_var("TRANSLATION_API_KEY", "k");
        std::env::set_var("CONTENT_LANGUAGES", "tr, en , de,");
        std::env::set_var("DEFAULT_LANGUAGE", "en");

        let config = Config::from_env().expect("should load");
        assert_eq!(config.languages, vec!["tr", "en", "de"]);
        assert_eq!(config.default_language, "en");
    }

    fn test_config() -> Config {
        Config {
            translation_api_url: "https://translate.example.com".to_string(),
            translation_api_key: "test-key".to_string(),
            request_timeout_secs: 30,
            languages: vec!["tr".to_string(), "en".to_string(), "de".to_string()],
            default_language: "tr".to_string(),
        }
    }

    #[test]
    fn test_catalog_from_config() {
        let config = test_config();
        let catalog = config.catalog();
        assert_eq!(catalog.len(), 3);
        let codes: Vec<&str> = catalog.iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["tr", "en", "de"]);
    }

    #[test]
    fn test_catalog_dedupes_configured_languages() {
        let mut config = test_config();
        config.languages = vec!["tr".to_string(), "TR".to_string(), "en".to_string()];
        assert_eq!(config.catalog().len(), 2);
    }
}
