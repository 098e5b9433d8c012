//! HTTP client for the external translation service.
//!
//! The service exposes two operations, one for plain text and one for
//! HTML-bearing text, both taking the text plus source and target language
//! codes. Each call here is a single attempt; deciding what to do with a
//! failure belongs to the caller, which records it per field and moves on.

use crate::catalog::LanguageCode;
use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to reach translation service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("translation service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("translation response contained no translated text")]
    EmptyResponse,
}

impl ClientError {
    /// HTTP status of the failure, when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status().map(|s| s.as_u16()),
            ClientError::EmptyResponse => None,
        }
    }

    /// True for 5xx-class failures, which indicate a transient backend
    /// condition rather than a problem with the submitted text.
    pub fn is_service_unavailable(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }
}

/// Translation request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    text: &'a str,
    target_language: &'a str,
    source_language: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translated: String,
}

/// Client for the translation service.
#[derive(Debug, Clone)]
pub struct TranslationClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TranslationClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_base_url(
            http,
            config.translation_api_url.clone(),
            config.translation_api_key.clone(),
        ))
    }

    /// Build a client against an explicit base URL (tests point this at a
    /// mock server).
    pub fn with_base_url(http: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Translate plain text into the target language.
    pub async fn translate_text(
        &self,
        text: &str,
        target: &LanguageCode,
        source: &LanguageCode,
    ) -> Result<String, ClientError> {
        self.post("text", text, target, source).await
    }

    /// Translate HTML-bearing text into the target language.
    pub async fn translate_html(
        &self,
        html: &str,
        target: &LanguageCode,
        source: &LanguageCode,
    ) -> Result<String, ClientError> {
        self.post("html", html, target, source).await
    }

    async fn post(
        &self,
        mode: &str,
        text: &str,
        target: &LanguageCode,
        source: &LanguageCode,
    ) -> Result<String, ClientError> {
        let url = format!("{}/translate/{}", self.base_url.trim_end_matches('/'), mode);
        let request = TranslateRequest {
            text,
            target_language: target.as_str(),
            source_language: source.as_str(),
        };

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(ClientError::Api { status, body });
        }

        let parsed: TranslateResponse = response.json().await?;
        if parsed.translated.is_empty() {
            return Err(ClientError::EmptyResponse);
        }

        Ok(parsed.translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn lang(code: &str) -> LanguageCode {
        LanguageCode::new(code)
    }

    fn test_client(base_url: &str) -> TranslationClient {
        TranslationClient::with_base_url(
            reqwest::Client::new(),
            base_url.to_string(),
            "test-key".to_string(),
        )
    }

    fn translated_body(text: &str) -> serde_json::Value {
        serde_json::json!({ "translated": text })
    }

    // ==================== Success Tests ====================

    #[tokio::test]
    async fn test_translate_text_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/translate/text"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "text": "Merhaba",
                "targetLanguage": "en",
                "sourceLanguage": "tr"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(translated_body("Hello")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client
            .translate_text("Merhaba", &lang("en"), &lang("tr"))
            .await
            .expect("Should succeed");

        assert_eq!(result, "Hello");
    }

    #[tokio::test]
    async fn test_translate_html_uses_html_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/translate/html"))
            .respond_with(ResponseTemplate::new(200).set_body_json(translated_body("Hallo")))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client
            .translate_html("Hello", &lang("de"), &lang("en"))
            .await
            .expect("Should succeed");

        assert_eq!(result, "Hallo");
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_tolerated() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/translate/text"))
            .respond_with(ResponseTemplate::new(200).set_body_json(translated_body("Hola")))
            .mount(&server)
            .await;

        let client = test_client(&format!("{}/", server.uri()));
        let result = client.translate_text("Hi", &lang("es"), &lang("en")).await;
        assert!(result.is_ok());
    }

    // ==================== Failure Tests ====================

    #[tokio::test]
    async fn test_server_error_carries_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/translate/text"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .translate_text("Merhaba", &lang("en"), &lang("tr"))
            .await
            .expect_err("Should fail");

        assert_eq!(err.status(), Some(503));
        assert!(err.is_service_unavailable());
        assert!(err.to_string().contains("maintenance"));
    }

    #[tokio::test]
    async fn test_client_error_is_not_service_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/translate/text"))
            .respond_with(ResponseTemplate::new(422).set_body_string("unsupported language pair"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .translate_text("Merhaba", &lang("xx"), &lang("tr"))
            .await
            .expect_err("Should fail");

        assert_eq!(err.status(), Some(422));
        assert!(!err.is_service_unavailable());
    }

    #[tokio::test]
    async fn test_empty_translation_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/translate/text"))
            .respond_with(ResponseTemplate::new(200).set_body_json(translated_body("")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .translate_text("Merhaba", &lang("en"), &lang("tr"))
            .await
            .expect_err("Should fail");

        assert!(matches!(err, ClientError::EmptyResponse));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_malformed_response_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/translate/text"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client
            .translate_text("Merhaba", &lang("en"), &lang("tr"))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_single_attempt_per_call() {
        let server = MockServer::start().await;

        // Exactly one request even on failure - the caller decides what to
        // do next, not the client
        Mock::given(method("POST"))
            .and(path("/translate/text"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let _ = client
            .translate_text("Merhaba", &lang("en"), &lang("tr"))
            .await;
    }
}
