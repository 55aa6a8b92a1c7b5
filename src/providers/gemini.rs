//! Gemini `generateContent` client.

use std::fmt;
use std::time::Instant;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::TextDrafter;
use crate::error::DraftError;
use crate::utils::truncate_for_log;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate, if non-blank.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.trim().is_empty())
    }
}

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(
        http: Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl TextDrafter for GeminiClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn draft(&self, prompt: &str) -> Result<String, DraftError> {
        let t0 = Instant::now();
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                // The URL carries the API key.
                let e = e.without_url();
                warn!(error = %e, "Gemini request failed");
                DraftError::ProviderUnavailable(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            warn!(%status, error = %e, "Failed reading Gemini response body");
            DraftError::ProviderUnavailable(e.to_string())
        })?;

        if !status.is_success() {
            warn!(
                %status,
                body_preview = %truncate_for_log(&body, 300),
                "Gemini returned non-success status"
            );
            return Err(DraftError::ProviderUnavailable(format!("status {status}")));
        }

        let text = match serde_json::from_str::<GenerateResponse>(&body) {
            Ok(parsed) => parsed.into_text(),
            Err(e) => {
                warn!(
                    error = %e,
                    body_preview = %truncate_for_log(&body, 300),
                    "Unreadable Gemini envelope"
                );
                None
            }
        };

        let dt = t0.elapsed();
        match text {
            Some(text) => {
                info!(
                    elapsed_ms = dt.as_millis() as u64,
                    bytes = text.len(),
                    "Gemini draft received"
                );
                debug!(preview = %truncate_for_log(&text, 300), "Gemini raw output");
                Ok(text)
            }
            None => {
                warn!(elapsed_ms = dt.as_millis() as u64, "Gemini response had no text");
                Err(DraftError::ProviderEmptyOutput)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(Client::new(), "test-key", "gemini-2.0-flash", server.uri())
    }

    fn reply(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
        })
    }

    #[tokio::test]
    async fn sends_prompt_and_returns_first_part_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(query_param("key", "test-key"))
            .and(body_json(json!({ "contents": [{ "parts": [{ "text": "write it" }] }] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("{\"content\":\"x\"}")))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server).draft("write it").await.unwrap();
        assert_eq!(text, "{\"content\":\"x\"}");
    }

    #[tokio::test]
    async fn empty_candidates_is_empty_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let err = client(&server).draft("p").await.unwrap_err();
        assert!(matches!(err, DraftError::ProviderEmptyOutput));
    }

    #[tokio::test]
    async fn blank_text_is_empty_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("  \n")))
            .mount(&server)
            .await;

        let err = client(&server).draft("p").await.unwrap_err();
        assert!(matches!(err, DraftError::ProviderEmptyOutput));
    }

    #[tokio::test]
    async fn unreadable_envelope_is_empty_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server).draft("p").await.unwrap_err();
        assert!(matches!(err, DraftError::ProviderEmptyOutput));
    }

    #[tokio::test]
    async fn non_success_status_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(503).set_body_json(reply("ignored")))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).draft("p").await.unwrap_err();
        match err {
            DraftError::ProviderUnavailable(reason) => assert!(reason.contains("503")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable() {
        let gemini = GeminiClient::new(Client::new(), "k", "m", "http://127.0.0.1:9");
        let err = gemini.draft("p").await.unwrap_err();
        assert!(matches!(err, DraftError::ProviderUnavailable(_)));
    }

    #[test]
    fn debug_redacts_api_key() {
        let gemini = GeminiClient::new(Client::new(), "secret", "m", "http://x");
        let dbg = format!("{gemini:?}");
        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
