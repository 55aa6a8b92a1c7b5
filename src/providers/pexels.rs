//! Pexels photo search client.

use std::fmt;

use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{ImageFinder, Photo};
use crate::error::ImageSearchError;

/// Entries are kept as raw JSON so one malformed photo cannot sink the page.
#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Value,
}

impl SearchResponse {
    fn into_photos(self) -> Vec<Photo> {
        self.photos
            .as_array()
            .map(|entries| entries.iter().map(Photo::from).collect())
            .unwrap_or_default()
    }
}

pub struct PexelsClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for PexelsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PexelsClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl PexelsClient {
    pub fn new(http: Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    fn search_url(&self, query: &str, per_page: u8) -> String {
        format!(
            "{}/v1/search?query={}&per_page={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query),
            per_page
        )
    }
}

impl ImageFinder for PexelsClient {
    #[instrument(level = "info", skip_all, fields(query = %query, per_page = per_page))]
    async fn search(&self, query: &str, per_page: u8) -> Result<Vec<Photo>, ImageSearchError> {
        let response = self
            .http
            .get(self.search_url(query, per_page))
            .header(AUTHORIZATION, self.api_key.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageSearchError::Status(status));
        }

        let parsed: SearchResponse = response.json().await?;
        let photos = parsed.into_photos();
        debug!(count = photos.len(), "Pexels search results");
        Ok(photos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::{ImageResolver, ImageSource};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn search_url_encodes_query() {
        let client = PexelsClient::new(Client::new(), "k", "https://api.pexels.com/");
        assert_eq!(
            client.search_url("black holes & quasars", 5),
            "https://api.pexels.com/v1/search?query=black%20holes%20%26%20quasars&per_page=5"
        );
    }

    #[tokio::test]
    async fn sends_key_and_page_size() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("query", "mars rover"))
            .and(query_param("per_page", "5"))
            .and(header("authorization", "pexels-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "photos": [
                    { "id": 1, "src": { "original": "https://img/1-o.jpg" } },
                    { "id": 2, "src": { "large": "https://img/2-l.jpg" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PexelsClient::new(Client::new(), "pexels-key", server.uri());
        let photos = client.search("mars rover", 5).await.unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].large_url(), None);
        assert_eq!(photos[1].large_url(), Some("https://img/2-l.jpg"));
    }

    #[tokio::test]
    async fn malformed_entries_are_skipped_by_the_resolver() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "photos": [
                    null,
                    { "id": "abc", "src": { "large": 7 } },
                    { "id": 3, "src": { "large": "https://img/3-l.jpg" } }
                ]
            })))
            .mount(&server)
            .await;

        let client = PexelsClient::new(Client::new(), "k", server.uri());
        let photos = client.search("comets", 5).await.unwrap();
        assert_eq!(photos.len(), 3);

        let resolver = ImageResolver::new(Some(client), "/placeholder-1.jpg");
        let image = resolver.resolve("comets").await;
        assert_eq!(image.url, "https://img/3-l.jpg");
        assert_eq!(image.source, ImageSource::Provider);
    }

    #[tokio::test]
    async fn missing_photos_field_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_results": 0 })))
            .mount(&server)
            .await;

        let client = PexelsClient::new(Client::new(), "k", server.uri());
        assert!(client.search("nothing", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = PexelsClient::new(Client::new(), "bad", server.uri());
        let err = client.search("x", 5).await.unwrap_err();
        assert!(matches!(err, ImageSearchError::Status(s) if s.as_u16() == 401));
    }
}
