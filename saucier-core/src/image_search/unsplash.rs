//! Unsplash photo search client.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{ImageLookup, ImageSearch, ImageSearchError};

pub struct UnsplashClient {
    access_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

impl UnsplashClient {
    pub fn new(
        access_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, ImageSearchError> {
        if access_key.trim().is_empty() {
            return Err(ImageSearchError::NotConfigured(
                "Unsplash access key is empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImageSearchError::RequestFailed(e.to_string()))?;

        Ok(Self {
            access_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn try_search(&self, query: &str) -> Result<Option<String>, ImageSearchError> {
        let response = self
            .client
            .get(format!("{}/search/photos", self.base_url))
            .query(&[
                ("query", query),
                ("orientation", "landscape"),
                ("per_page", "1"),
                ("client_id", self.access_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ImageSearchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageSearchError::ApiError {
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ImageSearchError::ParseError(e.to_string()))?;

        Ok(body.results.into_iter().next().map(|p| p.urls.regular))
    }
}

#[async_trait]
impl ImageSearch for UnsplashClient {
    async fn search(&self, query: &str) -> ImageLookup {
        match self.try_search(query).await {
            Ok(Some(url)) => ImageLookup::Found(url),
            Ok(None) => ImageLookup::NotFound,
            Err(e) => ImageLookup::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, timeout: Duration) -> UnsplashClient {
        UnsplashClient::new("access".to_string(), server.uri(), timeout).unwrap()
    }

    #[tokio::test]
    async fn test_search_returns_first_regular_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .and(query_param("query", "food Pizza Italian cuisine"))
            .and(query_param("orientation", "landscape"))
            .and(query_param("per_page", "1"))
            .and(query_param("client_id", "access"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 2,
                "results": [
                    {"urls": {"regular": "https://images.example/pizza.jpg", "small": "s"}},
                    {"urls": {"regular": "https://images.example/other.jpg"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let lookup = client(&server, Duration::from_secs(5))
            .search("food Pizza Italian cuisine")
            .await;
        assert_eq!(
            lookup,
            ImageLookup::Found("https://images.example/pizza.jpg".to_string())
        );
    }

    #[tokio::test]
    async fn test_search_no_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;

        let lookup = client(&server, Duration::from_secs(5)).search("food").await;
        assert_eq!(lookup, ImageLookup::NotFound);
    }

    #[tokio::test]
    async fn test_search_server_error_is_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let lookup = client(&server, Duration::from_secs(5)).search("food").await;
        assert_eq!(
            lookup,
            ImageLookup::Failed(ImageSearchError::ApiError { status: 401 }.to_string())
        );
    }

    #[test]
    fn test_empty_access_key_is_rejected() {
        let result = UnsplashClient::new(
            "  ".to_string(),
            "http://x".to_string(),
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(ImageSearchError::NotConfigured(_))));
    }

    // Enhancement: a slow search gives up instead of stalling generation.
    #[tokio::test]
    async fn test_enhancement_timeout_is_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"results": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let lookup = client(&server, Duration::from_millis(100)).search("food").await;
        assert!(matches!(lookup, ImageLookup::Failed(_)));
    }
}
