//! Representative photo lookup for generated recipes.
//!
//! A lookup never fails the caller: transport and decoding problems come back
//! as [`ImageLookup::Failed`] and are treated like "no image".

mod fake;
mod unsplash;

pub use fake::FakeImageSearch;
pub use unsplash::UnsplashClient;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ImageSearchConfig;

/// Why an image search could not be completed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageSearchError {
    #[error("Image search not configured: {0}")]
    NotConfigured(String),

    #[error("Image search request failed: {0}")]
    RequestFailed(String),

    #[error("Image search API returned status {status}")]
    ApiError { status: u16 },

    #[error("Failed to parse image search response: {0}")]
    ParseError(String),
}

/// Outcome of an image search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLookup {
    Found(String),
    NotFound,
    /// The search could not be completed. Details are for logs only.
    Failed(String),
}

impl ImageLookup {
    /// The image URL, if one was found.
    pub fn into_url(self) -> Option<String> {
        match self {
            ImageLookup::Found(url) => Some(url),
            ImageLookup::NotFound | ImageLookup::Failed(_) => None,
        }
    }
}

#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Find one landscape photo for the query.
    async fn search(&self, query: &str) -> ImageLookup;
}

/// Image search that never finds anything. Used when no API key is set.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledImageSearch;

#[async_trait]
impl ImageSearch for DisabledImageSearch {
    async fn search(&self, _query: &str) -> ImageLookup {
        ImageLookup::NotFound
    }
}

/// Build the search query for a recipe: `food <title>`, plus
/// `<cuisine> cuisine` unless the cuisine is missing or "international".
pub fn build_image_query(title: &str, cuisine_type: Option<&str>) -> String {
    let mut query = format!("food {}", title);
    if let Some(cuisine) = cuisine_type {
        if !cuisine.is_empty() && !cuisine.eq_ignore_ascii_case("international") {
            query.push_str(&format!(" {} cuisine", cuisine));
        }
    }
    query
}

/// Search for a recipe photo. Failures are logged and reported as no image.
pub async fn find_recipe_image(
    search: &dyn ImageSearch,
    title: &str,
    cuisine_type: Option<&str>,
) -> Option<String> {
    let query = build_image_query(title, cuisine_type);
    let lookup = search.search(&query).await;
    match &lookup {
        ImageLookup::Found(_) => {}
        ImageLookup::NotFound => tracing::debug!(query = %query, "No image found"),
        ImageLookup::Failed(details) => {
            tracing::warn!(query = %query, "Image search failed: {}", details)
        }
    }
    lookup.into_url()
}

/// Build the image search described by `config`.
pub fn create_image_search(config: &ImageSearchConfig) -> Arc<dyn ImageSearch> {
    match &config.access_key {
        Some(key) => match UnsplashClient::new(key.clone(), config.base_url.clone(), config.timeout)
        {
            Ok(client) => Arc::new(client),
            Err(e) => {
                tracing::warn!("Image search disabled: {}", e);
                Arc::new(DisabledImageSearch)
            }
        },
        None => {
            tracing::info!("UNSPLASH_ACCESS_KEY not set, image search disabled");
            Arc::new(DisabledImageSearch)
        }
    }
}
