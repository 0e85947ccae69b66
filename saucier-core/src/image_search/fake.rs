use async_trait::async_trait;
use std::sync::RwLock;

use super::{ImageLookup, ImageSearch};

/// Image search returning a fixed lookup and recording every query.
#[derive(Debug)]
pub struct FakeImageSearch {
    lookup: ImageLookup,
    queries: RwLock<Vec<String>>,
}

impl FakeImageSearch {
    pub fn new(lookup: ImageLookup) -> Self {
        Self {
            lookup,
            queries: RwLock::new(Vec::new()),
        }
    }

    pub fn found(url: &str) -> Self {
        Self::new(ImageLookup::Found(url.to_string()))
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.read().map(|q| q.clone()).unwrap_or_default()
    }
}

impl Default for FakeImageSearch {
    fn default() -> Self {
        Self::new(ImageLookup::NotFound)
    }
}

#[async_trait]
impl ImageSearch for FakeImageSearch {
    async fn search(&self, query: &str) -> ImageLookup {
        if let Ok(mut queries) = self.queries.write() {
            queries.push(query.to_string());
        }
        self.lookup.clone()
    }
}
