pub mod config;
pub mod error;
pub mod generate;
pub mod image_search;
pub mod llm;
pub mod store;
pub mod types;

pub use config::{ConfigError, ImageSearchConfig, LlmConfig, ProviderKind};
pub use error::{StoreError, ValidationError};
pub use generate::{GenerateError, GenerateRequest, GenerationResult, Generator, Stage};
pub use image_search::{create_image_search, ImageLookup, ImageSearch, ImageSearchError};
pub use llm::{create_provider, LlmError, LlmProvider};
pub use store::{MemoryStore, RecipeFilter, RecipePage, RecipeStore};
pub use types::{Difficulty, GenerationMetadata, Language, NewRecipe, Recipe, UnknownLabel};
