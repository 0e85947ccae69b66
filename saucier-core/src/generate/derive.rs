//! Heuristic tags and difficulty for a generated recipe.

use crate::types::Difficulty;

pub const TAG_QUICK: &str = "quick";
pub const TAG_EASY: &str = "easy";
pub const TAG_LONG_PREP: &str = "long-prep";
pub const TAG_VEGETARIAN: &str = "vegetarian";

/// Substrings that mark an ingredient list as containing meat or fish,
/// in each supported language.
pub const MEAT_KEYWORDS: &[&str] = &[
    // en
    "meat", "chicken", "beef", "pork", "fish",
    // fr
    "viande", "poulet", "boeuf", "bœuf", "porc", "poisson",
    // es
    "carne", "pollo", "ternera", "cerdo", "pescado",
];

/// Tags: the lowercased cuisine, a duration band, and `vegetarian` when no
/// meat keyword appears in the ingredients.
///
/// Bands: <= 15 quick, <= 30 easy, >= 60 long-prep. 31 to 59 minutes gets no
/// band tag.
pub fn derive_tags(ingredients: &[String], cuisine_type: &str, duration: i32) -> Vec<String> {
    let mut tags = vec![cuisine_type.to_lowercase()];

    let band = if duration <= 15 {
        Some(TAG_QUICK)
    } else if duration <= 30 {
        Some(TAG_EASY)
    } else if duration >= 60 {
        Some(TAG_LONG_PREP)
    } else {
        None
    };

    let vegetarian = is_meat_free(ingredients).then_some(TAG_VEGETARIAN);

    for tag in band.into_iter().chain(vegetarian) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }

    tags
}

/// True when no meat keyword is a substring of the joined, lowercased list.
pub fn is_meat_free(ingredients: &[String]) -> bool {
    let joined = ingredients.join(" ").to_lowercase();
    !MEAT_KEYWORDS.iter().any(|keyword| joined.contains(keyword))
}

/// `easy` for short recipes with few steps, `hard` for long or many-step
/// ones, `medium` otherwise. The easy check wins.
pub fn derive_difficulty(step_count: usize, duration: i32) -> Difficulty {
    if step_count <= 5 && duration <= 30 {
        Difficulty::Easy
    } else if step_count >= 10 || duration >= 90 {
        Difficulty::Hard
    } else {
        Difficulty::Medium
    }
}
