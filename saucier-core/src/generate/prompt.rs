//! Recipe generation prompt.

use super::validate::GenerateParams;

/// Prompt name for log fields.
pub const GENERATE_RECIPE_PROMPT_NAME: &str = "generate_recipe";

/// Render the generation prompt for validated parameters.
pub fn render_generate_recipe_prompt(params: &GenerateParams) -> String {
    format!(
        r#"You are an expert chef. Write a recipe in {language_name} (language code: {language_code}) that:
1. Uses these main ingredients: {ingredients}
2. Belongs to {cuisine_type} cuisine
3. Takes about {duration} minutes to prepare
4. May add common pantry staples (salt, pepper, oil, etc.)

IMPORTANT: Respond with a valid JSON object with exactly this structure:
{{
    "title": "Recipe title",
    "ingredients": [
        "quantity1 ingredient1",
        "quantity2 ingredient2"
    ],
    "steps": [
        "detailed step 1",
        "detailed step 2"
    ]
}}

Make sure that:
- The title is creative and descriptive
- Quantities are precise and use metric units (g, ml, etc.)
- Steps are numbered and detailed
- The response is strictly valid JSON, with no other text"#,
        language_name = params.language.display_name(),
        language_code = params.language.as_str(),
        ingredients = params.ingredients.join(", "),
        cuisine_type = params.cuisine_type,
        duration = params.duration,
    )
}
