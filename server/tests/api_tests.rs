use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use saucier_core::image_search::FakeImageSearch;
use saucier_core::llm::FakeProvider;
use saucier_core::{
    Difficulty, Generator, ImageLookup, Language, MemoryStore, NewRecipe, Recipe, RecipeFilter,
    RecipePage, RecipeStore, StoreError,
};
use saucier_server::{app, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

const IMAGE_URL: &str = "https://images.example/bruschetta.jpg";

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    llm: Arc<FakeProvider>,
}

fn test_app_with(llm: FakeProvider, images: FakeImageSearch) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let llm = Arc::new(llm);
    let generator = Generator::new(llm.clone(), Arc::new(images), store.clone());
    TestApp {
        router: app(AppState::new(store.clone(), generator)),
        store,
        llm,
    }
}

fn test_app() -> TestApp {
    test_app_with(
        FakeProvider::with_sample_recipe(),
        FakeImageSearch::found(IMAGE_URL),
    )
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

fn new_recipe(title: &str) -> NewRecipe {
    NewRecipe {
        title: title.to_string(),
        ingredients: vec!["200 g rice".to_string(), "1 onion".to_string()],
        steps: vec!["Cook the rice".to_string()],
        cuisine_type: "Italian".to_string(),
        language: Language::En,
        duration: 30,
        tags: vec!["italian".to_string(), "easy".to_string()],
        difficulty: Difficulty::Easy,
        image_url: None,
    }
}

/// Insert recipes oldest first, with distinct timestamps.
fn seed(store: &MemoryStore, recipes: Vec<NewRecipe>) -> Vec<Recipe> {
    recipes
        .into_iter()
        .map(|r| {
            std::thread::sleep(std::time::Duration::from_millis(2));
            store.insert(r).unwrap()
        })
        .collect()
}

fn titles(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Generation
// ============================================================================

#[tokio::test]
async fn test_generate_recipe_end_to_end() {
    let t = test_app();

    let (status, body) = post_json(
        &t.router,
        "/api/recipes/generate/",
        json!({
            "ingredients": ["tomato", "basil"],
            "cuisine_type": "Italian",
            "language": "en",
            "duration": 25
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    let recipe = &body["recipe"];
    assert_eq!(recipe["title"], "Tomato and Basil Bruschetta");
    assert_eq!(recipe["language"], "en");
    assert_eq!(recipe["duration"], 25);
    assert_eq!(recipe["rating"], 0.0);
    assert_eq!(recipe["ratings_count"], 0);
    assert_eq!(recipe["image_url"], IMAGE_URL);
    assert!(["easy", "medium"].contains(&recipe["difficulty"].as_str().unwrap()));

    let tags: Vec<&str> = recipe["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap())
        .collect();
    assert!(tags.contains(&"italian"));
    assert!(tags.contains(&"vegetarian"));

    let metadata = &body["metadata"];
    assert_eq!(metadata["total_ingredients"], 5);
    assert_eq!(metadata["total_steps"], 4);
    assert_eq!(metadata["is_vegetarian"], true);
    assert!(metadata["generation_time"].as_f64().unwrap() >= 0.0);
    assert!(metadata["image_search_time"].as_f64().unwrap() >= 0.0);

    // Saved and retrievable
    let id = recipe["id"].as_str().unwrap();
    let (status, fetched) = get(&t.router, &format!("/api/recipes/{}/", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&fetched, recipe);
}

#[tokio::test]
async fn test_generate_uses_defaults() {
    let t = test_app();

    let (status, body) =
        post_json(&t.router, "/api/recipes/generate/", json!({"ingredients": ["leek"]})).await;

    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    assert_eq!(body["recipe"]["language"], "fr");
    assert_eq!(body["recipe"]["cuisine_type"], "international");
    assert_eq!(body["recipe"]["duration"], 30);

    let prompts = t.llm.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("French"));
}

#[tokio::test]
async fn test_generate_validation_errors() {
    let t = test_app();

    let cases = [
        json!({}),
        json!({"ingredients": []}),
        json!({"ingredients": "tomato"}),
        json!({"ingredients": ["tomato", "  "]}),
        json!({"ingredients": ["tomato"], "duration": 4}),
        json!({"ingredients": ["tomato"], "duration": 241}),
        json!({"ingredients": ["tomato"], "duration": "soon"}),
        json!({"ingredients": ["tomato"], "language": "de"}),
        json!({"ingredients": ["tomato"], "cuisine_type": 7}),
        json!({"ingredients": ["tomato"], "cuisine_type": "x".repeat(101)}),
    ];

    for case in cases {
        let (status, body) = post_json(&t.router, "/api/recipes/generate/", case.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "case: {}", case);
        assert!(body["error"].is_string(), "case: {}", case);
    }

    // Nothing reached the model or the store
    assert!(t.llm.prompts().is_empty());
    assert_eq!(
        t.store.list(&RecipeFilter::default(), 10, 0).unwrap().total,
        0
    );
}

#[tokio::test]
async fn test_generate_duration_bounds_accepted() {
    let t = test_app();
    for duration in [json!(5), json!(240), json!("45")] {
        let (status, _) = post_json(
            &t.router,
            "/api/recipes/generate/",
            json!({"ingredients": ["tomato"], "duration": duration}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "duration: {}", duration);
    }
}

#[tokio::test]
async fn test_generate_rejects_malformed_json() {
    let t = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/recipes/generate/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"ingredients\": ["))
        .unwrap();

    let (status, body) = send(&t.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_generate_service_failure_is_server_error() {
    // No default response: every call fails
    let t = test_app_with(FakeProvider::new(), FakeImageSearch::default());

    let (status, body) =
        post_json(&t.router, "/api/recipes/generate/", json!({"ingredients": ["egg"]})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_generate_unusable_response_is_server_error() {
    for response in ["Sorry, I cannot help.", r#"{"title": "Eggs", "ingredients": ["egg"]}"#] {
        let t = test_app_with(
            FakeProvider::new().with_default_response(response),
            FakeImageSearch::default(),
        );

        let (status, body) =
            post_json(&t.router, "/api/recipes/generate/", json!({"ingredients": ["egg"]})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "response: {}", response);
        assert!(body["details"].is_string());
        assert_eq!(
            t.store.list(&RecipeFilter::default(), 10, 0).unwrap().total,
            0
        );
    }
}

#[tokio::test]
async fn test_generate_without_image() {
    let t = test_app_with(
        FakeProvider::with_sample_recipe(),
        FakeImageSearch::new(ImageLookup::Failed("connection reset".to_string())),
    );

    let (status, body) =
        post_json(&t.router, "/api/recipes/generate/", json!({"ingredients": ["tomato"]})).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["recipe"]["image_url"], Value::Null);
}

/// Store that fails every call.
struct BrokenStore;

impl RecipeStore for BrokenStore {
    fn insert(&self, _recipe: NewRecipe) -> Result<Recipe, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    fn get(&self, _id: Uuid) -> Result<Recipe, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    fn list(
        &self,
        _filter: &RecipeFilter,
        _limit: i64,
        _offset: i64,
    ) -> Result<RecipePage, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    fn add_rating(&self, _id: Uuid, _rating: f64) -> Result<Recipe, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    fn merge_tags(&self, _id: Uuid, _tags: &[String]) -> Result<Recipe, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_store_failures_are_server_errors() {
    let store: Arc<dyn RecipeStore> = Arc::new(BrokenStore);
    let generator = Generator::new(
        Arc::new(FakeProvider::with_sample_recipe()),
        Arc::new(FakeImageSearch::default()),
        store.clone(),
    );
    let router = app(AppState::new(store, generator));

    let (status, body) =
        post_json(&router, "/api/recipes/generate/", json!({"ingredients": ["egg"]})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["details"].is_string());

    let (status, _) = get(&router, "/api/recipes/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Retrieval
// ============================================================================

#[tokio::test]
async fn test_get_recipe_not_found() {
    let t = test_app();

    let (status, body) = get(&t.router, &format!("/api/recipes/{}/", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Recipe not found");

    let (status, _) = get(&t.router, "/api/recipes/not-a-uuid/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_newest_first_with_pagination() {
    let t = test_app();
    let titles_in_order: Vec<String> = (1..=12).map(|i| format!("Recipe {:02}", i)).collect();
    seed(
        &t.store,
        titles_in_order.iter().map(|title| new_recipe(title)).collect(),
    );

    let (status, body) = get(&t.router, "/api/recipes/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 12);
    assert_eq!(body["next"], 2);
    assert_eq!(body["previous"], Value::Null);
    let first_page = titles(&body);
    assert_eq!(first_page.len(), 10);
    assert_eq!(first_page[0], "Recipe 12");
    assert_eq!(first_page[9], "Recipe 03");

    let (status, body) = get(&t.router, "/api/recipes/?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Recipe 02", "Recipe 01"]);
    assert_eq!(body["next"], Value::Null);
    assert_eq!(body["previous"], 1);

    let (status, body) = get(&t.router, "/api/recipes/?page_size=5&page=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Recipe 02", "Recipe 01"]);

    let (status, body) = get(&t.router, "/api/recipes/?page=3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid page.");
}

#[tokio::test]
async fn test_list_huge_page_is_not_found() {
    let t = test_app();
    seed(&t.store, vec![new_recipe("Soup")]);

    let (status, body) = get(&t.router, "/api/recipes/?page=9223372036854775807").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid page.");

    let (status, _) = get(
        &t.router,
        "/api/recipes/?page=4611686018427387904&page_size=100",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_empty_first_page() {
    let t = test_app();
    let (status, body) = get(&t.router, "/api/recipes/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["results"], json!([]));
}

#[tokio::test]
async fn test_list_filters() {
    let t = test_app();

    let mut curry = new_recipe("Chickpea Curry");
    curry.ingredients = vec!["400 g chickpeas".to_string(), "1 can coconut milk".to_string()];
    curry.cuisine_type = "Indian".to_string();
    curry.language = Language::Fr;
    curry.tags = vec!["indian".to_string(), "vegetarian".to_string()];
    curry.difficulty = Difficulty::Medium;

    let mut stew = new_recipe("Beef Stew");
    stew.ingredients = vec!["1 kg beef".to_string(), "2 carrots".to_string()];
    stew.cuisine_type = "French".to_string();
    stew.tags = vec!["french".to_string(), "long-prep".to_string()];
    stew.difficulty = Difficulty::Hard;

    let risotto = new_recipe("Mushroom Risotto");

    let saved = seed(&t.store, vec![curry, stew, risotto]);
    t.store.add_rating(saved[1].id, 4.5).unwrap();
    t.store.add_rating(saved[2].id, 2.0).unwrap();

    let cases: &[(&str, &[&str])] = &[
        ("search=COCONUT", &["Chickpea Curry"]),
        ("search=stew", &["Beef Stew"]),
        ("cuisine_type=Indian", &["Chickpea Curry"]),
        ("language=fr", &["Chickpea Curry"]),
        ("language=de", &[]),
        ("difficulty=hard", &["Beef Stew"]),
        ("tags=italian&tags=easy", &["Mushroom Risotto"]),
        ("tags=italian&tags=vegetarian", &[]),
        ("min_rating=2", &["Mushroom Risotto", "Beef Stew"]),
        ("min_rating=4", &["Beef Stew"]),
        ("min_rating=lots", &["Mushroom Risotto", "Beef Stew", "Chickpea Curry"]),
    ];

    for (query, expected) in cases {
        let (status, body) = get(&t.router, &format!("/api/recipes/?{}", query)).await;
        assert_eq!(status, StatusCode::OK, "query: {}", query);
        assert_eq!(titles(&body), *expected, "query: {}", query);
        assert_eq!(body["count"], expected.len(), "query: {}", query);
    }
}

// ============================================================================
// Rating and tags
// ============================================================================

#[tokio::test]
async fn test_rating_sequence_updates_mean() {
    let t = test_app();
    let recipe = seed(&t.store, vec![new_recipe("Soup")]).remove(0);
    let uri = format!("/api/recipes/{}/", recipe.id);

    let mut last = Value::Null;
    for rating in [4, 5, 3] {
        let (status, body) = post_json(&t.router, &uri, json!({"rating": rating})).await;
        assert_eq!(status, StatusCode::OK);
        last = body;
    }

    assert_eq!(last["rating"], 4.0);
    assert_eq!(last["ratings_count"], 3);

    let stored = t.store.get(recipe.id).unwrap();
    assert_eq!(stored.rating, 4.0);
    assert_eq!(stored.ratings_count, 3);
}

#[tokio::test]
async fn test_rating_accepts_numeric_string() {
    let t = test_app();
    let recipe = seed(&t.store, vec![new_recipe("Soup")]).remove(0);

    let (status, body) = post_json(
        &t.router,
        &format!("/api/recipes/{}/", recipe.id),
        json!({"rating": "2.5"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 2.5);
}

#[tokio::test]
async fn test_tags_are_merged_without_duplicates() {
    let t = test_app();
    let recipe = seed(&t.store, vec![new_recipe("Soup")]).remove(0);

    let (status, body) = post_json(
        &t.router,
        &format!("/api/recipes/{}/", recipe.id),
        json!({"tags": ["easy", "winter", "winter"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tags"], json!(["italian", "easy", "winter"]));
}

#[tokio::test]
async fn test_rating_and_tags_together() {
    let t = test_app();
    let recipe = seed(&t.store, vec![new_recipe("Soup")]).remove(0);

    let (status, body) = post_json(
        &t.router,
        &format!("/api/recipes/{}/", recipe.id),
        json!({"rating": 5, "tags": ["favourite"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 5.0);
    assert_eq!(body["ratings_count"], 1);
    assert_eq!(body["tags"], json!(["italian", "easy", "favourite"]));
}

#[tokio::test]
async fn test_invalid_update_changes_nothing() {
    let t = test_app();
    let recipe = seed(&t.store, vec![new_recipe("Soup")]).remove(0);
    let uri = format!("/api/recipes/{}/", recipe.id);

    let cases = [
        json!({"rating": 6}),
        json!({"rating": -1}),
        json!({"rating": "great"}),
        json!({"tags": "winter"}),
        json!({"tags": ["winter", 3]}),
        // Valid rating is not applied when the tags are invalid
        json!({"rating": 5, "tags": "winter"}),
    ];

    for case in cases {
        let (status, body) = post_json(&t.router, &uri, case.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "case: {}", case);
        assert!(body["error"].is_string(), "case: {}", case);
    }

    let stored = t.store.get(recipe.id).unwrap();
    assert_eq!(stored.ratings_count, 0);
    assert_eq!(stored.tags, recipe.tags);
}

#[tokio::test]
async fn test_update_unknown_recipe() {
    let t = test_app();
    let (status, body) = post_json(
        &t.router,
        &format!("/api/recipes/{}/", Uuid::new_v4()),
        json!({"rating": 3}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Recipe not found");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let t = test_app();
    let (status, body) = get(&t.router, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/recipes/generate/"].is_object());
    assert!(body["paths"]["/api/recipes/{id}/"].is_object());
}
