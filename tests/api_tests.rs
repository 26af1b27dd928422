//! Router tests driving the JSON API end to end

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use temp_dir::TempDir;
use tower::ServiceExt;
use weekplate::config::{Config, DataConfig, LoggingConfig, PlanningConfig, ServerConfig};
use weekplate::{AppState, HistoryStore, router};
use weekplate_recipe::RecipeCatalog;
use weekplate_shopping::Categorizer;

struct TestApp {
    app: Router,
    history: Arc<HistoryStore>,
    _dir: TempDir,
}

async fn setup() -> TestApp {
    let dir = TempDir::new().unwrap();
    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        data: DataConfig {
            recipes_path: None,
            departments_path: None,
            history_path: dir.child("history.json").to_string_lossy().into_owned(),
        },
        planning: PlanningConfig::default(),
        logging: LoggingConfig::default(),
    };

    let history = Arc::new(HistoryStore::open(&config.data.history_path).await);
    let state = AppState {
        config,
        catalog: Arc::new(RecipeCatalog::builtin()),
        categorizer: Arc::new(Categorizer::builtin()),
        history: history.clone(),
    };

    TestApp {
        app: router(state),
        history,
        _dir: dir,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

fn catalog_ids(n: usize) -> Vec<String> {
    RecipeCatalog::builtin()
        .all()
        .iter()
        .take(n)
        .map(|r| r.id.clone())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let test = setup().await;
    let (status, body) = get(&test.app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_weekly_suggestions_with_seed_are_reproducible() {
    let test = setup().await;

    let (status, first) = get(&test.app, "/api/recipe/weekly-suggestions?count=6&seed=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["suggestions"].as_array().unwrap().len(), 6);
    assert_eq!(first["suggestions"][0]["suggestion_number"], 1);
    assert_eq!(first["summary"]["total_count"], 6);

    let (_, second) = get(&test.app, "/api/recipe/weekly-suggestions?count=6&seed=7").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_weekly_suggestions_rejects_zero_count() {
    let test = setup().await;
    let (status, body) = get(&test.app, "/api/recipe/weekly-suggestions?count=0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationFailed");
    assert!(body["details"]["count"].is_array());
}

#[tokio::test]
async fn test_update_suggestions_drops_selected() {
    let test = setup().await;
    let (_, weekly) = get(&test.app, "/api/recipe/weekly-suggestions?count=8&seed=3").await;
    let suggestions = weekly["suggestions"].as_array().unwrap().clone();

    let (status, body) = post(
        &test.app,
        "/api/recipe/update-suggestions",
        json!({
            "selected_recipe": suggestions[0],
            "remaining_suggestions": suggestions[1..].to_vec(),
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updated = body["updated_suggestions"].as_array().unwrap();
    assert!(updated.len() < suggestions.len());
    assert!(updated.iter().all(|s| s["name"] != suggestions[0]["name"]));
    assert_eq!(updated[0]["suggestion_number"], 1);
}

#[tokio::test]
async fn test_grocery_list_requires_four_recipes() {
    let test = setup().await;
    let (status, body) = post(
        &test.app,
        "/api/recipe/grocery-list",
        json!({ "recipe_ids": catalog_ids(3) }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "WrongRecipeCount");
    assert_eq!(body["details"], json!({"expected": 4, "actual": 3}));
    assert!(test.history.snapshot().await.grocery_lists.is_empty());
}

#[tokio::test]
async fn test_grocery_list_from_catalog_ids() {
    let test = setup().await;
    let ids = catalog_ids(4);

    let (status, body) = post(
        &test.app,
        "/api/recipe/grocery-list",
        json!({ "recipe_ids": ids, "week_date": "2026-10-19" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["week_date"], "2026-10-19");
    assert_eq!(body["selected_recipes"].as_array().unwrap().len(), 4);
    assert_eq!(body["statistics"]["total_recipes"], 4);
    assert!(body["grocery_list"].is_object());
    assert!(
        body["formatted_list"]
            .as_str()
            .unwrap()
            .starts_with("# Weekly Grocery List")
    );
    assert!(body["estimated_cost"].as_str().unwrap().starts_with('$'));

    let history = test.history.snapshot().await;
    assert_eq!(history.grocery_lists.len(), 1);
    assert_eq!(history.selections[0].recipe_ids, ids);
    assert_eq!(
        history.grocery_lists[0].id.to_string(),
        body["history_id"].as_str().unwrap()
    );
}

#[tokio::test]
async fn test_grocery_list_from_inline_recipes() {
    let test = setup().await;
    let (status, body) = post(
        &test.app,
        "/api/recipe/grocery-list",
        json!({
            "recipes": [
                {"name": "Chicken and Rice", "ingredients": ["1 lb chicken breast", "2 cups jasmine rice"]},
                {"name": "Beef and Peppers", "ingredients": ["1.5 lbs beef sirloin", "1 cup jasmine rice", "1 bell pepper"]},
                {"name": "Salmon", "ingredients": ["4 salmon fillets"]},
                {"name": "Pasta", "ingredients": ["8 oz penne pasta"]}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let list = &body["grocery_list"];

    let pantry = list["pantry"].as_array().unwrap();
    let rice = pantry.iter().find(|i| i["name"] == "jasmine rice").unwrap();
    assert_eq!(rice["quantity"], "3 cups");
    assert_eq!(rice["original_entries"].as_array().unwrap().len(), 2);

    let meat = list["meat_seafood"].as_array().unwrap();
    let quantity = |name: &str| {
        meat.iter()
            .find(|i| i["name"] == name)
            .map(|i| i["quantity"].clone())
            .unwrap()
    };
    assert_eq!(quantity("chicken breast"), "1 lb");
    assert_eq!(quantity("beef sirloin"), "1 1/2 lbs");

    assert_eq!(list["produce"][0]["name"], "bell pepper");
    assert_eq!(list["produce"][0]["quantity"], "1 item");
}

#[tokio::test]
async fn test_grocery_list_unknown_id_is_not_found() {
    let test = setup().await;
    let mut ids = catalog_ids(3);
    ids.push("no-such-recipe".to_string());

    let (status, body) = post(
        &test.app,
        "/api/recipe/grocery-list",
        json!({ "recipe_ids": ids }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"]["recipe_id"], "no-such-recipe");
}

#[tokio::test]
async fn test_ingredient_overlap() {
    let test = setup().await;

    let (status, body) = post(
        &test.app,
        "/api/recipe/ingredient-overlap",
        json!({ "recipe_ids": catalog_ids(4) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let score = body["overlap_info"]["efficiency_score"].as_u64().unwrap();
    assert!(score <= 10);

    let (status, body) = post(
        &test.app,
        "/api/recipe/ingredient-overlap",
        json!({ "recipe_ids": catalog_ids(1) }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationFailed");
}

#[tokio::test]
async fn test_recipe_details() {
    let test = setup().await;
    let id = &catalog_ids(1)[0];

    let (status, body) = get(&test.app, &format!("/api/recipe/recipe/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());

    let (status, body) = get(&test.app, "/api/recipe/recipe/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "RecipeNotFound");
}

#[tokio::test]
async fn test_cooking_equipment() {
    let test = setup().await;
    let (status, body) = get(&test.app, "/api/recipe/cooking-equipment").await;

    assert_eq!(status, StatusCode::OK);
    let equipment = body["equipment"].as_array().unwrap();
    assert!(equipment.contains(&json!("grill")));
    assert!(body["method_preferences"]["air_fryer"].is_string());
}

#[tokio::test]
async fn test_rate_recipe_updates_preferences() {
    let test = setup().await;
    let id = &catalog_ids(1)[0];

    let (status, body) = post(
        &test.app,
        "/api/recipe/rate-recipe",
        json!({ "recipe_id": id, "rating": 6 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["rating"].is_array());

    let (status, body) = post(
        &test.app,
        "/api/recipe/rate-recipe",
        json!({ "recipe_id": id, "rating": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["preferences"]["favorite_proteins"]["chicken"], 5);

    // rating defaults to 3
    post(
        &test.app,
        "/api/recipe/rate-recipe",
        json!({ "recipe_id": id }),
    )
    .await;

    let (status, body) = get(&test.app, "/api/recipe/user-preferences").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["preferences"]["favorite_proteins"]["chicken"], 8);
    assert_eq!(body["preferences"]["favorite_cuisines"]["asian"], 8);
    assert!(body["favorites"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_rate_unknown_recipe_is_not_found() {
    let test = setup().await;
    let (status, _) = post(
        &test.app,
        "/api/recipe/rate-recipe",
        json!({ "recipe_id": "missing", "rating": 4 }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
