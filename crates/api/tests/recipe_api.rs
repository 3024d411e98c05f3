//! HTTP-level integration tests for the `/recipes` resource: creation rules,
//! line editing, portion scaling, and image upload.

mod common;

use axum::http::StatusCode;
use common::{
    baker_token, body_json, create_recipe, delete_auth, get, get_auth, post_json_auth,
    post_multipart_auth, put_json_auth, seed_inventory,
};
use serde_json::json;
use sqlx::PgPool;

fn recipe_body(name: &str, recipe_type: &str, portions: i32, lines: &[(i64, f64)]) -> serde_json::Value {
    let ingredients: Vec<_> = lines
        .iter()
        .map(|(id, q)| json!({ "ingredient_id": id, "quantity_used": q }))
        .collect();
    json!({
        "name": name,
        "recipe_type": recipe_type,
        "quantity_portions": portions,
        "ingredients": ingredients,
    })
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_recipe_costs_lines(pool: PgPool) {
    let token = baker_token(&pool).await;
    let app = common::build_test_app(pool);
    let [flour, butter, _, eggs] = seed_inventory(&app, &token).await;

    let recipe = create_recipe(
        app.clone(),
        &token,
        "  Pastel de vainilla ",
        "cake",
        10,
        &[(flour, 200.0), (butter, 100.0), (eggs, 4.0)],
    )
    .await;

    assert_eq!(recipe["name"], "Pastel de vainilla");
    assert_eq!(recipe["recipe_type"], "cake");
    assert_eq!(recipe["cost_recipe"], 37.0);
    let costs: Vec<f64> = recipe["ingredients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["cost_by_quantity_used"].as_f64().unwrap())
        .collect();
    assert_eq!(costs, vec![10.0, 15.0, 12.0]);
    assert_eq!(recipe["ingredients"][2]["unit"], "pieces");

    let response = get_auth(app, "/api/v1/recipes?q=vainilla", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_recipe_accepts_typed_quantities(pool: PgPool) {
    let token = baker_token(&pool).await;
    let app = common::build_test_app(pool);
    let [flour, butter, sugar, _] = seed_inventory(&app, &token).await;

    let body = json!({
        "name": "Galletas",
        "recipe_type": "cookie",
        "quantity_portions": 24,
        "ingredients": [
            { "ingredient_id": flour, "quantity_used": "100" },
            { "ingredient_id": sugar, "quantity_used": " 100 " },
            { "ingredient_id": butter, "quantity_used": 50 },
        ],
    });
    let response = post_json_auth(app.clone(), "/api/v1/recipes", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["ingredients"][0]["quantity_used"], 100.0);
    assert_eq!(json["data"]["cost_recipe"], 16.75);

    let body = json!({
        "name": "Galletas",
        "recipe_type": "cookie",
        "quantity_portions": 24,
        "ingredients": [
            { "ingredient_id": flour, "quantity_used": "mucho" },
            { "ingredient_id": sugar, "quantity_used": 100 },
            { "ingredient_id": butter, "quantity_used": 50 },
        ],
    });
    let response = post_json_auth(app, "/api/v1/recipes", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_recipe_rejections(pool: PgPool) {
    let token = baker_token(&pool).await;
    let app = common::build_test_app(pool);
    let [flour, butter, sugar, _] = seed_inventory(&app, &token).await;

    let two_lines = recipe_body("Corta", "cookie", 12, &[(flour, 100.0), (butter, 50.0)]);
    let response = post_json_auth(app.clone(), "/api/v1/recipes", two_lines, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let repeated = recipe_body("Repetida", "cookie", 12, &[(flour, 100.0), (butter, 50.0), (flour, 10.0)]);
    let response = post_json_auth(app.clone(), "/api/v1/recipes", repeated, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let unknown = recipe_body("Fantasma", "cookie", 12, &[(flour, 100.0), (butter, 50.0), (999_999, 1.0)]);
    let response = post_json_auth(app.clone(), "/api/v1/recipes", unknown, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let no_portions = recipe_body("Cero", "cake", 0, &[(flour, 100.0), (butter, 50.0), (sugar, 10.0)]);
    let response = post_json_auth(app.clone(), "/api/v1/recipes", no_portions, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let zero_qty = recipe_body("Vacia", "cake", 10, &[(flour, 0.0), (butter, 50.0), (sugar, 10.0)]);
    let response = post_json_auth(app, "/api/v1/recipes", zero_qty, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Line editing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_edit_and_remove_lines(pool: PgPool) {
    let token = baker_token(&pool).await;
    let app = common::build_test_app(pool);
    let [flour, butter, sugar, eggs] = seed_inventory(&app, &token).await;
    let recipe = create_recipe(
        app.clone(),
        &token,
        "Galletas",
        "cookie",
        24,
        &[(flour, 100.0), (sugar, 100.0), (butter, 50.0)],
    )
    .await;
    assert_eq!(recipe["cost_recipe"], 16.75);
    let id = recipe["id"].as_i64().unwrap();
    let lines_uri = format!("/api/v1/recipes/{id}/ingredients");

    // Add by exact name with a form-style quantity.
    let body = json!({ "ingredient_name": "Huevo", "quantity_used": "2" });
    let response = post_json_auth(app.clone(), &lines_uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["ingredients"].as_array().unwrap().len(), 4);
    assert_eq!(json["data"]["cost_recipe"], 22.75);

    let body = json!({ "ingredient_id": eggs, "quantity_used": 1 });
    let response = post_json_auth(app.clone(), &lines_uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = json!({ "ingredient_name": "Chocolate", "quantity_used": 1 });
    let response = post_json_auth(app.clone(), &lines_uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json!({ "ingredient_id": 999_999, "quantity_used": 1 });
    let response = post_json_auth(app.clone(), &lines_uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json!({ "ingredient_id": flour, "quantity_used": "mucho" });
    let uri = format!("{lines_uri}/{flour}");
    let response = put_json_auth(app.clone(), &uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(app.clone(), &uri, json!({ "quantity_used": 300 }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["ingredients"][0]["cost_by_quantity_used"], 15.0);
    assert_eq!(json["data"]["cost_recipe"], 32.75);

    let missing = format!("{lines_uri}/999999");
    let response = put_json_auth(app.clone(), &missing, json!({ "quantity_used": 1 }), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.clone(), &format!("{lines_uri}/{eggs}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["cost_recipe"], 26.75);

    // Three lines is the floor.
    let response = delete_auth(app.clone(), &format!("{lines_uri}/{butter}"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(get_auth(app, &format!("/api/v1/recipes/{id}"), &token).await).await;
    assert_eq!(json["data"]["ingredients"].as_array().unwrap().len(), 3);
    assert_eq!(json["data"]["cost_recipe"], 26.75);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete_recipe(pool: PgPool) {
    let token = baker_token(&pool).await;
    let app = common::build_test_app(pool);
    let [flour, butter, sugar, _] = seed_inventory(&app, &token).await;
    let recipe = create_recipe(
        app.clone(),
        &token,
        "Galletas",
        "cookie",
        24,
        &[(flour, 100.0), (sugar, 100.0), (butter, 50.0)],
    )
    .await;
    let uri = format!("/api/v1/recipes/{}", recipe["id"]);

    let body = json!({ "name": "Pastelitos", "recipe_type": "cupcake", "quantity_portions": 12 });
    let response = put_json_auth(app.clone(), &uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Pastelitos");
    assert_eq!(json["data"]["recipe_type"], "cupcake");
    assert_eq!(json["data"]["cost_recipe"], 16.75);

    let response = put_json_auth(app.clone(), &uri, json!({ "name": "   " }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Portion scaling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cake_scales_proportionally(pool: PgPool) {
    let token = baker_token(&pool).await;
    let app = common::build_test_app(pool);
    let [flour, butter, _, eggs] = seed_inventory(&app, &token).await;
    let cake = create_recipe(
        app.clone(),
        &token,
        "Pastel",
        "cake",
        10,
        &[(flour, 200.0), (butter, 100.0), (eggs, 4.0)],
    )
    .await;
    let id = cake["id"].as_i64().unwrap();

    let uri = format!("/api/v1/recipes/{id}/portions?portions=15");
    let response = get_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["policy"], "proportional");
    assert_eq!(json["data"]["factor"], 1.5);
    assert_eq!(json["data"]["ingredients"][0]["quantity_used"], 300.0);
    assert_eq!(json["data"]["ingredients"][2]["quantity_used"], 6.0);
    assert_eq!(json["data"]["cost_recipe"], 55.5);

    // 4 is a batch multiplier, not a cake size.
    let uri = format!("/api/v1/recipes/{id}/portions?portions=4");
    let response = get_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The stored recipe is untouched.
    let json = body_json(get_auth(app, &format!("/api/v1/recipes/{id}"), &token).await).await;
    assert_eq!(json["data"]["cost_recipe"], 37.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cookie_scales_by_multiplier(pool: PgPool) {
    let token = baker_token(&pool).await;
    let app = common::build_test_app(pool);
    let [flour, butter, sugar, _] = seed_inventory(&app, &token).await;
    let cookies = create_recipe(
        app.clone(),
        &token,
        "Galletas",
        "cookie",
        24,
        &[(flour, 100.0), (sugar, 100.0), (butter, 50.0)],
    )
    .await;
    let id = cookies["id"].as_i64().unwrap();

    let uri = format!("/api/v1/recipes/{id}/portions?portions=6");
    let json = body_json(get_auth(app.clone(), &uri, &token).await).await;
    assert_eq!(json["data"]["policy"], "multiplier");
    assert_eq!(json["data"]["factor"], 6.0);
    assert_eq!(json["data"]["base_portions"], 24);
    assert_eq!(json["data"]["ingredients"][0]["quantity_used"], 600.0);
    assert_eq!(json["data"]["cost_recipe"], 100.5);

    let uri = format!("/api/v1/recipes/{id}/portions?portions=15");
    let response = get_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(app, "/api/v1/recipes/999999/portions?portions=2", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Image upload
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_image_upload_and_serving(pool: PgPool) {
    let token = baker_token(&pool).await;
    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_media(pool, media.path().to_path_buf());
    let [flour, butter, sugar, _] = seed_inventory(&app, &token).await;
    let recipe = create_recipe(
        app.clone(),
        &token,
        "Galletas",
        "cookie",
        24,
        &[(flour, 100.0), (sugar, 100.0), (butter, 50.0)],
    )
    .await;
    let id = recipe["id"].as_i64().unwrap();
    let uri = format!("/api/v1/recipes/{id}/image");

    let response = post_multipart_auth(app.clone(), &uri, "image", "galletas.PNG", b"\x89PNG fake", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let expected_url = format!("/media/recipe_images/{id}.png");
    assert_eq!(json["data"]["image_url"], expected_url.as_str());

    let stored = media.path().join(format!("recipe_images/{id}.png"));
    assert_eq!(std::fs::read(&stored).unwrap(), b"\x89PNG fake");
    let response = get(app.clone(), &expected_url).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_multipart_auth(app.clone(), &uri, "image", "animada.gif", b"GIF89a", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let too_big = vec![0_u8; 2048];
    let response = post_multipart_auth(app.clone(), &uri, "image", "grande.jpg", &too_big, &token).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let response = post_multipart_auth(app.clone(), &uri, "photo", "galletas.png", b"x", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Deleting the recipe removes its image.
    let response = delete_auth(app, &format!("/api/v1/recipes/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!stored.exists());
}
