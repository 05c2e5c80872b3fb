//! Integration tests for the admin dashboard, checkout and receipts.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use sr_robot_integration_tests::TestApp;

fn new_product() -> Value {
    json!({
        "name": "Micrófono USB",
        "category": "Audio",
        "price": "120",
        "discount": "25",
        "image": "https://img.srrobot.com/products/mic.jpg",
        "description": "Condensador cardioide para streaming",
        "inStock": true
    })
}

fn customer() -> Value {
    json!({
        "name": "Ana Torres",
        "dni": "45678912",
        "email": "ana@correo.pe",
        "phone": "987654321",
        "address": "Av. Arequipa 123, Lima"
    })
}

async fn place_order(app: &TestApp, product_id: &str) -> Value {
    app.post("/api/cart/items", json!({ "productId": product_id }))
        .await;
    let resp = app
        .post("/api/checkout", json!({ "customer": customer() }))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    resp.body
}

// ============================================================================
// Guard
// ============================================================================

#[tokio::test]
async fn test_anonymous_is_unauthorized() {
    let app = TestApp::new();
    assert_eq!(
        app.get("/api/admin/stats").await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.post("/api/admin/products", new_product()).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_shopper_is_forbidden() {
    let app = TestApp::new();
    app.login_shopper().await;
    assert_eq!(
        app.get("/api/admin/orders").await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.delete("/api/admin/products/1").await.status,
        StatusCode::FORBIDDEN
    );
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_create_product() {
    let app = TestApp::new();
    app.login_admin().await;

    let resp = app.post("/api/admin/products", new_product()).await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["rating"], 4.5);
    assert_eq!(resp.body["reviews"], 0);
    assert_eq!(resp.body["featured"], false);
    assert_eq!(resp.body["originalPrice"], "160");

    let id = resp.body["id"].as_str().unwrap();
    let detail = app.get(&format!("/api/products/{id}")).await;
    assert_eq!(detail.body["name"], "Micrófono USB");
    assert_eq!(app.get("/api/products").await.body["total"], 13);
}

#[tokio::test]
async fn test_invalid_product_lists_fields() {
    let app = TestApp::new();
    app.login_admin().await;

    let resp = app
        .post(
            "/api/admin/products",
            json!({
                "name": "",
                "category": "Todos",
                "price": "0",
                "discount": "150",
                "image": "",
                "description": ""
            }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.body["error"], "Validation failed");
    let fields = resp.body["fields"].as_object().unwrap();
    for field in ["name", "category", "price", "discount", "image", "description"] {
        assert!(fields.contains_key(field), "missing {field}");
    }
    assert_eq!(app.get("/api/products").await.body["total"], 12);
}

#[tokio::test]
async fn test_oversized_price_is_rejected_and_session_survives() {
    let app = TestApp::new();
    app.login_admin().await;

    let mut product = new_product();
    product["price"] = json!("70000000000000000000000000000");
    let resp = app.post("/api/admin/products", product).await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.body["fields"]["price"], "price must be at most 1000000");

    let mut product = new_product();
    product["price"] = json!("1000000");
    product["discount"] = Value::Null;
    let created = app.post("/api/admin/products", product).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_str().unwrap().to_owned();

    app.post("/api/cart/items", json!({ "productId": id })).await;
    let cart = app.post("/api/cart/items", json!({ "productId": id })).await;
    assert_eq!(cart.status, StatusCode::OK);
    assert_eq!(cart.body["totalPrice"], "2000000");
    assert_eq!(app.get("/api/auth/me").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_product_keeps_rating_and_refreshes_cart() {
    let app = TestApp::new();
    app.login_admin().await;
    app.post("/api/cart/items", json!({ "productId": "3" })).await;

    let resp = app
        .request(
            Method::PUT,
            "/api/admin/products/3",
            Some(json!({
                "name": "Mouse Gamer RGB v2",
                "category": "Mouse",
                "price": "79",
                "image": "https://img.srrobot.com/products/3.jpg",
                "description": "Ahora con 26000 DPI",
                "inStock": false
            })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["rating"], 4.7);
    assert_eq!(resp.body["featured"], true);
    assert_eq!(resp.body["inStock"], false);
    assert!(resp.body.get("originalPrice").is_none());

    let cart = app.get("/api/cart").await;
    assert_eq!(cart.body["items"][0]["product"]["name"], "Mouse Gamer RGB v2");
    assert_eq!(cart.body["totalPrice"], "79");
}

#[tokio::test]
async fn test_delete_product_cascades() {
    let app = TestApp::new();
    app.login_admin().await;
    app.post("/api/cart/items", json!({ "productId": "5" })).await;
    app.post("/api/favorites/5/toggle", json!({})).await;

    let resp = app.delete("/api/admin/products/5").await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get("/api/products/5").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/api/cart").await.body["totalItems"], 0);
    assert_eq!(app.get("/api/favorites").await.body["count"], 0);

    let again = app.delete("/api/admin/products/5").await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_product_filters() {
    let app = TestApp::new();
    app.login_admin().await;

    let sold_out = app.get("/api/admin/products?stock=out-of-stock").await;
    let ids: Vec<&str> = sold_out.body.as_array().unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["4", "9"]);

    let search = app
        .get("/api/admin/products?category=Todos&search=teclado")
        .await;
    assert_eq!(search.body.as_array().unwrap().len(), 2);
}

// ============================================================================
// Checkout and Orders
// ============================================================================

#[tokio::test]
async fn test_checkout_places_order_and_clears_cart() {
    let app = TestApp::new();
    let order = place_order(&app, "7").await;
    assert_eq!(order["id"], 1);
    assert_eq!(order["total"], "29");
    assert_eq!(order["hasReceipt"], false);
    assert_eq!(app.get("/api/cart").await.body["totalItems"], 0);

    let second = place_order(&app, "12").await;
    assert_eq!(second["id"], 2);
}

#[tokio::test]
async fn test_checkout_rejects_empty_cart_and_bad_customer() {
    let app = TestApp::new();
    let empty = app
        .post("/api/checkout", json!({ "customer": customer() }))
        .await;
    assert_eq!(empty.status, StatusCode::CONFLICT);

    app.post("/api/cart/items", json!({ "productId": "7" })).await;
    let mut bad = customer();
    bad["email"] = json!("sin-arroba");
    let resp = app.post("/api/checkout", json!({ "customer": bad })).await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.body["fields"].get("email").is_some());
    assert_eq!(app.get("/api/cart").await.body["totalItems"], 1);
}

#[tokio::test]
async fn test_confirm_receipt_is_idempotent() {
    let app = TestApp::new();
    place_order(&app, "7").await;
    app.login_admin().await;

    let missing = app.get("/api/admin/orders?receipt=missing").await;
    assert_eq!(missing.body.as_array().unwrap().len(), 1);

    for _ in 0..2 {
        let resp = app
            .post("/api/admin/orders/1/confirm-receipt", json!({}))
            .await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["hasReceipt"], true);
    }

    let received = app.get("/api/admin/orders?receipt=received").await;
    assert_eq!(received.body.as_array().unwrap().len(), 1);

    let unknown = app
        .post("/api/admin/orders/99/confirm-receipt", json!({}))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_search_newest_first() {
    let app = TestApp::new();
    place_order(&app, "7").await;
    place_order(&app, "1").await;
    app.login_admin().await;

    let all = app.get("/api/admin/orders").await;
    let ids: Vec<u64> = all.body.as_array().unwrap()
        .iter()
        .map(|o| o["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 1]);

    let by_item = app.get("/api/admin/orders?q=cable").await;
    assert_eq!(by_item.body.as_array().unwrap().len(), 1);
    assert_eq!(by_item.body[0]["id"], 1);
}

#[tokio::test]
async fn test_stats() {
    let app = TestApp::new();
    place_order(&app, "7").await;
    place_order(&app, "12").await;
    app.login_admin().await;

    let resp = app.get("/api/admin/stats").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["totalOrders"], 2);
    assert_eq!(resp.body["totalRevenue"], "98");
    assert_eq!(resp.body["totalProducts"], 12);
    assert_eq!(resp.body["pendingReceipts"], 2);
    assert_eq!(resp.body["categoryDistribution"]["Audio"], 2);
}
