//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! GET    /api/products                  - Filtered, sorted listing
//! GET    /api/products/{id}             - Product detail
//! GET    /api/categories                - Category list
//!
//! # Cart
//! GET    /api/cart                      - Cart contents and totals
//! DELETE /api/cart                      - Empty the cart
//! POST   /api/cart/items                - Add one unit ({productId})
//! PATCH  /api/cart/items/{id}           - Set quantity ({quantity})
//! DELETE /api/cart/items/{id}           - Remove a line
//!
//! # Favorites
//! GET    /api/favorites                 - Favorites list
//! POST   /api/favorites/{id}/toggle     - Toggle a favorite
//! DELETE /api/favorites/{id}            - Remove a favorite
//!
//! # Auth
//! POST   /api/auth/login                - Sign in
//! POST   /api/auth/register             - Create account and sign in
//! POST   /api/auth/logout               - Sign out
//! GET    /api/auth/me                   - Current session
//!
//! # Checkout
//! POST   /api/checkout                  - Place order from cart
//!
//! # Admin (requires admin session)
//! GET    /api/admin/stats               - Dashboard figures
//! GET    /api/admin/products            - Product table
//! POST   /api/admin/products            - Create product
//! PUT    /api/admin/products/{id}       - Edit product
//! DELETE /api/admin/products/{id}       - Delete product
//! GET    /api/admin/orders              - Order table
//! POST   /api/admin/orders/{id}/confirm-receipt - Confirm payment proof
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(products::categories))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", patch(cart::update).delete(cart::remove))
}

/// Create the favorites routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::favorites))
        .route("/{id}", delete(cart::remove_favorite))
        .route("/{id}/toggle", post(cart::toggle_favorite))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::stats))
        .route(
            "/products",
            get(admin::products).post(admin::create_product),
        )
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/orders", get(admin::orders))
        .route(
            "/orders/{id}/confirm-receipt",
            post(admin::confirm_receipt),
        )
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .merge(product_routes())
        .nest("/cart", cart_routes())
        .nest("/favorites", favorite_routes())
        .nest("/auth", auth_routes())
        .route("/checkout", post(checkout::place_order))
        .nest("/admin", admin_routes());

    Router::new().nest("/api", api)
}
