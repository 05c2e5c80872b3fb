//! Cart and favorites route handlers.
//!
//! Every mutation answers with the full resulting cart (or favorites list) so
//! the client can re-render its badge and totals from one response.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use sr_robot_core::{Cart, Favorites, Price, Product, ProductId};
use tracing::{debug, instrument};

use crate::error::{Result, add_breadcrumb};
use crate::extract::{JsonBody, PathParam};
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// One cart line as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Price,
}

/// Cart contents and totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total_items: u64,
    pub total_price: Price,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartLineView {
                    product: line.product.clone(),
                    quantity: line.quantity,
                    line_total: line.line_total(),
                })
                .collect(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }
}

/// Favorites list.
#[derive(Debug, Serialize)]
pub struct FavoritesView {
    pub items: Vec<Product>,
    pub count: usize,
}

impl From<&Favorites> for FavoritesView {
    fn from(favorites: &Favorites) -> Self {
        Self {
            items: favorites.items().to_vec(),
            count: favorites.len(),
        }
    }
}

/// Result of toggling a favorite.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    /// Whether the product is now a favorite.
    pub favorite: bool,
    #[serde(flatten)]
    pub favorites: FavoritesView,
}

// =============================================================================
// Request Bodies
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartForm {
    pub product_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityForm {
    /// New quantity; zero or less removes the line.
    pub quantity: i64,
}

// =============================================================================
// Cart Handlers
// =============================================================================

/// Current cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<CartView>> {
    let session = state.session()?;
    Ok(Json(CartView::from(&session.cart)))
}

/// Add one unit of a product.
///
/// Sold-out products are accepted; stock is only shown, never enforced.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<AddToCartForm>,
) -> Result<Json<CartView>> {
    let product_id = ProductId::new(form.product_id);
    let cart = state.add_to_cart(&product_id)?;

    debug!(product_id = %product_id, total_items = cart.total_items(), "Added to cart");
    add_breadcrumb("cart", "Added product", Some(&[("product_id", product_id.as_str())]));

    Ok(Json(CartView::from(&cart)))
}

/// Set the quantity of a line.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
    JsonBody(form): JsonBody<UpdateQuantityForm>,
) -> Result<Json<CartView>> {
    let mut session = state.session()?;
    session
        .cart
        .update_quantity(&ProductId::new(id), form.quantity);
    Ok(Json(CartView::from(&session.cart)))
}

/// Remove a line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Json<CartView>> {
    let mut session = state.session()?;
    session.cart.remove_from_cart(&ProductId::new(id));
    Ok(Json(CartView::from(&session.cart)))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartView>> {
    let mut session = state.session()?;
    session.cart.clear_cart();
    Ok(Json(CartView::from(&session.cart)))
}

// =============================================================================
// Favorites Handlers
// =============================================================================

/// Current favorites.
#[instrument(skip(state))]
pub async fn favorites(State(state): State<AppState>) -> Result<Json<FavoritesView>> {
    let session = state.session()?;
    Ok(Json(FavoritesView::from(&session.favorites)))
}

/// Flip a product's favorite flag.
#[instrument(skip(state))]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Json<ToggleResponse>> {
    let (favorite, favorites) = state.toggle_favorite(&ProductId::new(id))?;
    Ok(Json(ToggleResponse {
        favorite,
        favorites: FavoritesView::from(&favorites),
    }))
}

/// Remove a favorite. Unknown ids are ignored.
#[instrument(skip(state))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Json<FavoritesView>> {
    let mut session = state.session()?;
    session.favorites.remove(&ProductId::new(id));
    Ok(Json(FavoritesView::from(&session.favorites)))
}
