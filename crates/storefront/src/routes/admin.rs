//! Admin dashboard route handlers.
//!
//! Every handler requires an administrator session via [`RequireAdmin`].
//! Mutations wait out the configured simulated latency before touching state.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use sr_robot_core::catalog::AdminProductQuery;
use sr_robot_core::{
    Order, OrderId, OrderQuery, Product, ProductDraft, ProductId, ReceiptFilter, StockFilter,
};
use tracing::{info, instrument};

use crate::error::Result;
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::middleware::RequireAdmin;
use crate::services::DashboardStats;
use crate::state::AppState;

/// Query parameters for the admin product table.
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilterParams {
    /// Category name, or `Todos` for every category
    pub category: Option<String>,
    /// Text search over product names
    pub search: Option<String>,
    /// `all`, `in-stock` or `out-of-stock`
    pub stock: Option<StockFilter>,
}

impl From<ProductFilterParams> for AdminProductQuery {
    fn from(params: ProductFilterParams) -> Self {
        Self {
            category: params.category,
            search: params.search.unwrap_or_default(),
            stock: params.stock.unwrap_or_default(),
        }
    }
}

/// Query parameters for the admin order table.
#[derive(Debug, Default, Deserialize)]
pub struct OrderFilterParams {
    /// Text search over customer name, order number and item names
    pub q: Option<String>,
    /// `all`, `received` or `missing`
    pub receipt: Option<ReceiptFilter>,
}

impl From<OrderFilterParams> for OrderQuery {
    fn from(params: OrderFilterParams) -> Self {
        Self {
            search: params.q.unwrap_or_default(),
            receipt: params.receipt.unwrap_or_default(),
        }
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Dashboard summary figures.
#[instrument(skip(state, _admin))]
pub async fn stats(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<DashboardStats>> {
    Ok(Json(state.store()?.stats()))
}

// =============================================================================
// Products
// =============================================================================

/// Product table.
#[instrument(skip(state, _admin))]
pub async fn products(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    QueryParams(params): QueryParams<ProductFilterParams>,
) -> Result<Json<Vec<Product>>> {
    let query = AdminProductQuery::from(params);
    let store = state.store()?;
    Ok(Json(
        store.admin_products(&query).into_iter().cloned().collect(),
    ))
}

/// Create a product.
#[instrument(skip(state, admin, draft), fields(admin = %admin.0.email))]
pub async fn create_product(
    State(state): State<AppState>,
    admin: RequireAdmin,
    JsonBody(draft): JsonBody<ProductDraft>,
) -> Result<(StatusCode, Json<Product>)> {
    state.simulate_latency().await;
    let product = state.store_mut()?.add_product(draft)?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Edit a product.
#[instrument(skip(state, admin, draft), fields(admin = %admin.0.email))]
pub async fn update_product(
    State(state): State<AppState>,
    admin: RequireAdmin,
    PathParam(id): PathParam<String>,
    JsonBody(draft): JsonBody<ProductDraft>,
) -> Result<Json<Product>> {
    state.simulate_latency().await;
    let product = state.update_product(&ProductId::new(id), draft)?;
    Ok(Json(product))
}

/// Delete a product.
#[instrument(skip(state, admin), fields(admin = %admin.0.email))]
pub async fn delete_product(
    State(state): State<AppState>,
    admin: RequireAdmin,
    PathParam(id): PathParam<String>,
) -> Result<StatusCode> {
    state.simulate_latency().await;
    let product = state.delete_product(&ProductId::new(id))?;
    info!(product_id = %product.id, name = %product.name, "Product removed from catalog");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Orders
// =============================================================================

/// Order table, newest first.
#[instrument(skip(state, _admin))]
pub async fn orders(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    QueryParams(params): QueryParams<OrderFilterParams>,
) -> Result<Json<Vec<Order>>> {
    let query = OrderQuery::from(params);
    let store = state.store()?;
    Ok(Json(store.orders(&query).into_iter().cloned().collect()))
}

/// Confirm that an order's payment proof was received.
#[instrument(skip(state, admin), fields(admin = %admin.0.email))]
pub async fn confirm_receipt(
    State(state): State<AppState>,
    admin: RequireAdmin,
    PathParam(id): PathParam<u64>,
) -> Result<Json<Order>> {
    state.simulate_latency().await;
    let order = state.store_mut()?.confirm_receipt(OrderId::new(id))?;
    Ok(Json(order))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_filter_defaults() {
        let query = AdminProductQuery::from(ProductFilterParams::default());
        assert_eq!(query, AdminProductQuery::default());
    }

    #[test]
    fn test_order_filter_mapping() {
        let query = OrderQuery::from(OrderFilterParams {
            q: Some("ana".to_string()),
            receipt: Some(ReceiptFilter::Missing),
        });
        assert_eq!(query.search, "ana");
        assert_eq!(query.receipt, ReceiptFilter::Missing);
    }
}
