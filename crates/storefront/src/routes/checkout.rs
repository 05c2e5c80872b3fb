//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use sr_robot_core::{Customer, Order};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::extract::JsonBody;
use crate::state::AppState;

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub customer: Customer,
}

/// Place an order for the current cart and empty it.
///
/// The order waits for the shopper's payment proof; an admin confirms it
/// from the dashboard.
#[instrument(skip(state, form))]
pub async fn place_order(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<CheckoutForm>,
) -> Result<(StatusCode, Json<Order>)> {
    let mut store = state.store_mut()?;
    let mut session = state.session()?;

    let order = store.place_order(form.customer, &session.cart)?;
    session.cart.clear_cart();

    let order_id = order.id.to_string();
    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order_id.as_str())]));
    Ok((StatusCode::CREATED, Json(order)))
}
