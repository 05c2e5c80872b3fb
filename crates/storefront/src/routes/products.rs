//! Catalog route handlers.

use axum::{
    Json,
    extract::State,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sr_robot_core::{CatalogQuery, Product, ProductId, SortKey, filter_and_sort};
use tracing::instrument;

use crate::error::Result;
use crate::extract::{PathParam, QueryParams};
use crate::state::AppState;

/// Query parameters for the catalog listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsParams {
    /// Text search over name and description
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Only list products in stock
    pub in_stock: Option<bool>,
    /// `name`, `price-low`, `price-high` or `rating`; anything else sorts by name
    pub sort: Option<String>,
}

impl ProductsParams {
    fn catalog_query(&self) -> CatalogQuery {
        CatalogQuery {
            query: self.q.clone().unwrap_or_default(),
            category: self.category.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            in_stock_only: self.in_stock.unwrap_or(false),
        }
    }

    fn sort_key(&self) -> SortKey {
        self.sort
            .as_deref()
            .map(SortKey::parse_or_default)
            .unwrap_or_default()
    }
}

/// Catalog listing response.
#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub total: usize,
    pub sort: SortKey,
}

/// Filtered and sorted catalog.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ProductsParams>,
) -> Result<Json<ProductList>> {
    let query = params.catalog_query();
    let sort = params.sort_key();

    let store = state.store()?;
    let products: Vec<Product> = filter_and_sort(store.products(), &query, sort)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ProductList {
        total: products.len(),
        products,
        sort,
    }))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Json<Product>> {
    let store = state.store()?;
    let product = store.product(&ProductId::new(id))?;
    Ok(Json(product.clone()))
}

/// Distinct categories in catalog order.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let store = state.store()?;
    Ok(Json(
        store.categories().into_iter().map(String::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_map_to_catalog_query() {
        let params = ProductsParams {
            q: Some("mouse".to_string()),
            min_price: Some(Decimal::from(10)),
            in_stock: Some(true),
            sort: Some("price-high".to_string()),
            ..ProductsParams::default()
        };
        let query = params.catalog_query();
        assert_eq!(query.query, "mouse");
        assert_eq!(query.min_price, Some(Decimal::from(10)));
        assert!(query.max_price.is_none());
        assert!(query.in_stock_only);
        assert_eq!(params.sort_key(), SortKey::PriceHigh);
    }

    #[test]
    fn test_unknown_sort_falls_back_to_name() {
        let params = ProductsParams {
            sort: Some("popular".to_string()),
            ..ProductsParams::default()
        };
        assert_eq!(params.sort_key(), SortKey::Name);
        assert_eq!(ProductsParams::default().sort_key(), SortKey::Name);
    }
}
