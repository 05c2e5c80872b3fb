//! Catalog and order management.
//!
//! Owns the product list and the orders placed at checkout. Every operation
//! is a synchronous update of in-memory state; callers share one instance
//! behind a lock.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use sr_robot_core::catalog::{self, AdminProductQuery};
use sr_robot_core::{
    Cart, Customer, FieldErrors, Order, OrderId, OrderQuery, Price, Product, ProductDraft,
    ProductId,
};

/// Errors from catalog and order operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// A submitted form failed validation.
    #[error("{0}")]
    Invalid(FieldErrors),

    #[error("Cart is empty")]
    EmptyCart,
}

/// Summary figures for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_orders: usize,
    /// Sum of every order total.
    pub total_revenue: Price,
    pub total_products: usize,
    /// Orders still waiting for payment proof.
    pub pending_receipts: usize,
    /// Product count per category.
    pub category_distribution: BTreeMap<String, usize>,
}

/// In-memory catalog and order book.
#[derive(Debug, Clone)]
pub struct StoreService {
    products: Vec<Product>,
    orders: Vec<Order>,
    next_order_id: OrderId,
}

impl StoreService {
    /// Create a store holding `products` and no orders.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            orders: Vec::new(),
            next_order_id: OrderId::FIRST,
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Every product in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ProductNotFound` for unknown ids.
    pub fn product(&self, id: &ProductId) -> Result<&Product, StoreError> {
        self.products
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| StoreError::ProductNotFound(id.clone()))
    }

    /// Distinct categories in catalog order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        catalog::categories(&self.products)
    }

    /// Products for the admin table.
    #[must_use]
    pub fn admin_products(&self, query: &AdminProductQuery) -> Vec<&Product> {
        query.filter(&self.products)
    }

    /// Validate `draft` and append it to the catalog under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Invalid` with per-field messages.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub fn add_product(&mut self, draft: ProductDraft) -> Result<Product, StoreError> {
        let id = self.fresh_product_id();
        let product = draft.into_product(id).map_err(StoreError::Invalid)?;
        info!(product_id = %product.id, "Product created");
        self.products.push(product.clone());
        Ok(product)
    }

    /// Replace the editable fields of an existing product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ProductNotFound` for unknown ids and
    /// `StoreError::Invalid` with per-field messages.
    #[instrument(skip(self, draft))]
    pub fn update_product(
        &mut self,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Product, StoreError> {
        let product = self
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| StoreError::ProductNotFound(id.clone()))?;
        draft.apply_to(product).map_err(StoreError::Invalid)?;
        info!("Product updated");
        Ok(product.clone())
    }

    /// Remove a product from the catalog. Placed orders keep their snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ProductNotFound` for unknown ids.
    #[instrument(skip(self))]
    pub fn delete_product(&mut self, id: &ProductId) -> Result<Product, StoreError> {
        let index = self
            .products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| StoreError::ProductNotFound(id.clone()))?;
        info!("Product deleted");
        Ok(self.products.remove(index))
    }

    fn fresh_product_id(&self) -> ProductId {
        loop {
            let id = ProductId::generate();
            if self.products.iter().all(|p| p.id != id) {
                return id;
            }
        }
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Turn the cart into an order awaiting payment proof.
    ///
    /// The caller clears the cart once the order is placed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EmptyCart` when there is nothing to buy and
    /// `StoreError::Invalid` when customer details are incomplete.
    #[instrument(skip(self, customer, cart), fields(items = cart.total_items()))]
    pub fn place_order(&mut self, customer: Customer, cart: &Cart) -> Result<Order, StoreError> {
        if cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }
        customer.validate().map_err(StoreError::Invalid)?;

        let id = self.next_order_id;
        self.next_order_id = id.next();
        let order = Order::from_cart(id, customer, cart, Utc::now());
        info!(order_id = %order.id, total = %order.total, "Order placed");
        self.orders.push(order.clone());
        Ok(order)
    }

    /// Mark an order's payment proof as received. Confirming twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::OrderNotFound` for unknown ids.
    #[instrument(skip(self))]
    pub fn confirm_receipt(&mut self, id: OrderId) -> Result<Order, StoreError> {
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::OrderNotFound(id))?;
        if order.confirm_receipt() {
            info!("Receipt confirmed");
        }
        Ok(order.clone())
    }

    /// Orders matching `query`, newest first.
    #[must_use]
    pub fn orders(&self, query: &OrderQuery) -> Vec<&Order> {
        query.filter(&self.orders)
    }

    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        let mut category_distribution = BTreeMap::new();
        for product in &self.products {
            *category_distribution
                .entry(product.category.clone())
                .or_insert(0) += 1;
        }

        DashboardStats {
            total_orders: self.orders.len(),
            total_revenue: self.orders.iter().map(|o| o.total).sum(),
            total_products: self.products.len(),
            pending_receipts: self.orders.iter().filter(|o| !o.has_receipt).count(),
            category_distribution,
        }
    }
}
