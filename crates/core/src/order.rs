//! Orders created at checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::product::{FieldErrors, Product};
use crate::types::{Email, OrderId, Price, ReceiptFilter};

/// Contact and delivery details entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    /// National identity document number.
    pub dni: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl Customer {
    /// Check that every field is filled in and the email is well formed.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "name is required");
        errors.require("dni", &self.dni, "DNI is required");
        errors.require("phone", &self.phone, "phone is required");
        errors.require("address", &self.address, "address is required");
        if let Err(e) = Email::parse(&self.email) {
            errors.insert("email", e.to_string());
        }
        errors.into_result()
    }
}

/// A product and quantity captured when the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: Product,
    pub quantity: u32,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    /// Σ price × quantity at the time of purchase.
    pub total: Price,
    /// RFC 3339 timestamp of placement.
    pub date: String,
    /// Whether the admin confirmed the payment proof.
    pub has_receipt: bool,
}

impl Order {
    /// Snapshot `cart` into a new order awaiting payment proof.
    #[must_use]
    pub fn from_cart(id: OrderId, customer: Customer, cart: &Cart, placed_at: DateTime<Utc>) -> Self {
        Self {
            id,
            customer,
            items: cart
                .lines()
                .iter()
                .map(|line| OrderItem {
                    product: line.product.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            total: cart.total_price(),
            date: placed_at.to_rfc3339(),
            has_receipt: false,
        }
    }

    /// Mark the payment proof as received. Returns whether the flag changed.
    pub const fn confirm_receipt(&mut self) -> bool {
        let changed = !self.has_receipt;
        self.has_receipt = true;
        changed
    }

    /// Total units across every item.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// Filters for the admin order table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuery {
    /// Case-insensitive text matched against the customer name, the order
    /// number, or any item's product name.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub receipt: ReceiptFilter,
}

impl OrderQuery {
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        let needle = self.search.to_lowercase();
        let text_ok = needle.is_empty()
            || order.customer.name.to_lowercase().contains(&needle)
            || order.id.to_string().contains(&needle)
            || order
                .items
                .iter()
                .any(|item| item.product.name.to_lowercase().contains(&needle));
        text_ok && self.receipt.accepts(order.has_receipt)
    }

    /// Matching orders, newest first.
    #[must_use]
    pub fn filter<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        let mut listed: Vec<&Order> = orders.iter().filter(|o| self.matches(o)).collect();
        listed.sort_by(|a, b| b.id.cmp(&a.id));
        listed
    }
}
