//! Catalog records and the admin product form.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Discount, Price, ProductId};

/// Pseudo-category the admin dashboard uses for "every category".
pub const ALL_CATEGORIES: &str = "Todos";

/// Rating given to products created from the admin dashboard.
const DEFAULT_RATING: f64 = 4.5;

/// Highest price accepted from the admin form, in soles.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    /// Selling price (already discounted).
    pub price: Price,
    /// List price before the discount, when one applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    /// Image URL.
    pub image: String,
    pub rating: f64,
    pub reviews: u32,
    pub in_stock: bool,
    pub featured: bool,
}

/// Per-field validation messages for a submitted form.
///
/// Serializes as a `field -> message` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// An empty set of errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`. The first message per field wins.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_insert_with(|| message.into());
    }

    /// Message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Fields that failed, in alphabetical order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Record an error when `value` is blank.
    pub(crate) fn require(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.insert(field, message);
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

/// Product form submitted from the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub discount: Option<Decimal>,
    pub image: String,
    pub description: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

const fn default_in_stock() -> bool {
    true
}

/// A draft that passed validation, with typed price and discount.
struct ValidDraft {
    price: Price,
    discount: Option<Discount>,
}

impl ProductDraft {
    /// Check every field, collecting all failures.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        self.check().map(|_| ())
    }

    fn check(&self) -> Result<ValidDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.require("name", &self.name, "name is required");
        if self.category.trim().is_empty() || self.category.trim() == ALL_CATEGORIES {
            errors.insert("category", "category is required");
        }
        errors.require("image", &self.image, "image URL is required");
        errors.require("description", &self.description, "description is required");

        let price = if self.price <= Decimal::ZERO {
            errors.insert("price", "price must be a number greater than 0");
            None
        } else if self.price > MAX_PRICE {
            errors.insert("price", format!("price must be at most {MAX_PRICE}"));
            None
        } else {
            Price::new(self.price).ok()
        };

        let discount = match self.discount {
            Some(percent) => match Discount::new(percent) {
                Ok(discount) => Some(discount),
                Err(_) => {
                    errors.insert("discount", "discount must be a number between 0 and 100");
                    None
                }
            },
            None => None,
        };

        errors.into_result()?;
        price.map_or_else(
            || Err(FieldErrors::new()),
            |price| Ok(ValidDraft { price, discount }),
        )
    }

    /// Build a new catalog product with the given id.
    ///
    /// New products start with a 4.5 rating, no reviews and are not featured.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when the draft is invalid.
    pub fn into_product(self, id: ProductId) -> Result<Product, FieldErrors> {
        let valid = self.check()?;
        Ok(Product {
            id,
            name: self.name.trim().to_owned(),
            description: self.description.trim().to_owned(),
            category: self.category.trim().to_owned(),
            price: valid.price,
            original_price: valid
                .discount
                .and_then(|discount| discount.original_price_for(valid.price)),
            discount: valid.discount,
            image: self.image.trim().to_owned(),
            rating: DEFAULT_RATING,
            reviews: 0,
            in_stock: self.in_stock,
            featured: false,
        })
    }

    /// Overwrite the editable fields of `product`.
    ///
    /// Id, rating, reviews and the featured flag are preserved. `product` is
    /// untouched when validation fails.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when the draft is invalid.
    pub fn apply_to(self, product: &mut Product) -> Result<(), FieldErrors> {
        let valid = self.check()?;
        product.name = self.name.trim().to_owned();
        product.description = self.description.trim().to_owned();
        product.category = self.category.trim().to_owned();
        product.price = valid.price;
        product.original_price = valid
            .discount
            .and_then(|discount| discount.original_price_for(valid.price));
        product.discount = valid.discount;
        product.image = self.image.trim().to_owned();
        product.in_stock = self.in_stock;
        Ok(())
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.amount(),
            discount: product.discount.map(|d| d.percent()),
            image: product.image.clone(),
            description: product.description.clone(),
            in_stock: product.in_stock,
        }
    }
}
