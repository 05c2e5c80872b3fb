//! Cart aggregation and the favorites set.

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{Price, ProductId};

/// One product and how many units of it are in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    /// Always at least 1; a line reaching 0 is removed.
    pub quantity: u32,
}

impl CartLine {
    /// Price of the whole line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The shopper's cart.
///
/// Holds at most one line per product id, in the order products were first
/// added. Stock is not checked here: the cart accepts sold-out products.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity held for `product_id`, if the product is in the cart.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> Option<u32> {
        self.line(product_id).map(|line| line.quantity)
    }

    fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product.id == product_id)
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| &line.product.id == product_id)
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line, or appends a new line with quantity 1.
    pub fn add_to_cart(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            });
        }
    }

    /// Set the quantity of a line; zero or less removes it.
    ///
    /// Unknown product ids are ignored.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(product_id);
            return;
        }
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.product.id != product_id);
        self.lines.len() != before
    }

    pub fn clear_cart(&mut self) {
        self.lines.clear();
    }

    /// Sum of quantities over every line.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of price × quantity over every line, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Refresh the snapshot of `product` after a catalog edit.
    pub fn sync_product(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(&product.id) {
            line.product = product.clone();
        }
    }
}

/// Products the shopper marked as favorites.
///
/// A set keyed by product id, in insertion order. No quantities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Favorites {
    items: Vec<Product>,
}

impl Favorites {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|p| &p.id == product_id)
    }

    /// Add `product` unless already present. Returns whether it was added.
    pub fn add(&mut self, product: &Product) -> bool {
        if self.contains(&product.id) {
            return false;
        }
        self.items.push(product.clone());
        true
    }

    /// Remove `product_id`. Returns whether it was present.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|p| &p.id != product_id);
        self.items.len() != before
    }

    /// Flip membership of `product`. Returns whether it is now a favorite.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.remove(&product.id) {
            false
        } else {
            self.items.push(product.clone());
            true
        }
    }

    /// Refresh the snapshot of `product` after a catalog edit.
    pub fn sync_product(&mut self, product: &Product) {
        if let Some(existing) = self.items.iter_mut().find(|p| p.id == product.id) {
            *existing = product.clone();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: &str, price: Decimal, in_stock: bool) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Producto {id}"),
            description: String::new(),
            category: "Accesorios".to_string(),
            price: Price::new(price).unwrap(),
            original_price: None,
            discount: None,
            image: String::new(),
            rating: 4.0,
            reviews: 0,
            in_stock,
            featured: false,
        }
    }

    #[test]
    fn test_add_twice_increments_single_line() {
        let mouse = product("1", Decimal::from(20), true);
        let mut cart = Cart::new();
        cart.add_to_cart(&mouse);
        cart.add_to_cart(&mouse);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(&mouse.id), Some(2));
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_total_price_saturates_on_huge_lines() {
        let huge = product("1", "70000000000000000000000000000".parse().unwrap(), true);
        let mut cart = Cart::new();
        cart.add_to_cart(&huge);
        cart.add_to_cart(&huge);
        cart.add_to_cart(&product("2", Decimal::from(20), true));
        assert_eq!(cart.total_price().amount(), Decimal::MAX);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mouse = product("1", Decimal::from(20), true);
        let mut cart = Cart::new();
        cart.add_to_cart(&mouse);
        cart.update_quantity(&mouse.id, 0);
        assert!(cart.is_empty());

        cart.add_to_cart(&mouse);
        cart.update_quantity(&mouse.id, -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_sets_and_ignores_unknown() {
        let mouse = product("1", Decimal::from(20), true);
        let mut cart = Cart::new();
        cart.add_to_cart(&mouse);
        cart.update_quantity(&mouse.id, 5);
        cart.update_quantity(&ProductId::new("missing"), 7);
        assert_eq!(cart.quantity_of(&mouse.id), Some(5));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_remove_from_cart() {
        let mouse = product("1", Decimal::from(20), true);
        let mut cart = Cart::new();
        cart.add_to_cart(&mouse);
        assert!(cart.remove_from_cart(&mouse.id));
        assert!(!cart.remove_from_cart(&mouse.id));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals() {
        let mouse = product("1", "19.90".parse().unwrap(), true);
        let keyboard = product("2", Decimal::from(50), true);
        let mut cart = Cart::new();
        cart.add_to_cart(&mouse);
        cart.add_to_cart(&keyboard);
        cart.update_quantity(&mouse.id, 3);

        let expected: Decimal = cart
            .lines()
            .iter()
            .map(|l| l.product.price.amount() * Decimal::from(l.quantity))
            .sum();
        assert_eq!(cart.total_price().amount(), expected);
        assert_eq!(cart.total_price().amount(), "109.70".parse::<Decimal>().unwrap());
        assert_eq!(cart.total_items(), 4);

        cart.clear_cart();
        assert_eq!(cart.total_price(), Price::ZERO);
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_out_of_stock_products_are_accepted() {
        let keyboard = product("2", Decimal::from(50), false);
        let mut cart = Cart::new();
        cart.add_to_cart(&keyboard);
        assert_eq!(cart.quantity_of(&keyboard.id), Some(1));
    }

    #[test]
    fn test_sync_product_refreshes_line_price() {
        let mut mouse = product("1", Decimal::from(20), true);
        let mut cart = Cart::new();
        cart.add_to_cart(&mouse);
        cart.update_quantity(&mouse.id, 2);
        mouse.price = Price::from_units(15);
        cart.sync_product(&mouse);
        assert_eq!(cart.total_price(), Price::from_units(30));
    }

    #[test]
    fn test_favorites_toggle_twice_restores() {
        let mouse = product("1", Decimal::from(20), true);
        let keyboard = product("2", Decimal::from(50), true);
        let mut favorites = Favorites::new();
        favorites.add(&keyboard);
        let before = favorites.clone();

        assert!(favorites.toggle(&mouse));
        assert!(favorites.contains(&mouse.id));
        assert!(!favorites.toggle(&mouse));
        assert_eq!(favorites, before);
    }

    #[test]
    fn test_favorites_dedup() {
        let mouse = product("1", Decimal::from(20), true);
        let mut favorites = Favorites::new();
        assert!(favorites.add(&mouse));
        assert!(!favorites.add(&mouse));
        assert_eq!(favorites.len(), 1);
        assert!(favorites.remove(&mouse.id));
        assert!(favorites.is_empty());
    }
}
