//! Catalog inspection.
//!
//! # Usage
//!
//! ```bash
//! # Everything, by name
//! sr-cli catalog
//!
//! # In-stock audio gear, most expensive first
//! sr-cli catalog --category Audio --in-stock --sort price-high
//!
//! # Text search with a price window
//! sr-cli catalog --query usb --min-price 20 --max-price 150
//! ```

use rust_decimal::Decimal;
use sr_robot_core::{CatalogQuery, Product, SortKey, filter_and_sort};
use sr_robot_storefront::seed;

/// Filters accepted by the `catalog` command.
#[derive(Debug, Default)]
pub struct CatalogArgs {
    pub query: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock: bool,
    pub sort: SortKey,
}

impl CatalogArgs {
    fn catalog_query(&self) -> CatalogQuery {
        CatalogQuery {
            query: self.query.clone().unwrap_or_default(),
            category: self.category.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            in_stock_only: self.in_stock,
        }
    }
}

/// List the seed catalog through the storefront filter.
pub fn run(args: &CatalogArgs) {
    let products = seed::catalog();
    let listed = filter_and_sort(&products, &args.catalog_query(), args.sort);
    tracing::debug!(matched = listed.len(), total = products.len(), "Catalog filtered");

    for line in render(&listed) {
        print_line(&line);
    }
}

/// Format one row per product plus a summary line.
fn render(products: &[&Product]) -> Vec<String> {
    let mut lines: Vec<String> = products
        .iter()
        .map(|p| {
            let stock = if p.in_stock { "en stock" } else { "agotado" };
            format!(
                "{:>4}  {:<32} {:<12} {:>10}  {:>3.1}  {stock}",
                p.id.as_str(),
                p.name,
                p.category,
                p.price.display(),
                p.rating,
            )
        })
        .collect();
    lines.push(format!("{} product(s)", products.len()));
    lines
}

#[allow(clippy::print_stdout)]
fn print_line(line: &str) {
    println!("{line}");
}
