//! Catalog filtering and sorting.
//!
//! The storefront listing is a derived view: the full product list run
//! through a [`CatalogQuery`] and ordered by a [`SortKey`]. Both operations
//! are pure and recomputed whenever an input changes.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::{ALL_CATEGORIES, Product};
use crate::types::StockFilter;

/// Ordering applied to the storefront listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Name ascending, ignoring case and accents.
    #[default]
    Name,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Best rated first.
    Rating,
}

impl SortKey {
    /// Parse a sort key, falling back to [`SortKey::Name`] for unknown input.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::PriceLow => write!(f, "price-low"),
            Self::PriceHigh => write!(f, "price-high"),
            Self::Rating => write!(f, "rating"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "rating" => Ok(Self::Rating),
            _ => Err(format!("invalid sort key: {s}")),
        }
    }
}

/// Shopper-selected filters for the storefront listing.
///
/// Every set filter must hold for a product to be listed. Unset filters
/// (`None`, empty query, `in_stock_only == false`) accept everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive text matched against name or description.
    #[serde(default)]
    pub query: String,
    /// Exact category; `None` or empty lists every category.
    #[serde(default)]
    pub category: Option<String>,
    /// Inclusive lower price bound.
    #[serde(default)]
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    #[serde(default)]
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub in_stock_only: bool,
}

impl CatalogQuery {
    /// Whether `product` satisfies every active filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_text(product)
            && self.matches_category(product)
            && self.matches_price(product)
            && (!self.in_stock_only || product.in_stock)
    }

    fn matches_text(&self, product: &Product) -> bool {
        let needle = self.query.to_lowercase();
        needle.is_empty()
            || product.name.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle)
    }

    fn matches_category(&self, product: &Product) -> bool {
        match self.category.as_deref() {
            None | Some("") => true,
            Some(category) => product.category == category,
        }
    }

    fn matches_price(&self, product: &Product) -> bool {
        let price = product.price.amount();
        self.min_price.is_none_or(|min| price >= min) && self.max_price.is_none_or(|max| price <= max)
    }
}

/// Filter `products` with `query` and order the survivors by `sort`.
///
/// The sort is stable: ties under `sort` fall back to name order, and
/// products that also share a name keep their catalog order.
#[must_use]
pub fn filter_and_sort<'a>(
    products: &'a [Product],
    query: &CatalogQuery,
    sort: SortKey,
) -> Vec<&'a Product> {
    let mut listed: Vec<&Product> = products.iter().filter(|p| query.matches(p)).collect();
    listed.sort_by(|a, b| compare(a, b, sort));
    listed
}

/// Compare two products under `sort`, breaking ties by name.
#[must_use]
pub fn compare(a: &Product, b: &Product, sort: SortKey) -> Ordering {
    let primary = match sort {
        SortKey::Name => Ordering::Equal,
        SortKey::PriceLow => a.price.cmp(&b.price),
        SortKey::PriceHigh => b.price.cmp(&a.price),
        SortKey::Rating => b.rating.total_cmp(&a.rating),
    };
    primary.then_with(|| compare_names(&a.name, &b.name))
}

/// Locale-aware name comparison.
///
/// Names are compared on their folded form first (lowercase, Spanish and
/// Portuguese accents removed) so "Árbol" sorts next to "arena"; the raw
/// strings only decide between names that fold to the same key.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Fold `s` for comparison: lowercase and strip common Latin diacritics.
///
/// `ñ` folds to `n` followed by a marker that sorts after every letter, so
/// "nu" < "ña" < "o" as in Spanish dictionaries.
#[must_use]
pub fn collation_key(s: &str) -> String {
    let mut key = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' => key.push('a'),
            'é' | 'è' | 'ê' | 'ë' => key.push('e'),
            'í' | 'ì' | 'î' | 'ï' => key.push('i'),
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' => key.push('o'),
            'ú' | 'ù' | 'û' | 'ü' => key.push('u'),
            'ç' => key.push('c'),
            'ñ' => {
                key.push('n');
                key.push('\u{10FFFF}');
            }
            other => key.push(other),
        }
    }
    key
}

/// Distinct categories in first-seen catalog order.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for product in products {
        if !seen.contains(&product.category.as_str()) {
            seen.push(&product.category);
        }
    }
    seen
}

/// Filters for the admin product table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProductQuery {
    /// Category, or `None`/`"Todos"` for every category.
    #[serde(default)]
    pub category: Option<String>,
    /// Case-insensitive text matched against the product name only.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub stock: StockFilter,
}

impl AdminProductQuery {
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = match self.category.as_deref() {
            None | Some("" | ALL_CATEGORIES) => true,
            Some(category) => product.category == category,
        };
        category_ok
            && product
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase())
            && self.stock.accepts(product.in_stock)
    }

    /// Matching products in catalog order.
    #[must_use]
    pub fn filter<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Price, ProductId};

    fn product(id: &str, name: &str, category: &str, price: u32, in_stock: bool) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: format!("{name} de alta calidad"),
            category: category.to_string(),
            price: Price::from_units(price),
            original_price: None,
            discount: None,
            image: format!("https://img.srrobot.com/{id}.jpg"),
            rating: 4.0,
            reviews: 10,
            in_stock,
            featured: false,
        }
    }

    fn example_catalog() -> Vec<Product> {
        vec![
            product("1", "Mouse", "Mouse", 20, true),
            product("2", "Teclado", "Teclados", 50, false),
        ]
    }

    fn names(list: &[&Product]) -> Vec<String> {
        list.iter().map(|p| p.name.clone()).collect()
    }

    fn sample_catalog() -> Vec<Product> {
        let mut catalog = vec![
            product("a", "Audífonos Pro", "Audio", 120, true),
            product("b", "Cable USB-C", "Cables", 15, true),
            product("c", "Mouse Inalámbrico", "Mouse", 45, false),
            product("d", "Teclado Mecánico", "Teclados", 250, true),
            product("e", "Parlante Bluetooth", "Audio", 90, true),
            product("f", "Ñandú Mousepad", "Mouse", 25, true),
            product("g", "Hub USB", "Cables", 45, true),
        ];
        catalog[0].rating = 4.8;
        catalog[1].rating = 3.9;
        catalog[3].rating = 4.8;
        catalog[4].rating = 4.1;
        catalog
    }

    #[test]
    fn test_example_in_stock_only() {
        let catalog = example_catalog();
        let query = CatalogQuery {
            in_stock_only: true,
            ..CatalogQuery::default()
        };
        let listed = filter_and_sort(&catalog, &query, SortKey::Name);
        assert_eq!(names(&listed), vec!["Mouse"]);
    }

    #[test]
    fn test_example_price_high() {
        let catalog = example_catalog();
        let listed = filter_and_sort(&catalog, &CatalogQuery::default(), SortKey::PriceHigh);
        assert_eq!(names(&listed), vec!["Teclado", "Mouse"]);
    }

    #[test]
    fn test_text_query_matches_name_or_description_case_insensitively() {
        let mut catalog = sample_catalog();
        catalog[1].description = "Carga rápida para tu MOUSE".to_string();
        let query = CatalogQuery {
            query: "mouse".to_string(),
            ..CatalogQuery::default()
        };
        let listed = filter_and_sort(&catalog, &query, SortKey::Name);
        assert_eq!(
            names(&listed),
            vec!["Cable USB-C", "Mouse Inalámbrico", "Ñandú Mousepad"]
        );
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let catalog = sample_catalog();
        let query = CatalogQuery {
            min_price: Some(Decimal::from(25)),
            max_price: Some(Decimal::from(90)),
            ..CatalogQuery::default()
        };
        let listed = filter_and_sort(&catalog, &query, SortKey::PriceLow);
        assert_eq!(
            names(&listed),
            vec![
                "Ñandú Mousepad",
                "Hub USB",
                "Mouse Inalámbrico",
                "Parlante Bluetooth"
            ]
        );
    }

    #[test]
    fn test_filter_is_exact_partition() {
        let catalog = sample_catalog();
        let queries = [
            CatalogQuery::default(),
            CatalogQuery {
                category: Some("Audio".to_string()),
                ..CatalogQuery::default()
            },
            CatalogQuery {
                query: "usb".to_string(),
                in_stock_only: true,
                max_price: Some(Decimal::from(20)),
                ..CatalogQuery::default()
            },
            CatalogQuery {
                category: Some("Mouse".to_string()),
                in_stock_only: true,
                ..CatalogQuery::default()
            },
        ];

        for query in &queries {
            let listed = filter_and_sort(&catalog, query, SortKey::Rating);
            for p in &catalog {
                let included = listed.iter().any(|l| l.id == p.id);
                assert_eq!(included, query.matches(p), "{query:?} / {}", p.name);
            }
        }
    }

    #[test]
    fn test_empty_category_means_all() {
        let catalog = sample_catalog();
        let query = CatalogQuery {
            category: Some(String::new()),
            ..CatalogQuery::default()
        };
        assert_eq!(filter_and_sort(&catalog, &query, SortKey::Name).len(), catalog.len());
    }

    #[test]
    fn test_empty_result() {
        let catalog = sample_catalog();
        let query = CatalogQuery {
            query: "impresora".to_string(),
            ..CatalogQuery::default()
        };
        assert!(filter_and_sort(&catalog, &query, SortKey::Name).is_empty());
    }

    #[test]
    fn test_name_sort_folds_accents() {
        let catalog = sample_catalog();
        let listed = filter_and_sort(&catalog, &CatalogQuery::default(), SortKey::Name);
        assert_eq!(
            names(&listed),
            vec![
                "Audífonos Pro",
                "Cable USB-C",
                "Hub USB",
                "Mouse Inalámbrico",
                "Ñandú Mousepad",
                "Parlante Bluetooth",
                "Teclado Mecánico"
            ]
        );
    }

    #[test]
    fn test_rating_ties_break_by_name() {
        let catalog = sample_catalog();
        let listed = filter_and_sort(&catalog, &CatalogQuery::default(), SortKey::Rating);
        let top: Vec<String> = names(&listed).into_iter().take(2).collect();
        assert_eq!(top, vec!["Audífonos Pro", "Teclado Mecánico"]);
    }

    #[test]
    fn test_sort_is_deterministic() {
        let catalog = sample_catalog();
        for sort in [SortKey::Name, SortKey::PriceLow, SortKey::PriceHigh, SortKey::Rating] {
            let first = filter_and_sort(&catalog, &CatalogQuery::default(), sort);
            let resorted: Vec<Product> = first.iter().map(|p| (*p).clone()).collect();
            let second = filter_and_sort(&resorted, &CatalogQuery::default(), sort);
            assert_eq!(names(&first), names(&second));
        }
    }

    #[test]
    fn test_price_low_and_high_are_inverse_without_ties() {
        let catalog: Vec<Product> = sample_catalog()
            .into_iter()
            .filter(|p| p.id.as_str() != "g")
            .collect();
        let low = names(&filter_and_sort(&catalog, &CatalogQuery::default(), SortKey::PriceLow));
        let mut high =
            names(&filter_and_sort(&catalog, &CatalogQuery::default(), SortKey::PriceHigh));
        high.reverse();
        assert_eq!(low, high);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("price-low".parse::<SortKey>(), Ok(SortKey::PriceLow));
        assert_eq!(SortKey::parse_or_default("popularity"), SortKey::Name);
        assert_eq!(SortKey::Rating.to_string(), "rating");
    }

    #[test]
    fn test_categories_first_seen_order() {
        let catalog = sample_catalog();
        assert_eq!(
            categories(&catalog),
            vec!["Audio", "Cables", "Mouse", "Teclados"]
        );
    }

    #[test]
    fn test_admin_query() {
        let catalog = sample_catalog();
        let query = AdminProductQuery {
            category: Some(ALL_CATEGORIES.to_string()),
            search: "MOUSE".to_string(),
            stock: StockFilter::InStock,
        };
        let listed = query.filter(&catalog);
        assert_eq!(names(&listed), vec!["Ñandú Mousepad"]);

        let sold_out = AdminProductQuery {
            stock: StockFilter::OutOfStock,
            ..AdminProductQuery::default()
        };
        assert_eq!(names(&sold_out.filter(&catalog)), vec!["Mouse Inalámbrico"]);
    }
}
