//! Status filters used by the admin dashboard listings.

use serde::{Deserialize, Serialize};

/// Stock filter for the admin product table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StockFilter {
    /// Every product.
    #[default]
    All,
    /// Only products currently in stock.
    InStock,
    /// Only sold-out products.
    OutOfStock,
}

impl StockFilter {
    /// Whether a product with the given stock flag passes the filter.
    #[must_use]
    pub const fn accepts(self, in_stock: bool) -> bool {
        match self {
            Self::All => true,
            Self::InStock => in_stock,
            Self::OutOfStock => !in_stock,
        }
    }
}

impl std::fmt::Display for StockFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::InStock => write!(f, "in-stock"),
            Self::OutOfStock => write!(f, "out-of-stock"),
        }
    }
}

impl std::str::FromStr for StockFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "in-stock" => Ok(Self::InStock),
            "out-of-stock" => Ok(Self::OutOfStock),
            _ => Err(format!("invalid stock filter: {s}")),
        }
    }
}

/// Payment receipt filter for the admin order table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReceiptFilter {
    /// Every order.
    #[default]
    All,
    /// Orders whose payment proof was confirmed.
    Received,
    /// Orders still waiting for payment proof.
    Missing,
}

impl ReceiptFilter {
    /// Whether an order with the given receipt flag passes the filter.
    #[must_use]
    pub const fn accepts(self, has_receipt: bool) -> bool {
        match self {
            Self::All => true,
            Self::Received => has_receipt,
            Self::Missing => !has_receipt,
        }
    }
}

impl std::fmt::Display for ReceiptFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Received => write!(f, "received"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

impl std::str::FromStr for ReceiptFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "received" => Ok(Self::Received),
            "missing" => Ok(Self::Missing),
            _ => Err(format!("invalid receipt filter: {s}")),
        }
    }
}
