//! Type-safe money and discount representation using decimal arithmetic.
//!
//! Amounts are held as [`Decimal`] in the currency's standard unit (soles,
//! not céntimos). Rounding to whole units follows the storefront's display
//! rule: half away from zero.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors raised when constructing a [`Price`] or [`Discount`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceError {
    /// Prices cannot be negative.
    #[error("price cannot be negative")]
    Negative,
    /// Discounts are percentages between 0 and 100.
    #[error("discount must be between 0 and 100")]
    DiscountOutOfRange,
}

/// ISO 4217 currency codes accepted by the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Peruvian sol.
    #[default]
    PEN,
    USD,
}

impl CurrencyCode {
    /// Display symbol placed before the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::PEN => "S/",
            Self::USD => "$",
        }
    }
}

/// A non-negative amount of money in the shop currency.
///
/// ```
/// use rust_decimal::Decimal;
/// use sr_robot_core::Price;
///
/// let price = Price::new(Decimal::new(1999, 2)).unwrap();
/// assert_eq!(price.to_string(), "S/19.99");
/// assert!(Price::new(Decimal::NEGATIVE_ONE).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero soles.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from an amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of soles.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// The amount in soles.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Format with the currency symbol and two decimals.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", CurrencyCode::default().symbol(), self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    /// Saturates at `Decimal::MAX`.
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// A percentage discount between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Discount(Decimal);

impl Discount {
    /// Create a discount from a percentage.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::DiscountOutOfRange` outside `0..=100`.
    pub fn new(percent: Decimal) -> Result<Self, PriceError> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(PriceError::DiscountOutOfRange);
        }
        Ok(Self(percent))
    }

    /// The percentage value.
    #[must_use]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    /// Whether the discount actually reduces the price.
    #[must_use]
    pub fn is_effective(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// The list price a discounted `price` was derived from, rounded to whole soles.
    ///
    /// Returns `None` for a zero discount (nothing to show) and for a 100%
    /// discount, where the list price cannot be recovered.
    #[must_use]
    pub fn original_price_for(&self, price: Price) -> Option<Price> {
        if !self.is_effective() || self.0 >= Decimal::ONE_HUNDRED {
            return None;
        }
        price
            .0
            .checked_div(self.remaining_fraction())
            .map(|amount| Price(round_units(amount)))
    }

    fn remaining_fraction(self) -> Decimal {
        Decimal::ONE - self.0 / Decimal::ONE_HUNDRED
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl TryFrom<Decimal> for Discount {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Discount> for Decimal {
    fn from(discount: Discount) -> Self {
        discount.0
    }
}

fn round_units(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
