//! Shared domain models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::inventory::ZeroPolicy;

/// A registered store product ("Produto").
///
/// Items are immutable once registered; identity is positional within the
/// inventory. The struct round-trips through JSON so a snapshot can be
/// carried across a navigation boundary without touching the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Product name.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Unit price.
    pub price: f64,
    /// Units currently in stock.
    pub quantity: u32,
}

impl Item {
    /// Build an item from already-validated parts.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        quantity: u32,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            quantity,
        }
    }

    /// Stock value contributed by this item (price × quantity).
    pub fn line_value(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// List-row label, e.g. `Caneta (10 unidades)`.
    pub fn summary(&self) -> String {
        format!("{} ({} unidades)", self.name, self.quantity)
    }
}

/// Form field identifiers used in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Product name.
    Name,
    /// Category label.
    Category,
    /// Unit price.
    Price,
    /// Stock quantity.
    Quantity,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Field::Name => "Name",
            Field::Category => "Category",
            Field::Price => "Price",
            Field::Quantity => "Quantity",
        };
        write!(f, "{label}")
    }
}

/// Constraint violated by a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    /// Required field left blank.
    #[error("is required")]
    Blank,
    /// Text did not parse as a number.
    #[error("must be numeric")]
    NotNumeric,
    /// Parsed value was negative.
    #[error("cannot be negative")]
    Negative,
    /// Parsed value was zero under the strict policy.
    #[error("must be greater than zero")]
    Zero,
}

/// Structured validation failure naming the offending field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field} {violation}")]
pub struct ValidationError {
    /// Field the violation applies to.
    pub field: Field,
    /// Constraint that was violated.
    pub violation: Violation,
}

impl ValidationError {
    /// Pair a field with its violated constraint.
    pub fn new(field: Field, violation: Violation) -> Self {
        Self { field, violation }
    }
}

/// Raw text captured by the registration form before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    /// Name buffer.
    pub name: String,
    /// Category buffer.
    pub category: String,
    /// Price buffer, parsed as a real number.
    pub price: String,
    /// Quantity buffer, parsed as an integer.
    pub quantity: String,
}

impl ItemDraft {
    /// Parse the draft into an [`Item`], reporting the first field that
    /// fails. The draft itself is left untouched so the form can keep the
    /// user's input on failure.
    pub fn validate(&self, policy: ZeroPolicy) -> Result<Item, ValidationError> {
        let name = non_blank(&self.name, Field::Name)?;
        let category = non_blank(&self.category, Field::Category)?;
        let price = parse_price(&self.price, policy)?;
        let quantity = parse_quantity(&self.quantity, policy)?;
        Ok(Item {
            name,
            category,
            price,
            quantity,
        })
    }
}

fn non_blank(input: &str, field: Field) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, Violation::Blank));
    }
    Ok(trimmed.to_string())
}

fn parse_price(input: &str, policy: ZeroPolicy) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(Field::Price, Violation::Blank));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::new(Field::Price, Violation::NotNumeric))?;
    if !value.is_finite() {
        return Err(ValidationError::new(Field::Price, Violation::NotNumeric));
    }
    if value < 0.0 {
        return Err(ValidationError::new(Field::Price, Violation::Negative));
    }
    if value == 0.0 && policy == ZeroPolicy::Reject {
        return Err(ValidationError::new(Field::Price, Violation::Zero));
    }
    Ok(value)
}

fn parse_quantity(input: &str, policy: ZeroPolicy) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(Field::Quantity, Violation::Blank));
    }
    // Parse through i64 so a leading minus sign reads as Negative rather
    // than NotNumeric.
    let value: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::new(Field::Quantity, Violation::NotNumeric))?;
    if value < 0 {
        return Err(ValidationError::new(Field::Quantity, Violation::Negative));
    }
    if value == 0 && policy == ZeroPolicy::Reject {
        return Err(ValidationError::new(Field::Quantity, Violation::Zero));
    }
    u32::try_from(value).map_err(|_| ValidationError::new(Field::Quantity, Violation::NotNumeric))
}
