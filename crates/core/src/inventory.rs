//! The in-memory inventory ("Estoque").

use tracing::debug;

use crate::models::{Field, Item, ValidationError, Violation};

/// Whether exactly-zero price or quantity is accepted into the store.
///
/// The two source revisions of the registration flow disagree on this;
/// both behaviors are kept and the store applies one consistently.
/// Negative values are rejected under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroPolicy {
    /// Zero is a valid value; only negatives are rejected.
    #[default]
    Allow,
    /// Price and quantity must be strictly positive.
    Reject,
}

/// Ordered, append-only collection of registered items.
///
/// Lives for the process lifetime and is owned by the application; all
/// writes happen on the UI event loop, so no synchronization is needed.
#[derive(Debug, Default)]
pub struct Inventory {
    items: Vec<Item>,
    policy: ZeroPolicy,
}

impl Inventory {
    /// Create an empty inventory with the given zero policy.
    pub fn new(policy: ZeroPolicy) -> Self {
        Self {
            items: Vec::new(),
            policy,
        }
    }

    /// Policy this store validates against.
    pub fn policy(&self) -> ZeroPolicy {
        self.policy
    }

    /// Append an item after re-checking the numeric invariants. On failure
    /// nothing is mutated. Duplicates are allowed; identity is positional.
    pub fn add(&mut self, item: Item) -> Result<(), ValidationError> {
        if !item.price.is_finite() {
            return Err(ValidationError::new(Field::Price, Violation::NotNumeric));
        }
        if item.price < 0.0 {
            return Err(ValidationError::new(Field::Price, Violation::Negative));
        }
        if self.policy == ZeroPolicy::Reject {
            if item.price == 0.0 {
                return Err(ValidationError::new(Field::Price, Violation::Zero));
            }
            if item.quantity == 0 {
                return Err(ValidationError::new(Field::Quantity, Violation::Zero));
            }
        }
        debug!(name = %item.name, quantity = item.quantity, "Item added to inventory");
        self.items.push(item);
        Ok(())
    }

    /// Sum of price × quantity over all items. Empty inventory yields 0.
    pub fn total_value(&self) -> f64 {
        self.items.iter().map(Item::line_value).sum()
    }

    /// Sum of quantities across all items.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at the given insertion index, if any.
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// All items in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn caneta() -> Item {
        Item::new("Caneta", "Papelaria", 2.5, 10)
    }

    #[test]
    fn empty_inventory_totals_are_zero() {
        let inventory = Inventory::default();
        assert!(inventory.is_empty());
        assert_eq!(inventory.total_value(), 0.0);
        assert_eq!(inventory.total_quantity(), 0);
    }

    #[test]
    fn caneta_scenario() {
        let mut inventory = Inventory::default();
        inventory.add(caneta()).unwrap();
        assert_eq!(inventory.total_value(), 25.0);
        assert_eq!(inventory.total_quantity(), 10);
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn two_item_scenario() {
        let mut inventory = Inventory::default();
        inventory.add(Item::new("A", "X", 1.0, 1)).unwrap();
        inventory.add(Item::new("B", "Y", 2.0, 2)).unwrap();
        assert_eq!(inventory.total_value(), 5.0);
        assert_eq!(inventory.total_quantity(), 3);
    }

    #[test]
    fn items_keep_insertion_order() {
        let mut inventory = Inventory::default();
        inventory.add(Item::new("A", "X", 1.0, 1)).unwrap();
        inventory.add(Item::new("B", "Y", 2.0, 2)).unwrap();
        let names: Vec<&str> = inventory.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(inventory.get(1).unwrap().name, "B");
        assert!(inventory.get(2).is_none());
    }

    #[test]
    fn duplicates_are_allowed() {
        let mut inventory = Inventory::default();
        inventory.add(caneta()).unwrap();
        inventory.add(caneta()).unwrap();
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.total_value(), 50.0);
    }

    #[test]
    fn negative_price_is_rejected_and_store_unchanged() {
        let mut inventory = Inventory::default();
        inventory.add(caneta()).unwrap();
        let err = inventory.add(Item::new("Bad", "X", -1.0, 1)).unwrap_err();
        assert_eq!(err, ValidationError::new(Field::Price, Violation::Negative));
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.total_value(), 25.0);
    }

    #[test]
    fn zero_is_rejected_only_under_strict_policy() {
        let mut permissive = Inventory::new(ZeroPolicy::Allow);
        permissive.add(Item::new("Brinde", "Promo", 0.0, 5)).unwrap();
        permissive.add(Item::new("Esgotado", "Promo", 3.0, 0)).unwrap();
        assert_eq!(permissive.len(), 2);

        let mut strict = Inventory::new(ZeroPolicy::Reject);
        let err = strict.add(Item::new("Brinde", "Promo", 0.0, 5)).unwrap_err();
        assert_eq!(err, ValidationError::new(Field::Price, Violation::Zero));
        let err = strict.add(Item::new("Esgotado", "Promo", 3.0, 0)).unwrap_err();
        assert_eq!(err, ValidationError::new(Field::Quantity, Violation::Zero));
        assert!(strict.is_empty());
    }

    #[test]
    fn non_finite_price_never_enters_the_store() {
        let mut inventory = Inventory::default();
        let err = inventory
            .add(Item::new("Bad", "X", f64::NAN, 1))
            .unwrap_err();
        assert_eq!(err.violation, Violation::NotNumeric);
        assert!(inventory.is_empty());
    }

    proptest! {
        /// Totals equal the fold over exactly the added items, in any order.
        #[test]
        fn totals_are_order_independent(
            entries in proptest::collection::vec((0.0f64..1_000.0, 0u32..1_000), 0..32)
        ) {
            let mut forward = Inventory::default();
            for (idx, (price, quantity)) in entries.iter().enumerate() {
                forward
                    .add(Item::new(format!("item-{idx}"), "cat", *price, *quantity))
                    .unwrap();
            }
            let mut backward = Inventory::default();
            for (idx, (price, quantity)) in entries.iter().enumerate().rev() {
                backward
                    .add(Item::new(format!("item-{idx}"), "cat", *price, *quantity))
                    .unwrap();
            }

            let expected_value: f64 = entries
                .iter()
                .map(|(price, quantity)| price * f64::from(*quantity))
                .sum();
            let expected_quantity: u64 =
                entries.iter().map(|(_, quantity)| u64::from(*quantity)).sum();

            prop_assert!((forward.total_value() - expected_value).abs() < 1e-6);
            prop_assert!((backward.total_value() - expected_value).abs() < 1e-6);
            prop_assert_eq!(forward.total_quantity(), expected_quantity);
            prop_assert_eq!(backward.total_quantity(), expected_quantity);
        }

        /// A rejected add leaves the totals untouched.
        #[test]
        fn rejected_add_never_changes_totals(price in -1_000.0f64..0.0) {
            prop_assume!(price < 0.0);
            let mut inventory = Inventory::default();
            inventory.add(Item::new("Caneta", "Papelaria", 2.5, 10)).unwrap();
            let before = inventory.total_value();
            prop_assert!(inventory.add(Item::new("Bad", "X", price, 1)).is_err());
            prop_assert_eq!(inventory.total_value(), before);
            prop_assert_eq!(inventory.len(), 1);
        }
    }
}
