//! # Validation Module
//!
//! Input validation for product entries before they reach the totals engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (input fields)                                  │
//! │  └── parse_quantity: keep digits only, empty → 0                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── EntryInput → ProductEntry (rejects negatives)                     │
//! │  └── validate_entry: name, pack size, price                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Totals engine (total function over valid entries)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any failure surfaces as [`CoreError::InvalidInput`] naming the entry.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::totals::{checked_aggregate, checked_entry_totals};
use crate::types::ProductEntry;
use crate::MAX_PRODUCT_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Raw Input
// =============================================================================

/// Signed, unchecked quantities as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryInput {
    pub name: String,
    pub unit_price: Money,
    pub pack_size: i64,
    pub units: i64,
    pub packs: i64,
    pub expired: i64,
    pub disabled: i64,
}

impl TryFrom<EntryInput> for ProductEntry {
    type Error = CoreError;

    fn try_from(input: EntryInput) -> CoreResult<Self> {
        let convert = |field: &str, value: i64| {
            quantity_from_i64(field, value).map_err(|e| CoreError::invalid_input(&input.name, e))
        };

        let entry = ProductEntry {
            pack_size: convert("pack_size", input.pack_size)?,
            units: convert("units", input.units)?,
            packs: convert("packs", input.packs)?,
            expired: convert("expired", input.expired)?,
            disabled: convert("disabled", input.disabled)?,
            unit_price: input.unit_price,
            name: input.name,
        };

        validate_entry(&entry)?;
        Ok(entry)
    }
}

fn quantity_from_i64(field: &str, value: i64) -> ValidationResult<u32> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }

    u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: u32::MAX as i64,
    })
}

// =============================================================================
// Field Parsers
// =============================================================================

/// Parses a quantity typed into an input field.
///
/// Non-digit characters are dropped, and empty or overflowing input counts
/// as zero.
///
/// ```rust
/// use alban_core::validation::parse_quantity;
///
/// assert_eq!(parse_quantity("12"), 12);
/// assert_eq!(parse_quantity("1a2"), 12);
/// assert_eq!(parse_quantity("-3"), 3);
/// assert_eq!(parse_quantity(""), 0);
/// ```
pub fn parse_quantity(raw: &str) -> u32 {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

// =============================================================================
// Entry Validators
// =============================================================================

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Checks the invariants the totals engine relies on.
///
/// ## Rules
/// - Name is non-empty
/// - Pack size is at least 1
/// - Unit price is not negative (zero is allowed for free samples)
/// - The row total before deduction fits in [`Money`]
pub fn validate_entry(entry: &ProductEntry) -> CoreResult<()> {
    let label = if entry.name.trim().is_empty() {
        "<unnamed>"
    } else {
        entry.name.as_str()
    };

    validate_product_name(&entry.name).map_err(|e| CoreError::invalid_input(label, e))?;

    if entry.pack_size == 0 {
        return Err(CoreError::invalid_input(
            label,
            ValidationError::MustBePositive {
                field: "pack_size".to_string(),
            },
        ));
    }

    if entry.unit_price.is_negative() {
        return Err(CoreError::invalid_input(
            label,
            ValidationError::Negative {
                field: "unit_price".to_string(),
                value: entry.unit_price.cents(),
            },
        ));
    }

    if checked_entry_totals(entry).is_none() {
        return Err(CoreError::invalid_input(label, amount_out_of_range("row_total")));
    }

    Ok(())
}

/// Validates every entry, stopping at the first failure, then checks that
/// the grand totals fit in [`Money`].
pub fn validate_entries(entries: &[ProductEntry]) -> CoreResult<()> {
    entries.iter().try_for_each(validate_entry)?;

    if checked_aggregate(entries).is_none() {
        return Err(amount_out_of_range("grand_total").into());
    }

    Ok(())
}

fn amount_out_of_range(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> EntryInput {
        EntryInput {
            name: "Milk".to_string(),
            unit_price: Money::from_cents(400),
            pack_size: 12,
            units: 5,
            packs: 2,
            expired: 1,
            disabled: 0,
        }
    }

    #[test]
    fn test_valid_input_converts() {
        let entry = ProductEntry::try_from(input()).unwrap();
        assert_eq!(entry.units, 5);
        assert_eq!(entry.pack_size, 12);
        assert_eq!(entry.name, "Milk");
    }

    #[test]
    fn test_negative_quantity_is_invalid_input() {
        let mut raw = input();
        raw.expired = -2;
        let err = ProductEntry::try_from(raw).unwrap_err();
        match err {
            CoreError::InvalidInput { entry, source } => {
                assert_eq!(entry, "Milk");
                assert_eq!(
                    source,
                    ValidationError::Negative {
                        field: "expired".to_string(),
                        value: -2
                    }
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_oversized_quantity_is_out_of_range() {
        let mut raw = input();
        raw.units = i64::from(u32::MAX) + 1;
        assert!(matches!(
            ProductEntry::try_from(raw),
            Err(CoreError::InvalidInput {
                source: ValidationError::OutOfRange { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_zero_pack_size_rejected() {
        let mut raw = input();
        raw.pack_size = 0;
        assert!(ProductEntry::try_from(raw).is_err());
    }

    #[test]
    fn test_validate_entry_rules() {
        let ok = ProductEntry::new("Milk", Money::from_cents(400), 12);
        assert!(validate_entry(&ok).is_ok());

        let unnamed = ProductEntry::new("  ", Money::from_cents(400), 12);
        assert!(matches!(
            validate_entry(&unnamed),
            Err(CoreError::InvalidInput { ref entry, .. }) if entry == "<unnamed>"
        ));

        let negative_price = ProductEntry::new("Milk", Money::from_cents(-1), 12);
        assert!(validate_entry(&negative_price).is_err());

        let free = ProductEntry::new("Sample", Money::zero(), 1);
        assert!(validate_entry(&free).is_ok());
    }

    #[test]
    fn test_validate_entries_stops_at_first_failure() {
        let entries = vec![
            ProductEntry::new("Milk", Money::from_cents(400), 12),
            ProductEntry::new("", Money::from_cents(400), 12),
        ];
        assert!(validate_entries(&entries).is_err());
        assert!(validate_entries(&entries[..1]).is_ok());
    }

    #[test]
    fn test_unrepresentable_row_total_rejected() {
        let entry = ProductEntry::new("Milk", Money::from_cents(400), 200_000_000)
            .with_packs(200_000_000);
        match validate_entry(&entry) {
            Err(CoreError::InvalidInput { entry, source }) => {
                assert_eq!(entry, "Milk");
                assert!(matches!(
                    source,
                    ValidationError::OutOfRange { ref field, .. } if field == "row_total"
                ));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let maxed = ProductEntry::new("Max", Money::from_cents(400), u32::MAX)
            .with_units(u32::MAX)
            .with_packs(u32::MAX)
            .with_expired(u32::MAX)
            .with_disabled(u32::MAX);
        assert!(validate_entry(&maxed).is_err());
    }

    #[test]
    fn test_free_sample_with_maximum_counts_is_valid() {
        let entry = ProductEntry::new("Sample", Money::zero(), u32::MAX)
            .with_units(u32::MAX)
            .with_packs(u32::MAX);
        assert!(validate_entry(&entry).is_ok());
    }

    #[test]
    fn test_unrepresentable_grand_total_rejected() {
        let bulk = ProductEntry::new("Bulk", Money::from_cents(i64::MAX / 2 + 1), 1).with_units(1);
        assert!(validate_entry(&bulk).is_ok());
        assert!(matches!(
            validate_entries(&[bulk.clone(), bulk]),
            Err(CoreError::Validation(ValidationError::OutOfRange { ref field, .. }))
                if field == "grand_total"
        ));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("007"), 7);
        assert_eq!(parse_quantity("abc"), 0);
        assert_eq!(parse_quantity("99999999999999"), 0);
    }

    #[test]
    fn test_name_too_long() {
        let name = "x".repeat(MAX_PRODUCT_NAME_LEN + 1);
        assert!(matches!(
            validate_product_name(&name),
            Err(ValidationError::TooLong { .. })
        ));
    }
}
