//! # Totals Engine
//!
//! Turns counted quantities into per-row and grand totals.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductEntry { units: 5, packs: 2, pack_size: 12, expired: 1 }         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total_units            = 5 + 2 × 12          = 29                      │
//! │  units_before_deduction = 29 + 1 + 0          = 30                      │
//! │  units_after_deduction  = max(0, 29 − 1 − 0)  = 28                      │
//! │       │                                                                 │
//! │       ▼  × unit_price (4.00)                                            │
//! │  row_total_before = 120.00    row_total_after = 112.00                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function: the presentation layer calls it again
//! whenever an input changes instead of keeping a reactive graph.

use crate::money::Money;
use crate::types::{InvoiceTotals, ProductEntry, RowTotals};

/// Computes the derived quantities and amounts for one entry.
///
/// Deductions are floored at zero; inventory never goes negative. Amounts
/// too large for [`Money`] clamp at its maximum instead of overflowing;
/// [`checked_entry_totals`] reports them, and validation rejects such
/// entries before an invoice is built.
///
/// ```rust
/// use alban_core::{compute_entry_totals, Money, ProductEntry};
///
/// let milk = ProductEntry::new("Milk", Money::from_cents(400), 12)
///     .with_units(5)
///     .with_packs(2)
///     .with_expired(1);
/// let row = compute_entry_totals(&milk);
/// assert_eq!(row.total_units, 29);
/// assert_eq!(row.row_total_after, Money::from_cents(11200));
/// ```
pub fn compute_entry_totals(entry: &ProductEntry) -> RowTotals {
    let (total_units, units_before_deduction, units_after_deduction) = unit_counts(entry);

    RowTotals {
        total_units,
        units_before_deduction,
        units_after_deduction,
        row_total_before: entry.unit_price.multiply_quantity(units_before_deduction),
        row_total_after: entry.unit_price.multiply_quantity(units_after_deduction),
    }
}

/// Like [`compute_entry_totals`], but `None` when a row amount does not fit
/// in [`Money`].
pub fn checked_entry_totals(entry: &ProductEntry) -> Option<RowTotals> {
    let (total_units, units_before_deduction, units_after_deduction) = unit_counts(entry);

    Some(RowTotals {
        total_units,
        units_before_deduction,
        units_after_deduction,
        row_total_before: entry.unit_price.checked_multiply_quantity(units_before_deduction)?,
        row_total_after: entry.unit_price.checked_multiply_quantity(units_after_deduction)?,
    })
}

/// `(total, before deduction, after deduction)` unit counts.
///
/// u32 inputs keep `units + packs × pack_size` below 2^64; the before count
/// saturates only for the all-maximum entry.
fn unit_counts(entry: &ProductEntry) -> (u64, u64, u64) {
    let total_units = entry.units as u64 + entry.packs as u64 * entry.pack_size as u64;
    let deductions = entry.deductions();

    (
        total_units,
        total_units.saturating_add(deductions),
        total_units.saturating_sub(deductions),
    )
}

/// Sums row totals over every entry with activity.
///
/// Before and after are summed independently in a wide accumulator and
/// clamped once, so the result is independent of entry order.
pub fn aggregate(entries: &[ProductEntry]) -> InvoiceTotals {
    let (before, after) = active_rows(entries).fold((0i128, 0i128), |(before, after), row| {
        (
            before + row.row_total_before.cents() as i128,
            after + row.row_total_after.cents() as i128,
        )
    });

    InvoiceTotals {
        grand_total_before: Money::saturating_from_wide(before),
        grand_total_after: Money::saturating_from_wide(after),
    }
}

/// Like [`aggregate`], but `None` when a row or grand total does not fit in
/// [`Money`].
pub fn checked_aggregate(entries: &[ProductEntry]) -> Option<InvoiceTotals> {
    entries
        .iter()
        .filter(|entry| entry.has_activity())
        .try_fold(InvoiceTotals::default(), |acc, entry| {
            let row = checked_entry_totals(entry)?;
            Some(InvoiceTotals {
                grand_total_before: acc.grand_total_before.checked_add(row.row_total_before)?,
                grand_total_after: acc.grand_total_after.checked_add(row.row_total_after)?,
            })
        })
}

fn active_rows(entries: &[ProductEntry]) -> impl Iterator<Item = RowTotals> + '_ {
    entries
        .iter()
        .filter(|entry| entry.has_activity())
        .map(compute_entry_totals)
}

/// Number of entries that will appear on the invoice.
pub fn active_entry_count(entries: &[ProductEntry]) -> usize {
    entries.iter().filter(|entry| entry.has_activity()).count()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn milk() -> ProductEntry {
        ProductEntry::new("Milk", Money::from_cents(400), 12)
            .with_units(5)
            .with_packs(2)
            .with_expired(1)
    }

    #[test]
    fn test_milk_scenario() {
        let row = compute_entry_totals(&milk());
        assert_eq!(row.total_units, 29);
        assert_eq!(row.units_before_deduction, 30);
        assert_eq!(row.units_after_deduction, 28);
        assert_eq!(row.row_total_before, Money::from_cents(12000));
        assert_eq!(row.row_total_after, Money::from_cents(11200));
    }

    #[test]
    fn test_over_deduction_floors_at_zero() {
        let entry = ProductEntry::new("Leben", Money::from_cents(300), 12)
            .with_units(5)
            .with_expired(10);
        let row = compute_entry_totals(&entry);
        assert_eq!(row.total_units, 5);
        assert_eq!(row.units_before_deduction, 15);
        assert_eq!(row.units_after_deduction, 0);
        assert_eq!(row.row_total_after, Money::zero());
        assert_eq!(row.row_total_before, Money::from_cents(4500));
    }

    #[test]
    fn test_compute_is_idempotent() {
        let entry = milk();
        assert_eq!(compute_entry_totals(&entry), compute_entry_totals(&entry));
    }

    #[test]
    fn test_two_entry_aggregate_in_any_order() {
        // 20 × 5.00 before, 16 × 5.00 after
        let uht = ProductEntry::new("Lait UHT", Money::from_cents(500), 12)
            .with_units(6)
            .with_packs(1)
            .with_disabled(2);
        // 20 × 5.00 before and after
        let yogurt = ProductEntry::new("Raib", Money::from_cents(500), 12)
            .with_units(8)
            .with_packs(1);

        let forward = aggregate(&[uht.clone(), yogurt.clone()]);
        let backward = aggregate(&[yogurt, uht]);

        assert_eq!(forward.grand_total_before, Money::from_cents(20000));
        assert_eq!(forward.grand_total_after, Money::from_cents(18000));
        assert_eq!(forward, backward);
        assert_eq!(forward.deducted(), Money::from_cents(2000));
    }

    #[test]
    fn test_inactive_entries_are_skipped() {
        let idle = ProductEntry::new("Flany", Money::from_cents(200), 24);
        let totals = aggregate(&[idle.clone(), milk(), idle]);
        assert_eq!(totals.grand_total_before, Money::from_cents(12000));
        assert_eq!(active_entry_count(&[milk(), ProductEntry::new("x", Money::zero(), 1)]), 1);
    }

    #[test]
    fn test_empty_aggregate_is_zero() {
        let totals = aggregate(&[]);
        assert!(totals.grand_total_before.is_zero());
        assert!(totals.grand_total_after.is_zero());
        assert_eq!(checked_aggregate(&[]), Some(totals));
    }

    #[test]
    fn test_huge_pack_count_clamps_instead_of_overflowing() {
        // 4.00 × 4·10^16 units is far beyond i64 centimes
        let entry = ProductEntry::new("Milk", Money::from_cents(400), 200_000_000)
            .with_packs(200_000_000);
        let row = compute_entry_totals(&entry);

        assert_eq!(row.total_units, 40_000_000_000_000_000);
        assert_eq!(row.row_total_before, Money::from_cents(i64::MAX));
        assert!(checked_entry_totals(&entry).is_none());
        assert!(checked_aggregate(&[entry]).is_none());
    }

    #[test]
    fn test_all_maximum_entry_does_not_panic() {
        let entry = ProductEntry::new("Max", Money::from_cents(i64::MAX), u32::MAX)
            .with_units(u32::MAX)
            .with_packs(u32::MAX)
            .with_expired(u32::MAX)
            .with_disabled(u32::MAX);

        let row = compute_entry_totals(&entry);
        assert_eq!(row.units_before_deduction, u64::MAX);
        assert!(!row.row_total_after.is_negative());
        assert!(row.row_total_after <= row.row_total_before);

        let totals = aggregate(&[entry.clone(), entry]);
        assert_eq!(totals.grand_total_before, Money::from_cents(i64::MAX));
        assert!(!totals.deducted().is_negative());
    }

    #[test]
    fn test_grand_total_overflow_is_detected() {
        // Each row fits on its own; the sum does not
        let entry = ProductEntry::new("Bulk", Money::from_cents(i64::MAX / 2 + 1), 1).with_units(1);
        assert!(checked_entry_totals(&entry).is_some());
        assert!(checked_aggregate(&[entry.clone(), entry.clone()]).is_none());
        assert_eq!(
            aggregate(&[entry.clone(), entry]).grand_total_before,
            Money::from_cents(i64::MAX)
        );
    }

    fn arb_entry() -> impl Strategy<Value = ProductEntry> {
        (
            prop_oneof![0i64..10_000, 0i64..=i64::MAX],
            prop_oneof![1u32..50, 1u32..=u32::MAX],
            any::<u32>(),
            any::<u32>(),
            any::<u32>(),
            any::<u32>(),
        )
            .prop_map(|(price, pack_size, units, packs, expired, disabled)| {
                ProductEntry::new("p", Money::from_cents(price), pack_size)
                    .with_units(units)
                    .with_packs(packs)
                    .with_expired(expired)
                    .with_disabled(disabled)
            })
    }

    fn arb_small_entry() -> impl Strategy<Value = ProductEntry> {
        (0i64..10_000, 1u32..50, 0u32..500, 0u32..100, 0u32..500, 0u32..500).prop_map(
            |(price, pack_size, units, packs, expired, disabled)| {
                ProductEntry::new("p", Money::from_cents(price), pack_size)
                    .with_units(units)
                    .with_packs(packs)
                    .with_expired(expired)
                    .with_disabled(disabled)
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: total units are loose units plus whole packs.
        #[test]
        fn total_units_counts_packs(entry in arb_entry()) {
            let row = compute_entry_totals(&entry);
            prop_assert_eq!(
                row.total_units,
                entry.units as u64 + entry.packs as u64 * entry.pack_size as u64
            );
        }

        /// Property: units after deduction never go below zero.
        #[test]
        fn after_deduction_is_floored(entry in arb_entry()) {
            let row = compute_entry_totals(&entry);
            let expected = row.total_units.saturating_sub(entry.deductions());
            prop_assert_eq!(row.units_after_deduction, expected);
            prop_assert!(!row.row_total_after.is_negative());
        }

        /// Property: deductions never increase a row total.
        #[test]
        fn deductions_never_increase_total(entry in arb_entry()) {
            let row = compute_entry_totals(&entry);
            prop_assert!(row.row_total_after <= row.row_total_before);
            if entry.deductions() == 0 {
                prop_assert_eq!(row.row_total_after, row.row_total_before);
            }
        }

        /// Property: aggregate does not depend on entry order.
        #[test]
        fn aggregate_is_order_independent(
            entries in prop::collection::vec(arb_entry(), 0..20),
            seed in any::<u64>()
        ) {
            let mut shuffled = entries.clone();
            // Deterministic rotation + reversal driven by the seed
            if !shuffled.is_empty() {
                let k = (seed as usize) % shuffled.len();
                shuffled.rotate_left(k);
            }
            if seed % 2 == 0 {
                shuffled.reverse();
            }
            prop_assert_eq!(aggregate(&entries), aggregate(&shuffled));
        }

        /// Property: when the checked path succeeds, it agrees with exact
        /// wide arithmetic and with the clamping path.
        #[test]
        fn checked_totals_are_exact(entry in arb_entry()) {
            let price = entry.unit_price.cents() as i128;
            let before = (row_units(&entry) + entry.deductions() as i128) * price;

            match checked_entry_totals(&entry) {
                Some(row) => {
                    prop_assert_eq!(row.row_total_before.cents() as i128, before);
                    prop_assert_eq!(row, compute_entry_totals(&entry));
                }
                None => prop_assert!(before > i64::MAX as i128),
            }
        }

        /// Property: everyday quantities always compute exactly.
        #[test]
        fn everyday_entries_never_overflow(entries in prop::collection::vec(arb_small_entry(), 0..20)) {
            prop_assert_eq!(checked_aggregate(&entries), Some(aggregate(&entries)));
        }
    }

    fn row_units(entry: &ProductEntry) -> i128 {
        entry.units as i128 + entry.packs as i128 * entry.pack_size as i128
    }
}
