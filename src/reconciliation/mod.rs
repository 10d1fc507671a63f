//! Batch reconciliation calculator
//!
//! Every view that shows batch totals (batch detail, batch list, printed report)
//! derives them through this module. The entered total is never stored; it is
//! recomputed from the line items each time.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::*;

/// Tolerance used when nothing else is configured: 0.001
pub fn default_tolerance() -> BigDecimal {
    BigDecimal::new(1.into(), 3)
}

/// Sum the amounts of all line items. An empty list sums to zero.
///
/// This is a plain sum and performs no validation; see [`validate_line_items`].
pub fn compute_entered_total(contributions: &[Contribution]) -> BigDecimal {
    contributions.iter().map(|c| &c.amount).sum()
}

/// Signed difference between the entered and counted totals.
/// Positive means more was entered than was counted.
pub fn compute_difference(entered_total: &BigDecimal, counted_total: &BigDecimal) -> BigDecimal {
    entered_total - counted_total
}

/// Whether a difference is strictly within the tolerance
pub fn is_reconciled(difference: &BigDecimal, tolerance: &BigDecimal) -> bool {
    difference.abs() < *tolerance
}

/// [`is_reconciled`] with the default tolerance of 0.001
pub fn is_reconciled_default(difference: &BigDecimal) -> bool {
    is_reconciled(difference, &default_tolerance())
}

/// Only an open, reconciled batch may be closed
pub fn can_close(status: BatchStatus, reconciled: bool) -> bool {
    status == BatchStatus::Open && reconciled
}

/// Reject line items that would corrupt the derived total
pub fn validate_line_items(contributions: &[Contribution]) -> ChurchResult<()> {
    let zero = BigDecimal::from(0);
    for contribution in contributions {
        if contribution.amount < zero {
            return Err(ChurchError::Validation(format!(
                "Contribution {} has a negative amount ({})",
                contribution.id, contribution.amount
            )));
        }
    }
    Ok(())
}

/// Tolerance settings for reconciliation
///
/// Currencies with larger minimum units can be given a looser tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    pub default_tolerance: BigDecimal,
    /// Overrides keyed by upper-case currency code
    pub currency_tolerances: HashMap<String, BigDecimal>,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            default_tolerance: default_tolerance(),
            currency_tolerances: HashMap::new(),
        }
    }
}

impl ReconciliationConfig {
    /// Add a per-currency tolerance
    pub fn with_currency_tolerance(mut self, currency: &str, tolerance: BigDecimal) -> Self {
        self.currency_tolerances
            .insert(currency.trim().to_ascii_uppercase(), tolerance);
        self
    }

    /// Tolerance for a currency, falling back to the default
    pub fn tolerance_for(&self, currency: &str) -> &BigDecimal {
        self.currency_tolerances
            .get(&currency.trim().to_ascii_uppercase())
            .unwrap_or(&self.default_tolerance)
    }
}

/// Derived reconciliation figures for one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReconciliation {
    pub batch_id: String,
    pub currency: String,
    pub item_count: usize,
    pub entered_total: BigDecimal,
    pub counted_total: BigDecimal,
    pub difference: BigDecimal,
    pub is_reconciled: bool,
    pub can_close: bool,
}

impl BatchReconciliation {
    /// Compute all derived values for a batch from its current line items
    pub fn compute(batch: &Batch, contributions: &[Contribution], tolerance: &BigDecimal) -> Self {
        let entered_total = compute_entered_total(contributions);
        let difference = compute_difference(&entered_total, &batch.counted_total);
        let reconciled = is_reconciled(&difference, tolerance);

        Self {
            batch_id: batch.id.clone(),
            currency: batch.currency.clone(),
            item_count: contributions.len(),
            entered_total,
            counted_total: batch.counted_total.clone(),
            difference,
            is_reconciled: reconciled,
            can_close: can_close(batch.status, reconciled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn line(id: &str, amount: &str) -> Contribution {
        Contribution {
            id: id.to_string(),
            batch_id: "B004".to_string(),
            donor: Donor::Anonymous,
            fund: "General Tithes".to_string(),
            method: PaymentMethod::Cash,
            check_number: None,
            amount: dec(amount),
            date: NaiveDate::from_ymd_opt(2023, 11, 5).unwrap(),
            transaction_id: None,
            notes: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    fn batch_b004() -> Batch {
        Batch::new(
            "B004".to_string(),
            "Sunday Offering 2023-11-05".to_string(),
            NaiveDate::from_ymd_opt(2023, 11, 5).unwrap(),
            "USD".to_string(),
            dec("975.00"),
        )
    }

    #[test]
    fn test_entered_total_sums_amounts() {
        assert_eq!(compute_entered_total(&[]), BigDecimal::from(0));

        let items = vec![line("c1", "100.00"), line("c2", "25.00"), line("c3", "750.00")];
        assert_eq!(compute_entered_total(&items), dec("875.00"));
    }

    #[test]
    fn test_difference_is_antisymmetric() {
        let pairs = [("875.00", "975.00"), ("0", "0"), ("100.0005", "100"), ("-3.5", "12.25")];
        for (a, b) in pairs {
            let (a, b) = (dec(a), dec(b));
            assert_eq!(compute_difference(&a, &b), -compute_difference(&b, &a));
        }
        assert_eq!(compute_difference(&dec("875"), &dec("975")), dec("-100"));
    }

    #[test]
    fn test_tolerance_boundary() {
        let counted = dec("100.0");

        let close = compute_difference(&dec("100.0005"), &counted);
        assert_eq!(close, dec("0.0005"));
        assert!(is_reconciled_default(&close));

        let off = compute_difference(&dec("100.002"), &counted);
        assert!(!is_reconciled_default(&off));

        // Strictly less than the tolerance
        assert!(!is_reconciled_default(&dec("0.001")));
        assert!(!is_reconciled_default(&dec("-0.001")));
        assert!(is_reconciled_default(&dec("-0.0009")));
    }

    #[test]
    fn test_can_close_requires_open_and_reconciled() {
        assert!(can_close(BatchStatus::Open, true));
        assert!(!can_close(BatchStatus::Open, false));
        assert!(!can_close(BatchStatus::Closed, true));
        assert!(!can_close(BatchStatus::Closed, false));
    }

    #[test]
    fn test_batch_reconciliation_scenario() {
        let batch = batch_b004();
        let mut items = vec![line("c001", "100.00"), line("c002", "25.00"), line("c003", "750.00")];

        let summary = BatchReconciliation::compute(&batch, &items, &default_tolerance());
        assert_eq!(summary.entered_total, dec("875.00"));
        assert_eq!(summary.difference, dec("-100.00"));
        assert!(!summary.is_reconciled);
        assert!(!summary.can_close);
        assert_eq!(summary.item_count, 3);

        items.push(line("c004", "100.00"));
        let summary = BatchReconciliation::compute(&batch, &items, &default_tolerance());
        assert_eq!(summary.entered_total, dec("975.00"));
        assert_eq!(summary.difference, BigDecimal::from(0));
        assert!(summary.is_reconciled);
        assert!(summary.can_close);
    }

    #[test]
    fn test_validate_line_items_rejects_negative_amounts() {
        let items = vec![line("c1", "10"), line("c2", "0")];
        assert!(validate_line_items(&items).is_ok());

        let items = vec![line("c1", "10"), line("bad", "-5")];
        match validate_line_items(&items) {
            Err(ChurchError::Validation(msg)) => assert!(msg.contains("bad")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_currency_tolerance_override() {
        let config = ReconciliationConfig::default().with_currency_tolerance("zig", dec("0.5"));
        assert_eq!(config.tolerance_for("ZiG"), &dec("0.5"));
        assert_eq!(config.tolerance_for("USD"), &dec("0.001"));
    }
}
