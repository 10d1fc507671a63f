//! Contribution entry and lookup

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reconciliation::compute_entered_total;
use crate::types::*;

/// Builder for a contribution line item
///
/// `build` applies the same required-field rules as the entry form and
/// reports the first failure as a `ChurchError::Validation` message.
#[derive(Debug, Clone)]
pub struct ContributionBuilder {
    batch_id: String,
    donor: Option<Donor>,
    amount: Option<BigDecimal>,
    fund: Option<String>,
    method: Option<PaymentMethod>,
    check_number: Option<String>,
    date: NaiveDate,
    transaction_id: Option<String>,
    notes: Option<String>,
}

impl ContributionBuilder {
    /// Start a contribution for a batch, dated today
    pub fn new(batch_id: impl Into<String>) -> Self {
        Self {
            batch_id: batch_id.into(),
            donor: None,
            amount: None,
            fund: None,
            method: None,
            check_number: None,
            date: chrono::Utc::now().date_naive(),
            transaction_id: None,
            notes: None,
        }
    }

    /// Attribute the gift to a member on record
    pub fn member(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.donor = Some(Donor::Member {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    /// Attribute the gift to a giver who is not in the directory
    pub fn donor_name(mut self, name: impl Into<String>) -> Self {
        self.donor = Some(Donor::Named(name.into()));
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.donor = Some(Donor::Anonymous);
        self
    }

    pub fn amount(mut self, amount: BigDecimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn fund(mut self, fund: impl Into<String>) -> Self {
        self.fund = Some(fund.into());
        self
    }

    pub fn method(mut self, method: PaymentMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Only kept when the method is `Check`
    pub fn check_number(mut self, number: impl Into<String>) -> Self {
        self.check_number = Some(number.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Validate and build the contribution
    pub fn build(self) -> ChurchResult<Contribution> {
        let donor = match self.donor {
            Some(Donor::Named(name)) if !name.trim().is_empty() => {
                Donor::Named(name.trim().to_string())
            }
            Some(donor @ (Donor::Member { .. } | Donor::Anonymous)) => donor,
            _ => {
                return Err(ChurchError::Validation(
                    "Donor Name is required unless contribution is anonymous.".to_string(),
                ))
            }
        };

        let amount = match self.amount {
            Some(amount) if amount > BigDecimal::from(0) => amount,
            _ => {
                return Err(ChurchError::Validation(
                    "A valid Amount is required.".to_string(),
                ))
            }
        };

        let fund = match self.fund {
            Some(fund) if !fund.trim().is_empty() => fund.trim().to_string(),
            _ => return Err(ChurchError::Validation("Fund is required.".to_string())),
        };

        let method = self.method.ok_or_else(|| {
            ChurchError::Validation("Payment Method is required.".to_string())
        })?;

        let check_number = match method {
            PaymentMethod::Check => self
                .check_number
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            _ => None,
        };

        Ok(Contribution {
            id: format!("c{}", Uuid::new_v4().simple()),
            batch_id: self.batch_id,
            donor,
            fund,
            method,
            check_number,
            amount,
            date: self.date,
            transaction_id: self.transaction_id,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            created_at: chrono::Utc::now().naive_utc(),
        })
    }
}

/// Criteria for searching contributions across batches
///
/// Every criterion left unset matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributionFilter {
    /// Case-insensitive match on donor name, batch ID or notes
    pub search: Option<String>,
    pub fund: Option<String>,
    pub method: Option<PaymentMethod>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ContributionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn fund(mut self, fund: impl Into<String>) -> Self {
        self.fund = Some(fund.into());
        self
    }

    pub fn method(mut self, method: PaymentMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Inclusive date range; either end may be open
    pub fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn matches(&self, contribution: &Contribution) -> bool {
        if let Some(term) = self.search.as_deref().map(str::trim) {
            if !term.is_empty() {
                let term = term.to_lowercase();
                let hit = contribution
                    .donor
                    .display_name()
                    .to_lowercase()
                    .contains(&term)
                    || contribution.batch_id.to_lowercase().contains(&term)
                    || contribution
                        .notes
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&term));
                if !hit {
                    return false;
                }
            }
        }

        if let Some(fund) = &self.fund {
            if &contribution.fund != fund {
                return false;
            }
        }

        if let Some(method) = &self.method {
            if &contribution.method != method {
                return false;
            }
        }

        if let Some(start) = self.start_date {
            if contribution.date < start {
                return false;
            }
        }

        if let Some(end) = self.end_date {
            if contribution.date > end {
                return false;
            }
        }

        true
    }
}

/// Contributions matching a query, with their total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionSearch {
    pub contributions: Vec<Contribution>,
    pub total: BigDecimal,
}

impl ContributionSearch {
    pub fn new(contributions: Vec<Contribution>) -> Self {
        let total = compute_entered_total(&contributions);
        Self {
            contributions,
            total,
        }
    }

    pub fn len(&self) -> usize {
        self.contributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn validation_message(result: ChurchResult<Contribution>) -> String {
        match result {
            Err(ChurchError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_requires_donor_unless_anonymous() {
        let missing = ContributionBuilder::new("B004")
            .amount(BigDecimal::from(10))
            .fund("General Tithes")
            .method(PaymentMethod::Cash)
            .build();
        assert_eq!(
            validation_message(missing),
            "Donor Name is required unless contribution is anonymous."
        );

        let blank = ContributionBuilder::new("B004")
            .donor_name("   ")
            .amount(BigDecimal::from(10))
            .fund("General Tithes")
            .method(PaymentMethod::Cash)
            .build();
        assert!(blank.is_err());

        let anonymous = ContributionBuilder::new("B004")
            .anonymous()
            .amount(BigDecimal::from(10))
            .fund("Loose Offering")
            .method(PaymentMethod::Cash)
            .build()
            .unwrap();
        assert!(anonymous.donor.is_anonymous());
    }

    #[test]
    fn test_builder_rejects_non_positive_amount() {
        for amount in [None, Some(BigDecimal::from(0)), Some(BigDecimal::from(-5))] {
            let mut builder = ContributionBuilder::new("B004")
                .member("m002", "Jane Doe")
                .fund("General Tithes")
                .method(PaymentMethod::Cash);
            if let Some(amount) = amount {
                builder = builder.amount(amount);
            }
            assert_eq!(validation_message(builder.build()), "A valid Amount is required.");
        }
    }

    #[test]
    fn test_builder_requires_fund_and_method() {
        let no_fund = ContributionBuilder::new("B004")
            .member("m002", "Jane Doe")
            .amount(BigDecimal::from(10))
            .method(PaymentMethod::Cash)
            .build();
        assert_eq!(validation_message(no_fund), "Fund is required.");

        let no_method = ContributionBuilder::new("B004")
            .member("m002", "Jane Doe")
            .amount(BigDecimal::from(10))
            .fund("Missions Fund")
            .build();
        assert_eq!(validation_message(no_method), "Payment Method is required.");
    }

    #[test]
    fn test_check_number_only_kept_for_checks() {
        let cash = ContributionBuilder::new("B004")
            .member("m002", "Jane Doe")
            .amount(BigDecimal::from_str("25.00").unwrap())
            .fund("General Tithes")
            .method(PaymentMethod::Cash)
            .check_number("999")
            .build()
            .unwrap();
        assert!(cash.check_number.is_none());

        let check = ContributionBuilder::new("B004")
            .member("m002", "Jane Doe")
            .amount(BigDecimal::from_str("25.00").unwrap())
            .fund("General Tithes")
            .method(PaymentMethod::Check)
            .check_number(" 123 ")
            .build()
            .unwrap();
        assert_eq!(check.check_number.as_deref(), Some("123"));
        assert!(check.id.starts_with('c'));
    }

    #[test]
    fn test_filter_matches() {
        let contribution = ContributionBuilder::new("B001")
            .donor_name("Alice Wonderland")
            .amount(BigDecimal::from(100))
            .fund("General Fund")
            .method(PaymentMethod::Check)
            .check_number("123")
            .notes("Sunday Offering")
            .date(NaiveDate::from_ymd_opt(2023, 7, 20).unwrap())
            .build()
            .unwrap();

        assert!(ContributionFilter::new().matches(&contribution));
        assert!(ContributionFilter::new().search("alice").matches(&contribution));
        assert!(ContributionFilter::new().search("b001").matches(&contribution));
        assert!(ContributionFilter::new().search("offering").matches(&contribution));
        assert!(!ContributionFilter::new().search("bob").matches(&contribution));
        assert!(!ContributionFilter::new().fund("Missions").matches(&contribution));
        assert!(ContributionFilter::new()
            .method(PaymentMethod::Check)
            .matches(&contribution));

        let july = ContributionFilter::new().between(
            NaiveDate::from_ymd_opt(2023, 7, 20),
            NaiveDate::from_ymd_opt(2023, 7, 31),
        );
        assert!(july.matches(&contribution));
        let later = ContributionFilter::new().between(NaiveDate::from_ymd_opt(2023, 7, 21), None);
        assert!(!later.matches(&contribution));
    }
}
