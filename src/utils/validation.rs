//! Validation utilities

use crate::currency::is_well_formed_code;
use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is zero or more
pub fn validate_non_negative_amount(amount: &BigDecimal) -> ChurchResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(ChurchError::Validation(
            "Amount cannot be negative".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a record ID is valid
pub fn validate_record_id(id: &str) -> ChurchResult<()> {
    if id.trim().is_empty() {
        return Err(ChurchError::Validation("ID cannot be empty".to_string()));
    }

    if id.len() > 64 {
        return Err(ChurchError::Validation(
            "ID cannot exceed 64 characters".to_string(),
        ));
    }

    if !id.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Err(ChurchError::Validation(
            "ID can only contain alphanumeric characters, dashes, and underscores".to_string(),
        ));
    }

    Ok(())
}

/// Validate a required text field, using `message` as the error text
pub fn validate_required(value: &str, message: &str) -> ChurchResult<()> {
    if value.trim().is_empty() {
        Err(ChurchError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

/// Validate that a currency code is three letters
pub fn validate_currency_code(code: &str) -> ChurchResult<()> {
    if is_well_formed_code(code.trim()) {
        Ok(())
    } else {
        Err(ChurchError::Validation(format!(
            "Invalid currency code: '{}'",
            code
        )))
    }
}

/// Stricter contribution validator for imports and API writes
///
/// On top of the form rules it checks record IDs, requires a check number for
/// check payments and refuses check numbers on any other method.
pub struct EnhancedContributionValidator;

impl ContributionValidator for EnhancedContributionValidator {
    fn validate_contribution(&self, contribution: &Contribution) -> ChurchResult<()> {
        DefaultContributionValidator.validate_contribution(contribution)?;

        validate_record_id(&contribution.id)?;
        validate_record_id(&contribution.batch_id)?;

        if let Donor::Member { id, .. } = &contribution.donor {
            validate_record_id(id)?;
        }

        match (&contribution.method, &contribution.check_number) {
            (PaymentMethod::Check, None) => Err(ChurchError::Validation(
                "Check number is required for check payments".to_string(),
            )),
            (PaymentMethod::Check, Some(number)) if number.trim().is_empty() => {
                Err(ChurchError::Validation(
                    "Check number is required for check payments".to_string(),
                ))
            }
            (PaymentMethod::Check, Some(_)) | (_, None) => Ok(()),
            (method, Some(_)) => Err(ChurchError::Validation(format!(
                "Check number is only valid for check payments, not {}",
                method
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn contribution(method: PaymentMethod, check_number: Option<&str>) -> Contribution {
        Contribution {
            id: "c001".to_string(),
            batch_id: "B004".to_string(),
            donor: Donor::Member {
                id: "m002".to_string(),
                name: "Jane Doe".to_string(),
            },
            fund: "General Tithes".to_string(),
            method,
            check_number: check_number.map(str::to_string),
            amount: BigDecimal::from(100),
            date: NaiveDate::from_ymd_opt(2023, 11, 5).unwrap(),
            transaction_id: None,
            notes: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_record_id_rules() {
        assert!(validate_record_id("B004").is_ok());
        assert!(validate_record_id("c_101-a").is_ok());
        assert!(validate_record_id("  ").is_err());
        assert!(validate_record_id("B 004").is_err());
        assert!(validate_record_id(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_currency_code_rules() {
        assert!(validate_currency_code("USD").is_ok());
        assert!(validate_currency_code("ZiG").is_ok());
        assert!(validate_currency_code("US$").is_err());
        assert!(validate_currency_code("XXX-invalid").is_err());
    }

    #[test]
    fn test_enhanced_validator_check_numbers() {
        let validator = EnhancedContributionValidator;
        assert!(validator
            .validate_contribution(&contribution(PaymentMethod::Check, Some("123")))
            .is_ok());
        assert!(validator
            .validate_contribution(&contribution(PaymentMethod::Check, None))
            .is_err());
        assert!(validator
            .validate_contribution(&contribution(PaymentMethod::Cash, Some("123")))
            .is_err());
        assert!(validator
            .validate_contribution(&contribution(PaymentMethod::Cash, None))
            .is_ok());
    }

    #[test]
    fn test_enhanced_validator_uses_form_amount_rule() {
        let mut zero = contribution(PaymentMethod::Cash, None);
        zero.amount = BigDecimal::from(0);
        match EnhancedContributionValidator.validate_contribution(&zero) {
            Err(ChurchError::Validation(msg)) => assert_eq!(msg, "A valid Amount is required."),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
