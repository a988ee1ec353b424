use bigdecimal::BigDecimal;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::order::to_cents;
use crate::domain::{DraftField, DraftOrder};
use crate::utils::card::{digits_only, split_expiry};

pub const AMOUNT_MAX_INTEGER_DIGITS: usize = 9;
pub const AMOUNT_MAX_FRACTION_DIGITS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingField { field: &'static str },

    #[error("Please enter a valid amount")]
    InvalidAmount,

    #[error("Minimum pre-order is ${minimum}")]
    AmountTooLow { minimum: String },
}

pub type ValidationResult = Result<(), ValidationError>;

/// A draft that passed validation, in the shape the payment API wants.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDraft {
    pub email: String,
    pub amount: BigDecimal,
    pub card_name: String,
    /// Digits only.
    pub card_number: String,
    pub exp_month: String,
    pub exp_year: String,
    pub cvc: String,
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }

    Ok(())
}

/// Accepts plain decimal notation only. Exponents are refused so the parsed
/// value always stays within the digit bounds.
pub fn parse_amount(raw: &str) -> Result<BigDecimal, ValidationError> {
    let raw = raw.trim();
    if !is_plain_decimal(raw) {
        return Err(ValidationError::InvalidAmount);
    }

    BigDecimal::from_str(raw).map_err(|_| ValidationError::InvalidAmount)
}

fn is_plain_decimal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(&['+', '-'][..]).unwrap_or(raw);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    !(whole.is_empty() && fraction.is_empty())
        && whole.len() <= AMOUNT_MAX_INTEGER_DIGITS
        && fraction.len() <= AMOUNT_MAX_FRACTION_DIGITS
        && whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit())
}

pub fn validate_minimum_amount(amount: &BigDecimal, minimum: &BigDecimal) -> ValidationResult {
    if amount < minimum {
        return Err(ValidationError::AmountTooLow {
            minimum: to_cents(minimum).to_string(),
        });
    }

    Ok(())
}

/// Checks presence of every field, then the amount.
pub fn validate_draft(
    draft: &DraftOrder,
    minimum: &BigDecimal,
) -> Result<ValidatedDraft, ValidationError> {
    for field in DraftField::ALL {
        validate_required(field.as_str(), draft.get(field))?;
    }

    let amount = parse_amount(&draft.amount)?;
    validate_minimum_amount(&amount, minimum)?;

    let (exp_month, exp_year) = split_expiry(&draft.expiry);

    Ok(ValidatedDraft {
        email: draft.email.trim().to_string(),
        amount,
        card_name: draft.card_name.trim().to_string(),
        card_number: digits_only(&draft.card_number),
        exp_month,
        exp_year,
        cvc: draft.cvc.clone(),
    })
}
