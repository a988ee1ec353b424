//! Input formatting for the card fields of the pre-order form.
//!
//! These run on every keystroke-equivalent field update, so each one is
//! idempotent: formatting an already formatted value returns it unchanged.

const CARD_RUN_MIN: usize = 4;
const CARD_RUN_MAX: usize = 16;
const CARD_GROUP: usize = 4;
const EXPIRY_DIGITS: usize = 4;
const CVC_DIGITS: usize = 3;

pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Groups the card number into blocks of four digits.
///
/// Non-digits are stripped first and at most 16 digits are kept. With fewer
/// than four digits there is nothing to group and the input comes back as
/// typed.
pub fn format_card_number(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() < CARD_RUN_MIN {
        return value.to_string();
    }

    let run = &digits[..digits.len().min(CARD_RUN_MAX)];
    run.as_bytes()
        .chunks(CARD_GROUP)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats an expiry as `MM/YY`, inserting the slash once two digits exist.
pub fn format_expiry(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() < 2 {
        return digits;
    }

    let end = digits.len().min(EXPIRY_DIGITS);
    format!("{}/{}", &digits[..2], &digits[2..end])
}

pub fn format_cvc(value: &str) -> String {
    digits_only(value).chars().take(CVC_DIGITS).collect()
}

/// Splits a formatted expiry into the two-digit month and four-digit year
/// the confirmation endpoint expects. A missing year part yields `"20"`.
pub fn split_expiry(expiry: &str) -> (String, String) {
    let (month, year) = expiry.split_once('/').unwrap_or((expiry, ""));
    (month.to_string(), format!("20{}", year))
}

pub fn last_four(card_number: &str) -> String {
    let digits = digits_only(card_number);
    let start = digits.len().saturating_sub(4);
    digits[start..].to_string()
}
