//! Confirmed pre-order entity.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;

use crate::utils::card::last_four;

/// Rounds to cents and pins the scale so amounts always render with two
/// decimals.
pub fn to_cents(amount: &BigDecimal) -> BigDecimal {
    amount.round(2).with_scale(2)
}

/// A pre-order the payment API has confirmed. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmedOrder {
    id: String,
    email: String,
    amount: BigDecimal,
    date: NaiveDate,
    card_last4: String,
    bonus: BigDecimal,
}

impl ConfirmedOrder {
    pub fn new(
        id: String,
        email: String,
        amount: BigDecimal,
        date: NaiveDate,
        card_number: &str,
        bonus_rate: &BigDecimal,
    ) -> Self {
        let bonus = to_cents(&(&amount * bonus_rate));
        Self {
            id,
            email,
            amount,
            date,
            card_last4: last_four(card_number),
            bonus,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn amount(&self) -> &BigDecimal {
        &self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Submission date as shown on the order list, e.g. `10/7/2026`.
    pub fn display_date(&self) -> String {
        self.date.format("%-m/%-d/%Y").to_string()
    }

    pub fn card_last4(&self) -> &str {
        &self.card_last4
    }

    pub fn bonus(&self) -> &BigDecimal {
        &self.bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn rate() -> BigDecimal {
        BigDecimal::from_str("0.20").unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 7).unwrap()
    }

    #[test]
    fn bonus_is_twenty_percent_in_cents() {
        let order = ConfirmedOrder::new(
            "ord_1".to_string(),
            "fan@example.com".to_string(),
            BigDecimal::from(25),
            date(),
            "4242 4242 4242 4242",
            &rate(),
        );

        assert_eq!(order.bonus().to_string(), "5.00");
        assert_eq!(order.card_last4(), "4242");
    }

    #[test]
    fn bonus_rounds_to_two_decimals() {
        let order = ConfirmedOrder::new(
            "ord_2".to_string(),
            "fan@example.com".to_string(),
            BigDecimal::from_str("10.33").unwrap(),
            date(),
            "4000 0566 5566 5556",
            &rate(),
        );

        assert_eq!(order.bonus().to_string(), "2.07");
        assert_eq!(order.card_last4(), "5556");
    }

    #[test]
    fn display_date_has_no_padding() {
        let order = ConfirmedOrder::new(
            "ord_3".to_string(),
            "fan@example.com".to_string(),
            BigDecimal::from(10),
            date(),
            "4242",
            &rate(),
        );

        assert_eq!(order.display_date(), "10/7/2026");
    }

    #[test]
    fn to_cents_pins_two_decimals() {
        assert_eq!(to_cents(&BigDecimal::from(25)).to_string(), "25.00");
        assert_eq!(to_cents(&BigDecimal::from_str("25.5").unwrap()).to_string(), "25.50");
    }
}
