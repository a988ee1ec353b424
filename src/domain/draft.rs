//! The pre-order form as it is being filled in.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::utils::card::{format_card_number, format_cvc, format_expiry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Email,
    Amount,
    CardName,
    CardNumber,
    Expiry,
    Cvc,
}

impl DraftField {
    pub const ALL: [DraftField; 6] = [
        DraftField::Email,
        DraftField::Amount,
        DraftField::CardName,
        DraftField::CardNumber,
        DraftField::Expiry,
        DraftField::Cvc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DraftField::Email => "email",
            DraftField::Amount => "amount",
            DraftField::CardName => "card_name",
            DraftField::CardNumber => "card_number",
            DraftField::Expiry => "expiry",
            DraftField::Cvc => "cvc",
        }
    }
}

/// Raw form input. Card fields are kept in their display format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DraftOrder {
    pub email: String,
    pub amount: String,
    pub card_name: String,
    pub card_number: String,
    pub expiry: String,
    pub cvc: String,
}

impl DraftOrder {
    /// Stores `value` in `field`, running the field's input formatter.
    pub fn set(&mut self, field: DraftField, value: &str) {
        match field {
            DraftField::Email => self.email = value.to_string(),
            DraftField::Amount => self.amount = value.to_string(),
            DraftField::CardName => self.card_name = value.to_string(),
            DraftField::CardNumber => self.card_number = format_card_number(value),
            DraftField::Expiry => self.expiry = format_expiry(value),
            DraftField::Cvc => self.cvc = format_cvc(value),
        }
    }

    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Email => &self.email,
            DraftField::Amount => &self.amount,
            DraftField::CardName => &self.card_name,
            DraftField::CardNumber => &self.card_number,
            DraftField::Expiry => &self.expiry,
            DraftField::Cvc => &self.cvc,
        }
    }

    pub fn clear(&mut self) {
        *self = DraftOrder::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == DraftOrder::default()
    }
}

/// A partial form update. Absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DraftPatch {
    pub email: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: Option<String>,
    pub card_name: Option<String>,
    pub card_number: Option<String>,
    pub expiry: Option<String>,
    pub cvc: Option<String>,
}

impl DraftPatch {
    pub fn apply_to(&self, draft: &mut DraftOrder) {
        for field in DraftField::ALL {
            if let Some(value) = self.value(field) {
                draft.set(field, value);
            }
        }
    }

    fn value(&self, field: DraftField) -> Option<&str> {
        match field {
            DraftField::Email => self.email.as_deref(),
            DraftField::Amount => self.amount.as_deref(),
            DraftField::CardName => self.card_name.as_deref(),
            DraftField::CardNumber => self.card_number.as_deref(),
            DraftField::Expiry => self.expiry.as_deref(),
            DraftField::Cvc => self.cvc.as_deref(),
        }
    }
}

// Form inputs may send the amount as text or as a JSON number.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "amount must be a string or number, got {}",
            other
        ))),
    }
}
