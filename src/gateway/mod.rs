//! Remote payment API: wire types and the gateway seam.

pub mod client;

use async_trait::async_trait;
use bigdecimal::{BigDecimal, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

pub use client::PaymentApiClient;

pub const CREATE_INTENT_PATH: &str = "/api/create-payment-intent";
pub const CONFIRM_PAYMENT_PATH: &str = "/api/confirm-payment";

/// Marker separating the intent id from the rest of a client secret.
pub const SECRET_DELIMITER: &str = "_secret_";

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Failed to create payment intent")]
    IntentRejected { status: u16 },
    #[error("Invalid response from payment API: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequest {
    pub email: String,
    #[serde(serialize_with = "amount_as_number")]
    pub amount: BigDecimal,
    pub card_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse {
    pub client_secret: String,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
}

impl CreateIntentResponse {
    /// The explicit intent id when the API sends one, otherwise the prefix
    /// of the client secret.
    pub fn intent_id(&self) -> &str {
        match self.payment_intent_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => intent_id_from_secret(&self.client_secret),
        }
    }
}

/// Everything before `_secret_`, or the whole secret when it has no marker.
pub fn intent_id_from_secret(client_secret: &str) -> &str {
    client_secret
        .split_once(SECRET_DELIMITER)
        .map_or(client_secret, |(id, _)| id)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    pub payment_intent_id: String,
    pub card_token: CardToken,
    pub email: String,
    #[serde(serialize_with = "amount_as_number")]
    pub amount: BigDecimal,
    pub card_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardToken {
    pub card: CardDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardDetails {
    pub number: String,
    pub exp_month: String,
    pub exp_year: String,
    pub cvc: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPaymentResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub order: Option<ConfirmedOrderRef>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmedOrderRef {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_intent(
        &self,
        request: &CreateIntentRequest,
    ) -> Result<CreateIntentResponse, GatewayError>;

    async fn confirm_payment(
        &self,
        request: &ConfirmPaymentRequest,
    ) -> Result<ConfirmPaymentResponse, GatewayError>;
}

// The payment API reads amounts as JSON numbers.
fn amount_as_number<S>(amount: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match amount.to_f64() {
        Some(value) => serializer.serialize_f64(value),
        None => Err(serde::ser::Error::custom(format!(
            "amount {} is not representable as a number",
            amount
        ))),
    }
}

fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "order id must be a string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn intent_id_is_the_secret_prefix() {
        assert_eq!(intent_id_from_secret("pi_123_secret_abc"), "pi_123");
        assert_eq!(intent_id_from_secret("pi_no_marker"), "pi_no_marker");
        assert_eq!(intent_id_from_secret("_secret_abc"), "");
    }

    #[test]
    fn explicit_intent_id_wins_over_the_secret() {
        let response: CreateIntentResponse = serde_json::from_value(json!({
            "clientSecret": "pi_123_secret_abc",
            "paymentIntentId": "pi_explicit"
        }))
        .unwrap();
        assert_eq!(response.intent_id(), "pi_explicit");

        let response: CreateIntentResponse =
            serde_json::from_value(json!({ "clientSecret": "pi_123_secret_abc" })).unwrap();
        assert_eq!(response.intent_id(), "pi_123");
    }

    #[test]
    fn confirm_request_matches_the_wire_shape() {
        let request = ConfirmPaymentRequest {
            payment_intent_id: "pi_123".to_string(),
            card_token: CardToken {
                card: CardDetails {
                    number: "4242424242424242".to_string(),
                    exp_month: "09".to_string(),
                    exp_year: "2027".to_string(),
                    cvc: "123".to_string(),
                },
            },
            email: "fan@example.com".to_string(),
            amount: BigDecimal::from(25),
            card_name: "Ada Lovelace".to_string(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "paymentIntentId": "pi_123",
                "cardToken": {
                    "card": {
                        "number": "4242424242424242",
                        "exp_month": "09",
                        "exp_year": "2027",
                        "cvc": "123"
                    }
                },
                "email": "fan@example.com",
                "amount": 25.0,
                "cardName": "Ada Lovelace"
            })
        );
    }

    #[test]
    fn confirm_response_tolerates_missing_fields_and_numeric_ids() {
        let declined: ConfirmPaymentResponse =
            serde_json::from_value(json!({ "success": false, "error": "card declined" })).unwrap();
        assert!(!declined.success);
        assert_eq!(declined.error.as_deref(), Some("card declined"));

        let confirmed: ConfirmPaymentResponse =
            serde_json::from_value(json!({ "success": true, "order": { "id": 42 } })).unwrap();
        assert_eq!(confirmed.order.unwrap().id, "42");

        let empty: ConfirmPaymentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(!empty.success);
    }
}
