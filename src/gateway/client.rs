use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{
    ConfirmPaymentRequest, ConfirmPaymentResponse, CreateIntentRequest, CreateIntentResponse,
    GatewayError, PaymentGateway, CONFIRM_PAYMENT_PATH, CREATE_INTENT_PATH,
};
use crate::utils::sanitize::sanitize_json;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the pre-order payment API
#[derive(Clone)]
pub struct PaymentApiClient {
    client: Client,
    base_url: String,
}

impl PaymentApiClient {
    /// Creates a new PaymentApiClient with the specified base URL
    pub fn new(base_url: String) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new PaymentApiClient whose requests give up after `timeout`
    pub fn with_timeout(base_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        PaymentApiClient { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn trace_body<T: Serialize>(path: &str, body: &T) {
        if tracing::enabled!(tracing::Level::DEBUG) {
            let rendered = serde_json::to_value(body)
                .map(|value| sanitize_json(&value).to_string())
                .unwrap_or_else(|_| "[unserializable]".to_string());
            tracing::debug!(path, body = %rendered, "Calling payment API");
        }
    }
}

#[async_trait]
impl PaymentGateway for PaymentApiClient {
    async fn create_payment_intent(
        &self,
        request: &CreateIntentRequest,
    ) -> Result<CreateIntentResponse, GatewayError> {
        Self::trace_body(CREATE_INTENT_PATH, request);

        let response = self
            .client
            .post(self.endpoint(CREATE_INTENT_PATH))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Payment intent request rejected");
            return Err(GatewayError::IntentRejected {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice::<CreateIntentResponse>(&bytes)
            .map_err(|e| GatewayError::InvalidResponse(format!("payment intent: {}", e)))
    }

    async fn confirm_payment(
        &self,
        request: &ConfirmPaymentRequest,
    ) -> Result<ConfirmPaymentResponse, GatewayError> {
        Self::trace_body(CONFIRM_PAYMENT_PATH, request);

        let response = self
            .client
            .post(self.endpoint(CONFIRM_PAYMENT_PATH))
            .json(request)
            .send()
            .await?;

        // Declines come back as non-2xx with a JSON body, so the status is
        // not checked here.
        let status = response.status();
        let bytes = response.bytes().await?;
        serde_json::from_slice::<ConfirmPaymentResponse>(&bytes).map_err(|e| {
            GatewayError::InvalidResponse(format!(
                "payment confirmation (status {}): {}",
                status.as_u16(),
                e
            ))
        })
    }
}
