//! Submit pre-order use case.
//! Runs the two-step payment flow for an already validated draft.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::ConfirmedOrder;
use crate::error::PreorderError;
use crate::gateway::{
    CardDetails, CardToken, ConfirmPaymentRequest, CreateIntentRequest, PaymentGateway,
    SECRET_DELIMITER,
};
use crate::validation::ValidatedDraft;

/// Use case for submitting a pre-order to the payment API.
pub struct SubmitPreorder {
    gateway: Arc<dyn PaymentGateway>,
    bonus_rate: BigDecimal,
}

impl SubmitPreorder {
    pub fn new(gateway: Arc<dyn PaymentGateway>, bonus_rate: BigDecimal) -> Self {
        Self {
            gateway,
            bonus_rate,
        }
    }

    /// Creates a payment intent, then confirms it with the card details.
    /// The confirmation call is never made when the intent call fails.
    pub async fn execute(
        &self,
        input: ValidatedDraft,
        date: NaiveDate,
    ) -> Result<ConfirmedOrder, PreorderError> {
        let intent = self
            .gateway
            .create_payment_intent(&CreateIntentRequest {
                email: input.email.clone(),
                amount: input.amount.clone(),
                card_name: input.card_name.clone(),
            })
            .await?;

        if intent.payment_intent_id.is_none() && !intent.client_secret.contains(SECRET_DELIMITER) {
            tracing::warn!("Client secret has no intent marker; using it whole as the intent id");
        }
        let payment_intent_id = intent.intent_id().to_string();
        tracing::debug!(payment_intent_id = %payment_intent_id, "Payment intent created");

        let confirmation = self
            .gateway
            .confirm_payment(&ConfirmPaymentRequest {
                payment_intent_id,
                card_token: CardToken {
                    card: CardDetails {
                        number: input.card_number.clone(),
                        exp_month: input.exp_month,
                        exp_year: input.exp_year,
                        cvc: input.cvc,
                    },
                },
                email: input.email.clone(),
                amount: input.amount.clone(),
                card_name: input.card_name,
            })
            .await?;

        if !confirmation.success {
            return Err(PreorderError::declined(confirmation.error));
        }

        let order_ref = confirmation.order.ok_or_else(|| {
            PreorderError::network("Payment confirmed but the response carried no order")
        })?;

        Ok(ConfirmedOrder::new(
            order_ref.id,
            input.email,
            input.amount,
            date,
            &input.card_number,
            &self.bonus_rate,
        ))
    }
}
