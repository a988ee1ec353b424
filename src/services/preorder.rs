//! Pre-order workflow controller.
//!
//! Owns the draft form, the order ledger and the transient flags of one
//! pre-order session. Session state sits behind an async mutex that is only
//! held for short critical sections; the two payment API calls run with the
//! lock released and the `loading` flag set instead.

use bigdecimal::BigDecimal;
use chrono::Local;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::CampaignSettings;
use crate::domain::{ConfirmedOrder, DraftField, DraftOrder, DraftPatch, OrderLedger};
use crate::error::PreorderError;
use crate::gateway::PaymentGateway;
use crate::use_cases::SubmitPreorder;
use crate::validation::validate_draft;

use super::success_banner::{SuccessBanner, SUCCESS_MESSAGE};

struct SessionState {
    draft: DraftOrder,
    ledger: OrderLedger,
    loading: bool,
    error: Option<String>,
    banner: SuccessBanner,
}

/// What the pre-order form currently shows.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub draft: DraftOrder,
    pub loading: bool,
    pub error: Option<String>,
    pub success: bool,
    pub success_message: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignStats {
    pub supporters: usize,
    pub total_raised: BigDecimal,
    pub bonus_percent: u32,
    pub minimum_amount: BigDecimal,
}

pub struct PreorderController {
    submit: Arc<SubmitPreorder>,
    settings: CampaignSettings,
    state: Arc<Mutex<SessionState>>,
}

impl PreorderController {
    pub fn new(gateway: Arc<dyn PaymentGateway>, settings: CampaignSettings) -> Self {
        let state = SessionState {
            draft: DraftOrder::default(),
            ledger: OrderLedger::new(settings.base_offset.clone()),
            loading: false,
            error: None,
            banner: SuccessBanner::new(settings.success_display),
        };

        Self {
            submit: Arc::new(SubmitPreorder::new(gateway, settings.bonus_rate())),
            settings,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub async fn set_field(&self, field: DraftField, value: &str) -> DraftOrder {
        let mut state = self.state.lock().await;
        state.draft.set(field, value);
        state.draft.clone()
    }

    pub async fn apply_patch(&self, patch: &DraftPatch) -> DraftOrder {
        let mut state = self.state.lock().await;
        patch.apply_to(&mut state.draft);
        state.draft.clone()
    }

    pub async fn draft(&self) -> DraftOrder {
        self.state.lock().await.draft.clone()
    }

    /// Validates the draft and runs the payment flow.
    ///
    /// On success the order is appended to the ledger, the draft is cleared
    /// and the success banner is shown. Every failure except `Busy` is also
    /// recorded as the session's current error message.
    pub async fn submit(&self) -> Result<ConfirmedOrder, PreorderError> {
        self.submit_with(None).await
    }

    /// Like [`submit`](Self::submit), but first applies `patch` to the draft.
    /// A busy session rejects the request without touching the draft.
    ///
    /// The payment flow runs on its own task and settles the session even if
    /// the caller stops waiting for it.
    pub async fn submit_with(
        &self,
        patch: Option<&DraftPatch>,
    ) -> Result<ConfirmedOrder, PreorderError> {
        let validated = {
            let mut state = self.state.lock().await;
            if state.loading {
                return Err(PreorderError::Busy);
            }
            if let Some(patch) = patch {
                patch.apply_to(&mut state.draft);
            }
            state.error = None;

            match validate_draft(&state.draft, &self.settings.minimum_amount) {
                Ok(validated) => {
                    state.loading = true;
                    validated
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Pre-order rejected before submission");
                    let err = PreorderError::from(err);
                    state.error = Some(err.to_string());
                    return Err(err);
                }
            }
        };

        tracing::info!(amount = %validated.amount, "Submitting pre-order");
        let submit = Arc::clone(&self.submit);
        let state = Arc::clone(&self.state);
        let date = Local::now().date_naive();
        let flow = tokio::spawn(async move {
            let result = submit.execute(validated, date).await;
            settle(&state, result).await
        });

        match flow.await {
            Ok(result) => result,
            Err(join_error) => {
                tracing::error!(error = %join_error, "Payment flow task failed");
                let err = PreorderError::network(join_error.to_string());
                let mut state = self.state.lock().await;
                state.loading = false;
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn view(&self) -> SessionView {
        let state = self.state.lock().await;
        let success = state.banner.is_visible();
        SessionView {
            draft: state.draft.clone(),
            loading: state.loading,
            error: state.error.clone(),
            success,
            success_message: success.then_some(SUCCESS_MESSAGE),
        }
    }

    pub async fn orders_newest_first(&self) -> Vec<ConfirmedOrder> {
        let state = self.state.lock().await;
        state.ledger.newest_first().cloned().collect()
    }

    pub async fn total_raised(&self) -> BigDecimal {
        self.state.lock().await.ledger.total_raised()
    }

    pub async fn stats(&self) -> CampaignStats {
        let state = self.state.lock().await;
        CampaignStats {
            supporters: state.ledger.len(),
            total_raised: state.ledger.total_raised(),
            bonus_percent: self.settings.bonus_percent,
            minimum_amount: self.settings.minimum_amount.clone(),
        }
    }
}

async fn settle(
    state: &Mutex<SessionState>,
    result: Result<ConfirmedOrder, PreorderError>,
) -> Result<ConfirmedOrder, PreorderError> {
    let mut state = state.lock().await;
    state.loading = false;
    match result {
        Ok(order) => {
            tracing::info!(
                order_id = %order.id(),
                amount = %order.amount(),
                supporters = state.ledger.len() + 1,
                "Pre-order confirmed"
            );
            state.ledger.push(order.clone());
            state.draft.clear();
            state.banner.show();
            Ok(order)
        }
        Err(err) => {
            tracing::error!(error = %err, "Payment error");
            state.error = Some(err.to_string());
            Err(err)
        }
    }
}
