use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::gateway::PaymentApiClient;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub dependencies: HashMap<String, DependencyStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyStatus {
    Healthy { status: String, latency_ms: u64 },
    Unhealthy { status: String, error: String },
}

#[async_trait]
pub trait DependencyChecker: Send + Sync {
    async fn check(&self) -> DependencyStatus;
}

/// Reachability of the payment API. Any HTTP answer counts as reachable,
/// since the API has no dedicated health route.
#[derive(Clone)]
pub struct PaymentApiChecker {
    client: PaymentApiClient,
}

impl PaymentApiChecker {
    pub fn new(client: PaymentApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DependencyChecker for PaymentApiChecker {
    async fn check(&self) -> DependencyStatus {
        let start = Instant::now();
        match self.client.http().get(self.client.base_url()).send().await {
            Ok(_) => DependencyStatus::Healthy {
                status: "healthy".to_string(),
                latency_ms: start.elapsed().as_millis() as u64,
            },
            Err(e) => DependencyStatus::Unhealthy {
                status: "unhealthy".to_string(),
                error: e.to_string(),
            },
        }
    }
}

pub async fn check_health(payment_api: &dyn DependencyChecker, start_time: Instant) -> HealthResponse {
    let timeout_duration = Duration::from_secs(5);

    let payment_api_result = timeout(timeout_duration, payment_api.check()).await;

    let mut dependencies = HashMap::new();

    dependencies.insert(
        "payment_api".to_string(),
        payment_api_result.unwrap_or_else(|_| DependencyStatus::Unhealthy {
            status: "unhealthy".to_string(),
            error: "timeout".to_string(),
        }),
    );

    let overall_status = determine_overall_status(&dependencies);

    HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: start_time.elapsed().as_secs(),
        dependencies,
    }
}

// The session keeps serving its state while the payment API is down, so an
// unreachable API only degrades health.
fn determine_overall_status(dependencies: &HashMap<String, DependencyStatus>) -> String {
    let has_failure = dependencies
        .values()
        .any(|status| matches!(status, DependencyStatus::Unhealthy { .. }));

    if has_failure {
        "degraded".to_string()
    } else {
        "healthy".to_string()
    }
}
