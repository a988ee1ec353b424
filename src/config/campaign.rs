use bigdecimal::BigDecimal;
use std::time::Duration;

/// Amount already raised before this session's orders are counted.
pub const RAISED_BASE_OFFSET: i64 = 2795;
/// Launch bonus as a percentage of the pre-order amount.
pub const BONUS_PERCENT: u32 = 20;
pub const MINIMUM_AMOUNT: i64 = 10;
pub const SUCCESS_DISPLAY_MS: u64 = 4000;

/// Fixed figures of the pre-order campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignSettings {
    pub base_offset: BigDecimal,
    pub bonus_percent: u32,
    pub minimum_amount: BigDecimal,
    pub success_display: Duration,
}

impl CampaignSettings {
    /// Bonus rate as a decimal fraction, `0.20` for a 20% bonus.
    pub fn bonus_rate(&self) -> BigDecimal {
        BigDecimal::from(self.bonus_percent) / BigDecimal::from(100)
    }
}

impl Default for CampaignSettings {
    fn default() -> Self {
        Self {
            base_offset: BigDecimal::from(RAISED_BASE_OFFSET).with_scale(2),
            bonus_percent: BONUS_PERCENT,
            minimum_amount: BigDecimal::from(MINIMUM_AMOUNT).with_scale(2),
            success_display: Duration::from_millis(SUCCESS_DISPLAY_MS),
        }
    }
}
