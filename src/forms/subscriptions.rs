use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::subscription::{Plan, SubscriptionStatus, UpsertSubscription};
use crate::domain::types::UserId;
use crate::forms::FormError;

/// Body of `PUT /api/admin/subscriptions/{user_id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSubscriptionForm {
    pub plan: Plan,
    pub status: SubscriptionStatus,
    /// Falls back to the plan's default allowance.
    #[serde(default)]
    #[validate(range(min = 0, max = 100_000))]
    pub daily_limit: Option<i32>,
    #[serde(default)]
    pub expires_at: Option<NaiveDateTime>,
}

impl UpdateSubscriptionForm {
    pub fn into_upsert(self, user_id: UserId) -> Result<UpsertSubscription, FormError> {
        self.validate()?;
        Ok(UpsertSubscription {
            user_id,
            plan: self.plan,
            status: self.status,
            daily_limit: self
                .daily_limit
                .unwrap_or_else(|| self.plan.default_daily_limit()),
            expires_at: self.expires_at,
        })
    }
}
