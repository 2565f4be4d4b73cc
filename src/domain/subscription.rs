//! Payment-free plan that gates how many SMS a user may queue per day.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{TypeConstraintError, UserId};

string_enum!(
    Plan {
        Free => "free",
        Basic => "basic",
        Pro => "pro",
    }
);

string_enum!(
    SubscriptionStatus {
        Active => "active",
        Paused => "paused",
    }
);

impl Plan {
    /// Daily task allowance applied when an admin does not set one explicitly.
    pub const fn default_daily_limit(self) -> i32 {
        match self {
            Plan::Free => 50,
            Plan::Basic => 300,
            Plan::Pro => 1000,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub user_id: UserId,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub daily_limit: i32,
    pub expires_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

impl Subscription {
    pub fn try_new(
        user_id: &str,
        plan: &str,
        status: &str,
        daily_limit: i32,
        expires_at: Option<NaiveDateTime>,
        updated_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        if daily_limit < 0 {
            return Err(TypeConstraintError::InvalidValue(daily_limit.to_string()));
        }
        Ok(Self {
            user_id: user_id.parse()?,
            plan: plan.parse()?,
            status: status.parse()?,
            daily_limit,
            expires_at,
            updated_at,
        })
    }

    /// Placeholder returned for users that were never provisioned.
    pub fn inactive(user_id: UserId, now: NaiveDateTime) -> Self {
        Self {
            user_id,
            plan: Plan::Free,
            status: SubscriptionStatus::Paused,
            daily_limit: 0,
            expires_at: None,
            updated_at: now,
        }
    }

    pub fn is_active(&self, now: NaiveDateTime) -> bool {
        self.status == SubscriptionStatus::Active
            && self.expires_at.is_none_or(|expires_at| expires_at > now)
    }

    /// Number of tasks that can still be queued today.
    pub fn remaining_today(&self, used_today: usize, now: NaiveDateTime) -> usize {
        if !self.is_active(now) {
            return 0;
        }
        usize::try_from(self.daily_limit)
            .unwrap_or(0)
            .saturating_sub(used_today)
    }
}

#[derive(Clone, Debug)]
pub struct UpsertSubscription {
    pub user_id: UserId,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub daily_limit: i32,
    pub expires_at: Option<NaiveDateTime>,
}
