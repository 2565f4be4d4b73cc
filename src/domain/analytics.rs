//! Aggregates backing the admin analytics endpoint.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::types::UserId;

/// Sent/failed SMS counts for one calendar day (UTC).
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DailySmsCount {
    pub day: NaiveDate,
    pub sent: i64,
    pub failed: i64,
}

/// Number of successful sends attributed to a user.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SenderCount {
    pub user_id: UserId,
    pub sent: i64,
}

/// Number of tasks currently in a given status.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct UsageStats {
    pub total_customers: i64,
    pub tasks_by_status: Vec<StatusCount>,
    pub daily: Vec<DailySmsCount>,
    pub top_senders: Vec<SenderCount>,
    pub requests: i64,
}
