use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CustomerId, PhoneNumber, SmsLogId, TaskId, TypeConstraintError, UserId};

/// Outcome of one executed task, kept for history and analytics.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SmsLog {
    pub id: SmsLogId,
    pub user_id: UserId,
    pub task_id: TaskId,
    pub customer_id: Option<CustomerId>,
    pub phone: PhoneNumber,
    pub body: String,
    pub success: bool,
    pub error: Option<String>,
    pub created_at: NaiveDateTime,
}

impl SmsLog {
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        id: i32,
        user_id: &str,
        task_id: i32,
        customer_id: Option<i32>,
        phone: String,
        body: String,
        success: bool,
        error: Option<String>,
        created_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: SmsLogId::new(id)?,
            user_id: user_id.parse()?,
            task_id: TaskId::new(task_id)?,
            customer_id: customer_id.map(CustomerId::new).transpose()?,
            phone: PhoneNumber::new(phone)?,
            body,
            success,
            error,
            created_at,
        })
    }
}
