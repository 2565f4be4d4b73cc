use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CustomerId, SummaryText, TypeConstraintError, UserId};

/// Running LLM summary of the conversation with one customer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConversationSummary {
    pub customer_id: CustomerId,
    pub user_id: UserId,
    pub summary: SummaryText,
    pub updated_at: NaiveDateTime,
}

impl ConversationSummary {
    pub fn try_new(
        customer_id: i32,
        user_id: &str,
        summary: String,
        updated_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            customer_id: CustomerId::new(customer_id)?,
            user_id: user_id.parse()?,
            summary: SummaryText::new(summary)?,
            updated_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct NewConversationSummary {
    pub customer_id: CustomerId,
    pub user_id: UserId,
    pub summary: SummaryText,
}
