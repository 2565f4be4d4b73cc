use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::conversation_summary::{
    ConversationSummary as DomainConversationSummary,
    NewConversationSummary as DomainNewConversationSummary,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::conversation_summaries)]
#[diesel(primary_key(customer_id))]
pub struct ConversationSummary {
    pub customer_id: i32,
    pub user_id: String,
    pub summary: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::conversation_summaries)]
pub struct UpsertConversationSummary<'a> {
    pub customer_id: i32,
    pub user_id: String,
    pub summary: &'a str,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<ConversationSummary> for DomainConversationSummary {
    type Error = TypeConstraintError;

    fn try_from(summary: ConversationSummary) -> Result<Self, Self::Error> {
        DomainConversationSummary::try_new(
            summary.customer_id,
            &summary.user_id,
            summary.summary,
            summary.updated_at,
        )
    }
}

impl<'a> UpsertConversationSummary<'a> {
    pub fn from_domain(summary: &'a DomainNewConversationSummary, now: NaiveDateTime) -> Self {
        Self {
            customer_id: summary.customer_id.get(),
            user_id: summary.user_id.to_string(),
            summary: summary.summary.as_str(),
            updated_at: now,
        }
    }
}
