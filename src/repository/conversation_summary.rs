use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        conversation_summary::{ConversationSummary, NewConversationSummary},
        types::{CustomerId, UserId},
    },
    models::conversation_summary::{
        ConversationSummary as DbConversationSummary, UpsertConversationSummary,
    },
    repository::{
        ConversationSummaryReader, ConversationSummaryWriter, DieselRepository,
        errors::RepositoryResult,
    },
};

impl ConversationSummaryReader for DieselRepository {
    fn get_summary(
        &self,
        customer_id: CustomerId,
        user_id: UserId,
    ) -> RepositoryResult<Option<ConversationSummary>> {
        use crate::schema::conversation_summaries;

        let mut conn = self.conn()?;
        let row = conversation_summaries::table
            .filter(conversation_summaries::customer_id.eq(customer_id.get()))
            .filter(conversation_summaries::user_id.eq(user_id.to_string()))
            .first::<DbConversationSummary>(&mut conn)
            .optional()?;

        Ok(row.map(ConversationSummary::try_from).transpose()?)
    }
}

impl ConversationSummaryWriter for DieselRepository {
    fn upsert_summary(
        &self,
        summary: &NewConversationSummary,
    ) -> RepositoryResult<ConversationSummary> {
        use crate::schema::conversation_summaries;

        let mut conn = self.conn()?;
        let values = UpsertConversationSummary::from_domain(summary, Utc::now().naive_utc());

        let row = diesel::insert_into(conversation_summaries::table)
            .values(&values)
            .on_conflict(conversation_summaries::customer_id)
            .do_update()
            .set(&values)
            .get_result::<DbConversationSummary>(&mut conn)?;

        Ok(ConversationSummary::try_from(row)?)
    }
}
