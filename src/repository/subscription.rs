use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        subscription::{Subscription, UpsertSubscription},
        types::UserId,
    },
    models::subscription::{
        Subscription as DbSubscription, UpsertSubscription as DbUpsertSubscription,
    },
    repository::{
        DieselRepository, SubscriptionReader, SubscriptionWriter, errors::RepositoryResult,
    },
};

impl SubscriptionReader for DieselRepository {
    fn get_subscription(&self, user_id: UserId) -> RepositoryResult<Option<Subscription>> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;
        let row = subscriptions::table
            .find(user_id.to_string())
            .first::<DbSubscription>(&mut conn)
            .optional()?;

        Ok(row.map(Subscription::try_from).transpose()?)
    }
}

impl SubscriptionWriter for DieselRepository {
    fn upsert_subscription(
        &self,
        subscription: &UpsertSubscription,
    ) -> RepositoryResult<Subscription> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;
        let values = DbUpsertSubscription::from_domain(subscription, Utc::now().naive_utc());

        let row = diesel::insert_into(subscriptions::table)
            .values(&values)
            .on_conflict(subscriptions::user_id)
            .do_update()
            .set(&values)
            .get_result::<DbSubscription>(&mut conn)?;

        Ok(Subscription::try_from(row)?)
    }
}
