use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::subscription::{
    Subscription as DomainSubscription, UpsertSubscription as DomainUpsertSubscription,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::subscriptions)]
#[diesel(primary_key(user_id))]
pub struct Subscription {
    pub user_id: String,
    pub plan: String,
    pub status: String,
    pub daily_limit: i32,
    pub expires_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::subscriptions)]
#[diesel(treat_none_as_null = true)]
pub struct UpsertSubscription {
    pub user_id: String,
    pub plan: &'static str,
    pub status: &'static str,
    pub daily_limit: i32,
    pub expires_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Subscription> for DomainSubscription {
    type Error = TypeConstraintError;

    fn try_from(sub: Subscription) -> Result<Self, Self::Error> {
        DomainSubscription::try_new(
            &sub.user_id,
            &sub.plan,
            &sub.status,
            sub.daily_limit,
            sub.expires_at,
            sub.updated_at,
        )
    }
}

impl UpsertSubscription {
    pub fn from_domain(sub: &DomainUpsertSubscription, now: NaiveDateTime) -> Self {
        Self {
            user_id: sub.user_id.to_string(),
            plan: sub.plan.as_str(),
            status: sub.status.as_str(),
            daily_limit: sub.daily_limit,
            expires_at: sub.expires_at,
            updated_at: now,
        }
    }
}
