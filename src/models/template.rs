use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::template::{
    MessageTemplate as DomainMessageTemplate, NewMessageTemplate as DomainNewMessageTemplate,
    UpdateMessageTemplate as DomainUpdateMessageTemplate,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::message_templates)]
pub struct MessageTemplate {
    pub id: i32,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::message_templates)]
pub struct NewMessageTemplate<'a> {
    pub user_id: String,
    pub title: &'a str,
    pub body: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::message_templates)]
pub struct UpdateMessageTemplate<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<MessageTemplate> for DomainMessageTemplate {
    type Error = TypeConstraintError;

    fn try_from(template: MessageTemplate) -> Result<Self, Self::Error> {
        DomainMessageTemplate::try_new(
            template.id,
            &template.user_id,
            template.title,
            template.body,
            template.created_at,
            template.updated_at,
        )
    }
}

impl<'a> NewMessageTemplate<'a> {
    pub fn from_domain(template: &'a DomainNewMessageTemplate, now: NaiveDateTime) -> Self {
        Self {
            user_id: template.user_id.to_string(),
            title: template.title.as_str(),
            body: template.body.as_str(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateMessageTemplate<'a> {
    pub fn from_domain(template: &'a DomainUpdateMessageTemplate, now: NaiveDateTime) -> Self {
        Self {
            title: template.title.as_str(),
            body: template.body.as_str(),
            updated_at: now,
        }
    }
}
