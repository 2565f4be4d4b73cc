//! SMS message templates authored on the dashboard.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{MessageBody, TemplateId, TemplateTitle, TypeConstraintError, UserId};

/// Placeholder substituted with the customer's name when a template is used.
pub const NAME_PLACEHOLDER: &str = "{name}";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageTemplate {
    pub id: TemplateId,
    pub user_id: UserId,
    pub title: TemplateTitle,
    pub body: MessageBody,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl MessageTemplate {
    pub fn try_new(
        id: i32,
        user_id: &str,
        title: String,
        body: String,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: TemplateId::new(id)?,
            user_id: user_id.parse()?,
            title: TemplateTitle::new(title)?,
            body: MessageBody::new(body)?,
            created_at,
            updated_at,
        })
    }

    /// Renders the template body for a recipient.
    ///
    /// Recipients without a known name get the placeholder removed.
    pub fn render(&self, customer_name: Option<&str>) -> Result<MessageBody, TypeConstraintError> {
        render_body(self.body.as_str(), customer_name)
    }
}

/// Substitutes [`NAME_PLACEHOLDER`] in a raw body.
pub fn render_body(
    body: &str,
    customer_name: Option<&str>,
) -> Result<MessageBody, TypeConstraintError> {
    MessageBody::new(body.replace(NAME_PLACEHOLDER, customer_name.unwrap_or("")))
}

#[derive(Clone, Debug)]
pub struct NewMessageTemplate {
    pub user_id: UserId,
    pub title: TemplateTitle,
    pub body: MessageBody,
}

#[derive(Clone, Debug)]
pub struct UpdateMessageTemplate {
    pub title: TemplateTitle,
    pub body: MessageBody,
}
