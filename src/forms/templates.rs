use serde::Deserialize;
use validator::Validate;

use crate::domain::template::{NewMessageTemplate, UpdateMessageTemplate};
use crate::domain::types::{MessageBody, TemplateTitle, UserId};
use crate::forms::{FormError, MAX_BODY_CHARS};

#[derive(Debug, Deserialize, Validate)]
pub struct TemplateForm {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = MAX_BODY_CHARS))]
    pub body: String,
}

pub struct TemplatePayload {
    pub title: TemplateTitle,
    pub body: MessageBody,
}

impl TryFrom<TemplateForm> for TemplatePayload {
    type Error = FormError;

    fn try_from(form: TemplateForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            title: TemplateTitle::new(form.title)?,
            body: MessageBody::new(form.body)?,
        })
    }
}

impl TemplatePayload {
    pub fn into_new_template(self, user_id: UserId) -> NewMessageTemplate {
        NewMessageTemplate {
            user_id,
            title: self.title,
            body: self.body,
        }
    }

    pub fn into_update(self) -> UpdateMessageTemplate {
        UpdateMessageTemplate {
            title: self.title,
            body: self.body,
        }
    }
}
