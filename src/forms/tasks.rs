use serde::Deserialize;
use validator::Validate;

use crate::domain::task::TaskOutcome;
use crate::domain::types::{CustomerId, ImageId, MessageBody, PhoneNumber, TemplateId};
use crate::forms::{FormError, MAX_BODY_CHARS};

/// Upper bound on recipients accepted by a single enqueue request.
pub const MAX_RECIPIENTS: u64 = 1000;

/// Body of `POST /api/tasks`.
#[derive(Debug, Deserialize, Validate)]
pub struct EnqueueTasksForm {
    #[serde(default)]
    #[validate(length(min = 1, max = MAX_BODY_CHARS))]
    pub body: Option<String>,
    #[serde(default)]
    pub template_id: Option<i32>,
    #[serde(default)]
    #[validate(length(max = MAX_RECIPIENTS))]
    pub customer_ids: Vec<i32>,
    #[serde(default)]
    #[validate(length(max = MAX_RECIPIENTS))]
    pub phones: Vec<String>,
    #[serde(default)]
    pub image_id: Option<String>,
}

/// Where the message text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum BodySource {
    Template(TemplateId),
    Text(String),
}

#[derive(Debug)]
pub struct EnqueueTasksPayload {
    pub source: BodySource,
    pub customer_ids: Vec<CustomerId>,
    pub phones: Vec<PhoneNumber>,
    pub image_id: Option<ImageId>,
}

impl TryFrom<EnqueueTasksForm> for EnqueueTasksPayload {
    type Error = FormError;

    fn try_from(form: EnqueueTasksForm) -> Result<Self, Self::Error> {
        form.validate()?;

        // The template wins over an inline body.
        let source = match (form.template_id, form.body) {
            (Some(id), _) => BodySource::Template(TemplateId::new(id)?),
            (None, Some(body)) if !body.trim().is_empty() => {
                // Reject bodies that could never render.
                MessageBody::new(body.as_str())?;
                BodySource::Text(body)
            }
            _ => return Err(FormError::MissingBody),
        };

        let mut customer_ids = Vec::with_capacity(form.customer_ids.len());
        for id in form.customer_ids {
            let id = CustomerId::new(id)?;
            if !customer_ids.contains(&id) {
                customer_ids.push(id);
            }
        }

        let phones = form
            .phones
            .into_iter()
            .filter(|phone| !phone.trim().is_empty())
            .map(PhoneNumber::new)
            .collect::<Result<Vec<_>, _>>()?;

        if customer_ids.is_empty() && phones.is_empty() {
            return Err(FormError::NoRecipients);
        }

        let image_id = form
            .image_id
            .filter(|id| !id.trim().is_empty())
            .map(|id| id.trim().parse::<ImageId>())
            .transpose()
            .map_err(|_| FormError::InvalidImageId)?;

        Ok(Self {
            source,
            customer_ids,
            phones,
            image_id,
        })
    }
}

/// Body of `POST /api/tasks/{id}/complete`.
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteTaskForm {
    pub success: bool,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub error: Option<String>,
}

impl TryFrom<CompleteTaskForm> for TaskOutcome {
    type Error = FormError;

    fn try_from(form: CompleteTaskForm) -> Result<Self, Self::Error> {
        form.validate()?;
        if form.success {
            return Ok(TaskOutcome::Sent);
        }
        let reason = form
            .error
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "unknown error".to_string());
        Ok(TaskOutcome::Failed(reason))
    }
}
