use crate::SERVICE_ACCESS_ROLE;
use crate::domain::template::MessageTemplate;
use crate::domain::types::TemplateId;
use crate::forms::templates::{TemplateForm, TemplatePayload};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{TemplateReader, TemplateWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};

pub fn list_templates<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<MessageTemplate>>
where
    R: TemplateReader + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;

    repo.list_templates(user_id).map_err(|err| {
        log::error!("Failed to list templates: {err}");
        ServiceError::from(err)
    })
}

pub fn create_template<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: TemplateForm,
) -> ServiceResult<MessageTemplate>
where
    R: TemplateWriter + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let payload = TemplatePayload::try_from(form)?;

    repo.create_template(&payload.into_new_template(user_id))
        .map_err(|err| {
            log::error!("Failed to create template: {err}");
            ServiceError::from(err)
        })
}

pub fn update_template<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: TemplateForm,
) -> ServiceResult<MessageTemplate>
where
    R: TemplateWriter + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let id = TemplateId::new(id).map_err(|_| ServiceError::NotFound)?;
    let payload = TemplatePayload::try_from(form)?;

    repo.update_template(id, user_id, &payload.into_update())
        .map_err(ServiceError::from)
}

pub fn delete_template<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: TemplateWriter + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let id = TemplateId::new(id).map_err(|_| ServiceError::NotFound)?;

    repo.delete_template(id, user_id).map_err(ServiceError::from)
}
