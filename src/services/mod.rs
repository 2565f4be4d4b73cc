//! Business logic invoked by the route handlers.
//!
//! Every service checks the caller's role first, validates its input and
//! then talks to the repository traits, so handlers stay thin and services
//! can be exercised against [`crate::repository::mock::MockRepository`].

use thiserror::Error;

use crate::domain::types::{TypeConstraintError, UserId};
use crate::forms::FormError;
use crate::llm::LlmError;
use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::RepositoryError;

pub mod admin;
pub mod ai;
pub mod customers;
pub mod devices;
pub mod images;
pub mod subscriptions;
pub mod tasks;
pub mod templates;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    /// Invalid input; the message is shown to the user.
    #[error("form error: {0}")]
    Form(String),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error("repository error: {0}")]
    Repository(RepositoryError),

    #[error("external service error: {0}")]
    External(String),

    #[error("internal error")]
    Internal,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(err.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(_) => ServiceError::Form("입력값을 확인해 주세요.".to_string()),
            FormError::TypeConstraint(err) => ServiceError::from(err),
            FormError::MissingBody => {
                ServiceError::Form("메시지 내용 또는 템플릿을 선택해 주세요.".to_string())
            }
            FormError::NoRecipients => ServiceError::Form("수신자를 선택해 주세요.".to_string()),
            FormError::InvalidImageId => {
                ServiceError::Form("이미지 식별자가 올바르지 않습니다.".to_string())
            }
        }
    }
}

impl From<LlmError> for ServiceError {
    fn from(err: LlmError) -> Self {
        ServiceError::External(err.to_string())
    }
}

/// Checks the role claim and resolves the caller's user id.
pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<UserId> {
    if !user.has_role(role) {
        return Err(ServiceError::Forbidden);
    }
    user.user_id().map_err(|err| {
        log::warn!("Session subject {} is not a user id: {err}", user.sub);
        ServiceError::Unauthorized
    })
}
