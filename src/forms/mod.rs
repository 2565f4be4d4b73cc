//! Request bodies accepted by the JSON API.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::{MAX_MESSAGE_CHARS, TypeConstraintError};

pub mod ai;
pub mod customers;
pub mod devices;
pub mod images;
pub mod subscriptions;
pub mod tasks;
pub mod templates;

/// [`MAX_MESSAGE_CHARS`] as the `u64` bound `validator` expects.
pub(crate) const MAX_BODY_CHARS: u64 = MAX_MESSAGE_CHARS as u64;

#[derive(Debug, Error)]
/// Errors that can occur when processing request bodies.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    TypeConstraint(#[from] TypeConstraintError),

    #[error("no message body or template given")]
    MissingBody,

    #[error("no recipients given")]
    NoRecipients,

    #[error("invalid image id")]
    InvalidImageId,
}
