//! Images uploaded for MMS sends and shareable short links.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ImageId, TypeConstraintError, UserId};

/// Content types accepted for upload, with the file extension used on disk.
pub const ALLOWED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
];

/// Upper bound on a single uploaded image.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Returns the on-disk extension for an accepted content type.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    ALLOWED_IMAGE_TYPES
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(content_type))
        .map(|(_, ext)| *ext)
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserImage {
    pub id: ImageId,
    pub user_id: UserId,
    pub file_name: String,
    pub content_type: String,
    pub size: i64,
    /// Path relative to the storage root, always `/`-separated.
    pub storage_path: String,
    pub created_at: NaiveDateTime,
}

impl UserImage {
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        id: &[u8],
        user_id: &str,
        file_name: String,
        content_type: String,
        size: i64,
        storage_path: String,
        created_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: ImageId::from_bytes(id)?,
            user_id: user_id.parse()?,
            file_name,
            content_type,
            size,
            storage_path,
            created_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct NewUserImage {
    pub id: ImageId,
    pub user_id: UserId,
    pub file_name: String,
    pub content_type: String,
    pub size: i64,
    pub storage_path: String,
}
