use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::image::{NewUserImage as DomainNewUserImage, UserImage as DomainUserImage};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::user_images)]
pub struct UserImage {
    pub id: Vec<u8>,
    pub user_id: String,
    pub file_name: String,
    pub content_type: String,
    pub size: i64,
    pub storage_path: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::user_images)]
pub struct NewUserImage<'a> {
    pub id: &'a [u8],
    pub user_id: String,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub size: i64,
    pub storage_path: &'a str,
    pub created_at: NaiveDateTime,
}

impl TryFrom<UserImage> for DomainUserImage {
    type Error = TypeConstraintError;

    fn try_from(image: UserImage) -> Result<Self, Self::Error> {
        DomainUserImage::try_new(
            &image.id,
            &image.user_id,
            image.file_name,
            image.content_type,
            image.size,
            image.storage_path,
            image.created_at,
        )
    }
}

impl<'a> NewUserImage<'a> {
    pub fn from_domain(image: &'a DomainNewUserImage, now: NaiveDateTime) -> Self {
        Self {
            id: image.id.as_bytes().as_slice(),
            user_id: image.user_id.to_string(),
            file_name: &image.file_name,
            content_type: &image.content_type,
            size: image.size,
            storage_path: &image.storage_path,
            created_at: now,
        }
    }
}
