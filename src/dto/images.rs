use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::image::UserImage;
use crate::domain::types::ImageId;
use crate::models::config::ServerConfig;
use crate::short_url::uuid_to_base62;

/// Image metadata together with its public links.
#[derive(Debug, Serialize, PartialEq)]
pub struct ImageResponse {
    pub id: ImageId,
    pub file_name: String,
    pub content_type: String,
    pub size: i64,
    pub url: String,
    pub short_url: String,
    pub created_at: NaiveDateTime,
}

impl ImageResponse {
    pub fn new(image: UserImage, config: &ServerConfig) -> Self {
        let code = uuid_to_base62(image.id.as_uuid());
        Self {
            id: image.id,
            url: config.storage_url(&image.storage_path),
            short_url: config.short_link(&code),
            file_name: image.file_name,
            content_type: image.content_type,
            size: image.size,
            created_at: image.created_at,
        }
    }
}
