//! Uploaded images for MMS sends and their public short links.

use std::fs;
use std::path::{Path, PathBuf};

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::image::{MAX_IMAGE_BYTES, NewUserImage, UserImage, extension_for};
use crate::domain::types::{ImageId, UserId};
use crate::dto::images::ImageResponse;
use crate::forms::images::UploadImageForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::{ImageReader, ImageWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::short_url::base62_to_uuid;

const MAX_FILE_NAME_CHARS: usize = 200;

/// A file received from the client that has not been stored yet.
pub struct IncomingImage<'a> {
    pub source: &'a Path,
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub size: usize,
}

fn display_name(file_name: Option<&str>, extension: &str) -> String {
    let base = file_name
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .map(str::trim)
        .filter(|name| !name.is_empty());

    match base {
        Some(name) => name.chars().take(MAX_FILE_NAME_CHARS).collect(),
        None => format!("image.{extension}"),
    }
}

/// Resolves a storage path against the storage root, refusing to leave it.
fn absolute_path(storage_dir: &str, storage_path: &str) -> Option<PathBuf> {
    let relative = Path::new(storage_path);
    if relative
        .components()
        .any(|c| !matches!(c, std::path::Component::Normal(_)))
    {
        return None;
    }
    Some(Path::new(storage_dir).join(relative))
}

/// Copies the file under `storage_dir/{user_id}/` and records it.
pub fn store_image<R>(
    repo: &R,
    user_id: UserId,
    storage_dir: &str,
    incoming: IncomingImage<'_>,
) -> ServiceResult<UserImage>
where
    R: ImageWriter + ?Sized,
{
    let content_type = incoming
        .content_type
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let Some(extension) = extension_for(&content_type) else {
        return Err(ServiceError::Form(
            "JPEG, PNG, GIF 이미지만 업로드할 수 있습니다.".to_string(),
        ));
    };
    if incoming.size == 0 || incoming.size > MAX_IMAGE_BYTES {
        return Err(ServiceError::Form(
            "이미지 크기는 5MB 이하여야 합니다.".to_string(),
        ));
    }

    let id = ImageId::new();
    let storage_path = format!("{user_id}/{id}.{extension}");
    let target = Path::new(storage_dir).join(&storage_path);

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|err| {
            log::error!("Failed to create {}: {err}", parent.display());
            ServiceError::Internal
        })?;
    }
    fs::copy(incoming.source, &target).map_err(|err| {
        log::error!("Failed to store image at {}: {err}", target.display());
        ServiceError::Internal
    })?;

    let new_image = NewUserImage {
        id,
        user_id,
        file_name: display_name(incoming.file_name, extension),
        content_type,
        size: incoming.size as i64,
        storage_path,
    };

    repo.create_image(&new_image).map_err(|err| {
        log::error!("Failed to record image {id}: {err}");
        if let Err(io_err) = fs::remove_file(&target) {
            log::warn!("Failed to remove orphaned {}: {io_err}", target.display());
        }
        ServiceError::from(err)
    })
}

pub fn upload_image<R>(
    repo: &R,
    user: &AuthenticatedUser,
    config: &ServerConfig,
    form: UploadImageForm,
) -> ServiceResult<ImageResponse>
where
    R: ImageWriter + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let file = form.file;
    let content_type = file.content_type.as_ref().map(|mime| mime.essence_str());
    let incoming = IncomingImage {
        source: file.file.path(),
        file_name: file.file_name.as_deref(),
        content_type,
        size: file.size,
    };

    let image = store_image(repo, user_id, &config.storage_dir, incoming)?;
    Ok(ImageResponse::new(image, config))
}

pub fn list_images<R>(
    repo: &R,
    user: &AuthenticatedUser,
    config: &ServerConfig,
) -> ServiceResult<Vec<ImageResponse>>
where
    R: ImageReader + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let images = repo.list_images(user_id)?;
    Ok(images
        .into_iter()
        .map(|image| ImageResponse::new(image, config))
        .collect())
}

/// Deletes the record and then the stored file.
pub fn delete_image<R>(
    repo: &R,
    user: &AuthenticatedUser,
    config: &ServerConfig,
    id: &str,
) -> ServiceResult<()>
where
    R: ImageReader + ImageWriter + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let id: ImageId = id.parse().map_err(|_| ServiceError::NotFound)?;

    let image = repo
        .get_image(id)?
        .filter(|image| image.user_id == user_id)
        .ok_or(ServiceError::NotFound)?;

    repo.delete_image(id, user_id)?;

    match absolute_path(&config.storage_dir, &image.storage_path) {
        Some(path) => {
            if let Err(err) = fs::remove_file(&path) {
                log::warn!("Failed to remove image file {}: {err}", path.display());
            }
        }
        None => log::warn!("Refusing to remove suspicious path {}", image.storage_path),
    }
    Ok(())
}

/// Resolves a `/s/{code}` short code to the stored file's path.
pub fn resolve_short_link<R>(repo: &R, code: &str) -> ServiceResult<String>
where
    R: ImageReader + ?Sized,
{
    let uuid = base62_to_uuid(code).map_err(|err| {
        log::debug!("Invalid short code {code:?}: {err}");
        ServiceError::NotFound
    })?;

    let image = repo
        .get_image(ImageId::from_uuid(uuid))?
        .ok_or(ServiceError::NotFound)?;

    Ok(image.storage_path)
}
