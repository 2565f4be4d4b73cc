use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, delete, get, post, web};

use crate::forms::images::UploadImageForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::images as images_service;

#[post("/images")]
pub async fn upload_image(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<UploadImageForm>,
) -> impl Responder {
    match images_service::upload_image(repo.get_ref(), &user, &server_config, form) {
        Ok(image) => HttpResponse::Created().json(image),
        Err(err) => error_response(err, "Failed to upload image"),
    }
}

#[get("/images")]
pub async fn list_images(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match images_service::list_images(repo.get_ref(), &user, &server_config) {
        Ok(images) => HttpResponse::Ok().json(images),
        Err(err) => error_response(err, "Failed to list images"),
    }
}

#[delete("/images/{image_id}")]
pub async fn delete_image(
    image_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match images_service::delete_image(repo.get_ref(), &user, &server_config, &image_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, "Failed to delete image"),
    }
}
