use actix_web::{HttpResponse, Responder, delete, post, web};

use crate::forms::devices::{RegisterDeviceForm, UnregisterDeviceForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::devices as devices_service;

#[post("/devices")]
pub async fn register_device(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<RegisterDeviceForm>,
) -> impl Responder {
    match devices_service::register_device(repo.get_ref(), &user, form) {
        Ok(device) => HttpResponse::Ok().json(device),
        Err(err) => error_response(err, "Failed to register device"),
    }
}

#[delete("/devices")]
pub async fn unregister_device(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UnregisterDeviceForm>,
) -> impl Responder {
    match devices_service::unregister_device(repo.get_ref(), &user, form) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, "Failed to unregister device"),
    }
}
