use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::images as images_service;

/// Public redirect from a short code to the stored image.
#[get("/s/{code}")]
pub async fn resolve_short_link(
    code: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match images_service::resolve_short_link(repo.get_ref(), &code) {
        Ok(storage_path) => HttpResponse::Found()
            .insert_header((
                header::LOCATION,
                format!("/storage/{}", storage_path.trim_start_matches('/')),
            ))
            .finish(),
        Err(err) => error_response(err, "Failed to resolve short link"),
    }
}
