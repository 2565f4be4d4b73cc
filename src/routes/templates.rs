use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::forms::templates::TemplateForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::templates as templates_service;

#[get("/templates")]
pub async fn list_templates(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match templates_service::list_templates(repo.get_ref(), &user) {
        Ok(templates) => HttpResponse::Ok().json(templates),
        Err(err) => error_response(err, "Failed to list templates"),
    }
}

#[post("/templates")]
pub async fn create_template(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<TemplateForm>,
) -> impl Responder {
    match templates_service::create_template(repo.get_ref(), &user, form) {
        Ok(template) => HttpResponse::Created().json(template),
        Err(err) => error_response(err, "Failed to create template"),
    }
}

#[put("/templates/{template_id}")]
pub async fn update_template(
    template_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<TemplateForm>,
) -> impl Responder {
    match templates_service::update_template(repo.get_ref(), &user, template_id.into_inner(), form)
    {
        Ok(template) => HttpResponse::Ok().json(template),
        Err(err) => error_response(err, "Failed to update template"),
    }
}

#[delete("/templates/{template_id}")]
pub async fn delete_template(
    template_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match templates_service::delete_template(repo.get_ref(), &user, template_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, "Failed to delete template"),
    }
}
