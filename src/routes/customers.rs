use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::dto::customers::CustomersQuery;
use crate::forms::customers::CustomerForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::customers as customers_service;

#[get("/customers")]
pub async fn list_customers(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<CustomersQuery>,
) -> impl Responder {
    match customers_service::list_customers(repo.get_ref(), &user, query.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "Failed to list customers"),
    }
}

#[get("/customers/{customer_id}")]
pub async fn show_customer(
    customer_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match customers_service::get_customer(repo.get_ref(), &user, customer_id.into_inner()) {
        Ok(customer) => HttpResponse::Ok().json(customer),
        Err(err) => error_response(err, "Failed to load customer"),
    }
}

#[post("/customers")]
pub async fn create_customer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CustomerForm>,
) -> impl Responder {
    match customers_service::create_customer(repo.get_ref(), &user, form) {
        Ok(customer) => HttpResponse::Created().json(customer),
        Err(err) => error_response(err, "Failed to create customer"),
    }
}

#[put("/customers/{customer_id}")]
pub async fn update_customer(
    customer_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CustomerForm>,
) -> impl Responder {
    match customers_service::update_customer(repo.get_ref(), &user, customer_id.into_inner(), form)
    {
        Ok(customer) => HttpResponse::Ok().json(customer),
        Err(err) => error_response(err, "Failed to update customer"),
    }
}

#[delete("/customers/{customer_id}")]
pub async fn delete_customer(
    customer_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match customers_service::delete_customer(repo.get_ref(), &user, customer_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, "Failed to delete customer"),
    }
}
