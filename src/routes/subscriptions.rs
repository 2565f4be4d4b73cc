use actix_web::{HttpResponse, Responder, get, put, web};

use crate::forms::subscriptions::UpdateSubscriptionForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::subscriptions as subscriptions_service;

#[get("/subscription")]
pub async fn own_subscription(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match subscriptions_service::get_own_subscription(repo.get_ref(), &user) {
        Ok(subscription) => HttpResponse::Ok().json(subscription),
        Err(err) => error_response(err, "Failed to load subscription"),
    }
}

#[put("/admin/subscriptions/{user_id}")]
pub async fn set_subscription(
    target_user_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateSubscriptionForm>,
) -> impl Responder {
    match subscriptions_service::set_subscription(repo.get_ref(), &user, &target_user_id, form) {
        Ok(subscription) => HttpResponse::Ok().json(subscription),
        Err(err) => error_response(err, "Failed to update subscription"),
    }
}
