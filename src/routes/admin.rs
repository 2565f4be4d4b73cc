use actix_web::{HttpResponse, Responder, get, web};

use crate::dto::admin::{AccessLogsQuery, StatsQuery};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::admin as admin_service;

#[get("/admin/stats")]
pub async fn usage_stats(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<StatsQuery>,
) -> impl Responder {
    match admin_service::usage_stats(repo.get_ref(), &user, query.into_inner()) {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(err) => error_response(err, "Failed to load usage stats"),
    }
}

#[get("/admin/access-logs")]
pub async fn access_logs(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<AccessLogsQuery>,
) -> impl Responder {
    match admin_service::list_access_logs(repo.get_ref(), &user, query.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "Failed to list access logs"),
    }
}
