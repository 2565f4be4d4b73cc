//! HTTP handlers. Each one authenticates, calls a service and maps the result
//! to JSON.

use actix_web::HttpResponse;
use serde_json::json;

use crate::services::ServiceError;

pub mod admin;
pub mod ai;
pub mod customers;
pub mod devices;
pub mod images;
pub mod short_links;
pub mod subscriptions;
pub mod tasks;
pub mod templates;

fn error_body(message: &str) -> serde_json::Value {
    json!({ "error": message })
}

/// Maps a service error to its status code and a user-facing message.
///
/// Internal details are logged with `context` and never sent to the client.
pub fn error_response(err: ServiceError, context: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            HttpResponse::Unauthorized().json(error_body("로그인이 필요합니다."))
        }
        ServiceError::Forbidden => HttpResponse::Forbidden().json(error_body("권한이 없습니다.")),
        ServiceError::NotFound => {
            HttpResponse::NotFound().json(error_body("요청한 항목을 찾을 수 없습니다."))
        }
        ServiceError::Form(message) => HttpResponse::BadRequest().json(error_body(&message)),
        ServiceError::TypeConstraint(message) => {
            log::warn!("{context}: {message}");
            HttpResponse::BadRequest().json(error_body("입력값이 올바르지 않습니다."))
        }
        ServiceError::External(message) => {
            log::error!("{context}: {message}");
            HttpResponse::BadGateway()
                .json(error_body("외부 서비스 호출에 실패했습니다. 잠시 후 다시 시도해 주세요."))
        }
        err @ (ServiceError::Repository(_) | ServiceError::Internal) => {
            log::error!("{context}: {err}");
            HttpResponse::InternalServerError()
                .json(error_body("서버 오류가 발생했습니다."))
        }
    }
}
