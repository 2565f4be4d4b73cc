use actix_web::{HttpResponse, Responder, post, web};

use crate::forms::ai::{DraftForm, SummarizeForm};
use crate::llm::ChatCompletion;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ai as ai_service;

#[post("/ai/draft")]
pub async fn draft_message(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    llm: web::Data<dyn ChatCompletion>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<DraftForm>,
) -> impl Responder {
    match ai_service::draft_message(
        repo.get_ref(),
        llm.get_ref(),
        &server_config.deepseek,
        &user,
        form,
    )
    .await
    {
        Ok(draft) => HttpResponse::Ok().json(draft),
        Err(err) => error_response(err, "Failed to draft message"),
    }
}

#[post("/ai/summarize")]
pub async fn summarize_conversation(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    llm: web::Data<dyn ChatCompletion>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<SummarizeForm>,
) -> impl Responder {
    match ai_service::summarize_conversation(
        repo.get_ref(),
        llm.get_ref(),
        &server_config.deepseek,
        &user,
        form,
    )
    .await
    {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(err) => error_response(err, "Failed to summarize conversation"),
    }
}
