use actix_web::{HttpResponse, Responder, get, post, web};

use crate::dto::tasks::TaskHistoryQuery;
use crate::forms::tasks::{CompleteTaskForm, EnqueueTasksForm};
use crate::models::auth::AuthenticatedUser;
use crate::push::PushSender;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::tasks as tasks_service;

#[post("/tasks")]
pub async fn enqueue_tasks(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    push: web::Data<dyn PushSender>,
    web::Json(form): web::Json<EnqueueTasksForm>,
) -> impl Responder {
    match tasks_service::submit_tasks(repo.get_ref(), push.get_ref(), &user, form).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(err) => error_response(err, "Failed to enqueue tasks"),
    }
}

#[get("/tasks/pending")]
pub async fn pending_tasks(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match tasks_service::list_pending_tasks(repo.get_ref(), &user) {
        Ok(tasks) => HttpResponse::Ok().json(tasks),
        Err(err) => error_response(err, "Failed to list pending tasks"),
    }
}

#[post("/tasks/{task_id}/complete")]
pub async fn complete_task(
    task_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CompleteTaskForm>,
) -> impl Responder {
    match tasks_service::complete_task(repo.get_ref(), &user, task_id.into_inner(), form) {
        Ok(task) => HttpResponse::Ok().json(task),
        Err(err) => error_response(err, "Failed to complete task"),
    }
}

#[post("/tasks/{task_id}/cancel")]
pub async fn cancel_task(
    task_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match tasks_service::cancel_task(repo.get_ref(), &user, task_id.into_inner()) {
        Ok(task) => HttpResponse::Ok().json(task),
        Err(err) => error_response(err, "Failed to cancel task"),
    }
}

#[get("/tasks")]
pub async fn task_history(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<TaskHistoryQuery>,
) -> impl Responder {
    match tasks_service::list_task_history(repo.get_ref(), &user, query.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "Failed to list task history"),
    }
}
