use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware as actix_middleware, web};

use crate::db::establish_connection_pool;
use crate::llm::{ChatCompletion, DeepSeekClient, DisabledLlm};
use crate::middleware::AccessLog;
use crate::models::auth::IDENTITY_KEY;
use crate::models::config::ServerConfig;
use crate::push::{DisabledPush, FcmClient, PushSender, ServiceAccountKey};
use crate::repository::DieselRepository;
use crate::routes::admin::{access_logs, usage_stats};
use crate::routes::ai::{draft_message, summarize_conversation};
use crate::routes::customers::{
    create_customer, delete_customer, list_customers, show_customer, update_customer,
};
use crate::routes::devices::{register_device, unregister_device};
use crate::routes::images::{delete_image, list_images, upload_image};
use crate::routes::short_links::resolve_short_link;
use crate::routes::subscriptions::{own_subscription, set_subscription};
use crate::routes::tasks::{cancel_task, complete_task, enqueue_tasks, pending_tasks, task_history};
use crate::routes::templates::{create_template, delete_template, list_templates, update_template};

pub mod db;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod push;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
pub mod short_url;

pub const SERVICE_ACCESS_ROLE: &str = "crm";
pub const SERVICE_ADMIN_ROLE: &str = "crm_admin";

fn push_sender(server_config: &ServerConfig) -> std::io::Result<Arc<dyn PushSender>> {
    match &server_config.fcm_service_account {
        Some(path) => {
            let key = ServiceAccountKey::from_file(path).map_err(|e| {
                std::io::Error::other(format!("Failed to load FCM service account: {e}"))
            })?;
            log::info!("FCM push enabled for project {}", key.project_id);
            Ok(Arc::new(FcmClient::new(key)))
        }
        None => {
            log::warn!("No FCM service account configured, push notifications are disabled");
            Ok(Arc::new(DisabledPush))
        }
    }
}

fn chat_completion(server_config: &ServerConfig) -> Arc<dyn ChatCompletion> {
    match &server_config.deepseek.api_key {
        Some(api_key) if !api_key.trim().is_empty() => Arc::new(DeepSeekClient::new(
            &server_config.deepseek,
            api_key.trim().to_string(),
        )),
        _ => {
            log::warn!("No LLM API key configured, AI drafting is disabled");
            Arc::new(DisabledLlm)
        }
    }
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url, server_config.db_pool_size)
        .map_err(|e| {
            std::io::Error::other(format!("Failed to establish database connection: {e}"))
        })?;

    let repo = DieselRepository::new(pool);

    std::fs::create_dir_all(&server_config.storage_dir)?;

    let push = push_sender(&server_config)?;
    let llm = chat_completion(&server_config);

    // Keys and stores for identity and sessions.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(AccessLog::new(repo.clone(), &server_config.secret))
            .wrap(IdentityMiddleware::builder().id_key(IDENTITY_KEY).build())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(Cors::permissive())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/storage", &server_config.storage_dir))
            .service(resolve_short_link)
            .service(
                web::scope("/api")
                    .service(list_customers)
                    .service(create_customer)
                    .service(show_customer)
                    .service(update_customer)
                    .service(delete_customer)
                    .service(list_templates)
                    .service(create_template)
                    .service(update_template)
                    .service(delete_template)
                    .service(pending_tasks)
                    .service(task_history)
                    .service(enqueue_tasks)
                    .service(complete_task)
                    .service(cancel_task)
                    .service(register_device)
                    .service(unregister_device)
                    .service(list_images)
                    .service(upload_image)
                    .service(delete_image)
                    .service(draft_message)
                    .service(summarize_conversation)
                    .service(own_subscription)
                    .service(set_subscription)
                    .service(usage_stats)
                    .service(access_logs),
            )
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(web::Data::from(push.clone()))
            .app_data(web::Data::from(llm.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
