use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_identity::{Identity, IdentityMiddleware};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{
    App, HttpMessage, HttpRequest, HttpResponse,
    cookie::Key,
    http::{StatusCode, header},
    test, web,
};
use sms_crm::domain::access_log::NewAccessLog;
use sms_crm::middleware::AccessLog;
use sms_crm::models::auth::IDENTITY_KEY;
use sms_crm::repository::AccessLogWriter;
use sms_crm::repository::errors::{RepositoryError, RepositoryResult};

mod common;

#[derive(Clone, Default)]
struct Recorder {
    entries: Arc<Mutex<Vec<NewAccessLog>>>,
}

impl AccessLogWriter for Recorder {
    fn create_access_log(&self, entry: &NewAccessLog) -> RepositoryResult<()> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

#[derive(Clone)]
struct Broken;

impl AccessLogWriter for Broken {
    fn create_access_log(&self, _entry: &NewAccessLog) -> RepositoryResult<()> {
        Err(RepositoryError::ConnectionError("database is gone".to_string()))
    }
}

/// The write is not awaited by the middleware, so poll until it lands.
async fn wait_for_entries(recorder: &Recorder, count: usize) -> Vec<NewAccessLog> {
    for _ in 0..100 {
        {
            let entries = recorder.entries.lock().unwrap();
            if entries.len() >= count {
                return entries.clone();
            }
        }
        actix_web::rt::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("access log was not written");
}

#[actix_web::test]
async fn records_anonymous_request() {
    let recorder = Recorder::default();
    let app = test::init_service(
        App::new()
            .wrap(AccessLog::new(recorder.clone(), common::SECRET))
            .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/ping")
        .insert_header((header::USER_AGENT, "sms-crm-mobile/1.0"))
        .peer_addr("10.0.0.7:5000".parse().unwrap())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let entries = wait_for_entries(&recorder, 1).await;
    let entry = &entries[0];
    assert_eq!(entry.method, "GET");
    assert_eq!(entry.path, "/ping");
    assert_eq!(entry.status, 200);
    assert_eq!(entry.user_id, None);
    assert_eq!(entry.ip.as_deref(), Some("10.0.0.7"));
    assert_eq!(entry.user_agent.as_deref(), Some("sms-crm-mobile/1.0"));
}

#[actix_web::test]
async fn records_user_and_error_status() {
    let recorder = Recorder::default();
    let app = test::init_service(
        App::new()
            .wrap(AccessLog::new(recorder.clone(), common::SECRET))
            .default_service(web::to(|| async { HttpResponse::NotFound().finish() })),
    )
    .await;

    let token = common::token(common::USER_ID, &["crm"]);
    let req = test::TestRequest::post()
        .uri("/api/missing")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let entries = wait_for_entries(&recorder, 1).await;
    assert_eq!(entries[0].status, 404);
    assert_eq!(entries[0].method, "POST");
    assert_eq!(
        entries[0].user_id.map(|id| id.to_string()).as_deref(),
        Some(common::USER_ID)
    );
}

#[actix_web::test]
async fn records_user_from_identity_cookie() {
    let recorder = Recorder::default();
    let app = test::init_service(
        App::new()
            .wrap(AccessLog::new(recorder.clone(), common::SECRET))
            .wrap(IdentityMiddleware::builder().id_key(IDENTITY_KEY).build())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[7; 64]))
                    .cookie_secure(false)
                    .build(),
            )
            .route(
                "/login",
                web::post().to(|req: HttpRequest| async move {
                    let token = common::token(common::USER_ID, &["crm"]);
                    Identity::login(&req.extensions(), token).unwrap();
                    HttpResponse::Ok().finish()
                }),
            )
            .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
    )
    .await;

    let req = test::TestRequest::post().uri("/login").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .response()
        .cookies()
        .next()
        .expect("session cookie")
        .into_owned();

    let req = test::TestRequest::get().uri("/ping").cookie(cookie).to_request();
    test::call_service(&app, req).await;

    let entries = wait_for_entries(&recorder, 2).await;
    let user_for = |path: &str| {
        entries
            .iter()
            .find(|entry| entry.path == path)
            .and_then(|entry| entry.user_id)
            .map(|id| id.to_string())
    };
    assert_eq!(user_for("/login"), None);
    assert_eq!(user_for("/ping").as_deref(), Some(common::USER_ID));
}

#[actix_web::test]
async fn invalid_token_is_logged_without_user() {
    let recorder = Recorder::default();
    let app = test::init_service(
        App::new()
            .wrap(AccessLog::new(recorder.clone(), common::SECRET))
            .default_service(web::to(|| async { HttpResponse::Ok().finish() })),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .to_request();
    test::call_service(&app, req).await;

    let entries = wait_for_entries(&recorder, 1).await;
    assert_eq!(entries[0].user_id, None);
}

#[actix_web::test]
async fn failing_store_does_not_affect_response() {
    let app = test::init_service(
        App::new()
            .wrap(AccessLog::new(Broken, common::SECRET))
            .default_service(web::to(|| async { HttpResponse::Ok().body("fine") })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "fine");
}
