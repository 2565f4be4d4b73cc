use std::sync::Arc;

use actix_web::{
    App,
    http::{StatusCode, header},
    test, web,
};
use serde_json::{Value, json};
use sms_crm::domain::image::NewUserImage;
use sms_crm::domain::types::ImageId;
use sms_crm::push::{DisabledPush, PushSender};
use sms_crm::repository::{DieselRepository, ImageWriter};
use sms_crm::routes::admin::usage_stats;
use sms_crm::domain::image::MAX_IMAGE_BYTES;
use sms_crm::routes::customers::{create_customer, list_customers, show_customer};
use sms_crm::routes::images::upload_image;
use sms_crm::routes::short_links::resolve_short_link;
use sms_crm::routes::subscriptions::{own_subscription, set_subscription};
use sms_crm::routes::tasks::{enqueue_tasks, pending_tasks};
use sms_crm::short_url::uuid_to_base62;

mod common;

macro_rules! init_app {
    ($test_db:expr) => {{
        let repo = DieselRepository::new($test_db.pool());
        let push: Arc<dyn PushSender> = Arc::new(DisabledPush);
        test::init_service(
            App::new()
                .app_data(web::Data::new(repo))
                .app_data(web::Data::new(common::server_config($test_db.dir())))
                .app_data(web::Data::from(push))
                .service(resolve_short_link)
                .service(
                    web::scope("/api")
                        .service(list_customers)
                        .service(create_customer)
                        .service(show_customer)
                        .service(pending_tasks)
                        .service(enqueue_tasks)
                        .service(own_subscription)
                        .service(set_subscription)
                        .service(upload_image)
                        .service(usage_stats),
                ),
        )
        .await
    }};
}

const BOUNDARY: &str = "sms-crm-boundary";

fn png_upload(size: usize) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"card.png\"\r\n\
         Content-Type: image/png\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(&vec![0x89; size]);
    body.extend(format!("\r\n--{BOUNDARY}--\r\n").into_bytes());
    body
}

fn bearer(roles: &[&str]) -> (header::HeaderName, String) {
    (
        header::AUTHORIZATION,
        format!("Bearer {}", common::token(common::USER_ID, roles)),
    )
}

#[actix_web::test]
async fn api_requires_session_token() {
    let test_db = common::TestDb::new("api_requires_session_token.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::get().uri("/api/customers").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn api_requires_service_role() {
    let test_db = common::TestDb::new("api_requires_service_role.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::get()
        .uri("/api/customers")
        .insert_header(bearer(&["other"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn customer_create_list_and_duplicate() {
    let test_db = common::TestDb::new("customer_create_list_and_duplicate.db");
    let app = init_app!(test_db);

    let payload = json!({"name": "김민수", "phone": "010-1234-5678", "memo": "VIP"});
    let req = test::TestRequest::post()
        .uri("/api/customers")
        .insert_header(bearer(&["crm"]))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["phone"], "+821012345678");

    let req = test::TestRequest::post()
        .uri("/api/customers")
        .insert_header(bearer(&["crm"]))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/customers?search=%EB%AF%BC%EC%88%98")
        .insert_header(bearer(&["crm"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["name"], "김민수");

    let req = test::TestRequest::get()
        .uri(&format!("/api/customers?page={}", usize::MAX))
        .insert_header(bearer(&["crm"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"], json!([]));

    let req = test::TestRequest::get()
        .uri("/api/customers/999")
        .insert_header(bearer(&["crm"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn enqueue_requires_active_subscription() {
    let test_db = common::TestDb::new("enqueue_requires_active_subscription.db");
    let app = init_app!(test_db);

    let enqueue = json!({"body": "안녕하세요", "phones": ["010-1234-5678"]});
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(&["crm"]))
        .set_json(&enqueue)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Only an admin may grant a plan.
    let plan = json!({"plan": "basic", "status": "active"});
    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/subscriptions/{}", common::USER_ID))
        .insert_header(bearer(&["crm"]))
        .set_json(&plan)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/subscriptions/{}", common::USER_ID))
        .insert_header(bearer(&["crm", "crm_admin"]))
        .set_json(&plan)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/subscription")
        .insert_header(bearer(&["crm"]))
        .to_request();
    let subscription: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(subscription["plan"], "basic");
    assert_eq!(subscription["daily_limit"], 300);

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(&["crm"]))
        .set_json(&enqueue)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["created"], 1);
    assert_eq!(created["remaining_today"], 299);

    let req = test::TestRequest::get()
        .uri("/api/tasks/pending")
        .insert_header(bearer(&["crm"]))
        .to_request();
    let pending: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pending.as_array().map(Vec::len), Some(1));
    assert_eq!(pending[0]["status"], "pending");
    assert_eq!(pending[0]["kind"], "sms");
}

#[actix_web::test]
async fn admin_stats_require_admin_role() {
    let test_db = common::TestDb::new("admin_stats_require_admin_role.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::get()
        .uri("/api/admin/stats")
        .insert_header(bearer(&["crm"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/admin/stats?days=91")
        .insert_header(bearer(&["crm_admin"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/admin/stats")
        .insert_header(bearer(&["crm_admin"]))
        .to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["total_customers"], 0);
}

#[actix_web::test]
async fn short_link_redirects_to_storage() {
    let test_db = common::TestDb::new("short_link_redirects_to_storage.db");
    let repo = DieselRepository::new(test_db.pool());
    let image = repo
        .create_image(&NewUserImage {
            id: ImageId::new(),
            user_id: common::USER_ID.parse().unwrap(),
            file_name: "card.png".to_string(),
            content_type: "image/png".to_string(),
            size: 64,
            storage_path: format!("{}/card.png", common::USER_ID),
        })
        .unwrap();
    let app = init_app!(test_db);

    let code = uuid_to_base62(image.id.as_uuid());
    let req = test::TestRequest::get()
        .uri(&format!("/s/{code}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        format!("/storage/{}/card.png", common::USER_ID).as_str()
    );

    let req = test::TestRequest::get().uri("/s/not-base62!").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/s/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn image_upload_accepts_up_to_five_mebibytes() {
    let test_db = common::TestDb::new("image_upload_accepts_up_to_five_mebibytes.db");
    let app = init_app!(test_db);
    let content_type = (
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );

    // Larger than 5 MB but within 5 MiB.
    let req = test::TestRequest::post()
        .uri("/api/images")
        .insert_header(bearer(&["crm"]))
        .insert_header(content_type.clone())
        .set_payload(png_upload(5_100_000))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let image: Value = test::read_body_json(resp).await;
    assert_eq!(image["size"], 5_100_000);

    let req = test::TestRequest::post()
        .uri("/api/images")
        .insert_header(bearer(&["crm"]))
        .insert_header(content_type)
        .set_payload(png_upload(MAX_IMAGE_BYTES + 1))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}
