use chrono::{Duration, NaiveTime, Utc};
use diesel::prelude::*;
use sms_crm::domain::access_log::NewAccessLog;
use sms_crm::domain::analytics::DailySmsCount;
use sms_crm::domain::conversation_summary::NewConversationSummary;
use sms_crm::domain::customer::{NewCustomer, UpdateCustomer};
use sms_crm::domain::device::{NewDevice, Platform};
use sms_crm::domain::image::NewUserImage;
use sms_crm::domain::subscription::{Plan, SubscriptionStatus, UpsertSubscription};
use sms_crm::domain::task::{NewTask, TaskKind, TaskOutcome, TaskStatus};
use sms_crm::domain::template::{NewMessageTemplate, UpdateMessageTemplate};
use sms_crm::domain::types::{
    CustomerEmail, CustomerName, DeviceToken, ImageId, MessageBody, PhoneNumber, SummaryText,
    TemplateTitle, UserId,
};
use sms_crm::models::sms_log::NewSmsLog;
use sms_crm::pagination::Pagination;
use sms_crm::repository::errors::RepositoryError;
use sms_crm::repository::{
    AccessLogListQuery, AccessLogReader, AccessLogWriter, AnalyticsReader,
    ConversationSummaryReader, ConversationSummaryWriter, CustomerListQuery, CustomerReader,
    CustomerWriter, DailyQuota, DeviceReader, DeviceWriter, DieselRepository, ImageReader, ImageWriter,
    SmsLogReader, SubscriptionReader, SubscriptionWriter, TaskListQuery, TaskReader, TaskWriter,
    TemplateReader, TemplateWriter,
};

mod common;

fn user() -> UserId {
    common::USER_ID.parse().unwrap()
}

fn other_user() -> UserId {
    common::OTHER_USER_ID.parse().unwrap()
}

fn new_customer(user_id: UserId, name: &str, phone: &str) -> NewCustomer {
    NewCustomer::new(
        user_id,
        CustomerName::new(name).unwrap(),
        PhoneNumber::new(phone).unwrap(),
        None,
        None,
    )
}

fn new_task(user_id: UserId, phone: &str, body: &str) -> NewTask {
    NewTask::new(
        user_id,
        None,
        PhoneNumber::new(phone).unwrap(),
        MessageBody::new(body).unwrap(),
        None,
    )
}

fn quota(user_id: UserId, limit: usize) -> DailyQuota {
    DailyQuota {
        user_id,
        since: Utc::now().naive_utc() - Duration::hours(1),
        limit,
    }
}

#[test]
fn test_customer_repository_crud() {
    let test_db = common::TestDb::new("test_customer_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let alice = repo
        .create_customer(&new_customer(user(), "Alice", "010-1234-5678"))
        .unwrap();
    let bob = repo
        .create_customer(&new_customer(user(), "Bob", "010-2222-3333"))
        .unwrap();
    repo.create_customer(&new_customer(other_user(), "Carol", "010-1234-5678"))
        .unwrap();

    assert_eq!(alice.phone.as_str(), "+821012345678");

    let (total, items) = repo.list_customers(CustomerListQuery::new(user())).unwrap();
    assert_eq!(total, 2);
    assert_eq!(items[0].name.as_str(), "Alice");
    assert_eq!(items[1].name.as_str(), "Bob");

    let (search_total, search_items) = repo
        .list_customers(CustomerListQuery::new(user()).search("2222"))
        .unwrap();
    assert_eq!(search_total, 1);
    assert_eq!(search_items[0].id, bob.id);

    let (_, first_page) = repo
        .list_customers(CustomerListQuery::new(user()).paginate(Pagination::new(Some(1), Some(1))))
        .unwrap();
    assert_eq!(first_page.len(), 1);

    let duplicate = repo.create_customer(&new_customer(user(), "Alice 2", "01012345678"));
    assert!(matches!(duplicate, Err(RepositoryError::Duplicate(_))));

    let updates = UpdateCustomer::new(
        CustomerName::new("Bobby").unwrap(),
        bob.phone.clone(),
        Some(CustomerEmail::new("Bobby@Example.com").unwrap()),
        None,
    );
    let updated = repo.update_customer(bob.id, user(), &updates).unwrap();
    assert_eq!(updated.name.as_str(), "Bobby");
    assert_eq!(updated.email.unwrap().as_str(), "bobby@example.com");

    // Customers of another user are invisible.
    assert!(repo.get_customer(alice.id, other_user()).unwrap().is_none());
    assert!(matches!(
        repo.delete_customer(alice.id, other_user()),
        Err(RepositoryError::NotFound)
    ));

    let by_ids = repo
        .get_customers_by_ids(user(), &[alice.id, bob.id])
        .unwrap();
    assert_eq!(by_ids.len(), 2);

    repo.delete_customer(alice.id, user()).unwrap();
    assert!(repo.get_customer(alice.id, user()).unwrap().is_none());
}

#[test]
fn test_template_repository_crud() {
    let test_db = common::TestDb::new("test_template_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let template = repo
        .create_template(&NewMessageTemplate {
            user_id: user(),
            title: TemplateTitle::new("Greeting").unwrap(),
            body: MessageBody::new("{name}님 안녕하세요").unwrap(),
        })
        .unwrap();

    let updated = repo
        .update_template(
            template.id,
            user(),
            &UpdateMessageTemplate {
                title: TemplateTitle::new("Hello").unwrap(),
                body: MessageBody::new("{name}님 반갑습니다").unwrap(),
            },
        )
        .unwrap();
    assert_eq!(updated.title.as_str(), "Hello");

    assert_eq!(repo.list_templates(user()).unwrap().len(), 1);
    assert!(repo.list_templates(other_user()).unwrap().is_empty());
    assert!(repo.get_template(template.id, other_user()).unwrap().is_none());

    repo.delete_template(template.id, user()).unwrap();
    assert!(repo.get_template(template.id, user()).unwrap().is_none());
}

#[test]
fn test_task_lifecycle_writes_sms_log() {
    let test_db = common::TestDb::new("test_task_lifecycle_writes_sms_log.db");
    let repo = DieselRepository::new(test_db.pool());

    let customer = repo
        .create_customer(&new_customer(user(), "Alice", "010-1234-5678"))
        .unwrap();
    let mut with_customer = new_task(user(), "010-1234-5678", "첫 번째");
    with_customer.customer_id = Some(customer.id);

    let (remaining, tasks) = repo
        .create_tasks(
            &[
                with_customer,
                new_task(user(), "010-2222-3333", "두 번째"),
                new_task(user(), "010-4444-5555", "세 번째"),
            ],
            &quota(user(), 10),
        )
        .unwrap();
    assert_eq!(remaining, 7);
    assert_eq!(tasks.len(), 3);
    assert!(tasks.iter().all(|task| task.status == TaskStatus::Pending));
    assert!(tasks.iter().all(|task| task.kind == TaskKind::Sms));

    let pending = repo.list_pending_tasks(user(), 2).unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].id, tasks[0].id);

    let sent = repo
        .complete_task(tasks[0].id, user(), &TaskOutcome::Sent)
        .unwrap();
    assert_eq!(sent.status, TaskStatus::Sent);
    assert!(sent.completed_at.is_some());

    let failed = repo
        .complete_task(
            tasks[1].id,
            user(),
            &TaskOutcome::Failed("no signal".to_string()),
        )
        .unwrap();
    assert_eq!(failed.status, TaskStatus::Failed);
    assert_eq!(failed.error.as_deref(), Some("no signal"));

    let cancelled = repo.cancel_task(tasks[2].id, user()).unwrap();
    assert_eq!(cancelled.status, TaskStatus::Cancelled);

    // Terminal tasks cannot be completed again and no second log is written.
    assert!(matches!(
        repo.complete_task(tasks[0].id, user(), &TaskOutcome::Sent),
        Err(RepositoryError::ConstraintViolation(_))
    ));
    assert!(matches!(
        repo.complete_task(tasks[0].id, other_user(), &TaskOutcome::Sent),
        Err(RepositoryError::NotFound)
    ));

    let logs = repo.list_customer_sms_logs(customer.id, user(), 30).unwrap();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].success);
    assert_eq!(logs[0].task_id, tasks[0].id);

    assert!(repo.list_pending_tasks(user(), 100).unwrap().is_empty());

    // The cancelled task no longer counts against the quota.
    let (remaining, _) = repo
        .create_tasks(&[new_task(user(), "010-6666-7777", "네 번째")], &quota(user(), 10))
        .unwrap();
    assert_eq!(remaining, 7);

    let (total, history) = repo
        .list_tasks(TaskListQuery::new(user()).status(TaskStatus::Failed))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(history[0].id, tasks[1].id);
}

#[test]
fn test_create_tasks_enforces_daily_quota() {
    let test_db = common::TestDb::new("test_create_tasks_enforces_daily_quota.db");
    let repo = DieselRepository::new(test_db.pool());

    let (remaining, _) = repo
        .create_tasks(
            &[
                new_task(user(), "010-1111-0001", "a"),
                new_task(user(), "010-1111-0002", "b"),
            ],
            &quota(user(), 3),
        )
        .unwrap();
    assert_eq!(remaining, 1);

    let rejected = repo.create_tasks(
        &[
            new_task(user(), "010-1111-0003", "c"),
            new_task(user(), "010-1111-0004", "d"),
        ],
        &quota(user(), 3),
    );
    assert!(matches!(
        rejected,
        Err(RepositoryError::QuotaExceeded { remaining: 1 })
    ));

    // Nothing from the rejected batch was written.
    let (total, _) = repo.list_tasks(TaskListQuery::new(user())).unwrap();
    assert_eq!(total, 2);

    // Other users have their own quota.
    let (remaining, _) = repo
        .create_tasks(
            &[new_task(other_user(), "010-2222-0001", "e")],
            &quota(other_user(), 3),
        )
        .unwrap();
    assert_eq!(remaining, 2);
}

#[test]
fn test_mms_task_references_image() {
    let test_db = common::TestDb::new("test_mms_task_references_image.db");
    let repo = DieselRepository::new(test_db.pool());

    let image = repo
        .create_image(&NewUserImage {
            id: ImageId::new(),
            user_id: user(),
            file_name: "card.png".to_string(),
            content_type: "image/png".to_string(),
            size: 128,
            storage_path: format!("{}/card.png", common::USER_ID),
        })
        .unwrap();

    let mut task = new_task(user(), "010-1234-5678", "명함입니다");
    task.image_id = Some(image.id);
    let (_, created) = repo.create_tasks(&[task], &quota(user(), 10)).unwrap();
    assert_eq!(created[0].kind, TaskKind::Mms);
    assert_eq!(created[0].image_id, Some(image.id));

    assert_eq!(repo.get_image(image.id).unwrap().unwrap().id, image.id);
    assert_eq!(repo.list_images(user()).unwrap().len(), 1);
    assert!(matches!(
        repo.delete_image(image.id, other_user()),
        Err(RepositoryError::NotFound)
    ));
    repo.delete_image(image.id, user()).unwrap();
    assert!(repo.get_image(image.id).unwrap().is_none());

    let task = repo.get_task(created[0].id, user()).unwrap().unwrap();
    assert_eq!(task.image_id, None);
}

#[test]
fn test_device_registration_moves_token_between_users() {
    let test_db = common::TestDb::new("test_device_registration.db");
    let repo = DieselRepository::new(test_db.pool());
    let token = DeviceToken::new("fcm-token-1").unwrap();

    repo.register_device(&NewDevice {
        user_id: user(),
        token: token.clone(),
        platform: Platform::Android,
    })
    .unwrap();
    let moved = repo
        .register_device(&NewDevice {
            user_id: other_user(),
            token: token.clone(),
            platform: Platform::Ios,
        })
        .unwrap();
    assert_eq!(moved.user_id, other_user());
    assert_eq!(moved.platform, Platform::Ios);

    assert!(repo.list_devices(user()).unwrap().is_empty());
    assert_eq!(repo.list_devices(other_user()).unwrap().len(), 1);

    assert_eq!(repo.remove_device(user(), &token).unwrap(), 0);
    assert_eq!(repo.remove_device(other_user(), &token).unwrap(), 1);
}

#[test]
fn test_subscription_and_summary_upserts() {
    let test_db = common::TestDb::new("test_subscription_and_summary_upserts.db");
    let repo = DieselRepository::new(test_db.pool());

    assert!(repo.get_subscription(user()).unwrap().is_none());

    let mut plan = UpsertSubscription {
        user_id: user(),
        plan: Plan::Free,
        status: SubscriptionStatus::Active,
        daily_limit: Plan::Free.default_daily_limit(),
        expires_at: None,
    };
    repo.upsert_subscription(&plan).unwrap();
    plan.plan = Plan::Pro;
    plan.daily_limit = 1000;
    let stored = repo.upsert_subscription(&plan).unwrap();
    assert_eq!(stored.plan, Plan::Pro);
    assert_eq!(repo.get_subscription(user()).unwrap().unwrap().daily_limit, 1000);

    let customer = repo
        .create_customer(&new_customer(user(), "Alice", "010-1234-5678"))
        .unwrap();
    for text in ["first summary", "second summary"] {
        repo.upsert_summary(&NewConversationSummary {
            customer_id: customer.id,
            user_id: user(),
            summary: SummaryText::new(text).unwrap(),
        })
        .unwrap();
    }
    let summary = repo.get_summary(customer.id, user()).unwrap().unwrap();
    assert_eq!(summary.summary.as_str(), "second summary");
    assert!(repo.get_summary(customer.id, other_user()).unwrap().is_none());
}

#[test]
fn test_access_logs_and_usage_stats() {
    let test_db = common::TestDb::new("test_access_logs_and_usage_stats.db");
    let repo = DieselRepository::new(test_db.pool());

    for (user_id, path) in [
        (Some(user()), "/api/customers"),
        (Some(other_user()), "/api/tasks"),
        (None, "/s/1"),
    ] {
        repo.create_access_log(&NewAccessLog {
            user_id,
            method: "GET".to_string(),
            path: path.to_string(),
            status: 200,
            ip: Some("127.0.0.1".to_string()),
            user_agent: None,
        })
        .unwrap();
    }

    let (total, logs) = repo.list_access_logs(AccessLogListQuery::new()).unwrap();
    assert_eq!(total, 3);
    assert_eq!(logs.len(), 3);
    let (mine, _) = repo
        .list_access_logs(AccessLogListQuery::new().user_id(user()))
        .unwrap();
    assert_eq!(mine, 1);

    repo.create_customer(&new_customer(user(), "Alice", "010-1234-5678"))
        .unwrap();
    let (_, mut tasks) = repo
        .create_tasks(
            &[
                new_task(user(), "010-1234-5678", "a"),
                new_task(user(), "010-1234-5678", "b"),
            ],
            &quota(user(), 10),
        )
        .unwrap();
    let (_, others) = repo
        .create_tasks(
            &[new_task(other_user(), "010-2222-3333", "c")],
            &quota(other_user(), 10),
        )
        .unwrap();
    tasks.extend(others);
    repo.complete_task(tasks[0].id, user(), &TaskOutcome::Sent)
        .unwrap();
    repo.complete_task(tasks[1].id, user(), &TaskOutcome::Sent)
        .unwrap();
    repo.complete_task(
        tasks[2].id,
        other_user(),
        &TaskOutcome::Failed("blocked".to_string()),
    )
    .unwrap();

    let since = Utc::now().naive_utc() - Duration::days(1);
    let stats = repo.usage_stats(since, 10).unwrap();
    assert_eq!(stats.total_customers, 1);
    assert_eq!(stats.requests, 3);

    let sent_total: i64 = stats.daily.iter().map(|day| day.sent).sum();
    let failed_total: i64 = stats.daily.iter().map(|day| day.failed).sum();
    assert_eq!((sent_total, failed_total), (2, 1));

    assert_eq!(stats.top_senders.len(), 1);
    assert_eq!(stats.top_senders[0].user_id, user());
    assert_eq!(stats.top_senders[0].sent, 2);

    let sent = stats
        .tasks_by_status
        .iter()
        .find(|row| row.status == "sent")
        .unwrap();
    assert_eq!(sent.count, 2);
}

#[test]
fn test_usage_stats_groups_outcomes_by_day() {
    use sms_crm::schema::sms_logs;

    let test_db = common::TestDb::new("test_usage_stats_groups_outcomes_by_day.db");
    let repo = DieselRepository::new(test_db.pool());
    let (_, tasks) = repo
        .create_tasks(&[new_task(user(), "010-1234-5678", "a")], &quota(user(), 10))
        .unwrap();

    let today = Utc::now().date_naive();
    let yesterday = today - Duration::days(1);
    let log = |created_at, success| NewSmsLog {
        user_id: common::USER_ID,
        task_id: tasks[0].id.get(),
        customer_id: None,
        phone: "+821012345678",
        body: "a",
        success,
        error: None,
        created_at,
    };
    let rows = vec![
        log((today - Duration::days(3)).and_hms_opt(12, 0, 0).unwrap(), true),
        log(yesterday.and_hms_opt(23, 59, 59).unwrap(), true),
        log(today.and_hms_opt(0, 0, 1).unwrap(), false),
        log(today.and_hms_opt(0, 0, 2).unwrap(), true),
    ];
    let mut conn = test_db.pool().get().unwrap();
    diesel::insert_into(sms_logs::table)
        .values(&rows)
        .execute(&mut conn)
        .unwrap();

    let since = (today - Duration::days(2)).and_time(NaiveTime::MIN);
    let stats = repo.usage_stats(since, 10).unwrap();
    assert_eq!(
        stats.daily,
        vec![
            DailySmsCount {
                day: yesterday,
                sent: 1,
                failed: 0,
            },
            DailySmsCount {
                day: today,
                sent: 1,
                failed: 1,
            },
        ]
    );
}
