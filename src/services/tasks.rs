//! SMS/MMS task queue: enqueue from the dashboard, execute on the phone.

use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveTime, Utc};

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::subscription::Subscription;
use crate::domain::task::{NewTask, Task, TaskOutcome};
use crate::domain::template::render_body;
use crate::domain::types::{CustomerId, PhoneNumber, TaskId, UserId};
use crate::dto::tasks::{EnqueueResponse, TaskHistoryQuery};
use crate::forms::tasks::{BodySource, CompleteTaskForm, EnqueueTasksForm, EnqueueTasksPayload};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{Paginated, Pagination};
use crate::push::{PushError, PushSender};
use crate::repository::errors::RepositoryError;
use crate::repository::{
    CustomerReader, DailyQuota, DeviceReader, DeviceWriter, ImageReader, SubscriptionReader, TaskListQuery,
    TaskReader, TaskWriter, TemplateReader,
};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Maximum number of pending tasks handed to the phone at once.
pub const PENDING_LIMIT: usize = 100;

/// Value of the `type` key in the push sent after enqueueing.
pub const PUSH_TYPE_SMS_TASKS: &str = "sms_tasks";

fn already_completed() -> ServiceError {
    ServiceError::Form("이미 처리된 작업입니다.".to_string())
}

struct Recipient {
    customer_id: Option<CustomerId>,
    phone: PhoneNumber,
    name: Option<String>,
}

/// Validates the request against the caller's plan and stores the tasks.
pub fn enqueue_tasks<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EnqueueTasksForm,
) -> ServiceResult<EnqueueResponse>
where
    R: CustomerReader
        + TemplateReader
        + TaskWriter
        + SubscriptionReader
        + ImageReader
        + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let payload = EnqueueTasksPayload::try_from(form).map_err(|err| {
        log::warn!("Rejected enqueue request: {err}");
        ServiceError::from(err)
    })?;

    let raw_body = match payload.source {
        BodySource::Template(id) => repo
            .get_template(id, user_id)?
            .ok_or(ServiceError::NotFound)?
            .body
            .into_inner(),
        BodySource::Text(body) => body,
    };

    if let Some(image_id) = payload.image_id {
        repo.get_image(image_id)?
            .filter(|image| image.user_id == user_id)
            .ok_or(ServiceError::NotFound)?;
    }

    let customers = if payload.customer_ids.is_empty() {
        Vec::new()
    } else {
        repo.get_customers_by_ids(user_id, &payload.customer_ids)?
    };
    if customers.len() != payload.customer_ids.len() {
        return Err(ServiceError::NotFound);
    }

    let mut seen = HashSet::new();
    let recipients: Vec<Recipient> = customers
        .into_iter()
        .map(|customer| Recipient {
            customer_id: Some(customer.id),
            phone: customer.phone,
            name: Some(customer.name.into_inner()),
        })
        .chain(payload.phones.into_iter().map(|phone| Recipient {
            customer_id: None,
            phone,
            name: None,
        }))
        .filter(|recipient| seen.insert(recipient.phone.as_str().to_string()))
        .collect();

    let new_tasks = recipients
        .into_iter()
        .map(|recipient| -> ServiceResult<NewTask> {
            let body = render_body(&raw_body, recipient.name.as_deref())?;
            Ok(NewTask::new(
                user_id,
                recipient.customer_id,
                recipient.phone,
                body,
                payload.image_id,
            ))
        })
        .collect::<ServiceResult<Vec<_>>>()?;

    let now = Utc::now().naive_utc();
    let subscription = repo
        .get_subscription(user_id)?
        .unwrap_or_else(|| Subscription::inactive(user_id, now));
    if !subscription.is_active(now) {
        return Err(ServiceError::Form(
            "활성화된 구독이 없습니다. 관리자에게 문의해 주세요.".to_string(),
        ));
    }

    let quota = DailyQuota {
        user_id,
        since: now.date().and_time(NaiveTime::MIN),
        limit: subscription.remaining_today(0, now),
    };
    let (remaining, tasks) = repo
        .create_tasks(&new_tasks, &quota)
        .map_err(|err| match err {
            RepositoryError::QuotaExceeded { remaining } => ServiceError::Form(format!(
                "일일 발송 한도를 초과했습니다. 오늘 남은 건수: {remaining}"
            )),
            err => {
                log::error!("Failed to create tasks: {err}");
                ServiceError::from(err)
            }
        })?;

    log::info!("Queued {} tasks for user {user_id}", tasks.len());

    Ok(EnqueueResponse {
        created: tasks.len(),
        remaining_today: remaining,
        tasks,
    })
}

/// Sends a data-only push to every device of the user.
///
/// Failures never propagate. Tokens reported as unregistered are removed.
/// Returns the number of devices that accepted the message.
pub async fn notify_devices<R>(
    repo: &R,
    push: &dyn PushSender,
    user_id: UserId,
    data: &BTreeMap<String, String>,
) -> usize
where
    R: DeviceReader + DeviceWriter + ?Sized,
{
    let devices = match repo.list_devices(user_id) {
        Ok(devices) => devices,
        Err(err) => {
            log::error!("Failed to load devices of user {user_id}: {err}");
            return 0;
        }
    };

    let mut delivered = 0;
    for device in devices {
        match push.send_data(device.token.as_str(), data).await {
            Ok(()) => delivered += 1,
            Err(PushError::Unregistered) => {
                log::info!("Removing unregistered device {}", device.id);
                if let Err(err) = repo.remove_device(user_id, &device.token) {
                    log::warn!("Failed to remove device {}: {err}", device.id);
                }
            }
            Err(err) => log::error!("Failed to push to device {}: {err}", device.id),
        }
    }
    delivered
}

/// Enqueues the tasks and wakes the user's phones.
pub async fn submit_tasks<R>(
    repo: &R,
    push: &dyn PushSender,
    user: &AuthenticatedUser,
    form: EnqueueTasksForm,
) -> ServiceResult<EnqueueResponse>
where
    R: CustomerReader
        + TemplateReader
        + TaskWriter
        + SubscriptionReader
        + ImageReader
        + DeviceReader
        + DeviceWriter
        + ?Sized,
{
    let response = enqueue_tasks(repo, user, form)?;
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let data = BTreeMap::from([
        ("type".to_string(), PUSH_TYPE_SMS_TASKS.to_string()),
        ("count".to_string(), response.created.to_string()),
    ]);
    notify_devices(repo, push, user_id, &data).await;

    Ok(response)
}

/// Pending tasks for the phone, oldest first.
pub fn list_pending_tasks<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<Task>>
where
    R: TaskReader + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;

    repo.list_pending_tasks(user_id, PENDING_LIMIT)
        .map_err(|err| {
            log::error!("Failed to list pending tasks: {err}");
            ServiceError::from(err)
        })
}

/// Records the phone's send result for a pending task.
pub fn complete_task<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: CompleteTaskForm,
) -> ServiceResult<Task>
where
    R: TaskReader + TaskWriter + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let id = TaskId::new(id).map_err(|_| ServiceError::NotFound)?;
    let outcome = TaskOutcome::try_from(form)?;

    let task = repo.get_task(id, user_id)?.ok_or(ServiceError::NotFound)?;
    if task.status.is_terminal() {
        return Err(already_completed());
    }

    repo.complete_task(id, user_id, &outcome)
        .map_err(|err| match err {
            RepositoryError::ConstraintViolation(_) => already_completed(),
            err => {
                log::error!("Failed to complete task {id}: {err}");
                ServiceError::from(err)
            }
        })
}

pub fn cancel_task<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<Task>
where
    R: TaskWriter + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let id = TaskId::new(id).map_err(|_| ServiceError::NotFound)?;

    repo.cancel_task(id, user_id).map_err(|err| match err {
        RepositoryError::ConstraintViolation(_) => already_completed(),
        err => ServiceError::from(err),
    })
}

/// Paginated task history, newest first.
pub fn list_task_history<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: TaskHistoryQuery,
) -> ServiceResult<Paginated<Task>>
where
    R: TaskReader + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let pagination = Pagination::new(query.page, query.per_page);
    let mut list_query = TaskListQuery::new(user_id).paginate(pagination);
    if let Some(status) = query.status {
        list_query = list_query.status(status);
    }

    let (total, tasks) = repo.list_tasks(list_query)?;
    Ok(Paginated::new(tasks, pagination, total))
}
