use chrono::NaiveDateTime;

use crate::{
    db::{DbConnection, DbPool},
    domain::{
        access_log::{AccessLog, NewAccessLog},
        analytics::UsageStats,
        conversation_summary::{ConversationSummary, NewConversationSummary},
        customer::{Customer, NewCustomer, UpdateCustomer},
        device::{Device, NewDevice},
        image::{NewUserImage, UserImage},
        sms_log::SmsLog,
        subscription::{Subscription, UpsertSubscription},
        task::{NewTask, Task, TaskOutcome, TaskStatus},
        template::{MessageTemplate, NewMessageTemplate, UpdateMessageTemplate},
        types::{CustomerId, DeviceToken, ImageId, TaskId, TemplateId, UserId},
    },
    pagination::Pagination,
    repository::errors::RepositoryResult,
};

pub mod access_log;
pub mod analytics;
pub mod conversation_summary;
pub mod customer;
pub mod device;
pub mod errors;
pub mod image;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod sms_log;
pub mod subscription;
pub mod task;
pub mod template;

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

#[derive(Debug, Clone)]
pub struct CustomerListQuery {
    pub user_id: UserId,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl CustomerListQuery {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            search: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

#[derive(Debug, Clone)]
pub struct TaskListQuery {
    pub user_id: UserId,
    pub status: Option<TaskStatus>,
    pub pagination: Option<Pagination>,
}

impl TaskListQuery {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            status: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

/// Cap on the non-cancelled tasks a user may create at or after `since`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyQuota {
    pub user_id: UserId,
    pub since: NaiveDateTime,
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub struct AccessLogListQuery {
    pub user_id: Option<UserId>,
    pub pagination: Option<Pagination>,
}

impl AccessLogListQuery {
    pub fn new() -> Self {
        Self {
            user_id: None,
            pagination: None,
        }
    }

    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl Default for AccessLogListQuery {
    fn default() -> Self {
        Self::new()
    }
}

pub trait CustomerReader {
    fn get_customer(&self, id: CustomerId, user_id: UserId) -> RepositoryResult<Option<Customer>>;
    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
    fn get_customers_by_ids(
        &self,
        user_id: UserId,
        ids: &[CustomerId],
    ) -> RepositoryResult<Vec<Customer>>;
}

pub trait CustomerWriter {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
    fn update_customer(
        &self,
        id: CustomerId,
        user_id: UserId,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<Customer>;
    fn delete_customer(&self, id: CustomerId, user_id: UserId) -> RepositoryResult<()>;
}

pub trait TemplateReader {
    fn get_template(
        &self,
        id: TemplateId,
        user_id: UserId,
    ) -> RepositoryResult<Option<MessageTemplate>>;
    fn list_templates(&self, user_id: UserId) -> RepositoryResult<Vec<MessageTemplate>>;
}

pub trait TemplateWriter {
    fn create_template(&self, template: &NewMessageTemplate) -> RepositoryResult<MessageTemplate>;
    fn update_template(
        &self,
        id: TemplateId,
        user_id: UserId,
        updates: &UpdateMessageTemplate,
    ) -> RepositoryResult<MessageTemplate>;
    fn delete_template(&self, id: TemplateId, user_id: UserId) -> RepositoryResult<()>;
}

pub trait TaskReader {
    fn get_task(&self, id: TaskId, user_id: UserId) -> RepositoryResult<Option<Task>>;
    fn list_pending_tasks(&self, user_id: UserId, limit: usize) -> RepositoryResult<Vec<Task>>;
    fn list_tasks(&self, query: TaskListQuery) -> RepositoryResult<(usize, Vec<Task>)>;
}

pub trait TaskWriter {
    /// Counts the quota and inserts the batch in one transaction.
    ///
    /// Returns the quota left after the insert, or
    /// [`errors::RepositoryError::QuotaExceeded`] when the batch does not fit.
    fn create_tasks(
        &self,
        tasks: &[NewTask],
        quota: &DailyQuota,
    ) -> RepositoryResult<(usize, Vec<Task>)>;
    /// Moves a pending task to its terminal state and records the SMS log.
    fn complete_task(
        &self,
        id: TaskId,
        user_id: UserId,
        outcome: &TaskOutcome,
    ) -> RepositoryResult<Task>;
    fn cancel_task(&self, id: TaskId, user_id: UserId) -> RepositoryResult<Task>;
}

pub trait SmsLogReader {
    /// Most recent logs first.
    fn list_customer_sms_logs(
        &self,
        customer_id: CustomerId,
        user_id: UserId,
        limit: usize,
    ) -> RepositoryResult<Vec<SmsLog>>;
}

pub trait SubscriptionReader {
    fn get_subscription(&self, user_id: UserId) -> RepositoryResult<Option<Subscription>>;
}

pub trait SubscriptionWriter {
    fn upsert_subscription(
        &self,
        subscription: &UpsertSubscription,
    ) -> RepositoryResult<Subscription>;
}

pub trait DeviceReader {
    fn list_devices(&self, user_id: UserId) -> RepositoryResult<Vec<Device>>;
}

pub trait DeviceWriter {
    /// Inserts the token or re-assigns an existing one to the given user.
    fn register_device(&self, device: &NewDevice) -> RepositoryResult<Device>;
    /// Returns the number of removed rows.
    fn remove_device(&self, user_id: UserId, token: &DeviceToken) -> RepositoryResult<usize>;
}

pub trait ImageReader {
    fn get_image(&self, id: ImageId) -> RepositoryResult<Option<UserImage>>;
    fn list_images(&self, user_id: UserId) -> RepositoryResult<Vec<UserImage>>;
}

pub trait ImageWriter {
    fn create_image(&self, image: &NewUserImage) -> RepositoryResult<UserImage>;
    fn delete_image(&self, id: ImageId, user_id: UserId) -> RepositoryResult<()>;
}

pub trait ConversationSummaryReader {
    fn get_summary(
        &self,
        customer_id: CustomerId,
        user_id: UserId,
    ) -> RepositoryResult<Option<ConversationSummary>>;
}

pub trait ConversationSummaryWriter {
    fn upsert_summary(
        &self,
        summary: &NewConversationSummary,
    ) -> RepositoryResult<ConversationSummary>;
}

pub trait AccessLogReader {
    fn list_access_logs(
        &self,
        query: AccessLogListQuery,
    ) -> RepositoryResult<(usize, Vec<AccessLog>)>;
}

pub trait AccessLogWriter {
    fn create_access_log(&self, entry: &NewAccessLog) -> RepositoryResult<()>;
}

pub trait AnalyticsReader {
    /// Aggregates activity since `since`, listing at most `top` senders.
    fn usage_stats(&self, since: NaiveDateTime, top: usize) -> RepositoryResult<UsageStats>;
}
