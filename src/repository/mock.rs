//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDateTime;
use mockall::mock;

use crate::domain::access_log::{AccessLog, NewAccessLog};
use crate::domain::analytics::UsageStats;
use crate::domain::conversation_summary::{ConversationSummary, NewConversationSummary};
use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::domain::device::{Device, NewDevice};
use crate::domain::image::{NewUserImage, UserImage};
use crate::domain::sms_log::SmsLog;
use crate::domain::subscription::{Subscription, UpsertSubscription};
use crate::domain::task::{NewTask, Task, TaskOutcome};
use crate::domain::template::{MessageTemplate, NewMessageTemplate, UpdateMessageTemplate};
use crate::domain::types::{CustomerId, DeviceToken, ImageId, TaskId, TemplateId, UserId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AccessLogListQuery, AccessLogReader, AccessLogWriter, AnalyticsReader,
    ConversationSummaryReader, ConversationSummaryWriter, CustomerListQuery, CustomerReader,
    CustomerWriter, DailyQuota, DeviceReader, DeviceWriter, ImageReader, ImageWriter, SmsLogReader,
    SubscriptionReader, SubscriptionWriter, TaskListQuery, TaskReader, TaskWriter,
    TemplateReader, TemplateWriter,
};

mock! {
    pub Repository {}

    impl CustomerReader for Repository {
        fn get_customer(&self, id: CustomerId, user_id: UserId) -> RepositoryResult<Option<Customer>>;
        fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
        fn get_customers_by_ids(
            &self,
            user_id: UserId,
            ids: &[CustomerId],
        ) -> RepositoryResult<Vec<Customer>>;
    }

    impl CustomerWriter for Repository {
        fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
        fn update_customer(
            &self,
            id: CustomerId,
            user_id: UserId,
            updates: &UpdateCustomer,
        ) -> RepositoryResult<Customer>;
        fn delete_customer(&self, id: CustomerId, user_id: UserId) -> RepositoryResult<()>;
    }

    impl TemplateReader for Repository {
        fn get_template(
            &self,
            id: TemplateId,
            user_id: UserId,
        ) -> RepositoryResult<Option<MessageTemplate>>;
        fn list_templates(&self, user_id: UserId) -> RepositoryResult<Vec<MessageTemplate>>;
    }

    impl TemplateWriter for Repository {
        fn create_template(&self, template: &NewMessageTemplate) -> RepositoryResult<MessageTemplate>;
        fn update_template(
            &self,
            id: TemplateId,
            user_id: UserId,
            updates: &UpdateMessageTemplate,
        ) -> RepositoryResult<MessageTemplate>;
        fn delete_template(&self, id: TemplateId, user_id: UserId) -> RepositoryResult<()>;
    }

    impl TaskReader for Repository {
        fn get_task(&self, id: TaskId, user_id: UserId) -> RepositoryResult<Option<Task>>;
        fn list_pending_tasks(&self, user_id: UserId, limit: usize) -> RepositoryResult<Vec<Task>>;
        fn list_tasks(&self, query: TaskListQuery) -> RepositoryResult<(usize, Vec<Task>)>;
    }

    impl TaskWriter for Repository {
        fn create_tasks(
            &self,
            tasks: &[NewTask],
            quota: &DailyQuota,
        ) -> RepositoryResult<(usize, Vec<Task>)>;
        fn complete_task(
            &self,
            id: TaskId,
            user_id: UserId,
            outcome: &TaskOutcome,
        ) -> RepositoryResult<Task>;
        fn cancel_task(&self, id: TaskId, user_id: UserId) -> RepositoryResult<Task>;
    }

    impl SmsLogReader for Repository {
        fn list_customer_sms_logs(
            &self,
            customer_id: CustomerId,
            user_id: UserId,
            limit: usize,
        ) -> RepositoryResult<Vec<SmsLog>>;
    }

    impl SubscriptionReader for Repository {
        fn get_subscription(&self, user_id: UserId) -> RepositoryResult<Option<Subscription>>;
    }

    impl SubscriptionWriter for Repository {
        fn upsert_subscription(
            &self,
            subscription: &UpsertSubscription,
        ) -> RepositoryResult<Subscription>;
    }

    impl DeviceReader for Repository {
        fn list_devices(&self, user_id: UserId) -> RepositoryResult<Vec<Device>>;
    }

    impl DeviceWriter for Repository {
        fn register_device(&self, device: &NewDevice) -> RepositoryResult<Device>;
        fn remove_device(&self, user_id: UserId, token: &DeviceToken) -> RepositoryResult<usize>;
    }

    impl ImageReader for Repository {
        fn get_image(&self, id: ImageId) -> RepositoryResult<Option<UserImage>>;
        fn list_images(&self, user_id: UserId) -> RepositoryResult<Vec<UserImage>>;
    }

    impl ImageWriter for Repository {
        fn create_image(&self, image: &NewUserImage) -> RepositoryResult<UserImage>;
        fn delete_image(&self, id: ImageId, user_id: UserId) -> RepositoryResult<()>;
    }

    impl ConversationSummaryReader for Repository {
        fn get_summary(
            &self,
            customer_id: CustomerId,
            user_id: UserId,
        ) -> RepositoryResult<Option<ConversationSummary>>;
    }

    impl ConversationSummaryWriter for Repository {
        fn upsert_summary(
            &self,
            summary: &NewConversationSummary,
        ) -> RepositoryResult<ConversationSummary>;
    }

    impl AccessLogReader for Repository {
        fn list_access_logs(
            &self,
            query: AccessLogListQuery,
        ) -> RepositoryResult<(usize, Vec<AccessLog>)>;
    }

    impl AccessLogWriter for Repository {
        fn create_access_log(&self, entry: &NewAccessLog) -> RepositoryResult<()>;
    }

    impl AnalyticsReader for Repository {
        fn usage_stats(&self, since: NaiveDateTime, top: usize) -> RepositoryResult<UsageStats>;
    }
}
