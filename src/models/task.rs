//! Diesel models for the SMS/MMS task queue.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::task::{NewTask as DomainNewTask, Task as DomainTask};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::tasks)]
pub struct Task {
    pub id: i32,
    pub user_id: String,
    pub customer_id: Option<i32>,
    pub phone: String,
    pub body: String,
    pub image_id: Option<Vec<u8>>,
    pub kind: String,
    pub status: String,
    pub error: Option<String>,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tasks)]
pub struct NewTask<'a> {
    pub user_id: String,
    pub customer_id: Option<i32>,
    pub phone: &'a str,
    pub body: &'a str,
    pub image_id: Option<&'a [u8]>,
    pub kind: &'static str,
    pub status: &'static str,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Task> for DomainTask {
    type Error = TypeConstraintError;

    fn try_from(task: Task) -> Result<Self, Self::Error> {
        DomainTask::try_new(
            task.id,
            &task.user_id,
            task.customer_id,
            task.phone,
            task.body,
            task.image_id.as_deref(),
            &task.kind,
            &task.status,
            task.error,
            task.created_at,
            task.completed_at,
        )
    }
}

impl<'a> NewTask<'a> {
    pub fn from_domain(task: &'a DomainNewTask, now: NaiveDateTime) -> Self {
        Self {
            user_id: task.user_id.to_string(),
            customer_id: task.customer_id.map(|id| id.get()),
            phone: task.phone.as_str(),
            body: task.body.as_str(),
            image_id: task.image_id.as_ref().map(|id| id.as_bytes().as_slice()),
            kind: task.kind().as_str(),
            status: crate::domain::task::TaskStatus::Pending.as_str(),
            created_at: now,
        }
    }
}
