//! SMS/MMS task queue rows executed by the salesperson's mobile client.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CustomerId, ImageId, MessageBody, PhoneNumber, TaskId, TypeConstraintError, UserId,
};

string_enum!(
    /// Delivery channel of a task; MMS carries an image.
    TaskKind {
        Sms => "sms",
        Mms => "mms",
    }
);

string_enum!(
    /// Lifecycle state of a queued task.
    TaskStatus {
        Pending => "pending",
        Sent => "sent",
        Failed => "failed",
        Cancelled => "cancelled",
    }
);

impl TaskStatus {
    /// Terminal states never transition again.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, TaskStatus::Pending)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub customer_id: Option<CustomerId>,
    pub phone: PhoneNumber,
    pub body: MessageBody,
    pub image_id: Option<ImageId>,
    pub kind: TaskKind,
    pub status: TaskStatus,
    pub error: Option<String>,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

impl Task {
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        id: i32,
        user_id: &str,
        customer_id: Option<i32>,
        phone: String,
        body: String,
        image_id: Option<&[u8]>,
        kind: &str,
        status: &str,
        error: Option<String>,
        created_at: NaiveDateTime,
        completed_at: Option<NaiveDateTime>,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: TaskId::new(id)?,
            user_id: user_id.parse()?,
            customer_id: customer_id.map(CustomerId::new).transpose()?,
            phone: PhoneNumber::new(phone)?,
            body: MessageBody::new(body)?,
            image_id: image_id.map(ImageId::from_bytes).transpose()?,
            kind: kind.parse()?,
            status: status.parse()?,
            error,
            created_at,
            completed_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct NewTask {
    pub user_id: UserId,
    pub customer_id: Option<CustomerId>,
    pub phone: PhoneNumber,
    pub body: MessageBody,
    pub image_id: Option<ImageId>,
}

impl NewTask {
    #[must_use]
    pub fn new(
        user_id: UserId,
        customer_id: Option<CustomerId>,
        phone: PhoneNumber,
        body: MessageBody,
        image_id: Option<ImageId>,
    ) -> Self {
        Self {
            user_id,
            customer_id,
            phone,
            body,
            image_id,
        }
    }

    /// Tasks with an attached image are sent as MMS.
    pub fn kind(&self) -> TaskKind {
        if self.image_id.is_some() {
            TaskKind::Mms
        } else {
            TaskKind::Sms
        }
    }
}

/// Result reported by the mobile client after attempting a send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    Sent,
    Failed(String),
}

impl TaskOutcome {
    pub fn status(&self) -> TaskStatus {
        match self {
            TaskOutcome::Sent => TaskStatus::Sent,
            TaskOutcome::Failed(_) => TaskStatus::Failed,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            TaskOutcome::Sent => None,
            TaskOutcome::Failed(reason) => Some(reason.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!("pending".parse::<TaskStatus>(), Ok(TaskStatus::Pending));
        assert_eq!(TaskStatus::Cancelled.to_string(), "cancelled");
        assert!("queued".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(TaskStatus::Sent.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
    }

    #[test]
    fn image_turns_task_into_mms() {
        let user_id: UserId = "6f9619ff-8b86-d011-b42d-00cf4fc964ff".parse().unwrap();
        let mut task = NewTask::new(
            user_id,
            None,
            PhoneNumber::new("010-1234-5678").unwrap(),
            MessageBody::new("hi").unwrap(),
            None,
        );
        assert_eq!(task.kind(), TaskKind::Sms);
        task.image_id = Some(ImageId::new());
        assert_eq!(task.kind(), TaskKind::Mms);
    }

    #[test]
    fn outcome_maps_to_status() {
        assert_eq!(TaskOutcome::Sent.status(), TaskStatus::Sent);
        let failed = TaskOutcome::Failed("no signal".into());
        assert_eq!(failed.status(), TaskStatus::Failed);
        assert_eq!(failed.error(), Some("no signal"));
    }
}
