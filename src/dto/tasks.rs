use serde::{Deserialize, Serialize};

use crate::domain::task::{Task, TaskStatus};

/// Query string of `GET /api/tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskHistoryQuery {
    pub status: Option<TaskStatus>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Result of a successful enqueue.
#[derive(Debug, Serialize)]
pub struct EnqueueResponse {
    pub created: usize,
    /// Allowance left for the rest of the day after this request.
    pub remaining_today: usize,
    pub tasks: Vec<Task>,
}
