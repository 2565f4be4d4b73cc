use chrono::Utc;
use diesel::prelude::*;

use crate::{
    db::DbConnection,
    domain::{
        task::{NewTask, Task, TaskOutcome, TaskStatus},
        types::{TaskId, UserId},
    },
    models::{
        sms_log::NewSmsLog as DbNewSmsLog,
        task::{NewTask as DbNewTask, Task as DbTask},
    },
    repository::{
        DailyQuota, DieselRepository, TaskListQuery, TaskReader, TaskWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

fn into_domain(rows: Vec<DbTask>) -> RepositoryResult<Vec<Task>> {
    rows.into_iter()
        .map(|row| Task::try_from(row).map_err(RepositoryError::from))
        .collect()
}

/// Loads a task owned by `user_id` and checks that it is still pending.
fn pending_task(
    conn: &mut DbConnection,
    id: TaskId,
    user_id: UserId,
) -> RepositoryResult<DbTask> {
    use crate::schema::tasks;

    let row = tasks::table
        .filter(tasks::id.eq(id.get()))
        .filter(tasks::user_id.eq(user_id.to_string()))
        .first::<DbTask>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)?;

    if row.status != TaskStatus::Pending.as_str() {
        return Err(RepositoryError::ConstraintViolation(format!(
            "task {} is {}",
            row.id, row.status
        )));
    }
    Ok(row)
}

impl TaskReader for DieselRepository {
    fn get_task(&self, id: TaskId, user_id: UserId) -> RepositoryResult<Option<Task>> {
        use crate::schema::tasks;

        let mut conn = self.conn()?;
        let row = tasks::table
            .filter(tasks::id.eq(id.get()))
            .filter(tasks::user_id.eq(user_id.to_string()))
            .first::<DbTask>(&mut conn)
            .optional()?;

        Ok(row.map(Task::try_from).transpose()?)
    }

    fn list_pending_tasks(&self, user_id: UserId, limit: usize) -> RepositoryResult<Vec<Task>> {
        use crate::schema::tasks;

        let mut conn = self.conn()?;
        let rows = tasks::table
            .filter(tasks::user_id.eq(user_id.to_string()))
            .filter(tasks::status.eq(TaskStatus::Pending.as_str()))
            .order((tasks::created_at.asc(), tasks::id.asc()))
            .limit(limit as i64)
            .load::<DbTask>(&mut conn)?;

        into_domain(rows)
    }

    fn list_tasks(&self, query: TaskListQuery) -> RepositoryResult<(usize, Vec<Task>)> {
        use crate::schema::tasks;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = tasks::table
                .filter(tasks::user_id.eq(query.user_id.to_string()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(status) = query.status {
                items = items.filter(tasks::status.eq(status.as_str()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((tasks::created_at.desc(), tasks::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let rows = items.load::<DbTask>(&mut conn)?;
        Ok((total, into_domain(rows)?))
    }
}

impl TaskWriter for DieselRepository {
    fn create_tasks(
        &self,
        new_tasks: &[NewTask],
        quota: &DailyQuota,
    ) -> RepositoryResult<(usize, Vec<Task>)> {
        use crate::schema::tasks;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        // IMMEDIATE takes the write lock before counting so concurrent batches
        // cannot both pass the check.
        let (remaining, rows) = conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let used = tasks::table
                .filter(tasks::user_id.eq(quota.user_id.to_string()))
                .filter(tasks::created_at.ge(quota.since))
                .filter(tasks::status.ne(TaskStatus::Cancelled.as_str()))
                .count()
                .get_result::<i64>(conn)?;
            let remaining = quota
                .limit
                .saturating_sub(usize::try_from(used).unwrap_or(usize::MAX));
            if new_tasks.len() > remaining {
                return Err(RepositoryError::QuotaExceeded { remaining });
            }

            let mut rows = Vec::with_capacity(new_tasks.len());
            for task in new_tasks {
                let insertable = DbNewTask::from_domain(task, now);
                let row = diesel::insert_into(tasks::table)
                    .values(&insertable)
                    .get_result::<DbTask>(conn)?;
                rows.push(row);
            }
            Ok((remaining - rows.len(), rows))
        })?;

        Ok((remaining, into_domain(rows)?))
    }

    fn complete_task(
        &self,
        id: TaskId,
        user_id: UserId,
        outcome: &TaskOutcome,
    ) -> RepositoryResult<Task> {
        use crate::schema::{sms_logs, tasks};

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let row = conn.transaction::<_, RepositoryError, _>(|conn| {
            let task = pending_task(conn, id, user_id)?;

            let updated = diesel::update(tasks::table.find(task.id))
                .set((
                    tasks::status.eq(outcome.status().as_str()),
                    tasks::error.eq(outcome.error()),
                    tasks::completed_at.eq(Some(now)),
                ))
                .get_result::<DbTask>(conn)?;

            let log = DbNewSmsLog {
                user_id: &task.user_id,
                task_id: task.id,
                customer_id: task.customer_id,
                phone: &task.phone,
                body: &task.body,
                success: matches!(outcome, TaskOutcome::Sent),
                error: outcome.error(),
                created_at: now,
            };
            diesel::insert_into(sms_logs::table)
                .values(&log)
                .execute(conn)?;

            Ok(updated)
        })?;

        Ok(Task::try_from(row)?)
    }

    fn cancel_task(&self, id: TaskId, user_id: UserId) -> RepositoryResult<Task> {
        use crate::schema::tasks;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let row = conn.transaction::<_, RepositoryError, _>(|conn| {
            let task = pending_task(conn, id, user_id)?;
            let updated = diesel::update(tasks::table.find(task.id))
                .set((
                    tasks::status.eq(TaskStatus::Cancelled.as_str()),
                    tasks::completed_at.eq(Some(now)),
                ))
                .get_result::<DbTask>(conn)?;
            Ok(updated)
        })?;

        Ok(Task::try_from(row)?)
    }
}
