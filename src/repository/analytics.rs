//! Aggregate queries for the admin dashboard.

use chrono::NaiveDateTime;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sql_types::Timestamp;

use crate::{
    domain::{
        analytics::{SenderCount, StatusCount, UsageStats},
        types::UserId,
    },
    models::sms_log::DailySmsRow,
    repository::{AnalyticsReader, DieselRepository, errors::RepositoryResult},
};

/// Sent/failed counts per UTC calendar day, oldest day first.
const DAILY_SMS_COUNTS: &str = "\
    SELECT date(created_at) AS day, \
           SUM(CASE WHEN success THEN 1 ELSE 0 END) AS sent, \
           SUM(CASE WHEN success THEN 0 ELSE 1 END) AS failed \
    FROM sms_logs \
    WHERE created_at >= ? \
    GROUP BY date(created_at) \
    ORDER BY day";

/// Orders senders by volume, highest first, keeping at most `top` entries.
fn top_senders(rows: Vec<(String, i64)>, top: usize) -> RepositoryResult<Vec<SenderCount>> {
    let mut senders = rows
        .into_iter()
        .map(|(user_id, sent)| {
            Ok(SenderCount {
                user_id: UserId::try_from(user_id.as_str())?,
                sent,
            })
        })
        .collect::<RepositoryResult<Vec<_>>>()?;

    senders.sort_by(|a, b| {
        b.sent
            .cmp(&a.sent)
            .then_with(|| a.user_id.to_string().cmp(&b.user_id.to_string()))
    });
    senders.truncate(top);
    Ok(senders)
}

impl AnalyticsReader for DieselRepository {
    fn usage_stats(&self, since: NaiveDateTime, top: usize) -> RepositoryResult<UsageStats> {
        use crate::schema::{access_logs, customers, sms_logs, tasks};

        let mut conn = self.conn()?;

        let total_customers = customers::table.count().get_result::<i64>(&mut conn)?;

        let tasks_by_status = tasks::table
            .filter(tasks::created_at.ge(since))
            .group_by(tasks::status)
            .select((tasks::status, count_star()))
            .order(tasks::status.asc())
            .load::<(String, i64)>(&mut conn)?
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect();

        let daily = diesel::sql_query(DAILY_SMS_COUNTS)
            .bind::<Timestamp, _>(since)
            .load::<DailySmsRow>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        let senders = sms_logs::table
            .filter(sms_logs::created_at.ge(since))
            .filter(sms_logs::success.eq(true))
            .group_by(sms_logs::user_id)
            .select((sms_logs::user_id, count_star()))
            .load::<(String, i64)>(&mut conn)?;

        let requests = access_logs::table
            .filter(access_logs::created_at.ge(since))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(UsageStats {
            total_customers,
            tasks_by_status,
            daily,
            top_senders: top_senders(senders, top)?,
            requests,
        })
    }
}
