use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::analytics::DailySmsCount;
use crate::domain::sms_log::SmsLog as DomainSmsLog;
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::sms_logs)]
pub struct SmsLog {
    pub id: i32,
    pub user_id: String,
    pub task_id: i32,
    pub customer_id: Option<i32>,
    pub phone: String,
    pub body: String,
    pub success: bool,
    pub error: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sms_logs)]
pub struct NewSmsLog<'a> {
    pub user_id: &'a str,
    pub task_id: i32,
    pub customer_id: Option<i32>,
    pub phone: &'a str,
    pub body: &'a str,
    pub success: bool,
    pub error: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

/// One row of the per-day outcome aggregate.
#[derive(Debug, QueryableByName)]
pub struct DailySmsRow {
    #[diesel(sql_type = diesel::sql_types::Date)]
    pub day: NaiveDate,
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub sent: i64,
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub failed: i64,
}

impl From<DailySmsRow> for DailySmsCount {
    fn from(row: DailySmsRow) -> Self {
        DailySmsCount {
            day: row.day,
            sent: row.sent,
            failed: row.failed,
        }
    }
}

impl TryFrom<SmsLog> for DomainSmsLog {
    type Error = TypeConstraintError;

    fn try_from(log: SmsLog) -> Result<Self, Self::Error> {
        DomainSmsLog::try_new(
            log.id,
            &log.user_id,
            log.task_id,
            log.customer_id,
            log.phone,
            log.body,
            log.success,
            log.error,
            log.created_at,
        )
    }
}
