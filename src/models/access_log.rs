use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::access_log::{AccessLog as DomainAccessLog, NewAccessLog as DomainNewAccessLog};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::access_logs)]
pub struct AccessLog {
    pub id: i32,
    pub user_id: Option<String>,
    pub method: String,
    pub path: String,
    pub status: i32,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::access_logs)]
pub struct NewAccessLog<'a> {
    pub user_id: Option<String>,
    pub method: &'a str,
    pub path: &'a str,
    pub status: i32,
    pub ip: Option<&'a str>,
    pub user_agent: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<AccessLog> for DomainAccessLog {
    type Error = TypeConstraintError;

    fn try_from(log: AccessLog) -> Result<Self, Self::Error> {
        DomainAccessLog::try_new(
            log.id,
            log.user_id.as_deref(),
            log.method,
            log.path,
            log.status,
            log.ip,
            log.user_agent,
            log.created_at,
        )
    }
}

impl<'a> NewAccessLog<'a> {
    pub fn from_domain(log: &'a DomainNewAccessLog, now: NaiveDateTime) -> Self {
        Self {
            user_id: log.user_id.map(|id| id.to_string()),
            method: &log.method,
            path: &log.path,
            status: log.status,
            ip: log.ip.as_deref(),
            user_agent: log.user_agent.as_deref(),
            created_at: now,
        }
    }
}
