use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AccessLogId, TypeConstraintError, UserId};

/// One audited HTTP request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AccessLog {
    pub id: AccessLogId,
    pub user_id: Option<UserId>,
    pub method: String,
    pub path: String,
    pub status: i32,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: NaiveDateTime,
}

impl AccessLog {
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        id: i32,
        user_id: Option<&str>,
        method: String,
        path: String,
        status: i32,
        ip: Option<String>,
        user_agent: Option<String>,
        created_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: AccessLogId::new(id)?,
            user_id: user_id.map(str::parse).transpose()?,
            method,
            path,
            status,
            ip,
            user_agent,
            created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewAccessLog {
    pub user_id: Option<UserId>,
    pub method: String,
    pub path: String,
    pub status: i32,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}
