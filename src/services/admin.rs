use chrono::{Duration, NaiveTime, Utc};

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::access_log::AccessLog;
use crate::domain::analytics::UsageStats;
use crate::domain::types::UserId;
use crate::dto::admin::{
    AccessLogsQuery, DEFAULT_STATS_DAYS, MAX_STATS_DAYS, StatsQuery, TOP_SENDERS,
};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{Paginated, Pagination};
use crate::repository::{AccessLogListQuery, AccessLogReader, AnalyticsReader};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Usage over the last `days` calendar days, today included.
pub fn usage_stats<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: StatsQuery,
) -> ServiceResult<UsageStats>
where
    R: AnalyticsReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let days = query.days.unwrap_or(DEFAULT_STATS_DAYS);
    if !(1..=MAX_STATS_DAYS).contains(&days) {
        return Err(ServiceError::Form(format!(
            "조회 기간은 1일에서 {MAX_STATS_DAYS}일 사이여야 합니다."
        )));
    }

    let today = Utc::now().date_naive();
    let since = (today - Duration::days(i64::from(days) - 1)).and_time(NaiveTime::MIN);

    repo.usage_stats(since, TOP_SENDERS).map_err(|err| {
        log::error!("Failed to compute usage stats: {err}");
        ServiceError::from(err)
    })
}

pub fn list_access_logs<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: AccessLogsQuery,
) -> ServiceResult<Paginated<AccessLog>>
where
    R: AccessLogReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let pagination = Pagination::new(query.page, query.per_page);
    let mut list_query = AccessLogListQuery::new().paginate(pagination);

    if let Some(raw) = query.user_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let user_id: UserId = raw
            .parse()
            .map_err(|_| ServiceError::Form("사용자 ID 형식이 올바르지 않습니다.".to_string()))?;
        list_query = list_query.user_id(user_id);
    }

    let (total, logs) = repo.list_access_logs(list_query)?;
    Ok(Paginated::new(logs, pagination, total))
}
