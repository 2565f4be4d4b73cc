use serde::Deserialize;

pub const DEFAULT_STATS_DAYS: u32 = 7;
pub const MAX_STATS_DAYS: u32 = 90;
pub const TOP_SENDERS: usize = 10;

/// Query string of `GET /api/admin/stats`.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub days: Option<u32>,
}

/// Query string of `GET /api/admin/access-logs`.
#[derive(Debug, Default, Deserialize)]
pub struct AccessLogsQuery {
    pub user_id: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}
