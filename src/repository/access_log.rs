use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::access_log::{AccessLog, NewAccessLog},
    models::access_log::{AccessLog as DbAccessLog, NewAccessLog as DbNewAccessLog},
    repository::{
        AccessLogListQuery, AccessLogReader, AccessLogWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl AccessLogReader for DieselRepository {
    fn list_access_logs(
        &self,
        query: AccessLogListQuery,
    ) -> RepositoryResult<(usize, Vec<AccessLog>)> {
        use crate::schema::access_logs;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = access_logs::table.into_boxed::<diesel::sqlite::Sqlite>();
            if let Some(user_id) = &query.user_id {
                items = items.filter(access_logs::user_id.eq(user_id.to_string()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items =
            query_builder().order((access_logs::created_at.desc(), access_logs::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let logs = items
            .load::<DbAccessLog>(&mut conn)?
            .into_iter()
            .map(|row| AccessLog::try_from(row).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, logs))
    }
}

impl AccessLogWriter for DieselRepository {
    fn create_access_log(&self, entry: &NewAccessLog) -> RepositoryResult<()> {
        use crate::schema::access_logs;

        let mut conn = self.conn()?;
        let insertable = DbNewAccessLog::from_domain(entry, Utc::now().naive_utc());
        diesel::insert_into(access_logs::table)
            .values(&insertable)
            .execute(&mut conn)?;

        Ok(())
    }
}
