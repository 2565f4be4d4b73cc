use diesel::prelude::*;

use crate::{
    domain::{
        sms_log::SmsLog,
        types::{CustomerId, UserId},
    },
    models::sms_log::SmsLog as DbSmsLog,
    repository::{
        DieselRepository, SmsLogReader,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl SmsLogReader for DieselRepository {
    fn list_customer_sms_logs(
        &self,
        customer_id: CustomerId,
        user_id: UserId,
        limit: usize,
    ) -> RepositoryResult<Vec<SmsLog>> {
        use crate::schema::sms_logs;

        let mut conn = self.conn()?;
        sms_logs::table
            .filter(sms_logs::customer_id.eq(customer_id.get()))
            .filter(sms_logs::user_id.eq(user_id.to_string()))
            .order((sms_logs::created_at.desc(), sms_logs::id.desc()))
            .limit(limit as i64)
            .load::<DbSmsLog>(&mut conn)?
            .into_iter()
            .map(|row| SmsLog::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}
