use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        device::{Device, NewDevice},
        types::{DeviceToken, UserId},
    },
    models::device::{Device as DbDevice, NewDevice as DbNewDevice},
    repository::{
        DeviceReader, DeviceWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl DeviceReader for DieselRepository {
    fn list_devices(&self, user_id: UserId) -> RepositoryResult<Vec<Device>> {
        use crate::schema::device_tokens;

        let mut conn = self.conn()?;
        device_tokens::table
            .filter(device_tokens::user_id.eq(user_id.to_string()))
            .order(device_tokens::id.asc())
            .load::<DbDevice>(&mut conn)?
            .into_iter()
            .map(|row| Device::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl DeviceWriter for DieselRepository {
    fn register_device(&self, device: &NewDevice) -> RepositoryResult<Device> {
        use crate::schema::device_tokens;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let insertable = DbNewDevice::from_domain(device, now);

        let row = diesel::insert_into(device_tokens::table)
            .values(&insertable)
            .on_conflict(device_tokens::token)
            .do_update()
            .set((
                device_tokens::user_id.eq(&insertable.user_id),
                device_tokens::platform.eq(insertable.platform),
                device_tokens::updated_at.eq(now),
            ))
            .get_result::<DbDevice>(&mut conn)?;

        Ok(Device::try_from(row)?)
    }

    fn remove_device(&self, user_id: UserId, token: &DeviceToken) -> RepositoryResult<usize> {
        use crate::schema::device_tokens;

        let mut conn = self.conn()?;
        let removed = diesel::delete(
            device_tokens::table
                .filter(device_tokens::user_id.eq(user_id.to_string()))
                .filter(device_tokens::token.eq(token.as_str())),
        )
        .execute(&mut conn)?;

        Ok(removed)
    }
}
