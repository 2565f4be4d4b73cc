use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::device::{Device as DomainDevice, NewDevice as DomainNewDevice};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::device_tokens)]
pub struct Device {
    pub id: i32,
    pub user_id: String,
    pub token: String,
    pub platform: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::device_tokens)]
pub struct NewDevice<'a> {
    pub user_id: String,
    pub token: &'a str,
    pub platform: &'static str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Device> for DomainDevice {
    type Error = TypeConstraintError;

    fn try_from(device: Device) -> Result<Self, Self::Error> {
        DomainDevice::try_new(
            device.id,
            &device.user_id,
            device.token,
            &device.platform,
            device.created_at,
            device.updated_at,
        )
    }
}

impl<'a> NewDevice<'a> {
    pub fn from_domain(device: &'a DomainNewDevice, now: NaiveDateTime) -> Self {
        Self {
            user_id: device.user_id.to_string(),
            token: device.token.as_str(),
            platform: device.platform.as_str(),
            created_at: now,
            updated_at: now,
        }
    }
}
