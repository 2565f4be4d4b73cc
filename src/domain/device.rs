use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{DeviceToken, DeviceTokenId, TypeConstraintError, UserId};

string_enum!(
    /// Mobile platform of a registered device, used for delivery hints.
    Platform {
        Android => "android",
        Ios => "ios",
    }
);

/// FCM registration token bound to a user.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Device {
    pub id: DeviceTokenId,
    pub user_id: UserId,
    pub token: DeviceToken,
    pub platform: Platform,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Device {
    pub fn try_new(
        id: i32,
        user_id: &str,
        token: String,
        platform: &str,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: DeviceTokenId::new(id)?,
            user_id: user_id.parse()?,
            token: DeviceToken::new(token)?,
            platform: platform.parse()?,
            created_at,
            updated_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct NewDevice {
    pub user_id: UserId,
    pub token: DeviceToken,
    pub platform: Platform,
}
