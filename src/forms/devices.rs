use serde::Deserialize;
use validator::Validate;

use crate::domain::device::{NewDevice, Platform};
use crate::domain::types::{DeviceToken, UserId};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterDeviceForm {
    #[validate(length(min = 1, max = 4096))]
    pub token: String,
    pub platform: Platform,
}

impl RegisterDeviceForm {
    pub fn into_new_device(self, user_id: UserId) -> Result<NewDevice, FormError> {
        self.validate()?;
        Ok(NewDevice {
            user_id,
            token: DeviceToken::new(self.token)?,
            platform: self.platform,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UnregisterDeviceForm {
    #[validate(length(min = 1, max = 4096))]
    pub token: String,
}

impl TryFrom<UnregisterDeviceForm> for DeviceToken {
    type Error = FormError;

    fn try_from(form: UnregisterDeviceForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(DeviceToken::new(form.token)?)
    }
}
