use crate::SERVICE_ACCESS_ROLE;
use crate::domain::device::Device;
use crate::domain::types::DeviceToken;
use crate::forms::devices::{RegisterDeviceForm, UnregisterDeviceForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DeviceWriter;
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Stores the FCM token for the caller, taking it over from any previous owner.
pub fn register_device<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: RegisterDeviceForm,
) -> ServiceResult<Device>
where
    R: DeviceWriter + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let device = form.into_new_device(user_id)?;

    repo.register_device(&device).map_err(|err| {
        log::error!("Failed to register device: {err}");
        ServiceError::from(err)
    })
}

pub fn unregister_device<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: UnregisterDeviceForm,
) -> ServiceResult<()>
where
    R: DeviceWriter + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let token = DeviceToken::try_from(form)?;

    match repo.remove_device(user_id, &token)? {
        0 => Err(ServiceError::NotFound),
        _ => Ok(()),
    }
}
