use chrono::Utc;

use crate::domain::subscription::Subscription;
use crate::domain::types::UserId;
use crate::forms::subscriptions::UpdateSubscriptionForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{SubscriptionReader, SubscriptionWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Returns the caller's plan, or an inactive free plan if none was provisioned.
pub fn get_own_subscription<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Subscription>
where
    R: SubscriptionReader + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let subscription = repo.get_subscription(user_id)?;
    Ok(subscription.unwrap_or_else(|| Subscription::inactive(user_id, Utc::now().naive_utc())))
}

/// Admin-only: sets the plan of any user.
pub fn set_subscription<R>(
    repo: &R,
    user: &AuthenticatedUser,
    target_user_id: &str,
    form: UpdateSubscriptionForm,
) -> ServiceResult<Subscription>
where
    R: SubscriptionWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;
    let target: UserId = target_user_id.parse().map_err(|_| ServiceError::NotFound)?;

    let upsert = form.into_upsert(target)?;
    let subscription = repo.upsert_subscription(&upsert).map_err(|err| {
        log::error!("Failed to update subscription of {target}: {err}");
        ServiceError::from(err)
    })?;

    log::info!(
        "Subscription of {target} set to {} ({}) by {}",
        subscription.plan,
        subscription.status,
        user.email
    );
    Ok(subscription)
}
