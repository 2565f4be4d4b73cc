//! Data-only push notifications delivered through Firebase Cloud Messaging.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

pub mod fcm;

pub use fcm::{FcmClient, ServiceAccountKey};

#[derive(Debug, Error)]
pub enum PushError {
    #[error("failed to read service account: {0}")]
    ServiceAccount(String),

    #[error("failed to sign assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token exchange failed with status {status}: {body}")]
    TokenExchange { status: u16, body: String },

    #[error("send failed with status {status}: {body}")]
    Send { status: u16, body: String },

    /// The registration token is no longer valid and should be forgotten.
    #[error("device token is not registered")]
    Unregistered,
}

/// Delivery seam used by the services; lets tests observe pushes.
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Sends a data-only message (no system-rendered notification) to a device.
    async fn send_data(&self, token: &str, data: &BTreeMap<String, String>)
    -> Result<(), PushError>;
}

/// Used when no service account is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPush;

#[async_trait]
impl PushSender for DisabledPush {
    async fn send_data(
        &self,
        token: &str,
        data: &BTreeMap<String, String>,
    ) -> Result<(), PushError> {
        log::warn!("Push disabled, dropping message {data:?} for device {token}");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-mocks"))]
mockall::mock! {
    pub Push {}

    #[async_trait]
    impl PushSender for Push {
        async fn send_data(
            &self,
            token: &str,
            data: &BTreeMap<String, String>,
        ) -> Result<(), PushError>;
    }
}
