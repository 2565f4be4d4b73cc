//! FCM HTTP v1 client authenticated with a Google service account.
//!
//! The service account signs a short-lived RS256 assertion which is exchanged
//! for an OAuth2 bearer token at the account's `token_uri`. The bearer token is
//! cached until shortly before it expires.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::push::{PushError, PushSender};

/// OAuth2 scope required by the FCM v1 send endpoint.
pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
/// Lifetime of the self-signed assertion, in seconds.
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Cached access tokens are refreshed this many seconds before they expire.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const FCM_SEND_URL: &str = "https://fcm.googleapis.com/v1/projects";

/// Subset of the Google service-account JSON key file used for signing.
#[derive(Clone, Debug, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> Result<Self, PushError> {
        serde_json::from_str(raw).map_err(|e| PushError::ServiceAccount(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PushError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PushError::ServiceAccount(e.to_string()))?;
        Self::from_json(&raw)
    }
}

/// Claims of the service-account assertion.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(key: &ServiceAccountKey, issued_at: i64) -> Self {
        Self {
            iss: key.client_email.clone(),
            scope: FCM_SCOPE.to_string(),
            aud: key.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        }
    }
}

/// Signs the assertion JWT with the service account's private key (RS256).
pub fn sign_assertion(key: &ServiceAccountKey, issued_at: i64) -> Result<String, PushError> {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let claims = AssertionClaims::new(key, issued_at);
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;

    Ok(encode(&header, &claims, &encoding_key)?)
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Clone, Debug)]
struct CachedToken {
    value: String,
    expires_at: i64,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    message: FcmMessage<'a>,
}

/// FCM v1 message carrying only a data payload.
#[derive(Debug, Serialize)]
pub struct FcmMessage<'a> {
    pub token: &'a str,
    pub data: &'a BTreeMap<String, String>,
    pub android: AndroidConfig,
    pub apns: ApnsConfig,
}

#[derive(Debug, Serialize)]
pub struct AndroidConfig {
    pub priority: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ApnsConfig {
    pub headers: BTreeMap<&'static str, &'static str>,
    pub payload: ApnsPayload,
}

#[derive(Debug, Serialize)]
pub struct ApnsPayload {
    pub aps: Aps,
}

#[derive(Debug, Serialize)]
pub struct Aps {
    #[serde(rename = "content-available")]
    pub content_available: u8,
}

impl<'a> FcmMessage<'a> {
    /// High priority on Android, background delivery on iOS.
    pub fn data_only(token: &'a str, data: &'a BTreeMap<String, String>) -> Self {
        Self {
            token,
            data,
            android: AndroidConfig { priority: "high" },
            apns: ApnsConfig {
                headers: BTreeMap::from([
                    ("apns-push-type", "background"),
                    ("apns-priority", "5"),
                ]),
                payload: ApnsPayload {
                    aps: Aps {
                        content_available: 1,
                    },
                },
            },
        }
    }
}

pub struct FcmClient {
    http: reqwest::Client,
    key: ServiceAccountKey,
    send_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl FcmClient {
    pub fn new(key: ServiceAccountKey) -> Self {
        let send_url = format!("{FCM_SEND_URL}/{}/messages:send", key.project_id);
        Self {
            http: reqwest::Client::new(),
            key,
            send_url,
            token: Mutex::new(None),
        }
    }

    fn cached_token(&self, now: i64) -> Option<String> {
        let guard = self.token.lock().ok()?;
        guard
            .as_ref()
            .filter(|token| token.expires_at - TOKEN_REFRESH_MARGIN_SECS > now)
            .map(|token| token.value.clone())
    }

    fn store_token(&self, token: CachedToken) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token);
        }
    }

    fn forget_token(&self) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
    }

    /// Returns a valid bearer token, exchanging a fresh assertion when needed.
    async fn access_token(&self) -> Result<String, PushError> {
        let now = Utc::now().timestamp();
        if let Some(token) = self.cached_token(now) {
            return Ok(token);
        }

        let assertion = sign_assertion(&self.key, now)?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        log::debug!("Obtained FCM access token valid for {}s", token.expires_in);
        self.store_token(CachedToken {
            value: token.access_token.clone(),
            expires_at: now + token.expires_in,
        });

        Ok(token.access_token)
    }
}

#[async_trait]
impl PushSender for FcmClient {
    async fn send_data(
        &self,
        token: &str,
        data: &BTreeMap<String, String>,
    ) -> Result<(), PushError> {
        let access_token = self.access_token().await?;
        let request = SendRequest {
            message: FcmMessage::data_only(token, data),
        };

        let response = self
            .http
            .post(&self.send_url)
            .bearer_auth(access_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.forget_token();
        }
        if status == reqwest::StatusCode::NOT_FOUND || body.contains("UNREGISTERED") {
            return Err(PushError::Unregistered);
        }

        Err(PushError::Send {
            status: status.as_u16(),
            body,
        })
    }
}
