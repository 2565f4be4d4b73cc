//! Session identity extracted from the request.
//!
//! The external auth provider issues HS256-signed JWTs. Mobile clients send
//! them as `Authorization: Bearer …`; the dashboard keeps the same token in the
//! identity cookie.

use std::future::{Ready, ready};

use actix_session::SessionExt;
use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, web};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::types::{TypeConstraintError, UserId};
use crate::models::config::ServerConfig;

/// Session key under which the identity middleware keeps the token. Matches
/// the key the auth provider writes into the shared cookie.
pub const IDENTITY_KEY: &str = "actix_identity.user_id";

/// Claims carried by the session token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Parses the `sub` claim as the user's identifier.
    pub fn user_id(&self) -> Result<UserId, TypeConstraintError> {
        self.sub.parse()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Verifies the token signature and expiry.
    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        let data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }
}

/// Returns the raw session token from the bearer header or identity cookie.
///
/// The cookie is read through the session state, which is empty rather than
/// missing when no session middleware runs.
pub fn session_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    bearer.or_else(|| req.get_session().get::<String>(IDENTITY_KEY).ok().flatten())
}

fn unauthorized(reason: &'static str) -> actix_web::Error {
    InternalError::from_response(
        reason,
        HttpResponse::Unauthorized().json(json!({"error": "로그인이 필요합니다."})),
    )
    .into()
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            log::error!("ServerConfig is not registered as app data");
            return ready(Err(unauthorized("missing configuration")));
        };

        let Some(token) = session_token(req) else {
            return ready(Err(unauthorized("missing session token")));
        };

        let result = AuthenticatedUser::from_jwt(&token, &config.secret).map_err(|err| {
            log::warn!("Rejected session token: {err}");
            unauthorized("invalid session token")
        });
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn user(exp: usize) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "6f9619ff-8b86-d011-b42d-00cf4fc964ff".to_string(),
            email: "sales@example.com".to_string(),
            name: Some("Sales".to_string()),
            roles: vec!["crm".to_string()],
            exp,
        }
    }

    fn in_one_hour() -> usize {
        (Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn token_round_trips_with_same_secret() {
        let original = user(in_one_hour());
        let token = original.to_jwt("secret").unwrap();
        let decoded = AuthenticatedUser::from_jwt(&token, "secret").unwrap();
        assert_eq!(decoded, original);
        assert!(decoded.has_role("crm"));
        assert!(!decoded.has_role("crm_admin"));
        assert!(decoded.user_id().is_ok());
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let token = user(in_one_hour()).to_jwt("secret").unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = user(1).to_jwt("secret").unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, "secret").is_err());
    }

    #[test]
    fn bearer_header_is_preferred() {
        let req = actix_web::test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(session_token(&req).as_deref(), Some("abc.def.ghi"));

        let req = actix_web::test::TestRequest::default().to_http_request();
        assert_eq!(session_token(&req), None);
    }

    #[test]
    fn identity_cookie_is_used_without_bearer() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        req.get_session()
            .insert(IDENTITY_KEY, "cookie.jwt.token")
            .unwrap();
        assert_eq!(session_token(&req).as_deref(), Some("cookie.jwt.token"));

        let req = actix_web::test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer header.jwt.token"))
            .to_http_request();
        req.get_session()
            .insert(IDENTITY_KEY, "cookie.jwt.token")
            .unwrap();
        assert_eq!(session_token(&req).as_deref(), Some("header.jwt.token"));
    }
}
