//! Request audit trail.
//!
//! [`AccessLog`] records every request after the response is produced. The
//! database write runs on the blocking pool and is never awaited, so a slow or
//! failing audit store does not affect the response.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;

use crate::domain::access_log::NewAccessLog;
use crate::domain::types::UserId;
use crate::models::auth::{AuthenticatedUser, session_token};
use crate::repository::AccessLogWriter;

/// Middleware factory writing one access-log row per request.
#[derive(Clone)]
pub struct AccessLog<R> {
    repo: R,
    secret: Arc<str>,
}

impl<R> AccessLog<R> {
    /// `secret` verifies session tokens so the row can carry the user id.
    pub fn new(repo: R, secret: &str) -> Self {
        Self {
            repo,
            secret: Arc::from(secret),
        }
    }
}

impl<S, B, R> Transform<S, ServiceRequest> for AccessLog<R>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    R: AccessLogWriter + Clone + Send + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessLogService<S, R>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessLogService {
            service,
            repo: self.repo.clone(),
            secret: self.secret.clone(),
        }))
    }
}

pub struct AccessLogService<S, R> {
    service: S,
    repo: R,
    secret: Arc<str>,
}

impl<S, R> AccessLogService<S, R> {
    fn user_id(&self, req: &ServiceRequest) -> Option<UserId> {
        let token = session_token(req.request())?;
        AuthenticatedUser::from_jwt(&token, &self.secret)
            .ok()?
            .user_id()
            .ok()
    }
}

impl<S, B, R> Service<ServiceRequest> for AccessLogService<S, R>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    R: AccessLogWriter + Clone + Send + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let mut entry = NewAccessLog {
            user_id: self.user_id(&req),
            method: req.method().to_string(),
            path: req.path().to_string(),
            status: 0,
            ip: req.connection_info().realip_remote_addr().map(str::to_string),
            user_agent: req
                .headers()
                .get(header::USER_AGENT)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
        };
        let repo = self.repo.clone();
        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            entry.status = i32::from(status.as_u16());

            actix_web::rt::task::spawn_blocking(move || {
                if let Err(err) = repo.create_access_log(&entry) {
                    log::warn!(
                        "Failed to record access log for {} {}: {err}",
                        entry.method,
                        entry.path
                    );
                }
            });

            result
        })
    }
}
