//! Signed-request middleware for protecting API endpoints
//!
//! Reads the configured signature header (`"<unix_timestamp>,<hex digest>"`),
//! checks it with the [`RequestAuthenticator`] and short-circuits with a 401
//! [`ErrorResponse`](st_shared::ErrorResponse) before the handler runs.

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use st_core::errors::DomainError;
use st_core::services::{RequestAuthenticator, SystemTimeSource, TimeSource};
use st_shared::SignatureConfig;

use crate::handlers::handle_domain_error;

/// Signature authentication middleware factory
#[derive(Clone)]
pub struct SignatureAuth {
    authenticator: Arc<RequestAuthenticator>,
    header_name: Arc<str>,
    time_source: Arc<dyn TimeSource>,
}

impl SignatureAuth {
    pub fn new(config: &SignatureConfig) -> Self {
        Self {
            authenticator: Arc::new(RequestAuthenticator::new(config)),
            header_name: Arc::from(config.header_name.as_str()),
            time_source: Arc::new(SystemTimeSource),
        }
    }

    /// Replace the clock used to judge timestamp freshness
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for SignatureAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type InitError = ();
    type Transform = SignatureAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SignatureAuthMiddleware {
            service: Rc::new(service),
            auth: self.clone(),
        }))
    }
}

/// Signature authentication middleware service
pub struct SignatureAuthMiddleware<S> {
    service: Rc<S>,
    auth: SignatureAuth,
}

impl<S, B> Service<ServiceRequest> for SignatureAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // A header that is not valid UTF-8 is treated as malformed
        let header = req
            .headers()
            .get(&*self.auth.header_name)
            .map(|value| value.to_str().unwrap_or_default());
        let now = self.auth.time_source.now().timestamp();

        match self.auth.authenticator.verify(header, now) {
            Ok(timestamp) => {
                tracing::debug!(timestamp, path = %req.path(), "Request signature accepted");
                let service = Rc::clone(&self.service);
                Box::pin(async move {
                    let res = service.call(req).await?;
                    Ok(res.map_into_boxed_body())
                })
            }
            Err(e) => {
                tracing::warn!(
                    reason = e.reason(),
                    path = %req.path(),
                    event = "signature_rejected",
                    "Rejected unsigned or invalid request"
                );
                let response = handle_domain_error(&DomainError::Unauthorized(e));
                Box::pin(async move { Ok(req.into_response(response)) })
            }
        }
    }
}
