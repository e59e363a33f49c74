//! Application state and factory
//!
//! This module handles the initialization of the application state
//! and provides the factory for creating the Actix-web application.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use st_core::services::{
    CodeStoreTrait, IssuanceConfig, IssuanceService, NotifierTrait, TimeSource,
    VerificationService,
};
use st_shared::TokenConfig;

use crate::handlers::{json_error_handler, not_found};
use crate::middleware::SignatureAuth;
use crate::routes::{send, validate};

/// Application state that holds the engines
pub struct AppState<N: NotifierTrait, S: CodeStoreTrait> {
    pub issuance: Arc<IssuanceService<N, S>>,
    pub verification: Arc<VerificationService<S>>,
}

impl<N: NotifierTrait, S: CodeStoreTrait> AppState<N, S> {
    /// Wire both engines over one store
    pub fn new(notifier: Arc<N>, store: Arc<S>, token: &TokenConfig) -> Self {
        let issuance = IssuanceService::new(notifier, Arc::clone(&store), IssuanceConfig::from(token));
        let verification = VerificationService::new(store, token.token_length);

        Self {
            issuance: Arc::new(issuance),
            verification: Arc::new(verification),
        }
    }

    /// Same as [`AppState::new`] with an explicit clock for the issuance engine
    pub fn with_time_source(
        notifier: Arc<N>,
        store: Arc<S>,
        token: &TokenConfig,
        time_source: Arc<dyn TimeSource>,
    ) -> Self {
        let issuance = IssuanceService::new(notifier, Arc::clone(&store), IssuanceConfig::from(token))
            .with_time_source(time_source);
        let verification = VerificationService::new(store, token.token_length);

        Self {
            issuance: Arc::new(issuance),
            verification: Arc::new(verification),
        }
    }
}

/// Create and configure the application with all dependencies
///
/// `/send` and `/validation` sit behind the signature middleware; the health
/// check and the 404 fallback do not.
pub fn create_app<N, S>(
    app_state: web::Data<AppState<N, S>>,
    signature: SignatureAuth,
    json_limit: usize,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    N: NotifierTrait + 'static,
    S: CodeStoreTrait + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(
            web::JsonConfig::default()
                .limit(json_limit)
                .error_handler(json_error_handler),
        )
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::resource("/send")
                .wrap(signature.clone())
                .route(web::post().to(send::<N, S>)),
        )
        .service(
            web::resource("/validation/{phone}/{token}")
                .wrap(signature)
                .route(web::get().to(validate::<N, S>)),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "sms-token",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
