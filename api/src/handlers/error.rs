//! Mapping of domain failures to HTTP responses
//!
//! Every error body is an [`ErrorResponse`]. Internal details are logged and
//! never returned to the caller.

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse,
};
use st_core::errors::DomainError;
use st_shared::{error_codes, ErrorResponse};
use validator::ValidationErrors;

/// Convert a domain error into its HTTP response
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let (status, code, message) = match error {
        DomainError::Validation { message } => {
            (StatusCode::BAD_REQUEST, error_codes::BAD_REQUEST, message.clone())
        }
        DomainError::InvalidCodeLength { expected, .. } => (
            StatusCode::BAD_REQUEST,
            error_codes::VALIDATION_ERROR,
            format!("Verification code must be {} characters long", expected),
        ),
        DomainError::Unauthorized(_) => (
            StatusCode::UNAUTHORIZED,
            error_codes::UNAUTHORIZED,
            "Request signature is missing or invalid".to_string(),
        ),
        DomainError::CodeNotFound => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::VERIFICATION_CODE_EXPIRED,
            "No verification code is active for this recipient".to_string(),
        ),
        DomainError::Store { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::CACHE_ERROR,
            "Verification code storage is unavailable".to_string(),
        ),
        DomainError::Notifier { .. } | DomainError::NotifierTimeout { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::SMS_ERROR,
            "Failed to send SMS".to_string(),
        ),
        DomainError::Decode { .. }
        | DomainError::CodeGeneration { .. }
        | DomainError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "An internal error occurred".to_string(),
        ),
    };

    if error.is_client_error() {
        tracing::warn!(error = %error, status = status.as_u16(), "Request rejected");
    } else {
        tracing::error!(error = %error, status = status.as_u16(), "Request failed");
    }

    HttpResponse::build(status).json(ErrorResponse::new(code, message))
}

/// 400 response listing the fields that failed validation
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data");

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field, messages);
    }

    tracing::warn!(errors = ?errors.field_errors().keys().collect::<Vec<_>>(), "Request validation failed");
    HttpResponse::BadRequest().json(response)
}

/// Turns JSON extractor failures (syntax, content type, size) into 400s
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = %req.path(), error = %err, "Rejected request body");

    let response = HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::BAD_REQUEST,
        format!("Invalid request body: {}", err),
    ));
    InternalError::from_response(err, response).into()
}

/// Default 404 handler
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
