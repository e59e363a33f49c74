use actix_web::{web, HttpResponse};
use validator::Validate;

use st_core::services::{CodeStoreTrait, NotifierTrait};
use st_shared::utils::mask_phone;

use crate::app::AppState;
use crate::dto::SendRequest;
use crate::handlers::{handle_domain_error, validation_error_response};

/// Handler for `POST /send`
///
/// # Request Body
///
/// ```json
/// {
///     "From": "Acme",
///     "To": "555-0100",
///     "Text": "Your verification code is "
/// }
/// ```
///
/// # Response
///
/// `200 OK` with an empty body whether the code was issued, resent or
/// suppressed, so callers cannot infer the throttle state.
pub async fn send<N, S>(
    state: web::Data<AppState<N, S>>,
    request: web::Json<SendRequest>,
) -> HttpResponse
where
    N: NotifierTrait + 'static,
    S: CodeStoreTrait + 'static,
{
    let request = request.into_inner();

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .issuance
        .request_send(&request.to, &request.from, &request.text)
        .await
    {
        Ok(outcome) => {
            tracing::debug!(
                recipient = %mask_phone(&request.to),
                outcome = ?outcome,
                "Send request handled"
            );
            HttpResponse::Ok().finish()
        }
        Err(e) => handle_domain_error(&e),
    }
}
