use actix_web::{web, HttpResponse};

use st_core::services::{CodeStoreTrait, NotifierTrait};

use crate::app::AppState;
use crate::dto::ValidationResponse;
use crate::handlers::handle_domain_error;

/// Handler for `GET /validation/{phone}/{token}`
///
/// Responds `{"result": true}` when `token` matches the active code for
/// `phone`. A token of the wrong length is a 400, never `false`.
pub async fn validate<N, S>(
    state: web::Data<AppState<N, S>>,
    path: web::Path<(String, String)>,
) -> HttpResponse
where
    N: NotifierTrait + 'static,
    S: CodeStoreTrait + 'static,
{
    let (phone, token) = path.into_inner();

    match state.verification.verify(&phone, &token).await {
        Ok(result) => HttpResponse::Ok().json(ValidationResponse { result }),
        Err(e) => handle_domain_error(&e),
    }
}
