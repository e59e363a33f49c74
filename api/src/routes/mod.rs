//! Endpoint handlers
//!
//! - `POST /send`: issue, resend or silently suppress a code
//! - `GET /validation/{phone}/{token}`: compare a submitted code

pub mod send;
pub mod validation;

pub use send::send;
pub use validation::validate;
