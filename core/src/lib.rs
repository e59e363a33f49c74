//! # SMS Token Core
//!
//! Domain layer and engines of the SMS token service: the verification
//! record, the signed-request authenticator, the issuance engine that
//! decides between fresh issuance, resend and suppression, and the
//! verification engine. Storage and SMS transport are reached through the
//! traits in [`services::traits`].

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
