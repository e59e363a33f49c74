//! Issuance engine for SMS verification codes
//!
//! Decides per send request whether to mint a fresh code, resend the code
//! already on record, or suppress the request inside the resend window.
//! Store slots are claimed with atomic conditional writes before dispatch,
//! so concurrent sends for one recipient dispatch at most once.

mod config;
mod service;

pub use config::IssuanceConfig;
pub use service::{DispatchOutcome, IssuanceService};
