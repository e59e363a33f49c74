//! Business services containing the issuance and verification engines.

pub mod clock;
pub mod issuance;
pub mod signature;
pub mod traits;
pub mod verification;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use clock::{ManualTimeSource, SystemTimeSource, TimeSource};
pub use issuance::{DispatchOutcome, IssuanceConfig, IssuanceService};
pub use signature::RequestAuthenticator;
pub use traits::{CodeStoreTrait, Expiry, NotifierTrait};
pub use verification::VerificationService;
