//! Verification engine: checks a submitted code against the stored record

mod service;

pub use service::VerificationService;
