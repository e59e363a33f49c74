//! Request and response bodies

pub mod otp;

pub use otp::{SendRequest, ValidationResponse};
