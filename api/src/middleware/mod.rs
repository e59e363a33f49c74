pub mod signature;

pub use signature::SignatureAuth;
