pub mod attestation;
pub mod pseudonym;
pub mod signatures;

pub use pseudonym::{Blake3Deriver, Caller, PseudonymDeriver, SecretKey};
