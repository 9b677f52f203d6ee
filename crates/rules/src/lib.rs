pub mod verifier;

pub use verifier::verify;
