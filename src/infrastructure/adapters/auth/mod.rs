//! Auth Adapters

mod http_token_verifier;

pub use http_token_verifier::{HttpTokenVerifier, HttpTokenVerifierConfig};
