//! Public extension contracts for signing requests built by foreign HTTP clients.
//!
//! [`RequestSignerExt`] lets callers keep their own request builders and only ask the crate for
//! the OAuth 1.0a `Authorization` header. With the `reqwest` feature enabled,
//! [`OAuthClient`](crate::flows::OAuthClient) implements it for [`reqwest::Request`].

pub mod request_signer;

pub use request_signer::*;
