//! RFC 5849 request signing.
//!
//! `encode` builds the signature base string (§3.4.1) from the request method, the base string
//! URI, and the normalized parameter set. `method` turns that base string into an
//! `oauth_signature` with HMAC, RSA (PKCS#1 v1.5), or PLAINTEXT key material, `key` decodes RSA
//! private keys, `stamp` supplies nonces and timestamps, and `request` assembles the oauth_*
//! protocol parameters into a [`SignedRequest`].
//!
//! Everything here is free of I/O; the only impure inputs are the nonce and clock reads made by
//! [`SystemStampSource`].

pub mod encode;
pub mod key;
pub mod method;
pub mod request;
pub mod stamp;

pub use encode::*;
pub use key::*;
pub use method::*;
pub use request::*;
pub use stamp::*;

/// Protocol version sent in `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";
/// `oauth_callback` value used when no callback URL is configured (out-of-band).
pub const OUT_OF_BAND_CALLBACK: &str = "oob";
