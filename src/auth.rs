//! Credential types exchanged during the three-legged flow plus validated identifiers.

pub mod consumer;
pub mod id;
pub mod secret;
pub mod token;

pub use consumer::*;
pub use id::*;
pub use secret::*;
pub use token::*;
