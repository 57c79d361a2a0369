//! Nonce and timestamp sources for `oauth_nonce` / `oauth_timestamp`.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::_prelude::*;

const NONCE_LEN: usize = 32;

/// Nonce + Unix timestamp pair attached to a single signed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestStamp {
	/// Random value unique to the request.
	pub nonce: String,
	/// Seconds since the Unix epoch.
	pub timestamp: i64,
}

/// Source of [`RequestStamp`] values.
///
/// The client asks for a fresh stamp on every signature, so implementations must never hand out
/// the same nonce twice within one timestamp outside of tests.
pub trait StampSource
where
	Self: Send + Sync,
{
	/// Produces the stamp for the next request.
	fn stamp(&self) -> RequestStamp;
}

/// Default stamp source: 32 random alphanumeric characters and the system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemStampSource;
impl StampSource for SystemStampSource {
	fn stamp(&self) -> RequestStamp {
		let nonce = rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect();

		RequestStamp { nonce, timestamp: OffsetDateTime::now_utc().unix_timestamp() }
	}
}

/// Stamp source that always returns the same value; makes signatures reproducible.
#[derive(Clone, Debug)]
pub struct FixedStampSource(pub RequestStamp);
impl FixedStampSource {
	/// Creates a source that always yields `nonce` and `timestamp`.
	pub fn new(nonce: impl Into<String>, timestamp: i64) -> Self {
		Self(RequestStamp { nonce: nonce.into(), timestamp })
	}
}
impl StampSource for FixedStampSource {
	fn stamp(&self) -> RequestStamp {
		self.0.clone()
	}
}
