//! Storage contracts and built-in store implementations for per-session OAuth credentials.
//!
//! A [`CredentialStore`] replaces the implicit web-session dictionary: the application issues a
//! [`SessionId`] (typically in a cookie) and the flow steps read and write that session's
//! [`SessionCredentials`] through the store.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{AccessCredentials, SessionId, TemporaryCredentials},
};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for session credentials.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Fetches the credentials held for `session`, if any.
	fn load<'a>(&'a self, session: &'a SessionId) -> StoreFuture<'a, Option<SessionCredentials>>;

	/// Persists or replaces the credentials held for `session`.
	fn save<'a>(
		&'a self,
		session: &'a SessionId,
		credentials: SessionCredentials,
	) -> StoreFuture<'a, ()>;

	/// Atomically removes and returns the pending temporary credentials for `session` when their
	/// token equals `expected_token`.
	///
	/// A mismatching token leaves the pending entry untouched, and two concurrent callers can
	/// never both observe [`TakeOutcome::Taken`] for the same entry.
	fn take_pending<'a>(
		&'a self,
		session: &'a SessionId,
		expected_token: &'a str,
	) -> StoreFuture<'a, TakeOutcome>;

	/// Removes everything held for `session`, returning the previous entry.
	fn clear<'a>(
		&'a self,
		session: &'a SessionId,
	) -> StoreFuture<'a, Option<SessionCredentials>>;
}

/// Credentials a session holds at a given point of the flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionCredentials {
	/// Temporary credentials awaiting the resource owner's approval.
	Pending(TemporaryCredentials),
	/// Access credentials usable for signing API calls.
	Authorized(AccessCredentials),
}
impl SessionCredentials {
	/// Returns the pending temporary credentials, if that is the current state.
	pub fn pending(&self) -> Option<&TemporaryCredentials> {
		match self {
			Self::Pending(temporary) => Some(temporary),
			Self::Authorized(_) => None,
		}
	}

	/// Returns the access credentials, if that is the current state.
	pub fn authorized(&self) -> Option<&AccessCredentials> {
		match self {
			Self::Pending(_) => None,
			Self::Authorized(access) => Some(access),
		}
	}
}

/// Result of a [`CredentialStore::take_pending`] attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TakeOutcome {
	/// The pending token matched and the entry was removed.
	Taken(TemporaryCredentials),
	/// The session holds pending credentials for a different token.
	TokenMismatch,
	/// The session holds no pending credentials.
	Missing,
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Compare-and-take shared by the built-in stores; callers must hold the write lock.
pub(crate) fn take_matching(
	entries: &mut HashMap<SessionId, SessionCredentials>,
	session: &SessionId,
	expected_token: &str,
) -> TakeOutcome {
	match entries.get(session) {
		Some(SessionCredentials::Pending(temporary)) if temporary.token == expected_token => (),
		Some(SessionCredentials::Pending(_)) => return TakeOutcome::TokenMismatch,
		_ => return TakeOutcome::Missing,
	}

	match entries.remove(session) {
		Some(SessionCredentials::Pending(temporary)) => TakeOutcome::Taken(temporary),
		_ => TakeOutcome::Missing,
	}
}
