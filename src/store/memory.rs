//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::SessionId,
	store::{self, CredentialStore, SessionCredentials, StoreFuture, TakeOutcome},
};

type StoreMap = Arc<RwLock<HashMap<SessionId, SessionCredentials>>>;

/// Thread-safe storage backend that keeps session credentials in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of sessions currently holding credentials.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no session holds credentials.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl CredentialStore for MemoryStore {
	fn load<'a>(&'a self, session: &'a SessionId) -> StoreFuture<'a, Option<SessionCredentials>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(session).cloned()) })
	}

	fn save<'a>(
		&'a self,
		session: &'a SessionId,
		credentials: SessionCredentials,
	) -> StoreFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().insert(session.clone(), credentials);

			Ok(())
		})
	}

	fn take_pending<'a>(
		&'a self,
		session: &'a SessionId,
		expected_token: &'a str,
	) -> StoreFuture<'a, TakeOutcome> {
		let map = self.0.clone();

		Box::pin(async move { Ok(store::take_matching(&mut map.write(), session, expected_token)) })
	}

	fn clear<'a>(
		&'a self,
		session: &'a SessionId,
	) -> StoreFuture<'a, Option<SessionCredentials>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.write().remove(session)) })
	}
}
