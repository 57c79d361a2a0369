//! Session-level orchestration: the three-legged flow persisted in a [`CredentialStore`].
//!
//! Web applications typically expose four routes: one that starts the flow
//! ([`OAuthClient::begin_authorization`]), the callback the service redirects back to
//! ([`OAuthClient::complete_authorization`]), pages that need the signed-in state
//! ([`OAuthClient::session_state`], [`OAuthClient::access_credentials`]), and a sign-out
//! ([`OAuthClient::reset`]). All of them key the store by a server-issued [`SessionId`].

// self
use crate::{
	_prelude::*,
	auth::{AccessCredentials, SessionId},
	error::InvalidArgumentError,
	flows::{self, OAuthClient},
	http::TokenHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, FlowStep},
	store::{CredentialStore, SessionCredentials, TakeOutcome},
};

/// Where a session currently stands in the three-legged flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowState {
	/// No credentials are held.
	Unauthenticated,
	/// Temporary credentials were issued; the resource owner has yet to come back with a
	/// verifier.
	TemporaryCredentialsObtained,
	/// Access credentials are held and requests can be signed.
	Authenticated,
}

/// Parameters the service appends to the callback URL (RFC 5849 §2.2).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
	/// Temporary token being authorized (`oauth_token`).
	pub token: String,
	/// Verification code (`oauth_verifier`); empty when the service sent none.
	pub verifier: String,
}
impl CallbackParams {
	/// Creates callback parameters from already extracted values.
	pub fn new(token: impl Into<String>, verifier: impl Into<String>) -> Self {
		Self { token: token.into(), verifier: verifier.into() }
	}

	/// Parses a raw query string such as `oauth_token=tmp123&oauth_verifier=abc`.
	///
	/// Missing parameters are left empty; [`OAuthClient::complete_authorization`] rejects them.
	pub fn from_query(query: &str) -> Self {
		let mut params = Self::default();

		for (name, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
		{
			match name.as_ref() {
				"oauth_token" if params.token.is_empty() => params.token = value.into_owned(),
				"oauth_verifier" if params.verifier.is_empty() =>
					params.verifier = value.into_owned(),
				_ => (),
			}
		}

		params
	}

	/// Parses the query string of a full callback URL.
	pub fn from_url(url: &Url) -> Self {
		Self::from_query(url.query().unwrap_or_default())
	}
}

impl<C, M> OAuthClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Requests temporary credentials, stores them as pending for `session`, and returns the
	/// URL to redirect the resource owner to.
	///
	/// Any credentials the session held before are replaced.
	pub async fn begin_authorization<S>(&self, store: &S, session: &SessionId) -> Result<Url>
	where
		S: ?Sized + CredentialStore,
	{
		obs::observe(FlowStep::Authorization, "begin_authorization", async move {
			let temporary = self.request_temporary_credentials().await?;
			let url = self.build_authorization_url(&temporary.token);

			store.save(session, SessionCredentials::Pending(temporary)).await?;

			Ok(url)
		})
		.await
	}

	/// Completes the flow from the service's callback.
	///
	/// The verifier is validated before touching the store or the network. The pending
	/// temporary credentials are then taken atomically: a callback whose `oauth_token` differs
	/// from the pending token fails with [`InvalidArgumentError::TokenMismatch`] and leaves the
	/// pending entry in place. A retryable exchange failure puts the pending entry back so the
	/// same callback can be replayed; any other failure consumes it, and the flow has to start
	/// over with [`OAuthClient::begin_authorization`].
	pub async fn complete_authorization<S>(
		&self,
		store: &S,
		session: &SessionId,
		callback: &CallbackParams,
	) -> Result<AccessCredentials>
	where
		S: ?Sized + CredentialStore,
	{
		if callback.verifier.trim().is_empty() {
			return Err(InvalidArgumentError::MissingVerifier.into());
		}

		flows::ensure_token("callback", &callback.token)?;

		let temporary = match store.take_pending(session, &callback.token).await? {
			TakeOutcome::Taken(temporary) => temporary,
			TakeOutcome::TokenMismatch => return Err(InvalidArgumentError::TokenMismatch.into()),
			TakeOutcome::Missing => return Err(InvalidArgumentError::NoPendingAuthorization.into()),
		};
		let access = match self.exchange_for_access_credentials(&temporary, &callback.verifier).await
		{
			Ok(access) => access,
			Err(e) if e.is_retryable() => {
				store.save(session, SessionCredentials::Pending(temporary)).await?;

				return Err(e);
			},
			Err(e) => return Err(e),
		};

		store.save(session, SessionCredentials::Authorized(access.clone())).await?;

		Ok(access)
	}

	/// Reports the flow state of `session`.
	pub async fn session_state<S>(&self, store: &S, session: &SessionId) -> Result<FlowState>
	where
		S: ?Sized + CredentialStore,
	{
		Ok(match store.load(session).await? {
			None => FlowState::Unauthenticated,
			Some(SessionCredentials::Pending(_)) => FlowState::TemporaryCredentialsObtained,
			Some(SessionCredentials::Authorized(_)) => FlowState::Authenticated,
		})
	}

	/// Returns the access credentials held for `session`, if the flow completed.
	pub async fn access_credentials<S>(
		&self,
		store: &S,
		session: &SessionId,
	) -> Result<Option<AccessCredentials>>
	where
		S: ?Sized + CredentialStore,
	{
		Ok(store.load(session).await?.and_then(|credentials| credentials.authorized().cloned()))
	}

	/// Discards every credential held for `session`, returning it to
	/// [`FlowState::Unauthenticated`].
	pub async fn reset<S>(&self, store: &S, session: &SessionId) -> Result<()>
	where
		S: ?Sized + CredentialStore,
	{
		#[cfg(feature = "tracing")]
		::tracing::debug!("Resetting OAuth session credentials.");

		store.clear(session).await?;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn callback_params_parse_query_strings() {
		let params = CallbackParams::from_query("?oauth_token=tmp123&oauth_verifier=a%2Fb");

		assert_eq!(params, CallbackParams::new("tmp123", "a/b"));

		let url = Url::parse("http://localhost:8181/callback?oauth_token=tmp123")
			.expect("Callback URL fixture should parse.");
		let params = CallbackParams::from_url(&url);

		assert_eq!(params.token, "tmp123");
		assert!(params.verifier.is_empty());
		assert_eq!(CallbackParams::from_query(""), CallbackParams::default());
	}
}
