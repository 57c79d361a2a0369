//! Authorization redirect (RFC 5849 §2.2) and token credential exchange (§2.3).

// self
use crate::{
	_prelude::*,
	auth::{AccessCredentials, Secret, TemporaryCredentials},
	error::InvalidArgumentError,
	flows::{self, OAuthClient},
	http::TokenHttpClient,
	oauth::{self, TransportErrorMapper},
	obs::{self, FlowStep},
	sign::{self, SignatureInput},
};

impl<C, M> OAuthClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the URL the resource owner must visit to approve `temporary_token`.
	///
	/// Pure: the same token always yields the same URL, and the token is encoded exactly once.
	pub fn build_authorization_url(&self, temporary_token: &str) -> Url {
		self.endpoints.authorization_url(temporary_token)
	}

	/// Exchanges verified temporary credentials for access credentials.
	///
	/// A blank `verifier` or an empty temporary token fails with
	/// [`InvalidArgumentError`] before any network I/O. Otherwise the request carries
	/// `oauth_token` and `oauth_verifier`, is signed with the temporary token secret, and every
	/// response parameter besides the token pair is kept in [`AccessCredentials::extra`].
	pub async fn exchange_for_access_credentials(
		&self,
		temporary: &TemporaryCredentials,
		verifier: &str,
	) -> Result<AccessCredentials> {
		const STEP: FlowStep = FlowStep::AccessCredentials;

		obs::observe(STEP, "exchange_for_access_credentials", async move {
			if verifier.trim().is_empty() {
				return Err(InvalidArgumentError::MissingVerifier.into());
			}

			flows::ensure_token("temporary", &temporary.token)?;

			let url = &self.endpoints.access_token_url;
			let protocol_params = [("oauth_verifier", verifier)];
			let input =
				SignatureInput::new(self.endpoints.quirks.token_request_method, url, &[])
					.with_token(temporary.as_token_ref())
					.with_protocol_params(&protocol_params);
			let signed = sign::sign(&self.consumer, input, self.stamps.stamp())?;
			let response = self.dispatch(STEP, self.transport_request(&signed)).await?;

			oauth::ensure_status(STEP, &response)?;

			let parsed = oauth::parse_credential_response(STEP, &response)?;

			Ok(AccessCredentials {
				token: parsed.token,
				token_secret: Secret::new(parsed.token_secret),
				extra: parsed.extra,
			})
		})
		.await
	}
}
