//! Temporary credential request (RFC 5849 §2.1).

// self
use crate::{
	_prelude::*,
	auth::{Secret, TemporaryCredentials},
	error::ProtocolError,
	flows::OAuthClient,
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
	/// Obtains temporary credentials from the request-token endpoint.
	///
	/// The request is signed with the consumer credentials only and announces the configured
	/// callback (or `oob`). Any non-200 answer, a body lacking `oauth_token` /
	/// `oauth_token_secret`, or (when the service quirks require it) a missing
	/// `oauth_callback_confirmed=true` yields [`ProtocolError`]; nothing partially populated is
	/// ever returned.
	pub async fn request_temporary_credentials(&self) -> Result<TemporaryCredentials> {
		const STEP: FlowStep = FlowStep::TemporaryCredentials;

		obs::observe(STEP, "request_temporary_credentials", async move {
			let url = &self.endpoints.request_token_url;
			let protocol_params = [("oauth_callback", self.endpoints.callback_value())];
			let input =
				SignatureInput::new(self.endpoints.quirks.token_request_method, url, &[])
					.with_protocol_params(&protocol_params);
			let signed = sign::sign(&self.consumer, input, self.stamps.stamp())?;
			let response = self.dispatch(STEP, self.transport_request(&signed)).await?;

			oauth::ensure_status(STEP, &response)?;

			let parsed = oauth::parse_credential_response(STEP, &response)?;

			if self.endpoints.quirks.require_callback_confirmed && !parsed.callback_confirmed {
				return Err(ProtocolError::CallbackNotConfirmed { step: STEP }.into());
			}

			Ok(TemporaryCredentials {
				token: parsed.token,
				token_secret: Secret::new(parsed.token_secret),
				callback_confirmed: parsed.callback_confirmed,
			})
		})
		.await
	}
}
