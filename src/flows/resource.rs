//! Signing and dispatching authenticated requests against protected resources.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::AccessCredentials,
	error::ProtocolError,
	flows::{self, OAuthClient},
	http::TokenHttpClient,
	oauth::{self, TransportErrorMapper},
	obs::{self, FlowStep},
	sign::{self, HttpMethod, SignatureInput, SignedRequest},
};

/// Successful response from a protected resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceResponse {
	/// HTTP status code (always 2xx).
	pub status: u16,
	/// Content-Type header, when present.
	pub content_type: Option<String>,
	/// Response body.
	pub body: String,
}
impl ResourceResponse {
	/// Decodes the body as JSON, reporting the offending path on failure.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_str(&self.body);

		serde_path_to_error::deserialize(&mut de).map_err(|source| {
			ProtocolError::MalformedJson { step: FlowStep::ProtectedResource, source }.into()
		})
	}
}

impl<C, M> OAuthClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Signs a request on behalf of the resource owner holding `credentials`.
	///
	/// `url` may carry query parameters; they are signed alongside `params`. Each call draws a
	/// fresh nonce and timestamp. No I/O happens here.
	pub fn sign_request(
		&self,
		method: HttpMethod,
		url: &Url,
		params: &[(String, String)],
		credentials: &AccessCredentials,
	) -> Result<SignedRequest> {
		flows::ensure_token("access", &credentials.token)?;

		let input =
			SignatureInput::new(method, url, params).with_token(credentials.as_token_ref());

		Ok(sign::sign(&self.consumer, input, self.stamps.stamp())?)
	}

	/// Sends an already signed request. Non-2xx answers fail with [`ProtocolError`].
	pub async fn send_signed_request(&self, signed: &SignedRequest) -> Result<ResourceResponse> {
		const STEP: FlowStep = FlowStep::ProtectedResource;

		obs::observe(STEP, "send_signed_request", async move {
			let response = self.dispatch(STEP, self.transport_request(signed)).await?;

			oauth::ensure_status(STEP, &response)?;

			Ok(ResourceResponse {
				status: response.status,
				content_type: response.content_type,
				body: response.body,
			})
		})
		.await
	}

	/// Signs and sends a request in one call.
	pub async fn access_protected_resource(
		&self,
		method: HttpMethod,
		url: &Url,
		params: &[(String, String)],
		credentials: &AccessCredentials,
	) -> Result<ResourceResponse> {
		let signed = self.sign_request(method, url, params, credentials)?;

		self.send_signed_request(&signed).await
	}
}
