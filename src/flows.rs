//! High-level OAuth 1.0a flow orchestration.
//!
//! [`OAuthClient`] walks the three-legged flow (RFC 5849 §2):
//!
//! 1. [`OAuthClient::request_temporary_credentials`] obtains a temporary token pair.
//! 2. [`OAuthClient::build_authorization_url`] produces the resource-owner redirect.
//! 3. [`OAuthClient::exchange_for_access_credentials`] trades the verified temporary pair for
//!    access credentials.
//! 4. [`OAuthClient::sign_request`] / [`OAuthClient::access_protected_resource`] sign API calls.
//!
//! The client itself keeps no per-user state; [`session`] layers the same steps over a
//! [`CredentialStore`](crate::store::CredentialStore) keyed by a session identifier.

pub mod session;

mod access;
mod resource;
mod temporary;

pub use resource::*;
pub use session::*;

// self
use crate::{
	_prelude::*,
	auth::ConsumerCredentials,
	endpoint::{EndpointConfig, TransmissionMode},
	error::InvalidArgumentError,
	http::{TokenHttpClient, TransportRequest, TransportResponse},
	oauth::TransportErrorMapper,
	obs::FlowStep,
	sign::{SignedRequest, StampSource, SystemStampSource},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestOAuthClient = OAuthClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Drives the OAuth 1.0a three-legged flow against a single service.
///
/// The client owns the consumer credentials, the endpoint configuration, the HTTP transport, and
/// the nonce/timestamp source. Every field sits behind an `Arc` or is immutable, so clones are
/// cheap and one instance can serve concurrent requests.
pub struct OAuthClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Consumer key, key material, and signature method.
	pub consumer: ConsumerCredentials,
	/// Service endpoints and quirks.
	pub endpoints: EndpointConfig,
	stamps: Arc<dyn StampSource>,
}
impl<C, M> OAuthClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		consumer: ConsumerCredentials,
		endpoints: EndpointConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			consumer,
			endpoints,
			stamps: Arc::new(SystemStampSource),
		}
	}

	/// Replaces the nonce/timestamp source (for example with a
	/// [`FixedStampSource`](crate::sign::FixedStampSource) in tests).
	pub fn with_stamp_source(mut self, stamps: impl 'static + StampSource) -> Self {
		self.stamps = Arc::new(stamps);

		self
	}

	/// Sends `request` through the transport, mapping transport failures for `step`.
	pub(crate) async fn dispatch(
		&self,
		step: FlowStep,
		request: TransportRequest,
	) -> Result<TransportResponse> {
		self.http_client
			.execute(request)
			.await
			.map_err(|e| self.transport_mapper.map_transport_error(step, e))
	}

	/// Renders a signed request according to the configured transmission mode.
	pub(crate) fn transport_request(&self, signed: &SignedRequest) -> TransportRequest {
		let quirks = &self.endpoints.quirks;

		let request = match quirks.transmission {
			TransmissionMode::AuthorizationHeader =>
				TransportRequest::new(signed.method, signed.request_url(false))
					.with_header("Authorization", signed.authorization_header(quirks.realm.as_deref())),
			TransmissionMode::QueryString =>
				TransportRequest::new(signed.method, signed.request_url(true)),
		};

		// Request parameters of body methods travel form-encoded in either mode.
		match signed.form_body() {
			Some(body) => request.with_form_body(body),
			None => request,
		}
	}
}
#[cfg(feature = "reqwest")]
impl OAuthClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a new client backed by a default reqwest transport.
	///
	/// Prefer [`ClientConfig::build_client`](crate::config::ClientConfig::build_client) when the
	/// transport should apply a timeout and refuse redirects.
	pub fn new(consumer: ConsumerCredentials, endpoints: EndpointConfig) -> Self {
		Self::with_http_client(
			consumer,
			endpoints,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Clone for OAuthClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			consumer: self.consumer.clone(),
			endpoints: self.endpoints.clone(),
			stamps: self.stamps.clone(),
		}
	}
}
impl<C, M> Debug for OAuthClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthClient")
			.field("consumer", &self.consumer)
			.field("endpoints", &self.endpoints)
			.finish()
	}
}

pub(crate) fn ensure_token(kind: &'static str, token: &str) -> Result<()> {
	if token.trim().is_empty() {
		Err(InvalidArgumentError::EmptyToken { kind }.into())
	} else {
		Ok(())
	}
}
