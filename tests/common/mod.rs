//! Fixtures shared by the integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use parking_lot::Mutex;
use url::Url;
// self
use oauth1_broker::{
	auth::ConsumerCredentials,
	endpoint::{EndpointConfig, TransmissionMode},
	flows::OAuthClient,
	http::{HttpFuture, TokenHttpClient, TransportRequest, TransportResponse},
	oauth::NetworkErrorMapper,
	sign::SignatureMethod,
};
#[cfg(feature = "reqwest")]
use oauth1_broker::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper, reqwest};

pub const CONSUMER_KEY: &str = "1234567890";
pub const CALLBACK_URL: &str = "http://localhost:8181/callback";
pub const RSA_PKCS8_PEM: &str = include_str!("../fixtures/consumer_pkcs8.pem");

#[cfg(feature = "reqwest")]
pub type MockClient = OAuthClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;
pub type RecordingClient = OAuthClient<RecordingTransport, NetworkErrorMapper<TransportFailure>>;

pub fn url(value: &str) -> Url {
	Url::parse(value).expect("URL fixture should parse.")
}

/// RSA-SHA1 consumer with an empty consumer secret, as Atlassian application links use.
pub fn rsa_consumer() -> ConsumerCredentials {
	ConsumerCredentials::rsa(CONSUMER_KEY, RSA_PKCS8_PEM, SignatureMethod::RsaSha1)
		.expect("RSA consumer fixture should build.")
}

pub fn endpoints(base_url: &str) -> EndpointConfig {
	EndpointConfig::atlassian(url(base_url))
		.callback_url(url(CALLBACK_URL))
		.transmission(TransmissionMode::AuthorizationHeader)
		.build()
		.expect("Endpoint configuration fixture should build.")
}

#[cfg(feature = "reqwest")]
/// Client talking to an `httpmock` server through reqwest without following redirects.
pub fn mock_client(consumer: ConsumerCredentials, base_url: &str) -> MockClient {
	let client = reqwest::Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.redirect(reqwest::redirect::Policy::none())
		.build()
		.expect("Reqwest client fixture should build.");

	OAuthClient::with_http_client(
		consumer,
		endpoints(base_url),
		ReqwestHttpClient::with_client(client),
		Arc::new(ReqwestTransportErrorMapper),
	)
}

/// Error produced by [`RecordingTransport`] when no canned response is left.
#[derive(Debug, thiserror::Error)]
#[error("Recording transport ran out of canned responses.")]
pub struct TransportFailure;

/// In-process transport that records every request and replays canned responses in order.
#[derive(Debug, Default)]
pub struct RecordingTransport {
	requests: Mutex<Vec<TransportRequest>>,
	responses: Mutex<Vec<TransportResponse>>,
}
impl RecordingTransport {
	pub fn with_responses(responses: impl IntoIterator<Item = TransportResponse>) -> Self {
		let mut responses = responses.into_iter().collect::<Vec<_>>();

		responses.reverse();

		Self { requests: Mutex::default(), responses: Mutex::new(responses) }
	}

	/// Queues `response` behind every canned response still pending.
	pub fn push_response(&self, response: TransportResponse) {
		self.responses.lock().insert(0, response);
	}

	pub fn requests(&self) -> Vec<TransportRequest> {
		self.requests.lock().clone()
	}
}
impl TokenHttpClient for RecordingTransport {
	type TransportError = TransportFailure;

	fn execute(&self, request: TransportRequest) -> HttpFuture<'_, Self::TransportError> {
		self.requests.lock().push(request);

		let next = self.responses.lock().pop();

		Box::pin(async move { next.ok_or(TransportFailure) })
	}
}

pub fn recording_client(
	consumer: ConsumerCredentials,
	endpoints: EndpointConfig,
	transport: Arc<RecordingTransport>,
) -> RecordingClient {
	OAuthClient::with_http_client(consumer, endpoints, transport, NetworkErrorMapper::new())
}

/// Splits an `Authorization: OAuth ...` header into decoded name/value pairs.
pub fn parse_authorization_header(header: &str) -> Vec<(String, String)> {
	header
		.strip_prefix("OAuth ")
		.expect("Header should use the OAuth scheme.")
		.split(", ")
		.map(|pair| {
			let (name, value) = pair.split_once('=').expect("Header pair should contain `=`.");
			let value = value.trim_matches('"');

			(
				urlencoding::decode(name).expect("Name should decode.").into_owned(),
				urlencoding::decode(value).expect("Value should decode.").into_owned(),
			)
		})
		.collect()
}

pub fn header_param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
	params.iter().find(|(candidate, _)| candidate == name).map(|(_, value)| value.as_str())
}
