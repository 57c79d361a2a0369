//! Demonstrates plugging a non-reqwest transport and error mapper into [`OAuthClient`].
//!
//! 1. Implement [`TokenHttpClient`] for the transport; it only reports failures that prevented a
//!    response from arriving.
//! 2. Provide a [`TransportErrorMapper`] that turns the transport's own error type into the
//!    crate's [`Error`], deciding which failures are worth retrying.
//! 3. Pass both to [`OAuthClient::with_http_client`] and run the three-legged flow as usual.

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
};
// crates.io
use color_eyre::Result;
use url::Url;
// self
use oauth1_broker::{
	auth::ConsumerCredentials,
	endpoint::EndpointConfig,
	error::{Error, TransportError},
	flows::OAuthClient,
	http::{HttpFuture, TokenHttpClient, TransportRequest, TransportResponse},
	oauth::TransportErrorMapper,
	obs::FlowStep,
	sign::HttpMethod,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let consumer = ConsumerCredentials::hmac_sha1("demo-consumer", "demo-secret")?;
	let endpoints = EndpointConfig::atlassian(Url::parse("https://jira.example.com/")?)
		.callback_url(Url::parse("http://localhost:8181/callback")?)
		.build()?;
	let mapper = Arc::new(MockTransportErrorMapper);
	let client: OAuthClient<MockHttpClient, MockTransportErrorMapper> =
		OAuthClient::with_http_client(
			consumer.clone(),
			endpoints.clone(),
			Arc::new(MockHttpClient::default()),
			Arc::clone(&mapper),
		);
	let temporary = client.request_temporary_credentials().await?;

	println!("Send the resource owner to {}.", client.build_authorization_url(&temporary.token));

	let access = client.exchange_for_access_credentials(&temporary, "demo-verifier").await?;
	let signed = client.sign_request(
		HttpMethod::Get,
		&Url::parse("https://jira.example.com/rest/api/2/priority")?,
		&[],
		&access,
	)?;

	println!("Access token issued by the mock transport: {}.", access.token);
	println!("Authorization: {}", signed.authorization_header(None));

	let failing_client: OAuthClient<MockHttpClient, MockTransportErrorMapper> =
		OAuthClient::with_http_client(
			consumer.clone(),
			endpoints.clone(),
			Arc::new(MockHttpClient::failing(MockTransportError::DnsFailure {
				host: "jira.example.com",
			})),
			Arc::clone(&mapper),
		);

	match failing_client.request_temporary_credentials().await {
		Ok(_) => println!("Mock transport unexpectedly succeeded."),
		Err(e) =>
			println!("Transport error mapped by the client (retryable: {}): {e}", e.is_retryable()),
	}

	let slow_client: OAuthClient<MockHttpClient, MockTransportErrorMapper> =
		OAuthClient::with_http_client(
			consumer,
			endpoints,
			Arc::new(MockHttpClient::failing(MockTransportError::BackendTimeout)),
			mapper,
		);

	match slow_client.exchange_for_access_credentials(&temporary, "demo-verifier").await {
		Ok(_) => println!("Mock transport unexpectedly produced access credentials."),
		Err(e) => println!("Timeout mapped by the client: {e}"),
	}

	Ok(())
}

#[derive(Clone, Debug)]
enum MockTransportError {
	DnsFailure { host: &'static str },
	BackendTimeout,
}
impl Display for MockTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::DnsFailure { host } => write!(f, "DNS lookup failed for {host}"),
			Self::BackendTimeout => write!(f, "Service did not answer in time"),
		}
	}
}
impl StdError for MockTransportError {}

#[derive(Debug, Default)]
struct MockHttpClient {
	failure: Option<MockTransportError>,
}
impl MockHttpClient {
	fn failing(error: MockTransportError) -> Self {
		Self { failure: Some(error) }
	}
}
impl TokenHttpClient for MockHttpClient {
	type TransportError = MockTransportError;

	fn execute(&self, request: TransportRequest) -> HttpFuture<'_, Self::TransportError> {
		let failure = self.failure.clone();

		Box::pin(async move {
			if let Some(error) = failure {
				return Err(error);
			}

			let body = match request.url.path() {
				"/plugins/servlet/oauth/request-token" =>
					"oauth_token=demo-temporary&oauth_token_secret=demo-temporary-secret&oauth_callback_confirmed=true",
				"/plugins/servlet/oauth/access-token" =>
					"oauth_token=demo-access&oauth_token_secret=demo-access-secret",
				_ => return Ok(TransportResponse::new(404, "oauth_problem=unknown_endpoint")),
			};

			Ok(TransportResponse::new(200, body))
		})
	}
}

#[derive(Debug)]
struct MockTransportErrorMapper;
impl TransportErrorMapper<MockTransportError> for MockTransportErrorMapper {
	fn map_transport_error(&self, step: FlowStep, error: MockTransportError) -> Error {
		match error {
			MockTransportError::BackendTimeout => TransportError::Timeout { step }.into(),
			error => TransportError::network(step, error).into(),
		}
	}
}
