//! Transport primitives for OAuth 1.0a credential exchanges and signed resource requests.
//!
//! [`TokenHttpClient`] is the crate's only dependency on an HTTP stack: it receives a fully
//! prepared [`TransportRequest`] (method, URL, headers, optional form body) and resolves to a
//! [`TransportResponse`] carrying the status, the parsed `Retry-After` hint, and the body. Status
//! interpretation stays with the flows, so transports only report failures that prevented a
//! response from arriving at all.

// std
#[cfg(feature = "reqwest")] use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	Method,
	header::{CONTENT_TYPE, HeaderMap, RETRY_AFTER},
	redirect::Policy,
};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, sign::HttpMethod};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// `Content-Type` sent with form-encoded request bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Boxed future returned by [`TokenHttpClient::execute`].
pub type HttpFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<TransportResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing OAuth requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every clone
/// of an [`OAuthClient`](crate::flows::OAuthClient), and the returned future must be `Send` so
/// flow futures can hop executors. Redirects should not be followed: token endpoints answer
/// directly.
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and resolves once the full response body is available.
	fn execute(&self, request: TransportRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Outbound request handed to a [`TokenHttpClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Fully rendered URL, query string included.
	pub url: Url,
	/// Header name/value pairs.
	pub headers: Vec<(String, String)>,
	/// Form-encoded body, when the request carries one.
	pub body: Option<String>,
}
impl TransportRequest {
	/// Creates a request without headers or body.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { method, url, headers: Vec::new(), body: None }
	}

	/// Appends a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Attaches a form-encoded body and the matching `Content-Type` header.
	pub fn with_form_body(mut self, body: String) -> Self {
		self.body = Some(body);

		self.with_header("Content-Type", FORM_CONTENT_TYPE)
	}

	/// Returns the first header value matching `name` (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Response returned by a [`TokenHttpClient`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportResponse {
	/// HTTP status code.
	pub status: u16,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
	/// Content-Type header, when present.
	pub content_type: Option<String>,
	/// Response body decoded as text.
	pub body: String,
}
impl TransportResponse {
	/// Creates a response with the given status and body.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, body: body.into(), ..Default::default() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token requests should not follow redirects; configure any custom [`ReqwestClient`] passed to
/// [`ReqwestHttpClient::with_client`] accordingly.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that gives up after `timeout` and never follows redirects.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).redirect(Policy::none()).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: TransportRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = client.request(reqwest_method(request.method), request.url);

			for (name, value) in request.headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = client.execute(builder.build()?).await?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let content_type = response
				.headers()
				.get(CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);
			let body = response.text().await?;

			Ok(TransportResponse { status, retry_after, content_type, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn reqwest_method(method: HttpMethod) -> Method {
	match method {
		HttpMethod::Get => Method::GET,
		HttpMethod::Post => Method::POST,
		HttpMethod::Put => Method::PUT,
		HttpMethod::Patch => Method::PATCH,
		HttpMethod::Delete => Method::DELETE,
		HttpMethod::Head => Method::HEAD,
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return i64::try_from(secs).ok().map(Duration::seconds);
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn form_body_sets_content_type() {
		let request = TransportRequest::new(
			HttpMethod::Post,
			Url::parse("https://example.com/token").expect("URL fixture should parse."),
		)
		.with_header("Authorization", "OAuth oauth_version=\"1.0\"")
		.with_form_body("a=1".into());

		assert_eq!(request.header("content-type"), Some(FORM_CONTENT_TYPE));
		assert_eq!(request.header("AUTHORIZATION"), Some("OAuth oauth_version=\"1.0\""));
		assert_eq!(request.body.as_deref(), Some("a=1"));
	}

	#[test]
	fn success_covers_2xx_only() {
		assert!(TransportResponse::new(200, "").is_success());
		assert!(TransportResponse::new(204, "").is_success());
		assert!(!TransportResponse::new(302, "").is_success());
		assert!(!TransportResponse::new(401, "").is_success());
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn retry_after_accepts_delta_seconds() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, "30".parse().expect("Header value should parse."));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(30)));
		assert_eq!(parse_retry_after(&HeaderMap::new()), None);

		headers.insert(
			RETRY_AFTER,
			"18446744073709551615".parse().expect("Header value should parse."),
		);

		assert_eq!(parse_retry_after(&headers), None);
	}
}
