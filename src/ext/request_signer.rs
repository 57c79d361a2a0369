//! Request signing contracts that attach OAuth 1.0a signatures to arbitrary HTTP requests.

// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	Method, Request,
	header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue},
};
// self
use crate::auth::AccessCredentials;
#[cfg(feature = "reqwest")]
use crate::{
	_prelude::*,
	error::{ConfigError, InvalidArgumentError},
	flows::OAuthClient,
	http::{FORM_CONTENT_TYPE, TokenHttpClient},
	oauth::TransportErrorMapper,
	sign::HttpMethod,
};

/// Describes how to sign an outbound request with [`AccessCredentials`] without constraining
/// the HTTP client type.
pub trait RequestSignerExt<Request, Error>
where
	Self: Send + Sync,
{
	/// Consumes the request and returns it with an `Authorization: OAuth ...` header whose
	/// signature covers the method, URL, query, and any form-encoded body parameters.
	fn attach_signature(
		&self,
		request: Request,
		credentials: &AccessCredentials,
	) -> Result<Request, Error>;
}

#[cfg(feature = "reqwest")]
impl<C, M> RequestSignerExt<Request, Error> for OAuthClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn attach_signature(
		&self,
		mut request: Request,
		credentials: &AccessCredentials,
	) -> Result<Request> {
		let method = signable_method(request.method())?;
		let params = form_params(&request);
		let signed = self.sign_request(method, request.url(), &params, credentials)?;
		let header = signed.authorization_header(self.endpoints.quirks.realm.as_deref());
		let value = HeaderValue::from_str(&header).map_err(ConfigError::http_request)?;

		request.headers_mut().insert(AUTHORIZATION, value);

		Ok(request)
	}
}

#[cfg(feature = "reqwest")]
fn signable_method(method: &Method) -> Result<HttpMethod> {
	Ok(match *method {
		Method::GET => HttpMethod::Get,
		Method::POST => HttpMethod::Post,
		Method::PUT => HttpMethod::Put,
		Method::PATCH => HttpMethod::Patch,
		Method::DELETE => HttpMethod::Delete,
		Method::HEAD => HttpMethod::Head,
		_ =>
			return Err(
				InvalidArgumentError::UnsupportedMethod { method: method.to_string() }.into()
			),
	})
}

// Form bodies take part in the signature (RFC 5849 §3.4.1.3.1); other bodies do not.
#[cfg(feature = "reqwest")]
fn form_params(request: &Request) -> Vec<(String, String)> {
	let is_form = request
		.headers()
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));

	if !is_form {
		return Vec::new();
	}

	request
		.body()
		.and_then(|body| body.as_bytes())
		.map(|bytes| url::form_urlencoded::parse(bytes).into_owned().collect())
		.unwrap_or_default()
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::{build_reqwest_test_client, test_endpoint_config},
		auth::{ConsumerCredentials, Secret},
		sign::FixedStampSource,
	};

	fn credentials() -> AccessCredentials {
		AccessCredentials {
			token: "acc789".into(),
			token_secret: Secret::new("sec999"),
			extra: BTreeMap::new(),
		}
	}

	fn client() -> crate::_preludet::ReqwestTestClient {
		let consumer = ConsumerCredentials::hmac_sha1("1234567890", "consumer-secret")
			.expect("HMAC consumer should build.");

		build_reqwest_test_client(consumer, test_endpoint_config("http://localhost:8181/"))
			.with_stamp_source(FixedStampSource::new("fixed-nonce", 1_700_000_000))
	}

	#[test]
	fn signs_reqwest_requests_like_sign_request() {
		let client = client();
		let url = Url::parse("http://localhost:8181/rest/api/2/priority?expand=all")
			.expect("Resource URL should parse.");
		let request = Request::new(Method::GET, url.clone());
		let signed = client
			.attach_signature(request, &credentials())
			.expect("Signing a reqwest request should succeed.");
		let expected = client
			.sign_request(HttpMethod::Get, &url, &[], &credentials())
			.expect("Direct signing should succeed.")
			.authorization_header(None);

		assert_eq!(
			signed.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok()),
			Some(expected.as_str())
		);
	}

	#[test]
	fn form_bodies_are_signed() {
		let client = client();
		let url = Url::parse("http://localhost:8181/rest/api/2/issue").expect("URL should parse.");
		let mut request = Request::new(Method::POST, url.clone());

		request.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
		*request.body_mut() = Some("summary=Hello+world".into());

		let signed = client
			.attach_signature(request, &credentials())
			.expect("Signing a form request should succeed.");
		let expected = client
			.sign_request(
				HttpMethod::Post,
				&url,
				&[("summary".into(), "Hello world".into())],
				&credentials(),
			)
			.expect("Direct signing should succeed.")
			.authorization_header(None);

		assert_eq!(
			signed.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok()),
			Some(expected.as_str())
		);
	}

	#[test]
	fn unsupported_methods_are_rejected() {
		let request = Request::new(
			Method::OPTIONS,
			Url::parse("http://localhost:8181/").expect("URL should parse."),
		);
		let err = client()
			.attach_signature(request, &credentials())
			.expect_err("OPTIONS cannot be signed.");

		assert!(matches!(
			err,
			Error::InvalidArgument(InvalidArgumentError::UnsupportedMethod { .. })
		));
	}
}
