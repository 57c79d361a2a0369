//! OAuth 1.0a wire handling shared by the flows: transport error mapping, credential response
//! parsing, and Problem Reporting extraction for rejected requests.

// std
use std::marker::PhantomData;
// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	error::{ProtocolError, TransportError},
	http::TransportResponse,
	obs::FlowStep,
};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

const BODY_PREVIEW_LEN: usize = 256;

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an error emitted by the transport while running `step` into a crate error.
	fn map_transport_error(&self, step: FlowStep, error: E) -> Error;
}

/// Default mapper for reqwest-backed transports.
///
/// Builder failures become [`ConfigError::HttpRequest`], timeouts become
/// [`TransportError::Timeout`], and everything else is a retryable [`TransportError::Network`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, step: FlowStep, error: ReqwestError) -> Error {
		if error.is_builder() {
			return ConfigError::http_request(error).into();
		}
		if error.is_timeout() {
			return TransportError::Timeout { step }.into();
		}

		TransportError::network(step, error).into()
	}
}

/// Mapper for custom transports that treats every failure as a retryable network error.
pub struct NetworkErrorMapper<E>(PhantomData<fn() -> E>);
impl<E> NetworkErrorMapper<E> {
	/// Creates the mapper.
	pub fn new() -> Self {
		Self(PhantomData)
	}
}
impl<E> Default for NetworkErrorMapper<E> {
	fn default() -> Self {
		Self::new()
	}
}
impl<E> Clone for NetworkErrorMapper<E> {
	fn clone(&self) -> Self {
		Self::new()
	}
}
impl<E> Debug for NetworkErrorMapper<E> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("NetworkErrorMapper")
	}
}
impl<E> TransportErrorMapper<E> for NetworkErrorMapper<E>
where
	E: 'static + Send + Sync + StdError,
{
	fn map_transport_error(&self, step: FlowStep, error: E) -> Error {
		TransportError::network(step, error).into()
	}
}

/// `oauth_problem` / `oauth_problem_advice` pair reported by services that implement the OAuth
/// Problem Reporting extension.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProblemReport {
	/// Problem code such as `token_rejected` or `signature_invalid`.
	pub problem: Option<String>,
	/// Human-readable advice.
	pub advice: Option<String>,
}
impl ProblemReport {
	/// Extracts the problem fields from a form-encoded body or a `WWW-Authenticate`-style value.
	///
	/// Bodies that are not form-encoded simply yield an empty report.
	pub fn parse(body: &str) -> Self {
		let mut report = Self::default();

		for (name, value) in form_urlencoded::parse(body.trim().as_bytes()) {
			match name.as_ref() {
				"oauth_problem" if report.problem.is_none() =>
					report.problem = Some(value.into_owned()),
				"oauth_problem_advice" if report.advice.is_none() =>
					report.advice = Some(value.into_owned()),
				_ => (),
			}
		}

		report
	}
}

/// Successful credential response (`oauth_token`, `oauth_token_secret`, and everything else).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CredentialResponse {
	pub(crate) token: String,
	pub(crate) token_secret: String,
	pub(crate) callback_confirmed: bool,
	pub(crate) extra: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct RawCredentialResponse {
	oauth_token: Option<String>,
	oauth_token_secret: Option<String>,
	oauth_callback_confirmed: Option<String>,
	#[serde(flatten)]
	extra: BTreeMap<String, String>,
}

/// Fails with [`ProtocolError::UnexpectedStatus`] unless the status is acceptable for `step`.
///
/// Credential endpoints must answer `200 OK`; protected resources accept any 2xx.
pub(crate) fn ensure_status(step: FlowStep, response: &TransportResponse) -> Result<()> {
	let acceptable = match step {
		FlowStep::ProtectedResource => response.is_success(),
		_ => response.status == 200,
	};

	if acceptable {
		return Ok(());
	}

	let ProblemReport { problem, advice } = ProblemReport::parse(&response.body);

	Err(ProtocolError::UnexpectedStatus {
		step,
		status: response.status,
		problem,
		advice,
		retry_after: response.retry_after,
		body_preview: response.body.chars().take(BODY_PREVIEW_LEN).collect(),
	}
	.into())
}

/// Parses a form-encoded credential response, rejecting missing or empty token fields.
pub(crate) fn parse_credential_response(
	step: FlowStep,
	response: &TransportResponse,
) -> Result<CredentialResponse> {
	let body = response.body.trim();
	let raw: RawCredentialResponse = serde_path_to_error::deserialize(
		serde_urlencoded::Deserializer::new(form_urlencoded::parse(body.as_bytes())),
	)
	.map_err(|source| ProtocolError::MalformedResponse { step, source })?;
	let token = non_empty(raw.oauth_token)
		.ok_or(ProtocolError::MissingField { step, field: "oauth_token" })?;
	let token_secret = raw
		.oauth_token_secret
		.ok_or(ProtocolError::MissingField { step, field: "oauth_token_secret" })?;
	let callback_confirmed = raw
		.oauth_callback_confirmed
		.is_some_and(|value| value.trim().eq_ignore_ascii_case("true"));

	Ok(CredentialResponse { token, token_secret, callback_confirmed, extra: raw.extra })
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.trim().is_empty())
}
