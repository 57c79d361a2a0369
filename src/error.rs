//! Crate-level error types shared across flows, signing, configuration, and stores.
//!
//! The taxonomy follows how callers are expected to react:
//!
//! - [`TransportError`] (network failures) is the only retryable category.
//! - [`ProtocolError`] means the service rejected the flow or answered with an unexpected shape.
//! - [`InvalidArgumentError`] is a caller bug (for example a missing verifier) and is raised before
//!   any I/O happens.
//! - [`SignatureError`] and [`ConfigError`] are fatal configuration problems.

// std
use std::path::PathBuf;
// self
use crate::{_prelude::*, auth::IdentifierError, endpoint::EndpointConfigError, obs::FlowStep};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The service answered with an unexpected status or payload.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// The caller supplied missing or inconsistent input.
	#[error(transparent)]
	InvalidArgument(#[from] InvalidArgumentError),
	/// Key material could not be used to produce a signature.
	#[error(transparent)]
	Signature(#[from] SignatureError),
}
impl Error {
	/// Returns `true` when retrying the same call may succeed (network failures only).
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Transport(_))
	}

	/// Flow step the failure was raised from, when known.
	pub fn step(&self) -> Option<FlowStep> {
		match self {
			Self::Transport(e) => e.step(),
			Self::Protocol(e) => Some(e.step()),
			_ => None,
		}
	}

	/// HTTP status returned by the service, when the failure carried one.
	pub fn http_status(&self) -> Option<u16> {
		match self {
			Self::Protocol(ProtocolError::UnexpectedStatus { status, .. }) => Some(*status),
			_ => None,
		}
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Outbound request could not be assembled by the transport.
	#[error("HTTP request could not be built.")]
	HttpRequest {
		/// Underlying builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint configuration failed validation.
	#[error(transparent)]
	InvalidEndpoint(#[from] EndpointConfigError),
	/// An identifier in the configuration failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] IdentifierError),
	/// An RSA signature method was configured without `private_key` or `private_key_path`.
	#[error("The {method} signature method requires `private_key` or `private_key_path`.")]
	MissingPrivateKey {
		/// Configured signature method.
		method: crate::sign::SignatureMethod,
	},
	/// Configuration file could not be read.
	#[error("Failed to read configuration file {}.", path.display())]
	ReadFile {
		/// Location of the configuration file.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Configuration payload could not be parsed.
	#[error("Configuration field `{path}` is invalid.")]
	Parse {
		/// Path of the offending field inside the document.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Wraps a request builder failure inside [`ConfigError`].
	pub fn http_request(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpRequest { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO). Safe to retry.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {step} endpoint.")]
	Network {
		/// Flow step that issued the request.
		step: FlowStep,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete before the transport deadline.
	#[error("Request to the {step} endpoint timed out.")]
	Timeout {
		/// Flow step that issued the request.
		step: FlowStep,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(step: FlowStep, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { step, source: Box::new(src) }
	}

	/// Flow step that issued the failing request, when known.
	pub fn step(&self) -> Option<FlowStep> {
		match self {
			Self::Network { step, .. } | Self::Timeout { step } => Some(*step),
			Self::Io(_) => None,
		}
	}
}

/// Unexpected responses from the service. Retrying without operator action is pointless.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// The service answered with a non-success status code.
	#[error("The {step} endpoint returned HTTP {status}{}.", problem_suffix(.problem.as_deref()))]
	UnexpectedStatus {
		/// Flow step that issued the request.
		step: FlowStep,
		/// HTTP status code.
		status: u16,
		/// `oauth_problem` value reported by the service, if any.
		problem: Option<String>,
		/// `oauth_problem_advice` value reported by the service, if any.
		advice: Option<String>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
		/// Truncated response body for diagnostics.
		body_preview: String,
	},
	/// A required field is missing from the response body.
	#[error("The {step} response is missing `{field}`.")]
	MissingField {
		/// Flow step that issued the request.
		step: FlowStep,
		/// Name of the missing field.
		field: &'static str,
	},
	/// Response body could not be decoded.
	#[error("The {step} response body is malformed.")]
	MalformedResponse {
		/// Flow step that issued the request.
		step: FlowStep,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_urlencoded::de::Error>,
	},
	/// A JSON resource body could not be decoded into the requested type.
	#[error("The {step} response is not the expected JSON document.")]
	MalformedJson {
		/// Flow step that issued the request.
		step: FlowStep,
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The service did not confirm the callback (OAuth 1.0a requirement).
	#[error("The {step} response did not confirm the callback URL.")]
	CallbackNotConfirmed {
		/// Flow step that issued the request.
		step: FlowStep,
	},
}
impl ProtocolError {
	/// Flow step that issued the failing request.
	pub fn step(&self) -> FlowStep {
		match self {
			Self::UnexpectedStatus { step, .. }
			| Self::MissingField { step, .. }
			| Self::MalformedResponse { step, .. }
			| Self::MalformedJson { step, .. }
			| Self::CallbackNotConfirmed { step } => *step,
		}
	}
}

/// Invalid caller input, surfaced immediately and never retried.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum InvalidArgumentError {
	/// The callback did not carry an `oauth_verifier`.
	#[error("There was no OAuth verifier in the request.")]
	MissingVerifier,
	/// A token that must be present is empty.
	#[error("The {kind} token is empty.")]
	EmptyToken {
		/// Which credential the token belongs to.
		kind: &'static str,
	},
	/// The callback token does not match the pending temporary credentials.
	#[error("Callback token does not match the pending authorization.")]
	TokenMismatch,
	/// No pending temporary credentials exist for the session.
	#[error("No pending authorization exists for this session.")]
	NoPendingAuthorization,
	/// The request uses an HTTP method that cannot be signed.
	#[error("HTTP method `{method}` cannot be signed.")]
	UnsupportedMethod {
		/// Method supplied by the caller.
		method: String,
	},
}

/// Key material failures raised while constructing credentials or signing.
#[derive(Debug, ThisError)]
pub enum SignatureError {
	/// RSA private key could not be decoded.
	#[error("RSA private key could not be decoded.")]
	InvalidPrivateKey {
		/// Underlying decoding failure.
		#[source]
		source: BoxError,
	},
	/// The configured key material cannot be used with the signature method.
	#[error("The {method} signature method requires {expected}.")]
	KeyMaterialMismatch {
		/// Configured signature method.
		method: crate::sign::SignatureMethod,
		/// Human-readable description of the expected key material.
		expected: &'static str,
	},
	/// RSA signing failed.
	#[error("RSA signing failed.")]
	Rsa(#[from] rsa::Error),
	/// HMAC key could not be initialized.
	#[error("HMAC key could not be initialized.")]
	HmacKey,
}
impl SignatureError {
	/// Wraps a private key decoding failure.
	pub fn invalid_private_key(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::InvalidPrivateKey { source: Box::new(src) }
	}
}

fn problem_suffix(problem: Option<&str>) -> String {
	problem.map(|value| format!(" ({value})")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn only_transport_failures_are_retryable() {
		let network: Error = TransportError::Timeout { step: FlowStep::TemporaryCredentials }.into();
		let protocol: Error = ProtocolError::UnexpectedStatus {
			step: FlowStep::TemporaryCredentials,
			status: 401,
			problem: Some("consumer_key_unknown".into()),
			advice: None,
			retry_after: None,
			body_preview: String::new(),
		}
		.into();
		let invalid: Error = InvalidArgumentError::MissingVerifier.into();

		assert!(network.is_retryable());
		assert!(!protocol.is_retryable());
		assert!(!invalid.is_retryable());
		assert_eq!(network.step(), Some(FlowStep::TemporaryCredentials));
		assert_eq!(protocol.http_status(), Some(401));
		assert_eq!(invalid.step(), None);
	}

	#[test]
	fn unexpected_status_mentions_problem_when_reported() {
		let with_problem = ProtocolError::UnexpectedStatus {
			step: FlowStep::AccessCredentials,
			status: 401,
			problem: Some("token_rejected".into()),
			advice: None,
			retry_after: None,
			body_preview: String::new(),
		};
		let without_problem = ProtocolError::UnexpectedStatus {
			step: FlowStep::AccessCredentials,
			status: 500,
			problem: None,
			advice: None,
			retry_after: None,
			body_preview: String::new(),
		};

		assert_eq!(
			with_problem.to_string(),
			"The access_credentials endpoint returned HTTP 401 (token_rejected)."
		);
		assert_eq!(
			without_problem.to_string(),
			"The access_credentials endpoint returned HTTP 500."
		);
	}
}
