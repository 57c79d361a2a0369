//! OAuth 1.0a three-legged client: RFC 5849 request signing, temporary/access credential
//! exchanges, caller-owned session credential stores, and transport-aware observability.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod ext;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod sign;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::endpoint::{EndpointConfig, TransmissionMode};
	#[cfg(feature = "reqwest")]
	use crate::{
		auth::ConsumerCredentials, flows::OAuthClient, http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
	};

	/// 1024-bit PKCS#8 RSA key used by signing fixtures. Never use it outside tests.
	pub const TEST_RSA_PRIVATE_KEY_PEM: &str = include_str!("../tests/fixtures/consumer_pkcs8.pem");
	/// The same key as [`TEST_RSA_PRIVATE_KEY_PEM`] in PKCS#1 form.
	pub const TEST_RSA_PRIVATE_KEY_PKCS1_PEM: &str =
		include_str!("../tests/fixtures/consumer_pkcs1.pem");

	/// Builds an endpoint configuration rooted at `base_url` that mirrors the Atlassian paths.
	pub fn test_endpoint_config(base_url: &str) -> EndpointConfig {
		EndpointConfig::atlassian(
			Url::parse(base_url).expect("Mock service base URL should parse successfully."),
		)
		.callback_url(
			Url::parse("http://localhost:8181/callback")
				.expect("Callback URL fixture should parse successfully."),
		)
		.transmission(TransmissionMode::AuthorizationHeader)
		.build()
		.expect("Endpoint configuration fixture should build.")
	}

	/// Client type alias used by reqwest-backed integration tests.
	#[cfg(feature = "reqwest")]
	pub type ReqwestTestClient = OAuthClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs an [`OAuthClient`] wired to the reqwest transport used across integration
	/// tests.
	#[cfg(feature = "reqwest")]
	pub fn build_reqwest_test_client(
		consumer: ConsumerCredentials,
		endpoints: EndpointConfig,
	) -> ReqwestTestClient {
		OAuthClient::with_http_client(
			consumer,
			endpoints,
			test_reqwest_http_client(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
