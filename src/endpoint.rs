//! Service endpoint configuration shared by every flow step.
//!
//! `EndpointConfig` holds the three OAuth 1.0a endpoints resolved against the service base URL,
//! the optional callback URL, and [`ServiceQuirks`] describing how the service expects token
//! requests to be transmitted. Values are validated once by [`EndpointConfigBuilder::build`] and
//! never change afterwards.

pub mod builder;
pub mod quirks;

pub use builder::*;
pub use quirks::*;

// self
use crate::{_prelude::*, sign::OUT_OF_BAND_CALLBACK};

/// Request-token path used by Atlassian application links.
pub const ATLASSIAN_REQUEST_TOKEN_PATH: &str = "plugins/servlet/oauth/request-token";
/// Authorization path (with token template) used by Atlassian application links.
pub const ATLASSIAN_AUTHORIZE_PATH: &str = "plugins/servlet/oauth/authorize?oauth_token=%s";
/// Access-token path used by Atlassian application links.
pub const ATLASSIAN_ACCESS_TOKEN_PATH: &str = "plugins/servlet/oauth/access-token";

/// Query parameter carrying the temporary token on the authorization redirect (RFC 5849 §2.2).
pub const DEFAULT_AUTHORIZE_TOKEN_PARAM: &str = "oauth_token";

/// Immutable, validated endpoint configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointConfig {
	/// Service base URL every path was resolved against.
	pub base_url: Url,
	/// Temporary credential request endpoint.
	pub request_token_url: Url,
	/// Token credential request endpoint.
	pub access_token_url: Url,
	/// Callback URL announced as `oauth_callback`; `None` means out-of-band.
	pub callback_url: Option<Url>,
	/// Service-specific transmission behavior.
	pub quirks: ServiceQuirks,
	authorize_url: Url,
	authorize_token_param: String,
}
impl EndpointConfig {
	/// Creates a builder resolving paths against `base_url`.
	pub fn builder(base_url: Url) -> EndpointConfigBuilder {
		EndpointConfigBuilder::new(base_url)
	}

	/// Creates a builder preloaded with the Atlassian application-link paths.
	pub fn atlassian(base_url: Url) -> EndpointConfigBuilder {
		EndpointConfigBuilder::new(base_url)
			.request_token_path(ATLASSIAN_REQUEST_TOKEN_PATH)
			.authorize_path(ATLASSIAN_AUTHORIZE_PATH)
			.access_token_path(ATLASSIAN_ACCESS_TOKEN_PATH)
	}

	/// Builds the resource-owner authorization URL for a temporary token.
	///
	/// The token is appended as a single query pair, so it is encoded exactly once no matter
	/// which characters it contains.
	pub fn authorization_url(&self, token: &str) -> Url {
		let mut url = self.authorize_url.clone();

		url.query_pairs_mut().append_pair(&self.authorize_token_param, token);

		url
	}

	/// Value sent as `oauth_callback`: the configured callback URL or `oob`.
	pub fn callback_value(&self) -> &str {
		self.callback_url.as_ref().map(Url::as_str).unwrap_or(OUT_OF_BAND_CALLBACK)
	}
}
