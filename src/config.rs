//! JSON configuration for building a ready-to-use [`OAuthClient`](crate::flows::OAuthClient).
//!
//! Only `consumer_key` and `base_url` are mandatory; everything else defaults to the values an
//! Atlassian application link expects (RSA-SHA1, empty consumer secret, the
//! `plugins/servlet/oauth/*` paths, POST token requests, Authorization header transmission, and a
//! 10 second transport timeout).
//!
//! ```json
//! {
//!   "consumer_key": "1234567890",
//!   "private_key_path": "keys/myrsakey.pem",
//!   "base_url": "http://localhost:8181/",
//!   "callback_url": "http://localhost:8000/callback"
//! }
//! ```

// std
use std::{
	fs,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{ConsumerCredentials, ConsumerKey, KeyMaterial, Secret},
	endpoint::{
		ATLASSIAN_ACCESS_TOKEN_PATH, ATLASSIAN_AUTHORIZE_PATH, ATLASSIAN_REQUEST_TOKEN_PATH,
		EndpointConfig, TransmissionMode,
	},
	error::ConfigError,
	sign::{HttpMethod, PrivateKey, SignatureMethod},
};
#[cfg(feature = "reqwest")]
use crate::{flows::ReqwestOAuthClient, http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Deserializable client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
	/// Consumer key registered with the service.
	pub consumer_key: ConsumerKey,
	/// Signature method; defaults to `RSA-SHA1`.
	#[serde(default = "default_signature_method")]
	pub signature_method: SignatureMethod,
	/// Shared consumer secret for HMAC and PLAINTEXT; defaults to empty.
	#[serde(default)]
	pub consumer_secret: Secret,
	/// Inline RSA private key (PEM, or bare base64 DER). Takes precedence over
	/// `private_key_path`.
	#[serde(default)]
	pub private_key: Option<Secret>,
	/// Path to a PEM or base64 DER RSA private key.
	#[serde(default)]
	pub private_key_path: Option<PathBuf>,
	/// Service base URL the endpoint paths are resolved against.
	pub base_url: Url,
	/// Temporary credential request path.
	#[serde(default = "default_request_token_path")]
	pub request_token_path: String,
	/// Authorization path, optionally with a `name=%s` token template.
	#[serde(default = "default_authorize_path")]
	pub authorize_path: String,
	/// Token credential request path.
	#[serde(default = "default_access_token_path")]
	pub access_token_path: String,
	/// Callback URL; absent means out-of-band.
	#[serde(default)]
	pub callback_url: Option<Url>,
	/// Where protocol parameters travel on token requests.
	#[serde(default)]
	pub transmission: TransmissionMode,
	/// HTTP method for token requests.
	#[serde(default)]
	pub token_request_method: HttpMethod,
	/// Optional Authorization header realm.
	#[serde(default)]
	pub realm: Option<String>,
	/// Reject temporary credentials lacking `oauth_callback_confirmed=true`.
	#[serde(default = "default_require_callback_confirmed")]
	pub require_callback_confirmed: bool,
	/// Transport timeout in seconds.
	#[serde(default = "default_timeout_secs")]
	pub timeout_secs: u64,
}
impl ClientConfig {
	/// Reads and parses a JSON configuration file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let raw = fs::read_to_string(path)
			.map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

		Self::from_json_str(&raw)
	}

	/// Parses a JSON document, reporting the path of the first invalid field.
	pub fn from_json_str(raw: &str) -> Result<Self> {
		let mut de = serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(&mut de).map_err(|e| {
			let path = e.path().to_string();

			ConfigError::Parse { path, source: e.into_inner() }.into()
		})
	}

	/// Builds the consumer credentials, reading the private key file when needed.
	pub fn consumer_credentials(&self) -> Result<ConsumerCredentials> {
		let material = if self.signature_method.uses_private_key() {
			let encoded = match (&self.private_key, &self.private_key_path) {
				(Some(inline), _) => inline.clone(),
				(None, Some(path)) => fs::read_to_string(path)
					.map(Secret::new)
					.map_err(|source| ConfigError::ReadFile { path: path.clone(), source })?,
				(None, None) =>
					return Err(
						ConfigError::MissingPrivateKey { method: self.signature_method }.into()
					),
			};

			KeyMaterial::PrivateKey(PrivateKey::parse(encoded.expose())?)
		} else {
			KeyMaterial::SharedSecret(self.consumer_secret.clone())
		};

		ConsumerCredentials::new(&self.consumer_key, material, self.signature_method)
	}

	/// Builds the validated endpoint configuration.
	pub fn endpoint_config(&self) -> Result<EndpointConfig> {
		let mut builder = EndpointConfig::builder(self.base_url.clone())
			.request_token_path(&self.request_token_path)
			.authorize_path(&self.authorize_path)
			.access_token_path(&self.access_token_path)
			.transmission(self.transmission)
			.token_request_method(self.token_request_method)
			.require_callback_confirmed(self.require_callback_confirmed);

		if let Some(callback) = &self.callback_url {
			builder = builder.callback_url(callback.clone());
		}
		if let Some(realm) = &self.realm {
			builder = builder.realm(realm);
		}

		Ok(builder.build().map_err(ConfigError::from)?)
	}

	/// Builds a reqwest-backed client that applies `timeout_secs` and never follows redirects.
	#[cfg(feature = "reqwest")]
	pub fn build_client(&self) -> Result<ReqwestOAuthClient> {
		let http_client =
			ReqwestHttpClient::with_timeout(std::time::Duration::from_secs(self.timeout_secs))?;

		Ok(ReqwestOAuthClient::with_http_client(
			self.consumer_credentials()?,
			self.endpoint_config()?,
			http_client,
			Arc::new(ReqwestTransportErrorMapper),
		))
	}
}

fn default_signature_method() -> SignatureMethod {
	SignatureMethod::RsaSha1
}

fn default_request_token_path() -> String {
	ATLASSIAN_REQUEST_TOKEN_PATH.into()
}

fn default_authorize_path() -> String {
	ATLASSIAN_AUTHORIZE_PATH.into()
}

fn default_access_token_path() -> String {
	ATLASSIAN_ACCESS_TOKEN_PATH.into()
}

fn default_require_callback_confirmed() -> bool {
	true
}

fn default_timeout_secs() -> u64 {
	DEFAULT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// self
	use super::*;
	use crate::{_preludet::TEST_RSA_PRIVATE_KEY_PEM, error::SignatureError};

	#[test]
	fn minimal_document_uses_atlassian_defaults() {
		let config = ClientConfig::from_json_str(
			r#"{ "consumer_key": "1234567890", "base_url": "http://localhost:8181/" }"#,
		)
		.expect("Minimal configuration should parse.");

		assert_eq!(config.signature_method, SignatureMethod::RsaSha1);
		assert!(config.consumer_secret.is_empty());
		assert_eq!(config.token_request_method, HttpMethod::Post);
		assert_eq!(config.timeout_secs, 10);
		assert!(config.require_callback_confirmed);

		let endpoints = config.endpoint_config().expect("Endpoint config should build.");

		assert_eq!(
			endpoints.authorization_url("tmp123").as_str(),
			"http://localhost:8181/plugins/servlet/oauth/authorize?oauth_token=tmp123"
		);
		assert!(matches!(
			config.consumer_credentials(),
			Err(Error::Config(ConfigError::MissingPrivateKey { method: SignatureMethod::RsaSha1 }))
		));
	}

	#[test]
	fn invalid_fields_report_their_path() {
		let err = ClientConfig::from_json_str(
			r#"{ "consumer_key": "1234567890", "base_url": "http://localhost:8181/", "signature_method": "MD5" }"#,
		)
		.expect_err("Unknown signature methods must be rejected.");

		match err {
			Error::Config(ConfigError::Parse { path, .. }) => assert_eq!(path, "signature_method"),
			other => panic!("Unexpected error: {other:?}."),
		}

		assert!(matches!(
			ClientConfig::from_json_str(r#"{ "consumer_key": "", "base_url": "http://x/" }"#),
			Err(Error::Config(ConfigError::Parse { .. }))
		));
	}

	#[test]
	fn private_key_is_read_from_path() {
		let path = env::temp_dir().join(format!(
			"oauth1_broker_key_{}_{}.pem",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		));

		fs::write(&path, TEST_RSA_PRIVATE_KEY_PEM).expect("Failed to write key fixture.");

		let document = serde_json::json!({
			"consumer_key": "1234567890",
			"private_key_path": path,
			"base_url": "http://localhost:8181/",
			"callback_url": "http://localhost:8000/callback",
		});
		let config = ClientConfig::from_json_str(&document.to_string())
			.expect("Configuration should parse.");
		let consumer = config.consumer_credentials().expect("Consumer credentials should build.");

		assert_eq!(consumer.method, SignatureMethod::RsaSha1);
		assert!(matches!(consumer.key_material(), KeyMaterial::PrivateKey(_)));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove key fixture {}: {e}", path.display())
		});
	}

	#[test]
	fn hmac_configuration_uses_consumer_secret() {
		let config = ClientConfig::from_json_str(
			r#"{
				"consumer_key": "dpf43f3p2l4k3l03",
				"consumer_secret": "kd94hf93k423kf44",
				"signature_method": "HMAC-SHA1",
				"base_url": "https://photos.example.net/",
				"request_token_path": "request_token",
				"authorize_path": "authorize",
				"access_token_path": "access_token",
				"transmission": "query_string",
				"realm": "Photos"
			}"#,
		)
		.expect("HMAC configuration should parse.");
		let consumer = config.consumer_credentials().expect("Consumer credentials should build.");
		let endpoints = config.endpoint_config().expect("Endpoint config should build.");

		assert!(matches!(consumer.key_material(), KeyMaterial::SharedSecret(_)));
		assert_eq!(endpoints.quirks.transmission, TransmissionMode::QueryString);
		assert_eq!(endpoints.quirks.realm.as_deref(), Some("Photos"));
		assert_eq!(
			endpoints.authorization_url("hh5s93j4hdidpola").as_str(),
			"https://photos.example.net/authorize?oauth_token=hh5s93j4hdidpola"
		);
	}

	#[test]
	fn malformed_inline_key_is_a_signature_error() {
		let config = ClientConfig::from_json_str(
			r#"{ "consumer_key": "1234567890", "private_key": "bm90IGEga2V5", "base_url": "http://localhost:8181/" }"#,
		)
		.expect("Configuration should parse.");

		assert!(matches!(
			config.consumer_credentials(),
			Err(Error::Signature(SignatureError::InvalidPrivateKey { .. }))
		));
	}
}
