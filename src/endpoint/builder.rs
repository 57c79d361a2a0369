//! Validating builder for [`EndpointConfig`](crate::endpoint::EndpointConfig).

// self
use crate::{
	_prelude::*,
	endpoint::{DEFAULT_AUTHORIZE_TOKEN_PARAM, EndpointConfig, ServiceQuirks, TransmissionMode},
	sign::HttpMethod,
};

const TOKEN_TEMPLATE: &str = "%s";

/// Errors raised while constructing or validating endpoint configurations.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum EndpointConfigError {
	/// A required endpoint path was never supplied.
	#[error("Missing {endpoint} endpoint path.")]
	MissingPath {
		/// Which endpoint is missing.
		endpoint: &'static str,
	},
	/// A path could not be resolved against the base URL.
	#[error("The {endpoint} endpoint path `{path}` is not a valid URL.")]
	InvalidUrl {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Path that failed to resolve.
		path: String,
		/// Underlying parse failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTP or HTTPS.
	#[error("The {endpoint} endpoint must use HTTP or HTTPS: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The base URL cannot carry relative paths (for example `mailto:`).
	#[error("The base URL cannot be used as a base: {url}.")]
	CannotBeABase {
		/// Base URL that failed validation.
		url: String,
	},
	/// The authorize path carries more than one token placeholder.
	#[error("The authorize path may contain at most one `%s` token placeholder.")]
	AmbiguousTokenTemplate,
	/// The realm is blank.
	#[error("Realm must not be blank.")]
	BlankRealm,
}

/// Builder for [`EndpointConfig`] values.
#[derive(Debug)]
pub struct EndpointConfigBuilder {
	/// Base URL every path is resolved against.
	pub base_url: Url,
	/// Temporary credential request path.
	pub request_token_path: Option<String>,
	/// Authorization path, optionally with a `name=%s` token template.
	pub authorize_path: Option<String>,
	/// Token credential request path.
	pub access_token_path: Option<String>,
	/// Callback URL; `None` means out-of-band.
	pub callback_url: Option<Url>,
	/// Service-specific quirks.
	pub quirks: ServiceQuirks,
}
impl EndpointConfigBuilder {
	/// Creates a new builder rooted at `base_url`.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			request_token_path: None,
			authorize_path: None,
			access_token_path: None,
			callback_url: None,
			quirks: ServiceQuirks::default(),
		}
	}

	/// Sets the temporary credential request path.
	pub fn request_token_path(mut self, path: impl Into<String>) -> Self {
		self.request_token_path = Some(path.into());

		self
	}

	/// Sets the authorization path.
	pub fn authorize_path(mut self, path: impl Into<String>) -> Self {
		self.authorize_path = Some(path.into());

		self
	}

	/// Sets the token credential request path.
	pub fn access_token_path(mut self, path: impl Into<String>) -> Self {
		self.access_token_path = Some(path.into());

		self
	}

	/// Sets the callback URL announced during the temporary credential request.
	pub fn callback_url(mut self, url: Url) -> Self {
		self.callback_url = Some(url);

		self
	}

	/// Overrides all quirks at once.
	pub fn quirks(mut self, quirks: ServiceQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Overrides the HTTP method used for token requests.
	pub fn token_request_method(mut self, method: HttpMethod) -> Self {
		self.quirks.token_request_method = method;

		self
	}

	/// Overrides how protocol parameters are transmitted.
	pub fn transmission(mut self, transmission: TransmissionMode) -> Self {
		self.quirks.transmission = transmission;

		self
	}

	/// Sets the Authorization header realm.
	pub fn realm(mut self, realm: impl Into<String>) -> Self {
		self.quirks.realm = Some(realm.into());

		self
	}

	/// Toggles the `oauth_callback_confirmed` requirement.
	pub fn require_callback_confirmed(mut self, required: bool) -> Self {
		self.quirks.require_callback_confirmed = required;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<EndpointConfig, EndpointConfigError> {
		let base_url = normalize_base(self.base_url)?;
		let request_token_url =
			resolve(&base_url, "request-token", self.request_token_path.as_deref())?;
		let access_token_url =
			resolve(&base_url, "access-token", self.access_token_path.as_deref())?;
		let (authorize_url, authorize_token_param) =
			split_token_template(resolve(&base_url, "authorize", self.authorize_path.as_deref())?)?;

		if let Some(callback) = self.callback_url.as_ref() {
			validate_scheme("callback", callback)?;
		}
		if self.quirks.realm.as_deref().is_some_and(|realm| realm.trim().is_empty()) {
			return Err(EndpointConfigError::BlankRealm);
		}

		Ok(EndpointConfig {
			base_url,
			request_token_url,
			access_token_url,
			callback_url: self.callback_url,
			quirks: self.quirks,
			authorize_url,
			authorize_token_param,
		})
	}
}

fn normalize_base(mut base: Url) -> Result<Url, EndpointConfigError> {
	if base.cannot_be_a_base() {
		return Err(EndpointConfigError::CannotBeABase { url: base.to_string() });
	}

	validate_scheme("base", &base)?;

	if !base.path().ends_with('/') {
		let path = format!("{}/", base.path());

		base.set_path(&path);
	}

	base.set_query(None);
	base.set_fragment(None);

	Ok(base)
}

fn resolve(
	base: &Url,
	endpoint: &'static str,
	path: Option<&str>,
) -> Result<Url, EndpointConfigError> {
	let path = path.ok_or(EndpointConfigError::MissingPath { endpoint })?;
	let url = base.join(path).map_err(|source| EndpointConfigError::InvalidUrl {
		endpoint,
		path: path.to_owned(),
		source,
	})?;

	validate_scheme(endpoint, &url)?;

	Ok(url)
}

fn validate_scheme(endpoint: &'static str, url: &Url) -> Result<(), EndpointConfigError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(EndpointConfigError::UnsupportedScheme { endpoint, url: url.to_string() }),
	}
}

// Strips a `name=%s` pair from the authorize URL and remembers `name` as the token parameter.
fn split_token_template(mut url: Url) -> Result<(Url, String), EndpointConfigError> {
	let mut token_param = None;
	let mut kept = Vec::new();

	for (name, value) in url.query_pairs() {
		if value == TOKEN_TEMPLATE {
			if token_param.is_some() {
				return Err(EndpointConfigError::AmbiguousTokenTemplate);
			}

			token_param = Some(name.into_owned());
		} else {
			kept.push((name.into_owned(), value.into_owned()));
		}
	}

	if token_param.is_some() {
		url.set_query(None);

		if !kept.is_empty() {
			url.query_pairs_mut().extend_pairs(&kept);
		}
	}

	Ok((url, token_param.unwrap_or_else(|| DEFAULT_AUTHORIZE_TOKEN_PARAM.to_owned())))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn builder() -> EndpointConfigBuilder {
		EndpointConfig::atlassian(
			Url::parse("https://jira.example.com").expect("Base URL fixture should parse."),
		)
	}

	#[test]
	fn missing_paths_are_rejected() {
		let err = EndpointConfig::builder(
			Url::parse("https://jira.example.com").expect("Base URL fixture should parse."),
		)
		.request_token_path("oauth/request_token")
		.build()
		.expect_err("Builder should reject missing paths.");

		assert_eq!(err, EndpointConfigError::MissingPath { endpoint: "access-token" });
	}

	#[test]
	fn non_http_schemes_are_rejected() {
		let err = builder()
			.callback_url(Url::parse("ftp://files.example.com/cb").expect("URL should parse."))
			.build()
			.expect_err("Builder should reject FTP callbacks.");

		assert!(matches!(err, EndpointConfigError::UnsupportedScheme { endpoint: "callback", .. }));

		let err = EndpointConfig::atlassian(
			Url::parse("mailto:jira@example.com").expect("URL should parse."),
		)
		.build()
		.expect_err("Builder should reject non-base URLs.");

		assert!(matches!(err, EndpointConfigError::CannotBeABase { .. }));
	}

	#[test]
	fn custom_token_parameter_is_honored() {
		let config = builder()
			.authorize_path("authorize?requestToken=%s&lang=en")
			.build()
			.expect("Endpoint config should build.");

		assert_eq!(
			config.authorization_url("tmp 123").as_str(),
			"https://jira.example.com/authorize?lang=en&requestToken=tmp+123"
		);
	}

	#[test]
	fn duplicate_templates_and_blank_realms_are_rejected() {
		assert_eq!(
			builder().authorize_path("authorize?a=%s&b=%s").build(),
			Err(EndpointConfigError::AmbiguousTokenTemplate)
		);
		assert_eq!(builder().realm("  ").build(), Err(EndpointConfigError::BlankRealm));
	}

	#[test]
	fn quirk_setters_apply() {
		let config = builder()
			.token_request_method(HttpMethod::Get)
			.transmission(TransmissionMode::QueryString)
			.realm("Jira")
			.require_callback_confirmed(false)
			.build()
			.expect("Endpoint config should build.");

		assert_eq!(config.quirks.token_request_method, HttpMethod::Get);
		assert_eq!(config.quirks.transmission, TransmissionMode::QueryString);
		assert_eq!(config.quirks.realm.as_deref(), Some("Jira"));
		assert!(!config.quirks.require_callback_confirmed);
	}
}
