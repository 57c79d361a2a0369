//! Assembly of oauth_* protocol parameters into a [`SignedRequest`].

// std
use std::borrow::Cow;
// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{ConsumerCredentials, Secret},
	error::SignatureError,
	sign::{self, RequestStamp, percent_encode, signature_base_string},
};

/// HTTP methods that can be signed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	#[default]
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
	/// `HEAD`
	Head,
}
impl HttpMethod {
	/// Returns the uppercase method token used in the base string.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Patch => "PATCH",
			HttpMethod::Delete => "DELETE",
			HttpMethod::Head => "HEAD",
		}
	}

	/// Returns `true` when request parameters travel in the query string rather than a form body.
	pub const fn sends_parameters_in_query(self) -> bool {
		matches!(self, HttpMethod::Get | HttpMethod::Head | HttpMethod::Delete)
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Token half of the signing key: the token sent as `oauth_token` plus its secret.
#[derive(Clone, Copy, Debug)]
pub struct TokenRef<'a> {
	/// Value sent as `oauth_token`.
	pub token: &'a str,
	/// Secret combined with the consumer secret for HMAC/PLAINTEXT signatures.
	pub secret: &'a Secret,
}

/// Inputs describing one request to sign.
#[derive(Clone, Copy, Debug)]
pub struct SignatureInput<'a> {
	/// HTTP method.
	pub method: HttpMethod,
	/// Target URL; its query parameters are signed too.
	pub url: &'a Url,
	/// Request parameters sent in the query (GET/HEAD/DELETE) or form body (other methods).
	pub params: &'a [(String, String)],
	/// Token credentials, absent for the temporary credential request.
	pub token: Option<TokenRef<'a>>,
	/// Extra protocol parameters such as `oauth_callback` or `oauth_verifier`.
	pub protocol_params: &'a [(&'static str, &'a str)],
}
impl<'a> SignatureInput<'a> {
	/// Describes a request without token credentials or extra protocol parameters.
	pub fn new(method: HttpMethod, url: &'a Url, params: &'a [(String, String)]) -> Self {
		Self { method, url, params, token: None, protocol_params: &[] }
	}

	/// Attaches token credentials.
	pub fn with_token(mut self, token: TokenRef<'a>) -> Self {
		self.token = Some(token);

		self
	}

	/// Attaches extra protocol parameters.
	pub fn with_protocol_params(mut self, params: &'a [(&'static str, &'a str)]) -> Self {
		self.protocol_params = params;

		self
	}
}

/// A request whose oauth_* parameters, including `oauth_signature`, have been computed.
#[derive(Clone)]
pub struct SignedRequest {
	/// HTTP method that was signed.
	pub method: HttpMethod,
	/// Target URL as supplied (query parameters included).
	pub url: Url,
	/// Request parameters that were signed alongside the URL query.
	pub params: Vec<(String, String)>,
	/// Every oauth_* protocol parameter, `oauth_signature` included.
	pub oauth_params: BTreeMap<String, String>,
	/// Signature base string the signature was computed over.
	pub base_string: String,
}
impl SignedRequest {
	/// Returns the computed `oauth_signature`.
	pub fn signature(&self) -> &str {
		self.oauth_params.get("oauth_signature").map(String::as_str).unwrap_or_default()
	}

	/// Renders the `Authorization` header value (RFC 5849 §3.5.1).
	pub fn authorization_header(&self, realm: Option<&str>) -> String {
		let mut header = String::from("OAuth ");
		let mut first = true;

		if let Some(realm) = realm {
			header.push_str(&format!("realm=\"{}\"", quote_realm(realm)));

			first = false;
		}

		for (name, value) in &self.oauth_params {
			if !first {
				header.push_str(", ");
			}

			header.push_str(&format!("{}=\"{}\"", percent_encode(name), percent_encode(value)));

			first = false;
		}

		header
	}

	/// URL to dispatch: request parameters are appended for query-style methods, and the oauth_*
	/// parameters too when `include_oauth` is set (RFC 5849 §3.5.3).
	pub fn request_url(&self, include_oauth: bool) -> Url {
		let mut url = self.url.clone();
		let query_params = self.method.sends_parameters_in_query() && !self.params.is_empty();

		if query_params || include_oauth {
			let mut pairs = url.query_pairs_mut();

			if query_params {
				pairs.extend_pairs(&self.params);
			}
			if include_oauth {
				pairs.extend_pairs(&self.oauth_params);
			}

			drop(pairs);
		}

		url
	}

	/// Form-encoded body for methods that carry parameters in the entity body.
	pub fn form_body(&self) -> Option<String> {
		if self.method.sends_parameters_in_query() || self.params.is_empty() {
			return None;
		}

		Some(form_urlencoded::Serializer::new(String::new()).extend_pairs(&self.params).finish())
	}
}
impl Debug for SignedRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let oauth_params = self
			.oauth_params
			.iter()
			.map(|(name, value)| {
				let value = if name == "oauth_signature" { "<redacted>" } else { value.as_str() };

				(name.as_str(), value)
			})
			.collect::<BTreeMap<_, _>>();

		f.debug_struct("SignedRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("params", &self.params)
			.field("oauth_params", &oauth_params)
			.finish()
	}
}

/// Signs `input` on behalf of `consumer` using the nonce and timestamp from `stamp`.
pub fn sign(
	consumer: &ConsumerCredentials,
	input: SignatureInput<'_>,
	stamp: RequestStamp,
) -> Result<SignedRequest, SignatureError> {
	let mut oauth_params = BTreeMap::new();

	oauth_params.insert("oauth_consumer_key".to_owned(), consumer.key.to_string());
	oauth_params.insert("oauth_nonce".to_owned(), stamp.nonce);
	oauth_params.insert("oauth_signature_method".to_owned(), consumer.method.as_str().to_owned());
	oauth_params.insert("oauth_timestamp".to_owned(), stamp.timestamp.to_string());
	oauth_params.insert("oauth_version".to_owned(), sign::OAUTH_VERSION.to_owned());

	if let Some(token) = input.token {
		oauth_params.insert("oauth_token".to_owned(), token.token.to_owned());
	}

	for (name, value) in input.protocol_params {
		oauth_params.insert((*name).to_owned(), (*value).to_owned());
	}

	let signed_params = input
		.params
		.iter()
		.cloned()
		.chain(oauth_params.iter().map(|(name, value)| (name.clone(), value.clone())))
		.collect::<Vec<_>>();
	let base_string = signature_base_string(input.method, input.url, &signed_params);
	let signature = sign::sign_base_string(
		consumer.method,
		consumer.key_material(),
		input.token.map(|token| token.secret),
		&base_string,
	)?;

	oauth_params.insert("oauth_signature".to_owned(), signature);

	Ok(SignedRequest {
		method: input.method,
		url: input.url.clone(),
		params: input.params.to_vec(),
		oauth_params,
		base_string,
	})
}

/// Escapes `"` and `\` so the realm stays a single quoted-string (RFC 2617 §1.2).
fn quote_realm(realm: &str) -> Cow<'_, str> {
	if !realm.contains(['"', '\\']) {
		return Cow::Borrowed(realm);
	}

	let mut quoted = String::with_capacity(realm.len() + 2);

	for c in realm.chars() {
		if matches!(c, '"' | '\\') {
			quoted.push('\\');
		}

		quoted.push(c);
	}

	Cow::Owned(quoted)
}
