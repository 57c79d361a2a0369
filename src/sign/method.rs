//! Signature methods and the primitive that turns a base string into `oauth_signature`.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use rsa::Pkcs1v15Sign;
use sha1::{Digest, Sha1};
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	auth::{KeyMaterial, Secret},
	error::SignatureError,
	sign::percent_encode,
};

/// Signature methods understood by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureMethod {
	/// HMAC-SHA1 keyed with `consumer_secret&token_secret` (RFC 5849 §3.4.2).
	#[serde(rename = "HMAC-SHA1")]
	HmacSha1,
	/// HMAC-SHA256, same key construction as HMAC-SHA1.
	#[serde(rename = "HMAC-SHA256")]
	HmacSha256,
	/// RSASSA-PKCS1-v1_5 over SHA-1 with the consumer's private key (RFC 5849 §3.4.3).
	#[serde(rename = "RSA-SHA1")]
	RsaSha1,
	/// RSASSA-PKCS1-v1_5 over SHA-256 with the consumer's private key.
	#[serde(rename = "RSA-SHA256")]
	RsaSha256,
	/// The signing key itself, only safe over TLS (RFC 5849 §3.4.4).
	#[serde(rename = "PLAINTEXT")]
	Plaintext,
}
impl SignatureMethod {
	/// Returns the `oauth_signature_method` wire value.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignatureMethod::HmacSha1 => "HMAC-SHA1",
			SignatureMethod::HmacSha256 => "HMAC-SHA256",
			SignatureMethod::RsaSha1 => "RSA-SHA1",
			SignatureMethod::RsaSha256 => "RSA-SHA256",
			SignatureMethod::Plaintext => "PLAINTEXT",
		}
	}

	/// Returns `true` for methods that sign with an RSA private key.
	pub const fn uses_private_key(self) -> bool {
		matches!(self, SignatureMethod::RsaSha1 | SignatureMethod::RsaSha256)
	}

	pub(crate) const fn expected_material(self) -> &'static str {
		if self.uses_private_key() { "an RSA private key" } else { "a shared consumer secret" }
	}
}
impl Display for SignatureMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for SignatureMethod {
	type Err = UnknownSignatureMethod;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"HMAC-SHA1" => Ok(Self::HmacSha1),
			"HMAC-SHA256" => Ok(Self::HmacSha256),
			"RSA-SHA1" => Ok(Self::RsaSha1),
			"RSA-SHA256" => Ok(Self::RsaSha256),
			"PLAINTEXT" => Ok(Self::Plaintext),
			_ => Err(UnknownSignatureMethod(s.to_owned())),
		}
	}
}

/// Error returned when parsing an unsupported `oauth_signature_method` label.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Signature method `{0}` is not supported.")]
pub struct UnknownSignatureMethod(pub String);

/// Signs `base_string` with the consumer key material and the optional token secret.
///
/// HMAC and PLAINTEXT derive their key from `enc(consumer_secret)&enc(token_secret)`; RSA ignores
/// both secrets and signs with the private key alone.
pub fn sign_base_string(
	method: SignatureMethod,
	material: &KeyMaterial,
	token_secret: Option<&Secret>,
	base_string: &str,
) -> Result<String, SignatureError> {
	match (method, material) {
		(SignatureMethod::HmacSha1, KeyMaterial::SharedSecret(secret)) => {
			let mut mac = <Hmac<Sha1>>::new_from_slice(signing_key(secret, token_secret).as_bytes())
				.map_err(|_| SignatureError::HmacKey)?;

			mac.update(base_string.as_bytes());

			Ok(STANDARD.encode(mac.finalize().into_bytes()))
		},
		(SignatureMethod::HmacSha256, KeyMaterial::SharedSecret(secret)) => {
			let mut mac =
				<Hmac<Sha256>>::new_from_slice(signing_key(secret, token_secret).as_bytes())
					.map_err(|_| SignatureError::HmacKey)?;

			mac.update(base_string.as_bytes());

			Ok(STANDARD.encode(mac.finalize().into_bytes()))
		},
		(SignatureMethod::Plaintext, KeyMaterial::SharedSecret(secret)) =>
			Ok(signing_key(secret, token_secret)),
		(SignatureMethod::RsaSha1, KeyMaterial::PrivateKey(key)) => {
			let digest = Sha1::digest(base_string.as_bytes());
			let signature = key.rsa().sign(Pkcs1v15Sign::new::<Sha1>(), &digest)?;

			Ok(STANDARD.encode(signature))
		},
		(SignatureMethod::RsaSha256, KeyMaterial::PrivateKey(key)) => {
			let digest = Sha256::digest(base_string.as_bytes());
			let signature = key.rsa().sign(Pkcs1v15Sign::new::<Sha256>(), &digest)?;

			Ok(STANDARD.encode(signature))
		},
		(method, _) => Err(SignatureError::KeyMaterialMismatch {
			method,
			expected: method.expected_material(),
		}),
	}
}

fn signing_key(consumer_secret: &Secret, token_secret: Option<&Secret>) -> String {
	format!(
		"{}&{}",
		percent_encode(consumer_secret.expose()),
		percent_encode(token_secret.map(Secret::expose).unwrap_or_default())
	)
}
