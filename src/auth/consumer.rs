//! Consumer (client) credentials configured once at start-up.

// self
use crate::{
	_prelude::*,
	auth::{ConsumerKey, Secret},
	error::{ConfigError, SignatureError},
	sign::{PrivateKey, SignatureMethod},
};

/// Key material the consumer signs with.
#[derive(Clone, Debug)]
pub enum KeyMaterial {
	/// Shared consumer secret for HMAC and PLAINTEXT (may be empty).
	SharedSecret(Secret),
	/// RSA private key for the RSA methods; the consumer secret is never used.
	PrivateKey(PrivateKey),
}

/// Immutable consumer credentials: key, key material, and the signature method tying them.
#[derive(Clone, Debug)]
pub struct ConsumerCredentials {
	/// Consumer key sent as `oauth_consumer_key`.
	pub key: ConsumerKey,
	/// Signature method applied to every request.
	pub method: SignatureMethod,
	material: KeyMaterial,
}
impl ConsumerCredentials {
	/// Validates that `material` can be used with `method`.
	pub fn new(
		key: impl AsRef<str>,
		material: KeyMaterial,
		method: SignatureMethod,
	) -> Result<Self> {
		let key = ConsumerKey::new(key).map_err(ConfigError::from)?;
		let compatible = match &material {
			KeyMaterial::SharedSecret(_) => !method.uses_private_key(),
			KeyMaterial::PrivateKey(_) => method.uses_private_key(),
		};

		if !compatible {
			return Err(SignatureError::KeyMaterialMismatch {
				method,
				expected: method.expected_material(),
			}
			.into());
		}

		Ok(Self { key, method, material })
	}

	/// HMAC-SHA1 consumer with a shared secret.
	pub fn hmac_sha1(key: impl AsRef<str>, secret: impl Into<Secret>) -> Result<Self> {
		Self::new(key, KeyMaterial::SharedSecret(secret.into()), SignatureMethod::HmacSha1)
	}

	/// RSA consumer decoding `private_key` (PEM or bare base64 DER).
	pub fn rsa(key: impl AsRef<str>, private_key: &str, method: SignatureMethod) -> Result<Self> {
		let private_key = PrivateKey::parse(private_key)?;

		Self::new(key, KeyMaterial::PrivateKey(private_key), method)
	}

	/// Key material used when signing.
	pub fn key_material(&self) -> &KeyMaterial {
		&self.material
	}
}
