//! Temporary and access credentials issued by the service provider.

// self
use crate::{_prelude::*, auth::Secret, sign::TokenRef};

/// Short-lived credentials returned by the temporary credential request (RFC 5849 §2.1).
///
/// Values only come from parsing a service response or from a credential store that saved one,
/// so a pair is never fabricated client-side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryCredentials {
	/// Temporary token (`oauth_token`).
	pub token: String,
	/// Temporary token secret (`oauth_token_secret`).
	pub token_secret: Secret,
	/// Whether the service echoed `oauth_callback_confirmed=true`.
	#[serde(default)]
	pub callback_confirmed: bool,
}
impl TemporaryCredentials {
	/// Token/secret pair used to sign the access credential request.
	pub fn as_token_ref(&self) -> TokenRef<'_> {
		TokenRef { token: &self.token, secret: &self.token_secret }
	}
}

/// Long-lived credentials authorizing API calls on behalf of the resource owner (RFC 5849 §2.3).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCredentials {
	/// Access token (`oauth_token`).
	pub token: String,
	/// Access token secret (`oauth_token_secret`).
	pub token_secret: Secret,
	/// Additional parameters returned alongside the token (for example `user_id`).
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub extra: BTreeMap<String, String>,
}
impl AccessCredentials {
	/// Token/secret pair used to sign protected resource requests.
	pub fn as_token_ref(&self) -> TokenRef<'_> {
		TokenRef { token: &self.token, secret: &self.token_secret }
	}
}
