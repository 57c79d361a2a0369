//! Per-service protocol quirks: token request method, parameter transmission, realm, and
//! callback confirmation.

// self
use crate::{_prelude::*, sign::HttpMethod};

/// Where the oauth_* protocol parameters travel on token requests (RFC 5849 §3.5).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransmissionMode {
	/// `Authorization: OAuth ...` header (§3.5.1).
	#[default]
	AuthorizationHeader,
	/// URL query string (§3.5.3).
	QueryString,
}

/// Service-specific quirks that influence how token requests are sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceQuirks {
	/// HTTP method used for the temporary and access credential requests.
	pub token_request_method: HttpMethod,
	/// How protocol parameters are transmitted.
	pub transmission: TransmissionMode,
	/// Optional `realm` rendered into the Authorization header.
	pub realm: Option<String>,
	/// Reject temporary credentials lacking `oauth_callback_confirmed=true`.
	pub require_callback_confirmed: bool,
}
impl Default for ServiceQuirks {
	fn default() -> Self {
		Self {
			token_request_method: HttpMethod::Post,
			transmission: TransmissionMode::AuthorizationHeader,
			realm: None,
			require_callback_confirmed: true,
		}
	}
}
