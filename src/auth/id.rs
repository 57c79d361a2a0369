//! Strongly typed identifiers used for consumer keys and credential-store sessions.

// std
use std::{borrow::Borrow, ops::Deref};
// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $allowed:path) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view, $allowed)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value, $allowed)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 256;
const GENERATED_SESSION_LEN: usize = 40;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (consumer key, session).
		kind: &'static str,
	},
	/// The identifier contains a character its kind does not allow.
	#[error("{kind} identifier contains the disallowed character {character:?}.")]
	InvalidCharacter {
		/// Kind of identifier (consumer key, session).
		kind: &'static str,
		/// First offending character.
		character: char,
	},
	/// The identifier exceeded the allowed length.
	#[error("{kind} identifier exceeds {max} bytes.")]
	TooLong {
		/// Kind of identifier (consumer key, session).
		kind: &'static str,
		/// Maximum permitted length in bytes.
		max: usize,
	},
}

def_id! {
	ConsumerKey,
	"Consumer key registered with the service provider; any printable text without whitespace.",
	"ConsumerKey",
	is_consumer_key_char
}
def_id! {
	SessionId,
	"Server-issued session identifier keying the credential store; restricted to RFC 3986 \
	 unreserved characters so it can travel in a cookie or URL unescaped.",
	"Session",
	is_session_char
}

impl SessionId {
	/// Issues a fresh random session identifier suitable for a session cookie.
	pub fn generate() -> Self {
		let value = rand::rng()
			.sample_iter(Alphanumeric)
			.take(GENERATED_SESSION_LEN)
			.map(char::from)
			.collect();

		Self(value)
	}
}

fn is_consumer_key_char(c: char) -> bool {
	!c.is_whitespace() && !c.is_control()
}

fn is_session_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

fn validate_view(
	kind: &'static str,
	view: &str,
	allowed: fn(char) -> bool,
) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if let Some(character) = view.chars().find(|c| !allowed(*c)) {
		return Err(IdentifierError::InvalidCharacter { kind, character });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}
