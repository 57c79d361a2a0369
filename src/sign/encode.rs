//! Percent-encoding, parameter normalization, and the signature base string.

// std
use std::borrow::Cow;
// self
use crate::{_prelude::*, sign::HttpMethod};

/// Percent-encodes `value` per RFC 5849 §3.6.
///
/// Unreserved characters (`A-Z`, `a-z`, `0-9`, `-`, `.`, `_`, `~`) pass through; every other
/// UTF-8 byte becomes an uppercase `%XX` triplet.
pub fn percent_encode(value: &str) -> Cow<'_, str> {
	urlencoding::encode(value)
}

/// Builds the base string URI (RFC 5849 §3.4.1.2): scheme and host in lowercase, default ports
/// omitted, query and fragment dropped.
pub fn base_string_uri(url: &Url) -> String {
	let mut uri = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());

	if let Some(port) = url.port() {
		uri.push(':');
		uri.push_str(&port.to_string());
	}

	uri.push_str(url.path());

	uri
}

/// Normalizes request parameters (RFC 5849 §3.4.1.3.2).
///
/// Names and values are encoded, sorted by name and then by value (byte order of the encoded
/// form), and joined as `name=value` pairs separated by `&`. The result does not depend on the
/// order of `params`.
pub fn normalize_parameters<'a, I>(params: I) -> String
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let mut encoded = params
		.into_iter()
		.map(|(name, value)| (percent_encode(name).into_owned(), percent_encode(value).into_owned()))
		.collect::<Vec<_>>();

	encoded.sort();

	let mut buf = String::new();

	for (idx, (name, value)) in encoded.iter().enumerate() {
		if idx > 0 {
			buf.push('&');
		}

		buf.push_str(name);
		buf.push('=');
		buf.push_str(value);
	}

	buf
}

/// Builds the signature base string (RFC 5849 §3.4.1.1).
///
/// `params` must already contain every oauth_* protocol parameter except `oauth_signature`;
/// query parameters embedded in `url` are folded in automatically.
pub fn signature_base_string(method: HttpMethod, url: &Url, params: &[(String, String)]) -> String {
	let query = url.query_pairs().collect::<Vec<_>>();
	let normalized = normalize_parameters(
		query
			.iter()
			.map(|(name, value)| (name.as_ref(), value.as_ref()))
			.chain(params.iter().map(|(name, value)| (name.as_str(), value.as_str()))),
	);

	format!(
		"{}&{}&{}",
		method.as_str(),
		percent_encode(&base_string_uri(url)),
		percent_encode(&normalized)
	)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("URL fixture should parse successfully.")
	}

	#[test]
	fn percent_encode_keeps_unreserved_characters_only() {
		assert_eq!(percent_encode("abcXYZ019-._~"), "abcXYZ019-._~");
		assert_eq!(percent_encode("a b&c=d+e/f"), "a%20b%26c%3Dd%2Be%2Ff");
		assert_eq!(percent_encode("\u{2713}"), "%E2%9C%93");
	}

	#[test]
	fn base_string_uri_normalizes_scheme_host_and_port() {
		assert_eq!(
			base_string_uri(&url("HTTP://EXAMPLE.com:80/r%20v/X?id=123#frag")),
			"http://example.com/r%20v/X"
		);
		assert_eq!(
			base_string_uri(&url("https://www.example.net:8080/?q=1")),
			"https://www.example.net:8080/"
		);
		assert_eq!(base_string_uri(&url("https://example.com:443/a")), "https://example.com/a");
	}

	#[test]
	fn normalization_is_independent_of_input_order() {
		let forward = normalize_parameters([("b", "2"), ("a", "3"), ("a", "1"), ("c", "")]);
		let reverse = normalize_parameters([("c", ""), ("a", "1"), ("a", "3"), ("b", "2")]);

		assert_eq!(forward, "a=1&a=3&b=2&c=");
		assert_eq!(forward, reverse);
	}

	#[test]
	fn normalization_sorts_on_encoded_names() {
		// Byte order: uppercase before lowercase, `~` (unencoded) last.
		let normalized = normalize_parameters([("~x", "1"), ("a b", "2"), ("Z", "3")]);

		assert_eq!(normalized, "Z=3&a%20b=2&~x=1");
	}

	#[test]
	fn base_string_merges_query_parameters() {
		let base = signature_base_string(
			HttpMethod::Get,
			&url("http://photos.example.net/photos?size=original&file=vacation.jpg"),
			&[
				("oauth_consumer_key".into(), "dpf43f3p2l4k3l03".into()),
				("oauth_token".into(), "nnch734d00sl2jdk".into()),
				("oauth_signature_method".into(), "HMAC-SHA1".into()),
				("oauth_timestamp".into(), "1191242096".into()),
				("oauth_nonce".into(), "kllo9940pd9333jh".into()),
				("oauth_version".into(), "1.0".into()),
			],
		);

		assert_eq!(
			base,
			"GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg%26oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096%26oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal"
		);
	}
}
