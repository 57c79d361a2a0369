//! Walks the three-legged flow against a Jira (or any Atlassian) application link.
//!
//! ```sh
//! cargo run --example jira_flow -- config.json
//! ```
//!
//! The configuration names the consumer key, the RSA private key registered with the
//! application link, and the Jira base URL (see [`ClientConfig`]). The demo prints the
//! authorization URL, waits for the callback URL the browser was redirected to, lists the issue
//! priorities with the resulting access credentials, and finally signs the session out.

// std
use std::{env, io};
// crates.io
use color_eyre::{Result, eyre::eyre};
use url::Url;
// self
use oauth1_broker::{
	auth::SessionId,
	config::ClientConfig,
	flows::CallbackParams,
	sign::HttpMethod,
	store::MemoryStore,
};

#[derive(Debug, serde::Deserialize)]
struct Priority {
	id: String,
	name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let path = env::args().nth(1).ok_or_else(|| eyre!("Usage: jira_flow <config.json>."))?;
	let config = ClientConfig::load(&path)?;
	let client = config.build_client()?;
	let store = MemoryStore::default();
	let session = SessionId::generate();
	let authorize = client.begin_authorization(&store, &session).await?;

	println!("Session state: {:?}.", client.session_state(&store, &session).await?);
	println!("Open {authorize} and approve the request.");
	println!("Then paste the URL the browser was redirected to (or the verifier shown):");

	let mut line = String::new();

	io::stdin().read_line(&mut line)?;

	let line = line.trim();
	let callback = match Url::parse(line) {
		Ok(url) => CallbackParams::from_url(&url),
		Err(_) => CallbackParams::new(authorize_token(&authorize)?, line),
	};
	let access = client.complete_authorization(&store, &session, &callback).await?;

	println!("Authorized with access token {}.", access.token);

	let url = client.endpoints.base_url.join("rest/api/2/priority")?;
	let response = client.access_protected_resource(HttpMethod::Get, &url, &[], &access).await?;

	for priority in response.json::<Vec<Priority>>()? {
		println!("{:>4}  {}", priority.id, priority.name);
	}

	client.reset(&store, &session).await?;

	println!("Session state after sign-out: {:?}.", client.session_state(&store, &session).await?);

	Ok(())
}

fn authorize_token(authorize: &Url) -> Result<String> {
	authorize
		.query_pairs()
		.find(|(name, _)| name == "oauth_token")
		.map(|(_, value)| value.into_owned())
		.ok_or_else(|| eyre!("Authorization URL does not carry the temporary token."))
}
