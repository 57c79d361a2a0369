#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
// self
use oauth1_broker::{
	auth::{AccessCredentials, TemporaryCredentials},
	error::{Error, InvalidArgumentError, ProtocolError},
	obs::FlowStep,
	sign::HttpMethod,
};

const REQUEST_TOKEN_PATH: &str = "/plugins/servlet/oauth/request-token";
const ACCESS_TOKEN_PATH: &str = "/plugins/servlet/oauth/access-token";

#[derive(serde::Deserialize)]
struct Priority {
	name: String,
}

#[tokio::test]
async fn three_legged_flow_yields_access_credentials() {
	let server = MockServer::start_async().await;
	let request_token = server
		.mock_async(|when, then| {
			when.method(POST).path(REQUEST_TOKEN_PATH).header_exists("authorization");
			then.status(200)
				.body("oauth_token=tmp123&oauth_token_secret=sec456&oauth_callback_confirmed=true");
		})
		.await;
	let access_token = server
		.mock_async(|when, then| {
			when.method(POST).path(ACCESS_TOKEN_PATH).header_exists("authorization");
			then.status(200).body("oauth_token=acc789&oauth_token_secret=sec999");
		})
		.await;
	let base_url = server.url("/");
	let client = common::mock_client(common::rsa_consumer(), &base_url);
	let temporary =
		client.request_temporary_credentials().await.expect("Temporary credentials should succeed.");

	assert_eq!(temporary.token, "tmp123");
	assert_eq!(temporary.token_secret.expose(), "sec456");
	assert!(temporary.callback_confirmed);

	let authorize = client.build_authorization_url(&temporary.token);

	assert_eq!(
		authorize.as_str(),
		format!("{base_url}plugins/servlet/oauth/authorize?oauth_token=tmp123")
	);

	let access = client
		.exchange_for_access_credentials(&temporary, "verifier-1")
		.await
		.expect("Access credential exchange should succeed.");

	assert_eq!(access.token, "acc789");
	assert_eq!(access.token_secret.expose(), "sec999");
	assert!(access.extra.is_empty());

	request_token.assert_async().await;
	access_token.assert_async().await;
}

#[tokio::test]
async fn rejected_temporary_request_reports_the_problem() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(REQUEST_TOKEN_PATH);
			then.status(401).body(
				"oauth_problem=consumer_key_unknown&oauth_problem_advice=Register%20the%20consumer",
			);
		})
		.await;
	let client = common::mock_client(common::rsa_consumer(), &server.url("/"));
	let err = client
		.request_temporary_credentials()
		.await
		.expect_err("A 401 response must fail the temporary credential request.");

	assert!(!err.is_retryable());
	assert_eq!(err.http_status(), Some(401));
	assert_eq!(err.step(), Some(FlowStep::TemporaryCredentials));

	match err {
		Error::Protocol(ProtocolError::UnexpectedStatus { problem, advice, .. }) => {
			assert_eq!(problem.as_deref(), Some("consumer_key_unknown"));
			assert_eq!(advice.as_deref(), Some("Register the consumer"));
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn missing_callback_confirmation_is_a_protocol_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(REQUEST_TOKEN_PATH);
			then.status(200).body("oauth_token=tmp123&oauth_token_secret=sec456");
		})
		.await;
	let client = common::mock_client(common::rsa_consumer(), &server.url("/"));
	let err = client
		.request_temporary_credentials()
		.await
		.expect_err("Unconfirmed callbacks must be rejected.");

	assert!(matches!(
		err,
		Error::Protocol(ProtocolError::CallbackNotConfirmed { step: FlowStep::TemporaryCredentials })
	));

	mock.assert_async().await;
}

#[tokio::test]
async fn incomplete_credential_response_never_yields_partial_credentials() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(REQUEST_TOKEN_PATH);
			then.status(200).body("oauth_token=tmp123&oauth_callback_confirmed=true");
		})
		.await;
	let client = common::mock_client(common::rsa_consumer(), &server.url("/"));
	let err = client
		.request_temporary_credentials()
		.await
		.expect_err("A response without a token secret must fail.");

	assert!(matches!(
		err,
		Error::Protocol(ProtocolError::MissingField { field: "oauth_token_secret", .. })
	));

	mock.assert_async().await;
}

#[tokio::test]
async fn blank_verifier_fails_before_any_request() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(ACCESS_TOKEN_PATH);
			then.status(200).body("oauth_token=acc789&oauth_token_secret=sec999");
		})
		.await;
	let client = common::mock_client(common::rsa_consumer(), &server.url("/"));
	let temporary = TemporaryCredentials {
		token: "tmp123".into(),
		token_secret: "sec456".into(),
		callback_confirmed: true,
	};

	for verifier in ["", "   "] {
		let err = client
			.exchange_for_access_credentials(&temporary, verifier)
			.await
			.expect_err("Blank verifiers must be rejected.");

		assert!(matches!(err, Error::InvalidArgument(InvalidArgumentError::MissingVerifier)));
	}

	let empty_token = TemporaryCredentials { token: String::new(), ..temporary };
	let err = client
		.exchange_for_access_credentials(&empty_token, "verifier-1")
		.await
		.expect_err("Empty temporary tokens must be rejected.");

	assert!(matches!(err, Error::InvalidArgument(InvalidArgumentError::EmptyToken { .. })));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn rejected_verifier_surfaces_as_protocol_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(ACCESS_TOKEN_PATH);
			then.status(401).body("oauth_problem=token_rejected");
		})
		.await;
	let client = common::mock_client(common::rsa_consumer(), &server.url("/"));
	let temporary = TemporaryCredentials {
		token: "tmp123".into(),
		token_secret: "sec456".into(),
		callback_confirmed: true,
	};
	let err = client
		.exchange_for_access_credentials(&temporary, "wrong")
		.await
		.expect_err("A rejected verifier must fail the exchange.");

	assert_eq!(err.step(), Some(FlowStep::AccessCredentials));
	assert_eq!(err.http_status(), Some(401));
	assert!(!err.is_retryable());

	mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_service_is_a_retryable_transport_error() {
	let listener =
		std::net::TcpListener::bind("127.0.0.1:0").expect("Ephemeral port should be available.");
	let base_url = format!(
		"http://{}/",
		listener.local_addr().expect("Listener should expose its address.")
	);

	drop(listener);

	let client = common::mock_client(common::rsa_consumer(), &base_url);
	let err = client
		.request_temporary_credentials()
		.await
		.expect_err("Connecting to a stopped server must fail.");

	assert!(err.is_retryable(), "Network failures must be retryable: {err:?}.");
	assert_eq!(err.step(), Some(FlowStep::TemporaryCredentials));
}

#[tokio::test]
async fn protected_resource_requests_are_signed_with_access_credentials() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/rest/api/2/priority")
				.header_exists("authorization");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"[{"id":"1","name":"Blocker"},{"id":"2","name":"Critical"}]"#);
		})
		.await;
	let client = common::mock_client(common::rsa_consumer(), &server.url("/"));
	let access = AccessCredentials {
		token: "acc789".into(),
		token_secret: "sec999".into(),
		extra: Default::default(),
	};
	let url = common::url(&server.url("/rest/api/2/priority"));
	let response = client
		.access_protected_resource(HttpMethod::Get, &url, &[], &access)
		.await
		.expect("Signed resource request should succeed.");
	let priorities = response.json::<Vec<Priority>>().expect("Priorities should decode.");

	assert_eq!(response.status, 200);
	assert_eq!(response.content_type.as_deref(), Some("application/json"));
	assert_eq!(
		priorities.iter().map(|priority| priority.name.as_str()).collect::<Vec<_>>(),
		["Blocker", "Critical"]
	);

	mock.assert_async().await;
}

#[tokio::test]
async fn protected_resource_errors_keep_the_status() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/rest/api/2/myself");
			then.status(401)
				.header("www-authenticate", "OAuth realm=\"jira\"")
				.body("oauth_problem=token_expired");
		})
		.await;
	let client = common::mock_client(common::rsa_consumer(), &server.url("/"));
	let access = AccessCredentials {
		token: "acc789".into(),
		token_secret: "sec999".into(),
		extra: Default::default(),
	};
	let url = common::url(&server.url("/rest/api/2/myself"));
	let err = client
		.access_protected_resource(HttpMethod::Get, &url, &[], &access)
		.await
		.expect_err("A 401 resource response must fail.");

	match err {
		Error::Protocol(ProtocolError::UnexpectedStatus { step, status, problem, .. }) => {
			assert_eq!(step, FlowStep::ProtectedResource);
			assert_eq!(status, 401);
			assert_eq!(problem.as_deref(), Some("token_expired"));
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	mock.assert_async().await;
}
