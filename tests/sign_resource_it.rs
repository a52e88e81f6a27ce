#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use url::Url;
// self
use oauth2_exchange::{
	error::{Error, ProtocolError},
	sign::{ReqwestResourceExecutor, ResourceRequest, SignedExecutor},
	token::{AccessToken, DRAFT10_TOKEN_TYPE},
};

fn executor() -> SignedExecutor<ReqwestResourceExecutor> {
	SignedExecutor::new(ReqwestResourceExecutor::default())
}

fn resource_url(server: &MockServer) -> Url {
	Url::parse(&server.url("/resource")).expect("Mock resource URL should parse.")
}

#[tokio::test]
async fn bearer_tokens_reach_the_wire_as_authorization_headers() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/resource").header("authorization", "Bearer access-1");
			then.status(200).body("ok");
		})
		.await;
	let request =
		ResourceRequest::get(resource_url(&server)).with_token(AccessToken::bearer("access-1"));
	let response = executor().execute(request).await.expect("Signed GET should succeed.");

	mock.assert_async().await;

	assert_eq!(response.status, 200);
	assert_eq!(response.body, b"ok");
}

#[tokio::test]
async fn draft10_tokens_use_the_oauth_scheme() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/resource").header("authorization", "OAuth access-1");
			then.status(200).body("ok");
		})
		.await;
	let token = AccessToken::bearer("access-1").with_token_type(DRAFT10_TOKEN_TYPE);
	let request = ResourceRequest::get(resource_url(&server)).with_token(token);

	executor().execute(request).await.expect("Draft-10 signed GET should succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn configured_query_param_carries_the_token_instead() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/resource").query_param("oauth_token", "access-1");
			then.status(200).body("ok");
		})
		.await;
	let token = AccessToken::bearer("access-1").with_query_param("oauth_token");
	let request = ResourceRequest::get(resource_url(&server)).with_token(token);

	executor().execute(request).await.expect("Query-signed GET should succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn demanded_signature_fails_before_the_wire() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/resource");
			then.status(200).body("ok");
		})
		.await;
	let request = ResourceRequest::get(resource_url(&server)).require_signature();
	let err = executor().execute(request).await.expect_err("Unsigned strict GET must fail.");

	assert!(matches!(
		err,
		Error::Protocol(ProtocolError { ref message, .. }) if message == "missing oauth2 params"
	));

	mock.assert_hits_async(0).await;
}
