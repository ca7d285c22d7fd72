#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use oauth2_omron::{
	client::ReqwestOmronClient, error::Error, oauth2::AccessToken, provider::Omron,
};

fn build_client(server: &MockServer) -> ReqwestOmronClient {
	let provider =
		Omron::new(server.base_url()).expect("Mock authority hostname should be accepted.");

	ReqwestOmronClient::new(provider, "client-omron")
}

#[tokio::test]
async fn revocation_posts_the_token_as_query_parameters() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/connect/revocation")
				.query_param("token", "tok-123")
				.query_param("token_type_hint", "access_token")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200);
		})
		.await;
	let token = AccessToken::new("tok-123".to_owned());
	let response = client.revoke(&token).await.expect("Revocation should succeed.");

	mock.assert_async().await;

	assert_eq!(response.status().as_u16(), 200);
	assert!(response.body().is_empty());
}

#[tokio::test]
async fn non_json_revocation_bodies_pass_through() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/connect/revocation");
			then.status(200).body("revoked");
		})
		.await;
	let token = AccessToken::new("tok-123".to_owned());
	let response = client.revoke(&token).await.expect("Revocation should succeed.");

	assert_eq!(response.body().as_slice(), b"revoked");
}

#[tokio::test]
async fn error_shaped_revocation_bodies_fail() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/connect/revocation");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_token\",\"status\":498}");
		})
		.await;
	let token = AccessToken::new("tok-unknown".to_owned());
	let err = client.revoke(&token).await.expect_err("Revocation should fail.");

	match err {
		Error::IdentityProvider(err) => {
			assert_eq!(err.message, "invalid_token");
			assert_eq!(err.code, 498);
		},
		other => panic!("Expected an identity provider error, got {other:?}."),
	}
}
