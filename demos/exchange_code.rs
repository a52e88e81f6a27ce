//! Exchanges an authorization code against a mock provider and prints the resulting
//! access token fields.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use oauth2_exchange::{endpoint::Endpoint, flows::ReqwestTokenClient, grant::ExchangeParams};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let endpoint = Endpoint::builder("demo-client")
		.client_secret("super-secret")
		.authorization_uri(Url::parse(&server.url("/authorize"))?)
		.access_token_uri(Url::parse(&server.url("/token"))?)
		.redirect_uri(Url::parse("https://my.app/callback")?)
		.build();
	let client = ReqwestTokenClient::new(endpoint)?;
	let token =
		client.exchange_token(ExchangeParams::authorization_code("demo-code"), None).await?;

	println!("Access token: {}.", token.access_token.expose());
	println!("Token type: {}.", token.token_type);

	token_mock.assert_async().await;

	Ok(())
}
