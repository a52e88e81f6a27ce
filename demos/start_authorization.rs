//! Builds an authorization redirect for a provider and prints the URL plus the state
//! value the callback handler must retain.

// crates.io
use color_eyre::Result;
use url::Url;
// self
use oauth2_exchange::{
	endpoint::Endpoint,
	flows::{AuthorizationParams, ReqwestTokenClient},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let endpoint = Endpoint::builder("demo-client")
		.authorization_uri(Url::parse("https://provider.example/oauth2/authorize")?)
		.access_token_uri(Url::parse("https://provider.example/oauth2/token")?)
		.redirect_uri(Url::parse("https://my.app/callback")?)
		.scope(["email.read", "profile.read"])
		.build();
	let client = ReqwestTokenClient::new(endpoint)?;
	let params = AuthorizationParams::default().with_random_state().with_access_type("offline");
	let request = client.authorization_request(&params)?;

	println!("Send the user to: {}", request.uri);
	println!("Retain this state for the callback: {}.", request.state.unwrap_or_default());

	Ok(())
}
