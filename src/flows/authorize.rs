//! Authorization redirect construction.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{_prelude::*, endpoint::Endpoint, flows::Client, http::TokenTransport};

const STATE_LEN: usize = 32;

/// Optional parameters merged into the authorization redirect query.
#[derive(Clone, Debug, Default)]
pub struct AuthorizationParams {
	/// Opaque anti-CSRF value echoed back on the redirect callback.
	pub state: Option<String>,
	/// Provider hint controlling offline/online access (e.g. `offline`).
	pub access_type: Option<String>,
	/// Re-consent prompts, joined by single spaces when sent.
	pub prompt: Vec<String>,
	/// Asks the provider to include previously granted scopes.
	pub include_granted_scopes: Option<bool>,
	/// Pre-fills the provider's account chooser with a known identifier.
	pub login_hint: Option<String>,
}
impl AuthorizationParams {
	/// Sets the anti-CSRF state value.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Generates and sets a fresh [`random_state`] value.
	pub fn with_random_state(self) -> Self {
		self.with_state(random_state())
	}

	/// Sets the `access_type` hint.
	pub fn with_access_type(mut self, access_type: impl Into<String>) -> Self {
		self.access_type = Some(access_type.into());

		self
	}

	/// Replaces the re-consent prompts.
	pub fn with_prompt<I, S>(mut self, prompt: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.prompt = prompt.into_iter().map(Into::into).collect();

		self
	}

	/// Sets the `include_granted_scopes` flag.
	pub fn with_include_granted_scopes(mut self, include: bool) -> Self {
		self.include_granted_scopes = Some(include);

		self
	}

	/// Sets the `login_hint` value.
	pub fn with_login_hint(mut self, hint: impl Into<String>) -> Self {
		self.login_hint = Some(hint.into());

		self
	}
}

/// Redirect handed to the user agent, plus the echoes callers must retain to validate
/// the callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	/// Fully-formed authorize URL that callers should send end-users to.
	pub uri: Url,
	/// Requested scopes, echoed from the endpoint configuration.
	pub scope: Vec<String>,
	/// State supplied when the redirect was built, if any.
	pub state: Option<String>,
}

impl<T> Client<T>
where
	T: ?Sized + TokenTransport,
{
	/// Builds the authorization redirect for this client's endpoint.
	pub fn authorization_request(
		&self,
		params: &AuthorizationParams,
	) -> Result<AuthorizationRequest> {
		build_authorization_request(&self.endpoint, params)
	}
}

/// Builds the redirect URI for user approval.
///
/// Pure transform with no side effects: the parameters are merged onto any query
/// already present on the configured authorization URI.
pub fn build_authorization_request(
	endpoint: &Endpoint,
	params: &AuthorizationParams,
) -> Result<AuthorizationRequest> {
	let base = endpoint.require_authorization_uri()?;
	let client_id = endpoint.require_client_id()?;
	let mut uri = base.clone();
	let mut pairs = uri.query_pairs_mut();

	pairs.append_pair("client_id", client_id);

	if let Some(redirect_uri) = &endpoint.redirect_uri {
		pairs.append_pair("redirect_uri", redirect_uri.as_str());
	}

	pairs.append_pair("response_type", "code");

	if let Some(state) = &params.state {
		pairs.append_pair("state", state);
	}
	if let Some(access_type) = &params.access_type {
		pairs.append_pair("access_type", access_type);
	}
	if !endpoint.scope.is_empty() {
		pairs.append_pair("scope", &endpoint.scope.join(" "));
	}
	if !params.prompt.is_empty() {
		pairs.append_pair("prompt", &params.prompt.join(" "));
	}
	if let Some(include) = params.include_granted_scopes {
		pairs.append_pair("include_granted_scopes", if include { "true" } else { "false" });
	}
	if let Some(login_hint) = &params.login_hint {
		pairs.append_pair("login_hint", login_hint);
	}

	drop(pairs);

	Ok(AuthorizationRequest { uri, scope: endpoint.scope.clone(), state: params.state.clone() })
}

/// Generates a 32-character alphanumeric anti-CSRF state value.
pub fn random_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ConfigError;

	fn endpoint() -> Endpoint {
		Endpoint::builder("foo")
			.authorization_uri(
				Url::parse("http://localhost:18080/auth")
					.expect("Authorization URI fixture should parse."),
			)
			.redirect_uri(Url::parse("http://my.host/cb").expect("Redirect fixture should parse."))
			.scope(["foo", "bar"])
			.build()
	}

	#[test]
	fn redirect_query_decomposes_to_expected_pairs() {
		let params = AuthorizationParams::default().with_state("bazqux");
		let request = build_authorization_request(&endpoint(), &params)
			.expect("Redirect should build with URI and client id present.");
		let uri = &request.uri;

		assert_eq!(uri.scheme(), "http");
		assert_eq!(uri.host_str(), Some("localhost"));
		assert_eq!(uri.port(), Some(18080));
		assert_eq!(uri.path(), "/auth");

		let query: BTreeMap<_, _> = uri.query_pairs().collect();

		assert_eq!(query.len(), 5);
		assert_eq!(query.get("response_type").map(AsRef::as_ref), Some("code"));
		assert_eq!(query.get("client_id").map(AsRef::as_ref), Some("foo"));
		assert_eq!(query.get("redirect_uri").map(AsRef::as_ref), Some("http://my.host/cb"));
		assert_eq!(query.get("scope").map(AsRef::as_ref), Some("foo bar"));
		assert_eq!(query.get("state").map(AsRef::as_ref), Some("bazqux"));
		assert_eq!(request.scope, vec!["foo".to_string(), "bar".to_string()]);
		assert_eq!(request.state.as_deref(), Some("bazqux"));
	}

	#[test]
	fn existing_query_is_preserved() {
		let mut endpoint = endpoint();

		endpoint.authorization_uri = Some(
			Url::parse("http://localhost:18080/auth?tenant=acme")
				.expect("Authorization URI fixture should parse."),
		);

		let request = build_authorization_request(&endpoint, &AuthorizationParams::default())
			.expect("Redirect should build with a pre-populated query.");
		let query: BTreeMap<_, _> = request.uri.query_pairs().collect();

		assert_eq!(query.get("tenant").map(AsRef::as_ref), Some("acme"));
		assert_eq!(query.get("client_id").map(AsRef::as_ref), Some("foo"));
	}

	#[test]
	fn optional_hints_are_space_joined() {
		let params = AuthorizationParams::default()
			.with_access_type("offline")
			.with_prompt(["consent", "select_account"])
			.with_include_granted_scopes(true)
			.with_login_hint("user@example.com");
		let request = build_authorization_request(&endpoint(), &params)
			.expect("Redirect should build with hints present.");
		let query: BTreeMap<_, _> = request.uri.query_pairs().collect();

		assert_eq!(query.get("access_type").map(AsRef::as_ref), Some("offline"));
		assert_eq!(query.get("prompt").map(AsRef::as_ref), Some("consent select_account"));
		assert_eq!(query.get("include_granted_scopes").map(AsRef::as_ref), Some("true"));
		assert_eq!(query.get("login_hint").map(AsRef::as_ref), Some("user@example.com"));
	}

	#[test]
	fn missing_required_fields_fail_before_building() {
		let err = build_authorization_request(
			&Endpoint::builder("foo").build(),
			&AuthorizationParams::default(),
		)
		.expect_err("Missing authorization URI must be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::MissingAuthorizationUri)));

		let mut endpoint = endpoint();

		endpoint.client_id = String::new();

		let err = build_authorization_request(&endpoint, &AuthorizationParams::default())
			.expect_err("Empty client id must be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::MissingClientId)));
	}

	#[test]
	fn random_state_is_alphanumeric() {
		let state = random_state();

		assert_eq!(state.len(), STATE_LEN);
		assert!(state.chars().all(|ch| ch.is_ascii_alphanumeric()));
		assert_ne!(state, random_state());
	}
}
