//! Grant strategies and the open registry that dispatches `grant_type` identifiers.
//!
//! Strategies work on plain form maps so implementations remain HTTP client
//! agnostic; downstream crates register additional grants without touching the
//! built-in ones.

// self
use crate::{_prelude::*, endpoint::Endpoint, error::ConfigError, http::TokenRequest};

/// RFC 6749 identifier for the Authorization Code grant.
pub const AUTHORIZATION_CODE_GRANT: &str = "authorization_code";
/// RFC 6749 identifier for the Resource Owner Password Credentials grant.
pub const PASSWORD_GRANT: &str = "password";
/// RFC 6749 identifier for the Refresh Token grant.
pub const REFRESH_TOKEN_GRANT: &str = "refresh_token";

/// Parameters carried back by the authorization server redirect, or supplied directly
/// by the caller for credential grants.
#[derive(Clone, Debug, Default)]
pub struct ExchangeParams {
	/// Authorization code returned on the redirect callback.
	pub code: Option<String>,
	/// Resource owner username for the password grant.
	pub username: Option<String>,
	/// Resource owner password for the password grant.
	pub password: Option<String>,
	/// State echoed by the authorization server.
	pub state: Option<String>,
	/// Error code returned instead of a grant when the user denied access.
	pub error: Option<String>,
	/// Human-readable description accompanying `error`.
	pub error_description: Option<String>,
}
impl ExchangeParams {
	/// Params for exchanging an authorization code.
	pub fn authorization_code(code: impl Into<String>) -> Self {
		Self { code: Some(code.into()), ..Self::default() }
	}

	/// Params for the resource-owner password credentials grant.
	pub fn resource_owner(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			username: Some(username.into()),
			password: Some(password.into()),
			..Self::default()
		}
	}

	/// Attaches the state echoed on the callback.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}
}

/// Strategy hook that extends token request bodies with grant-specific fields.
pub trait GrantStrategy: Send + Sync {
	/// Identifier the strategy registers under (e.g. `authorization_code`).
	fn grant_type(&self) -> &str;

	/// Extends the token request body for this grant.
	///
	/// Runs before client authentication and before the body is encoded; failures
	/// abort the exchange with no network call.
	fn extend_token_request(
		&self,
		request: &mut TokenRequest,
		endpoint: &Endpoint,
		params: &ExchangeParams,
	) -> Result<(), ConfigError>;
}

/// Open mapping from grant identifiers to strategies.
///
/// New grants are added with [`register`](Self::register) without modifying existing
/// strategies; unregistered identifiers fail with [`ConfigError::UnsupportedGrant`].
#[derive(Clone)]
pub struct GrantRegistry {
	strategies: BTreeMap<String, Arc<dyn GrantStrategy>>,
}
impl GrantRegistry {
	/// Registry with no strategies registered.
	pub fn empty() -> Self {
		Self { strategies: BTreeMap::new() }
	}

	/// Registry preloaded with the `authorization_code` and `password` strategies.
	pub fn standard() -> Self {
		Self::empty().register(Arc::new(AuthorizationCodeGrant)).register(Arc::new(PasswordGrant))
	}

	/// Adds (or replaces) a strategy, keyed by its grant type.
	pub fn register(mut self, strategy: Arc<dyn GrantStrategy>) -> Self {
		self.strategies.insert(strategy.grant_type().to_owned(), strategy);

		self
	}

	/// Resolves the strategy for a grant identifier.
	pub fn resolve(&self, grant: &str) -> Result<&dyn GrantStrategy, ConfigError> {
		self.strategies
			.get(grant)
			.map(|strategy| strategy.as_ref())
			.ok_or_else(|| ConfigError::UnsupportedGrant { grant: grant.to_owned() })
	}
}
impl Default for GrantRegistry {
	fn default() -> Self {
		Self::standard()
	}
}
impl Debug for GrantRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GrantRegistry")
			.field("grants", &self.strategies.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// `authorization_code` strategy: sends the returned code plus the redirect URI.
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthorizationCodeGrant;
impl GrantStrategy for AuthorizationCodeGrant {
	fn grant_type(&self) -> &str {
		AUTHORIZATION_CODE_GRANT
	}

	fn extend_token_request(
		&self,
		request: &mut TokenRequest,
		endpoint: &Endpoint,
		params: &ExchangeParams,
	) -> Result<(), ConfigError> {
		let code = params.code.as_deref().ok_or(ConfigError::MissingAuthorizationCode)?;
		let redirect_uri = endpoint.require_redirect_uri()?;

		request.form.insert("code".into(), code.into());
		request.form.insert("redirect_uri".into(), redirect_uri.to_string());

		Ok(())
	}
}

/// `password` strategy: forwards resource-owner credentials verbatim.
///
/// Absent values are simply not sent; the server reports missing fields itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct PasswordGrant;
impl GrantStrategy for PasswordGrant {
	fn grant_type(&self) -> &str {
		PASSWORD_GRANT
	}

	fn extend_token_request(
		&self,
		request: &mut TokenRequest,
		_endpoint: &Endpoint,
		params: &ExchangeParams,
	) -> Result<(), ConfigError> {
		if let Some(username) = &params.username {
			request.form.insert("username".into(), username.clone());
		}
		if let Some(password) = &params.password {
			request.form.insert("password".into(), password.clone());
		}

		Ok(())
	}
}
