//! Endpoint configuration consumed by every flow.
//!
//! Values typically originate from an external configuration loader. The struct is
//! deliberately permissive: each operation validates only the fields it needs, via
//! the `require_*` accessors, immediately before any network call.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, error::ConfigError, grant::AUTHORIZATION_CODE_GRANT, http::TokenRequest};

/// Client authentication placements for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	/// HTTP Basic `Authorization` header carrying `client_id:client_secret`.
	ClientSecretBasic,
	#[default]
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
}
impl ClientAuthMethod {
	/// Attaches client credentials to a token request under construction.
	///
	/// Exactly one placement applies per request; the variants are mutually exclusive
	/// by configuration.
	pub fn apply(self, endpoint: &Endpoint, request: &mut TokenRequest) -> Result<(), ConfigError> {
		let id = endpoint.require_client_id()?;
		let secret = endpoint.require_client_secret()?;

		match self {
			Self::ClientSecretBasic => {
				request.headers.insert(crate::http::AUTHORIZATION.into(), basic_credentials(id, secret));
			},
			Self::ClientSecretPost => {
				request.form.insert("client_id".into(), id.into());
				request.form.insert("client_secret".into(), secret.into());
			},
		}

		Ok(())
	}
}

/// Encodes `client_id:client_secret` as an RFC 7617 Basic authorization value.
pub fn basic_credentials(client_id: &str, client_secret: &str) -> String {
	format!("Basic {}", STANDARD.encode(format!("{client_id}:{client_secret}")))
}

/// Immutable endpoint configuration consumed by flows.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret for confidential authentication methods.
	#[serde(default)]
	pub client_secret: Option<String>,
	/// Grant identifier dispatched through the grant registry.
	#[serde(default = "default_grant_type")]
	pub grant_type: String,
	/// Authorization endpoint used to build user redirects.
	#[serde(default)]
	pub authorization_uri: Option<Url>,
	/// Token endpoint used for exchanges and refreshes.
	#[serde(default)]
	pub access_token_uri: Option<Url>,
	/// Redirect URI echoed in authorization and exchange requests.
	#[serde(default)]
	pub redirect_uri: Option<Url>,
	/// Requested scopes, in caller order; joined by single spaces when sent.
	#[serde(default)]
	pub scope: Vec<String>,
	/// Query parameter name carrying tokens on signed requests, when configured.
	#[serde(default)]
	pub access_query_param: Option<String>,
	/// Client authentication placement for token endpoint calls.
	#[serde(default)]
	pub client_auth_method: ClientAuthMethod,
}
impl Endpoint {
	/// Creates a new builder seeded with the provided client identifier.
	pub fn builder(client_id: impl Into<String>) -> EndpointBuilder {
		EndpointBuilder::new(client_id)
	}

	/// Returns the client identifier, rejecting empty values.
	pub fn require_client_id(&self) -> Result<&str, ConfigError> {
		if self.client_id.is_empty() {
			Err(ConfigError::MissingClientId)
		} else {
			Ok(&self.client_id)
		}
	}

	/// Returns the client secret required by confidential auth methods.
	pub fn require_client_secret(&self) -> Result<&str, ConfigError> {
		self.client_secret.as_deref().ok_or(ConfigError::MissingClientSecret)
	}

	/// Returns the authorization URI required to build redirects.
	pub fn require_authorization_uri(&self) -> Result<&Url, ConfigError> {
		self.authorization_uri.as_ref().ok_or(ConfigError::MissingAuthorizationUri)
	}

	/// Returns the token URI required for exchanges and refreshes.
	pub fn require_access_token_uri(&self) -> Result<&Url, ConfigError> {
		self.access_token_uri.as_ref().ok_or(ConfigError::MissingAccessTokenUri)
	}

	/// Returns the redirect URI required by the authorization_code grant.
	pub fn require_redirect_uri(&self) -> Result<&Url, ConfigError> {
		self.redirect_uri.as_ref().ok_or(ConfigError::MissingRedirectUri)
	}
}
impl Debug for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Endpoint")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("grant_type", &self.grant_type)
			.field("authorization_uri", &self.authorization_uri)
			.field("access_token_uri", &self.access_token_uri)
			.field("redirect_uri", &self.redirect_uri)
			.field("scope", &self.scope)
			.field("access_query_param", &self.access_query_param)
			.field("client_auth_method", &self.client_auth_method)
			.finish()
	}
}

/// Builder for [`Endpoint`] values.
#[derive(Clone, Debug)]
pub struct EndpointBuilder {
	endpoint: Endpoint,
}
impl EndpointBuilder {
	fn new(client_id: impl Into<String>) -> Self {
		Self {
			endpoint: Endpoint {
				client_id: client_id.into(),
				client_secret: None,
				grant_type: default_grant_type(),
				authorization_uri: None,
				access_token_uri: None,
				redirect_uri: None,
				scope: Vec::new(),
				access_query_param: None,
				client_auth_method: ClientAuthMethod::default(),
			},
		}
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.endpoint.client_secret = Some(secret.into());

		self
	}

	/// Overrides the grant type (defaults to `authorization_code`).
	pub fn grant_type(mut self, grant: impl Into<String>) -> Self {
		self.endpoint.grant_type = grant.into();

		self
	}

	/// Sets the authorization endpoint.
	pub fn authorization_uri(mut self, uri: Url) -> Self {
		self.endpoint.authorization_uri = Some(uri);

		self
	}

	/// Sets the token endpoint.
	pub fn access_token_uri(mut self, uri: Url) -> Self {
		self.endpoint.access_token_uri = Some(uri);

		self
	}

	/// Sets the redirect URI.
	pub fn redirect_uri(mut self, uri: Url) -> Self {
		self.endpoint.redirect_uri = Some(uri);

		self
	}

	/// Replaces the requested scopes, preserving caller order.
	pub fn scope<I, S>(mut self, scope: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.endpoint.scope = scope.into_iter().map(Into::into).collect();

		self
	}

	/// Names the query parameter used to carry tokens on signed requests.
	pub fn access_query_param(mut self, name: impl Into<String>) -> Self {
		self.endpoint.access_query_param = Some(name.into());

		self
	}

	/// Overrides the client authentication placement.
	pub fn client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.endpoint.client_auth_method = method;

		self
	}

	/// Consumes the builder and returns the endpoint configuration.
	pub fn build(self) -> Endpoint {
		self.endpoint
	}
}

fn default_grant_type() -> String {
	AUTHORIZATION_CODE_GRANT.into()
}
