//! Request signing: token-type dispatch plus the scheme signers that decorate
//! outbound resource requests.

pub mod middleware;

pub use middleware::*;

// self
use crate::{
	_prelude::*,
	http::AUTHORIZATION,
	token::{AccessToken, BEARER_TOKEN_TYPE, DRAFT10_TOKEN_TYPE},
};

/// Header scheme used for RFC 6750 bearer tokens.
pub const BEARER_HEADER_SCHEME: &str = "Bearer";
/// Header scheme used by the legacy draft-10 convention.
pub const DRAFT10_HEADER_SCHEME: &str = "OAuth";

/// Outbound resource request decorated by signers before execution.
#[derive(Clone, Debug)]
pub struct ResourceRequest {
	/// HTTP method, upper-cased (e.g. `GET`).
	pub method: String,
	/// Target resource URL.
	pub url: Url,
	/// Request headers as a plain map, HTTP client agnostic.
	pub headers: BTreeMap<String, String>,
	/// Optional request body bytes.
	pub body: Option<Vec<u8>>,
	/// Token context consumed (and stripped) by the signing layer.
	pub token: Option<AccessToken>,
	/// Fail instead of forwarding when no token could be attached.
	pub raise_on_unsigned: bool,
}
impl ResourceRequest {
	/// Creates a request with the provided method.
	pub fn new(method: impl Into<String>, url: Url) -> Self {
		Self {
			method: method.into(),
			url,
			headers: BTreeMap::new(),
			body: None,
			token: None,
			raise_on_unsigned: false,
		}
	}

	/// Creates a GET request for the provided URL.
	pub fn get(url: Url) -> Self {
		Self::new("GET", url)
	}

	/// Attaches the token context consumed by the signing layer.
	pub fn with_token(mut self, token: AccessToken) -> Self {
		self.token = Some(token);

		self
	}

	/// Demands a signature: unsigned requests fail instead of being forwarded.
	pub fn require_signature(mut self) -> Self {
		self.raise_on_unsigned = true;

		self
	}

	/// Sets the request body.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Adds a request header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}
}

/// Outcome signaled by the signing layer after inspecting a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachOutcome {
	/// A token was attached to the request.
	Attached,
	/// The request was left unmodified.
	Skipped,
}

/// Decorates a request with a token of the signer's type.
pub trait TokenSigner: Send + Sync {
	/// Lower-cased token type the signer registers under.
	fn token_type(&self) -> &str;

	/// Attaches the token to the request.
	fn attach(&self, request: &mut ResourceRequest, token: &AccessToken) -> Result<AttachOutcome>;
}

/// Signer placing the token either on a named query parameter (when the token carries
/// one) or on an `Authorization` header with the signer's scheme.
#[derive(Clone, Debug)]
pub struct SchemeSigner {
	token_type: String,
	scheme: String,
}
impl SchemeSigner {
	/// Signer for RFC 6750 `bearer` tokens.
	pub fn bearer() -> Self {
		Self::new(BEARER_TOKEN_TYPE, BEARER_HEADER_SCHEME)
	}

	/// Signer for the legacy `draft-10` convention (header scheme `OAuth`).
	pub fn draft10() -> Self {
		Self::new(DRAFT10_TOKEN_TYPE, DRAFT10_HEADER_SCHEME)
	}

	/// Signer for a custom token type + header scheme pair.
	pub fn new(token_type: impl Into<String>, scheme: impl Into<String>) -> Self {
		Self { token_type: token_type.into().to_lowercase(), scheme: scheme.into() }
	}
}
impl TokenSigner for SchemeSigner {
	fn token_type(&self) -> &str {
		&self.token_type
	}

	fn attach(&self, request: &mut ResourceRequest, token: &AccessToken) -> Result<AttachOutcome> {
		let secret = token.access_token.expose();

		match &token.query_param {
			Some(name) => {
				request.url.query_pairs_mut().append_pair(name, secret);
			},
			None => {
				request.headers.insert(AUTHORIZATION.into(), format!("{} {secret}", self.scheme));
			},
		}

		Ok(AttachOutcome::Attached)
	}
}

/// Open mapping from lower-cased token types to signers; the unknown/absent case is
/// the registry's default path.
#[derive(Clone)]
pub struct SignerRegistry {
	signers: BTreeMap<String, Arc<dyn TokenSigner>>,
}
impl SignerRegistry {
	/// Registry with no signers registered.
	pub fn empty() -> Self {
		Self { signers: BTreeMap::new() }
	}

	/// Registry preloaded with the `bearer` and `draft-10` signers.
	pub fn standard() -> Self {
		Self::empty()
			.register(Arc::new(SchemeSigner::bearer()))
			.register(Arc::new(SchemeSigner::draft10()))
	}

	/// Adds (or replaces) a signer, keyed by its lower-cased token type.
	pub fn register(mut self, signer: Arc<dyn TokenSigner>) -> Self {
		self.signers.insert(signer.token_type().to_lowercase(), signer);

		self
	}

	/// Signs the request in place, consuming its token context.
	///
	/// Returns [`AttachOutcome::Skipped`] when the request carries no token. Unknown
	/// token types fail with [`Error::UnknownTokenType`] when the request demands a
	/// signature and are skipped otherwise, leaving the request unmodified.
	pub fn sign(&self, request: &mut ResourceRequest) -> Result<AttachOutcome> {
		let Some(token) = request.token.take() else {
			return Ok(AttachOutcome::Skipped);
		};

		match self.signers.get(&token.token_type.to_lowercase()) {
			Some(signer) => signer.attach(request, &token),
			None if request.raise_on_unsigned =>
				Err(Error::UnknownTokenType { token_type: token.token_type }),
			None => Ok(AttachOutcome::Skipped),
		}
	}
}
impl Default for SignerRegistry {
	fn default() -> Self {
		Self::standard()
	}
}
impl Debug for SignerRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SignerRegistry")
			.field("token_types", &self.signers.keys().collect::<Vec<_>>())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn resource_url() -> Url {
		Url::parse("http://my.host/resource?page=2").expect("Resource URL fixture should parse.")
	}

	#[test]
	fn bearer_header_placement_leaves_the_query_alone() {
		let mut request = ResourceRequest::get(resource_url())
			.with_token(AccessToken::bearer("abcdef"));
		let outcome = SignerRegistry::standard()
			.sign(&mut request)
			.expect("Bearer signing should succeed.");

		assert_eq!(outcome, AttachOutcome::Attached);
		assert_eq!(request.headers.get(AUTHORIZATION).map(String::as_str), Some("Bearer abcdef"));
		assert_eq!(request.headers.len(), 1);
		assert_eq!(request.url.query(), Some("page=2"));
		assert!(request.token.is_none(), "Signing must strip the token context.");
	}

	#[test]
	fn bearer_type_dispatch_ignores_case() {
		let mut request = ResourceRequest::get(resource_url())
			.with_token(AccessToken::bearer("abcdef").with_token_type("Bearer"));
		let outcome = SignerRegistry::standard()
			.sign(&mut request)
			.expect("Mixed-case token types should dispatch.");

		assert_eq!(outcome, AttachOutcome::Attached);
	}

	#[test]
	fn query_param_placement_adds_one_pair_and_no_header() {
		let token = AccessToken::bearer("abcdef").with_query_param("oauth_token");
		let mut request = ResourceRequest::get(resource_url()).with_token(token);

		SignerRegistry::standard().sign(&mut request).expect("Query signing should succeed.");

		assert_eq!(request.url.query(), Some("page=2&oauth_token=abcdef"));
		assert!(request.headers.is_empty());
	}

	#[test]
	fn draft10_uses_the_oauth_scheme() {
		let token = AccessToken::bearer("abcdef").with_token_type(DRAFT10_TOKEN_TYPE);
		let mut request = ResourceRequest::get(resource_url()).with_token(token);

		SignerRegistry::standard().sign(&mut request).expect("Draft-10 signing should succeed.");

		assert_eq!(request.headers.get(AUTHORIZATION).map(String::as_str), Some("OAuth abcdef"));
	}

	#[test]
	fn absent_token_context_is_skipped() {
		let mut request = ResourceRequest::get(resource_url());
		let outcome = SignerRegistry::standard()
			.sign(&mut request)
			.expect("Tokenless requests should not fail at the signing layer.");

		assert_eq!(outcome, AttachOutcome::Skipped);
		assert!(request.headers.is_empty());
	}

	#[test]
	fn unknown_token_type_is_skipped_unless_a_signature_is_demanded() {
		let token = AccessToken::bearer("abcdef").with_token_type("mac");
		let mut request = ResourceRequest::get(resource_url()).with_token(token.clone());
		let outcome = SignerRegistry::standard()
			.sign(&mut request)
			.expect("Unknown types are skipped by default.");

		assert_eq!(outcome, AttachOutcome::Skipped);
		assert!(request.headers.is_empty());
		assert_eq!(request.url.query(), Some("page=2"));

		let mut request =
			ResourceRequest::get(resource_url()).with_token(token).require_signature();
		let err = SignerRegistry::standard()
			.sign(&mut request)
			.expect_err("Unknown types must fail when a signature is demanded.");

		assert!(matches!(err, Error::UnknownTokenType { ref token_type } if token_type == "mac"));
	}

	#[test]
	fn custom_signers_participate_in_dispatch() {
		let registry = SignerRegistry::standard().register(Arc::new(SchemeSigner::new("MAC", "MAC")));
		let token = AccessToken::bearer("abcdef").with_token_type("mac");
		let mut request = ResourceRequest::get(resource_url()).with_token(token);

		registry.sign(&mut request).expect("Registered custom signer should attach.");

		assert_eq!(request.headers.get(AUTHORIZATION).map(String::as_str), Some("MAC abcdef"));
	}
}
