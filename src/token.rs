//! Access token models returned by exchanges and consumed by request signing.

pub mod secret;

pub use secret::*;

// self
use crate::_prelude::*;

/// Compatibility fallback applied when a provider omits `token_type`. Legacy draft-10
/// providers predate the RFC 6750 type registry and never send the field.
pub const DRAFT10_TOKEN_TYPE: &str = "draft-10";
/// RFC 6750 bearer token type identifier.
pub const BEARER_TOKEN_TYPE: &str = "bearer";

/// Access token issued by a token endpoint.
///
/// The record is opaque to this crate once returned: no expiry tracking, no storage.
/// Provider fields beyond `access_token` and `token_type` are preserved verbatim in
/// [`params`](Self::params).
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Token type reported by the provider, or [`DRAFT10_TOKEN_TYPE`] when omitted.
	pub token_type: String,
	/// Query parameter name carrying the token instead of an `Authorization` header.
	pub query_param: Option<String>,
	/// Refresh token secret, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Remaining provider-returned response fields, keyed uniquely; order irrelevant.
	pub params: BTreeMap<String, Json>,
}
impl AccessToken {
	/// Creates a bearer token with no extra fields; useful for signing requests with
	/// externally obtained tokens.
	pub fn bearer(access_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			token_type: BEARER_TOKEN_TYPE.into(),
			query_param: None,
			refresh_token: None,
			params: BTreeMap::new(),
		}
	}

	/// Overrides the token type.
	pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
		self.token_type = token_type.into();

		self
	}

	/// Names the query parameter used to carry the token when signing requests.
	pub fn with_query_param(mut self, name: impl Into<String>) -> Self {
		self.query_param = Some(name.into());

		self
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("query_param", &self.query_param)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("params", &self.params)
			.finish()
	}
}
