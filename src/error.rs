//! Client-level error types shared across flows, signing, and transports.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token endpoint success body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Token or resource server reported a failure.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Anti-CSRF state echoed by the authorization server did not match.
	#[error("Authorization state mismatch: expected `{expected}`, got `{actual}`.")]
	StateMismatch {
		/// State value supplied when the redirect was built.
		expected: String,
		/// State value returned on the callback; empty when the callback omitted it.
		actual: String,
	},
	/// No signer is registered for the token's type and the request demanded one.
	#[error("No signer is registered for token type `{token_type}`.")]
	UnknownTokenType {
		/// Token type the signer registry could not resolve.
		token_type: String,
	},
}

/// Configuration and validation failures detected before any network call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Endpoint carries an empty client identifier.
	#[error("Endpoint is missing a client id.")]
	MissingClientId,
	/// Endpoint lacks the client secret required by the configured auth method.
	#[error("Endpoint is missing a client secret.")]
	MissingClientSecret,
	/// Endpoint lacks the authorization URI required to build a redirect.
	#[error("Endpoint is missing an authorization URI.")]
	MissingAuthorizationUri,
	/// Endpoint lacks the access token URI required for exchanges.
	#[error("Endpoint is missing an access token URI.")]
	MissingAccessTokenUri,
	/// Endpoint lacks the redirect URI required by the authorization_code grant.
	#[error("Endpoint is missing a redirect URI.")]
	MissingRedirectUri,
	/// Exchange params lack the authorization code required by the grant.
	#[error("Exchange params are missing an authorization code.")]
	MissingAuthorizationCode,
	/// No strategy is registered for the configured grant type.
	#[error("Unsupported grant type `{grant}`.")]
	UnsupportedGrant {
		/// Grant identifier no strategy was registered for.
		grant: String,
	},
	/// Outbound resource request names an invalid HTTP method.
	#[error("Invalid HTTP method `{method}`.")]
	InvalidHttpMethod {
		/// Method string that failed to parse.
		method: String,
	},
	/// Outbound request carries a header that is not valid HTTP.
	#[error("Invalid request header `{name}`.")]
	InvalidRequestHeader {
		/// Header name or value that failed to parse.
		name: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failure reported by the token or resource server.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{message} ({code}).")]
pub struct ProtocolError {
	/// Provider-supplied description, or a generic fallback when none was given.
	pub message: String,
	/// Provider-supplied error code.
	pub code: String,
}
impl ProtocolError {
	/// Code recorded when the provider failed without naming one.
	pub const UNKNOWN_CODE: &'static str = "unknown";

	/// Creates a protocol error from provider-supplied fields.
	pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
		Self { message: message.into(), code: code.into() }
	}

	/// Generic failure used when the token endpoint answers with a non-success status
	/// and no `error` field to classify.
	pub fn error_requesting_access_token() -> Self {
		Self::new("error requesting access token", Self::UNKNOWN_CODE)
	}

	/// Failure raised by the signing middleware when a request demanded a token and
	/// none could be attached.
	pub fn missing_oauth2_params() -> Self {
		Self::new("missing oauth2 params", Self::UNKNOWN_CODE)
	}
}

/// Failures decoding a token endpoint success body.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body declared a JSON content type but could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	Json {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Decoded body is not a key/value object.
	#[error("Token endpoint returned a non-object body.")]
	NotAnObject {
		/// HTTP status code of the response.
		status: u16,
	},
	/// Success body omitted the required `access_token` field.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn protocol_error_constructors_use_fixed_literals() {
		let generic = ProtocolError::error_requesting_access_token();

		assert_eq!(generic.message, "error requesting access token");
		assert_eq!(generic.code, ProtocolError::UNKNOWN_CODE);

		let missing = ProtocolError::missing_oauth2_params();

		assert_eq!(missing.message, "missing oauth2 params");
	}

	#[test]
	fn display_includes_message_and_code() {
		let err = ProtocolError::new("code has expired", "invalid_grant");

		assert_eq!(err.to_string(), "code has expired (invalid_grant).");
	}
}
