//! Transport primitives for token endpoint calls.
//!
//! [`TokenTransport`] is the crate's only dependency on an HTTP stack. Callers
//! provide an implementation (the default is [`ReqwestTransport`]) and flows hand it
//! fully built [`TokenRequest`] values. Implementations must return non-2xx
//! responses as values, never as errors; flows inspect the status themselves.

// crates.io
#[cfg(feature = "reqwest")]
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")]
use crate::error::{ConfigError, TransportError};

/// Fixed connection-establishment timeout applied to token endpoint calls.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Fixed socket-read timeout applied to token endpoint calls.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);
/// Content type of every token request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
/// Canonical `Authorization` header name shared by client auth and request signing.
pub const AUTHORIZATION: &str = "Authorization";

/// Token request under construction.
///
/// Headers and form fields are plain maps so grant and client-auth strategies stay
/// HTTP client agnostic.
#[derive(Clone, Debug, Default)]
pub struct TokenRequest {
	/// Headers sent alongside the form body.
	pub headers: BTreeMap<String, String>,
	/// Form fields serialized as `application/x-www-form-urlencoded`.
	pub form: BTreeMap<String, String>,
}
impl TokenRequest {
	/// Creates a request whose body is seeded with the `grant_type` field.
	pub fn new(grant_type: &str) -> Self {
		let mut form = BTreeMap::new();

		form.insert("grant_type".into(), grant_type.into());

		Self { headers: BTreeMap::new(), form }
	}

	/// Serializes the form fields using form-url-encoding, in key order.
	pub fn encode_form(&self) -> String {
		let mut serializer = url::form_urlencoded::Serializer::new(String::new());

		for (key, value) in &self.form {
			serializer.append_pair(key, value);
		}

		serializer.finish()
	}
}

/// Raw response captured from the token endpoint.
#[derive(Clone, Debug)]
pub struct TransportResponse {
	/// HTTP status code.
	pub status: u16,
	/// `content-type` response header, when present.
	pub content_type: Option<String>,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}

/// Boxed future returned by [`TokenTransport::post_form`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<TransportResponse>> + 'a + Send>>;

/// Abstraction over HTTP transports able to POST form bodies to token endpoints.
///
/// Implementations own their timeout policy; the default reqwest transport pins
/// [`CONNECT_TIMEOUT`] and [`READ_TIMEOUT`] and cancellation is delegated entirely
/// to those timeouts.
pub trait TokenTransport
where
	Self: 'static + Send + Sync,
{
	/// Issues a POST with an `application/x-www-form-urlencoded` body.
	fn post_form<'a>(&'a self, uri: &'a Url, request: &'a TokenRequest) -> TransportFuture<'a>;
}

/// reqwest-backed transport used by default.
///
/// Token requests do not follow redirects, matching OAuth 2.0 guidance that token
/// endpoints return results directly instead of delegating to another URI.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestTransport(ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with the crate's fixed timeouts and redirects disabled.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.connect_timeout(CONNECT_TIMEOUT)
			.read_timeout(READ_TIMEOUT)
			.redirect(reqwest::redirect::Policy::none())
			.build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest client.
	///
	/// The caller keeps responsibility for timeout and redirect policy.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TokenTransport for ReqwestTransport {
	fn post_form<'a>(&'a self, uri: &'a Url, request: &'a TokenRequest) -> TransportFuture<'a> {
		Box::pin(async move {
			let mut headers = HeaderMap::new();

			headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

			for (key, value) in &request.headers {
				let name = HeaderName::from_bytes(key.as_bytes())
					.map_err(|_| ConfigError::InvalidRequestHeader { name: key.clone() })?;
				let value = HeaderValue::from_str(value)
					.map_err(|_| ConfigError::InvalidRequestHeader { name: key.clone() })?;

				headers.insert(name, value);
			}

			let response = self
				.0
				.post(uri.clone())
				.headers(headers)
				.body(request.encode_form())
				.send()
				.await
				.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let content_type = response
				.headers()
				.get(CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(ToOwned::to_owned);
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(TransportResponse { status, content_type, body })
		})
	}
}
