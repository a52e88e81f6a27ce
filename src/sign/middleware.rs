//! Middleware that signs every outbound resource request before execution.

// self
use crate::{
	_prelude::*,
	error::ProtocolError,
	sign::{AttachOutcome, ResourceRequest, SignerRegistry},
};
#[cfg(feature = "reqwest")]
use crate::error::{ConfigError, TransportError};

/// Response returned by resource executors.
#[derive(Clone, Debug)]
pub struct ResourceResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: BTreeMap<String, String>,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}

/// Boxed future returned by [`ResourceExecutor::execute`].
pub type ResourceFuture<'a> = Pin<Box<dyn Future<Output = Result<ResourceResponse>> + 'a + Send>>;

/// Generic request-execution capability wrapped by [`SignedExecutor`].
pub trait ResourceExecutor: Send + Sync {
	/// Executes a resource request.
	fn execute<'a>(&'a self, request: ResourceRequest) -> ResourceFuture<'a>;
}

/// Middleware wrapping a [`ResourceExecutor`] so every call transparently attaches a
/// token.
///
/// Per call: the embedded token context is read off the request, the signer registry
/// decorates the request, and the context is stripped before forwarding. Unsigned
/// requests are still forwarded unless they demand a signature, in which case the
/// call fails before any network traffic.
pub struct SignedExecutor<E>
where
	E: ResourceExecutor,
{
	inner: E,
	signers: SignerRegistry,
}
impl<E> SignedExecutor<E>
where
	E: ResourceExecutor,
{
	/// Wraps an executor with the standard signer registry.
	pub fn new(inner: E) -> Self {
		Self { inner, signers: SignerRegistry::standard() }
	}

	/// Replaces the signer registry.
	pub fn with_signers(mut self, signers: SignerRegistry) -> Self {
		self.signers = signers;

		self
	}

	/// Signs and executes a request.
	pub async fn execute(&self, mut request: ResourceRequest) -> Result<ResourceResponse> {
		let outcome = self.signers.sign(&mut request)?;

		if outcome == AttachOutcome::Skipped && request.raise_on_unsigned {
			return Err(ProtocolError::missing_oauth2_params().into());
		}

		self.inner.execute(request).await
	}
}

/// reqwest-backed resource executor.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestResourceExecutor(ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestResourceExecutor {
	/// Wraps an existing reqwest client.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl ResourceExecutor for ReqwestResourceExecutor {
	fn execute<'a>(&'a self, request: ResourceRequest) -> ResourceFuture<'a> {
		Box::pin(async move {
			let ResourceRequest { method, url, headers, body, .. } = request;
			let method = reqwest::Method::from_bytes(method.as_bytes())
				.map_err(|_| ConfigError::InvalidHttpMethod { method: method.clone() })?;
			let mut builder = self.0.request(method, url);

			for (name, value) in &headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(body) = body {
				builder = builder.body(body);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.to_string(), value.to_owned()))
				})
				.collect();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(ResourceResponse { status, headers, body })
		})
	}
}
