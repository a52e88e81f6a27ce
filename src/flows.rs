//! High-level flow orchestrators built on the grant registry and transport seam.

pub mod authorize;
pub mod exchange;
pub mod refresh;

pub(crate) mod decode;

pub use authorize::*;
pub use exchange::*;

// self
use crate::{_prelude::*, endpoint::Endpoint, grant::GrantRegistry, http::TokenTransport};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestTokenClient = Client<ReqwestTransport>;

/// Coordinates OAuth 2.0 flows against a single endpoint configuration.
///
/// The client owns the transport, endpoint configuration, and grant registry so flow
/// implementations can focus on protocol logic (redirect construction, grant
/// dispatch, response classification). There is no shared mutable state and no token
/// caching; concurrent calls are safe whenever the transport is.
#[derive(Clone)]
pub struct Client<T>
where
	T: ?Sized + TokenTransport,
{
	/// Transport used for every token endpoint call.
	pub transport: Arc<T>,
	/// Endpoint configuration consumed by flows.
	pub endpoint: Endpoint,
	/// Registry dispatching the endpoint's grant type.
	pub grants: GrantRegistry,
	/// Shared counters for exchange and refresh outcomes.
	pub exchange_metrics: Arc<ExchangeMetrics>,
}
impl<T> Client<T>
where
	T: ?Sized + TokenTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(endpoint: Endpoint, transport: impl Into<Arc<T>>) -> Self {
		Self {
			transport: transport.into(),
			endpoint,
			grants: GrantRegistry::standard(),
			exchange_metrics: Default::default(),
		}
	}

	/// Replaces the grant registry.
	pub fn with_grants(mut self, grants: GrantRegistry) -> Self {
		self.grants = grants;

		self
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport> {
	/// Creates a client that provisions the default reqwest transport with the fixed
	/// connect/read timeouts.
	pub fn new(endpoint: Endpoint) -> Result<Self> {
		Ok(Self::with_transport(endpoint, ReqwestTransport::new()?))
	}
}
impl<T> Debug for Client<T>
where
	T: ?Sized + TokenTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("endpoint", &self.endpoint)
			.field("grants", &self.grants)
			.finish()
	}
}
