//! Token exchange orchestration: grant dispatch, client authentication, transport
//! dispatch, and response classification.
//!
//! The exchange is a linear pipeline with policy-selection branch points (grant
//! type, auth placement, response format); there is no persistent state machine.

mod metrics;

pub use metrics::ExchangeMetrics;

// self
use crate::{
	_prelude::*,
	error::ProtocolError,
	flows::{AuthorizationRequest, Client, decode},
	grant::ExchangeParams,
	http::{TokenRequest, TokenTransport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	token::AccessToken,
};

impl<T> Client<T>
where
	T: ?Sized + TokenTransport,
{
	/// Exchanges callback params (or resource-owner credentials) for an access token.
	///
	/// `expected` is the redirect built at flow start; when it carries a state value,
	/// the returned state must match before any network call is made. Denials relayed
	/// through `params.error` also fail without touching the network.
	pub async fn exchange_token(
		&self,
		params: ExchangeParams,
		expected: Option<&AuthorizationRequest>,
	) -> Result<AccessToken> {
		const KIND: FlowKind = FlowKind::Exchange;

		let span = FlowSpan::new(KIND, "exchange_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.exchange_metrics.record_attempt();

		let result = span
			.instrument(async move {
				check_callback_denial(&params)?;
				check_expected_state(expected, &params)?;

				self.request_token(&params).await
			})
			.await;

		match &result {
			Ok(_) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
				self.exchange_metrics.record_success();
			},
			Err(_) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				self.exchange_metrics.record_failure();
			},
		}

		result
	}

	/// Builds, dispatches, and classifies a single token endpoint request.
	async fn request_token(&self, params: &ExchangeParams) -> Result<AccessToken> {
		let grant = self.grants.resolve(&self.endpoint.grant_type)?;
		let uri = self.endpoint.require_access_token_uri()?;
		let mut request = TokenRequest::new(&self.endpoint.grant_type);

		grant.extend_token_request(&mut request, &self.endpoint, params)?;
		self.endpoint.client_auth_method.apply(&self.endpoint, &mut request)?;

		let response = self.transport.post_form(uri, &request).await?;
		let body = match decode::decode_body(&response) {
			Ok(body) => body,
			// An undecodable body on a failure status classifies by status alone.
			Err(_) if response.status != 200 =>
				return Err(ProtocolError::error_requesting_access_token().into()),
			Err(err) => return Err(err.into()),
		};

		if let Some(shape) = decode::ProviderErrorShape::from_body(&body) {
			return Err(shape.into_protocol_error().into());
		}
		if response.status != 200 {
			return Err(ProtocolError::error_requesting_access_token().into());
		}

		Ok(decode::token_from_body(&self.endpoint, body)?)
	}
}

fn check_callback_denial(params: &ExchangeParams) -> Result<()> {
	let Some(code) = &params.error else {
		return Ok(());
	};
	let message = params.error_description.clone().unwrap_or_else(|| code.clone());

	Err(ProtocolError::new(message, code.clone()).into())
}

fn check_expected_state(
	expected: Option<&AuthorizationRequest>,
	params: &ExchangeParams,
) -> Result<()> {
	let Some(expected) = expected.and_then(|request| request.state.as_deref()) else {
		return Ok(());
	};

	if params.state.as_deref() == Some(expected) {
		Ok(())
	} else {
		Err(Error::StateMismatch {
			expected: expected.to_owned(),
			actual: params.state.clone().unwrap_or_default(),
		})
	}
}
