//! Refresh flow: exchanges a refresh token for a new access token.

// self
use crate::{
	_prelude::*,
	flows::{Client, decode},
	grant::REFRESH_TOKEN_GRANT,
	http::{TokenRequest, TokenTransport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	token::AccessToken,
};

impl<T> Client<T>
where
	T: ?Sized + TokenTransport,
{
	/// Exchanges a refresh token for a new access token.
	///
	/// Returns `Ok(None)` when the endpoint answers with a non-success status: the
	/// refresh was rejected and callers must fall back to a full re-authorization.
	/// Transport failures still surface as errors.
	pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<Option<AccessToken>> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_access_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.exchange_metrics.record_attempt();

		let result = span
			.instrument(async move {
				let uri = self.endpoint.require_access_token_uri()?;
				let client_id = self.endpoint.require_client_id()?;
				let client_secret = self.endpoint.require_client_secret()?;
				let mut request = TokenRequest::new(REFRESH_TOKEN_GRANT);

				request.form.insert("client_id".into(), client_id.into());
				request.form.insert("client_secret".into(), client_secret.into());
				request.form.insert("refresh_token".into(), refresh_token.into());

				let response = self.transport.post_form(uri, &request).await?;

				if response.status != 200 {
					return Ok(None);
				}

				let body = decode::decode_body(&response)?;

				Ok(Some(decode::token_from_body(&self.endpoint, body)?))
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
}
