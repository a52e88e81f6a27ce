//! Token endpoint response decoding: content negotiation, provider error shapes, and
//! token assembly.

// self
use crate::{
	_prelude::*,
	endpoint::Endpoint,
	error::{DecodeError, ProtocolError},
	http::TransportResponse,
	token::{AccessToken, DRAFT10_TOKEN_TYPE, TokenSecret},
};

/// Content-type prefixes decoded as JSON; anything else falls back to the
/// form-urlencoded convention some providers still use.
const JSON_CONTENT_TYPES: &[&str] = &["application/json", "text/javascript"];

/// Decodes a token response body according to the `content-type` response header.
pub(crate) fn decode_body(
	response: &TransportResponse,
) -> Result<BTreeMap<String, Json>, DecodeError> {
	if is_json(response.content_type.as_deref()) {
		decode_json(response)
	} else {
		Ok(decode_form(&response.body))
	}
}

fn is_json(content_type: Option<&str>) -> bool {
	content_type
		.map(|value| JSON_CONTENT_TYPES.iter().any(|prefix| value.starts_with(prefix)))
		.unwrap_or(false)
}

fn decode_json(response: &TransportResponse) -> Result<BTreeMap<String, Json>, DecodeError> {
	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);
	let value: Json = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError::Json { source, status: response.status })?;

	match value {
		Json::Object(map) => Ok(map.into_iter().collect()),
		_ => Err(DecodeError::NotAnObject { status: response.status }),
	}
}

fn decode_form(body: &[u8]) -> BTreeMap<String, Json> {
	url::form_urlencoded::parse(body)
		.map(|(key, value)| (key.into_owned(), Json::String(value.into_owned())))
		.collect()
}

/// Provider failure payloads come in two shapes: the RFC 6749 flat form (`error` plus
/// optional `error_description` strings) and a nested object carrying `type` and
/// `message` fields (a Facebook-era convention). Both resolve to [`ProtocolError`]
/// here, at decode time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ProviderErrorShape {
	Flat { code: String, description: Option<String> },
	Nested { kind: Option<String>, message: Option<String> },
}
impl ProviderErrorShape {
	/// Extracts the error shape from a decoded body, if one is present.
	pub(crate) fn from_body(body: &BTreeMap<String, Json>) -> Option<Self> {
		match body.get("error")? {
			Json::String(code) => Some(Self::Flat {
				code: code.clone(),
				description: body
					.get("error_description")
					.and_then(Json::as_str)
					.map(ToOwned::to_owned),
			}),
			Json::Object(fields) => Some(Self::Nested {
				kind: fields.get("type").and_then(Json::as_str).map(ToOwned::to_owned),
				message: fields.get("message").and_then(Json::as_str).map(ToOwned::to_owned),
			}),
			other => Some(Self::Flat { code: other.to_string(), description: None }),
		}
	}

	/// Resolves the shape into a protocol error, falling back to the code itself when
	/// the provider omitted a description.
	pub(crate) fn into_protocol_error(self) -> ProtocolError {
		match self {
			Self::Flat { code, description } => {
				let message = description.unwrap_or_else(|| code.clone());

				ProtocolError::new(message, code)
			},
			Self::Nested { kind, message } => {
				let generic = ProtocolError::error_requesting_access_token();

				ProtocolError::new(
					message.unwrap_or(generic.message),
					kind.unwrap_or(generic.code),
				)
			},
		}
	}
}

/// Builds an [`AccessToken`] from a decoded success body.
pub(crate) fn token_from_body(
	endpoint: &Endpoint,
	mut body: BTreeMap<String, Json>,
) -> Result<AccessToken, DecodeError> {
	let access_token = match body.remove("access_token") {
		Some(Json::String(value)) => TokenSecret::new(value),
		_ => return Err(DecodeError::MissingAccessToken),
	};
	let token_type = match body.remove("token_type") {
		Some(Json::String(value)) => value,
		// Compatibility shim for providers that predate the token_type field.
		_ => DRAFT10_TOKEN_TYPE.into(),
	};
	// Read without removing: the refresh token stays visible in `params` as well.
	let refresh_token = body.get("refresh_token").and_then(Json::as_str).map(TokenSecret::from);

	Ok(AccessToken {
		access_token,
		token_type,
		query_param: endpoint.access_query_param.clone(),
		refresh_token,
		params: body,
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn endpoint() -> Endpoint {
		Endpoint::builder("foo").build()
	}

	fn json_response(body: &str) -> TransportResponse {
		TransportResponse {
			status: 200,
			content_type: Some("application/json; charset=utf-8".into()),
			body: body.as_bytes().to_vec(),
		}
	}

	#[test]
	fn json_and_form_bodies_decode_to_equivalent_maps() {
		let json = decode_body(&json_response(
			r#"{"access_token":"abc","token_type":"bearer","expires_in":"3600"}"#,
		))
		.expect("JSON body should decode.");
		let form = decode_body(&TransportResponse {
			status: 200,
			content_type: Some("application/x-www-form-urlencoded".into()),
			body: b"access_token=abc&token_type=bearer&expires_in=3600".to_vec(),
		})
		.expect("Form body should decode.");

		assert_eq!(json, form);
	}

	#[test]
	fn text_javascript_counts_as_json() {
		let body = decode_body(&TransportResponse {
			status: 200,
			content_type: Some("text/javascript".into()),
			body: br#"{"access_token":"abc"}"#.to_vec(),
		})
		.expect("text/javascript body should decode as JSON.");

		assert_eq!(body.get("access_token"), Some(&Json::String("abc".into())));
	}

	#[test]
	fn malformed_json_reports_the_status() {
		let err = decode_body(&json_response("{not json")).expect_err("Malformed JSON must fail.");

		assert!(matches!(err, DecodeError::Json { status: 200, .. }));

		let err = decode_body(&json_response("[1,2,3]"))
			.expect_err("Non-object JSON must be rejected.");

		assert!(matches!(err, DecodeError::NotAnObject { status: 200 }));
	}

	#[test]
	fn flat_error_shape_prefers_the_description() {
		let body = decode_body(&json_response(
			r#"{"error":"invalid_grant","error_description":"code expired"}"#,
		))
		.expect("Error body should decode.");
		let shape = ProviderErrorShape::from_body(&body).expect("Error shape should be detected.");
		let err = shape.into_protocol_error();

		assert_eq!(err.code, "invalid_grant");
		assert_eq!(err.message, "code expired");
	}

	#[test]
	fn flat_error_shape_falls_back_to_the_code() {
		let body = decode_body(&json_response(r#"{"error":"access_denied"}"#))
			.expect("Error body should decode.");
		let err = ProviderErrorShape::from_body(&body)
			.expect("Error shape should be detected.")
			.into_protocol_error();

		assert_eq!(err.message, "access_denied");
		assert_eq!(err.code, "access_denied");
	}

	#[test]
	fn nested_error_shape_reads_type_and_message() {
		let body = decode_body(&json_response(
			r#"{"error":{"type":"OAuthException","message":"session invalidated"}}"#,
		))
		.expect("Nested error body should decode.");
		let err = ProviderErrorShape::from_body(&body)
			.expect("Error shape should be detected.")
			.into_protocol_error();

		assert_eq!(err.code, "OAuthException");
		assert_eq!(err.message, "session invalidated");
	}

	#[test]
	fn token_assembly_applies_the_draft10_fallback() {
		let body = decode_body(&json_response(r#"{"access_token":"abc","expires_in":3600}"#))
			.expect("Body should decode.");
		let token =
			token_from_body(&endpoint(), body).expect("Token should assemble without token_type.");

		assert_eq!(token.token_type, DRAFT10_TOKEN_TYPE);
		assert_eq!(token.access_token.expose(), "abc");
		assert_eq!(token.params.get("expires_in"), Some(&Json::from(3600)));
	}

	#[test]
	fn token_assembly_keeps_refresh_token_in_params() {
		let endpoint = Endpoint::builder("foo").access_query_param("oauth_token").build();
		let body = decode_body(&json_response(
			r#"{"access_token":"abc","token_type":"bearer","refresh_token":"def"}"#,
		))
		.expect("Body should decode.");
		let token = token_from_body(&endpoint, body).expect("Token should assemble.");

		assert_eq!(token.refresh_token.as_ref().map(|secret| secret.expose()), Some("def"));
		assert_eq!(token.params.get("refresh_token"), Some(&Json::String("def".into())));
		assert!(!token.params.contains_key("access_token"));
		assert!(!token.params.contains_key("token_type"));
		assert_eq!(token.query_param.as_deref(), Some("oauth_token"));
	}

	#[test]
	fn missing_access_token_is_rejected() {
		let body = decode_body(&json_response(r#"{"token_type":"bearer"}"#))
			.expect("Body should decode.");
		let err = token_from_body(&endpoint(), body)
			.expect_err("Tokenless success body must be rejected.");

		assert!(matches!(err, DecodeError::MissingAccessToken));
	}
}
