//! Shared response payload model and the default parser behind
//! [`parse_response`](crate::provider::ProviderCapabilities::parse_response).

/// Parsed response body: a JSON object keyed by field name.
pub type ResponseData = serde_json::Map<String, serde_json::Value>;

/// Path-annotated JSON parse failure produced by the default parser.
pub type ResponseParseError = serde_path_to_error::Error<serde_json::Error>;

/// Parses a raw response body into [`ResponseData`].
///
/// Non-object payloads (arrays, scalars, empty bodies) are rejected; the raw request
/// pipeline treats that as "nothing to check" rather than a failure.
pub fn parse_json(body: &[u8]) -> Result<ResponseData, ResponseParseError> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parses_json_objects() {
		let data = parse_json(br#"{"access_token":"abc","expires_in":3600}"#)
			.expect("Object bodies should parse successfully.");

		assert_eq!(data.get("access_token").and_then(|value| value.as_str()), Some("abc"));
	}

	#[test]
	fn rejects_non_object_bodies() {
		assert!(parse_json(b"").is_err());
		assert!(parse_json(b"[1,2,3]").is_err());
		assert!(parse_json(b"revoked").is_err());
	}
}
