//! Facade glue binding a provider adapter to the [`oauth2`] client foundation.

// crates.io
use oauth2::{
	AuthType, AuthUrl, Client, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	ExtraTokenFields, HttpClientError, RedirectUrl, RequestTokenError, StandardRevocableToken,
	StandardTokenResponse, TokenUrl,
	basic::{BasicTokenIntrospectionResponse, BasicTokenType},
};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	http::ResponseMetadata,
	provider::{ProviderCapabilities, TokenRequestParams},
	response::ResponseData,
};

/// Extra token-response fields returned by the provider.
///
/// Everything beyond the standard OAuth fields is captured verbatim; the `sub` claim
/// inside identifies the resource owner, since the provider has no profile endpoint.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct OmronTokenFields {
	/// Provider claims carried alongside the token (`sub`, ...).
	#[serde(flatten)]
	pub claims: ResponseData,
}
impl OmronTokenFields {
	/// Subject identifier claim, when present.
	pub fn subject(&self) -> Option<&str> {
		self.claims.get("sub").and_then(Value::as_str)
	}
}
impl ExtraTokenFields for OmronTokenFields {}

/// Error payload shape returned by the provider's token-adjacent endpoints.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct OmronErrorResponse {
	/// OAuth error code string.
	pub error: String,
	/// Provider-supplied status code overriding the HTTP status.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<u16>,
	/// Remaining payload fields.
	#[serde(flatten)]
	pub extra: ResponseData,
}
impl OmronErrorResponse {
	/// Rebuilds the raw payload map the provider sent.
	pub fn into_data(self) -> ResponseData {
		let mut data = self.extra;

		data.insert("error".to_owned(), Value::String(self.error));

		if let Some(status) = self.status {
			data.insert("status".to_owned(), Value::from(status));
		}

		data
	}
}
impl Display for OmronErrorResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.error)?;

		if let Some(status) = self.status {
			write!(f, " (status {status})")?;
		}

		Ok(())
	}
}
impl oauth2::ErrorResponse for OmronErrorResponse {}

/// Token response produced by the provider's token endpoint.
pub type OmronTokenResponse = StandardTokenResponse<OmronTokenFields, BasicTokenType>;
/// [`oauth2`] client specialized to the provider's response shapes.
pub type OmronTokenClient<
	HasAuthUrl = EndpointNotSet,
	HasDeviceAuthUrl = EndpointNotSet,
	HasIntrospectionUrl = EndpointNotSet,
	HasRevocationUrl = EndpointNotSet,
	HasTokenUrl = EndpointNotSet,
> = Client<
	OmronErrorResponse,
	OmronTokenResponse,
	BasicTokenIntrospectionResponse,
	StandardRevocableToken,
	OmronErrorResponse,
	HasAuthUrl,
	HasDeviceAuthUrl,
	HasIntrospectionUrl,
	HasRevocationUrl,
	HasTokenUrl,
>;
/// Fully-wired client with authorization and token endpoints set.
pub type ConfiguredOmronTokenClient =
	OmronTokenClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
/// Request error emitted by token endpoint calls routed through a transport `E`.
pub type OmronRequestTokenError<E> = RequestTokenError<HttpClientError<E>, OmronErrorResponse>;

/// Builds a configured [`oauth2`] client from a provider's capability set.
///
/// Client credentials are sent in the request body, matching the provider's
/// form-encoded token endpoint.
pub fn from_provider<P>(
	provider: &P,
	client_id: &str,
	client_secret: Option<&str>,
	redirect_uri: Option<&Url>,
) -> Result<ConfiguredOmronTokenClient>
where
	P: ?Sized + ProviderCapabilities,
{
	let auth_url = AuthUrl::new(provider.base_authorization_url())
		.map_err(|source| ConfigError::InvalidEndpoint { source })?;
	let token_url = TokenUrl::new(provider.base_access_token_url(&TokenRequestParams::default()))
		.map_err(|source| ConfigError::InvalidEndpoint { source })?;
	let mut client = OmronTokenClient::new(ClientId::new(client_id.to_owned()))
		.set_auth_uri(auth_url)
		.set_token_uri(token_url)
		.set_auth_type(AuthType::RequestBody);

	if let Some(secret) = client_secret {
		client = client.set_client_secret(ClientSecret::new(secret.to_owned()));
	}
	if let Some(redirect) = redirect_uri {
		let redirect_url = RedirectUrl::new(redirect.to_string())
			.map_err(|source| ConfigError::InvalidRedirect { source })?;

		client = client.set_redirect_uri(redirect_url);
	}

	Ok(client)
}

/// Maps a token request failure into the adapter error taxonomy.
///
/// Structured provider errors run through the adapter's
/// [`check_response`](ProviderCapabilities::check_response) policy so the same
/// classification applies to every pipeline; the captured HTTP status backs the
/// error code when the payload has no `status` field.
pub fn map_token_request_error<P, E>(
	provider: &P,
	meta: Option<ResponseMetadata>,
	err: OmronRequestTokenError<E>,
) -> Error
where
	P: ?Sized + ProviderCapabilities,
	E: 'static + Send + Sync + StdError,
{
	let status = meta.as_ref().and_then(|meta| meta.status);

	match err {
		RequestTokenError::ServerResponse(response) => {
			let data = response.into_data();

			match provider.check_response(status.unwrap_or_default(), &data) {
				Err(err) => err.into(),
				Ok(()) => Error::UnexpectedResponse {
					message: "Token endpoint reported a failure without an error field".to_owned(),
					status,
				},
			}
		},
		RequestTokenError::Request(err) => map_http_client_error(err),
		RequestTokenError::Parse(source, _body) => Error::ResponseParse { source, status },
		RequestTokenError::Other(message) => Error::UnexpectedResponse { message, status },
	}
}

/// Maps a transport failure into the adapter error taxonomy.
pub fn map_http_client_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => Error::UnexpectedResponse { message, status: None },
		_ => Error::UnexpectedResponse {
			message: "HTTP client reported an unknown failure".to_owned(),
			status: None,
		},
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::provider::Omron;

	fn provider() -> Omron {
		Omron::new("https://id.example.com").expect("Adapter fixture should build.")
	}

	#[test]
	fn builds_a_configured_client() {
		let redirect =
			Url::parse("https://app.example.com/cb").expect("Redirect fixture should parse.");

		assert!(from_provider(&provider(), "client-1", Some("secret"), Some(&redirect)).is_ok());
		assert!(from_provider(&provider(), "client-1", None, None).is_ok());
	}

	#[test]
	fn error_responses_capture_provider_fields() {
		let response: OmronErrorResponse = serde_json::from_str(
			r#"{"error":"invalid_grant","status":499,"error_description":"expired code"}"#,
		)
		.expect("Error response fixture should deserialize.");

		assert_eq!(response.error, "invalid_grant");
		assert_eq!(response.status, Some(499));
		assert_eq!(
			response.extra.get("error_description").and_then(Value::as_str),
			Some("expired code"),
		);
		assert_eq!(response.to_string(), "invalid_grant (status 499)");

		let data = response.into_data();

		assert_eq!(data.get("error").and_then(Value::as_str), Some("invalid_grant"));
		assert_eq!(data.get("status").and_then(Value::as_u64), Some(499));
	}

	#[test]
	fn token_fields_expose_the_subject_claim() {
		let fields: OmronTokenFields = serde_json::from_str(r#"{"sub":"user-123"}"#)
			.expect("Token fields fixture should deserialize.");

		assert_eq!(fields.subject(), Some("user-123"));
		assert_eq!(OmronTokenFields::default().subject(), None);
	}

	#[test]
	fn server_responses_run_through_the_check_policy() {
		let response: OmronErrorResponse = serde_json::from_str(r#"{"error":"invalid_grant"}"#)
			.expect("Error response fixture should deserialize.");
		let err = map_token_request_error::<_, std::io::Error>(
			&provider(),
			Some(ResponseMetadata { status: Some(400) }),
			RequestTokenError::ServerResponse(response),
		);

		match err {
			Error::IdentityProvider(err) => {
				assert_eq!(err.message, "invalid_grant");
				assert_eq!(err.code, 400);
			},
			other => panic!("Expected an identity provider error, got {other:?}."),
		}
	}

	#[test]
	fn provider_status_beats_transport_metadata() {
		let response: OmronErrorResponse =
			serde_json::from_str(r#"{"error":"invalid_grant","status":499}"#)
				.expect("Error response fixture should deserialize.");
		let err = map_token_request_error::<_, std::io::Error>(
			&provider(),
			Some(ResponseMetadata { status: Some(400) }),
			RequestTokenError::ServerResponse(response),
		);

		match err {
			Error::IdentityProvider(err) => assert_eq!(err.code, 499),
			other => panic!("Expected an identity provider error, got {other:?}."),
		}
	}

	#[test]
	fn transport_failures_stay_transport_errors() {
		let err = map_http_client_error::<std::io::Error>(HttpClientError::Io(
			std::io::Error::other("connection reset"),
		));

		assert!(matches!(err, Error::Transport(TransportError::Io(_))));
	}
}
