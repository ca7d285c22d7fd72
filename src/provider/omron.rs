//! Omron identity provider adapter.
//!
//! Omron serves its OAuth endpoints under a configurable authority hostname with
//! fixed `/connect/*` path suffixes, mandates space-separated scopes, and rejects
//! the standard `approval_prompt` parameter. Tokens are revoked through a
//! non-standard POST carrying the token in the query string.

// crates.io
use oauth2::{
	AccessToken, AsyncHttpClient, HttpResponse,
	http::{Method, Request},
};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, IdentityProviderError},
	http::{ResponseMetadataSlot, TokenHttpClient},
	oauth,
	owner::ResourceOwner,
	provider::{
		AuthorizationOptions, ProviderCapabilities, TokenRequestParams,
		access_token_request_options,
	},
	response::{self, ResponseData},
};

/// Omron provider adapter.
///
/// The only configuration is the authority hostname; it is validated once at
/// construction and immutable afterwards, so a single instance is safe to share
/// across concurrent callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Omron {
	auth_hostname: String,
}
impl Omron {
	/// Token response field that identifies the resource owner.
	pub const RESOURCE_OWNER_ID_FIELD: &'static str = "sub";

	const AUTHORIZATION_PATH: &'static str = "/connect/authorize";
	const REVOCATION_PATH: &'static str = "/connect/revocation";
	const TOKEN_PATH: &'static str = "/connect/token";

	/// Creates an adapter for the given authority hostname.
	///
	/// Endpoints are formed by concatenating the hostname with fixed path suffixes,
	/// without normalization, so the hostname must be non-empty and must not end
	/// with a slash.
	pub fn new(auth_hostname: impl Into<String>) -> Result<Self, ConfigError> {
		let auth_hostname = auth_hostname.into();

		if auth_hostname.is_empty() {
			return Err(ConfigError::EmptyAuthHostname);
		}
		if auth_hostname.ends_with('/') {
			return Err(ConfigError::TrailingSlash { hostname: auth_hostname });
		}

		Ok(Self { auth_hostname })
	}

	/// Configured authority hostname.
	pub fn auth_hostname(&self) -> &str {
		&self.auth_hostname
	}

	/// Base URL of the revocation endpoint.
	pub fn base_revocation_url(&self) -> String {
		format!("{}{}", self.auth_hostname, Self::REVOCATION_PATH)
	}

	/// Revokes an access token.
	///
	/// Reuses the standard access-token request options with an empty parameter set
	/// and issues a single POST to the revocation endpoint with `token` and
	/// `token_type_hint=access_token` appended as query parameters. The raw response
	/// is returned unmodified unless its body is an `error`-shaped JSON object, which
	/// fails under the same policy as
	/// [`check_response`](ProviderCapabilities::check_response). No retries; transport
	/// failures propagate as-is.
	pub async fn revoke<C>(&self, http_client: &C, token: &AccessToken) -> Result<HttpResponse>
	where
		C: ?Sized + TokenHttpClient,
	{
		let options = access_token_request_options(self, &TokenRequestParams::default());
		let mut uri = Url::parse(&self.base_revocation_url())
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		uri.query_pairs_mut()
			.append_pair("token", token.secret())
			.append_pair("token_type_hint", "access_token");

		let mut builder = Request::builder().method(Method::POST).uri(uri.as_str());

		for (name, value) in &options.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		let request = builder.body(options.body).map_err(ConfigError::from)?;
		let handle = http_client.with_metadata(ResponseMetadataSlot::default());
		let response = handle.call(request).await.map_err(oauth::map_http_client_error)?;

		if let Ok(data) = response::parse_json(response.body()) {
			self.check_response(response.status().as_u16(), &data)?;
		}

		Ok(response)
	}
}
impl Display for Omron {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("omron")
	}
}
impl ProviderCapabilities for Omron {
	fn base_authorization_url(&self) -> String {
		format!("{}{}", self.auth_hostname, Self::AUTHORIZATION_PATH)
	}

	fn base_access_token_url(&self, _params: &TokenRequestParams) -> String {
		format!("{}{}", self.auth_hostname, Self::TOKEN_PATH)
	}

	fn default_scopes(&self) -> Vec<String> {
		vec!["openid".to_owned(), "offline_access".to_owned(), "bloodpressure".to_owned()]
	}

	fn scope_separator(&self) -> char {
		' '
	}

	fn default_headers(&self) -> BTreeMap<String, String> {
		BTreeMap::from([(
			"Content-Type".to_owned(),
			"application/x-www-form-urlencoded".to_owned(),
		)])
	}

	fn authorization_headers(&self, token: &AccessToken) -> BTreeMap<String, String> {
		BTreeMap::from([("Authorization".to_owned(), format!("Bearer {}", token.secret()))])
	}

	fn augment_authorization_request(
		&self,
		options: &AuthorizationOptions,
		params: &mut BTreeMap<String, String>,
	) {
		// Omron rejects `approval_prompt`; it must never be sent.
		params.remove("approval_prompt");

		if let Some(prompt) = options.prompt.as_deref().filter(|prompt| !prompt.is_empty()) {
			params.insert("prompt".to_owned(), prompt.to_owned());
		}
	}

	fn check_response(
		&self,
		status_code: u16,
		data: &ResponseData,
	) -> Result<(), IdentityProviderError> {
		let Some(error) = data.get("error") else {
			return Ok(());
		};
		let message = match error {
			Value::String(message) => message.clone(),
			other => other.to_string(),
		};
		let code = data.get("status").and_then(provider_status).unwrap_or(status_code);

		Err(IdentityProviderError::new(message, code, data.clone()))
	}

	fn resource_owner_details_url(&self, _token: &AccessToken) -> Option<Url> {
		// No profile endpoint exists; owners are derived from the token response.
		None
	}

	fn create_resource_owner(&self, response: &ResponseData, _token: &AccessToken) -> ResourceOwner {
		ResourceOwner::new(response.clone(), Self::RESOURCE_OWNER_ID_FIELD)
	}
}

/// Reads the provider's `status` field as a code, accepting numbers and numeric strings.
fn provider_status(value: &Value) -> Option<u16> {
	value
		.as_u64()
		.and_then(|status| u16::try_from(status).ok())
		.or_else(|| value.as_str().and_then(|status| status.parse().ok()))
}
