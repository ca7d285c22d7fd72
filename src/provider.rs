//! Provider-facing capability contract and the foundation-side request builders.
//!
//! [`ProviderCapabilities`] is the extension point a concrete identity provider
//! implements: endpoint resolution, scope policy, header policy, response checking,
//! and authorization-request shaping. The free functions build the foundation's
//! standard parameter sets and hand them to the provider hooks for shaping.

/// The Omron adapter.
pub mod omron;

pub use omron::*;

// crates.io
use oauth2::AccessToken;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, IdentityProviderError},
	owner::ResourceOwner,
	response::{self, ResponseData, ResponseParseError},
};

/// Capability set a concrete identity provider supplies to the OAuth2 foundation.
///
/// Every operation is a pure function of its inputs plus the provider's immutable
/// configuration, so implementations are safe to share across concurrent callers.
pub trait ProviderCapabilities: Send + Sync {
	/// Base URL of the authorization endpoint.
	fn base_authorization_url(&self) -> String;

	/// Base URL of the token endpoint.
	///
	/// `params` is part of the calling convention; providers are free to ignore it.
	fn base_access_token_url(&self, params: &TokenRequestParams) -> String;

	/// Default scope set requested when the caller supplies none.
	fn default_scopes(&self) -> Vec<String>;

	/// Separator used to join scopes into the `scope` parameter.
	///
	/// Defaults to a comma; providers that mandate space-separated scopes override it.
	fn scope_separator(&self) -> char {
		','
	}

	/// Default headers applied to token endpoint requests.
	fn default_headers(&self) -> BTreeMap<String, String> {
		BTreeMap::new()
	}

	/// Headers that authorize resource-owner requests with an issued token.
	fn authorization_headers(&self, _token: &AccessToken) -> BTreeMap<String, String> {
		BTreeMap::new()
	}

	/// Gives providers a chance to reshape the standard authorization parameters.
	///
	/// The default implementation does nothing. Override the hook when a provider
	/// rejects a standard parameter or expects extra ones; the method works on a
	/// plain `BTreeMap` so implementations stay HTTP client agnostic.
	fn augment_authorization_request(
		&self,
		_options: &AuthorizationOptions,
		_params: &mut BTreeMap<String, String>,
	) {
	}

	/// Applies the provider's error-detection policy to a parsed response.
	///
	/// Runs before any success-path parsing; a payload carrying an `error` key must
	/// fail here so the caller short-circuits.
	fn check_response(
		&self,
		status_code: u16,
		data: &ResponseData,
	) -> Result<(), IdentityProviderError>;

	/// URL of the resource-owner details endpoint, when the provider exposes one.
	fn resource_owner_details_url(&self, token: &AccessToken) -> Option<Url>;

	/// Builds a resource owner from a response payload.
	fn create_resource_owner(
		&self,
		response: &ResponseData,
		token: &AccessToken,
	) -> ResourceOwner;

	/// Parses a raw response body.
	///
	/// Delegates to the crate's default parser; the method exists to make the
	/// extension point explicit for providers with non-JSON payloads.
	fn parse_response(&self, body: &[u8]) -> Result<ResponseData, ResponseParseError> {
		response::parse_json(body)
	}
}

/// Caller-supplied options for building an authorization request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorizationOptions {
	/// Opaque state value round-tripped via the redirect handler.
	pub state: Option<String>,
	/// Scopes to request instead of the provider defaults.
	pub scopes: Option<Vec<String>>,
	/// `prompt` value forwarded to providers that support it.
	pub prompt: Option<String>,
	/// `approval_prompt` value; the standard parameter set defaults it to `auto`.
	pub approval_prompt: Option<String>,
	/// Additional provider-specific query parameters.
	pub extra: BTreeMap<String, String>,
}
impl AuthorizationOptions {
	/// Creates an empty option set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the state value.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Overrides the requested scopes.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = Some(scopes.into_iter().map(Into::into).collect());

		self
	}

	/// Sets the `prompt` value.
	pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
		self.prompt = Some(prompt.into());

		self
	}

	/// Overrides the `approval_prompt` value.
	pub fn with_approval_prompt(mut self, approval_prompt: impl Into<String>) -> Self {
		self.approval_prompt = Some(approval_prompt.into());

		self
	}

	/// Adds an extra query parameter.
	pub fn with_extra_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra.insert(key.into(), value.into());

		self
	}
}

/// Parameters of a token endpoint request.
///
/// Passed to [`ProviderCapabilities::base_access_token_url`] to satisfy the calling
/// convention and serialized into the form body by [`access_token_request_options`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenRequestParams {
	/// OAuth `grant_type` value.
	pub grant_type: Option<String>,
	/// Authorization code being exchanged.
	pub code: Option<String>,
	/// Redirect URI bound to the exchange.
	pub redirect_uri: Option<String>,
	/// Additional form fields.
	pub extra: BTreeMap<String, String>,
}

/// Request options produced by the standard access-token option builder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
	/// Headers to apply to the request.
	pub headers: BTreeMap<String, String>,
	/// URL-encoded form body.
	pub body: Vec<u8>,
}

/// Builds the standard request options for a token endpoint call.
///
/// Reused by every POST the adapter issues against token-adjacent endpoints,
/// including revocation (which passes an empty parameter set).
pub fn access_token_request_options<P>(provider: &P, params: &TokenRequestParams) -> RequestOptions
where
	P: ?Sized + ProviderCapabilities,
{
	let mut form = url::form_urlencoded::Serializer::new(String::new());

	if let Some(grant_type) = params.grant_type.as_deref() {
		form.append_pair("grant_type", grant_type);
	}
	if let Some(code) = params.code.as_deref() {
		form.append_pair("code", code);
	}
	if let Some(redirect_uri) = params.redirect_uri.as_deref() {
		form.append_pair("redirect_uri", redirect_uri);
	}

	for (key, value) in &params.extra {
		form.append_pair(key, value);
	}

	RequestOptions { headers: provider.default_headers(), body: form.finish().into_bytes() }
}

/// Builds the standard authorization parameter set and applies the provider hook.
///
/// The standard set carries `response_type=code`, the client identifier, the redirect
/// URI and state when supplied, the joined `scope` value, and `approval_prompt`
/// (defaulting to `auto`). Providers reshape the result through
/// [`ProviderCapabilities::augment_authorization_request`].
pub fn authorization_parameters<P>(
	provider: &P,
	client_id: &str,
	redirect_uri: Option<&Url>,
	options: &AuthorizationOptions,
) -> BTreeMap<String, String>
where
	P: ?Sized + ProviderCapabilities,
{
	let mut params = BTreeMap::new();

	params.insert("response_type".to_owned(), "code".to_owned());
	params.insert("client_id".to_owned(), client_id.to_owned());
	params.insert(
		"approval_prompt".to_owned(),
		options.approval_prompt.clone().unwrap_or_else(|| "auto".to_owned()),
	);

	if let Some(redirect_uri) = redirect_uri {
		params.insert("redirect_uri".to_owned(), redirect_uri.to_string());
	}
	if let Some(state) = options.state.as_deref() {
		params.insert("state".to_owned(), state.to_owned());
	}

	let scopes = match options.scopes.as_deref() {
		Some(scopes) if !scopes.is_empty() => scopes.to_vec(),
		_ => provider.default_scopes(),
	};

	params.insert("scope".to_owned(), join_scopes(&scopes, provider.scope_separator()));

	for (key, value) in &options.extra {
		params.insert(key.clone(), value.clone());
	}

	provider.augment_authorization_request(options, &mut params);

	params
}

/// Builds the fully-formed authorization URL callers send end-users to.
pub fn authorization_url<P>(
	provider: &P,
	client_id: &str,
	redirect_uri: Option<&Url>,
	options: &AuthorizationOptions,
) -> Result<Url, ConfigError>
where
	P: ?Sized + ProviderCapabilities,
{
	let params = authorization_parameters(provider, client_id, redirect_uri, options);
	let mut url = Url::parse(&provider.base_authorization_url())
		.map_err(|source| ConfigError::InvalidEndpoint { source })?;
	let mut pairs = url.query_pairs_mut();

	for (key, value) in &params {
		pairs.append_pair(key, value);
	}

	drop(pairs);

	Ok(url)
}

/// Joins scopes with the provider's separator when building the `scope` parameter.
pub(crate) fn join_scopes(scopes: &[String], separator: char) -> String {
	let mut buf = String::new();

	for (idx, scope) in scopes.iter().enumerate() {
		if idx > 0 {
			buf.push(separator);
		}

		buf.push_str(scope);
	}

	buf
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	struct PlainProvider;
	impl ProviderCapabilities for PlainProvider {
		fn base_authorization_url(&self) -> String {
			"https://id.example.com/authorize".into()
		}

		fn base_access_token_url(&self, _params: &TokenRequestParams) -> String {
			"https://id.example.com/token".into()
		}

		fn default_scopes(&self) -> Vec<String> {
			vec!["profile".to_owned(), "email".to_owned()]
		}

		fn check_response(
			&self,
			_status_code: u16,
			_data: &ResponseData,
		) -> Result<(), IdentityProviderError> {
			Ok(())
		}

		fn resource_owner_details_url(&self, _token: &AccessToken) -> Option<Url> {
			None
		}

		fn create_resource_owner(
			&self,
			response: &ResponseData,
			_token: &AccessToken,
		) -> ResourceOwner {
			ResourceOwner::new(response.clone(), "id")
		}
	}

	#[test]
	fn standard_parameters_cover_the_default_set() {
		let options = AuthorizationOptions::new().with_state("xyz");
		let params = authorization_parameters(&PlainProvider, "client-1", None, &options);

		assert_eq!(params.get("response_type").map(String::as_str), Some("code"));
		assert_eq!(params.get("client_id").map(String::as_str), Some("client-1"));
		assert_eq!(params.get("approval_prompt").map(String::as_str), Some("auto"));
		assert_eq!(params.get("state").map(String::as_str), Some("xyz"));
		assert_eq!(params.get("scope").map(String::as_str), Some("profile,email"));
		assert!(!params.contains_key("redirect_uri"));
	}

	#[test]
	fn caller_scopes_override_defaults() {
		let options = AuthorizationOptions::new().with_scopes(["email"]);
		let params = authorization_parameters(&PlainProvider, "client-1", None, &options);

		assert_eq!(params.get("scope").map(String::as_str), Some("email"));
	}

	#[test]
	fn options_reshape_the_request() {
		let redirect =
			Url::parse("https://app.example.com/cb").expect("Redirect fixture should parse.");
		let options = AuthorizationOptions::new()
			.with_approval_prompt("force")
			.with_extra_param("audience", "measurements");
		let params = authorization_parameters(&PlainProvider, "client-1", Some(&redirect), &options);

		assert_eq!(params.get("approval_prompt").map(String::as_str), Some("force"));
		assert_eq!(params.get("audience").map(String::as_str), Some("measurements"));
		assert_eq!(
			params.get("redirect_uri").map(String::as_str),
			Some("https://app.example.com/cb"),
		);
	}

	#[test]
	fn authorization_url_appends_the_parameters_as_a_query() {
		let url = authorization_url(
			&PlainProvider,
			"client-1",
			None,
			&AuthorizationOptions::new().with_state("xyz"),
		)
		.expect("Authorization URL should build.");
		let pairs: BTreeMap<String, String> = url.query_pairs().into_owned().collect();

		assert!(url.as_str().starts_with("https://id.example.com/authorize?"));
		assert_eq!(pairs.get("state").map(String::as_str), Some("xyz"));
		assert_eq!(pairs.get("scope").map(String::as_str), Some("profile,email"));
	}

	#[test]
	fn token_options_serialize_params_into_the_body() {
		let params = TokenRequestParams {
			grant_type: Some("authorization_code".to_owned()),
			code: Some("c0de".to_owned()),
			..TokenRequestParams::default()
		};
		let options = access_token_request_options(&PlainProvider, &params);

		assert_eq!(options.body, b"grant_type=authorization_code&code=c0de".to_vec());
		assert!(options.headers.is_empty());
	}

	#[test]
	fn join_scopes_honors_the_separator() {
		let scopes = vec!["a".to_owned(), "b".to_owned()];

		assert_eq!(join_scopes(&scopes, ','), "a,b");
		assert_eq!(join_scopes(&scopes, ' '), "a b");
	}

	#[test]
	fn trait_defaults_match_the_generic_foundation() {
		let token = AccessToken::new("tok-1".to_owned());

		assert_eq!(PlainProvider.scope_separator(), ',');
		assert!(PlainProvider.default_headers().is_empty());
		assert!(PlainProvider.authorization_headers(&token).is_empty());
		assert!(PlainProvider.parse_response(br#"{"ok":true}"#).is_ok());
	}
}
