//! High-level client coordinating the adapter with the [`oauth2`] foundation.

// crates.io
use oauth2::{AccessToken, AuthorizationCode, HttpResponse, RefreshToken, TokenResponse};
// self
use crate::{
	_prelude::*,
	http::{ResponseMetadataSlot, TokenHttpClient},
	oauth::{self, ConfiguredOmronTokenClient, OmronTokenResponse},
	obs::{OperationKind, OperationSpan},
	owner::ResourceOwner,
	provider::{self, AuthorizationOptions, Omron, ProviderCapabilities},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestOmronClient = OmronClient<ReqwestHttpClient>;

/// Coordinates OAuth 2.0 calls against the Omron provider.
///
/// The client holds the adapter, client credentials, and the transport; the protocol
/// engine stays inside the [`oauth2`] foundation, which this facade configures from
/// the adapter's capability set on every call. Because the adapter exposes no
/// resource-owner endpoint, owner data is derived from the token response claims
/// instead of a profile fetch.
#[derive(Clone)]
pub struct OmronClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Provider adapter consulted for endpoints, scopes, and response policy.
	pub provider: Arc<Omron>,
	/// HTTP client used for every outbound provider request.
	pub http_client: Arc<C>,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Optional confidential client secret.
	pub client_secret: Option<String>,
	/// Redirect URI bound to authorization and exchange requests.
	pub redirect_uri: Option<Url>,
}
impl<C> OmronClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		provider: Omron,
		client_id: impl Into<String>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			provider: Arc::new(provider),
			http_client: http_client.into(),
			client_id: client_id.into(),
			client_secret: None,
			redirect_uri: None,
		}
	}

	/// Sets or replaces the client secret.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Sets or replaces the redirect URI.
	pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
		self.redirect_uri = Some(redirect_uri);

		self
	}

	/// Builds the authorization URL callers send end-users to.
	pub fn authorization_url(&self, options: &AuthorizationOptions) -> Result<Url> {
		let _guard = OperationSpan::new(OperationKind::Authorization).entered();

		provider::authorization_url(
			self.provider.as_ref(),
			&self.client_id,
			self.redirect_uri.as_ref(),
			options,
		)
		.map_err(Into::into)
	}

	/// Exchanges an authorization code for a token response.
	pub async fn exchange_code(&self, code: &str) -> Result<OmronTokenResponse> {
		let token_client = self.token_client()?;
		let slot = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(slot.clone());
		let span = OperationSpan::new(OperationKind::CodeExchange);

		span.instrument(async {
			token_client
				.exchange_code(AuthorizationCode::new(code.to_owned()))
				.request_async(&handle)
				.await
				.map_err(|err| {
					oauth::map_token_request_error(self.provider.as_ref(), slot.take(), err)
				})
		})
		.await
	}

	/// Refreshes an access token.
	pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<OmronTokenResponse> {
		let token_client = self.token_client()?;
		let refresh_secret = RefreshToken::new(refresh_token.to_owned());
		let slot = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(slot.clone());
		let span = OperationSpan::new(OperationKind::Refresh);

		span.instrument(async {
			token_client.exchange_refresh_token(&refresh_secret).request_async(&handle).await.map_err(
				|err| oauth::map_token_request_error(self.provider.as_ref(), slot.take(), err),
			)
		})
		.await
	}

	/// Derives the resource owner from a token response.
	pub fn resource_owner(&self, response: &OmronTokenResponse) -> ResourceOwner {
		self.provider
			.create_resource_owner(&response.extra_fields().claims, response.access_token())
	}

	/// Revokes an access token through the provider's non-standard endpoint.
	pub async fn revoke(&self, token: &AccessToken) -> Result<HttpResponse> {
		let span = OperationSpan::new(OperationKind::Revocation);

		span.instrument(self.provider.revoke(self.http_client.as_ref(), token)).await
	}

	fn token_client(&self) -> Result<ConfiguredOmronTokenClient> {
		oauth::from_provider(
			self.provider.as_ref(),
			&self.client_id,
			self.client_secret.as_deref(),
			self.redirect_uri.as_ref(),
		)
	}
}
#[cfg(feature = "reqwest")]
impl OmronClient<ReqwestHttpClient> {
	/// Creates a client with the crate's default reqwest transport.
	pub fn new(provider: Omron, client_id: impl Into<String>) -> Self {
		Self::with_http_client(provider, client_id, ReqwestHttpClient::default())
	}
}
impl<C> Debug for OmronClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OmronClient")
			.field("provider", &self.provider)
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("redirect_uri", &self.redirect_uri)
			.finish()
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;

	fn client() -> ReqwestOmronClient {
		let provider =
			Omron::new("https://id.example.com").expect("Adapter fixture should build.");

		OmronClient::new(provider, "client-1").with_client_secret("secret")
	}

	#[test]
	fn debug_hides_the_client_secret() {
		let rendered = format!("{:?}", client());

		assert!(rendered.contains("client_secret_set: true"));
		assert!(!rendered.contains("secret\""));
	}

	#[test]
	fn authorization_url_applies_the_provider_policy() {
		let url = client()
			.authorization_url(&AuthorizationOptions::new().with_state("xyz"))
			.expect("Authorization URL should build.");

		assert!(url.as_str().starts_with("https://id.example.com/connect/authorize?"));
		assert!(url.query_pairs().all(|(key, _)| key != "approval_prompt"));
	}
}
