//! Adapter-level error types shared across the provider, facade, and transport layers.

// self
use crate::{
	_prelude::*,
	response::{ResponseData, ResponseParseError},
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical adapter error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Provider reported a structured error payload.
	#[error(transparent)]
	IdentityProvider(#[from] IdentityProviderError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Endpoint responded with malformed JSON that could not be parsed.
	#[error("Endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: ResponseParseError,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Endpoint produced a response the foundation could not interpret.
	#[error("Endpoint returned an unexpected response: {message}.")]
	UnexpectedResponse {
		/// Foundation-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Structured error payload returned by the identity provider.
///
/// Raised whenever a parsed response carries an `error` key, for token exchanges and
/// revocation alike, before any success-path field is consumed.
#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("Identity provider returned an error: {message} (code {code}).")]
pub struct IdentityProviderError {
	/// Human-readable message taken from the response's `error` field.
	pub message: String,
	/// Provider-supplied `status` field when present, else the HTTP status code.
	pub code: u16,
	/// Raw parsed response body.
	pub data: ResponseData,
}
impl IdentityProviderError {
	/// Creates a new error from the provider's message, resolved code, and raw payload.
	pub fn new(message: impl Into<String>, code: u16, data: ResponseData) -> Self {
		Self { message: message.into(), code, data }
	}
}

/// Configuration and validation failures raised by the adapter.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Authority hostname must be supplied.
	#[error("Authority hostname must not be empty.")]
	EmptyAuthHostname,
	/// Endpoints are formed by concatenation, so a trailing slash would double up.
	#[error("Authority hostname must not end with a slash: {hostname}.")]
	TrailingSlash {
		/// Offending hostname value.
		hostname: String,
	},
	/// Resolved endpoint is not a valid URL.
	#[error("Provider endpoint is not a valid URL.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
