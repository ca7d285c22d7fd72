//! Omron identity provider adapter for the [`oauth2`] crate—connect endpoints, blood
//! pressure scopes, provider error translation, and token revocation in one thin layer.
//!
//! The OAuth 2.0 protocol engine (authorization-code flow, token exchange, refresh,
//! state/PKCE generation) stays inside the [`oauth2`] foundation; this crate only
//! supplies the provider-specific knowledge that configures it.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod owner;
pub mod provider;
pub mod response;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _};
