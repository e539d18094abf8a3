//! Steam sign-in for Rust web apps: an OpenID 2.0 authentication strategy that verifies the
//! provider's assertion and resolves your user from the Steam Web API profile.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod framework;
pub mod http;
pub mod obs;
pub mod openid;
pub mod profile;
pub mod strategy;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::StrategyOptions,
		http::ReqwestHttpClient,
		strategy::{ReqwestSteamStrategy, SteamStrategy, VerifyProfile},
	};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`SteamStrategy`] backed by the reqwest collaborators and the insecure test
	/// transport.
	pub fn build_reqwest_test_strategy<U>(
		options: StrategyOptions,
		verify: impl 'static + VerifyProfile<U>,
	) -> ReqwestSteamStrategy<U>
	where
		U: 'static + Send,
	{
		SteamStrategy::with_http_client(options, test_reqwest_http_client(), verify)
			.expect("Test strategy options should be valid.")
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{BoxError, Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
