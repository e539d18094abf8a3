//! Strategy options (data) and their validated builder.
//!
//! [`StrategyOptions`] carries the return URL registered with Steam, an optional OpenID realm,
//! the Steam Web API key, and the provider endpoints the default collaborators talk to. Options
//! are immutable once a strategy owns them and can be deserialized from any `serde` format;
//! strategies re-run [`StrategyOptions::validate`] on construction so deserialized values obey
//! the same rules as builder output.

pub mod builder;

pub use builder::*;

// crates.io
use serde::{Deserializer, Serializer};
// self
use crate::{_prelude::*, auth::ApiKey, strategy::BeginPolicy};

/// OpenID provider identifier Steam publishes for identifier-select logins.
pub const STEAM_OPENID_IDENTIFIER: &str = "https://steamcommunity.com/openid";
/// Steam OpenID 2.0 provider endpoint.
pub const STEAM_OPENID_LOGIN: &str = "https://steamcommunity.com/openid/login";
/// Steam Web API base URL.
pub const STEAM_WEB_API: &str = "https://api.steampowered.com/";
/// Maximum accepted age of an assertion's `openid.response_nonce`.
pub const DEFAULT_NONCE_MAX_AGE: Duration = Duration::minutes(5);

/// Endpoint set used by the default relying party and profile client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteamEndpoints {
	/// OP identifier passed to the begin-authentication call.
	pub identifier: Url,
	/// OP endpoint users are redirected to and assertions are verified against.
	pub login: Url,
	/// Base URL of the Steam Web API (must end with `/`).
	pub web_api: Url,
}
impl Default for SteamEndpoints {
	fn default() -> Self {
		Self {
			identifier: builtin(STEAM_OPENID_IDENTIFIER),
			login: builtin(STEAM_OPENID_LOGIN),
			web_api: builtin(STEAM_WEB_API),
		}
	}
}

/// Immutable configuration owned by a strategy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyOptions {
	/// URL Steam sends the user back to after login (`openid.return_to`).
	pub return_url: Url,
	/// OpenID realm shown to the user; defaults to the return URL's origin.
	#[serde(default)]
	pub realm: Option<Url>,
	/// Steam Web API key used for profile lookups.
	pub api_key: ApiKey,
	/// Provider endpoints; default to Steam's public endpoints.
	#[serde(default)]
	pub endpoints: SteamEndpoints,
	/// Maximum accepted age (and future skew) of `openid.response_nonce`.
	#[serde(rename = "nonce_max_age_secs", default = "default_nonce_max_age", with = "seconds")]
	pub nonce_max_age: Duration,
	/// Which verification failures start a new login instead of failing the attempt.
	#[serde(default)]
	pub begin_policy: BeginPolicy,
}
impl StrategyOptions {
	/// Creates a new builder.
	pub fn builder() -> StrategyOptionsBuilder {
		StrategyOptionsBuilder::new()
	}

	/// Returns the configured realm, or the origin of the return URL when none is set.
	pub fn effective_realm(&self) -> Url {
		self.realm.clone().unwrap_or_else(|| origin_of(&self.return_url))
	}
}

fn builtin(raw: &'static str) -> Url {
	Url::parse(raw).expect("Built-in Steam endpoint must parse.")
}

fn default_nonce_max_age() -> Duration {
	DEFAULT_NONCE_MAX_AGE
}

fn origin_of(url: &Url) -> Url {
	let mut origin = url.clone();

	origin.set_path("/");
	origin.set_query(None);
	origin.set_fragment(None);

	// Only fails for cannot-be-a-base URLs, which never reach this point.
	let _ = origin.set_username("");
	let _ = origin.set_password(None);

	origin
}

mod seconds {
	// self
	use super::*;

	pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(value.whole_seconds())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: Deserializer<'de>,
	{
		i64::deserialize(deserializer).map(Duration::seconds)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn builtin_endpoints_parse() {
		let endpoints = SteamEndpoints::default();

		assert_eq!(endpoints.identifier.as_str(), STEAM_OPENID_IDENTIFIER);
		assert_eq!(endpoints.login.as_str(), STEAM_OPENID_LOGIN);
		assert_eq!(endpoints.web_api.as_str(), STEAM_WEB_API);
	}

	#[test]
	fn realm_defaults_to_return_url_origin() {
		let options = StrategyOptions::builder()
			.return_url(
				Url::parse("https://user:pw@app.example.com:8443/auth/steam/callback?next=%2F#top")
					.expect("Return URL fixture should parse."),
			)
			.api_key("key")
			.build()
			.expect("Options fixture should build.");

		assert_eq!(options.effective_realm().as_str(), "https://app.example.com:8443/");
	}

	#[test]
	fn deserializes_with_defaults() {
		let options: StrategyOptions = serde_json::from_str(
			r#"{"return_url":"https://app.example.com/auth/steam/callback","api_key":"key"}"#,
		)
		.expect("Minimal options should deserialize.");

		assert_eq!(options.realm, None);
		assert_eq!(options.endpoints, SteamEndpoints::default());
		assert_eq!(options.nonce_max_age, DEFAULT_NONCE_MAX_AGE);
		assert_eq!(options.begin_policy, BeginPolicy::AnyVerifyError);
		assert!(options.validate().is_ok());

		let options: StrategyOptions = serde_json::from_str(
			r#"{"return_url":"https://app.example.com/cb","api_key":"key","nonce_max_age_secs":30,"begin_policy":"missing_assertion"}"#,
		)
		.expect("Explicit options should deserialize.");

		assert_eq!(options.nonce_max_age, Duration::seconds(30));
		assert_eq!(options.begin_policy, BeginPolicy::MissingAssertion);
	}
}
