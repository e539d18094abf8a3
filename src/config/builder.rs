//! Validated construction of [`StrategyOptions`].

// self
use crate::{
	_prelude::*,
	auth::ApiKey,
	config::{DEFAULT_NONCE_MAX_AGE, SteamEndpoints, StrategyOptions},
	strategy::BeginPolicy,
};

/// Errors raised while constructing or validating strategy options.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum OptionsError {
	/// Return URL is mandatory.
	#[error("Missing return URL.")]
	MissingReturnUrl,
	/// API key is mandatory.
	#[error("Missing Steam Web API key.")]
	MissingApiKey,
	/// API key was empty.
	#[error("Steam Web API key cannot be empty.")]
	EmptyApiKey,
	/// API key contains whitespace, which Steam never issues.
	#[error("Steam Web API key contains whitespace.")]
	ApiKeyContainsWhitespace,
	/// Return URL must be an HTTP(S) URL.
	#[error("The return URL must use HTTP or HTTPS: {url}.")]
	UnsupportedReturnUrl {
		/// Return URL that failed validation.
		url: String,
	},
	/// Realms must not carry a fragment.
	#[error("The realm must not contain a fragment: {realm}.")]
	RealmHasFragment {
		/// Realm that failed validation.
		realm: String,
	},
	/// Return URL must live under the realm.
	#[error("The realm {realm} does not cover the return URL {return_url}.")]
	RealmMismatch {
		/// Configured realm.
		realm: String,
		/// Configured return URL.
		return_url: String,
	},
	/// Provider endpoints must use HTTPS outside loopback development hosts.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The Web API base URL is joined with relative paths and must end with `/`.
	#[error("The web_api endpoint must end with a slash: {url}.")]
	WebApiNotDirectory {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Nonce max age must be positive.
	#[error("The nonce max age must be positive.")]
	NonPositiveNonceMaxAge,
}

/// Builder for [`StrategyOptions`] values.
#[derive(Debug)]
pub struct StrategyOptionsBuilder {
	/// Return URL registered with Steam.
	pub return_url: Option<Url>,
	/// Optional OpenID realm.
	pub realm: Option<Url>,
	/// Steam Web API key.
	pub api_key: Option<ApiKey>,
	/// Provider endpoints.
	pub endpoints: SteamEndpoints,
	/// Maximum accepted nonce age.
	pub nonce_max_age: Duration,
	/// Begin-path policy.
	pub begin_policy: BeginPolicy,
}
impl StrategyOptionsBuilder {
	/// Creates a new builder pointing at Steam's public endpoints.
	pub fn new() -> Self {
		Self {
			return_url: None,
			realm: None,
			api_key: None,
			endpoints: SteamEndpoints::default(),
			nonce_max_age: DEFAULT_NONCE_MAX_AGE,
			begin_policy: BeginPolicy::default(),
		}
	}

	/// Sets the return URL.
	pub fn return_url(mut self, url: Url) -> Self {
		self.return_url = Some(url);

		self
	}

	/// Sets the OpenID realm.
	pub fn realm(mut self, url: Url) -> Self {
		self.realm = Some(url);

		self
	}

	/// Sets the Steam Web API key.
	pub fn api_key(mut self, key: impl Into<String>) -> Self {
		self.api_key = Some(ApiKey::new(key));

		self
	}

	/// Overrides every provider endpoint.
	pub fn endpoints(mut self, endpoints: SteamEndpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Overrides the OP endpoint.
	pub fn login_endpoint(mut self, url: Url) -> Self {
		self.endpoints.login = url;

		self
	}

	/// Overrides the Web API base URL.
	pub fn web_api_endpoint(mut self, url: Url) -> Self {
		self.endpoints.web_api = url;

		self
	}

	/// Overrides the maximum accepted nonce age (defaults to five minutes).
	pub fn nonce_max_age(mut self, max_age: Duration) -> Self {
		self.nonce_max_age = max_age;

		self
	}

	/// Overrides the begin-path policy.
	pub fn begin_policy(mut self, policy: BeginPolicy) -> Self {
		self.begin_policy = policy;

		self
	}

	/// Consumes the builder and validates the resulting options.
	pub fn build(self) -> Result<StrategyOptions, OptionsError> {
		let return_url = self.return_url.ok_or(OptionsError::MissingReturnUrl)?;
		let api_key = self.api_key.ok_or(OptionsError::MissingApiKey)?;
		let options = StrategyOptions {
			return_url,
			realm: self.realm,
			api_key,
			endpoints: self.endpoints,
			nonce_max_age: self.nonce_max_age,
			begin_policy: self.begin_policy,
		};

		options.validate()?;

		Ok(options)
	}
}
impl Default for StrategyOptionsBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl StrategyOptions {
	/// Validates invariants for the options.
	pub fn validate(&self) -> Result<(), OptionsError> {
		validate_api_key(&self.api_key)?;

		if !matches!(self.return_url.scheme(), "http" | "https") {
			return Err(OptionsError::UnsupportedReturnUrl { url: self.return_url.to_string() });
		}
		if let Some(realm) = self.realm.as_ref() {
			if realm.fragment().is_some() {
				return Err(OptionsError::RealmHasFragment { realm: realm.to_string() });
			}
			if !realm_covers(realm, &self.return_url) {
				return Err(OptionsError::RealmMismatch {
					realm: realm.to_string(),
					return_url: self.return_url.to_string(),
				});
			}
		}

		validate_endpoint("identifier", &self.endpoints.identifier)?;
		validate_endpoint("login", &self.endpoints.login)?;
		validate_endpoint("web_api", &self.endpoints.web_api)?;

		if !self.endpoints.web_api.path().ends_with('/') {
			return Err(OptionsError::WebApiNotDirectory {
				url: self.endpoints.web_api.to_string(),
			});
		}
		if !self.nonce_max_age.is_positive() {
			return Err(OptionsError::NonPositiveNonceMaxAge);
		}

		Ok(())
	}
}

fn validate_api_key(key: &ApiKey) -> Result<(), OptionsError> {
	let view = key.expose();

	if view.is_empty() {
		Err(OptionsError::EmptyApiKey)
	} else if view.chars().any(char::is_whitespace) {
		Err(OptionsError::ApiKeyContainsWhitespace)
	} else {
		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), OptionsError> {
	let loopback = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));

	if url.scheme() == "https" || (url.scheme() == "http" && loopback) {
		Ok(())
	} else {
		Err(OptionsError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

/// OpenID 2.0 realm matching: same scheme and port, host equal to the realm host (or a
/// subdomain of a `*.` wildcard realm), and a return path equal to or below the realm path.
fn realm_covers(realm: &Url, return_url: &Url) -> bool {
	if realm.scheme() != return_url.scheme()
		|| realm.port_or_known_default() != return_url.port_or_known_default()
	{
		return false;
	}

	let (Some(realm_host), Some(return_host)) = (realm.host_str(), return_url.host_str()) else {
		return false;
	};
	let host_matches = match realm_host.strip_prefix("*.") {
		Some(domain) =>
			return_host == domain
				|| return_host.strip_suffix(domain).is_some_and(|rest| rest.ends_with('.')),
		None => realm_host.eq_ignore_ascii_case(return_host),
	};

	if !host_matches {
		return false;
	}

	let realm_path = realm.path();
	let return_path = return_url.path();

	match return_path.strip_prefix(realm_path) {
		Some(rest) => realm_path.ends_with('/') || rest.is_empty() || rest.starts_with('/'),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Realm test URL should parse.")
	}

	#[test]
	fn realm_matching_follows_path_and_host_rules() {
		let return_url = url("https://app.example.com/auth/steam/callback");

		assert!(realm_covers(&url("https://app.example.com/"), &return_url));
		assert!(realm_covers(&url("https://app.example.com/auth"), &return_url));
		assert!(realm_covers(&url("https://app.example.com/auth/"), &return_url));
		assert!(!realm_covers(&url("https://app.example.com/au"), &return_url));
		assert!(!realm_covers(&url("http://app.example.com/"), &return_url));
		assert!(!realm_covers(&url("https://app.example.com:8443/"), &return_url));
		assert!(!realm_covers(&url("https://other.example.com/"), &return_url));
	}

	#[test]
	fn loopback_endpoints_may_use_http() {
		assert!(validate_endpoint("login", &url("http://127.0.0.1:8080/openid/login")).is_ok());
		assert!(validate_endpoint("login", &url("http://localhost/openid/login")).is_ok());
		assert!(matches!(
			validate_endpoint("login", &url("http://steamcommunity.com/openid/login")),
			Err(OptionsError::InsecureEndpoint { endpoint: "login", .. })
		));
	}
}
