//! Stateless OpenID 2.0 relying party for Steam.
//!
//! Steam only supports identifier-select logins against a single OP endpoint, so discovery
//! and associations are skipped: [`SteamRelyingParty`] builds the `checkid_setup` URL
//! directly and confirms every positive assertion with a `check_authentication` round-trip.

// self
use crate::{
	_prelude::*,
	config::StrategyOptions,
	error::TransportError,
	framework::AuthRequest,
	http::ReqwestHttpClient,
	openid::{
		AssertionMode, AssertionParams, Completion, IDENTIFIER_SELECT, OPENID_NS, ProviderError,
		RelyingParty, VerificationResult, check_nonce, check_return_to, parse_key_value_form,
	},
};

/// Relying party talking to the Steam OpenID provider over reqwest.
#[derive(Clone, Debug)]
pub struct SteamRelyingParty {
	/// HTTP client used for `check_authentication`.
	pub http_client: ReqwestHttpClient,
	identifier: Url,
	login: Url,
	return_url: Url,
	realm: Url,
	nonce_max_age: Duration,
}
impl SteamRelyingParty {
	/// Creates a relying party with a default reqwest client.
	pub fn new(options: &StrategyOptions) -> Self {
		Self::with_http_client(options, ReqwestHttpClient::default())
	}

	/// Creates a relying party that sends verification requests through `http_client`.
	pub fn with_http_client(options: &StrategyOptions, http_client: ReqwestHttpClient) -> Self {
		Self {
			http_client,
			identifier: options.endpoints.identifier.clone(),
			login: options.endpoints.login.clone(),
			return_url: options.return_url.clone(),
			realm: options.effective_realm(),
			nonce_max_age: options.nonce_max_age,
		}
	}

	/// Builds the provider URL the user-agent is redirected to.
	pub fn authorize_url(&self, immediate: bool) -> Url {
		let mode = if immediate { "checkid_immediate" } else { "checkid_setup" };
		let mut url = self.login.clone();

		url.query_pairs_mut()
			.append_pair("openid.ns", OPENID_NS)
			.append_pair("openid.mode", mode)
			.append_pair("openid.claimed_id", IDENTIFIER_SELECT)
			.append_pair("openid.identity", IDENTIFIER_SELECT)
			.append_pair("openid.return_to", self.return_url.as_str())
			.append_pair("openid.realm", self.realm.as_str());

		url
	}

	/// Runs every check that needs no network access.
	///
	/// Returns `None` when the provider reported a declined login and the assertion fields that
	/// must be confirmed otherwise.
	fn inspect(
		&self,
		request: &AuthRequest,
		now: OffsetDateTime,
	) -> Result<Option<AssertionParams>, ProviderError> {
		let params = AssertionParams::from_request(request);

		match params.mode().ok_or(ProviderError::MissingAssertion)? {
			AssertionMode::IdRes => {},
			AssertionMode::Cancel => return Ok(None),
			AssertionMode::Error => {
				let message = params.get("error").unwrap_or("unknown error").to_owned();

				return Err(ProviderError::ProviderReported { message });
			},
			AssertionMode::SetupNeeded =>
				return Err(ProviderError::invalid_assertion("provider requires setup")),
			AssertionMode::Other(mode) =>
				return Err(ProviderError::invalid_assertion(format_args!(
					"unexpected openid.mode {mode}"
				))),
		}

		params.check_positive(&self.login)?;
		check_return_to(params.require("return_to")?, &request.url)?;
		check_nonce(params.require("response_nonce")?, now, self.nonce_max_age)?;

		Ok(Some(params))
	}

	/// Asks the provider to confirm the assertion signature.
	async fn confirm(&self, params: AssertionParams) -> Result<VerificationResult, ProviderError> {
		let response = self
			.http_client
			.post(self.login.clone())
			.form(&params.check_authentication_form())
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();

		if !status.is_success() {
			#[cfg(feature = "tracing")]
			tracing::debug!(status = status.as_u16(), "check_authentication was not answered.");

			return Err(ProviderError::Endpoint { status: status.as_u16() });
		}
		// Only the OP endpoint itself may confirm the signature.
		if response.url() != &self.login {
			#[cfg(feature = "tracing")]
			tracing::debug!(
				answered_by = response.url().host_str(),
				"check_authentication was redirected."
			);

			return Err(ProviderError::Redirected { location: response.url().to_string() });
		}

		let body = response.text().await.map_err(TransportError::from)?;
		let answer = parse_key_value_form(&body);

		if answer.get("is_valid").map(String::as_str) != Some("true") {
			#[cfg(feature = "tracing")]
			tracing::debug!(is_valid = ?answer.get("is_valid"), "Provider rejected the assertion.");

			return Err(ProviderError::InvalidSignature);
		}

		let claimed = params.require("claimed_id")?;

		Ok(VerificationResult::authenticated(claimed))
	}
}
impl RelyingParty for SteamRelyingParty {
	fn authenticate(&self, identifier: &Url, immediate: bool, done: Completion<String>) {
		if identifier != &self.identifier {
			return done(Err(ProviderError::UnsupportedIdentifier {
				identifier: identifier.to_string(),
			}));
		}

		done(Ok(Some(self.authorize_url(immediate).into())));
	}

	fn verify_assertion(&self, request: &AuthRequest, done: Completion<VerificationResult>) {
		let params = match self.inspect(request, OffsetDateTime::now_utc()) {
			Ok(Some(params)) => params,
			Ok(None) => return done(Ok(Some(VerificationResult::rejected()))),
			Err(e) => return done(Err(e)),
		};
		let Ok(runtime) = tokio::runtime::Handle::try_current() else {
			return done(Err(ProviderError::NoRuntime));
		};
		let party = self.clone();

		runtime.spawn(async move {
			done(party.confirm(params).await.map(Some));
		});
	}
}
