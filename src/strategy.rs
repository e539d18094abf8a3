//! The Steam authentication strategy.
//!
//! [`SteamStrategy::authenticate`] first tries to verify an OpenID assertion carried by the
//! request. A verified identity is turned into a Steam identifier, its profile is fetched,
//! and the caller's [`VerifyProfile`] mapping resolves the user. When verification itself
//! fails and the configured [`BeginPolicy`] allows it, the strategy starts a new login and
//! returns the provider redirect instead.

pub mod policy;
pub mod verify;

mod metrics;

pub use metrics::*;
pub use policy::*;
pub use verify::*;

// self
use crate::{
	_prelude::*,
	auth::SteamId,
	config::StrategyOptions,
	framework::{AuthOutcome, AuthRequest, AuthenticateOptions, Session, Strategy, StrategyFuture},
	obs::{self, AuthPhase},
	openid::{ProviderError, RelyingParty, VerificationResult, adapter},
	profile::ProfileClient,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, openid::SteamRelyingParty, profile::SteamWebApi};

/// Name the strategy registers under.
pub const STRATEGY_NAME: &str = "steam";

#[cfg(feature = "reqwest")]
/// Strategy specialized for the crate's default reqwest collaborators.
pub type ReqwestSteamStrategy<U> = SteamStrategy<U, SteamRelyingParty, SteamWebApi>;

/// Steam OpenID strategy resolving users of type `U`.
///
/// The strategy holds no per-request state; one instance serves concurrent requests through
/// `&self`.
pub struct SteamStrategy<U, R, P>
where
	R: ?Sized + RelyingParty,
	P: ?Sized + ProfileClient,
{
	/// Validated options.
	pub options: StrategyOptions,
	/// OpenID relying party used to verify assertions and begin logins.
	pub relying_party: Arc<R>,
	/// Client used to fetch the authenticated player's profile.
	pub profiles: Arc<P>,
	verify: Arc<dyn VerifyProfile<U>>,
	metrics: Arc<StrategyMetrics>,
}
impl<U, R, P> SteamStrategy<U, R, P>
where
	U: 'static + Send,
	R: ?Sized + RelyingParty,
	P: ?Sized + ProfileClient,
{
	/// Creates a strategy from explicit collaborators.
	///
	/// `options` are re-validated so deserialized values obey the builder's rules.
	pub fn with_collaborators(
		options: StrategyOptions,
		relying_party: impl Into<Arc<R>>,
		profiles: impl Into<Arc<P>>,
		verify: impl 'static + VerifyProfile<U>,
	) -> Result<Self> {
		options.validate()?;

		Ok(Self {
			options,
			relying_party: relying_party.into(),
			profiles: profiles.into(),
			verify: Arc::new(verify),
			metrics: Default::default(),
		})
	}

	/// Returns the per-instance counters.
	pub fn metrics(&self) -> &StrategyMetrics {
		&self.metrics
	}

	/// Authenticates `request`, recording the result in `session`.
	pub async fn authenticate(
		&self,
		request: &AuthRequest,
		session: &dyn Session,
		options: &AuthenticateOptions,
	) -> AuthOutcome<U> {
		self.metrics.record_attempt();

		let verified = obs::observe(
			AuthPhase::Verify,
			"verify_assertion",
			adapter::verify_assertion(self.relying_party.as_ref(), request),
		)
		.await;
		let outcome = match verified {
			Ok(result) => match self.resolve_user(result).await {
				Ok(user) => AuthOutcome::Success(user),
				Err(e) => AuthOutcome::Failure(e),
			},
			Err(e) if self.options.begin_policy.begins_on(&e) => self.begin(e).await,
			Err(e) => AuthOutcome::Failure(e.into()),
		};

		self.record(&outcome, session, options);

		outcome
	}

	async fn begin(&self, cause: ProviderError) -> AuthOutcome<U> {
		#[cfg(feature = "tracing")]
		if !matches!(cause, ProviderError::MissingAssertion) {
			tracing::warn!(error = %cause, "Assertion verification failed; starting a new login.");
		}
		#[cfg(not(feature = "tracing"))]
		let _ = cause;

		let begun = obs::observe(
			AuthPhase::Begin,
			"authenticate",
			adapter::authenticate(
				self.relying_party.as_ref(),
				&self.options.endpoints.identifier,
				false,
			),
		)
		.await;

		match begun {
			Ok(url) => AuthOutcome::Redirect(url),
			Err(e) => AuthOutcome::Failure(e.into()),
		}
	}

	async fn resolve_user(&self, result: VerificationResult) -> Result<U> {
		let claimed = match result {
			VerificationResult { authenticated: true, claimed_identifier: Some(claimed) } =>
				claimed,
			_ => return Err(Error::NotAuthenticated),
		};
		let steam_id = SteamId::from_claimed_identifier(&claimed)?;
		let profile = obs::observe(
			AuthPhase::Profile,
			"player_summary",
			self.profiles.player_summary(&steam_id),
		)
		.await?;

		self.verify.verify(profile).await.map_err(Error::verify)
	}

	fn record(
		&self,
		outcome: &AuthOutcome<U>,
		session: &dyn Session,
		options: &AuthenticateOptions,
	) {
		match outcome {
			AuthOutcome::Redirect(_url) => {
				self.metrics.record_redirect();

				#[cfg(feature = "tracing")]
				tracing::debug!(host = _url.host_str(), "Redirecting to the OpenID provider.");
			},
			AuthOutcome::Success(_) => {
				self.metrics.record_success();

				let name = options.name.as_deref().unwrap_or(STRATEGY_NAME);

				session.unset(&options.session_error_key);
				session.set(&options.session_strategy_key, name.to_owned());
			},
			AuthOutcome::Failure(e) => {
				self.metrics.record_failure();

				#[cfg(feature = "tracing")]
				tracing::debug!(error = %e, "Steam authentication failed.");

				session.set(&options.session_error_key, e.to_string());
			},
		}
	}
}
#[cfg(feature = "reqwest")]
impl<U> SteamStrategy<U, SteamRelyingParty, SteamWebApi>
where
	U: 'static + Send,
{
	/// Creates a strategy talking to Steam through a default reqwest client.
	pub fn new(options: StrategyOptions, verify: impl 'static + VerifyProfile<U>) -> Result<Self> {
		Self::with_http_client(options, ReqwestHttpClient::default(), verify)
	}

	/// Creates a strategy whose relying party and profile client share `http_client`.
	pub fn with_http_client(
		options: StrategyOptions,
		http_client: ReqwestHttpClient,
		verify: impl 'static + VerifyProfile<U>,
	) -> Result<Self> {
		let relying_party = SteamRelyingParty::with_http_client(&options, http_client.clone());
		let profiles = SteamWebApi::from_options(&options, http_client);

		Self::with_collaborators(options, relying_party, profiles, verify)
	}
}
impl<U, R, P> Strategy<U> for SteamStrategy<U, R, P>
where
	U: 'static + Send,
	R: ?Sized + RelyingParty,
	P: ?Sized + ProfileClient,
{
	fn name(&self) -> &str {
		STRATEGY_NAME
	}

	fn authenticate<'a>(
		&'a self,
		request: &'a AuthRequest,
		session: &'a dyn Session,
		options: &'a AuthenticateOptions,
	) -> StrategyFuture<'a, AuthOutcome<U>> {
		Box::pin(SteamStrategy::authenticate(self, request, session, options))
	}
}
impl<U, R, P> Clone for SteamStrategy<U, R, P>
where
	R: ?Sized + RelyingParty,
	P: ?Sized + ProfileClient,
{
	fn clone(&self) -> Self {
		Self {
			options: self.options.clone(),
			relying_party: self.relying_party.clone(),
			profiles: self.profiles.clone(),
			verify: self.verify.clone(),
			metrics: self.metrics.clone(),
		}
	}
}
impl<U, R, P> Debug for SteamStrategy<U, R, P>
where
	R: ?Sized + RelyingParty,
	P: ?Sized + ProfileClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SteamStrategy")
			.field("options", &self.options)
			.field("metrics", &self.metrics)
			.finish_non_exhaustive()
	}
}
