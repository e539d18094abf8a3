//! Host-framework contract: the strategy trait, per-call options, the incoming request, the
//! request-scoped session, and the tagged outcome every strategy returns.
//!
//! Frameworks hold strategies behind `Arc<dyn Strategy<User>>` and dispatch on the returned
//! [`AuthOutcome`]: send a redirect, continue with the resolved user, or render the failure.

pub mod outcome;
pub mod request;
pub mod session;

pub use outcome::*;
pub use request::*;
pub use session::*;

// self
use crate::_prelude::*;

const DEFAULT_SESSION_ERROR_KEY: &str = "auth:error";
const DEFAULT_SESSION_STRATEGY_KEY: &str = "strategy";

/// Boxed future returned by [`Strategy::authenticate`].
pub type StrategyFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Authentication strategy invoked by the host framework for each login attempt.
pub trait Strategy<U>
where
	Self: Send + Sync,
{
	/// Stable strategy name recorded in the session after a successful login.
	fn name(&self) -> &str;

	/// Authenticates the incoming request.
	fn authenticate<'a>(
		&'a self,
		request: &'a AuthRequest,
		session: &'a dyn Session,
		options: &'a AuthenticateOptions,
	) -> StrategyFuture<'a, AuthOutcome<U>>;
}

/// Per-call options supplied by the host framework.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticateOptions {
	/// Name recorded under `session_strategy_key`; defaults to [`Strategy::name`].
	pub name: Option<String>,
	/// Session key receiving the failure message of the last attempt.
	pub session_error_key: String,
	/// Session key receiving the strategy name after a successful login.
	pub session_strategy_key: String,
}
impl AuthenticateOptions {
	/// Overrides the recorded strategy name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Overrides the session key used for failure messages.
	pub fn with_session_error_key(mut self, key: impl Into<String>) -> Self {
		self.session_error_key = key.into();

		self
	}
}
impl Default for AuthenticateOptions {
	fn default() -> Self {
		Self {
			name: None,
			session_error_key: DEFAULT_SESSION_ERROR_KEY.into(),
			session_strategy_key: DEFAULT_SESSION_STRATEGY_KEY.into(),
		}
	}
}
