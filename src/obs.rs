//! Optional observability helpers for the authentication phases.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `steam_strategy.auth` with the `phase`,
//!   `stage` (call site) and settled `outcome` fields, plus `warn`/`debug` events.
//! - Enable `metrics` to increment the `steam_strategy_auth_total` counter for every
//!   attempt/success/failure, labeled by `phase` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Phases of a single authentication attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthPhase {
	/// Assertion verification against the provider.
	Verify,
	/// Begin-authentication (redirect URL construction).
	Begin,
	/// Steam Web API profile lookup.
	Profile,
}
impl AuthPhase {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthPhase::Verify => "verify",
			AuthPhase::Begin => "begin",
			AuthPhase::Profile => "profile",
		}
	}
}
impl Display for AuthPhase {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseOutcome {
	/// Entry to a phase.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the strategy.
	Failure,
}
impl PhaseOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			PhaseOutcome::Attempt => "attempt",
			PhaseOutcome::Success => "success",
			PhaseOutcome::Failure => "failure",
		}
	}
}
impl Display for PhaseOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside a [`PhaseSpan`] and records its attempt and outcome.
pub async fn observe<T, E, Fut>(phase: AuthPhase, stage: &'static str, fut: Fut) -> Result<T, E>
where
	Fut: Future<Output = Result<T, E>>,
{
	let span = PhaseSpan::new(phase, stage);

	record_phase_outcome(phase, PhaseOutcome::Attempt);

	let result = span.instrument(fut).await;

	let outcome = if result.is_ok() { PhaseOutcome::Success } else { PhaseOutcome::Failure };

	span.record_outcome(outcome);
	record_phase_outcome(phase, outcome);

	result
}
