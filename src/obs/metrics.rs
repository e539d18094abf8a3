// self
use crate::obs::{AuthPhase, PhaseOutcome};

/// Records a phase outcome via the global metrics recorder (when enabled).
pub fn record_phase_outcome(phase: AuthPhase, outcome: PhaseOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"steam_strategy_auth_total",
			"phase" => phase.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (phase, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_phase_outcome_noop_without_metrics() {
		record_phase_outcome(AuthPhase::Begin, PhaseOutcome::Failure);
	}
}
