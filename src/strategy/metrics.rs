// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for authentication attempts of one strategy instance.
#[derive(Debug, Default)]
pub struct StrategyMetrics {
	attempts: AtomicU64,
	redirects: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
}
impl StrategyMetrics {
	/// Returns the total number of `authenticate` calls.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that redirected to the provider.
	pub fn redirects(&self) -> u64 {
		self.redirects.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that resolved a user.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of failed calls.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_redirect(&self) {
		self.redirects.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}
}
