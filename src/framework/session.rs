//! Request-scoped session contract and a thread-safe in-memory implementation.

// self
use crate::_prelude::*;

type SessionMap = Arc<RwLock<HashMap<String, String>>>;

/// Key/value session the host framework loads before calling a strategy and commits after.
///
/// Methods take `&self` so one session can be shared with the strategy while the framework
/// keeps ownership; implementations provide their own interior mutability.
pub trait Session
where
	Self: Send + Sync,
{
	/// Returns the value stored under `key`.
	fn get(&self, key: &str) -> Option<String>;

	/// Stores `value` under `key`, replacing any previous value.
	fn set(&self, key: &str, value: String);

	/// Removes `key`.
	fn unset(&self, key: &str);
}

/// Thread-safe session backend that keeps values in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemorySession(SessionMap);
impl MemorySession {
	/// Returns the number of stored keys.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns true when no keys are stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl Session for MemorySession {
	fn get(&self, key: &str) -> Option<String> {
		self.0.read().get(key).cloned()
	}

	fn set(&self, key: &str, value: String) {
		self.0.write().insert(key.to_owned(), value);
	}

	fn unset(&self, key: &str) {
		self.0.write().remove(key);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn clones_share_state() {
		let session = MemorySession::default();
		let view = session.clone();

		session.set("auth:error", "Not authenticated from result.".into());

		assert_eq!(view.get("auth:error").as_deref(), Some("Not authenticated from result."));

		view.unset("auth:error");

		assert!(session.is_empty());
	}
}
