//! Decides which verification failures start a fresh login.

// self
use crate::{_prelude::*, openid::ProviderError};

/// Which assertion-verification failures send the user to the provider again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeginPolicy {
	/// Every verification error starts a new login; the error itself is only logged.
	#[default]
	AnyVerifyError,
	/// Only requests without an assertion start a new login; other verification errors fail
	/// the attempt.
	MissingAssertion,
}
impl BeginPolicy {
	/// Returns true when `error` should start a new login instead of failing.
	pub fn begins_on(self, error: &ProviderError) -> bool {
		match self {
			BeginPolicy::AnyVerifyError => true,
			BeginPolicy::MissingAssertion => matches!(error, ProviderError::MissingAssertion),
		}
	}
}
