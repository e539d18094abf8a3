//! Strategy-level error types shared across the relying party, profile client, and options.

// self
use crate::{
	_prelude::*, auth::IdentifierError, config::OptionsError, openid::ProviderError,
	profile::ProfileError,
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error accepted from caller-supplied collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical strategy error exposed by public APIs.
///
/// The `Display` output of each variant is the failure reason reported to the host
/// framework, so messages are written for end users of the sign-in flow.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Identity provider (relying party) failure while beginning or verifying a login.
	#[error(transparent)]
	Provider(#[from] ProviderError),
	/// Profile lookup failure.
	#[error(transparent)]
	Profile(#[from] ProfileError),
	/// Strategy options failed validation.
	#[error(transparent)]
	Options(#[from] OptionsError),
	/// Claimed identifier did not end with a usable Steam identifier.
	#[error(transparent)]
	Identifier(#[from] IdentifierError),

	/// The provider answered, but did not authenticate a claimed identifier.
	#[error("Not authenticated from result.")]
	NotAuthenticated,
	/// Caller-supplied profile mapping function failed.
	#[error("{message}")]
	Verify {
		/// Message captured from the underlying error.
		message: String,
		/// Error returned by the mapping function.
		#[source]
		source: BoxError,
	},
}
impl Error {
	/// Wraps a mapping-function failure, preserving its message verbatim.
	pub fn verify(source: BoxError) -> Self {
		Self::Verify { message: source.to_string(), source }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling Steam.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling Steam.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn verify_errors_surface_the_source_message() {
		let err = Error::verify("user is banned".into());

		assert_eq!(err.to_string(), "user is banned");
		assert!(err.source().is_some());
	}

	#[test]
	fn provider_errors_are_transparent() {
		let err = Error::from(ProviderError::NoRedirectUrl);

		assert_eq!(err.to_string(), ProviderError::NoRedirectUrl.to_string());
	}
}
