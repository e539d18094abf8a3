//! OpenID 2.0 relying-party contract, the future adapter around it, and the default Steam
//! relying party.
//!
//! [`RelyingParty`] is callback-shaped: each operation receives a one-shot [`Completion`] and
//! may call it synchronously or from a background task. [`adapter`] turns both operations into
//! futures so the strategy can drive them with `.await`.

pub mod adapter;
pub mod assertion;
#[cfg(feature = "reqwest")] pub mod steam;

pub use assertion::*;
#[cfg(feature = "reqwest")] pub use steam::*;

// self
use crate::{_prelude::*, error::TransportError, framework::AuthRequest};

/// OpenID 2.0 namespace URI.
pub const OPENID_NS: &str = "http://specs.openid.net/auth/2.0";
/// Identifier-select URI asking the provider to choose the identity.
pub const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";

/// One-shot completion handed to [`RelyingParty`] operations.
///
/// `Ok(None)` reports success without an artifact; the adapter turns it into an error.
pub type Completion<T> = Box<dyn FnOnce(Result<Option<T>, ProviderError>) + Send>;

/// Callback-style OpenID relying party.
pub trait RelyingParty
where
	Self: Send + Sync,
{
	/// Begins authentication against the provider `identifier`, completing with the URL the
	/// user-agent must be redirected to.
	fn authenticate(&self, identifier: &Url, immediate: bool, done: Completion<String>);

	/// Verifies the positive assertion carried by `request`.
	fn verify_assertion(&self, request: &AuthRequest, done: Completion<VerificationResult>);
}

/// Outcome of assertion verification.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
	/// Whether the provider vouched for the claimed identifier.
	pub authenticated: bool,
	/// Identifier the user proved ownership of.
	pub claimed_identifier: Option<String>,
}
impl VerificationResult {
	/// Authenticated result for `claimed_identifier`.
	pub fn authenticated(claimed_identifier: impl Into<String>) -> Self {
		Self { authenticated: true, claimed_identifier: Some(claimed_identifier.into()) }
	}

	/// Result for a login the provider did not authenticate (e.g. the user cancelled).
	pub fn rejected() -> Self {
		Self::default()
	}
}

/// Relying-party failures raised while beginning or verifying a login.
#[derive(Debug, ThisError)]
pub enum ProviderError {
	/// The request carries no OpenID assertion; it is not a provider callback.
	#[error("No OpenID assertion is present in the request.")]
	MissingAssertion,
	/// The provider answered with `openid.mode=error`.
	#[error("OpenID provider reported an error: {message}.")]
	ProviderReported {
		/// Provider-supplied `openid.error`.
		message: String,
	},
	/// The assertion is malformed or does not match this relying party.
	#[error("Invalid OpenID assertion: {reason}.")]
	InvalidAssertion {
		/// Which check failed.
		reason: String,
	},
	/// The provider did not confirm the assertion's signature.
	#[error("Invalid signature.")]
	InvalidSignature,
	/// Only the configured provider identifier can be used; discovery is not supported.
	#[error("Unsupported OpenID provider identifier: {identifier}.")]
	UnsupportedIdentifier {
		/// Identifier that was requested.
		identifier: String,
	},
	/// The provider answered `check_authentication` with a non-success status.
	#[error("OpenID provider returned HTTP {status}.")]
	Endpoint {
		/// HTTP status code.
		status: u16,
	},
	/// The `check_authentication` answer came from a URL other than the OP endpoint.
	#[error("OpenID provider redirected check_authentication to {location}.")]
	Redirected {
		/// URL that produced the answer.
		location: String,
	},

	/// Begin-authentication completed without a redirect URL.
	#[error("Got no URL from the authenticate method.")]
	NoRedirectUrl,
	/// Begin-authentication completed with an unparsable redirect URL.
	#[error("Got an invalid URL from the authenticate method.")]
	InvalidRedirectUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Verify-assertion completed without a result.
	#[error("Got no result from the verify assertion method.")]
	NoVerificationResult,
	/// The relying party dropped the completion without calling it.
	#[error("OpenID {operation} completion was dropped without a result.")]
	CallbackDropped {
		/// Operation whose completion was dropped.
		operation: &'static str,
	},
	/// No async runtime is available to drive the verification request.
	#[error("No async runtime is available to verify the assertion.")]
	NoRuntime,
	/// Transport failure while contacting the provider.
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl ProviderError {
	/// Builds an [`ProviderError::InvalidAssertion`] from any displayable reason.
	pub fn invalid_assertion(reason: impl Display) -> Self {
		Self::InvalidAssertion { reason: reason.to_string() }
	}
}
