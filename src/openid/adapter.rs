//! Future adapter over the callback-style [`RelyingParty`] operations.
//!
//! Each call hands the relying party a one-shot completion wired to a
//! [`oneshot`](futures::channel::oneshot) channel and awaits the receiver. The completion is
//! `FnOnce`, so every call settles exactly once: with the callback's value, with the callback's
//! error, or with a synthesized error when the callback succeeds without an artifact or is
//! dropped. There are no retries and no timeouts.

// crates.io
use futures::channel::oneshot;
// self
use crate::{
	_prelude::*,
	framework::AuthRequest,
	openid::{Completion, ProviderError, RelyingParty, VerificationResult},
};

type Settled<T> = Result<Option<T>, ProviderError>;

/// Begins authentication and resolves with the provider redirect URL.
pub async fn authenticate<R>(
	relying_party: &R,
	identifier: &Url,
	immediate: bool,
) -> Result<Url, ProviderError>
where
	R: ?Sized + RelyingParty,
{
	let (done, settled) = completion::<String>();

	relying_party.authenticate(identifier, immediate, done);

	let url = settled
		.await
		.map_err(|_| ProviderError::CallbackDropped { operation: "authenticate" })??
		.filter(|url| !url.is_empty())
		.ok_or(ProviderError::NoRedirectUrl)?;

	Url::parse(&url).map_err(|source| ProviderError::InvalidRedirectUrl { source })
}

/// Verifies the assertion carried by `request`.
pub async fn verify_assertion<R>(
	relying_party: &R,
	request: &AuthRequest,
) -> Result<VerificationResult, ProviderError>
where
	R: ?Sized + RelyingParty,
{
	let (done, settled) = completion::<VerificationResult>();

	relying_party.verify_assertion(request, done);

	settled
		.await
		.map_err(|_| ProviderError::CallbackDropped { operation: "verify_assertion" })??
		.ok_or(ProviderError::NoVerificationResult)
}

fn completion<T>() -> (Completion<T>, oneshot::Receiver<Settled<T>>)
where
	T: 'static + Send,
{
	let (tx, rx) = oneshot::channel();
	let done: Completion<T> = Box::new(move |settled| {
		// The receiver is gone only when the awaiting future was dropped.
		let _ = tx.send(settled);
	});

	(done, rx)
}
