//! Caller-supplied mapping from a Steam profile to the application's user.

// self
use crate::{_prelude::*, profile::PlayerSummary};

/// Boxed future returned by [`VerifyProfile::verify`].
pub type VerifyFuture<'a, U> = Pin<Box<dyn Future<Output = Result<U, BoxError>> + 'a + Send>>;

/// Resolves the application user for an authenticated Steam profile.
///
/// Implemented for async closures such as
/// `|profile: PlayerSummary| async move { Ok::<_, BoxError>(profile.persona_name) }`.
/// An error fails the login with the error's message.
pub trait VerifyProfile<U>
where
	Self: Send + Sync,
{
	/// Maps `profile` to a user.
	fn verify(&self, profile: PlayerSummary) -> VerifyFuture<'_, U>;
}
impl<U, E, F, Fut> VerifyProfile<U> for F
where
	U: 'static + Send,
	E: 'static + Into<BoxError>,
	F: Send + Sync + Fn(PlayerSummary) -> Fut,
	Fut: 'static + Send + Future<Output = Result<U, E>>,
{
	fn verify(&self, profile: PlayerSummary) -> VerifyFuture<'_, U> {
		let fut = self(profile);

		Box::pin(async move { fut.await.map_err(Into::into) })
	}
}
