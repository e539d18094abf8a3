//! Tagged outcome of one authentication attempt.

// self
use crate::_prelude::*;

/// Result of a single authentication attempt.
///
/// Redirects are an ordinary outcome rather than an error, so callers dispatch on the tag
/// instead of inspecting failures.
#[derive(Debug)]
pub enum AuthOutcome<U> {
	/// Send the user-agent to the identity provider.
	Redirect(Url),
	/// Login completed with the resolved user.
	Success(U),
	/// Login failed; the error's `Display` output is the failure reason.
	Failure(Error),
}
impl<U> AuthOutcome<U> {
	/// Returns true for [`AuthOutcome::Redirect`].
	pub fn is_redirect(&self) -> bool {
		matches!(self, Self::Redirect(_))
	}

	/// Returns the redirect target, if any.
	pub fn redirect_url(&self) -> Option<&Url> {
		match self {
			Self::Redirect(url) => Some(url),
			_ => None,
		}
	}

	/// Returns the resolved user, if any.
	pub fn user(&self) -> Option<&U> {
		match self {
			Self::Success(user) => Some(user),
			_ => None,
		}
	}

	/// Returns the failure, if any.
	pub fn failure(&self) -> Option<&Error> {
		match self {
			Self::Failure(err) => Some(err),
			_ => None,
		}
	}

	/// Returns the failure reason reported to the user, if any.
	pub fn failure_message(&self) -> Option<String> {
		self.failure().map(ToString::to_string)
	}

	/// Maps the resolved user, leaving redirects and failures untouched.
	pub fn map<T>(self, f: impl FnOnce(U) -> T) -> AuthOutcome<T> {
		match self {
			Self::Redirect(url) => AuthOutcome::Redirect(url),
			Self::Success(user) => AuthOutcome::Success(f(user)),
			Self::Failure(err) => AuthOutcome::Failure(err),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn accessors_follow_the_tag() {
		let redirect: AuthOutcome<u8> = AuthOutcome::Redirect(
			Url::parse("https://steamcommunity.com/openid/login")
				.expect("Redirect fixture should parse."),
		);

		assert!(redirect.is_redirect());
		assert!(redirect.user().is_none());
		assert!(redirect.failure_message().is_none());

		let failure: AuthOutcome<u8> = AuthOutcome::Failure(Error::NotAuthenticated);

		assert_eq!(failure.failure_message().as_deref(), Some("Not authenticated from result."));
		assert!(failure.redirect_url().is_none());

		let success = AuthOutcome::Success(7_u8).map(u16::from);

		assert_eq!(success.user(), Some(&7_u16));
	}
}
