//! Framework-agnostic view of the incoming authentication request.

// crates.io
use url::form_urlencoded;
// self
use crate::_prelude::*;

/// HTTP method of the incoming request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestMethod {
	/// `GET`; OpenID assertions arrive in the query string.
	Get,
	/// `POST`; OpenID assertions may arrive in a URL-encoded form body.
	Post,
}

/// Incoming request handed to a strategy by the host framework.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthRequest {
	/// Request method.
	pub method: RequestMethod,
	/// Absolute request URL as seen by the user-agent, including the query string.
	pub url: Url,
	/// URL-encoded form body, when the request carried one.
	pub form: Option<String>,
}
impl AuthRequest {
	/// Describes a `GET` request.
	pub fn get(url: Url) -> Self {
		Self { method: RequestMethod::Get, url, form: None }
	}

	/// Describes a `POST` request with an `application/x-www-form-urlencoded` body.
	pub fn post_form(url: Url, form: impl Into<String>) -> Self {
		Self { method: RequestMethod::Post, url, form: Some(form.into()) }
	}

	/// Returns decoded query parameters followed by decoded form parameters.
	pub fn parameters(&self) -> Vec<(String, String)> {
		let mut pairs: Vec<(String, String)> = self.url.query_pairs().into_owned().collect();

		if let Some(form) = self.form.as_deref() {
			pairs.extend(form_urlencoded::parse(form.as_bytes()).into_owned());
		}

		pairs
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parameters_merge_query_and_form() {
		let request = AuthRequest::post_form(
			Url::parse("https://app.example.com/cb?next=%2Fhome")
				.expect("Request fixture should parse."),
			"openid.mode=id_res&openid.ns=http%3A%2F%2Fspecs.openid.net%2Fauth%2F2.0",
		);
		let pairs = request.parameters();

		assert_eq!(pairs[0], ("next".into(), "/home".into()));
		assert_eq!(pairs[1], ("openid.mode".into(), "id_res".into()));
		assert_eq!(pairs[2], ("openid.ns".into(), "http://specs.openid.net/auth/2.0".into()));
	}
}
