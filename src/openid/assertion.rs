//! Positive-assertion parsing and the checks a stateless relying party runs before asking the
//! provider to confirm the signature.

// crates.io
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	framework::AuthRequest,
	openid::{OPENID_NS, ProviderError},
};

const PREFIX: &str = "openid.";
const REQUIRED_FIELDS: [&str; 7] =
	["op_endpoint", "return_to", "response_nonce", "assoc_handle", "signed", "sig", "claimed_id"];
const REQUIRED_SIGNED: [&str; 6] =
	["op_endpoint", "return_to", "response_nonce", "assoc_handle", "claimed_id", "identity"];

/// Value of `openid.mode` in a provider response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssertionMode {
	/// Positive assertion.
	IdRes,
	/// The user declined to authenticate.
	Cancel,
	/// An immediate request needs user interaction.
	SetupNeeded,
	/// The provider reported an error.
	Error,
	/// Any other value.
	Other(String),
}
impl AssertionMode {
	fn parse(raw: &str) -> Self {
		match raw {
			"id_res" => Self::IdRes,
			"cancel" => Self::Cancel,
			"setup_needed" => Self::SetupNeeded,
			"error" => Self::Error,
			other => Self::Other(other.to_owned()),
		}
	}
}

/// `openid.*` parameters collected from an incoming request, keyed without the prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssertionParams(BTreeMap<String, String>);
impl AssertionParams {
	/// Collects the `openid.*` parameters from the query string and form body of `request`.
	///
	/// The first occurrence of a repeated key wins.
	pub fn from_request(request: &AuthRequest) -> Self {
		let mut params = BTreeMap::new();

		for (key, value) in request.parameters() {
			if let Some(field) = key.strip_prefix(PREFIX) {
				params.entry(field.to_owned()).or_insert(value);
			}
		}

		Self(params)
	}

	/// Returns true when the request carried no OpenID parameters.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns `openid.{field}`.
	pub fn get(&self, field: &str) -> Option<&str> {
		self.0.get(field).map(String::as_str)
	}

	/// Returns `openid.{field}` or an invalid-assertion error naming it.
	pub fn require(&self, field: &str) -> Result<&str, ProviderError> {
		self.get(field)
			.filter(|value| !value.is_empty())
			.ok_or_else(|| ProviderError::invalid_assertion(format_args!("missing openid.{field}")))
	}

	/// Parses `openid.mode`; `None` means the request is not a provider response.
	pub fn mode(&self) -> Option<AssertionMode> {
		self.get("mode").map(AssertionMode::parse)
	}

	/// Runs the local checks of a positive assertion: namespace, required fields, signed field
	/// coverage, and the provider endpoint.
	pub fn check_positive(&self, op_endpoint: &Url) -> Result<(), ProviderError> {
		if self.get("ns") != Some(OPENID_NS) {
			return Err(ProviderError::invalid_assertion("unsupported openid.ns"));
		}

		for field in REQUIRED_FIELDS {
			self.require(field)?;
		}

		check_signed_fields(self.require("signed")?, self)?;

		let claimed = self.require("op_endpoint")?;

		if Url::parse(claimed).ok().as_ref() != Some(op_endpoint) {
			return Err(ProviderError::invalid_assertion(format_args!(
				"unexpected openid.op_endpoint {claimed}"
			)));
		}

		Ok(())
	}

	/// Builds the `check_authentication` form: every received field, with the mode replaced.
	pub fn check_authentication_form(&self) -> Vec<(String, String)> {
		self.0
			.iter()
			.map(|(field, value)| {
				let value = if field == "mode" { "check_authentication" } else { value.as_str() };

				(format!("{PREFIX}{field}"), value.to_owned())
			})
			.collect()
	}
}

/// Ensures `openid.return_to` addresses the URL the assertion arrived at.
///
/// Scheme, host, port, and path must match, and every query pair of `return_to` must be
/// present in the request URL.
pub fn check_return_to(return_to: &str, request_url: &Url) -> Result<(), ProviderError> {
	let expected = Url::parse(return_to)
		.map_err(|e| ProviderError::invalid_assertion(format_args!("unparsable return_to: {e}")))?;
	let same_target = expected.scheme() == request_url.scheme()
		&& expected.host_str() == request_url.host_str()
		&& expected.port_or_known_default() == request_url.port_or_known_default()
		&& expected.path() == request_url.path();

	if !same_target {
		return Err(ProviderError::invalid_assertion("return_to does not match the request URL"));
	}

	let received: Vec<_> = request_url.query_pairs().collect();

	for pair in expected.query_pairs() {
		if !received.contains(&pair) {
			return Err(ProviderError::invalid_assertion(format_args!(
				"return_to parameter {} is missing from the request",
				pair.0
			)));
		}
	}

	Ok(())
}

/// Ensures the `openid.response_nonce` timestamp lies within `max_age` of `now`, in either
/// direction.
pub fn check_nonce(
	nonce: &str,
	now: OffsetDateTime,
	max_age: Duration,
) -> Result<OffsetDateTime, ProviderError> {
	let stamp = nonce
		.find('Z')
		.map(|end| &nonce[..=end])
		.ok_or_else(|| ProviderError::invalid_assertion("response_nonce has no timestamp"))?;
	let issued = OffsetDateTime::parse(stamp, &Rfc3339).map_err(|e| {
		ProviderError::invalid_assertion(format_args!("response_nonce timestamp: {e}"))
	})?;
	let skew = now - issued;

	if skew > max_age {
		return Err(ProviderError::invalid_assertion("response_nonce is too old"));
	}
	if skew < -max_age {
		return Err(ProviderError::invalid_assertion("response_nonce is in the future"));
	}

	Ok(issued)
}

/// Ensures `openid.signed` covers every security-relevant field present in the assertion.
pub fn check_signed_fields(signed: &str, params: &AssertionParams) -> Result<(), ProviderError> {
	let signed: Vec<&str> = signed.split(',').collect();

	for field in REQUIRED_SIGNED {
		if params.get(field).is_some() && !signed.contains(&field) {
			return Err(ProviderError::invalid_assertion(format_args!(
				"openid.{field} is not signed"
			)));
		}
	}

	Ok(())
}

/// Parses an OpenID key-value form (`key:value` per line).
pub fn parse_key_value_form(body: &str) -> BTreeMap<String, String> {
	body.lines()
		.filter_map(|line| line.split_once(':'))
		.map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
		.collect()
}
