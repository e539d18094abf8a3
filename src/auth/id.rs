//! Strongly typed Steam identifier extracted from OpenID claimed identifiers.

// self
use crate::_prelude::*;

const ACCOUNT_ID_MASK: u64 = 0xFFFF_FFFF;

/// Error returned when Steam identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("Steam identifier cannot be empty.")]
	Empty,
	/// The identifier is not a decimal 64-bit integer.
	#[error("Steam identifier `{value}` is not a decimal 64-bit integer.")]
	Malformed {
		/// Rejected input.
		value: String,
	},
	/// The identifier is zero, which Steam never issues.
	#[error("Steam identifier cannot be zero.")]
	Zero,
}

/// 64-bit Steam identifier (`SteamID64`) of an authenticated user.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SteamId(u64);
impl SteamId {
	/// Parses an identifier from its decimal representation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		if view.is_empty() {
			return Err(IdentifierError::Empty);
		}
		if !view.bytes().all(|b| b.is_ascii_digit()) {
			return Err(IdentifierError::Malformed { value: view.to_owned() });
		}

		let raw =
			view.parse::<u64>().map_err(|_| IdentifierError::Malformed { value: view.to_owned() })?;

		Self::from_raw(raw)
	}

	/// Wraps a raw 64-bit identifier.
	pub fn from_raw(raw: u64) -> Result<Self, IdentifierError> {
		if raw == 0 { Err(IdentifierError::Zero) } else { Ok(Self(raw)) }
	}

	/// Extracts the identifier from the trailing path segment of an OpenID claimed identifier,
	/// e.g. `https://steamcommunity.com/openid/id/76561198000000000`.
	pub fn from_claimed_identifier(claimed: &str) -> Result<Self, IdentifierError> {
		let segment = claimed.rsplit('/').next().unwrap_or(claimed);

		Self::new(segment)
	}

	/// Returns the raw 64-bit value.
	pub const fn as_u64(self) -> u64 {
		self.0
	}

	/// Returns the 32-bit account number embedded in the low bits.
	pub const fn account_id(self) -> u32 {
		(self.0 & ACCOUNT_ID_MASK) as u32
	}
}
impl From<SteamId> for String {
	fn from(value: SteamId) -> Self {
		value.0.to_string()
	}
}
impl TryFrom<String> for SteamId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl Debug for SteamId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "SteamId({})", self.0)
	}
}
impl Display for SteamId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.0)
	}
}
impl FromStr for SteamId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
