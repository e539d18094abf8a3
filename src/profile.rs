//! Steam profile lookup: the player summary model, the client contract, and the Steam Web API
//! implementation.

#[cfg(feature = "reqwest")] pub mod steam_api;

#[cfg(feature = "reqwest")] pub use steam_api::*;

// self
use crate::{_prelude::*, auth::SteamId, error::TransportError};

/// Boxed future returned by [`ProfileClient`] calls.
pub type ProfileFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProfileError>> + 'a + Send>>;

/// Looks up the public profile of a Steam user.
pub trait ProfileClient
where
	Self: Send + Sync,
{
	/// Fetches the player summary of `steam_id`.
	fn player_summary<'a>(&'a self, steam_id: &'a SteamId) -> ProfileFuture<'a, PlayerSummary>;
}

/// Profile lookup failures.
#[derive(Debug, ThisError)]
pub enum ProfileError {
	/// The Web API knows no player with the requested identifier.
	#[error("No players found for the given ID.")]
	NotFound {
		/// Identifier that was looked up.
		steam_id: SteamId,
	},
	/// The Web API answered with a non-success status (403 means the API key was rejected).
	#[error("Steam Web API returned HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
	},
	/// The Web API is throttling this API key.
	#[error("Steam Web API rate limit exceeded.")]
	RateLimited {
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// The Web API responded with JSON that does not match the player summary schema.
	#[error("Steam Web API returned malformed JSON.")]
	Parse {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The configured Web API base URL cannot address the player summary method.
	#[error("Steam Web API endpoint is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Transport failure while calling the Web API.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Visibility of a profile to the API key owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum CommunityVisibility {
	/// Private, friends-only, or otherwise hidden.
	Hidden,
	/// Public profile.
	Public,
	/// Value not known to this crate.
	Other(u8),
}
impl From<u8> for CommunityVisibility {
	fn from(raw: u8) -> Self {
		match raw {
			1 => Self::Hidden,
			3 => Self::Public,
			other => Self::Other(other),
		}
	}
}
impl From<CommunityVisibility> for u8 {
	fn from(value: CommunityVisibility) -> Self {
		match value {
			CommunityVisibility::Hidden => 1,
			CommunityVisibility::Public => 3,
			CommunityVisibility::Other(raw) => raw,
		}
	}
}

/// Online status of a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum PersonaState {
	/// Offline, or the profile is private.
	Offline,
	/// Online.
	Online,
	/// Busy.
	Busy,
	/// Away.
	Away,
	/// Away for a long time.
	Snooze,
	/// Looking to trade.
	LookingToTrade,
	/// Looking to play.
	LookingToPlay,
	/// Value not known to this crate.
	Other(u8),
}
impl From<u8> for PersonaState {
	fn from(raw: u8) -> Self {
		match raw {
			0 => Self::Offline,
			1 => Self::Online,
			2 => Self::Busy,
			3 => Self::Away,
			4 => Self::Snooze,
			5 => Self::LookingToTrade,
			6 => Self::LookingToPlay,
			other => Self::Other(other),
		}
	}
}
impl From<PersonaState> for u8 {
	fn from(value: PersonaState) -> Self {
		match value {
			PersonaState::Offline => 0,
			PersonaState::Online => 1,
			PersonaState::Busy => 2,
			PersonaState::Away => 3,
			PersonaState::Snooze => 4,
			PersonaState::LookingToTrade => 5,
			PersonaState::LookingToPlay => 6,
			PersonaState::Other(raw) => raw,
		}
	}
}

/// Player summary returned by `ISteamUser/GetPlayerSummaries`.
///
/// Fields after `persona_state` are only present for public profiles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
	/// 64-bit Steam identifier.
	#[serde(rename = "steamid")]
	pub steam_id: SteamId,
	/// Display name.
	#[serde(rename = "personaname")]
	pub persona_name: String,
	/// Community profile URL.
	#[serde(rename = "profileurl")]
	pub profile_url: Url,
	/// 32x32 avatar.
	pub avatar: Url,
	/// 64x64 avatar.
	#[serde(rename = "avatarmedium")]
	pub avatar_medium: Url,
	/// 184x184 avatar.
	#[serde(rename = "avatarfull")]
	pub avatar_full: Url,
	/// Hash of the avatar image.
	#[serde(rename = "avatarhash", default)]
	pub avatar_hash: Option<String>,
	/// Profile visibility.
	#[serde(rename = "communityvisibilitystate")]
	pub visibility: CommunityVisibility,
	/// Set when the user configured a community profile.
	#[serde(rename = "profilestate", default)]
	pub profile_state: Option<u8>,
	/// Online status.
	#[serde(rename = "personastate")]
	pub persona_state: PersonaState,
	/// Last time the user was online.
	#[serde(rename = "lastlogoff", default, with = "time::serde::timestamp::option")]
	pub last_logoff: Option<OffsetDateTime>,
	/// Whether the profile allows public comments.
	#[serde(rename = "commentpermission", default)]
	pub comment_permission: Option<u8>,
	/// Raw persona state flags.
	#[serde(rename = "personastateflags", default)]
	pub persona_state_flags: Option<u32>,

	/// Real name, if the user set one.
	#[serde(rename = "realname", default)]
	pub real_name: Option<String>,
	/// Primary group identifier.
	#[serde(rename = "primaryclanid", default)]
	pub primary_clan_id: Option<String>,
	/// Account creation time.
	#[serde(rename = "timecreated", default, with = "time::serde::timestamp::option")]
	pub time_created: Option<OffsetDateTime>,
	/// ISO 3166 country code.
	#[serde(rename = "loccountrycode", default)]
	pub country_code: Option<String>,
	/// State or region code.
	#[serde(rename = "locstatecode", default)]
	pub state_code: Option<String>,
	/// Internal city identifier.
	#[serde(rename = "loccityid", default)]
	pub city_id: Option<u32>,
	/// App id of the game currently being played.
	#[serde(rename = "gameid", default)]
	pub game_id: Option<String>,
	/// Name of the game currently being played.
	#[serde(rename = "gameextrainfo", default)]
	pub game_extra_info: Option<String>,
	/// Address of the game server the user is connected to.
	#[serde(rename = "gameserverip", default)]
	pub game_server_ip: Option<String>,
	/// Steam identifier of the game server the user is connected to.
	#[serde(rename = "gameserversteamid", default)]
	pub game_server_steam_id: Option<String>,
}
impl PlayerSummary {
	/// Parses a `GetPlayerSummaries` response body requested for `steam_id`.
	pub fn from_api_response(steam_id: SteamId, body: &[u8]) -> Result<Self, ProfileError> {
		#[derive(Deserialize)]
		struct Envelope {
			response: Players,
		}
		#[derive(Deserialize)]
		struct Players {
			#[serde(default)]
			players: Vec<PlayerSummary>,
		}

		let mut deserializer = serde_json::Deserializer::from_slice(body);
		let envelope: Envelope = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ProfileError::Parse { source })?;

		envelope.response.players.into_iter().next().ok_or(ProfileError::NotFound { steam_id })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const PUBLIC_PLAYER: &str = r#"{"response":{"players":[{
		"steamid":"76561198000000000",
		"communityvisibilitystate":3,
		"profilestate":1,
		"personaname":"gaben",
		"profileurl":"https://steamcommunity.com/id/gaben/",
		"avatar":"https://avatars.steamstatic.com/a.jpg",
		"avatarmedium":"https://avatars.steamstatic.com/a_medium.jpg",
		"avatarfull":"https://avatars.steamstatic.com/a_full.jpg",
		"avatarhash":"a",
		"lastlogoff":1700000000,
		"personastate":1,
		"realname":"Gabe",
		"timecreated":1063407589,
		"loccountrycode":"US"
	}]}}"#;

	fn steam_id() -> SteamId {
		SteamId::new("76561198000000000").expect("Steam id fixture should parse.")
	}

	#[test]
	fn parses_public_profile() {
		let player = PlayerSummary::from_api_response(steam_id(), PUBLIC_PLAYER.as_bytes())
			.expect("Public player fixture should parse.");

		assert_eq!(player.steam_id, steam_id());
		assert_eq!(player.persona_name, "gaben");
		assert_eq!(player.visibility, CommunityVisibility::Public);
		assert_eq!(player.persona_state, PersonaState::Online);
		assert_eq!(player.country_code.as_deref(), Some("US"));
		assert_eq!(player.time_created.map(|t| t.unix_timestamp()), Some(1_063_407_589));
		assert!(player.game_id.is_none());
	}

	#[test]
	fn empty_player_list_is_not_found() {
		let err = PlayerSummary::from_api_response(steam_id(), br#"{"response":{"players":[]}}"#)
			.expect_err("Empty player lists must fail.");

		assert!(matches!(err, ProfileError::NotFound { .. }));
		assert_eq!(err.to_string(), "No players found for the given ID.");
	}

	#[test]
	fn malformed_json_reports_the_path() {
		let err = PlayerSummary::from_api_response(
			steam_id(),
			br#"{"response":{"players":[{"steamid":"x"}]}}"#,
		)
		.expect_err("Malformed players must fail.");
		let source = match err {
			ProfileError::Parse { source } => source,
			other => panic!("Expected a parse error, got {other:?}."),
		};

		assert_eq!(source.path().to_string(), "response.players[0].steamid");
	}

	#[test]
	fn unknown_states_round_trip() {
		assert_eq!(PersonaState::from(9), PersonaState::Other(9));
		assert_eq!(u8::from(CommunityVisibility::Other(2)), 2);
	}
}
