//! Steam Web API profile client.

// self
use crate::{
	_prelude::*,
	auth::{ApiKey, SteamId},
	config::StrategyOptions,
	error::TransportError,
	http::{ReqwestHttpClient, ResponseMetadata},
	profile::{PlayerSummary, ProfileClient, ProfileError, ProfileFuture},
};

const PLAYER_SUMMARIES: &str = "ISteamUser/GetPlayerSummaries/v0002/";

/// [`ProfileClient`] backed by `ISteamUser/GetPlayerSummaries`.
#[derive(Clone)]
pub struct SteamWebApi {
	/// HTTP client used for Web API calls.
	pub http_client: ReqwestHttpClient,
	base: Url,
	api_key: ApiKey,
}
impl SteamWebApi {
	/// Creates a client for the Web API at `base` using a default reqwest client.
	pub fn new(base: Url, api_key: ApiKey) -> Self {
		Self::with_http_client(base, api_key, ReqwestHttpClient::default())
	}

	/// Creates a client that sends requests through `http_client`.
	pub fn with_http_client(base: Url, api_key: ApiKey, http_client: ReqwestHttpClient) -> Self {
		Self { http_client, base, api_key }
	}

	/// Creates a client from the Web API endpoint and key in `options`.
	pub fn from_options(options: &StrategyOptions, http_client: ReqwestHttpClient) -> Self {
		Self::with_http_client(
			options.endpoints.web_api.clone(),
			options.api_key.clone(),
			http_client,
		)
	}

	/// Builds the `GetPlayerSummaries` URL for `steam_id`.
	pub fn player_summaries_url(&self, steam_id: &SteamId) -> Result<Url, ProfileError> {
		let mut url = self
			.base
			.join(PLAYER_SUMMARIES)
			.map_err(|source| ProfileError::InvalidEndpoint { source })?;

		url.query_pairs_mut()
			.append_pair("key", self.api_key.expose())
			.append_pair("steamids", &steam_id.to_string())
			.append_pair("format", "json");

		Ok(url)
	}

	async fn fetch(&self, steam_id: SteamId) -> Result<PlayerSummary, ProfileError> {
		let url = self.player_summaries_url(&steam_id)?;
		// The request URL carries the API key; strip it from every transport error.
		let response = self
			.http_client
			.get(url)
			.send()
			.await
			.map_err(|e| TransportError::from(e.without_url()))?;
		let meta = ResponseMetadata::from_response(&response);
		let status = response.status();

		if status.as_u16() == 429 {
			return Err(ProfileError::RateLimited { retry_after: meta.retry_after });
		}
		if !status.is_success() {
			return Err(ProfileError::Status { status: status.as_u16() });
		}

		let body = response.bytes().await.map_err(|e| TransportError::from(e.without_url()))?;

		PlayerSummary::from_api_response(steam_id, &body)
	}
}
impl Debug for SteamWebApi {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SteamWebApi").field("base", &self.base.as_str()).finish_non_exhaustive()
	}
}
impl ProfileClient for SteamWebApi {
	fn player_summary<'a>(&'a self, steam_id: &'a SteamId) -> ProfileFuture<'a, PlayerSummary> {
		Box::pin(self.fetch(*steam_id))
	}
}
