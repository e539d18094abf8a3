#![cfg(feature = "reqwest")]

// std
use std::collections::HashMap;
// crates.io
use httpmock::prelude::*;
use time::{OffsetDateTime, macros::format_description};
// self
use steam_openid_strategy::{
	config::{STEAM_OPENID_IDENTIFIER, StrategyOptions},
	error::BoxError,
	framework::{AuthOutcome, AuthRequest, AuthenticateOptions, MemorySession, Session},
	http::ReqwestHttpClient,
	openid::{IDENTIFIER_SELECT, OPENID_NS},
	profile::PlayerSummary,
	reqwest::Client,
	strategy::{BeginPolicy, ReqwestSteamStrategy, SteamStrategy},
	url::Url,
};

const RETURN_URL: &str = "https://app.example.com/auth/steam/callback";
const CLAIMED_ID: &str = "https://steamcommunity.com/openid/id/76561198000000000";
const PLAYERS: &str = r#"{"response":{"players":[{
	"steamid":"76561198000000000",
	"communityvisibilitystate":3,
	"personaname":"Robin",
	"profileurl":"https://steamcommunity.com/id/robin/",
	"avatar":"https://avatars.steamstatic.com/r.jpg",
	"avatarmedium":"https://avatars.steamstatic.com/r_medium.jpg",
	"avatarfull":"https://avatars.steamstatic.com/r_full.jpg",
	"personastate":0
}]}}"#;

fn build_strategy(server: &MockServer, policy: BeginPolicy) -> ReqwestSteamStrategy<String> {
	build_strategy_with(server, policy, ReqwestHttpClient::with_client(Client::new()))
}

fn build_strategy_with(
	server: &MockServer,
	policy: BeginPolicy,
	http_client: ReqwestHttpClient,
) -> ReqwestSteamStrategy<String> {
	let options = StrategyOptions::builder()
		.return_url(Url::parse(RETURN_URL).expect("Return URL should parse successfully."))
		.api_key("api-key-it")
		.login_endpoint(
			Url::parse(&server.url("/openid/login"))
				.expect("Mock login endpoint should parse successfully."),
		)
		.web_api_endpoint(
			Url::parse(&server.url("/")).expect("Mock Web API endpoint should parse successfully."),
		)
		.begin_policy(policy)
		.build()
		.expect("Strategy options should build successfully.");

	SteamStrategy::with_http_client(
		options,
		http_client,
		|profile: PlayerSummary| async move { Ok::<_, BoxError>(profile.persona_name) },
	)
	.expect("Strategy should build successfully.")
}

fn nonce(issued: OffsetDateTime) -> String {
	let stamp = issued
		.format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z"))
		.expect("Nonce timestamp should format successfully.");

	format!("{stamp}0123456789")
}

fn assertion_request(server: &MockServer, return_to: &str, issued: OffsetDateTime) -> AuthRequest {
	let mut url = Url::parse(RETURN_URL).expect("Return URL should parse successfully.");

	url.query_pairs_mut()
		.append_pair("openid.ns", OPENID_NS)
		.append_pair("openid.mode", "id_res")
		.append_pair("openid.op_endpoint", &server.url("/openid/login"))
		.append_pair("openid.claimed_id", CLAIMED_ID)
		.append_pair("openid.identity", CLAIMED_ID)
		.append_pair("openid.return_to", return_to)
		.append_pair("openid.response_nonce", &nonce(issued))
		.append_pair("openid.assoc_handle", "1234567890")
		.append_pair(
			"openid.signed",
			"signed,op_endpoint,claimed_id,identity,return_to,response_nonce,assoc_handle",
		)
		.append_pair("openid.sig", "W0u5DRbtHE1GG0ZKXjerUZDUGmc=");

	AuthRequest::get(url)
}

#[tokio::test]
async fn request_without_assertion_redirects_to_login() {
	let server = MockServer::start_async().await;
	let strategy = build_strategy(&server, BeginPolicy::default());
	let session = MemorySession::default();
	let request =
		AuthRequest::get(Url::parse(RETURN_URL).expect("Return URL should parse successfully."));
	let outcome = strategy.authenticate(&request, &session, &AuthenticateOptions::default()).await;
	let url = match outcome {
		AuthOutcome::Redirect(url) => url,
		other => panic!("Requests without an assertion should redirect, got {other:?}."),
	};
	let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

	assert!(url.as_str().starts_with(&server.url("/openid/login")));
	assert_eq!(pairs.get("openid.ns"), Some(&OPENID_NS.into()));
	assert_eq!(pairs.get("openid.mode"), Some(&"checkid_setup".into()));
	assert_eq!(pairs.get("openid.claimed_id"), Some(&IDENTIFIER_SELECT.into()));
	assert_eq!(pairs.get("openid.identity"), Some(&IDENTIFIER_SELECT.into()));
	assert_eq!(pairs.get("openid.return_to"), Some(&RETURN_URL.into()));
	assert_eq!(pairs.get("openid.realm"), Some(&"https://app.example.com/".into()));
	assert!(session.is_empty());
	assert_eq!(strategy.options.endpoints.identifier.as_str(), STEAM_OPENID_IDENTIFIER);
}

#[tokio::test]
async fn verified_assertion_resolves_the_profile() {
	let server = MockServer::start_async().await;
	let check = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/openid/login")
				.header("content-type", "application/x-www-form-urlencoded")
				.body_includes("openid.mode=check_authentication");
			then.status(200)
				.header("content-type", "text/plain")
				.body("ns:http://specs.openid.net/auth/2.0\nis_valid:true\n");
		})
		.await;
	let summaries = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/ISteamUser/GetPlayerSummaries/v0002/")
				.query_param("key", "api-key-it")
				.query_param("steamids", "76561198000000000");
			then.status(200).header("content-type", "application/json").body(PLAYERS);
		})
		.await;
	let strategy = build_strategy(&server, BeginPolicy::default());
	let session = MemorySession::default();

	session.set("auth:error", "Previous failure.".into());

	let request = assertion_request(&server, RETURN_URL, OffsetDateTime::now_utc());
	let options = AuthenticateOptions::default().with_name("steam-it");
	let outcome = strategy.authenticate(&request, &session, &options).await;

	check.assert_async().await;
	summaries.assert_async().await;

	assert_eq!(outcome.user().map(String::as_str), Some("Robin"));
	assert_eq!(session.get("auth:error"), None);
	assert_eq!(session.get("strategy").as_deref(), Some("steam-it"));
	assert_eq!(strategy.metrics().successes(), 1);
}

#[tokio::test]
async fn unconfirmed_signature_follows_the_begin_policy() {
	let server = MockServer::start_async().await;
	let check = server
		.mock_async(|when, then| {
			when.method(POST).path("/openid/login");
			then.status(200).body("ns:http://specs.openid.net/auth/2.0\nis_valid:false\n");
		})
		.await;
	let request = assertion_request(&server, RETURN_URL, OffsetDateTime::now_utc());
	let session = MemorySession::default();
	let options = AuthenticateOptions::default();
	let strict = build_strategy(&server, BeginPolicy::MissingAssertion);
	let outcome = strict.authenticate(&request, &session, &options).await;

	assert_eq!(outcome.failure_message().as_deref(), Some("Invalid signature."));
	assert_eq!(session.get("auth:error").as_deref(), Some("Invalid signature."));

	let lenient = build_strategy(&server, BeginPolicy::AnyVerifyError);
	let outcome = lenient.authenticate(&request, &session, &options).await;

	assert!(outcome.is_redirect());

	check.assert_calls_async(2).await;
}

#[tokio::test]
async fn stale_nonce_and_foreign_return_to_are_rejected_locally() {
	let server = MockServer::start_async().await;
	let check = server
		.mock_async(|when, then| {
			when.method(POST).path("/openid/login");
			then.status(200).body("is_valid:true\n");
		})
		.await;
	let strategy = build_strategy(&server, BeginPolicy::MissingAssertion);
	let session = MemorySession::default();
	let options = AuthenticateOptions::default();
	let stale = assertion_request(
		&server,
		RETURN_URL,
		OffsetDateTime::now_utc() - time::Duration::minutes(30),
	);
	let outcome = strategy.authenticate(&stale, &session, &options).await;

	assert_eq!(
		outcome.failure_message().as_deref(),
		Some("Invalid OpenID assertion: response_nonce is too old.")
	);

	let foreign = assertion_request(
		&server,
		"https://evil.example.com/auth/steam/callback",
		OffsetDateTime::now_utc(),
	);
	let outcome = strategy.authenticate(&foreign, &session, &options).await;

	assert_eq!(
		outcome.failure_message().as_deref(),
		Some("Invalid OpenID assertion: return_to does not match the request URL.")
	);

	check.assert_calls_async(0).await;
}

#[tokio::test]
async fn provider_error_status_is_reported() {
	let server = MockServer::start_async().await;
	let _check = server
		.mock_async(|when, then| {
			when.method(POST).path("/openid/login");
			then.status(503);
		})
		.await;
	let strategy = build_strategy(&server, BeginPolicy::MissingAssertion);
	let session = MemorySession::default();
	let request = assertion_request(&server, RETURN_URL, OffsetDateTime::now_utc());
	let outcome = strategy.authenticate(&request, &session, &AuthenticateOptions::default()).await;

	assert_eq!(outcome.failure_message().as_deref(), Some("OpenID provider returned HTTP 503."));
}

#[tokio::test]
async fn redirected_check_authentication_is_rejected() {
	let server = MockServer::start_async().await;
	let redirect = server
		.mock_async(|when, then| {
			when.method(POST).path("/openid/login");
			then.status(307).header("location", server.url("/elsewhere"));
		})
		.await;
	let elsewhere = server
		.mock_async(|when, then| {
			when.method(POST).path("/elsewhere");
			then.status(200).body("ns:http://specs.openid.net/auth/2.0\nis_valid:true\n");
		})
		.await;
	let session = MemorySession::default();
	let options = AuthenticateOptions::default();
	let request = assertion_request(&server, RETURN_URL, OffsetDateTime::now_utc());
	let strategy =
		build_strategy_with(&server, BeginPolicy::MissingAssertion, ReqwestHttpClient::default());
	let outcome = strategy.authenticate(&request, &session, &options).await;

	assert!(outcome.user().is_none());
	assert_eq!(outcome.failure_message().as_deref(), Some("OpenID provider returned HTTP 307."));

	elsewhere.assert_calls_async(0).await;

	// Clients that follow redirects still never accept an answer from another URL.
	let following = build_strategy_with(
		&server,
		BeginPolicy::MissingAssertion,
		ReqwestHttpClient::with_client(Client::new()),
	);
	let outcome = following.authenticate(&request, &session, &options).await;
	let expected =
		format!("OpenID provider redirected check_authentication to {}.", server.url("/elsewhere"));

	assert!(outcome.user().is_none());
	assert_eq!(outcome.failure_message(), Some(expected));

	redirect.assert_calls_async(2).await;
}
