//! Walks through a Steam sign-in: prints the provider URL to send the user to and, when given
//! the callback URL Steam redirected back with, verifies it and prints the resolved player.
//!
//! ```sh
//! STEAM_API_KEY=... cargo run --example sign_in
//! STEAM_API_KEY=... cargo run --example sign_in -- 'http://localhost:3000/auth/steam/callback?openid.ns=...'
//! ```

// std
use std::env;
// crates.io
use color_eyre::Result;
use url::Url;
// self
use steam_openid_strategy::{
	config::StrategyOptions,
	error::BoxError,
	framework::{AuthOutcome, AuthRequest, AuthenticateOptions, MemorySession, Session},
	profile::PlayerSummary,
	strategy::SteamStrategy,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let options = StrategyOptions::builder()
		.return_url(Url::parse("http://localhost:3000/auth/steam/callback")?)
		.api_key(env::var("STEAM_API_KEY").unwrap_or_else(|_| "demo-key".into()))
		.build()?;
	let strategy = SteamStrategy::new(options, |profile: PlayerSummary| async move {
		Ok::<_, BoxError>(format!("{} ({})", profile.persona_name, profile.steam_id))
	})?;
	let session = MemorySession::default();
	let request = match env::args().nth(1) {
		Some(callback) => AuthRequest::get(Url::parse(&callback)?),
		None => AuthRequest::get(Url::parse("http://localhost:3000/auth/steam")?),
	};
	let options = AuthenticateOptions::default();

	match strategy.authenticate(&request, &session, &options).await {
		AuthOutcome::Redirect(url) => println!("Send your user to {url}."),
		AuthOutcome::Success(player) => println!(
			"Signed in {player} via the `{}` strategy.",
			session.get(&options.session_strategy_key).unwrap_or_default()
		),
		AuthOutcome::Failure(e) => eprintln!("Sign-in failed: {e}."),
	}

	Ok(())
}
