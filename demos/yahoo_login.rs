/// Example: Yahoo sign-in through a local callback listener
///
/// This example runs the full OAuth 1.0a handshake against Yahoo and prints
/// the signed-in user's profile.
///
/// Setup:
/// 1. Register an application at https://developer.yahoo.com/apps/
/// 2. Export its credentials:
///    export YAHOO_CONSUMER_KEY="your_consumer_key"
///    export YAHOO_CONSUMER_SECRET="your_consumer_secret"
///
/// Run:
/// RUST_LOG=yahoo_oauth1=debug cargo run --example yahoo_login
use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use yahoo_oauth1::prelude::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let consumer_key = env::var("YAHOO_CONSUMER_KEY").expect("YAHOO_CONSUMER_KEY not set");
    let consumer_secret =
        env::var("YAHOO_CONSUMER_SECRET").expect("YAHOO_CONSUMER_SECRET not set");

    println!("=== Yahoo OAuth 1.0a Example ===\n");

    let listener = CallbackListener::new().expect("Failed to bind callback listener");
    let config = OAuthConfig::yahoo(consumer_key, consumer_secret, listener.redirect_uri());
    let client = OAuthClient::new(config, Arc::new(MemoryTokenStore::new()))
        .expect("Failed to create client");

    println!("Waiting for authorization on {}...\n", listener.redirect_uri());

    match client.authorize_with_listener(&listener, Duration::from_secs(300)) {
        Ok(credentials) => {
            println!("✓ Successfully authorized!");
            println!("User GUID: {}", credentials.resource_owner_id);
        }
        Err(e) => {
            eprintln!("✗ Authorization failed: {}", e);
            std::process::exit(1);
        }
    }

    match client.fetch_profile() {
        Ok(profile) => println!("Signed in as {} ({})", profile.name, profile.id),
        Err(e) => eprintln!("✗ Failed to fetch profile: {}", e),
    }
}
