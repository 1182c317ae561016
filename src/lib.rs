//! yahoo-oauth1 - Blocking OAuth 1.0a client for the Yahoo APIs
//!
//! This library performs the three-legged OAuth 1.0a handshake (request
//! token, user authorization, access token exchange) and signs calls to the
//! protected resource API with the resulting credentials.
//!
//! # Features
//!
//! - HMAC-SHA1 and PLAINTEXT signatures (RFC 5849)
//! - Thread-safe nonce generation and pending-token registry
//! - Configurable provider endpoints (Yahoo by default)
//! - Optional local callback listener for command-line tools
//!
//! # Example
//!
//! ```no_run
//! use yahoo_oauth1::prelude::*;
//! use std::sync::Arc;
//!
//! let config = OAuthConfig::yahoo("consumer-key", "consumer-secret", "https://app.example.com/callback");
//! let client = OAuthClient::new(config, Arc::new(MemoryTokenStore::new())).unwrap();
//!
//! // Send the user here
//! let url = client.request_login_url().unwrap();
//! println!("Authorization URL: {}", url);
//!
//! // Later, from the callback handler
//! client
//!     .fetch_access_token_from_query("oauth_token=...&oauth_verifier=...")
//!     .unwrap();
//! let profile = client.fetch_profile().unwrap();
//! println!("Signed in as {}", profile.name);
//! ```

pub mod callback;
pub mod config;
pub mod encode;
pub mod error;
pub mod nonce;
pub mod oauth;
pub mod resource;
pub mod signer;
pub mod store;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::callback::{CallbackListener, CallbackParams};
    pub use crate::config::{OAuthConfig, ProviderConfig};
    pub use crate::error::OAuthError;
    pub use crate::oauth::{Credentials, HandshakeState, OAuthClient, TokenResponse};
    pub use crate::resource::Profile;
    pub use crate::signer::SignatureMethod;
    pub use crate::store::{MemoryTokenStore, TokenStore};
}
