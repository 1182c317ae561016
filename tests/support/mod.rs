//! Shared fixtures for tests that talk to a mock provider
//!
//! The mock server runs on its own tokio runtime while the blocking client
//! under test runs on the test thread.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};
use yahoo_oauth1::prelude::*;

pub const CONSUMER_KEY: &str = "CK";
pub const CONSUMER_SECRET: &str = "CS";
pub const CALLBACK_URI: &str = "https://app.example.com/callback";

pub const REQUEST_TOKEN_PATH: &str = "/oauth/v2/get_request_token";
pub const ACCESS_TOKEN_PATH: &str = "/oauth/v2/get_token";

pub struct Provider {
    pub server: MockServer,
    runtime: Runtime,
}

impl Provider {
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.path() == path)
            .collect()
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::with_base_url(&self.uri())
    }

    pub fn client(&self) -> OAuthClient {
        self.client_with(self.provider_config())
    }

    pub fn client_with(&self, provider: ProviderConfig) -> OAuthClient {
        let config = OAuthConfig {
            consumer_key: CONSUMER_KEY.to_string(),
            consumer_secret: CONSUMER_SECRET.to_string(),
            callback_uri: CALLBACK_URI.to_string(),
            provider,
        };
        OAuthClient::new(config, Arc::new(MemoryTokenStore::new())).unwrap()
    }
}

/// Decode a form-encoded request body
pub fn form(request: &Request) -> HashMap<String, String> {
    url::form_urlencoded::parse(&request.body)
        .into_owned()
        .collect()
}

/// Decode the query string of a request
pub fn query(request: &Request) -> HashMap<String, String> {
    request.url.query_pairs().into_owned().collect()
}

pub fn request_token_body(token: &str, secret: &str) -> String {
    format!(
        "oauth_token={token}&oauth_token_secret={secret}&oauth_expires_in=3600&xoauth_request_auth_url=https%3A%2F%2Fapi.login.yahoo.com%2Foauth%2Fv2%2Frequest_auth%3Foauth_token%3D{token}&oauth_callback_confirmed=true"
    )
}

pub fn auth_url(token: &str) -> String {
    format!("https://api.login.yahoo.com/oauth/v2/request_auth?oauth_token={token}")
}

pub fn access_token_body(token: &str, secret: &str, guid: &str) -> String {
    format!(
        "oauth_token={token}&oauth_token_secret={secret}&oauth_expires_in=3600&oauth_session_handle=handle&oauth_authorization_expires_in=770000&xoauth_yahoo_guid={guid}"
    )
}
