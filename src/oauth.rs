/// OAuth 1.0a three-legged flow orchestration
use crate::callback::{CallbackListener, CallbackParams};
use crate::config::OAuthConfig;
use crate::encode::Params;
use crate::error::{OAuthError, Result};
use crate::nonce::{timestamp, NonceGenerator};
use crate::signer::{sign_params, SignatureMethod};
use crate::store::{MemoryTokenStore, TokenStore};
use parking_lot::RwLock;
use reqwest::blocking::{Client as HttpClient, Response};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";
pub const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
pub const OAUTH_VERSION_KEY: &str = "oauth_version";
pub const OAUTH_PROBLEM_KEY: &str = "oauth_problem";
pub const XOAUTH_LANG_PREF_KEY: &str = "xoauth_lang_pref";

const OAUTH_VERSION: &str = "1.0";

/// Access credentials installed by a completed handshake
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub access_token_secret: String,
    pub resource_owner_id: String,
}

impl Credentials {
    /// Whether a handshake has completed
    pub fn is_active(&self) -> bool {
        !self.access_token.is_empty()
    }
}

/// Where the client stands in the three-legged flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// No token requested and no credentials installed
    Unauthenticated,
    /// At least one request token awaits its callback
    RequestIssued,
    /// Access credentials are installed
    Active,
}

/// Form-encoded token response from the provider
#[derive(Debug, Clone)]
pub struct TokenResponse {
    pub oauth_token: String,
    pub oauth_token_secret: String,
    /// Every other field, e.g. `xoauth_request_auth_url`
    pub extra: HashMap<String, String>,
}

impl TokenResponse {
    /// Parse an `application/x-www-form-urlencoded` body
    pub fn parse(body: &str) -> Result<Self> {
        let body = body.trim();
        if body.starts_with('<') || body.starts_with('{') {
            return Err(OAuthError::Protocol(format!(
                "expected form-encoded response, got: {}",
                body.chars().take(80).collect::<String>()
            )));
        }

        let mut fields: HashMap<String, String> = url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();

        if let Some(problem) = fields.remove(OAUTH_PROBLEM_KEY) {
            return Err(OAuthError::Protocol(format!(
                "provider reported oauth_problem={}",
                problem
            )));
        }

        let oauth_token = fields
            .remove(OAUTH_TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| OAuthError::MissingField(OAUTH_TOKEN_KEY.into()))?;
        let oauth_token_secret = fields
            .remove(OAUTH_TOKEN_SECRET_KEY)
            .ok_or_else(|| OAuthError::MissingField(OAUTH_TOKEN_SECRET_KEY.into()))?;

        Ok(Self {
            oauth_token,
            oauth_token_secret,
            extra: fields,
        })
    }

    /// Get a required extra field
    pub fn field(&self, name: &str) -> Result<&str> {
        self.extra
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| OAuthError::MissingField(name.to_string()))
    }
}

/// OAuth 1.0a client
///
/// Runs the request-token, authorization and access-token legs, then signs
/// resource calls with the installed credentials.
///
/// The client may be shared between threads. Nonce generation and the
/// pending-token registry are each serialized internally. Whole handshakes
/// are not: when two handshakes complete concurrently on one client, the
/// credentials of the last exchange win. Run one handshake at a time per
/// client.
pub struct OAuthClient<S: TokenStore = MemoryTokenStore> {
    config: OAuthConfig,
    store: Arc<S>,
    nonces: NonceGenerator,
    credentials: RwLock<Credentials>,
    pub(crate) http: HttpClient,
}

impl<S: TokenStore> OAuthClient<S> {
    /// Create a new OAuth client
    pub fn new(config: OAuthConfig, store: Arc<S>) -> Result<Self> {
        let http = HttpClient::builder().build()?;
        Ok(Self::with_http_client(config, store, http))
    }

    /// Create a client around a preconfigured HTTP client
    ///
    /// Use this to impose timeouts or proxies; the library sets none itself.
    pub fn with_http_client(config: OAuthConfig, store: Arc<S>, http: HttpClient) -> Self {
        Self {
            config,
            store,
            nonces: NonceGenerator::new(),
            credentials: RwLock::new(Credentials::default()),
            http,
        }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Registry of request tokens awaiting their callback
    pub fn pending_tokens(&self) -> &S {
        &self.store
    }

    /// Snapshot of the active credentials
    pub fn credentials(&self) -> Credentials {
        self.credentials.read().clone()
    }

    /// Replace the active credentials
    pub fn install_credentials(&self, credentials: Credentials) {
        *self.credentials.write() = credentials;
    }

    pub fn state(&self) -> HandshakeState {
        if self.credentials.read().is_active() {
            HandshakeState::Active
        } else if !self.store.is_empty() {
            HandshakeState::RequestIssued
        } else {
            HandshakeState::Unauthenticated
        }
    }

    /// Parameters shared by every signed request
    pub(crate) fn protocol_params(&self) -> Params {
        let mut params = Params::new();
        params.insert(OAUTH_CONSUMER_KEY.into(), self.config.consumer_key.clone());
        params.insert(OAUTH_NONCE_KEY.into(), self.nonces.nonce());
        params.insert(OAUTH_TIMESTAMP_KEY.into(), timestamp());
        params.insert(OAUTH_VERSION_KEY.into(), OAUTH_VERSION.into());
        params
    }

    /// Start a handshake and return the provider's authorization URL
    ///
    /// The request token is kept until the matching callback reaches
    /// [`fetch_access_token`](Self::fetch_access_token).
    pub fn request_login_url(&self) -> Result<String> {
        self.request_login_url_with_callback(&self.config.callback_uri)
    }

    /// Same as [`request_login_url`](Self::request_login_url) with an
    /// explicit callback URI
    pub fn request_login_url_with_callback(&self, callback_uri: &str) -> Result<String> {
        let provider = &self.config.provider;
        let endpoint = &provider.request_token_endpoint;

        let mut params = self.protocol_params();
        params.insert(OAUTH_CALLBACK_KEY.into(), callback_uri.to_string());
        params.insert(XOAUTH_LANG_PREF_KEY.into(), provider.lang_pref.clone());
        sign_params(
            SignatureMethod::Plaintext,
            "POST",
            endpoint,
            &mut params,
            &self.config.consumer_secret,
            "",
        )?;

        debug!(%endpoint, "requesting request token");
        let body = self.post_form(endpoint, &params)?;
        let response = TokenResponse::parse(&body)?;
        let auth_url = response.field(&provider.auth_url_field)?.to_string();

        self.store
            .add(&response.oauth_token, &response.oauth_token_secret);
        debug!(pending = self.store.len(), "request token registered");

        Ok(auth_url)
    }

    /// Exchange an authorized request token for access credentials
    ///
    /// The pending token is consumed before the exchange is sent, so a
    /// verifier can never be replayed, even when the exchange fails.
    pub fn fetch_access_token(&self, callback: &CallbackParams) -> Result<Credentials> {
        let token_secret = match self.store.pop(&callback.oauth_token) {
            Some(secret) => secret,
            None => {
                warn!(token = %callback.oauth_token, "callback for unknown request token");
                return Err(OAuthError::UnknownToken(callback.oauth_token.clone()));
            }
        };

        let provider = &self.config.provider;
        let endpoint = &provider.access_token_endpoint;

        let mut params = self.protocol_params();
        params.insert(OAUTH_TOKEN_KEY.into(), callback.oauth_token.clone());
        params.insert(OAUTH_VERIFIER_KEY.into(), callback.oauth_verifier.clone());
        sign_params(
            provider.exchange_signature,
            "POST",
            endpoint,
            &mut params,
            &self.config.consumer_secret,
            &token_secret,
        )?;

        debug!(
            %endpoint,
            signature_method = provider.exchange_signature.as_str(),
            "exchanging request token"
        );
        let body = self.post_form(endpoint, &params)?;
        let response = TokenResponse::parse(&body)?;
        let resource_owner_id = response.field(&provider.owner_id_field)?.to_string();

        let credentials = Credentials {
            access_token: response.oauth_token,
            access_token_secret: response.oauth_token_secret,
            resource_owner_id,
        };
        self.install_credentials(credentials.clone());
        info!(owner_id = %credentials.resource_owner_id, "access token acquired");

        Ok(credentials)
    }

    /// Parse a raw callback query string and run the exchange
    pub fn fetch_access_token_from_query(&self, query: &str) -> Result<Credentials> {
        let callback = CallbackParams::from_query(query)?;
        self.fetch_access_token(&callback)
    }

    /// Run the whole handshake through a local callback listener
    ///
    /// Opens the authorization URL in the default browser and blocks until
    /// the provider redirects back or `timeout` passes.
    pub fn authorize_with_listener(
        &self,
        listener: &CallbackListener,
        timeout: Duration,
    ) -> Result<Credentials> {
        let url = self.request_login_url_with_callback(&listener.redirect_uri())?;

        info!(%url, "open this URL to authorize the application");
        if let Err(e) = webbrowser::open(&url) {
            warn!(error = %e, "could not open a browser");
        }

        let callback = listener.wait_for_callback(timeout)?;
        self.fetch_access_token(&callback)
    }

    fn post_form(&self, endpoint: &str, params: &Params) -> Result<String> {
        let response = self.http.post(endpoint).form(params).send()?;
        Ok(ensure_success(response)?.text()?)
    }
}

/// Turn a non-2xx response into an error carrying the provider's body
pub(crate) fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    warn!(status = status.as_u16(), %body, "provider rejected request");
    Err(OAuthError::HttpStatus {
        status: status.as_u16(),
        body,
    })
}
