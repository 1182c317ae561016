/// Client and provider configuration
use crate::signer::SignatureMethod;
use serde::Deserialize;

/// OAuth 1.0a client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub callback_uri: String,
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl OAuthConfig {
    /// Configuration against the Yahoo endpoints
    ///
    /// # Example
    ///
    /// ```
    /// use yahoo_oauth1::config::OAuthConfig;
    ///
    /// let config = OAuthConfig::yahoo("key", "secret", "https://app.example.com/callback");
    /// assert_eq!(config.provider.realm, "yahooapis.com");
    /// ```
    pub fn yahoo(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        callback_uri: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            callback_uri: callback_uri.into(),
            provider: ProviderConfig::default(),
        }
    }
}

/// Provider endpoints and wire conventions
///
/// Defaults target Yahoo. Tests and other providers override the endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub request_token_endpoint: String,
    pub access_token_endpoint: String,
    /// Resources live under `<resource_base>/user/<owner_id>/<name>`
    pub resource_base: String,
    pub realm: String,
    /// Sent as `xoauth_lang_pref` when requesting a token
    pub lang_pref: String,
    /// Response field carrying the authorization URL
    pub auth_url_field: String,
    /// Response field carrying the resource owner identifier
    pub owner_id_field: String,
    /// Signature method for the access token exchange
    pub exchange_signature: SignatureMethod,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            request_token_endpoint: "https://api.login.yahoo.com/oauth/v2/get_request_token"
                .to_string(),
            access_token_endpoint: "https://api.login.yahoo.com/oauth/v2/get_token".to_string(),
            resource_base: "http://social.yahooapis.com/v1".to_string(),
            realm: "yahooapis.com".to_string(),
            lang_pref: "en-us".to_string(),
            auth_url_field: "xoauth_request_auth_url".to_string(),
            owner_id_field: "xoauth_yahoo_guid".to_string(),
            exchange_signature: SignatureMethod::Plaintext,
        }
    }
}

impl ProviderConfig {
    /// Point every endpoint at `base`, keeping the Yahoo path layout
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            request_token_endpoint: format!("{}/oauth/v2/get_request_token", base),
            access_token_endpoint: format!("{}/oauth/v2/get_token", base),
            resource_base: format!("{}/v1", base),
            ..Self::default()
        }
    }
}
