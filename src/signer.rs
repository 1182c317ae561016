/// OAuth 1.0a signature methods
use crate::encode::{base_string, Params};
use crate::error::{OAuthError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

pub const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
pub const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";

/// How a request is signed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureMethod {
    /// `consumer_secret&token_secret` sent as-is; only safe over TLS
    #[serde(rename = "PLAINTEXT", alias = "plaintext")]
    Plaintext,
    /// Base64 HMAC-SHA1 of the signature base string
    #[serde(rename = "HMAC-SHA1", alias = "hmac-sha1")]
    HmacSha1,
}

impl SignatureMethod {
    /// Value of the `oauth_signature_method` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plaintext => "PLAINTEXT",
            Self::HmacSha1 => "HMAC-SHA1",
        }
    }

    /// Sign a base string
    ///
    /// `token_secret` is empty while no token has been issued yet. The
    /// plaintext method ignores the base string.
    pub fn sign(
        &self,
        base_string: &str,
        consumer_secret: &str,
        token_secret: &str,
    ) -> Result<String> {
        let key = signing_key(consumer_secret, token_secret);
        match self {
            Self::Plaintext => Ok(key),
            Self::HmacSha1 => hmac_sha1(base_string, &key),
        }
    }
}

/// Composite signing key: `consumer_secret&token_secret`
pub fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!("{}&{}", consumer_secret, token_secret)
}

fn hmac_sha1(text: &str, key: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| OAuthError::Signature(e.to_string()))?;
    mac.update(text.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Sign a request in place
///
/// Sets `oauth_signature_method`, computes the signature over every other
/// parameter and inserts it as `oauth_signature`. A stale `oauth_signature`
/// already present in `params` never takes part in the base string.
pub fn sign_params(
    signature_method: SignatureMethod,
    http_method: &str,
    url: &str,
    params: &mut Params,
    consumer_secret: &str,
    token_secret: &str,
) -> Result<()> {
    params.remove(OAUTH_SIGNATURE_KEY);
    params.insert(
        OAUTH_SIGNATURE_METHOD_KEY.to_string(),
        signature_method.as_str().to_string(),
    );

    let base = match signature_method {
        SignatureMethod::Plaintext => String::new(),
        SignatureMethod::HmacSha1 => base_string(http_method, url, params),
    };
    let signature = signature_method.sign(&base, consumer_secret, token_secret)?;

    params.insert(OAUTH_SIGNATURE_KEY.to_string(), signature);
    Ok(())
}
