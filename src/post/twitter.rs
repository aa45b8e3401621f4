//! Twitter API v2 poster with OAuth 1.0a user-context signing.

use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

use super::{PostError, PostReceipt, Poster};
use crate::schema::config::Credentials;
use crate::schema::tweet::Tweet;

/// RFC 3986 unreserved characters stay as-is; everything else is escaped.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const NONCE_LEN: usize = 32;

pub struct TwitterPoster {
    client: reqwest::Client,
    credentials: Credentials,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: Option<CreatedTweet>,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

impl TwitterPoster {
    pub fn new(credentials: Credentials, api_base_url: &str) -> Result<Self, PostError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("markov-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            credentials,
            endpoint: format!("{}/2/tweets", api_base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Poster for TwitterPoster {
    async fn post(&self, tweet: &Tweet) -> Result<PostReceipt, PostError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| PostError::Signing(e.to_string()))?
            .as_secs()
            .to_string();
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        let authorization =
            authorization_header(&self.credentials, "POST", &self.endpoint, &nonce, &timestamp)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .json(&serde_json::json!({ "text": tweet.text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "tweet rejected");
            return Err(PostError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CreateTweetResponse = response.json().await?;
        let id = parsed.data.map(|d| d.id);
        debug!(?id, "tweet posted");
        Ok(PostReceipt { id })
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Build the `Authorization: OAuth ...` header value for a request whose body
/// carries no form parameters.
pub fn authorization_header(
    credentials: &Credentials,
    method: &str,
    url: &str,
    nonce: &str,
    timestamp: &str,
) -> Result<String, PostError> {
    let mut oauth_params = vec![
        ("oauth_consumer_key", credentials.consumer_key.as_str()),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp),
        ("oauth_token", credentials.access_token.as_str()),
        ("oauth_version", "1.0"),
    ];
    let signature = sign(
        method,
        url,
        &oauth_params,
        &credentials.consumer_secret,
        &credentials.access_token_secret,
    )?;
    oauth_params.push(("oauth_signature", signature.as_str()));
    oauth_params.sort_unstable();

    let fields = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("OAuth {fields}"))
}

/// The OAuth 1.0a signature base string.
pub fn signature_base_string(method: &str, url: &str, params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> =
        params.iter().map(|(k, v)| (encode(k), encode(v))).collect();
    encoded.sort();
    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(url),
        encode(&param_string)
    )
}

/// HMAC-SHA1 signature over the base string, base64-encoded.
pub fn sign(
    method: &str,
    url: &str,
    params: &[(&str, &str)],
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String, PostError> {
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| PostError::Signing(e.to_string()))?;
    mac.update(signature_base_string(method, url, params).as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}
