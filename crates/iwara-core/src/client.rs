//! HTTP transport for iwara
//!
//! Wraps two `reqwest` clients that share one configuration. The media
//! client resolves names with the built-in async resolver instead of the
//! system one, which keeps the high-volume listing endpoints reachable
//! where the system resolver is filtered.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{IwaraError, Result};
use crate::session::Session;
use crate::url::{API_URL, BASE_URL, LOGIN_PATH};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for the HTTP clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Site root pages are fetched from (default: `https://ecchi.iwara.tv`)
    pub base_url: String,
    /// Root of the JSON API used for login (default: `https://api.iwara.tv`)
    pub api_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    pub user_agent: String,
    /// `Accept-Language` sent with every request (default: `en-US,en;q=0.9`)
    pub accept_language: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            api_url: API_URL.to_string(),
            timeout_secs: 30,
            user_agent: USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

/// Which underlying client a request goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Standard,
    /// Client with the non-system DNS resolver
    Media,
}

#[derive(Deserialize)]
struct LoginReply {
    token: String,
}

/// HTTP client wrapper for iwara
///
/// Handles all HTTP communication, including:
/// - Bearer authorization from the caller's [`Session`]
/// - Shared headers (User-Agent, Accept-Language) and cookie store
/// - Status checking, so callers only ever see 2xx bodies
pub struct IwaraClient {
    standard: reqwest::Client,
    media: reqwest::Client,
    base_url: String,
    api_url: String,
}

impl IwaraClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// Returns `HttpError` if either client cannot be built, and `ParseError`
    /// if the configured `Accept-Language` is not a valid header value
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let standard = Self::builder(&config, Channel::Standard)?.build()?;
        let media = Self::builder(&config, Channel::Media)?.build()?;

        Ok(Self {
            standard,
            media,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Shared settings plus the resolver for `channel`
    ///
    /// The `hickory-dns` feature makes hickory the default for every builder,
    /// so the standard channel has to opt out explicitly.
    fn builder(config: &ClientConfig, channel: Channel) -> Result<reqwest::ClientBuilder> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).map_err(|e| {
                IwaraError::ParseError(format!("Invalid Accept-Language header: {}", e))
            })?,
        );

        let builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .default_headers(headers);

        Ok(match channel {
            Channel::Standard => builder.no_hickory_dns(),
            Channel::Media => builder.hickory_dns(true),
        })
    }

    /// Site root requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn client(&self, channel: Channel) -> &reqwest::Client {
        match channel {
            Channel::Standard => &self.standard,
            Channel::Media => &self.media,
        }
    }

    fn authorize(request: reqwest::RequestBuilder, session: &Session) -> reqwest::RequestBuilder {
        match session.authorization() {
            Some(value) => request.header(header::AUTHORIZATION, value),
            None => request,
        }
    }

    /// Fetch the HTML of a page on the site
    ///
    /// # Arguments
    /// * `channel` - Client to send the request through
    /// * `path` - Path below the base URL (e.g., "/videos/abc?language=en")
    /// * `session` - Session whose token is attached
    ///
    /// # Errors
    /// - `HttpError` - Network or transport errors
    /// - `Status` - Server answered with a non-2xx status
    pub async fn get_page(&self, channel: Channel, path: &str, session: &Session) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, ?channel, guest = session.is_guest(), "GET");

        let request = Self::authorize(self.client(channel).get(&url), session);
        Self::read_body(request.send().await?).await
    }

    /// Submit a urlencoded form to a path on the site and return the reply body
    ///
    /// # Errors
    /// - `HttpError` - Network or transport errors
    /// - `Status` - Server answered with a non-2xx status
    pub async fn post_form(
        &self,
        path: &str,
        session: &Session,
        fields: &[(String, String)],
    ) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, fields = fields.len(), "POST");

        let request = Self::authorize(self.standard.post(&url).form(fields), session);
        Self::read_body(request.send().await?).await
    }

    /// Exchange credentials for a session token
    ///
    /// # Errors
    /// - `InvalidCredentials` - The API answered 400
    /// - `Status` - Any other non-2xx status
    /// - `Json` - The reply carried no `token`
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}{}", self.api_url, LOGIN_PATH);
        info!(url = %url, "Logging in");

        let response = self
            .standard
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            return Err(IwaraError::InvalidCredentials);
        }

        let body = Self::read_body(response).await?;
        let reply: LoginReply = serde_json::from_str(&body)?;
        Ok(Session::new(reply.token))
    }

    async fn read_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            return Err(IwaraError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}
