use crate::error::{SdsError, SdsResult};
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

/// Remaining validity below which a cached token is re-acquired
pub const REFRESH_MARGIN_SECS: i64 = 5 * 60;

const DISCOVERY_PATH: &str = "/identity/.well-known/openid-configuration";

/// Authentication trait for SDS requests
#[async_trait::async_trait]
pub trait Authentication: Send + Sync {
    /// Apply authentication to the request headers
    async fn apply_auth(&self, headers: &mut HeaderMap) -> SdsResult<()>;
}

fn bearer(token: &str) -> SdsResult<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Pre-issued bearer token
#[derive(Debug, Clone)]
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait::async_trait]
impl Authentication for BearerAuth {
    async fn apply_auth(&self, headers: &mut HeaderMap) -> SdsResult<()> {
        headers.insert(AUTHORIZATION, bearer(&self.token)?);
        Ok(())
    }
}

/// Cached bearer token and the instant it stops being accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSession {
    token: String,
    expiration: DateTime<Utc>,
}

impl Default for TokenSession {
    fn default() -> Self {
        Self {
            token: String::new(),
            expiration: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

impl TokenSession {
    pub fn new(token: impl Into<String>, expiration: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expiration,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expiration(&self) -> DateTime<Utc> {
        self.expiration
    }

    /// Whether the token still has more than the refresh margin left at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration - now > Duration::seconds(REFRESH_MARGIN_SECS)
    }
}

#[derive(Debug, Deserialize)]
struct OpenIdConfiguration {
    token_endpoint: String,
}

/// `expires_in` arrives as a number from most identity servers, as a string from some
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExpiresIn {
    Seconds(f64),
    Text(String),
}

impl ExpiresIn {
    fn seconds(&self) -> SdsResult<f64> {
        match self {
            Self::Seconds(seconds) => Ok(*seconds),
            Self::Text(text) => text.trim().parse().map_err(|_| {
                <serde_json::Error as serde::de::Error>::custom(format!(
                    "invalid expires_in value: {}",
                    text
                ))
                .into()
            }),
        }
    }
}

/// Instant `seconds` after `now`; lifetimes outside the range of `DateTime` are rejected
fn expires_at(now: DateTime<Utc>, seconds: f64) -> SdsResult<DateTime<Utc>> {
    let millis = seconds * 1000.0;
    let lifetime = if millis.is_finite() && millis.abs() < i64::MAX as f64 {
        Duration::try_milliseconds(millis as i64)
    } else {
        None
    };

    lifetime
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            <serde_json::Error as serde::de::Error>::custom(format!(
                "expires_in out of range: {}",
                seconds
            ))
            .into()
        })
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: ExpiresIn,
}

/// OAuth2 client-credentials authentication against the OCS identity service.
///
/// The token endpoint is discovered from the resource's OpenID configuration
/// on every refresh. The session lock is held across a refresh, so concurrent
/// callers share a single round of network calls.
pub struct ClientCredentials {
    client: Client,
    resource: String,
    client_id: String,
    client_secret: String,
    session: Mutex<TokenSession>,
}

impl ClientCredentials {
    pub fn new(
        client: Client,
        resource: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        let resource: String = resource.into();
        Self {
            client,
            resource: resource.trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            session: Mutex::new(TokenSession::default()),
        }
    }

    /// Current session, without refreshing it
    pub async fn session(&self) -> TokenSession {
        self.session.lock().await.clone()
    }

    /// Return a token with more than the refresh margin left, acquiring a new one if needed
    pub async fn token(&self) -> SdsResult<String> {
        let mut session = self.session.lock().await;
        let now = Utc::now();

        if session.is_valid_at(now) {
            debug!("Reusing cached token, expires at {}", session.expiration);
            return Ok(session.token.clone());
        }

        info!("Acquiring access token for {}", self.resource);
        let token_endpoint = self.discover_token_endpoint().await?;
        let response = self.request_token(&token_endpoint).await?;

        let expiration = expires_at(Utc::now(), response.expires_in.seconds()?)?;
        debug!("Token acquired, expires at {}", expiration);

        *session = TokenSession::new(response.access_token, expiration);
        Ok(session.token.clone())
    }

    async fn discover_token_endpoint(&self) -> SdsResult<String> {
        let url = format!("{}{}", self.resource, DISCOVERY_PATH);
        debug!("HTTP GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SdsError::service_error(status.as_u16(), body));
        }

        let configuration: OpenIdConfiguration = serde_json::from_str(&body)?;
        Ok(configuration.token_endpoint)
    }

    async fn request_token(&self, token_endpoint: &str) -> SdsResult<TokenResponse> {
        debug!("HTTP POST {}", token_endpoint);

        let response = self
            .client
            .post(token_endpoint)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SdsError::service_error(status.as_u16(), body));
        }

        serde_json::from_str::<Option<TokenResponse>>(&body)?.ok_or(SdsError::TokenUnavailable)
    }
}

#[async_trait::async_trait]
impl Authentication for ClientCredentials {
    async fn apply_auth(&self, headers: &mut HeaderMap) -> SdsResult<()> {
        let token = self.token().await?;
        headers.insert(AUTHORIZATION, bearer(&token)?);
        Ok(())
    }
}
