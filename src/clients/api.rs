use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::error::ApiError;

const MAX_LOGGED_BODY: usize = 500;

/// HTTP transport to the key-lending API.
///
/// Owns the cookie jar that carries the operator session, so every request
/// made through a clone of this client is authenticated the same way.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    jar: Arc<Jar>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Self::with_jar(config, Arc::new(Jar::default()))
    }

    pub fn with_jar(config: &ApiConfig, jar: Arc<Jar>) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).with_context(|| format!("Invalid API base URL: {base_url}"))?;

        let client = Client::builder()
            .cookie_provider(jar.clone())
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_seconds.into()))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            jar,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) const fn http(&self) -> &Client {
        &self.client
    }

    /// Absolute URL of an API path (`/chaves`, `/emprestimos/{id}`).
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Cookie header the jar would send to the API, as `name=value; ...`.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        let url = Url::parse(&self.base_url).ok()?;
        let header = self.jar.cookies(&url)?;
        header.to_str().ok().map(ToString::to_string)
    }

    /// Loads cookies saved by [`Self::cookie_header`] back into the jar.
    pub fn restore_cookies(&self, header: &str) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.base_url))?;
        for cookie in header.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            self.jar.add_cookie_str(&format!("{cookie}; Path=/"), &url);
        }
        Ok(())
    }

    pub async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut url = Url::parse(&self.url(path))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to reach API at {path}"))?;

        decode(path, response).await
    }

    /// POSTs a JSON body with an explicit `Content-Type: application/json`.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let payload = serde_json::to_vec(body).context("Failed to encode request body")?;

        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .await
            .with_context(|| format!("Failed to reach API at {path}"))?;

        decode(path, response).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);

        debug!(%url, "DELETE");
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach API at {path}"))?;

        read_body(response).await.map(|_| ())
    }
}

/// Reads the body of a response, turning non-2xx answers into errors.
///
/// An error envelope becomes an [`ApiError`] in the returned chain; any other
/// failure body is reported with its status.
pub(crate) async fn read_body(response: Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .context("Failed to read response body")?;

    if status.is_success() {
        return Ok(body);
    }

    if let Some(err) = ApiError::from_body(&body) {
        debug!(status = %status, identifier = err.identifier(), "API returned error envelope");
        return Err(err.into());
    }

    bail!("Request failed: status={status}, body={}", truncate(&body))
}

pub(crate) async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T> {
    let body = read_body(response).await?;
    let body = if body.trim().is_empty() { "null" } else { &body };

    serde_json::from_str(body).map_err(|e| {
        debug!(error = %e, path, response = %truncate(body), "Failed to parse API response");
        anyhow::anyhow!("Failed to parse response from {path}: {e}")
    })
}

fn truncate(body: &str) -> String {
    if body.len() > MAX_LOGGED_BODY {
        let cut = (0..=MAX_LOGGED_BODY)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
