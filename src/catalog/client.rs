//! HTTP client for the catalit protocol endpoints.
//!
//! The client is a pure protocol boundary: it authenticates, lists owned
//! items, and opens download streams, but never touches the local
//! filesystem. The endpoint base URL is part of [`CatalogConfig`] so tests
//! can point the client at a fake server.

use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tracing::{debug, instrument};
use url::Url;

use super::error::CatalogError;
use super::format::Format;
use super::xml::{self, AuthResponse, CatalogPage};

/// Default connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default read timeout in seconds (downloads can be large).
const READ_TIMEOUT_SECS: u64 = 300;

/// Production endpoint base for the catalit protocol.
const DEFAULT_BASE_URL: &str = "https://robot.litres.ru/pages/";

/// Session issued by authentication.
///
/// Scoped to one run: it is never refreshed and carries no expiry
/// handling, matching the service's contract for short-lived backups.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque session identifier required on all subsequent calls.
    pub sid: String,
    /// Login name, for user-facing confirmation.
    pub login: String,
    /// Contact address, for user-facing confirmation.
    pub mail: String,
}

/// Configuration for [`CatalogClient`].
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL all endpoint paths are joined onto.
    pub base_url: Url,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    pub read_timeout_secs: u64,
}

impl Default for CatalogConfig {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

impl CatalogConfig {
    /// Creates a config pointing at the given base URL with default timeouts.
    #[must_use]
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }
}

/// Client for the remote catalog service.
///
/// Designed to be created once per run and reused across all calls,
/// taking advantage of connection pooling.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: Url,
}

/// A lazily-consumed download body.
///
/// The chunk sequence is finite, forward-only, and non-restartable: it
/// must be fully drained or abandoned (with cleanup of any partial
/// output) before the next item is processed.
#[derive(Debug)]
pub struct DownloadStream {
    url: String,
    response: reqwest::Response,
}

impl DownloadStream {
    /// The endpoint URL this stream was opened against.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Consumes the handle into a stream of byte chunks.
    pub fn into_chunks(self) -> impl Stream<Item = Result<Bytes, CatalogError>> {
        let url = self.url;
        self.response
            .bytes_stream()
            .map(move |chunk| chunk.map_err(|e| CatalogError::transport(url.clone(), e)))
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogClient {
    /// Creates a client against the production endpoint.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    /// Creates a client with an explicit configuration.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the supplied
    /// configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_config(config: CatalogConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.read_timeout_secs))
            .gzip(true)
            .user_agent(concat!("litres-backup/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self {
            client,
            base_url: config.base_url,
        }
    }

    /// Authenticates against the service.
    ///
    /// Rejection is signaled in the response body, so a clean HTTP 200 can
    /// still produce [`CatalogError::AuthorizationRejected`].
    ///
    /// # Errors
    ///
    /// `AuthorizationRejected` when the credentials are refused, otherwise
    /// transport or protocol errors.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, user: &str, password: &str) -> Result<Session, CatalogError> {
        let url = self.endpoint("catalit_authorise/");
        let body = self
            .post_form(&url, &[("login", user), ("pwd", password)])
            .await?;

        match xml::parse_auth_response(&body)? {
            AuthResponse::Authorized(session) => {
                debug!(login = %session.login, "authorized");
                Ok(session)
            }
            AuthResponse::Rejected => Err(CatalogError::AuthorizationRejected),
        }
    }

    /// Lists owned items in a single bulk call.
    ///
    /// The service accepts `limit` as `"<offset>,<count>"`; a count large
    /// enough to cover the whole catalog fetches it in one page.
    ///
    /// # Errors
    ///
    /// Transport errors, HTTP error statuses, or protocol errors when the
    /// listing body cannot be parsed.
    #[instrument(skip(self, session))]
    pub async fn list_owned_items(
        &self,
        session: &Session,
        offset: u64,
        limit: u64,
    ) -> Result<CatalogPage, CatalogError> {
        let url = self.endpoint("catalit_browser/");
        let range = format!("{offset},{limit}");
        let body = self
            .post_form(
                &url,
                &[("sid", session.sid.as_str()), ("my", "1"), ("limit", &range)],
            )
            .await?;

        let page = xml::parse_catalog_page(&body)?;
        debug!(total = page.total, fetched = page.items.len(), "listed owned items");
        Ok(page)
    }

    /// Opens a download stream for one item in the given format.
    ///
    /// The returned handle does not validate that the streamed size matches
    /// the declared size; that is the caller's concern.
    ///
    /// # Errors
    ///
    /// Transport errors or HTTP error statuses when the stream cannot be
    /// opened.
    #[instrument(skip(self, session))]
    pub async fn open_download_stream(
        &self,
        session: &Session,
        hub_id: &str,
        format: Format,
    ) -> Result<DownloadStream, CatalogError> {
        let url = self.endpoint("catalit_download_book/");
        let response = self
            .send_form(
                &url,
                &[
                    ("sid", session.sid.as_str()),
                    ("art", hub_id),
                    ("type", format.as_str()),
                ],
            )
            .await?;

        Ok(DownloadStream {
            url: url.to_string(),
            response,
        })
    }

    /// Joins an endpoint path onto the configured base URL.
    #[allow(clippy::expect_used)]
    fn endpoint(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .expect("endpoint path joins onto a valid base URL")
    }

    /// POSTs a form and returns the response after status checking.
    async fn send_form(
        &self,
        url: &Url,
        form: &[(&str, &str)],
    ) -> Result<reqwest::Response, CatalogError> {
        let response = self
            .client
            .post(url.clone())
            .form(form)
            .send()
            .await
            .map_err(|e| CatalogError::transport(url.to_string(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::http_status(url.to_string(), status.as_u16()));
        }
        Ok(response)
    }

    /// POSTs a form and collects the full response body as text.
    async fn post_form(&self, url: &Url, form: &[(&str, &str)]) -> Result<String, CatalogError> {
        let response = self.send_form(url, form).await?;
        response
            .text()
            .await
            .map_err(|e| CatalogError::transport(url.to_string(), e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_points_at_production() {
        let config = CatalogConfig::default();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.connect_timeout_secs, CONNECT_TIMEOUT_SECS);
        assert_eq!(config.read_timeout_secs, READ_TIMEOUT_SECS);
    }

    #[test]
    fn test_with_base_url_keeps_default_timeouts() {
        let base = Url::parse("http://127.0.0.1:9999/pages/").unwrap();
        let config = CatalogConfig::with_base_url(base.clone());
        assert_eq!(config.base_url, base);
        assert_eq!(config.read_timeout_secs, READ_TIMEOUT_SECS);
    }

    #[test]
    fn test_endpoint_joins_onto_base() {
        let config =
            CatalogConfig::with_base_url(Url::parse("http://localhost:8080/pages/").unwrap());
        let client = CatalogClient::with_config(config);
        assert_eq!(
            client.endpoint("catalit_authorise/").as_str(),
            "http://localhost:8080/pages/catalit_authorise/"
        );
    }
}
