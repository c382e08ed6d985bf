//! WebDAV connector implementation
//!
//! Implements the `SyncClient` trait on top of plain WebDAV verbs. The whole
//! application state lives in a single `backup.json` inside a dedicated
//! collection.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use bridge_traits::storage::SyncClient;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use crate::error::WebDavError;

/// Route prefix of the CORS proxy for WebDAV traffic
const PROXY_PATH_PREFIX: &str = "/api/webdav/";

/// Name of the backup document inside the collection
const BACKUP_FILE_NAME: &str = "backup.json";

/// Statuses that prove the collection exists or was just created.
///
/// `404` is accepted because some proxies answer it for an existing
/// collection queried with GET.
const CHECK_OK_STATUSES: [u16; 8] = [201, 200, 404, 405, 301, 302, 307, 308];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for one WebDAV account
#[derive(Clone)]
pub struct WebDavSettings {
    /// Server base URL, e.g. `https://dav.example.com/remote.php/dav`
    pub endpoint: String,
    pub username: String,
    pub password: String,
    /// Collection holding the backup document
    pub folder: String,
    /// Absolute URL of a CORS proxy; `None` talks to the server directly
    pub proxy_url: Option<String>,
}

impl fmt::Debug for WebDavSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDavSettings")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("folder", &self.folder)
            .field("proxy_url", &self.proxy_url)
            .finish()
    }
}

/// WebDAV connector
///
/// # Example
///
/// ```ignore
/// use provider_webdav::{WebDavConnector, WebDavSettings};
/// use bridge_traits::storage::SyncClient;
///
/// let connector = WebDavConnector::new(http_client, settings)?;
/// if connector.check().await? {
///     connector.set("alice", &state_json).await?;
/// }
/// ```
pub struct WebDavConnector {
    http_client: Arc<dyn HttpClient>,
    settings: WebDavSettings,
}

impl WebDavConnector {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        settings: WebDavSettings,
    ) -> std::result::Result<Self, WebDavError> {
        if settings.folder.trim_matches('/').is_empty() {
            return Err(WebDavError::InvalidConfig(
                "backup folder cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            http_client,
            settings,
        })
    }

    fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.settings.username, self.settings.password);
        format!("Basic {}", STANDARD.encode(credentials))
    }

    fn folder(&self) -> &str {
        self.settings.folder.trim_matches('/')
    }

    fn backup_path(&self) -> String {
        format!("{}/{}", self.folder(), BACKUP_FILE_NAME)
    }

    /// Build the request URL for `path`, routed through the proxy when set.
    ///
    /// Through the proxy the real verb travels in `proxy_method`, since the
    /// proxy only accepts standard methods.
    fn url(&self, path: &str, proxy_method: Option<HttpMethod>) -> String {
        let path = path.trim_start_matches('/');

        match self.settings.proxy_url.as_deref() {
            Some(proxy) => {
                let mut url = format!(
                    "{}{}{}?endpoint={}",
                    proxy.trim_end_matches('/'),
                    PROXY_PATH_PREFIX,
                    path,
                    urlencoding::encode(&self.settings.endpoint)
                );
                if let Some(method) = proxy_method {
                    url.push_str("&proxy_method=");
                    url.push_str(method.as_str());
                }
                url
            }
            None => format!("{}/{}", self.settings.endpoint.trim_end_matches('/'), path),
        }
    }

    fn request(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest::new(method, url)
            .header("Authorization", self.auth_header())
            .timeout(REQUEST_TIMEOUT)
    }
}

#[async_trait]
impl SyncClient for WebDavConnector {
    #[instrument(skip(self), fields(endpoint = %self.settings.endpoint))]
    async fn check(&self) -> Result<bool> {
        let request = match self.settings.proxy_url {
            Some(_) => self.request(HttpMethod::Get, self.url(self.folder(), Some(HttpMethod::Mkcol))),
            None => self.request(HttpMethod::Mkcol, self.url(self.folder(), None)),
        };

        match self.http_client.execute(request).await {
            Ok(response) => {
                let success = CHECK_OK_STATUSES.contains(&response.status);
                info!(status = response.status, success, "WebDAV check finished");
                Ok(success)
            }
            Err(e) => {
                error!(error = %e, "WebDAV check failed");
                Ok(false)
            }
        }
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let response = self
            .http_client
            .execute(self.request(HttpMethod::Get, self.url(&self.backup_path(), None)))
            .await?;

        debug!(status = response.status, "WebDAV get finished");

        if response.status == 404 {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(WebDavError::from_status(response.status, &response.body).into());
        }

        response.text().map(Some)
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let request = self
            .request(HttpMethod::Put, self.url(&self.backup_path(), None))
            .header("Content-Type", "application/json")
            .text(value);

        let response = self.http_client.execute(request).await?;
        debug!(status = response.status, "WebDAV set finished");

        if !response.is_success() {
            return Err(WebDavError::from_status(response.status, &response.body).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::http::HttpResponse;
    use bridge_traits::BridgeError;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
        }
    }

    fn settings(proxy_url: Option<&str>) -> WebDavSettings {
        WebDavSettings {
            endpoint: "https://dav.example.com/dav/".to_string(),
            username: "alice".to_string(),
            password: "secret".to_string(),
            folder: "chatgpt-next-web".to_string(),
            proxy_url: proxy_url.map(str::to_string),
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn connector(mock_http: MockHttpClient, proxy_url: Option<&str>) -> WebDavConnector {
        WebDavConnector::new(Arc::new(mock_http), settings(proxy_url)).unwrap()
    }

    #[test]
    fn test_rejects_empty_folder() {
        let mut bad = settings(None);
        bad.folder = "/".to_string();

        assert!(WebDavConnector::new(Arc::new(MockHttpClient::new()), bad).is_err());
    }

    #[test]
    fn test_direct_url() {
        let connector = connector(MockHttpClient::new(), None);

        assert_eq!(
            connector.url(&connector.backup_path(), None),
            "https://dav.example.com/dav/chatgpt-next-web/backup.json"
        );
    }

    #[test]
    fn test_proxy_url_carries_endpoint_and_method() {
        let connector = connector(MockHttpClient::new(), Some("https://proxy.example.com/"));

        assert_eq!(
            connector.url("chatgpt-next-web", Some(HttpMethod::Mkcol)),
            "https://proxy.example.com/api/webdav/chatgpt-next-web\
             ?endpoint=https%3A%2F%2Fdav.example.com%2Fdav%2F&proxy_method=MKCOL"
        );
    }

    #[test]
    fn test_basic_auth_header() {
        let connector = connector(MockHttpClient::new(), None);
        // base64("alice:secret")
        assert_eq!(connector.auth_header(), "Basic YWxpY2U6c2VjcmV0");
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", settings(None));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_get_missing_backup_is_none() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .withf(|req| req.method == HttpMethod::Get && req.url.ends_with("/backup.json"))
            .returning(|_| Ok(response(404, "Not Found")));

        let connector = connector(mock_http, None);
        assert_eq!(connector.get("alice").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_returns_body() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .withf(|req| req.headers.get("Authorization").map(String::as_str) == Some("Basic YWxpY2U6c2VjcmV0"))
            .returning(|_| Ok(response(200, r#"{"chat":{}}"#)));

        let connector = connector(mock_http, None);
        assert_eq!(
            connector.get("alice").await.unwrap(),
            Some(r#"{"chat":{}}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_get_auth_failure_is_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(401, "Unauthorized")));

        let connector = connector(mock_http, None);
        let result = connector.get("alice").await;

        assert!(matches!(result, Err(BridgeError::Http { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_set_puts_body() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .withf(|req| {
                req.method == HttpMethod::Put
                    && req.body.as_deref() == Some(br#"{"a":1}"#.as_slice())
            })
            .returning(|_| Ok(response(201, "")));

        let connector = connector(mock_http, None);
        connector.set("alice", r#"{"a":1}"#).await.unwrap();
    }

    #[tokio::test]
    async fn test_set_server_error_is_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(507, "Insufficient Storage")));

        let connector = connector(mock_http, None);
        assert!(connector.set("alice", "{}").await.is_err());
    }

    #[tokio::test]
    async fn test_check_direct_uses_mkcol() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .withf(|req| req.method == HttpMethod::Mkcol)
            .returning(|_| Ok(response(405, "")));

        let connector = connector(mock_http, None);
        assert!(connector.check().await.unwrap());
    }

    #[tokio::test]
    async fn test_check_through_proxy_uses_get() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .withf(|req| req.method == HttpMethod::Get && req.url.contains("proxy_method=MKCOL"))
            .returning(|_| Ok(response(201, "")));

        let connector = connector(mock_http, Some("https://proxy.example.com"));
        assert!(connector.check().await.unwrap());
    }

    #[tokio::test]
    async fn test_check_rejected_credentials() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(401, "")));

        let connector = connector(mock_http, None);
        assert!(!connector.check().await.unwrap());
    }

    #[tokio::test]
    async fn test_check_transport_failure_is_false() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::OperationFailed("Connection failed".to_string())));

        let connector = connector(mock_http, None);
        assert!(!connector.check().await.unwrap());
    }
}
