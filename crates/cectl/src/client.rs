//! HTTP client for the platform API.
//!
//! Every request carries the composed authorization header together with
//! JSON `Accept` and `Content-Type` headers. Each response keeps the raw
//! body, the status and the equivalent curl command so commands can print
//! any of them.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::config::Profile;
use crate::error::CliError;
use crate::model::Element;

const USER_AGENT: &str = concat!("cectl/", env!("CARGO_PKG_VERSION"));

/// Error body returned by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorEnvelope {
    /// Request identifier for support.
    pub request_id: String,
    /// Human readable message.
    pub message: String,
}

/// A completed request.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Vec<u8>,
    curl: String,
}

impl ApiResponse {
    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the platform answered 200.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Raw body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Equivalent curl command.
    pub fn curl(&self) -> &str {
        &self.curl
    }

    /// Decode the body.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, CliError> {
        serde_json::from_slice(&self.body).map_err(|e| CliError::Decode(e.to_string()))
    }

    /// Decode the body as an error envelope, if it is one.
    pub fn error_envelope(&self) -> Option<ErrorEnvelope> {
        serde_json::from_slice::<ErrorEnvelope>(&self.body)
            .ok()
            .filter(|e| !e.message.is_empty() || !e.request_id.is_empty())
    }

    /// Convert into a [`CliError::Api`], preferring the envelope message.
    pub fn into_error(self) -> CliError {
        let message = match self.error_envelope() {
            Some(envelope) if !envelope.message.is_empty() => envelope.message,
            _ => self.text(),
        };
        CliError::Api {
            status: self.status.as_u16(),
            message,
        }
    }

    /// Pass 200 responses through, turn anything else into an error.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Api`] for non-200 statuses.
    pub fn ensure_ok(self) -> Result<Self, CliError> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(self.into_error())
        }
    }
}

/// Authenticated client bound to one profile.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    auth: String,
}

impl ApiClient {
    /// Create a client for a base URL and authorization header value.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base: impl Into<String>, auth: impl Into<String>) -> Result<Self, CliError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
            auth: auth.into(),
        })
    }

    /// Create a client from a profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_profile(profile: &Profile) -> Result<Self, CliError> {
        Self::new(&profile.base, profile.auth())
    }

    /// Base URL without a trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Authorization header value.
    pub fn auth(&self) -> &str {
        &self.auth
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// GET a path.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, CliError> {
        self.send(Method::GET, &self.url(path), &self.auth, None).await
    }

    /// GET a path with query parameters.
    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<ApiResponse, CliError> {
        let url = Url::parse_with_params(&self.url(path), query)?;
        self.send(Method::GET, url.as_str(), &self.auth, None).await
    }

    /// DELETE a path.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, CliError> {
        self.send(Method::DELETE, &self.url(path), &self.auth, None).await
    }

    /// POST raw bytes to a path.
    pub async fn post(&self, path: &str, body: Vec<u8>) -> Result<ApiResponse, CliError> {
        self.send(Method::POST, &self.url(path), &self.auth, Some(body))
            .await
    }

    /// POST a serializable value to a path.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, CliError> {
        self.post(path, serde_json::to_vec(body)?).await
    }

    /// PATCH a serializable value to a path.
    pub async fn patch_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, CliError> {
        let body = serde_json::to_vec(body)?;
        self.send(Method::PATCH, &self.url(path), &self.auth, Some(body))
            .await
    }

    /// PUT to a path with an optional body.
    pub async fn put(&self, path: &str, body: Option<Vec<u8>>) -> Result<ApiResponse, CliError> {
        self.send(Method::PUT, &self.url(path), &self.auth, body).await
    }

    /// Send a request to an absolute URL with an explicit authorization value.
    ///
    /// An empty `auth` omits the header. Transport failures map to
    /// [`CliError::Unreachable`].
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        auth: &str,
        body: Option<Vec<u8>>,
    ) -> Result<ApiResponse, CliError> {
        let curl = curl_command(&method, url, auth, body.as_deref());
        self.dispatch(method, url, auth, body, curl).await
    }

    /// Like [`ApiClient::send`], but the logged curl line shows
    /// `-d '***'` instead of the body. Used for credentials.
    pub async fn send_redacted(
        &self,
        method: Method,
        url: &str,
        auth: &str,
        body: Vec<u8>,
    ) -> Result<ApiResponse, CliError> {
        let curl = curl_command(&method, url, auth, Some(REDACTED.as_bytes()));
        self.dispatch(method, url, auth, Some(body), curl).await
    }

    async fn dispatch(
        &self,
        method: Method,
        url: &str,
        auth: &str,
        body: Option<Vec<u8>>,
        curl: String,
    ) -> Result<ApiResponse, CliError> {
        info!(target: "cectl::curl", "{curl}");

        let url = Url::parse(url)?;
        let mut request = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if !auth.is_empty() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(CliError::Unreachable)?;
        let status = response.status();
        let body = response.bytes().await.map_err(CliError::Unreachable)?.to_vec();
        if status != StatusCode::OK {
            warn!("HTTP Error: {status}");
        }
        Ok(ApiResponse { status, body, curl })
    }

    /// Resolve an element id or key to an element id.
    ///
    /// Integers are used as-is; anything else is looked up in `/elements`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ElementKeyNotFound`] when no element has the key.
    pub async fn element_id(&self, id_or_key: &str) -> Result<String, CliError> {
        if id_or_key.parse::<i64>().is_ok() {
            return Ok(id_or_key.to_string());
        }
        let elements: Vec<Element> = self.get("/elements").await?.ensure_ok()?.json()?;
        elements
            .iter()
            .find(|e| e.key == id_or_key)
            .map(|e| e.id.to_string())
            .ok_or_else(|| CliError::ElementKeyNotFound(id_or_key.to_string()))
    }
}

const REDACTED: &str = "***";

/// Render a request as a curl command line.
pub fn curl_command(method: &Method, url: &str, auth: &str, body: Option<&[u8]>) -> String {
    let mut parts = vec!["curl".to_string(), "-X".to_string(), shell_quote(method.as_str())];
    if let Some(body) = body {
        parts.push("-d".into());
        parts.push(shell_quote(&String::from_utf8_lossy(body)));
    }
    parts.push("-H".into());
    parts.push(shell_quote("Accept: application/json"));
    if !auth.is_empty() {
        parts.push("-H".into());
        parts.push(shell_quote(&format!("Authorization: {auth}")));
    }
    parts.push("-H".into());
    parts.push(shell_quote("Content-Type: application/json"));
    parts.push(shell_quote(url));
    parts.join(" ")
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Parse an id argument that must be an integer.
///
/// # Errors
///
/// Returns [`CliError::InvalidArgument`] with `message` if it is not.
pub fn require_int(value: &str, message: &str) -> Result<i64, CliError> {
    value.parse::<i64>().map_err(|_| CliError::invalid(message))
}
