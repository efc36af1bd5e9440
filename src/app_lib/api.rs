//! HTTP helpers for the JSON API with a shared cookie jar, an attachable bearer
//! header and consistent error handling. Feature clients use these helpers so
//! request setup, timeouts and error mapping live in one place. Bodies, tokens
//! and cookies are never logged.

use super::{config::AppConfig, errors::ApiError};
use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode,
    cookie::{CookieStore, Jar},
    multipart::{Form, Part},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};
use tracing::{Instrument, debug, info_span};
use url::Url;

/// Upper bound for the connect phase, independent of the request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Maximum number of error body characters surfaced to callers.
const MAX_ERROR_CHARS: usize = 200;

/// File payload for multipart uploads.
#[derive(Clone, Debug)]
pub struct MultipartFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Response of a call whose success may legitimately carry no body (204).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Exchange<T> {
    Body(T),
    Empty,
}

impl<T> Exchange<T> {
    pub fn into_body(self) -> Option<T> {
        match self {
            Exchange::Body(body) => Some(body),
            Exchange::Empty => None,
        }
    }
}

/// Structured error body returned by the API on failures.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// API client holding the ambient cookie credential and the attached bearer token.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    jar: Arc<Jar>,
    bearer: Arc<RwLock<Option<SecretString>>>,
}

impl ApiClient {
    /// Builds a client from the resolved config and seeds the cookie jar.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());
        if let Some(cookie) = &config.cookie {
            seed_cookies(&jar, &config.api_base_url, cookie.expose_secret());
        }

        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .cookie_provider(Arc::clone(&jar))
            .connect_timeout(CONNECT_TIMEOUT.min(config.timeout))
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            jar,
            bearer: Arc::new(RwLock::new(None)),
        })
    }

    /// Attaches the bearer token to every subsequent request.
    pub fn attach_bearer(&self, token: &SecretString) {
        let mut slot = self.bearer.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(token.clone());
    }

    /// Removes the attached bearer token.
    pub fn detach_bearer(&self) {
        let mut slot = self.bearer.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    #[must_use]
    pub fn has_bearer(&self) -> bool {
        self.bearer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Current cookie header for the API origin, including cookies set by the server.
    #[must_use]
    pub fn cookie_header(&self) -> Option<SecretString> {
        let header = self.jar.cookies(&self.base_url)?;
        let value = header.to_str().ok()?;
        Some(SecretString::from(value.to_string()))
    }

    /// GET a JSON body.
    ///
    /// # Errors
    /// Returns an `ApiError` for transport failures, non-success statuses or bad bodies.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        handle_json_response(response).await
    }

    /// GET a JSON body that may be absent (204 or empty success).
    ///
    /// # Errors
    /// Returns an `ApiError` for transport failures, non-success statuses or bad bodies.
    pub async fn get_optional_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Exchange<T>, ApiError> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        handle_optional_json_response(response).await
    }

    /// GET with an explicit bearer token, independent of the attached one.
    ///
    /// # Errors
    /// Returns an `ApiError` for transport failures, non-success statuses or bad bodies.
    pub async fn get_json_with_bearer<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SecretString,
    ) -> Result<T, ApiError> {
        let builder = self
            .unauthenticated(Method::GET, path)
            .bearer_auth(token.expose_secret());
        let response = self.send(builder, path).await?;
        handle_json_response(response).await
    }

    /// GET with an explicit bearer token where the success body may be absent.
    ///
    /// # Errors
    /// Returns an `ApiError` for transport failures, non-success statuses or bad bodies.
    pub async fn get_optional_json_with_bearer<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SecretString,
    ) -> Result<Exchange<T>, ApiError> {
        let builder = self
            .unauthenticated(Method::GET, path)
            .bearer_auth(token.expose_secret());
        let response = self.send(builder, path).await?;
        handle_optional_json_response(response).await
    }

    /// POST a JSON body and parse a JSON response.
    ///
    /// # Errors
    /// Returns an `ApiError` for encoding, transport, status or decoding failures.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path).json(body);
        let response = self.send(builder, path).await?;
        handle_json_response(response).await
    }

    /// POST without a body and parse a JSON response.
    ///
    /// # Errors
    /// Returns an `ApiError` for transport, status or decoding failures.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::POST, path), path).await?;
        handle_json_response(response).await
    }

    /// PATCH a JSON body and parse a JSON response.
    ///
    /// # Errors
    /// Returns an `ApiError` for encoding, transport, status or decoding failures.
    pub async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::PATCH, path).json(body);
        let response = self.send(builder, path).await?;
        handle_json_response(response).await
    }

    /// PATCH without a body and parse a JSON response.
    ///
    /// # Errors
    /// Returns an `ApiError` for transport, status or decoding failures.
    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::PATCH, path), path).await?;
        handle_json_response(response).await
    }

    /// PATCH a multipart form with a single file field.
    ///
    /// # Errors
    /// Returns an `ApiError` for an invalid content type, transport, status or decoding failures.
    pub async fn patch_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        file: MultipartFile,
    ) -> Result<T, ApiError> {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|err| ApiError::Serialization(format!("Invalid content type: {err}")))?;
        let form = Form::new().part(field.to_string(), part);

        let builder = self.request(Method::PATCH, path).multipart(form);
        let response = self.send(builder, path).await?;
        handle_json_response(response).await
    }

    /// DELETE and parse a JSON response.
    ///
    /// # Errors
    /// Returns an `ApiError` for transport, status or decoding failures.
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::DELETE, path), path).await?;
        handle_json_response(response).await
    }

    /// Starts a request against the API base and attaches the bearer token if present.
    fn unauthenticated(&self, method: Method, path: &str) -> RequestBuilder {
        let url = build_url_with_base(self.base_url.as_str(), path);
        self.client.request(method, url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.unauthenticated(method, path);

        let bearer = self
            .bearer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match bearer {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<Response, ApiError> {
        let request = builder
            .build()
            .map_err(|err| ApiError::Serialization(format!("Failed to build request: {err}")))?;

        let span = info_span!(
            "api.request",
            http.method = %request.method(),
            path = %path
        );

        let response = self
            .client
            .execute(request)
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        debug!(path, status = response.status().as_u16(), "api response");
        Ok(response)
    }
}

/// Adds each `name=value` pair from a cookie header string to the jar.
fn seed_cookies(jar: &Jar, url: &Url, header: &str) {
    for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        jar.add_cookie_str(pair, url);
    }
}

/// Percent-encodes one path segment, including `/`, `?` and `%`.
#[must_use]
pub fn path_segment(value: &str) -> String {
    let Ok(mut url) = Url::parse("http://segment.invalid/") else {
        return String::new();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(value);
    }
    url.path().trim_start_matches('/').to_string()
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Maps transport errors into `ApiError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(http_error(response).await);
    }

    let body = read_body(response).await?;
    decode_body(&body)
}

/// Parses optional JSON responses and treats 204 or an empty body as `Exchange::Empty`.
async fn handle_optional_json_response<T: DeserializeOwned>(
    response: Response,
) -> Result<Exchange<T>, ApiError> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(Exchange::Empty);
    }
    if !status.is_success() {
        return Err(http_error(response).await);
    }

    let body = read_body(response).await?;
    if body.trim().is_empty() {
        return Ok(Exchange::Empty);
    }
    decode_body(&body).map(Exchange::Body)
}

async fn read_body(response: Response) -> Result<String, ApiError> {
    response
        .text()
        .await
        .map_err(|err| ApiError::Network(format!("Failed to read response: {err}")))
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body)
        .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
}

async fn http_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    error_from_body(status, &body)
}

/// Builds an `Http` error, keeping the message only when the body is structured.
fn error_from_body(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => ApiError::Http {
            status,
            message: parsed
                .error
                .or(parsed.message)
                .and_then(|message| sanitize_message(&message)),
            code: parsed.code,
        },
        Err(_) => ApiError::Http {
            status,
            message: None,
            code: None,
        },
    }
}

/// Trims and truncates server messages for user-facing notices.
fn sanitize_message(message: &str) -> Option<String> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(MAX_ERROR_CHARS).collect())
    }
}
