use std::fmt;
use std::io::Read;

use flate2::read::GzDecoder;
use reqwest::{header, Method};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::{
    error::{ErrorKind, ResponseError, ValidationError},
    CloudflareError, Credentials, Query, Result,
};

/// Default API base every resource path is joined onto.
pub const API_BASE_URL: &str = "https://api.cloudflare.com/client/v4/";

#[derive(Clone)]
/// HTTP client for the Cloudflare v4 REST API.
///
/// The client is immutable after construction and cheap to clone, so one
/// instance can be shared across concurrent tasks without locking. Each
/// call performs exactly one network attempt; retries and timeouts are
/// the caller's and the transport's concern respectively.
pub struct CloudflareClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl fmt::Debug for CloudflareClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudflareClient")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl CloudflareClient {
    /// Creates a client against the production API endpoint.
    ///
    /// Fails with [`CloudflareError::MissingConfiguration`] when the
    /// credentials carry blank values.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_base_url(credentials, API_BASE_URL)
    }

    /// Creates a client against a non-default API base.
    ///
    /// Mostly useful for pointing the client at a local mock server in
    /// tests. A missing trailing slash is added so that relative paths
    /// join below the base rather than replacing its last segment.
    pub fn with_base_url(credentials: Credentials, base_url: impl AsRef<str>) -> Result<Self> {
        credentials.validate()?;
        let mut base = base_url.as_ref().trim().to_owned();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|err| {
            CloudflareError::MissingConfiguration(format!("invalid base URL '{base}': {err}"))
        })?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            credentials,
        })
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `CLOUDFLARE_API_TOKEN` first; when it is unset or empty,
    /// falls back to `CLOUDFLARE_API_KEY` + `CLOUDFLARE_EMAIL`.
    ///
    /// **Not available on `wasm32` targets** — environment variables do
    /// not exist in browser runtimes. Use [`CloudflareClient::new`] with
    /// explicit [`Credentials`] there.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        if let Ok(token) = std::env::var("CLOUDFLARE_API_TOKEN") {
            if !token.trim().is_empty() {
                return Self::new(Credentials::token(token));
            }
        }
        let key = std::env::var("CLOUDFLARE_API_KEY").map_err(|_| {
            CloudflareError::MissingConfiguration(
                "missing CLOUDFLARE_API_TOKEN or CLOUDFLARE_API_KEY environment variable"
                    .to_owned(),
            )
        })?;
        let email = std::env::var("CLOUDFLARE_EMAIL").map_err(|_| {
            CloudflareError::MissingConfiguration(
                "missing CLOUDFLARE_EMAIL environment variable".to_owned(),
            )
        })?;
        Self::new(Credentials::key_email(key, email))
    }

    /// Issues a GET request and decodes the JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: impl Into<Query>,
    ) -> Result<T> {
        let text = self.send(Method::GET, path, query.into(), None).await?;
        decode_json(&text)
    }

    /// Issues a GET request and returns the response body as text.
    ///
    /// Log retrieval endpoints return newline-delimited JSON or plain
    /// text rather than the standard envelope, optionally
    /// gzip-compressed; the body is decompressed before being returned.
    pub async fn get_raw(&self, path: &str, query: impl Into<Query>) -> Result<String> {
        self.send(Method::GET, path, query.into(), None).await
    }

    /// Issues a POST request with a mandatory JSON body.
    ///
    /// Fails fast, without any network call, when the body serializes to
    /// null or an empty object/array: every POST endpoint of the v4 API
    /// requires a payload.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        query: impl Into<Query>,
        body: &B,
    ) -> Result<T> {
        let body = encode_body(body)?;
        if body_is_empty(&body) {
            return Err(ValidationError::MissingArgument {
                field: "body".to_owned(),
            }
            .into());
        }
        let text = self.send(Method::POST, path, query.into(), Some(body)).await?;
        decode_json(&text)
    }

    /// Issues a PUT request with an optional JSON body.
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        query: impl Into<Query>,
        body: Option<&B>,
    ) -> Result<T> {
        let body = body.map(encode_body).transpose()?;
        let text = self.send(Method::PUT, path, query.into(), body).await?;
        decode_json(&text)
    }

    /// Issues a PATCH request with an optional JSON body.
    ///
    /// 202 Accepted is a documented success for PATCH endpoints and falls
    /// through to decoding like 200.
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        query: impl Into<Query>,
        body: Option<&B>,
    ) -> Result<T> {
        let body = body.map(encode_body).transpose()?;
        let text = self.send(Method::PATCH, path, query.into(), body).await?;
        decode_json(&text)
    }

    /// Issues a DELETE request with an optional JSON body.
    pub async fn delete<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        query: impl Into<Query>,
        body: Option<&B>,
    ) -> Result<T> {
        let body = body.map(encode_body).transpose()?;
        let text = self.send(Method::DELETE, path, query.into(), body).await?;
        decode_json(&text)
    }

    /// Single-attempt send path shared by every verb.
    ///
    /// Returns the decompressed body text on any status below 400 and the
    /// mapped [`ResponseError`] otherwise. Transport failures pass
    /// through unwrapped.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: Query,
        body: Option<serde_json::Value>,
    ) -> Result<String> {
        let url = self.request_url(path, &query)?;
        let uri = request_uri(&url);

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(header::CONTENT_TYPE, "application/json");
        for (name, value) in self.credentials.headers() {
            request = request.header(name, value);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(%method, %url, "sending request");

        let response = request.send().await.map_err(CloudflareError::Transport)?;
        let status = response.status().as_u16();
        let gzipped = response
            .headers()
            .get(header::CONTENT_ENCODING)
            .is_some_and(|value| value.as_bytes().eq_ignore_ascii_case(b"gzip"));
        let bytes = response.bytes().await.map_err(CloudflareError::Transport)?;
        let text = decode_body_text(&bytes, gzipped)?;

        if status >= 400 {
            return Err(ResponseError {
                kind: ErrorKind::from_status(status),
                status,
                method,
                uri,
                url: url.into(),
                body: text,
            }
            .into());
        }
        Ok(text)
    }

    fn request_url(&self, path: &str, query: &Query) -> Result<Url> {
        let relative = path.trim_start_matches('/');
        let mut url = self.base_url.join(relative).map_err(|err| {
            CloudflareError::Decode(format!("invalid request path '{path}': {err}"))
        })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query.pairs() {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }
}

/// Path plus query string, without scheme and host.
fn request_uri(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_owned(),
    }
}

fn encode_body<B: Serialize>(body: &B) -> Result<serde_json::Value> {
    serde_json::to_value(body)
        .map_err(|err| CloudflareError::Decode(format!("invalid request body: {err}")))
}

fn body_is_empty(body: &serde_json::Value) -> bool {
    match body {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn decode_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text)
        .map_err(|err| CloudflareError::Decode(format!("invalid response JSON: {err}; body: {text}")))
}

/// Decompresses the body when the response still carried
/// `Content-Encoding: gzip`.
///
/// With the transport's gzip support enabled the header is consumed
/// before we see it; this path covers transports that hand the raw bytes
/// through, which log endpoints rely on.
fn decode_body_text(bytes: &[u8], gzipped: bool) -> Result<String> {
    if gzipped {
        let mut decoder = GzDecoder::new(bytes);
        let mut text = String::new();
        decoder
            .read_to_string(&mut text)
            .map_err(|err| CloudflareError::Decode(format!("invalid gzip response body: {err}")))?;
        Ok(text)
    } else {
        String::from_utf8(bytes.to_vec())
            .map_err(|err| CloudflareError::Decode(format!("invalid utf-8 response body: {err}")))
    }
}
