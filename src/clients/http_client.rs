//! Authenticated HTTP transport for the Keycloak admin API.
//!
//! This module provides the [`HttpClient`] type, which attaches the bearer
//! token and fixed JSON headers to every request and exposes one method per
//! verb the resource layer needs: [`fetch`](HttpClient::fetch),
//! [`create`](HttpClient::create), [`replace`](HttpClient::replace) and
//! [`remove`](HttpClient::remove).

use std::collections::HashMap;

use crate::auth::AuthContext;
use crate::clients::errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
use crate::clients::http_request::{DataType, HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::AdminConfig;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for the admin API.
///
/// The client handles:
/// - URL construction from the configured server URL
/// - Default headers (`User-Agent`, `Accept`, `Content-Type`)
/// - The `Authorization: Bearer <token>` header, read from the shared
///   [`AuthContext`] when each request is built
/// - Mapping non-2xx responses to [`HttpResponseError`]
///
/// Each call performs exactly one round trip. There is no retry and no
/// response caching.
///
/// # Thread Safety
///
/// `HttpClient` is `Clone + Send + Sync`; clones share the connection pool
/// and the token.
///
/// # Example
///
/// ```rust,ignore
/// use keycloak_admin::auth::AuthContext;
/// use keycloak_admin::clients::HttpClient;
/// use keycloak_admin::{AdminConfig, BearerToken, ServerUrl};
///
/// let config = AdminConfig::builder()
///     .server_url(ServerUrl::new("https://sso.example.com")?)
///     .build()?;
/// let auth = AuthContext::new();
/// auth.set_token(BearerToken::new("eyJ...")?);
///
/// let client = HttpClient::new(&config, auth)?;
/// let users = client.fetch("/auth/admin/realms/master/users", None).await?;
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URI (e.g., `https://sso.example.com`).
    base_uri: String,
    /// Shared bearer token.
    auth: AuthContext,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g. TLS initialization failure).
    pub fn new(config: &AdminConfig, auth: AuthContext) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}Keycloak Admin Rust v{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            "Content-Type".to_string(),
            DataType::Json.as_content_type().to_string(),
        );

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            base_uri: config.server_url().as_ref().to_string(),
            auth,
            default_headers,
        })
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the default headers for this client (without `Authorization`).
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the shared authentication context.
    #[must_use]
    pub const fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Returns the full URL for an absolute API path.
    #[must_use]
    pub fn full_url(&self, path: &str) -> String {
        format!("{}{}", self.base_uri, path)
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn fetch(
        &self,
        path: &str,
        query: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, HttpError> {
        let mut builder = HttpRequest::builder(HttpMethod::Get, path);
        if let Some(query) = query {
            builder = builder.query(query);
        }
        self.request(builder.build()?).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn create(
        &self,
        path: &str,
        payload: serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Post, path)
            .body(payload)
            .body_type(DataType::Json)
            .build()?;
        self.request(request).await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn replace(
        &self,
        path: &str,
        payload: serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Put, path)
            .body(payload)
            .body_type(DataType::Json)
            .build()?;
        self.request(request).await
    }

    /// Sends a DELETE request without a body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn remove(&self, path: &str) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Delete, path).build()?;
        self.request(request).await
    }

    /// Sends a DELETE request carrying a JSON body.
    ///
    /// Some admin endpoints (role mapping removal) take the entities to
    /// unlink in the body of a DELETE.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn remove_with_body(
        &self,
        path: &str,
        payload: serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Delete, path)
            .body(payload)
            .body_type(DataType::Json)
            .build()?;
        self.request(request).await
    }

    /// Sends an HTTP request to the admin API.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails, or no token is set (`InvalidRequest`)
    /// - A network error occurs (`Network`)
    /// - A non-2xx response is received (`Response`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        // Token is read here, per request, never cached on the client
        let authorization = self
            .auth
            .authorization()
            .ok_or(InvalidHttpRequestError::MissingToken)?;

        let url = self.full_url(&request.path);

        let mut headers = self.default_headers.clone();
        headers.insert("Authorization".to_string(), authorization);
        if let Some(body_type) = &request.body_type {
            headers.insert(
                "Content-Type".to_string(),
                body_type.as_content_type().to_string(),
            );
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        tracing::debug!(method = %request.http_method, url = %url, "Sending admin API request");

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        if !(200..=299).contains(&code) {
            return Err(HttpError::Response(HttpResponseError {
                code,
                body: body_text,
            }));
        }

        let body = if body_text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body_text).unwrap_or(serde_json::Value::String(body_text))
        };

        Ok(HttpResponse::new(code, res_headers, body))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
