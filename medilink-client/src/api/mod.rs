//! Typed client for the hospital API
//!
//! All business logic and validation live on the server; this client only
//! speaks the documented HTTP contract. Bearer-authenticated calls take the
//! token explicitly so that the session manager stays the single writer of
//! token state.

use medilink_core::{ApiConfig, ErrorContext, MedilinkError, MedilinkResult};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

mod auth;
mod meetings;
mod records;
mod users;

#[cfg(test)]
mod tests;

/// Client for the hospital API server
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: ApiConfig,
}

/// Error body shape the server uses for non-success responses
#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: String,
}

impl ApiClient {
    /// Create a new API client from configuration
    pub fn new(config: ApiConfig) -> MedilinkResult<Self> {
        let client = create_http_client(&config)?;
        Ok(Self { client, config })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Issue a request and deserialize the JSON response body
    async fn request_json<T, B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> MedilinkResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.execute(method, path, token, body).await?;
        response.json::<T>().await.map_err(|e| MedilinkError::Api {
            message: format!("Failed to parse server response: {}", e),
            status: None,
            source: Some(Box::new(e)),
            context: ErrorContext::new("api_client").with_operation(path),
        })
    }

    /// Issue a request and discard the response body
    async fn request_unit<B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> MedilinkResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method, path, token, body).await?;
        Ok(())
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> MedilinkResult<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!(%method, %url, "API request");

        let mut request = self.client.request(method, &url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| MedilinkError::Network {
            message: format!("Request to {} failed: {}", url, e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("api_client").with_operation(path),
        })?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, path).await);
        }

        Ok(response)
    }
}

/// Helper function to create an HTTP client with common configuration
pub(crate) fn create_http_client(config: &ApiConfig) -> MedilinkResult<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();

    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_str(&config.user_agent).map_err(|e| {
            MedilinkError::Config {
                message: format!("Invalid user agent: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            }
        })?,
    );

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .default_headers(headers)
        .build()
        .map_err(|e| MedilinkError::Config {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_client").with_operation("create_client"),
        })?;

    Ok(client)
}

/// Map a non-success HTTP response to an error
///
/// The server's `detail` message is preserved verbatim where available so the
/// user sees exactly what the server said. Auth statuses become Authentication
/// errors, which the session manager treats as session-terminating.
pub(crate) async fn handle_response_error(
    response: reqwest::Response,
    operation: &str,
) -> MedilinkError {
    let status = response.status();

    let message = match response.json::<ErrorDetail>().await {
        Ok(body) => body.detail,
        Err(_) => format!("Server returned HTTP {}", status),
    };

    let context = ErrorContext::new("api_client")
        .with_operation(operation)
        .with_metadata("status", status.as_str());

    match status.as_u16() {
        401 | 403 => MedilinkError::Authentication { message, context },
        404 => MedilinkError::NotFound {
            resource: message,
            context,
        },
        _ => MedilinkError::Api {
            message,
            status: Some(status.as_u16()),
            source: None,
            context,
        },
    }
}
