//! Authentication endpoints: sign-in, sign-up, verify and refresh

use super::{handle_response_error, ApiClient};
use medilink_core::{ErrorContext, MedilinkError, MedilinkResult, NewUser, TokenResponse, User};
use reqwest::Method;
use tracing::debug;

impl ApiClient {
    /// Exchange credentials for an access token (POST `/token`, form-encoded)
    pub async fn login(&self, username: &str, password: &str) -> MedilinkResult<TokenResponse> {
        let url = self.url("token");
        debug!(%url, username, "login request");

        let response = self
            .client
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|e| MedilinkError::Network {
                message: format!("Request to {} failed: {}", url, e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("api_client").with_operation("login"),
            })?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "login").await);
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| MedilinkError::Api {
                message: format!("Failed to parse token response: {}", e),
                status: None,
                source: Some(Box::new(e)),
                context: ErrorContext::new("api_client").with_operation("login"),
            })
    }

    /// Create a new account (POST `/register`)
    pub async fn register(&self, user: &NewUser) -> MedilinkResult<User> {
        self.request_json(Method::POST, "register", None, Some(user))
            .await
    }

    /// Validate a token with the server (GET `/verify-token/{token}`)
    ///
    /// The server rotates the token on every verify; the response always
    /// carries a full replacement.
    pub async fn verify_token(&self, token: &str) -> MedilinkResult<TokenResponse> {
        let path = format!("verify-token/{}", token);
        self.request_json::<TokenResponse, ()>(Method::GET, &path, Some(token), None)
            .await
    }

    /// Obtain a fresh token before expiry (POST `/refresh-token`)
    pub async fn refresh_token(&self, token: &str) -> MedilinkResult<TokenResponse> {
        self.request_json::<TokenResponse, ()>(Method::POST, "refresh-token", Some(token), None)
            .await
    }
}
