//! Token refresh against the external identity provider.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::TokenProvider;

/// Exchanges a long-lived refresh token for a short-lived identity token
/// before each request. The identity token is deliberately not cached;
/// the provider decides its lifetime, not this client.
pub struct IdentityProvider {
    client: Client,
    token_url: String,
    refresh_token: String,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
}

impl IdentityProvider {
    pub fn new(
        client: Client,
        token_url: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_url: token_url.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for IdentityProvider {
    #[tracing::instrument(skip(self))]
    async fn fetch_token(&self) -> Result<Option<String>> {
        debug!("Refreshing identity token from {}...", self.token_url);

        let response = self
            .client
            .post(&self.token_url)
            .json(&RefreshRequest {
                grant_type: "refresh_token",
                refresh_token: &self.refresh_token,
            })
            .send()
            .await
            .context("Failed to reach identity provider")?
            .error_for_status()
            .context("Identity provider rejected the token refresh")?;

        let parsed: RefreshResponse = response
            .json()
            .await
            .context("Failed to parse token refresh response")?;

        Ok(Some(parsed.id_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_token_exchanges_refresh_token() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/token")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "grant_type": "refresh_token",
                "refresh_token": "refresh-123",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id_token": "id-456", "expires_in": "3600"}"#)
            .create_async()
            .await;

        let provider = IdentityProvider::new(
            Client::new(),
            format!("{}/token", server.url()),
            "refresh-123",
        );
        let token = provider.fetch_token().await.unwrap();

        mock.assert_async().await;
        assert_eq!(token, Some("id-456".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_token_propagates_rejection() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error": "invalid_grant"}"#)
            .create_async()
            .await;

        let provider = IdentityProvider::new(
            Client::new(),
            format!("{}/token", server.url()),
            "expired",
        );
        let result = provider.fetch_token().await;

        mock.assert_async().await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("token refresh"));
    }

    #[tokio::test]
    async fn test_fetch_token_fails_on_malformed_response() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"unexpected": true}"#)
            .create_async()
            .await;

        let provider = IdentityProvider::new(
            Client::new(),
            format!("{}/token", server.url()),
            "refresh-123",
        );
        let result = provider.fetch_token().await;

        assert!(result.is_err());
    }
}
