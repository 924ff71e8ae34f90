//! Identity-token acquisition for platform API requests.
//!
//! The request client takes a [`TokenProvider`] as an explicit dependency
//! and asks it for a fresh token before every call. Tokens are never cached
//! or persisted by this crate.

mod identity;

use anyhow::Result;
use async_trait::async_trait;

pub use identity::IdentityProvider;

/// Source of the caller's bearer token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns the current identity token, or `None` when no user is
    /// signed in (the request then proceeds without an Authorization
    /// header). Failures propagate to the caller as a failed request.
    async fn fetch_token(&self) -> Result<Option<String>>;
}

/// Fixed token, for scripted use and tests.
pub struct StaticToken(pub String);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn fetch_token(&self) -> Result<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}

/// Signed-out provider: every request goes out unauthenticated.
pub struct Anonymous;

#[async_trait]
impl TokenProvider for Anonymous {
    async fn fetch_token(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Reads the token from an environment variable on every call, so a token
/// rotated mid-process is picked up by the next request.
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl TokenProvider for EnvToken {
    async fn fetch_token(&self) -> Result<Option<String>> {
        match std::env::var(&self.var) {
            Ok(token) if !token.is_empty() => Ok(Some(token)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[tokio::test]
    async fn test_static_token() {
        let provider = StaticToken("abc".to_string());
        assert_eq!(provider.fetch_token().await.unwrap(), Some("abc".to_string()));
    }

    #[tokio::test]
    async fn test_anonymous_yields_no_token() {
        assert_eq!(Anonymous.fetch_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_env_token_reads_fresh_value_each_call() {
        let var = "FREIGHTDESK_TEST_TOKEN_FRESH";
        let provider = EnvToken::new(var);

        unsafe {
            env::set_var(var, "first");
        }
        assert_eq!(provider.fetch_token().await.unwrap(), Some("first".to_string()));

        unsafe {
            env::set_var(var, "second");
        }
        assert_eq!(
            provider.fetch_token().await.unwrap(),
            Some("second".to_string())
        );

        unsafe {
            env::remove_var(var);
        }
        assert_eq!(provider.fetch_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_env_token_treats_empty_as_absent() {
        let var = "FREIGHTDESK_TEST_TOKEN_EMPTY";
        unsafe {
            env::set_var(var, "");
        }
        let provider = EnvToken::new(var);
        assert_eq!(provider.fetch_token().await.unwrap(), None);
        unsafe {
            env::remove_var(var);
        }
    }
}
