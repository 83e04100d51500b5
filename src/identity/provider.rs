//! Identity service client. The dashboard never verifies credentials itself;
//! everything goes through the external identity/profile HTTP service.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use crate::error::{AuthError, AuthResult};
use crate::tprintln;

use super::user::{ProfileUpdate, TokenResponse, User, UserProfile};

/// Boundary seam for the identity service. The HTTP implementation below is
/// the production path; tests substitute their own.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn register(&self, email: &str, password: &str, role: &str) -> AuthResult<()>;
    async fn login(&self, email: &str, password: &str) -> AuthResult<TokenResponse>;
    async fn current_user(&self, token: &str) -> AuthResult<User>;
    async fn fetch_profile(&self, token: &str) -> AuthResult<UserProfile>;
    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> AuthResult<UserProfile>;
    /// Liveness probe against the service's health endpoint.
    async fn probe(&self) -> AuthResult<()>;
}

#[derive(Clone)]
pub struct HttpIdentityService {
    base: Url,
    client: reqwest::Client,
}

impl HttpIdentityService {
    pub fn new(base: &str) -> AuthResult<Self> {
        let base = Url::parse(base)
            .map_err(|e| AuthError::service("bad_base_url".to_string(), format!("invalid identity service URL '{}': {}", base, e)))?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn join(&self, path: &str) -> AuthResult<Url> {
        self.base
            .join(path)
            .map_err(|e| AuthError::service("bad_url".to_string(), format!("cannot build URL for '{}': {}", path, e)))
    }

    /// Pull the service's `{"detail": ...}` message out of an error body,
    /// falling back to the HTTP status line.
    async fn detail_from(resp: reqwest::Response) -> String {
        let status = resp.status();
        let body: serde_json::Value = resp.json().await.unwrap_or(serde_json::json!({}));
        body.get("detail")
            .and_then(|d| d.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("HTTP {}", status))
    }

    async fn decode<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> AuthResult<T> {
        resp.json::<T>()
            .await
            .map_err(|e| AuthError::service("bad_response".to_string(), format!("undecodable identity service response: {}", e)))
    }
}

#[async_trait]
impl IdentityService for HttpIdentityService {
    async fn register(&self, email: &str, password: &str, role: &str) -> AuthResult<()> {
        let url = self.join("/auth/register")?;
        let resp = self
            .client
            .post(url)
            .json(&serde_json::json!({"email": email, "password": password, "role": role}))
            .send()
            .await?;
        if !resp.status().is_success() {
            let detail = Self::detail_from(resp).await;
            return Err(AuthError::authentication("registration_rejected".to_string(), detail));
        }
        tprintln!("identity.register email={} role={}", email, role);
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> AuthResult<TokenResponse> {
        let url = self.join("/auth/login")?;
        let resp = self
            .client
            .post(url)
            .json(&serde_json::json!({"email": email, "password": password}))
            .send()
            .await?;
        if !resp.status().is_success() {
            let detail = Self::detail_from(resp).await;
            return Err(AuthError::authentication("invalid_credentials".to_string(), detail));
        }
        let token: TokenResponse = Self::decode(resp).await?;
        tprintln!("identity.login email={}", email);
        Ok(token)
    }

    async fn current_user(&self, token: &str) -> AuthResult<User> {
        let url = self.join("/auth/me")?;
        let resp = self.client.get(url).bearer_auth(token).send().await?;
        if !resp.status().is_success() {
            let detail = Self::detail_from(resp).await;
            return Err(AuthError::stale_token("token_rejected".to_string(), detail));
        }
        Self::decode(resp).await
    }

    async fn fetch_profile(&self, token: &str) -> AuthResult<UserProfile> {
        let url = self.join("/users/profile")?;
        let resp = self.client.get(url).bearer_auth(token).send().await?;
        match resp.status() {
            s if s.is_success() => Self::decode(resp).await,
            StatusCode::UNAUTHORIZED => {
                let detail = Self::detail_from(resp).await;
                Err(AuthError::stale_token("token_rejected".to_string(), detail))
            }
            _ => {
                let detail = Self::detail_from(resp).await;
                Err(AuthError::service("profile_fetch_failed".to_string(), detail))
            }
        }
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> AuthResult<UserProfile> {
        let url = self.join("/users/profile")?;
        let resp = self.client.put(url).bearer_auth(token).json(update).send().await?;
        match resp.status() {
            s if s.is_success() => Self::decode(resp).await,
            StatusCode::UNAUTHORIZED => {
                let detail = Self::detail_from(resp).await;
                Err(AuthError::stale_token("token_rejected".to_string(), detail))
            }
            _ => {
                let detail = Self::detail_from(resp).await;
                Err(AuthError::service("profile_update_failed".to_string(), detail))
            }
        }
    }

    async fn probe(&self) -> AuthResult<()> {
        let url = self.join("/health")?;
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(AuthError::service("unhealthy".to_string(), format!("HTTP {}", resp.status())));
        }
        Ok(())
    }
}
