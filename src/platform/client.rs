//! HTTP client for the platform API.
//!
//! All calls are one request per controller invocation with no retries;
//! a failed call surfaces directly as an error response. The API
//! authenticates with a bearer token issued to this front-end.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{Instrument, info_span};
use url::Url;
use uuid::Uuid;

use super::models::{Invite, NewCredential, Service, Template, User, WebAuthnCredential};

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("record not found")]
    NotFound,
    #[error("forbidden")]
    Forbidden,
    #[error("platform API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("platform API returned {status}: {body}")]
    Unexpected { status: StatusCode, body: String },
    #[error("invalid platform API URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Remote service client used by the controllers.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    async fn get_user(&self, user_id: Uuid) -> Result<User, PlatformError>;

    async fn get_service(&self, service_id: Uuid) -> Result<Service, PlatformError>;

    async fn get_template(
        &self,
        service_id: Uuid,
        template_id: Uuid,
    ) -> Result<Template, PlatformError>;

    async fn get_credentials_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WebAuthnCredential>, PlatformError>;

    async fn create_credential_for_user(
        &self,
        user_id: Uuid,
        credential: &NewCredential,
    ) -> Result<(), PlatformError>;

    async fn create_invite(
        &self,
        from_user: Uuid,
        service_id: Uuid,
        email_address: &str,
        permissions: &[String],
    ) -> Result<Invite, PlatformError>;

    async fn record_event(&self, kind: &str, payload: Value) -> Result<(), PlatformError>;

    async fn status(&self) -> Result<(), PlatformError>;
}

pub struct HttpPlatformApi {
    base_url: String,
    token: SecretString,
    client: Client,
}

impl HttpPlatformApi {
    /// # Errors
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, token: SecretString) -> Result<Self, PlatformError> {
        // Parse once to fail fast on a bad endpoint.
        let parsed = Url::parse(base_url)?;
        let client = Client::builder().user_agent(crate::APP_USER_AGENT).build()?;
        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, PlatformError> {
        let url = self.endpoint(path);
        let span = info_span!(
            "platform.request",
            http.method = "GET",
            url = %url
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .instrument(span)
            .await?;
        Self::read(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, PlatformError> {
        let url = self.endpoint(path);
        let span = info_span!(
            "platform.request",
            http.method = "POST",
            url = %url
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.token.expose_secret())
            .json(body)
            .send()
            .instrument(span)
            .await?;
        Self::read(response).await
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, PlatformError> {
        match response.status() {
            StatusCode::NOT_FOUND => Err(PlatformError::NotFound),
            StatusCode::FORBIDDEN => Err(PlatformError::Forbidden),
            status if status.is_success() => Ok(response.json().await?),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(PlatformError::Unexpected { status, body })
            }
        }
    }
}

#[async_trait]
impl PlatformApi for HttpPlatformApi {
    async fn get_user(&self, user_id: Uuid) -> Result<User, PlatformError> {
        self.get_json(&format!("user/{user_id}")).await
    }

    async fn get_service(&self, service_id: Uuid) -> Result<Service, PlatformError> {
        self.get_json(&format!("service/{service_id}")).await
    }

    async fn get_template(
        &self,
        service_id: Uuid,
        template_id: Uuid,
    ) -> Result<Template, PlatformError> {
        self.get_json(&format!("service/{service_id}/template/{template_id}"))
            .await
    }

    async fn get_credentials_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WebAuthnCredential>, PlatformError> {
        self.get_json(&format!("user/{user_id}/webauthn")).await
    }

    async fn create_credential_for_user(
        &self,
        user_id: Uuid,
        credential: &NewCredential,
    ) -> Result<(), PlatformError> {
        let body = serde_json::to_value(credential).unwrap_or_default();
        self.post_json::<Value>(&format!("user/{user_id}/webauthn"), &body)
            .await?;
        Ok(())
    }

    async fn create_invite(
        &self,
        from_user: Uuid,
        service_id: Uuid,
        email_address: &str,
        permissions: &[String],
    ) -> Result<Invite, PlatformError> {
        let body = json!({
            "from_user": from_user,
            "email_address": email_address,
            "permissions": permissions,
        });
        self.post_json(&format!("service/{service_id}/invite"), &body)
            .await
    }

    async fn record_event(&self, kind: &str, payload: Value) -> Result<(), PlatformError> {
        let body = json!({
            "event_type": kind,
            "data": payload,
        });
        self.post_json::<Value>("events", &body).await?;
        Ok(())
    }

    async fn status(&self) -> Result<(), PlatformError> {
        self.get_json::<Value>("_status").await?;
        Ok(())
    }
}
