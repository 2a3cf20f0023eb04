//! `reqwest` implementation of [`SchedulingBackend`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};

use super::{AuthGrant, BackendError, BackendResult, LoginCredentials, SchedulingBackend};
use crate::domain::{
    Credential, GenerationRequest, ShareToken, SharedSchedule, StaffMember, TenantId, Venue,
    VenueId, VenueSchedule,
};

/// HTTP client for the scheduling API rooted at a base URL.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

#[derive(Serialize)]
struct PasswordResetRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct PasswordResetConfirm<'a> {
    token: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct ShareTokenResponse {
    token: ShareToken,
}

impl HttpBackend {
    /// Builds a client for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the TLS backend cannot be
    /// initialised.
    pub fn new(base_url: Url, timeout: Duration) -> BackendResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Base URL all endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> BackendResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::Upstream {
                status: 0,
                message: format!("base url {} cannot take a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T>(&self, credential: &Credential, segments: &[&str]) -> BackendResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = self.endpoint(segments)?;
        tracing::debug!(path = url.path(), "backend GET");
        let response = self
            .client
            .get(url)
            .bearer_auth(credential.expose())
            .header("Accept", "application/json")
            .send()
            .await?;
        Ok(ensure_success(response).await?.json::<T>().await?)
    }

    async fn post_json<B, T>(
        &self,
        credential: &Credential,
        segments: &[&str],
        body: &B,
    ) -> BackendResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let url = self.endpoint(segments)?;
        tracing::debug!(path = url.path(), "backend POST");
        let response = self
            .client
            .post(url)
            .bearer_auth(credential.expose())
            .json(body)
            .send()
            .await?;
        Ok(ensure_success(response).await?.json::<T>().await?)
    }
}

/// Maps non-success responses onto [`BackendError`].
async fn ensure_success(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(BackendError::Unauthorized),
        StatusCode::NOT_FOUND => Err(BackendError::NotFound(response.url().path().to_string())),
        _ => {
            let message = response
                .text()
                .await
                .ok()
                .filter(|body| !body.is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            Err(BackendError::Upstream {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl SchedulingBackend for HttpBackend {
    async fn authenticate(&self, credentials: &LoginCredentials) -> BackendResult<AuthGrant> {
        let url = self.endpoint(&["auth", "login"])?;
        let response = self.client.post(url).json(credentials).send().await?;
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(BackendError::InvalidCredentials);
        }
        Ok(ensure_success(response).await?.json::<AuthGrant>().await?)
    }

    async fn request_password_reset(&self, email: &str) -> BackendResult<()> {
        let url = self.endpoint(&["auth", "password-reset"])?;
        let response = self
            .client
            .post(url)
            .json(&PasswordResetRequest { email })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn reset_password(&self, reset_token: &str, new_password: &str) -> BackendResult<()> {
        let url = self.endpoint(&["auth", "password-reset", "confirm"])?;
        let response = self
            .client
            .post(url)
            .json(&PasswordResetConfirm {
                token: reset_token,
                password: new_password,
            })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn list_venues(
        &self,
        credential: &Credential,
        tenant: &TenantId,
    ) -> BackendResult<Vec<Venue>> {
        self.get_json(credential, &["tenants", tenant.as_str(), "venues"])
            .await
    }

    async fn list_staff(
        &self,
        credential: &Credential,
        venue: &VenueId,
    ) -> BackendResult<Vec<StaffMember>> {
        self.get_json(credential, &["venues", venue.as_str(), "staff"])
            .await
    }

    async fn venue_schedule(
        &self,
        credential: &Credential,
        venue: &VenueId,
    ) -> BackendResult<VenueSchedule> {
        self.get_json(credential, &["venues", venue.as_str(), "schedule"])
            .await
    }

    async fn generate_schedule(
        &self,
        credential: &Credential,
        venue: &VenueId,
        request: &GenerationRequest,
    ) -> BackendResult<VenueSchedule> {
        self.post_json(
            credential,
            &["venues", venue.as_str(), "schedule", "generate"],
            request,
        )
        .await
    }

    async fn create_share_token(
        &self,
        credential: &Credential,
        venue: &VenueId,
        staff_id: &str,
    ) -> BackendResult<ShareToken> {
        let created: ShareTokenResponse = self
            .post_json(
                credential,
                &["venues", venue.as_str(), "staff", staff_id, "share-tokens"],
                &serde_json::json!({}),
            )
            .await?;
        Ok(created.token)
    }

    async fn shared_schedule(&self, token: &ShareToken) -> BackendResult<SharedSchedule> {
        let url = self.endpoint(&["share", token.as_str(), "schedule"])?;
        tracing::debug!(token = %token.redacted(), "backend GET shared schedule");
        // No bearer: the token in the path is the only credential.
        let response = self.client.get(url).send().await?;
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND | StatusCode::GONE
        ) {
            return Err(BackendError::TokenRejected);
        }
        Ok(ensure_success(response)
            .await?
            .json::<SharedSchedule>()
            .await?)
    }
}
