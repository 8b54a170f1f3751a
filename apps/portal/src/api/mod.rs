//! Portal API: the single point of entry for all backend calls.
//!
//! Views and the upload workflow hold an `Arc<dyn PortalApi>` and never build
//! requests themselves. Every response goes through `ParsedResponse::read`,
//! so each body is read exactly once.
//!
//! No retries: every failure is terminal for the action that triggered it.
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

pub mod response;
#[cfg(test)]
pub mod testing;

use crate::config::Config;
use crate::errors::PortalError;
use crate::models::opening::{Opening, OpeningsPage};
use crate::models::profile::{normalize_batch, Profile, ProfileRef};
use crate::models::staged::StagedFile;
use response::ParsedResponse;

/// Which endpoint a batch of uploaded files is persisted through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveIntent {
    Draft,
    Final,
}

impl SaveIntent {
    pub fn endpoint(self) -> &'static str {
        match self {
            SaveIntent::Draft => "uploadasdraft",
            SaveIntent::Final => "upload",
        }
    }
}

#[derive(Debug, Serialize)]
struct ProfilesBody<'a, T: Serialize> {
    profiles: &'a [T],
}

/// The backend collaborator. Implement this to swap transports without
/// touching the views or the upload workflow.
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// GET /vendor/openings?page=&limit=
    async fn list_openings(&self, page: u32, limit: u32) -> Result<OpeningsPage, PortalError>;

    /// GET /vendor/openings/{id}. `None` when the backend returns an empty body.
    async fn get_opening(&self, opening_id: &str) -> Result<Option<Opening>, PortalError>;

    /// POST /vendor/openings/{id}/profiles/presign
    async fn presign(&self, opening_id: &str, file: &StagedFile)
        -> Result<ProfileRef, PortalError>;

    /// POST /vendor/openings/{id}/profiles/{uploadasdraft|upload}
    async fn save_profiles(
        &self,
        opening_id: &str,
        intent: SaveIntent,
        profiles: &[ProfileRef],
    ) -> Result<Vec<Profile>, PortalError>;

    /// POST /vendor/openings/{id}/profiles/upload with a single draft profile.
    async fn submit_profile(&self, opening_id: &str, profile: &Profile) -> Result<(), PortalError>;

    /// POST /vendor/openings/{id}/profiles/view. `None` when no URL came back.
    async fn preview_url(
        &self,
        opening_id: &str,
        profile: &ProfileRef,
    ) -> Result<Option<String>, PortalError>;

    /// POST /vendor/openings/{id}/profiles/delete/{profileId}
    async fn delete_profile(&self, opening_id: &str, profile_id: &str) -> Result<(), PortalError>;
}

/// reqwest-backed implementation. Keeps a cookie store so session cookies set
/// by the backend are replayed, optionally seeded from configuration.
#[derive(Clone)]
pub struct HttpPortalApi {
    client: Client,
    base_url: String,
}

impl HttpPortalApi {
    pub fn new(config: &Config) -> Result<Self, PortalError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie).map_err(|_| {
                PortalError::rejected("PORTAL_SESSION_COOKIE is not a valid header value")
            })?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .cookie_store(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.backend_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn profiles_url(&self, opening_id: &str, action: &str) -> String {
        self.url(&format!("/vendor/openings/{opening_id}/profiles/{action}"))
    }

    async fn send(&self, request: RequestBuilder) -> Result<ParsedResponse, PortalError> {
        let response = request.send().await?;
        let parsed = ParsedResponse::read(response).await;
        debug!("Backend responded {} ({} bytes)", parsed.status, parsed.text.len());
        Ok(parsed)
    }
}

/// Turns a non-2xx response into `PortalError::Api` carrying the raw body.
fn expect_ok(parsed: ParsedResponse, fallback: &str) -> Result<ParsedResponse, PortalError> {
    if parsed.ok {
        Ok(parsed)
    } else {
        Err(PortalError::Api {
            status: parsed.status,
            message: parsed.failure_message(fallback),
        })
    }
}

/// Locates the preview URL in the shapes the view endpoint is known to
/// return: `data.profiles[]`, `data[]`/`data`, or the bare body.
pub fn extract_view_url(parsed: &ParsedResponse) -> Option<String> {
    let data = parsed.data.as_ref()?;
    let inner = data.get("data").filter(|v| !v.is_null());
    let profiles = inner
        .and_then(|d| d.get("profiles"))
        .filter(|v| !v.is_null())
        .or(inner)
        .unwrap_or(data);

    let entry = match profiles {
        Value::Array(items) => items.first()?,
        other => other,
    };
    entry
        .get("viewUrl")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl PortalApi for HttpPortalApi {
    async fn list_openings(&self, page: u32, limit: u32) -> Result<OpeningsPage, PortalError> {
        debug!("Fetching openings page {page} (limit {limit})");
        let request = self
            .client
            .get(self.url("/vendor/openings"))
            .query(&[("page", page), ("limit", limit)])
            .header("content-type", "application/json");
        let parsed = expect_ok(self.send(request).await?, "Failed to fetch openings")?;
        let data = parsed.data.unwrap_or(Value::Null);
        if data.is_null() {
            return Ok(OpeningsPage::default());
        }
        Ok(serde_json::from_value(data)?)
    }

    async fn get_opening(&self, opening_id: &str) -> Result<Option<Opening>, PortalError> {
        debug!("Fetching opening {opening_id}");
        let request = self
            .client
            .get(self.url(&format!("/vendor/openings/{opening_id}")));
        let parsed = expect_ok(self.send(request).await?, "Failed to fetch")?;
        match parsed.data {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    async fn presign(
        &self,
        opening_id: &str,
        file: &StagedFile,
    ) -> Result<ProfileRef, PortalError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(file.content_type())?;
        let form = Form::new()
            .part("file", part)
            .text("filename", file.name.clone());

        let request = self
            .client
            .post(self.profiles_url(opening_id, "presign"))
            .multipart(form);
        let parsed = expect_ok(self.send(request).await?, "Presign failed")?;
        match parsed.payload() {
            Some(value) if value.is_object() => Ok(serde_json::from_value(value.clone())?),
            _ => Ok(ProfileRef::default()),
        }
    }

    async fn save_profiles(
        &self,
        opening_id: &str,
        intent: SaveIntent,
        profiles: &[ProfileRef],
    ) -> Result<Vec<Profile>, PortalError> {
        let request = self
            .client
            .post(self.profiles_url(opening_id, intent.endpoint()))
            .json(&ProfilesBody { profiles });
        let parsed = expect_ok(self.send(request).await?, "Save profiles failed")?;
        Ok(normalize_batch(parsed.payload())?)
    }

    async fn submit_profile(&self, opening_id: &str, profile: &Profile) -> Result<(), PortalError> {
        let request = self
            .client
            .post(self.profiles_url(opening_id, SaveIntent::Final.endpoint()))
            .json(&ProfilesBody {
                profiles: std::slice::from_ref(profile),
            });
        expect_ok(self.send(request).await?, "Submit failed")?;
        Ok(())
    }

    async fn preview_url(
        &self,
        opening_id: &str,
        profile: &ProfileRef,
    ) -> Result<Option<String>, PortalError> {
        let request = self
            .client
            .post(self.profiles_url(opening_id, "view"))
            .json(&ProfilesBody {
                profiles: std::slice::from_ref(profile),
            });
        let parsed = expect_ok(self.send(request).await?, "no details")?;
        Ok(extract_view_url(&parsed))
    }

    async fn delete_profile(&self, opening_id: &str, profile_id: &str) -> Result<(), PortalError> {
        let request = self
            .client
            .post(self.profiles_url(opening_id, &format!("delete/{profile_id}")));
        expect_ok(self.send(request).await?, "no details")?;
        Ok(())
    }
}
