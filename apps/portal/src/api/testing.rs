//! In-memory `PortalApi` with scripted responses and a call log.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{PortalApi, SaveIntent};
use crate::errors::PortalError;
use crate::models::opening::{Opening, OpeningsPage};
use crate::models::profile::{Profile, ProfileRef};
use crate::models::staged::StagedFile;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListOpenings { page: u32, limit: u32 },
    GetOpening(String),
    Presign { opening_id: String, filename: String },
    Save { opening_id: String, intent: SaveIntent, refs: Vec<ProfileRef> },
    Submit { opening_id: String, profile: Profile },
    Preview { opening_id: String, target: ProfileRef },
    Delete { opening_id: String, profile_id: String },
}

pub fn api_error(status: u16, message: &str) -> PortalError {
    PortalError::Api {
        status,
        message: message.to_string(),
    }
}

pub fn opening(value: Value) -> Opening {
    serde_json::from_value(value).unwrap()
}

/// Queued responses are consumed in order; an empty queue falls back to a
/// plausible success.
#[derive(Default)]
pub struct FakeApi {
    pub calls: Mutex<Vec<Call>>,
    pub openings: Mutex<VecDeque<Result<Option<Opening>, PortalError>>>,
    pub pages: Mutex<VecDeque<Result<OpeningsPage, PortalError>>>,
    /// Filenames whose presign fails with the given status.
    pub presign_failures: Mutex<HashMap<String, u16>>,
    pub saves: Mutex<VecDeque<Result<Vec<Profile>, PortalError>>>,
    pub submits: Mutex<VecDeque<Result<(), PortalError>>>,
    pub previews: Mutex<VecDeque<Result<Option<String>, PortalError>>>,
    pub deletes: Mutex<VecDeque<Result<(), PortalError>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_opening(self, result: Result<Option<Opening>, PortalError>) -> Self {
        self.openings.lock().unwrap().push_back(result);
        self
    }

    pub fn with_page(self, result: Result<OpeningsPage, PortalError>) -> Self {
        self.pages.lock().unwrap().push_back(result);
        self
    }

    pub fn with_presign_failure(self, filename: &str, status: u16) -> Self {
        self.presign_failures
            .lock()
            .unwrap()
            .insert(filename.to_string(), status);
        self
    }

    pub fn with_save(self, result: Result<Vec<Profile>, PortalError>) -> Self {
        self.saves.lock().unwrap().push_back(result);
        self
    }

    pub fn with_submit(self, result: Result<(), PortalError>) -> Self {
        self.submits.lock().unwrap().push_back(result);
        self
    }

    pub fn with_preview(self, result: Result<Option<String>, PortalError>) -> Self {
        self.previews.lock().unwrap().push_back(result);
        self
    }

    pub fn with_delete(self, result: Result<(), PortalError>) -> Self {
        self.deletes.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn presigned_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Presign { filename, .. } => Some(filename),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PortalApi for FakeApi {
    async fn list_openings(&self, page: u32, limit: u32) -> Result<OpeningsPage, PortalError> {
        self.record(Call::ListOpenings { page, limit });
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(OpeningsPage::default()))
    }

    async fn get_opening(&self, opening_id: &str) -> Result<Option<Opening>, PortalError> {
        self.record(Call::GetOpening(opening_id.to_string()));
        self.openings
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(None))
    }

    async fn presign(
        &self,
        opening_id: &str,
        file: &StagedFile,
    ) -> Result<ProfileRef, PortalError> {
        self.record(Call::Presign {
            opening_id: opening_id.to_string(),
            filename: file.name.clone(),
        });
        if let Some(status) = self.presign_failures.lock().unwrap().get(&file.name) {
            return Err(api_error(*status, &format!("cannot store {}", file.name)));
        }
        Ok(ProfileRef {
            filename: Some(file.name.clone()),
            s3_key: Some(format!("openings/{opening_id}/{}", file.name)),
        })
    }

    async fn save_profiles(
        &self,
        opening_id: &str,
        intent: SaveIntent,
        profiles: &[ProfileRef],
    ) -> Result<Vec<Profile>, PortalError> {
        self.record(Call::Save {
            opening_id: opening_id.to_string(),
            intent,
            refs: profiles.to_vec(),
        });
        if let Some(result) = self.saves.lock().unwrap().pop_front() {
            return result;
        }
        Ok(profiles
            .iter()
            .enumerate()
            .map(|(i, r)| Profile {
                id: Some(format!("saved-{i}")),
                filename: r.filename.clone().unwrap_or_default(),
                s3_key: r.s3_key.clone(),
                is_draft: intent == SaveIntent::Draft,
            })
            .collect())
    }

    async fn submit_profile(&self, opening_id: &str, profile: &Profile) -> Result<(), PortalError> {
        self.record(Call::Submit {
            opening_id: opening_id.to_string(),
            profile: profile.clone(),
        });
        self.submits.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn preview_url(
        &self,
        opening_id: &str,
        profile: &ProfileRef,
    ) -> Result<Option<String>, PortalError> {
        self.record(Call::Preview {
            opening_id: opening_id.to_string(),
            target: profile.clone(),
        });
        self.previews
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Some("https://preview.example/doc".to_string())))
    }

    async fn delete_profile(&self, opening_id: &str, profile_id: &str) -> Result<(), PortalError> {
        self.record(Call::Delete {
            opening_id: opening_id.to_string(),
            profile_id: profile_id.to_string(),
        });
        self.deletes.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}
