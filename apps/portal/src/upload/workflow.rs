//! Upload workflow. Stages local files, uploads them one at a time, then
//! persists the whole batch as draft or final.
//!
//! Idle → Staging → Uploading(per file) → Persisting → Done | Failed
//!
//! Uploads are strictly sequential so the returned profile order matches the
//! staged order and a failure is attributable to one file. The first failure
//! aborts the batch; files after it are never attempted.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::{PortalApi, SaveIntent};
use crate::errors::PortalError;
use crate::models::profile::{Profile, ProfileRef};
use crate::models::staged::StagedFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Staging,
    Uploading { index: usize, total: usize },
    Persisting { intent: SaveIntent },
    Done,
    Failed(String),
}

pub struct UploadWorkflow {
    opening_id: String,
    api: Arc<dyn PortalApi>,
    files: Vec<StagedFile>,
    state: UploadState,
    in_flight: Option<SaveIntent>,
}

impl UploadWorkflow {
    pub fn new(api: Arc<dyn PortalApi>, opening_id: impl Into<String>) -> Self {
        Self {
            opening_id: opening_id.into(),
            api,
            files: Vec::new(),
            state: UploadState::Idle,
            in_flight: None,
        }
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Draft and final saves share this guard; neither is available while
    /// either is running or when nothing is staged.
    pub fn can_save(&self) -> bool {
        !self.is_busy() && !self.files.is_empty()
    }

    pub fn can_cancel(&self) -> bool {
        !self.is_busy()
    }

    /// Files chosen through the picker. Only `.pdf`, `.ppt` and `.pptx` are
    /// taken; the rest are skipped. Returns how many were staged.
    pub fn stage_picked(&mut self, picked: Vec<StagedFile>) -> usize {
        let before = self.files.len();
        for file in picked {
            if file.is_accepted() {
                self.files.push(file);
            } else {
                warn!("Skipping unsupported file type: {}", file.name);
            }
        }
        self.mark_staging();
        self.files.len() - before
    }

    /// Files dropped onto the workflow. Appended as-is, duplicates included.
    pub fn stage_dropped(&mut self, dropped: Vec<StagedFile>) -> usize {
        let added = dropped.len();
        self.files.extend(dropped);
        self.mark_staging();
        added
    }

    /// Removes the staged file at `index`. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<StagedFile> {
        if index >= self.files.len() || self.is_busy() {
            return None;
        }
        let removed = self.files.remove(index);
        if self.files.is_empty() {
            self.state = UploadState::Idle;
        }
        Some(removed)
    }

    /// Clears the staged list. Refused while a batch is in flight.
    pub fn cancel(&mut self) -> bool {
        if !self.can_cancel() {
            return false;
        }
        self.files.clear();
        self.state = UploadState::Idle;
        true
    }

    fn mark_staging(&mut self) {
        if !self.files.is_empty() && !self.is_busy() {
            self.state = UploadState::Staging;
        }
    }

    /// Uploads every staged file and persists the batch under `intent`.
    ///
    /// Returns `Ok(None)` without touching the network when there is nothing
    /// to upload or a batch is already running. On success the staged list is
    /// cleared; on failure it is left intact so the user can retry.
    pub async fn run(&mut self, intent: SaveIntent) -> Result<Option<Vec<Profile>>, PortalError> {
        if !self.can_save() {
            return Ok(None);
        }

        self.in_flight = Some(intent);
        let result = self.upload_and_persist(intent).await;
        self.in_flight = None;

        match result {
            Ok(profiles) => {
                info!(
                    "Saved {} profile(s) to opening {} via {}",
                    profiles.len(),
                    self.opening_id,
                    intent.endpoint()
                );
                self.files.clear();
                self.state = UploadState::Done;
                Ok(Some(profiles))
            }
            Err(e) => {
                self.state = UploadState::Failed(e.user_message());
                Err(e)
            }
        }
    }

    async fn upload_and_persist(&mut self, intent: SaveIntent) -> Result<Vec<Profile>, PortalError> {
        let total = self.files.len();
        let mut uploaded: Vec<ProfileRef> = Vec::with_capacity(total);

        for (index, file) in self.files.iter().enumerate() {
            self.state = UploadState::Uploading { index, total };
            info!("Uploading {} ({}/{})", file.name, index + 1, total);

            match self.api.presign(&self.opening_id, file).await {
                Ok(slot) => uploaded.push(slot),
                Err(e) => {
                    warn!("Upload of {} failed: {e}", file.name);
                    log_abandoned(&self.opening_id, &uploaded);
                    return Err(e);
                }
            }
        }

        self.state = UploadState::Persisting { intent };
        match self
            .api
            .save_profiles(&self.opening_id, intent, &uploaded)
            .await
        {
            Ok(profiles) => Ok(profiles),
            Err(e) => {
                warn!("Persisting batch for opening {} failed: {e}", self.opening_id);
                log_abandoned(&self.opening_id, &uploaded);
                Err(e)
            }
        }
    }
}

/// Objects uploaded in an aborted batch stay in storage unreferenced. There is
/// no endpoint to remove them by key, so they are only recorded here.
fn log_abandoned(opening_id: &str, uploaded: &[ProfileRef]) {
    if uploaded.is_empty() {
        return;
    }
    let keys: Vec<&str> = uploaded
        .iter()
        .filter_map(|r| r.s3_key.as_deref())
        .collect();
    warn!(
        "Abandoning {} uploaded but unpersisted file(s) for opening {opening_id}: {:?}",
        uploaded.len(),
        keys
    );
}
