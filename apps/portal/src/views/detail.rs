//! Opening detail view. Owns the fetched opening and its profile list, and
//! mediates delete, preview, submit, and upload against it.
//!
//! Reconciliation per action:
//! - delete waits for the server, then removes the row locally
//! - submit waits for the server, then flips `is_draft` locally (no re-fetch)
//! - uploads append locally until the upload modal has been opened once;
//!   from then on every successful upload re-fetches the whole opening
//!
//! Local patches stay stale until the next full fetch.

use std::sync::Arc;

use tracing::{debug, info};

use crate::api::{PortalApi, SaveIntent};
use crate::errors::PortalError;
use crate::models::opening::{Opening, OpeningStatus};
use crate::models::profile::{Profile, ProfileRef};
use crate::presenter::{Notice, Presenter};
use crate::upload::UploadWorkflow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailPhase {
    Loading,
    Error(String),
    NotFound,
    Ready,
}

pub struct OpeningDetailView {
    api: Arc<dyn PortalApi>,
    presenter: Arc<dyn Presenter>,
    opening_id: Option<String>,
    loading: bool,
    error: Option<String>,
    opening: Option<Opening>,
    status: OpeningStatus,
    profiles: Vec<Profile>,
    upload: Option<UploadWorkflow>,
    upload_modal_opened: bool,
    saving: bool,
}

impl OpeningDetailView {
    pub fn new(api: Arc<dyn PortalApi>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            api,
            presenter,
            opening_id: None,
            loading: true,
            error: None,
            opening: None,
            status: OpeningStatus::Pending,
            profiles: Vec::new(),
            upload: None,
            upload_modal_opened: false,
            saving: false,
        }
    }

    pub fn phase(&self) -> DetailPhase {
        if self.loading {
            DetailPhase::Loading
        } else if let Some(err) = &self.error {
            DetailPhase::Error(err.clone())
        } else if self.opening.is_none() {
            DetailPhase::NotFound
        } else {
            DetailPhase::Ready
        }
    }

    pub fn opening(&self) -> Option<&Opening> {
        self.opening.as_ref()
    }

    pub fn status(&self) -> &OpeningStatus {
        &self.status
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn upload(&self) -> Option<&UploadWorkflow> {
        self.upload.as_ref()
    }

    pub fn upload_mut(&mut self) -> Option<&mut UploadWorkflow> {
        self.upload.as_mut()
    }

    /// Looks a profile up by id, falling back to filename.
    pub fn find_profile(&self, selector: &str) -> Option<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.id.as_deref() == Some(selector))
            .or_else(|| self.profiles.iter().find(|p| p.filename == selector))
    }

    // ────────────────────────────────────────────────────────────────────
    // Fetching
    // ────────────────────────────────────────────────────────────────────

    /// Fetches the opening when the identifier changes. A missing identifier
    /// or a repeat of the current one does nothing.
    pub async fn set_identifier(&mut self, opening_id: Option<&str>) {
        let Some(id) = opening_id else {
            return;
        };
        if self.opening_id.as_deref() == Some(id) {
            debug!("Opening {id} already loaded");
            return;
        }
        self.opening_id = Some(id.to_string());

        self.loading = true;
        self.error = None;
        match self.api.get_opening(id).await {
            Ok(opening) => self.apply(opening),
            Err(e) => self.error = Some(message_or(&e, "Failed to load opening")),
        }
        self.loading = false;
    }

    /// Full re-fetch replacing all local profile state. Failures are reported
    /// as notices and leave the current projection untouched.
    pub async fn refresh(&mut self) {
        let Some(id) = self.opening_id.clone() else {
            return;
        };
        self.loading = true;
        self.error = None;
        match self.api.get_opening(&id).await {
            Ok(opening) => self.apply(opening),
            Err(e) => self
                .presenter
                .notify(Notice::error(message_or(&e, "Failed to sync opening"))),
        }
        self.loading = false;
    }

    fn apply(&mut self, opening: Option<Opening>) {
        match opening {
            Some(opening) => {
                self.status = opening.status.clone();
                self.profiles = opening.normalized_profiles();
                info!(
                    "Loaded opening {} with {} profile(s)",
                    self.opening_id.as_deref().unwrap_or("?"),
                    self.profiles.len()
                );
                self.opening = Some(opening);
            }
            None => {
                self.opening = None;
                self.profiles.clear();
            }
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Upload modal
    // ────────────────────────────────────────────────────────────────────

    pub fn open_upload(&mut self) {
        let Some(id) = self.opening_id.clone() else {
            return;
        };
        self.upload_modal_opened = true;
        if self.upload.is_none() {
            self.upload = Some(UploadWorkflow::new(self.api.clone(), id));
        }
    }

    /// Closing does not cancel anything already sent.
    pub fn close_upload(&mut self) {
        self.upload = None;
    }

    /// Cancel button: clears staged files and closes, unless a batch is running.
    pub fn cancel_upload(&mut self) {
        if let Some(wf) = self.upload.as_mut() {
            if wf.cancel() {
                self.upload = None;
            }
        }
    }

    /// Runs the open upload workflow and reconciles its result.
    ///
    /// On success the modal closes one scheduling tick after the profile list
    /// has been updated. On failure the modal stays open with its files.
    pub async fn run_upload(&mut self, intent: SaveIntent) -> bool {
        let outcome = match self.upload.as_mut() {
            Some(wf) => wf.run(intent).await,
            None => return false,
        };

        match outcome {
            Ok(Some(profiles)) => {
                self.handle_uploaded(profiles).await;
                tokio::task::yield_now().await;
                self.close_upload();
                true
            }
            Ok(None) => false,
            Err(e) => {
                self.presenter
                    .notify(Notice::error(message_or(&e, "Upload failed")));
                false
            }
        }
    }

    /// Reconciles freshly persisted profiles with the local list.
    pub async fn handle_uploaded(&mut self, new_profiles: Vec<Profile>) {
        if self.upload_modal_opened {
            self.refresh().await;
        } else {
            self.profiles.extend(new_profiles);
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Row actions
    // ────────────────────────────────────────────────────────────────────

    pub async fn delete(&mut self, target: &Profile) -> bool {
        if self.status == OpeningStatus::Submitted {
            self.presenter.notify(Notice::error(
                "Profiles cannot be deleted after submission.",
            ));
            return false;
        }

        let Some(profile_id) = target.id.as_deref() else {
            self.profiles
                .retain(|p| p.s3_key != target.s3_key || p.filename != target.filename);
            return true;
        };
        let Some(opening_id) = self.opening_id.as_deref() else {
            return false;
        };

        match self.api.delete_profile(opening_id, profile_id).await {
            Ok(()) => {
                self.profiles.retain(|p| p.id.as_deref() != Some(profile_id));
                info!("Deleted profile {profile_id} from opening {opening_id}");
                true
            }
            Err(PortalError::Api { message, .. }) => {
                self.presenter.notify(Notice::error(format!(
                    "Failed to delete profile: {message}"
                )));
                false
            }
            Err(e) => {
                debug!("Delete failed: {e}");
                self.presenter.notify(Notice::error("Error deleting profile"));
                false
            }
        }
    }

    pub async fn view(&self, target: &Profile) -> bool {
        if target.s3_key.is_none() {
            self.presenter
                .notify(Notice::error("Preview not available (missing s3Key)."));
            return false;
        }
        let Some(opening_id) = self.opening_id.as_deref() else {
            return false;
        };

        match self
            .api
            .preview_url(opening_id, &ProfileRef::from(target))
            .await
        {
            Ok(Some(url)) => {
                self.presenter.open_url(&url);
                true
            }
            Ok(None) => {
                self.presenter
                    .notify(Notice::error("Preview URL not returned by server."));
                false
            }
            Err(PortalError::Api { message, .. }) => {
                self.presenter.notify(Notice::error(format!(
                    "Failed to get preview URL: {message}"
                )));
                false
            }
            Err(e) => {
                debug!("Preview failed: {e}");
                self.presenter.notify(Notice::error("Error generating preview"));
                false
            }
        }
    }

    /// Promotes a draft to final. Only one submit runs at a time.
    pub async fn submit(&mut self, target: &Profile) -> bool {
        if self.saving {
            return false;
        }
        let Some(opening_id) = self.opening_id.clone() else {
            return false;
        };

        self.saving = true;
        let result = self.api.submit_profile(&opening_id, target).await;
        self.saving = false;

        match result {
            Ok(()) => {
                for profile in self.profiles.iter_mut().filter(|p| target.same_entry(p)) {
                    profile.is_draft = false;
                }
                self.presenter
                    .notify(Notice::success(format!("Submitted {}", target.filename)));
                true
            }
            Err(e) => {
                self.presenter
                    .notify(Notice::error(message_or(&e, "Failed to submit")));
                false
            }
        }
    }
}

fn message_or(err: &PortalError, fallback: &str) -> String {
    let message = err.user_message();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
