//! Candidate profile upload: staging, sequential presign, batch persist.

pub mod workflow;

pub use workflow::{UploadState, UploadWorkflow};
