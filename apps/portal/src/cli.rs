use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::api::SaveIntent;
use crate::models::staged::{StagedFile, ACCEPTED_EXTENSIONS};
use crate::presenter::Notice;
use crate::render::{render_detail, render_openings};
use crate::routes::Route;
use crate::state::AppState;
use crate::views::{DetailPhase, OpeningDetailView};

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "IT-vendor portal client for contract openings")]
pub struct Cli {
    /// Backend origin (overrides PORTAL_BACKEND_URL)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Openings per page (overrides PORTAL_PAGE_SIZE)
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List contract openings
    Openings {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one opening (id or /vendor/openings/{id})
    Opening { opening: String },
    /// Upload candidate profile documents to an opening
    Upload {
        opening: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Save as draft instead of submitting
        #[arg(long)]
        draft: bool,
        /// Take every file as given, skipping the extension filter
        #[arg(long)]
        dropped: bool,
    },
    /// Print a preview link for a profile (id or filename)
    View { opening: String, profile: String },
    /// Delete a profile (id or filename)
    Delete { opening: String, profile: String },
    /// Submit a draft profile (id or filename)
    Submit { opening: String, profile: String },
}

/// Accepts a bare id or a detail path.
fn opening_id(arg: &str) -> String {
    match Route::parse(arg) {
        Some(Route::OpeningDetail(id)) => id,
        _ => arg.to_string(),
    }
}

/// Loads the detail view; prints its state and returns `None` unless it is ready.
async fn load_detail(state: &AppState, arg: &str) -> Option<OpeningDetailView> {
    let mut view = state.detail_view();
    view.set_identifier(Some(&opening_id(arg))).await;
    if view.phase() == DetailPhase::Ready {
        Some(view)
    } else {
        print!("{}", render_detail(&view));
        None
    }
}

/// Runs one command. Action failures are reported through the presenter.
pub async fn run(command: Command, state: &AppState) {
    match command {
        Command::Openings { page } => {
            let mut view = state.openings_view();
            view.fetch(page.max(1)).await;
            print!("{}", render_openings(&view));
        }
        Command::Opening { opening } => {
            if let Some(view) = load_detail(state, &opening).await {
                print!("{}", render_detail(&view));
            }
        }
        Command::Upload {
            opening,
            files,
            draft,
            dropped,
        } => {
            let Some(mut view) = load_detail(state, &opening).await else {
                return;
            };

            let mut staged = Vec::with_capacity(files.len());
            for path in &files {
                match StagedFile::from_path(path).await {
                    Ok(file) => staged.push(file),
                    Err(e) => {
                        state.presenter.notify(Notice::error(e.user_message()));
                        return;
                    }
                }
            }

            view.open_upload();
            let Some(workflow) = view.upload_mut() else {
                return;
            };
            let count = if dropped {
                workflow.stage_dropped(staged)
            } else {
                workflow.stage_picked(staged)
            };
            if count == 0 {
                state.presenter.notify(Notice::error(format!(
                    "No supported files to upload (accepted: {})",
                    ACCEPTED_EXTENSIONS.join(", ")
                )));
                return;
            }

            let intent = if draft {
                SaveIntent::Draft
            } else {
                SaveIntent::Final
            };
            info!("Uploading {count} file(s) to opening {opening}");
            if view.run_upload(intent).await {
                state
                    .presenter
                    .notify(Notice::success(format!("Uploaded {count} profile(s)")));
            }
            print!("{}", render_detail(&view));
        }
        Command::View { opening, profile } => {
            let Some(view) = load_detail(state, &opening).await else {
                return;
            };
            match view.find_profile(&profile).cloned() {
                Some(target) => {
                    view.view(&target).await;
                }
                None => no_such_profile(state, &profile),
            }
        }
        Command::Delete { opening, profile } => {
            let Some(mut view) = load_detail(state, &opening).await else {
                return;
            };
            match view.find_profile(&profile).cloned() {
                Some(target) => {
                    if view.delete(&target).await {
                        state
                            .presenter
                            .notify(Notice::success(format!("Deleted {}", target.filename)));
                    }
                    print!("{}", render_detail(&view));
                }
                None => no_such_profile(state, &profile),
            }
        }
        Command::Submit { opening, profile } => {
            let Some(mut view) = load_detail(state, &opening).await else {
                return;
            };
            match view.find_profile(&profile).cloned() {
                Some(target) if !target.is_draft => {
                    state.presenter.notify(Notice::info(format!(
                        "{} is already submitted",
                        target.filename
                    )));
                }
                Some(target) => {
                    view.submit(&target).await;
                    print!("{}", render_detail(&view));
                }
                None => no_such_profile(state, &profile),
            }
        }
    }
}

fn no_such_profile(state: &AppState, selector: &str) {
    state
        .presenter
        .notify(Notice::error(format!("No profile matching '{selector}'")));
}
