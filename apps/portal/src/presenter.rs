//! Presenter: where user-visible notices and opened links go.

use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// Carried in `AppState` as `Arc<dyn Presenter>`.
pub trait Presenter: Send + Sync {
    fn notify(&self, notice: Notice);

    /// Opens `url` in a new browsing context, detached from the current view.
    fn open_url(&self, url: &str);
}

/// Terminal presenter: notices go to stderr (and the log), links to stdout.
pub struct CliPresenter;

impl Presenter for CliPresenter {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => {
                error!("{}", notice.message);
                eprintln!("error: {}", notice.message);
            }
            NoticeLevel::Success => {
                info!("{}", notice.message);
                eprintln!("ok: {}", notice.message);
            }
            NoticeLevel::Info => {
                info!("{}", notice.message);
                eprintln!("{}", notice.message);
            }
        }
    }

    fn open_url(&self, url: &str) {
        info!("Opening preview");
        println!("{url}");
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records everything it is asked to show.
    #[derive(Default)]
    pub struct RecordingPresenter {
        pub notices: Mutex<Vec<Notice>>,
        pub opened: Mutex<Vec<String>>,
    }

    impl RecordingPresenter {
        pub fn errors(&self) -> Vec<String> {
            self.notices
                .lock()
                .unwrap()
                .iter()
                .filter(|n| n.level == NoticeLevel::Error)
                .map(|n| n.message.clone())
                .collect()
        }

        pub fn opened(&self) -> Vec<String> {
            self.opened.lock().unwrap().clone()
        }
    }

    impl Presenter for RecordingPresenter {
        fn notify(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }

        fn open_url(&self, url: &str) {
            self.opened.lock().unwrap().push(url.to_string());
        }
    }
}
