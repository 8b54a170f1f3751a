use std::sync::Arc;

use crate::api::{HttpPortalApi, PortalApi};
use crate::config::Config;
use crate::errors::PortalError;
use crate::presenter::{CliPresenter, Presenter};
use crate::views::{OpeningDetailView, OpeningsListView};

/// Session state built once at startup and passed by reference to every
/// command. Dropped when the command finishes; there is no global store.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub api: Arc<dyn PortalApi>,
    /// Where notices and preview links are shown.
    pub presenter: Arc<dyn Presenter>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, PortalError> {
        let api = Arc::new(HttpPortalApi::new(&config)?);
        Ok(Self {
            config,
            api,
            presenter: Arc::new(CliPresenter),
        })
    }

    pub fn openings_view(&self) -> OpeningsListView {
        OpeningsListView::new(self.api.clone(), self.config.page_size)
    }

    pub fn detail_view(&self) -> OpeningDetailView {
        OpeningDetailView::new(self.api.clone(), self.presenter.clone())
    }
}
