use std::sync::Arc;

use tracing::error;

use crate::api::PortalApi;
use crate::models::opening::{Opening, Pagination};
use crate::routes::Route;

/// Paginated openings table. Each fetch replaces the rows and pagination.
/// Fetch failures are logged only; the previous page stays on screen.
pub struct OpeningsListView {
    api: Arc<dyn PortalApi>,
    page_size: u32,
    openings: Vec<Opening>,
    pagination: Option<Pagination>,
    loading: bool,
}

impl OpeningsListView {
    pub fn new(api: Arc<dyn PortalApi>, page_size: u32) -> Self {
        Self {
            api,
            page_size,
            openings: Vec::new(),
            pagination: None,
            loading: false,
        }
    }

    pub fn openings(&self) -> &[Opening] {
        &self.openings
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn fetch(&mut self, page: u32) {
        self.loading = true;
        match self.api.list_openings(page, self.page_size).await {
            Ok(result) => {
                self.openings = result.openings;
                self.pagination = result.pagination;
            }
            Err(e) => error!("Error fetching openings: {e}"),
        }
        self.loading = false;
    }

    pub fn can_go_back(&self) -> bool {
        self.pagination.as_ref().is_some_and(|p| !p.is_first())
    }

    pub fn can_go_next(&self) -> bool {
        self.pagination.as_ref().is_some_and(|p| !p.is_last())
    }

    /// Back to the first page.
    pub async fn first(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.fetch(1).await;
        true
    }

    pub async fn prev(&mut self) -> bool {
        let Some(current) = self.current_page().filter(|_| self.can_go_back()) else {
            return false;
        };
        self.fetch(current - 1).await;
        true
    }

    pub async fn next(&mut self) -> bool {
        let Some(current) = self.current_page().filter(|_| self.can_go_next()) else {
            return false;
        };
        self.fetch(current + 1).await;
        true
    }

    fn current_page(&self) -> Option<u32> {
        self.pagination.as_ref().map(|p| p.current_page)
    }

    /// Row selection: where clicking the row at `index` navigates to.
    pub fn select(&self, index: usize) -> Option<Route> {
        let id = self.openings.get(index)?.id.clone()?;
        Some(Route::OpeningDetail(id))
    }

    /// "Showing A to B of N results".
    pub fn summary(&self) -> Option<String> {
        let p = self.pagination.as_ref()?;
        let first = p.first_row();
        let last = p.offset() + self.openings.len() as u64;
        Some(format!(
            "Showing {first} to {last} of {} results",
            p.total_items
        ))
    }
}
