/// Navigation targets, in the path form the dashboard uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// /vendor/openings
    OpeningsList,
    /// /vendor/openings/{id}
    OpeningDetail(String),
}

const OPENINGS_PATH: &str = "/vendor/openings";

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::OpeningsList => OPENINGS_PATH.to_string(),
            Route::OpeningDetail(id) => format!("{OPENINGS_PATH}/{id}"),
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        let rest = path.trim_end_matches('/').strip_prefix(OPENINGS_PATH)?;
        if rest.is_empty() {
            return Some(Route::OpeningsList);
        }
        let id = rest.strip_prefix('/')?;
        if id.is_empty() || id.contains('/') {
            return None;
        }
        Some(Route::OpeningDetail(id.to_string()))
    }
}
