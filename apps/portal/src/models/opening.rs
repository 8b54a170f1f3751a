use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use crate::models::profile::{normalize, Profile, RawProfile};
use crate::models::{deserialize_count, deserialize_text, null_as_default};

/// Lifecycle status of an opening. Unknown values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<String>")]
pub enum OpeningStatus {
    #[default]
    Pending,
    Submitted,
    Other(String),
}

impl From<Option<String>> for OpeningStatus {
    fn from(value: Option<String>) -> Self {
        match value.as_deref() {
            None | Some("") | Some("PENDING") => OpeningStatus::Pending,
            Some("SUBMITTED") => OpeningStatus::Submitted,
            Some(other) => OpeningStatus::Other(other.to_string()),
        }
    }
}

impl OpeningStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OpeningStatus::Pending => "PENDING",
            OpeningStatus::Submitted => "SUBMITTED",
            OpeningStatus::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HiringManager {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opening {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contract_type: Option<String>,
    /// Years, kept as sent (`5`, `"5"`, `"5+"`).
    #[serde(default, deserialize_with = "deserialize_text")]
    pub experience_min: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub experience_max: Option<String>,
    #[serde(default)]
    pub posted_date: Option<String>,
    #[serde(default)]
    pub status: OpeningStatus,
    #[serde(default)]
    pub hiring_manager: Option<HiringManager>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profiles: Vec<RawProfile>,
}

impl Opening {
    pub fn normalized_profiles(&self) -> Vec<Profile> {
        self.profiles.iter().map(normalize).collect()
    }

    /// Posted date rendered as `YYYY-MM-DD`; unparseable values pass through.
    pub fn posted_on(&self) -> Option<String> {
        self.posted_date.as_deref().map(format_date)
    }
}

fn format_date(raw: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.date_naive().to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.to_string();
    }
    raw.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub current_page: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub items_per_page: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_items: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_pages: u32,
}

impl Pagination {
    pub fn is_first(&self) -> bool {
        self.current_page <= 1
    }

    pub fn is_last(&self) -> bool {
        self.total_pages == 0 || self.current_page >= self.total_pages
    }

    /// Rows on the pages before this one.
    pub fn offset(&self) -> u64 {
        u64::from(self.current_page.saturating_sub(1)) * u64::from(self.items_per_page)
    }

    /// 1-based index of the first row shown on this page.
    pub fn first_row(&self) -> u64 {
        self.offset() + 1
    }
}

/// One page of `GET /vendor/openings`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OpeningsPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub openings: Vec<Opening>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}
