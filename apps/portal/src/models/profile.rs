//! Profile normalization. Maps heterogeneous backend profile records into
//! the one shape every view works with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{deserialize_text, non_empty};

/// A profile record as the backend sends it. Every field is optional and
/// field naming is inconsistent across endpoints (`fileName` vs `filename`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProfile {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub id: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub s3_key: Option<String>,
    #[serde(default)]
    pub is_draft: Option<bool>,
}

/// Canonical client-side profile.
///
/// A profile without an `id` has not been persisted yet and is identified
/// by its `(s3_key, filename)` pair instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Option<String>,
    pub filename: String,
    pub s3_key: Option<String>,
    pub is_draft: bool,
}

impl Profile {
    /// Whether `other` refers to the same entry: by id when this profile has
    /// one, otherwise by `(s3_key, filename)`.
    pub fn same_entry(&self, other: &Profile) -> bool {
        match &self.id {
            Some(id) => other.id.as_deref() == Some(id.as_str()),
            None => {
                other.id.is_none() && self.s3_key == other.s3_key && self.filename == other.filename
            }
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_draft {
            "Draft"
        } else {
            "Submitted"
        }
    }
}

impl From<&Profile> for RawProfile {
    fn from(profile: &Profile) -> Self {
        RawProfile {
            id: profile.id.clone(),
            file_name: None,
            filename: Some(profile.filename.clone()),
            s3_key: profile.s3_key.clone(),
            is_draft: Some(profile.is_draft),
        }
    }
}

/// A `{filename, s3Key}` reference to an uploaded object, as returned by the
/// presign endpoint and sent back to the save and view endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
}

impl From<&Profile> for ProfileRef {
    fn from(profile: &Profile) -> Self {
        ProfileRef {
            filename: Some(profile.filename.clone()),
            s3_key: profile.s3_key.clone(),
        }
    }
}

/// Filename precedence: `fileName`, then `filename`, then the last path
/// segment of `s3Key`, then the empty string. Empty strings count as absent.
pub fn normalize(raw: &RawProfile) -> Profile {
    let s3_key = non_empty(raw.s3_key.as_deref()).map(str::to_string);

    let filename = non_empty(raw.file_name.as_deref())
        .or_else(|| non_empty(raw.filename.as_deref()))
        .map(str::to_string)
        .or_else(|| {
            s3_key
                .as_deref()
                .and_then(|key| key.rsplit('/').next())
                .map(str::to_string)
        })
        .unwrap_or_default();

    Profile {
        id: raw.id.clone(),
        filename,
        s3_key,
        is_draft: raw.is_draft.unwrap_or(false),
    }
}

/// Normalizes a (possibly enveloped) list payload. A single object counts as
/// a one-element list; null or absent yields an empty list.
pub fn normalize_batch(payload: Option<&Value>) -> Result<Vec<Profile>, serde_json::Error> {
    let items: Vec<RawProfile> = match payload {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| RawProfile::deserialize(item))
            .collect::<Result<_, _>>()?,
        Some(single) => vec![RawProfile::deserialize(single)?],
    };
    Ok(items.iter().map(normalize).collect())
}
