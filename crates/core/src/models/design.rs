//! Persisted design snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Selection;

/// A persisted design: a selection plus the generated image reference.
///
/// `created_at` is assigned by the persistence service. It is absent on the
/// outbound insert and always present on rows read back; records are
/// read-only once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignRecord {
    pub theme: String,
    pub room: String,
    pub furniture: Vec<String>,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl DesignRecord {
    /// Snapshot the given selection and image reference.
    pub fn from_selection(selection: &Selection, image_url: impl Into<String>) -> Self {
        Self {
            theme: selection.theme_str().to_string(),
            room: selection.room_str().to_string(),
            furniture: selection.furniture.clone(),
            image_url: image_url.into(),
            created_at: None,
        }
    }

    /// Recover the selection stored in this record.
    pub fn selection(&self) -> Selection {
        let mut selection = Selection {
            theme: (!self.theme.is_empty()).then(|| self.theme.clone()),
            room: (!self.room.is_empty()).then(|| self.room.clone()),
            furniture: Vec::new(),
        };
        for item in &self.furniture {
            selection.push_furniture(item.clone());
        }
        selection
    }
}
