//! User selection model

use serde::{Deserialize, Serialize};

/// The user's current theme/room/furniture choices.
///
/// `theme` and `room` hold at most one value each; `None` means nothing is
/// selected. `furniture` is insertion-ordered and duplicate-free.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub theme: Option<String>,
    pub room: Option<String>,
    pub furniture: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a furniture choice, ignoring duplicates.
    pub fn push_furniture(&mut self, item: impl Into<String>) {
        let item = item.into();
        if !self.furniture.iter().any(|f| f == &item) {
            self.furniture.push(item);
        }
    }

    /// Remove a furniture choice if present.
    pub fn remove_furniture(&mut self, item: &str) {
        self.furniture.retain(|f| f != item);
    }

    /// True when nothing at all is selected.
    pub fn is_empty(&self) -> bool {
        self.theme.is_none() && self.room.is_none() && self.furniture.is_empty()
    }

    /// Theme as stored on the wire (empty string when unselected).
    pub fn theme_str(&self) -> &str {
        self.theme.as_deref().unwrap_or("")
    }

    /// Room as stored on the wire (empty string when unselected).
    pub fn room_str(&self) -> &str {
        self.room.as_deref().unwrap_or("")
    }
}
