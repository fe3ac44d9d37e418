//! Option catalog
//!
//! The enumerated theme/room/furniture sets offered by the UI. Loadable
//! from TOML so deployments can reskin the choices without a rebuild.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Selection;

/// The option sets the UI offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionCatalog {
    pub themes: Vec<String>,
    pub rooms: Vec<String>,
    pub furniture: Vec<String>,
}

impl Default for OptionCatalog {
    fn default() -> Self {
        Self {
            themes: to_strings(&["Modern", "Scandinavian", "Industrial", "Bohemian"]),
            rooms: to_strings(&["Living Room", "Bedroom", "Kitchen", "Home Office"]),
            furniture: to_strings(&["Sofa", "Lamp", "Table", "Bookshelf", "Armchair", "Rug"]),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl OptionCatalog {
    /// Load a catalog from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let catalog: OptionCatalog = toml::from_str(&raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        if self.themes.is_empty() || self.rooms.is_empty() {
            return Err(Error::Catalog(
                "themes and rooms must offer at least one value".to_string(),
            ));
        }
        Ok(())
    }

    pub fn offers_theme(&self, value: &str) -> bool {
        self.themes.iter().any(|t| t == value)
    }

    pub fn offers_room(&self, value: &str) -> bool {
        self.rooms.iter().any(|r| r == value)
    }

    pub fn offers_furniture(&self, value: &str) -> bool {
        self.furniture.iter().any(|f| f == value)
    }

    /// Drop selection values the catalog does not offer.
    ///
    /// Applied to records loaded from the store before they reach the
    /// controls, so a record saved against an older catalog cannot select
    /// options that no longer exist.
    pub fn sanitize(&self, selection: &Selection) -> Selection {
        let mut out = Selection::new();
        out.theme = selection.theme.clone().filter(|t| self.offers_theme(t));
        out.room = selection.room.clone().filter(|r| self.offers_room(r));
        for item in &selection.furniture {
            if self.offers_furniture(item) {
                out.push_furniture(item.clone());
            }
        }
        out
    }
}
