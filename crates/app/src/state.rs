//! Application state management

use std::sync::Mutex;

use decora_core::{AppConfig, OptionCatalog, Result, Selection, Transcript};

/// Shared in-memory application state.
///
/// The selection mirror is kept in lockstep with the option controls by
/// the view-model callbacks, which lets the controller read the current
/// form state without touching the UI thread.
pub struct AppState {
    /// Current form-control selection.
    pub selection: Mutex<Selection>,
    /// Chat transcript (controller-owned, mirrored to the UI).
    pub transcript: Mutex<Transcript>,
    /// Reference of the currently displayed image, if any.
    image_reference: Mutex<Option<String>>,
    /// Option sets offered by the UI.
    pub catalog: OptionCatalog,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => OptionCatalog::load(path)?,
            None => OptionCatalog::default(),
        };
        Ok(Self::with_catalog(catalog))
    }

    pub fn with_catalog(catalog: OptionCatalog) -> Self {
        Self {
            selection: Mutex::new(Selection::new()),
            transcript: Mutex::new(Transcript::new()),
            image_reference: Mutex::new(None),
            catalog,
        }
    }

    pub fn set_image_reference(&self, reference: Option<String>) {
        *self.image_reference.lock().unwrap() = reference;
    }

    pub fn image_reference(&self) -> Option<String> {
        self.image_reference.lock().unwrap().clone()
    }
}
