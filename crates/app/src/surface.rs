//! Slint-backed UI surface
//!
//! Marshals controller-side updates onto the Slint event loop through a
//! weak window handle. Selection reads come from the mirror the view-model
//! callbacks maintain in [`AppState`], so no UI-thread access is needed.

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use slint::{Model, ModelRc, SharedString, VecModel, Weak};
use tracing::{debug, warn};
use uuid::Uuid;

use decora_core::{Selection, Sender};

use crate::controller::{Notice, NoticeLevel, UiSurface};
use crate::state::AppState;
use crate::{MainWindow, OptionItem, TranscriptEntry};

/// `UiSurface` over the Slint main window.
pub struct WindowSurface {
    /// `slint::Weak` is `Send` but not `Sync`; the mutex makes the surface
    /// shareable across runtime workers.
    window: Mutex<Weak<MainWindow>>,
    state: Arc<AppState>,
    /// Cache directory for downloaded previews.
    cache_dir: PathBuf,
}

impl WindowSurface {
    pub fn new(window: Weak<MainWindow>, state: Arc<AppState>, cache_dir: PathBuf) -> Self {
        Self {
            window: Mutex::new(window),
            state,
            cache_dir,
        }
    }

    fn window(&self) -> Weak<MainWindow> {
        self.window.lock().unwrap().clone()
    }
}

fn sender_label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "user",
        Sender::Ai => "ai",
    }
}

/// Re-check an exclusive option model so only `value` is selected.
fn check_exclusive(model: ModelRc<OptionItem>, value: Option<&str>) {
    for i in 0..model.row_count() {
        if let Some(mut item) = model.row_data(i) {
            item.checked = value.map(|v| item.name == v).unwrap_or(false);
            model.set_row_data(i, item);
        }
    }
}

/// Check each member option iff its value appears in `values`.
fn check_members(model: ModelRc<OptionItem>, values: &[String]) {
    for i in 0..model.row_count() {
        if let Some(mut item) = model.row_data(i) {
            item.checked = values.iter().any(|v| item.name == v.as_str());
            model.set_row_data(i, item);
        }
    }
}

impl UiSurface for WindowSurface {
    fn selection(&self) -> Selection {
        self.state.selection.lock().unwrap().clone()
    }

    fn apply_selection(&self, selection: &Selection) {
        *self.state.selection.lock().unwrap() = selection.clone();

        let selection = selection.clone();
        let _ = self.window().upgrade_in_event_loop(move |window| {
            check_exclusive(window.get_themes(), selection.theme.as_deref());
            check_exclusive(window.get_rooms(), selection.room.as_deref());
            check_members(window.get_furniture(), &selection.furniture);
        });
    }

    fn push_message(&self, id: Uuid, sender: Sender, text: &str) {
        let entry = TranscriptEntry {
            id: id.to_string().into(),
            sender: sender_label(sender).into(),
            text: text.into(),
        };
        let _ = self.window().upgrade_in_event_loop(move |window| {
            let transcript = window.get_transcript();
            match transcript.as_any().downcast_ref::<VecModel<TranscriptEntry>>() {
                Some(model) => model.push(entry),
                None => {
                    // First entry: replace whatever static model the window
                    // started with
                    let mut entries: Vec<TranscriptEntry> = transcript.iter().collect();
                    entries.push(entry);
                    window.set_transcript(ModelRc::from(Rc::new(VecModel::from(entries))));
                }
            }
        });
    }

    fn resolve_message(&self, id: Uuid, text: &str) {
        let id: SharedString = id.to_string().into();
        let text: SharedString = text.into();
        let _ = self.window().upgrade_in_event_loop(move |window| {
            let transcript = window.get_transcript();
            for i in 0..transcript.row_count() {
                if let Some(mut entry) = transcript.row_data(i) {
                    if entry.id == id {
                        entry.text = text.clone();
                        transcript.set_row_data(i, entry);
                        return;
                    }
                }
            }
            debug!(%id, "transcript entry to resolve no longer present");
        });
    }

    fn set_image(&self, reference: &str) {
        let reference_text: SharedString = reference.into();
        let _ = self.window().upgrade_in_event_loop(move |window| {
            window.set_image_reference(reference_text);
        });

        // Best-effort preview: download the bytes, then decode on the UI
        // thread. A failed preview only logs; the reference above is the
        // displayed state of record.
        let url = reference.to_string();
        let window = self.window();
        let target = self.cache_dir.join("preview.img");
        tokio::spawn(async move {
            match fetch_preview(&url, &target).await {
                Ok(()) => {
                    let _ = window.upgrade_in_event_loop(move |window| {
                        match slint::Image::load_from_path(&target) {
                            Ok(image) => window.set_design_image(image),
                            Err(_) => warn!(path = %target.display(), "preview decode failed"),
                        }
                    });
                }
                Err(e) => debug!("preview download failed: {}", e),
            }
        });
    }

    fn set_loading(&self, loading: bool) {
        let _ = self.window().upgrade_in_event_loop(move |window| {
            window.set_loading(loading);
        });
    }

    fn set_busy(&self, busy: bool) {
        let _ = self.window().upgrade_in_event_loop(move |window| {
            window.set_busy(busy);
        });
    }

    fn notify(&self, notice: Notice) {
        let is_error = notice.level == NoticeLevel::Error;
        let text: SharedString = notice.text.into();
        let _ = self.window().upgrade_in_event_loop(move |window| {
            window.set_notice_error(is_error);
            window.set_notice_text(text);
        });
    }

    fn clear_chat_input(&self) {
        let _ = self.window().upgrade_in_event_loop(move |window| {
            window.set_chat_draft("".into());
        });
    }
}

async fn fetch_preview(
    url: &str,
    target: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let bytes = reqwest::get(url)
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    tokio::fs::write(target, &bytes).await?;
    Ok(())
}
