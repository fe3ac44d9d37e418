//! Design workflow controller
//!
//! One method per user-triggered operation: generate, save, load, chat.
//! The controller talks to the window only through the [`UiSurface`]
//! adapter and to the outside world only through the gateway traits, so
//! the whole workflow runs against fakes in tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use decora_core::{prompt, AppConfig, DesignRecord, GenerationBackend, Selection, Sender};
use decora_gateway::{
    GenerationGateway, HttpGateway, PersistenceGateway, RestStore, StubGateway,
};

use crate::state::AppState;

/// Transcript confirmation once an image lands.
const GENERATED_MESSAGE: &str = "Your design has been generated!";
/// Reply used when the response generator fails.
const FALLBACK_REPLY: &str = "Sorry, I didn't catch that. Could you say it again?";

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-visible status notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Adapter between the controller and the concrete window.
///
/// Implementations marshal onto the UI thread themselves; every method is
/// fire-and-forget from the controller's point of view.
pub trait UiSurface: Send + Sync {
    /// Read the current selection from the option controls.
    fn selection(&self) -> Selection;
    /// Apply a selection to the option controls, exclusively: a theme or
    /// room control is selected iff it equals the selection's value, a
    /// furniture control iff its value is a member of the set.
    fn apply_selection(&self, selection: &Selection);
    /// Append a transcript entry.
    fn push_message(&self, id: Uuid, sender: Sender, text: &str);
    /// Replace the text of the transcript entry with the given id.
    fn resolve_message(&self, id: Uuid, text: &str);
    /// Show an image by reference.
    fn set_image(&self, reference: &str);
    /// Toggle the blocking loading overlay.
    fn set_loading(&self, loading: bool);
    /// Toggle the design-operation trigger buttons.
    fn set_busy(&self, busy: bool);
    /// Surface a status notice.
    fn notify(&self, notice: Notice);
    /// Clear the chat input field.
    fn clear_chat_input(&self);
}

/// Releases the loading overlay and busy flag on every exit path.
struct LoadingGuard<'a> {
    controller: &'a DesignController,
}

impl<'a> LoadingGuard<'a> {
    /// Claim the single-flight slot. Returns `None` when another design
    /// operation is already running; the trigger is dropped.
    fn acquire(controller: &'a DesignController) -> Option<Self> {
        if controller.busy.swap(true, Ordering::AcqRel) {
            debug!("design operation already in flight, dropping trigger");
            return None;
        }
        controller.surface.set_busy(true);
        controller.surface.set_loading(true);
        Some(Self { controller })
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.controller.surface.set_loading(false);
        self.controller.surface.set_busy(false);
        self.controller.busy.store(false, Ordering::Release);
    }
}

/// The design workflow controller.
pub struct DesignController {
    persistence: Arc<dyn PersistenceGateway>,
    generation: Arc<dyn GenerationGateway>,
    surface: Arc<dyn UiSurface>,
    state: Arc<AppState>,
    /// Single-flight flag for the design operations.
    busy: AtomicBool,
    /// Single-flight flag for chat sends.
    chat_busy: AtomicBool,
}

impl DesignController {
    pub fn new(
        persistence: Arc<dyn PersistenceGateway>,
        generation: Arc<dyn GenerationGateway>,
        surface: Arc<dyn UiSurface>,
        state: Arc<AppState>,
    ) -> Self {
        Self {
            persistence,
            generation,
            surface,
            state,
            busy: AtomicBool::new(false),
            chat_busy: AtomicBool::new(false),
        }
    }

    /// Generate a design image from the current selection.
    pub async fn generate(&self) {
        let _guard = match LoadingGuard::acquire(self) {
            Some(guard) => guard,
            None => return,
        };

        let selection = self.surface.selection();
        let prompt = prompt::design_prompt(&selection);
        info!(prompt = %prompt, "generating design image");

        match self.generation.generate_image(&prompt).await {
            Ok(reference) => {
                self.state.set_image_reference(Some(reference.clone()));
                self.surface.set_image(&reference);
                self.push_ai_message(GENERATED_MESSAGE);
            }
            Err(e) => {
                error!("Image generation failed: {}", e);
                self.surface
                    .notify(Notice::error("Could not generate the design image."));
            }
        }
    }

    /// Persist the current selection and image reference.
    pub async fn save(&self) {
        let _guard = match LoadingGuard::acquire(self) {
            Some(guard) => guard,
            None => return,
        };

        let selection = self.surface.selection();
        let reference = self.state.image_reference().unwrap_or_default();
        let record = DesignRecord::from_selection(&selection, reference);

        match self.persistence.save_design(&record).await {
            Ok(stored) => {
                info!(created_at = ?stored.created_at, "design saved");
                self.surface.notify(Notice::info("Design saved successfully!"));
            }
            Err(e) => {
                error!("Error saving design: {}", e);
                self.surface.notify(Notice::error("Error saving design."));
            }
        }
    }

    /// Fetch the most recent saved design and apply it.
    pub async fn load(&self) {
        let _guard = match LoadingGuard::acquire(self) {
            Some(guard) => guard,
            None => return,
        };

        match self.persistence.load_latest().await {
            Ok(Some(record)) => {
                let selection = self.state.catalog.sanitize(&record.selection());
                self.surface.apply_selection(&selection);
                self.state.set_image_reference(Some(record.image_url.clone()));
                self.surface.set_image(&record.image_url);
                self.surface
                    .notify(Notice::info("Latest design loaded successfully!"));
            }
            Ok(None) => {
                self.surface.notify(Notice::info("No designs found."));
            }
            Err(e) => {
                error!("Error loading design: {}", e);
                self.surface.notify(Notice::error("Error loading design."));
            }
        }
    }

    /// Relay a chat message to the assistant.
    ///
    /// The transcript grows by exactly two entries per send: the user
    /// message, then a pending placeholder that is resolved in place once
    /// the reply arrives. Generator failure resolves the placeholder with
    /// a fallback reply instead of leaving it dangling.
    pub async fn send_chat(&self, text: String) {
        let text = text.trim().to_string();
        if text.is_empty() {
            return;
        }
        if self.chat_busy.swap(true, Ordering::AcqRel) {
            debug!("chat send already in flight, dropping trigger");
            return;
        }

        let user_id = {
            let mut transcript = self.state.transcript.lock().unwrap();
            transcript.append(Sender::User, text.clone())
        };
        self.surface.push_message(user_id, Sender::User, &text);
        self.surface.clear_chat_input();

        let pending_id = {
            let mut transcript = self.state.transcript.lock().unwrap();
            transcript.append_pending()
        };
        self.surface
            .push_message(pending_id, Sender::Ai, decora_core::PENDING_REPLY);

        let reply = match self.generation.generate_reply(&text).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Reply generation failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
        };

        let replaced = {
            let mut transcript = self.state.transcript.lock().unwrap();
            transcript.resolve(pending_id, reply.clone())
        };
        if replaced {
            self.surface.resolve_message(pending_id, &reply);
        } else {
            // resolve() appended a fresh entry; mirror it to the window
            let id = {
                let transcript = self.state.transcript.lock().unwrap();
                transcript.last().map(|m| m.id).unwrap_or(pending_id)
            };
            self.surface.push_message(id, Sender::Ai, &reply);
        }

        self.chat_busy.store(false, Ordering::Release);
    }

    fn push_ai_message(&self, text: &str) -> Uuid {
        let id = {
            let mut transcript = self.state.transcript.lock().unwrap();
            transcript.append(Sender::Ai, text)
        };
        self.surface.push_message(id, Sender::Ai, text);
        id
    }
}

/// Construct the controller with gateways chosen from configuration.
pub fn build_controller(
    config: &AppConfig,
    surface: Arc<dyn UiSurface>,
    state: Arc<AppState>,
) -> DesignController {
    let persistence: Arc<dyn PersistenceGateway> = Arc::new(RestStore::new(config));
    let generation: Arc<dyn GenerationGateway> = match config.generation_backend {
        GenerationBackend::Stub => Arc::new(StubGateway::new()),
        GenerationBackend::Http => Arc::new(HttpGateway::new(config)),
    };
    DesignController::new(persistence, generation, surface, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;
    use decora_core::{OptionCatalog, PENDING_REPLY};
    use decora_gateway as gateway;

    #[derive(Debug, Clone, PartialEq)]
    enum SurfaceEvent {
        Loading(bool),
        Busy(bool),
        Image(String),
        Notice(NoticeLevel, String),
        Push(Sender, String),
        Resolve(String),
        Applied(Selection),
        ClearInput,
    }

    #[derive(Default)]
    struct FakeSurface {
        selection: Mutex<Selection>,
        events: Mutex<Vec<SurfaceEvent>>,
    }

    impl FakeSurface {
        fn with_selection(selection: Selection) -> Self {
            Self {
                selection: Mutex::new(selection),
                events: Mutex::new(Vec::new()),
            }
        }

        fn events(&self) -> Vec<SurfaceEvent> {
            self.events.lock().unwrap().clone()
        }

        fn record(&self, event: SurfaceEvent) {
            self.events.lock().unwrap().push(event);
        }

        fn count(&self, matches: impl Fn(&SurfaceEvent) -> bool) -> usize {
            self.events().iter().filter(|e| matches(e)).count()
        }
    }

    impl UiSurface for FakeSurface {
        fn selection(&self) -> Selection {
            self.selection.lock().unwrap().clone()
        }

        fn apply_selection(&self, selection: &Selection) {
            *self.selection.lock().unwrap() = selection.clone();
            self.record(SurfaceEvent::Applied(selection.clone()));
        }

        fn push_message(&self, _id: Uuid, sender: Sender, text: &str) {
            self.record(SurfaceEvent::Push(sender, text.to_string()));
        }

        fn resolve_message(&self, _id: Uuid, text: &str) {
            self.record(SurfaceEvent::Resolve(text.to_string()));
        }

        fn set_image(&self, reference: &str) {
            self.record(SurfaceEvent::Image(reference.to_string()));
        }

        fn set_loading(&self, loading: bool) {
            self.record(SurfaceEvent::Loading(loading));
        }

        fn set_busy(&self, busy: bool) {
            self.record(SurfaceEvent::Busy(busy));
        }

        fn notify(&self, notice: Notice) {
            self.record(SurfaceEvent::Notice(notice.level, notice.text));
        }

        fn clear_chat_input(&self) {
            self.record(SurfaceEvent::ClearInput);
        }
    }

    #[derive(Default)]
    struct FakeStore {
        saved: Mutex<Vec<DesignRecord>>,
        fail: bool,
    }

    impl FakeStore {
        fn failing() -> Self {
            Self {
                saved: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn saved_count(&self) -> usize {
            self.saved.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PersistenceGateway for FakeStore {
        async fn save_design(&self, record: &DesignRecord) -> gateway::Result<DesignRecord> {
            if self.fail {
                return Err(gateway::Error::Status {
                    code: 500,
                    message: "insert failed".to_string(),
                });
            }
            let mut stored = record.clone();
            stored.created_at = Some(Utc::now());
            self.saved.lock().unwrap().push(stored.clone());
            Ok(stored)
        }

        async fn load_latest(&self) -> gateway::Result<Option<DesignRecord>> {
            if self.fail {
                return Err(gateway::Error::Status {
                    code: 500,
                    message: "select failed".to_string(),
                });
            }
            Ok(self.saved.lock().unwrap().last().cloned())
        }
    }

    #[derive(Default)]
    struct FakeGeneration {
        fail: bool,
    }

    impl FakeGeneration {
        fn failing() -> Self {
            Self { fail: true }
        }
    }

    #[async_trait]
    impl GenerationGateway for FakeGeneration {
        async fn generate_image(&self, prompt: &str) -> gateway::Result<String> {
            if self.fail {
                return Err(gateway::Error::Timeout(Duration::from_secs(1)));
            }
            Ok(format!("https://img.test/{}", prompt.len()))
        }

        async fn generate_reply(&self, _message: &str) -> gateway::Result<String> {
            if self.fail {
                return Err(gateway::Error::Timeout(Duration::from_secs(1)));
            }
            Ok("Sounds lovely!".to_string())
        }
    }

    fn sample_selection() -> Selection {
        let mut selection = Selection::new();
        selection.theme = Some("Modern".to_string());
        selection.room = Some("Living Room".to_string());
        selection.push_furniture("Sofa");
        selection.push_furniture("Lamp");
        selection
    }

    fn controller_with(
        store: FakeStore,
        generation: FakeGeneration,
        surface: FakeSurface,
    ) -> (Arc<FakeSurface>, Arc<FakeStore>, Arc<AppState>, DesignController) {
        let surface = Arc::new(surface);
        let store = Arc::new(store);
        let state = Arc::new(AppState::with_catalog(OptionCatalog::default()));
        let controller = DesignController::new(
            store.clone(),
            Arc::new(generation),
            surface.clone(),
            state.clone(),
        );
        (surface, store, state, controller)
    }

    #[tokio::test]
    async fn test_generate_sets_image_exactly_once() {
        let (surface, _, state, controller) = controller_with(
            FakeStore::default(),
            FakeGeneration::default(),
            FakeSurface::with_selection(sample_selection()),
        );

        controller.generate().await;

        assert_eq!(surface.count(|e| matches!(e, SurfaceEvent::Image(_))), 1);
        assert!(state.image_reference().is_some());

        let transcript = state.transcript.lock().unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.last().unwrap().text, GENERATED_MESSAGE);
    }

    #[tokio::test]
    async fn test_generate_failure_releases_loading_and_notifies() {
        let (surface, _, state, controller) = controller_with(
            FakeStore::default(),
            FakeGeneration::failing(),
            FakeSurface::default(),
        );

        controller.generate().await;

        let events = surface.events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, SurfaceEvent::Loading(_)))
                .cloned()
                .collect::<Vec<_>>(),
            vec![SurfaceEvent::Loading(true), SurfaceEvent::Loading(false)]
        );
        assert_eq!(
            surface.count(|e| matches!(e, SurfaceEvent::Notice(NoticeLevel::Error, _))),
            1
        );
        assert_eq!(surface.count(|e| matches!(e, SurfaceEvent::Image(_))), 0);
        assert!(state.image_reference().is_none());
    }

    #[tokio::test]
    async fn test_save_failure_notice_fires_once_selection_unchanged() {
        let selection = sample_selection();
        let (surface, store, _, controller) = controller_with(
            FakeStore::failing(),
            FakeGeneration::default(),
            FakeSurface::with_selection(selection.clone()),
        );

        controller.save().await;

        assert_eq!(store.saved_count(), 0);
        assert_eq!(
            surface.count(|e| matches!(e, SurfaceEvent::Notice(NoticeLevel::Error, _))),
            1
        );
        let events = surface.events();
        assert_eq!(events.last(), Some(&SurfaceEvent::Busy(false)));
        assert_eq!(surface.selection(), selection);
    }

    #[tokio::test]
    async fn test_repeated_save_is_not_deduplicated() {
        let (_, store, _, controller) = controller_with(
            FakeStore::default(),
            FakeGeneration::default(),
            FakeSurface::with_selection(sample_selection()),
        );

        controller.save().await;
        controller.save().await;

        assert_eq!(store.saved_count(), 2);
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips_selection_and_image() {
        let selection = sample_selection();
        let (surface, _, state, controller) = controller_with(
            FakeStore::default(),
            FakeGeneration::default(),
            FakeSurface::with_selection(selection.clone()),
        );

        controller.generate().await;
        let reference = state.image_reference().unwrap();
        controller.save().await;

        // Wipe the controls, then load the latest record back
        surface.apply_selection(&Selection::new());
        controller.load().await;

        assert_eq!(surface.selection(), selection);
        let events = surface.events();
        assert_eq!(
            events.last(),
            Some(&SurfaceEvent::Busy(false)),
            "loading guard must release last"
        );
        assert!(events.contains(&SurfaceEvent::Image(reference)));
    }

    #[tokio::test]
    async fn test_load_with_no_records_leaves_state_untouched() {
        let selection = sample_selection();
        let (surface, _, state, controller) = controller_with(
            FakeStore::default(),
            FakeGeneration::default(),
            FakeSurface::with_selection(selection.clone()),
        );

        controller.load().await;

        assert_eq!(surface.selection(), selection);
        assert!(state.image_reference().is_none());
        assert_eq!(surface.count(|e| matches!(e, SurfaceEvent::Applied(_))), 0);
        assert_eq!(surface.count(|e| matches!(e, SurfaceEvent::Image(_))), 0);
        assert!(surface
            .events()
            .contains(&SurfaceEvent::Notice(NoticeLevel::Info, "No designs found.".to_string())));
    }

    #[tokio::test]
    async fn test_busy_controller_drops_overlapping_trigger() {
        let (surface, store, _, controller) = controller_with(
            FakeStore::default(),
            FakeGeneration::default(),
            FakeSurface::with_selection(sample_selection()),
        );

        controller.busy.store(true, Ordering::Release);
        controller.save().await;

        assert_eq!(store.saved_count(), 0);
        assert!(surface.events().is_empty());
    }

    #[tokio::test]
    async fn test_chat_transcript_grows_by_exactly_two() {
        let (surface, _, state, controller) = controller_with(
            FakeStore::default(),
            FakeGeneration::default(),
            FakeSurface::default(),
        );

        controller.send_chat("Hello".to_string()).await;

        let transcript = state.transcript.lock().unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0].text, "Hello");
        assert_eq!(transcript.messages()[0].sender, Sender::User);
        assert_eq!(transcript.last().unwrap().text, "Sounds lovely!");

        let events = surface.events();
        assert!(events.contains(&SurfaceEvent::Push(Sender::User, "Hello".to_string())));
        assert!(events.contains(&SurfaceEvent::Push(Sender::Ai, PENDING_REPLY.to_string())));
        assert!(events.contains(&SurfaceEvent::Resolve("Sounds lovely!".to_string())));
        assert!(events.contains(&SurfaceEvent::ClearInput));
    }

    #[tokio::test]
    async fn test_chat_failure_resolves_pending_with_fallback() {
        let (_surface, _store, state, controller) = controller_with(
            FakeStore::default(),
            FakeGeneration::failing(),
            FakeSurface::default(),
        );

        controller.send_chat("Hello".to_string()).await;

        let transcript = state.transcript.lock().unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.last().unwrap().text, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_blank_chat_message_is_ignored() {
        let (surface, _, state, controller) = controller_with(
            FakeStore::default(),
            FakeGeneration::default(),
            FakeSurface::default(),
        );

        controller.send_chat("   ".to_string()).await;

        assert!(state.transcript.lock().unwrap().is_empty());
        assert!(surface.events().is_empty());
    }
}
