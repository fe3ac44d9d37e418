//! Chat view model

use std::rc::Rc;
use std::sync::Arc;

use slint::{ComponentHandle, ModelRc, VecModel};

use crate::controller::DesignController;
use crate::{MainWindow, TranscriptEntry};

pub fn setup_chat_bindings(window: &MainWindow, controller: Arc<DesignController>) {
    // Transcript model starts empty; the surface appends to it
    window.set_transcript(ModelRc::from(Rc::new(VecModel::<TranscriptEntry>::default())));

    // Send button and Enter both land here
    let window_weak = window.as_weak();
    window.on_send_chat(move || {
        let window = match window_weak.upgrade() {
            Some(w) => w,
            None => return,
        };
        let text = window.get_chat_draft().to_string();
        let controller = controller.clone();
        tokio::spawn(async move { controller.send_chat(text).await });
    });
}
