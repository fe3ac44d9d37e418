//! View model bindings for Slint UI

mod chat;
mod design;

use std::sync::Arc;

use crate::controller::DesignController;
use crate::state::AppState;
use crate::MainWindow;

pub fn setup_bindings(
    window: &MainWindow,
    state: Arc<AppState>,
    controller: Arc<DesignController>,
) {
    design::setup_design_bindings(window, state, controller.clone());
    chat::setup_chat_bindings(window, controller);
}
