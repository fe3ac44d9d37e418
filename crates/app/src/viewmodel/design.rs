//! Design view model
//!
//! Binds the option groups and the generate/save/load triggers. The
//! callbacks keep the selection mirror in `AppState` in lockstep with the
//! option models, and enforce single-choice semantics for theme and room.

use std::rc::Rc;
use std::sync::Arc;

use slint::{ComponentHandle, Model, ModelRc, VecModel};

use crate::controller::DesignController;
use crate::state::AppState;
use crate::{MainWindow, OptionItem};

fn option_model(values: &[String]) -> ModelRc<OptionItem> {
    let items: Vec<OptionItem> = values
        .iter()
        .map(|name| OptionItem {
            name: name.as_str().into(),
            checked: false,
        })
        .collect();
    ModelRc::from(Rc::new(VecModel::from(items)))
}

/// Exclusively check `index` in an option model; returns the picked name.
fn pick_exclusive(model: &ModelRc<OptionItem>, index: i32) -> Option<String> {
    let mut picked = None;
    for i in 0..model.row_count() {
        if let Some(mut item) = model.row_data(i) {
            item.checked = i as i32 == index;
            if item.checked {
                picked = Some(item.name.to_string());
            }
            model.set_row_data(i, item);
        }
    }
    picked
}

pub fn setup_design_bindings(
    window: &MainWindow,
    state: Arc<AppState>,
    controller: Arc<DesignController>,
) {
    // Populate the option groups from the catalog
    window.set_themes(option_model(&state.catalog.themes));
    window.set_rooms(option_model(&state.catalog.rooms));
    window.set_furniture(option_model(&state.catalog.furniture));

    // Theme choice is exclusive
    let state_theme = state.clone();
    let window_weak = window.as_weak();
    window.on_theme_picked(move |index| {
        let window = match window_weak.upgrade() {
            Some(w) => w,
            None => return,
        };
        let picked = pick_exclusive(&window.get_themes(), index);
        state_theme.selection.lock().unwrap().theme = picked;
    });

    // Room choice is exclusive
    let state_room = state.clone();
    let window_weak = window.as_weak();
    window.on_room_picked(move |index| {
        let window = match window_weak.upgrade() {
            Some(w) => w,
            None => return,
        };
        let picked = pick_exclusive(&window.get_rooms(), index);
        state_room.selection.lock().unwrap().room = picked;
    });

    // Furniture is a set
    let state_furniture = state.clone();
    let window_weak = window.as_weak();
    window.on_furniture_toggled(move |index, checked| {
        let window = match window_weak.upgrade() {
            Some(w) => w,
            None => return,
        };
        let furniture = window.get_furniture();
        let mut item = match furniture.row_data(index as usize) {
            Some(item) => item,
            None => return,
        };
        item.checked = checked;
        let name = item.name.to_string();
        furniture.set_row_data(index as usize, item);

        let mut selection = state_furniture.selection.lock().unwrap();
        if checked {
            selection.push_furniture(name);
        } else {
            selection.remove_furniture(&name);
        }
    });

    // Each trigger spawns exactly one controller operation
    let generate = controller.clone();
    window.on_generate_design(move || {
        let controller = generate.clone();
        tokio::spawn(async move { controller.generate().await });
    });

    let save = controller.clone();
    window.on_save_design(move || {
        let controller = save.clone();
        tokio::spawn(async move { controller.save().await });
    });

    let load = controller;
    window.on_load_design(move || {
        let controller = load.clone();
        tokio::spawn(async move { controller.load().await });
    });
}
