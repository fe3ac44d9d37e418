//! Decora - AI-assisted interior design studio
//!
//! Desktop application: pick a theme, room, and furniture, generate a
//! design mock-up, save and reload designs, and chat with the assistant
//! about the result.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod controller;
mod state;
mod surface;
mod viewmodel;

slint::include_modules!();

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Decora");

    // Initialize tokio runtime for gateway calls
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let _guard = runtime.enter();

    let config = match decora_core::AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize application state
    let app_state = match state::AppState::new(&config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    // Create main window
    let main_window = MainWindow::new().unwrap();

    let surface = Arc::new(surface::WindowSurface::new(
        main_window.as_weak(),
        app_state.clone(),
        preview_cache_dir(),
    ));
    let controller = Arc::new(controller::build_controller(
        &config,
        surface,
        app_state.clone(),
    ));

    // Set up view model bindings
    viewmodel::setup_bindings(&main_window, app_state, controller);

    // Run the application
    main_window.run().unwrap();
}

/// Cache directory for downloaded image previews. Falls back to the
/// system temp dir when platform directories are unavailable.
fn preview_cache_dir() -> std::path::PathBuf {
    let dir = match decora_core::config::project_dirs() {
        Ok(dirs) => dirs.cache_dir().to_path_buf(),
        Err(e) => {
            tracing::warn!("Falling back to temp dir for previews: {}", e);
            std::env::temp_dir().join("decora")
        }
    };
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(path = %dir.display(), "Could not create preview cache dir: {}", e);
    }
    dir
}
