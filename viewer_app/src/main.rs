//! Scene viewer application
//!
//! Opens the main window with a first-person controller and runs until the window is
//! closed or Escape is pressed.
//!
//! Usage: `scene_viewer [config.toml|config.ron]`. Without an argument
//! `scene_viewer.toml` is read from the working directory when present.

mod controller;
mod movement;
mod scene;
mod view;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use viewer_engine::foundation::logging;
use viewer_engine::prelude::*;

use controller::ViewerController;

const DEFAULT_CONFIG_PATH: &str = "scene_viewer.toml";

/// Load the configuration named on the command line, or the default file if present
fn load_config() -> Result<(ViewerConfig, Option<PathBuf>), ConfigError> {
    let path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            if !default.exists() {
                return Ok((ViewerConfig::default(), None));
            }
            default
        }
    };

    let config = ViewerConfig::load_from_file(&path)?;
    config.validate()?;
    Ok((config, Some(path)))
}

fn run(config: &ViewerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let controller = Rc::new(RefCell::new(ViewerController::new(config.window.title.as_str())));
    let shared: SharedController = controller.clone();

    let window = Window::main_window();
    window.set_gamepad_profile(config.gamepad.clone());
    window.set_controller(Some(shared));
    window.open_with_config(&config.window)?;

    while window.is_visible() {
        if controller.borrow().quit_requested() {
            break;
        }
        window.update();
    }

    window.close();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic: {}", panic_info);
        eprintln!("PANIC occurred: {panic_info}");
    }));

    let (config, source) = load_config()?;
    logging::init_with_level(&config.log_level);
    match &source {
        Some(path) => log::info!("Loaded configuration from {}", path.display()),
        None => log::info!("No {} found, using defaults", DEFAULT_CONFIG_PATH),
    }

    log::info!("Starting scene viewer");
    match run(&config) {
        Ok(()) => {
            log::info!("Scene viewer finished");
            Ok(())
        }
        Err(e) => {
            log::error!("Scene viewer failed: {}", e);
            Err(e)
        }
    }
}
