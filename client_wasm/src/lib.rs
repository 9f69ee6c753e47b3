//! Browser clients for two-controller Pong
//!
//! The screen page runs the simulation on a canvas and shows the join QR
//! code. Phone pages are thin controllers that relay left/right input.
//! App logic lives in plain Rust so it can be tested natively; `web` holds
//! the wasm32-only DOM, timer and socket glue.

pub mod controller;
pub mod input;
pub mod network;
pub mod screen;
pub mod state;

#[cfg(target_arch = "wasm32")]
mod web;

pub use controller::{ControllerApp, ControllerPhase};
pub use screen::ScreenApp;
pub use state::ScreenView;

#[cfg(target_arch = "wasm32")]
pub use web::{start_controller, start_screen, CanvasRenderer, RafScheduler};
