//! Menu Core - Hardware-independent logic for the ESP32 menu display
//!
//! This crate contains the menu fetch/display/update cycle and can be tested
//! on the host platform without requiring ESP32 hardware. The firmware crate
//! supplies the concrete WiFi, HTTP, time, display and touch capabilities
//! through the [`app::Platform`] trait.

pub mod app;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod http;
pub mod layout;
pub mod menu;
pub mod network;
pub mod screen;
pub mod surface;
pub mod theme;
pub mod touch;

pub use app::{MenuApp, Platform, UiEvent};
pub use error::{MenuError, NetworkError};
pub use menu::{MealCategory, MenuOfDay};
pub use network::ConnectionState;
