//! Device semantics for the automation client
//!
//! Classifies devices into categories and maps a user intent on a device
//! ("toggle it", "pause it") to the backend service that performs it.

pub mod actions;
pub mod category;

pub use actions::{
    resolve_media_nav, resolve_play_pause, resolve_toggle_service, toggle_call, ServiceCall,
};
pub use category::{DeviceCategory, UnknownCategory};
