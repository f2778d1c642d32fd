// Input handling for the doll viewer
//
// - `action`: viewer actions and default key bindings
// - `config`: key-to-action mapping, resolved straight from winit key events

pub mod action;
pub mod config;

pub use action::Action;
pub use config::InputConfig;
