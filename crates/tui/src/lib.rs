pub mod app;
pub mod config;
pub mod controller;
pub mod keybinds;
pub mod text;
pub mod ui;
pub mod view;

pub use config::Config;
pub use controller::{AuthButtonProps, AuthController, AuthSession, ButtonVariant};
