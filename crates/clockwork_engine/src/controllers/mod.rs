//! Built-in scene controllers

pub mod camera;
pub mod fade;
pub mod menu;

pub use camera::{CameraController, FollowMode};
pub use fade::{FadeController, FadeKind};
pub use menu::MenuController;
