//! Built-in actors

pub mod body_sprite;
pub mod sprite;

pub use body_sprite::BodySpriteActor;
pub use sprite::SpriteActor;
