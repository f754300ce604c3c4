//! # Clockwork Engine
//!
//! Scene, layer and actor orchestration for 2D physics platformers.
//!
//! ## Features
//!
//! - **Layered scene**: seven fixed layers drawn in order, actors drawn in insertion order
//! - **Actor lifecycle**: create once, deferred removal with veto, dispose once
//! - **Transform tree**: arena-backed parent/child transforms
//! - **Physics binding**: one body per actor, released on dispose
//! - **Controllers**: camera, pause menu and fade overlays hooked around each pass
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clockwork_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     clockwork_engine::foundation::logging::init();
//!
//!     let mut engine = Engine::new(EngineConfig::default());
//!     let texture = TextureId::new("assets/paperball.png");
//!     engine.scene.add(
//!         LayerId::Action1,
//!         ActorDesc::new(1).with_tag("decoration"),
//!         Box::new(SpriteActor::new(texture, Rect::centered(68.0, 68.0))),
//!         engine.physics.as_mut(),
//!     )?;
//!
//!     let mut batch = RecordingBatch::new();
//!     let mut gizmos = RecordingShapes::new();
//!     engine.frame(&InputSnapshot::empty(), &mut batch, &mut gizmos)?;
//!     engine.shutdown()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod actors;
pub mod config;
pub mod controllers;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod render;
pub mod scene;

mod engine;

pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        actors::{BodySpriteActor, SpriteActor},
        config::{Config, EngineConfig},
        controllers::{CameraController, FadeController, FadeKind, FollowMode, MenuController},
        foundation::{
            collections::{ActorKey, BodyHandle},
            math::{Mat4, Transform2D, Vec2, Vec3},
            time::Timer,
        },
        input::{InputSnapshot, KeyCode, MouseButton},
        physics::{BodyDef, BodyType, Material, PhysicsBody, PhysicsWorld, Shape, SimplePhysicsWorld},
        render::{Color, Rect, RecordingBatch, RecordingShapes, ShapeRenderer, SpriteBatch, TextureId},
        scene::{
            Actor, ActorContext, ActorDesc, Camera2D, Damageable, DrawContext, Frame, ImpactSounding,
            LayerId, LifecycleState, Scene, SceneController, SceneError, SceneWorld,
        },
        Engine, EngineError,
    };
}
