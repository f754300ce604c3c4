//! Frame driver
//!
//! Bundles the scene, the physics world, the frame timer and the settings
//! into one explicit context the host owns.

use std::path::Path;

use thiserror::Error;

use crate::config::{Config, ConfigError, EngineConfig};
use crate::foundation::{logging, time::Timer};
use crate::input::InputSnapshot;
use crate::physics::{PhysicsWorld, SimplePhysicsWorld};
use crate::render::{ShapeRenderer, SpriteBatch};
use crate::scene::{Camera2D, Frame, Scene, SceneError};

/// Main engine struct
///
/// Each frame steps the physics world, hands new contacts to the actors,
/// copies body poses into transforms and then performs the scene.
pub struct Engine {
    /// Layers, actors and controllers
    pub scene: Scene,

    /// Physics collaborator
    pub physics: Box<dyn PhysicsWorld>,

    /// Frame timing
    timer: Timer,

    /// Engine configuration
    config: EngineConfig,
}

impl Engine {
    /// Engine with the reference physics world
    pub fn new(config: EngineConfig) -> Self {
        Self::with_physics(config, Box::new(SimplePhysicsWorld::new()))
    }

    /// Engine with a host-provided physics world
    pub fn with_physics(config: EngineConfig, physics: Box<dyn PhysicsWorld>) -> Self {
        log::info!("Initializing engine...");
        let camera = Camera2D::from_config(&config.camera);
        Self {
            scene: Scene::from_config(&config.scene, camera),
            physics,
            timer: Timer::new(),
            config,
        }
    }

    /// Load settings from a TOML or RON file, initialise logging and build the engine
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let config = EngineConfig::load_from_file(path)?;
        logging::init_with_level(&config.logging.default_level);
        Ok(Self::new(config))
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Frame timer
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Run one frame with an explicit delta
    pub fn perform_systems_job(
        &mut self,
        delta: f32,
        input: &InputSnapshot,
        batch: &mut dyn SpriteBatch,
        gizmos: &mut dyn ShapeRenderer,
    ) -> Result<(), EngineError> {
        let physics = &mut *self.physics;
        physics.step(delta);
        let contacts = physics.drain_contacts();
        self.scene.world_mut().dispatch_contacts(&contacts, physics)?;
        self.scene.world_mut().sync_bodies(physics)?;
        self.scene.perform(Frame {
            delta,
            input,
            physics,
            batch,
            gizmos,
        })?;
        Ok(())
    }

    /// Run one frame timed by the engine clock
    pub fn frame(
        &mut self,
        input: &InputSnapshot,
        batch: &mut dyn SpriteBatch,
        gizmos: &mut dyn ShapeRenderer,
    ) -> Result<f32, EngineError> {
        let delta = self.timer.tick();
        self.perform_systems_job(delta, input, batch, gizmos)?;
        Ok(delta)
    }

    /// Dispose every actor and controller
    pub fn shutdown(&mut self) -> Result<(), EngineError> {
        log::info!("Shutting down engine after {} frames", self.timer.frame_count());
        self.scene.dispose(&mut *self.physics)?;
        Ok(())
    }
}

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Scene failure that aborted a frame
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
