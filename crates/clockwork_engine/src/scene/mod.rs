//! Scene orchestration
//!
//! A [`Scene`] is a [`SceneWorld`] (actors, layers, transforms, camera) plus
//! the controllers observing it. [`Scene::perform`] runs one full frame:
//!
//! 1. `pre_perform`, then `pre_update` on every controller
//! 2. one update pass over the layers, flushing removals
//! 3. `post_update`, then `post_perform` on every controller
//! 4. the camera matrix is applied to both renderers
//! 5. `pre_draw`, layer draw in paint order, `post_draw`
//! 6. in debug mode: `pre_debug`, layer debug draw, `post_debug`

pub mod actor;
pub mod camera;
pub mod controller;
pub mod error;
pub mod layer;
pub mod tag;
pub mod transform;
pub mod world;

#[cfg(test)]
mod tests;

pub use actor::{
    Actor, ActorContext, ActorCore, ActorDesc, AsAny, Damageable, DrawContext, ImpactSounding, LifecycleState,
};
pub use camera::Camera2D;
pub use controller::{ControllerContext, ControllerId, SceneController};
pub use error::SceneError;
pub use layer::{Layer, LayerId};
pub use tag::TagRegistry;
pub use transform::{TransformNode, TransformTree};
pub use world::SceneWorld;

use crate::config::SceneConfig;
use crate::foundation::collections::ActorKey;
use crate::input::InputSnapshot;
use crate::physics::PhysicsWorld;
use crate::render::{ShapeRenderer, SpriteBatch, Surfaces};

/// Services and input for one frame
pub struct Frame<'a> {
    /// Seconds since the previous frame
    pub delta: f32,
    /// Input captured for this frame
    pub input: &'a InputSnapshot,
    /// Physics collaborator
    pub physics: &'a mut dyn PhysicsWorld,
    /// Sprite batcher
    pub batch: &'a mut dyn SpriteBatch,
    /// Debug shape renderer
    pub gizmos: &'a mut dyn ShapeRenderer,
}

/// Layers of actors, a camera and the controllers observing them
pub struct Scene {
    world: SceneWorld,
    controllers: Vec<(ControllerId, Box<dyn SceneController>)>,
    next_controller: u64,
    /// Run the debug pass after drawing
    pub debug_draw: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneWorld::default())
    }
}

impl Scene {
    /// Scene around an existing world
    pub fn new(world: SceneWorld) -> Self {
        Self {
            world,
            controllers: Vec::new(),
            next_controller: 0,
            debug_draw: false,
        }
    }

    /// Scene configured from settings
    pub fn from_config(scene: &SceneConfig, camera: Camera2D) -> Self {
        let mut this = Self::new(SceneWorld::new(camera));
        this.debug_draw = scene.debug_draw;
        this
    }

    /// Scene state
    pub fn world(&self) -> &SceneWorld {
        &self.world
    }

    /// Mutable scene state
    pub fn world_mut(&mut self) -> &mut SceneWorld {
        &mut self.world
    }

    /// Insert an actor into a layer; `create` runs before this returns
    pub fn add(
        &mut self,
        layer: LayerId,
        desc: ActorDesc,
        actor: Box<dyn Actor>,
        physics: &mut dyn PhysicsWorld,
    ) -> Result<ActorKey, SceneError> {
        self.world.add(layer, desc, actor, physics)
    }

    /// Insert an actor into the layer at a declaration index
    pub fn add_at(
        &mut self,
        index: usize,
        desc: ActorDesc,
        actor: Box<dyn Actor>,
        physics: &mut dyn PhysicsWorld,
    ) -> Result<ActorKey, SceneError> {
        let layer = LayerId::from_index(index).ok_or_else(|| {
            log::error!("No layer at index {}", index);
            SceneError::UnknownLayer(index)
        })?;
        self.world.add(layer, desc, actor, physics)
    }

    /// Request removal of an actor
    pub fn remove(&mut self, key: ActorKey) -> bool {
        self.world.remove(key)
    }

    /// Register a controller; hooks run in registration order
    pub fn add_controller(&mut self, controller: Box<dyn SceneController>) -> ControllerId {
        let id = ControllerId(self.next_controller);
        self.next_controller += 1;
        self.controllers.push((id, controller));
        id
    }

    /// Unregister and dispose a controller
    pub fn remove_controller(&mut self, id: ControllerId) -> bool {
        let Some(at) = self.controllers.iter().position(|(cid, _)| *cid == id) else {
            return false;
        };
        let (_, mut controller) = self.controllers.remove(at);
        controller.dispose();
        true
    }

    /// First registered controller of a concrete type
    pub fn controller<T: SceneController>(&self) -> Option<&T> {
        self.controllers
            .iter()
            .find_map(|(_, c)| (**c).as_any().downcast_ref::<T>())
    }

    /// First registered controller of a concrete type, mutably
    pub fn controller_mut<T: SceneController>(&mut self) -> Option<&mut T> {
        self.controllers
            .iter_mut()
            .find_map(|(_, c)| (**c).as_any_mut().downcast_mut::<T>())
    }

    /// Number of registered controllers
    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    /// Run one frame
    pub fn perform(&mut self, frame: Frame<'_>) -> Result<(), SceneError> {
        let Frame {
            delta,
            input,
            physics,
            batch,
            gizmos,
        } = frame;
        log::trace!("Frame begins, delta {:.4}", delta);
        self.world.set_input(input.clone());

        self.for_each_controller(physics, delta, |c, ctx| c.pre_perform(ctx))?;
        self.for_each_controller(physics, delta, |c, ctx| c.pre_update(ctx))?;
        self.world.update(delta, physics)?;
        self.for_each_controller(physics, delta, |c, ctx| c.post_update(ctx))?;
        self.for_each_controller(physics, delta, |c, ctx| c.post_perform(ctx))?;

        let combined = self.world.camera().combined();
        batch.set_projection(&combined);
        gizmos.set_projection(&combined);

        let physics: &dyn PhysicsWorld = physics;
        {
            let mut surfaces = Surfaces {
                batch: &mut *batch,
                gizmos: &mut *gizmos,
            };
            for (_, controller) in &mut self.controllers {
                controller.pre_draw(&self.world, &mut surfaces);
            }
            for layer in LayerId::ALL {
                self.world.draw_layer(layer, &mut *surfaces.batch, physics);
            }
            for (_, controller) in &mut self.controllers {
                controller.post_draw(&self.world, &mut surfaces);
            }
        }

        if self.debug_draw {
            for (_, controller) in &mut self.controllers {
                controller.pre_debug(&self.world, &mut *gizmos);
            }
            for layer in LayerId::ALL {
                self.world.debug_layer(layer, &mut *gizmos, physics);
            }
            for (_, controller) in &mut self.controllers {
                controller.post_debug(&self.world, &mut *gizmos);
            }
        }
        log::trace!("Frame ends");
        Ok(())
    }

    /// Dispose every actor on every layer without consulting `destroy`
    pub fn clear(&mut self, physics: &mut dyn PhysicsWorld) -> Result<(), SceneError> {
        self.world.clear(physics)
    }

    /// Clear the scene and dispose every controller
    pub fn dispose(&mut self, physics: &mut dyn PhysicsWorld) -> Result<(), SceneError> {
        let cleared = self.clear(physics);
        for (_, controller) in &mut self.controllers {
            controller.dispose();
        }
        self.controllers.clear();
        cleared
    }

    fn for_each_controller(
        &mut self,
        physics: &mut dyn PhysicsWorld,
        delta: f32,
        mut hook: impl FnMut(&mut dyn SceneController, &mut ControllerContext<'_>) -> Result<(), SceneError>,
    ) -> Result<(), SceneError> {
        let mut ctx = ControllerContext {
            world: &mut self.world,
            physics,
            delta,
        };
        for (_, controller) in &mut self.controllers {
            hook(&mut **controller, &mut ctx)?;
        }
        Ok(())
    }
}
