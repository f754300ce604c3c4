//! Scene controller protocol
//!
//! Controllers observe the frame from outside the layers: they move the
//! camera, react to input and draw overlays. They never own actors. Every
//! hook has an empty default, and hooks of several controllers fire in
//! registration order for both the pre and the post phase.

use super::actor::AsAny;
use super::error::SceneError;
use super::world::SceneWorld;
use crate::physics::PhysicsWorld;
use crate::render::{ShapeRenderer, Surfaces};

/// Identifier returned by [`crate::scene::Scene::add_controller`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(pub(crate) u64);

/// Mutable access to the scene handed to perform and update hooks
pub struct ControllerContext<'a> {
    /// Scene state
    pub world: &'a mut SceneWorld,
    /// Physics collaborator
    pub physics: &'a mut dyn PhysicsWorld,
    /// Seconds since the previous frame
    pub delta: f32,
}

/// Observer of the scene's frame phases
pub trait SceneController: AsAny {
    /// Before anything else in the frame
    fn pre_perform(&mut self, _ctx: &mut ControllerContext<'_>) -> Result<(), SceneError> {
        Ok(())
    }

    /// After the update phase
    fn post_perform(&mut self, _ctx: &mut ControllerContext<'_>) -> Result<(), SceneError> {
        Ok(())
    }

    /// Right before the layers update
    fn pre_update(&mut self, _ctx: &mut ControllerContext<'_>) -> Result<(), SceneError> {
        Ok(())
    }

    /// Right after the layers update and removals flush
    fn post_update(&mut self, _ctx: &mut ControllerContext<'_>) -> Result<(), SceneError> {
        Ok(())
    }

    /// Before the layers draw; the camera matrix is already applied
    fn pre_draw(&mut self, _world: &SceneWorld, _surfaces: &mut Surfaces<'_>) {}

    /// After the layers draw, for screen-space overlays
    fn post_draw(&mut self, _world: &SceneWorld, _surfaces: &mut Surfaces<'_>) {}

    /// Before the debug pass
    fn pre_debug(&mut self, _world: &SceneWorld, _gizmos: &mut dyn ShapeRenderer) {}

    /// After the debug pass
    fn post_debug(&mut self, _world: &SceneWorld, _gizmos: &mut dyn ShapeRenderer) {}

    /// Release resources; may be called more than once
    fn dispose(&mut self) {}
}
