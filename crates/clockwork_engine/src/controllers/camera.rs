//! Camera controller
//!
//! Owns a camera, publishes it as the scene camera at the start of every
//! frame and moves it after the update phase: free panning with the right
//! mouse button, scroll zoom, or following an actor.

use crate::config::CameraConfig;
use crate::foundation::collections::ActorKey;
use crate::foundation::math::Vec2;
use crate::input::MouseButton;
use crate::render::{ShapeRenderer, Surfaces};
use crate::scene::{Camera2D, ControllerContext, SceneController, SceneError, SceneWorld};

/// How the camera tracks its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowMode {
    /// Locked onto the target
    Static,
    /// Eases toward the target
    Tracing,
    /// Moves only when the target leaves a radius around the centre
    Distant,
    /// Ignores the target; panned with the mouse
    Free,
}

/// Scene controller driving the scene camera
#[derive(Debug)]
pub struct CameraController {
    camera: Camera2D,
    /// Tracking behavior
    pub mode: FollowMode,
    follow: Option<ActorKey>,
    /// Pointer-delta multiplier while panning
    pub pan_speed: f32,
    /// Fraction of the remaining distance covered per second in tracing mode
    pub trace_rate: f32,
    /// Dead-zone radius in distant mode
    pub distance: f32,
}

impl CameraController {
    /// Free camera built from settings
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            camera: Camera2D::from_config(config),
            mode: FollowMode::Free,
            follow: None,
            pan_speed: config.pan_speed,
            trace_rate: 5.0,
            distance: 100.0,
        }
    }

    /// Follow an actor
    pub fn follow(&mut self, target: ActorKey, mode: FollowMode) {
        self.follow = Some(target);
        self.mode = mode;
    }

    /// Stop following and become a free camera
    pub fn stop_following(&mut self) {
        self.follow = None;
        self.mode = FollowMode::Free;
    }

    /// Followed actor
    pub fn target(&self) -> Option<ActorKey> {
        self.follow
    }

    /// Controlled camera
    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    /// Mutable controlled camera
    pub fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }

    fn pan(&mut self, world: &SceneWorld) {
        let input = world.input();
        if input.is_button_down(MouseButton::Right) {
            let delta = input.pointer_delta();
            let up = if self.camera.y_down { -1.0 } else { 1.0 };
            self.camera
                .translate(Vec2::new(-delta.x * self.pan_speed, up * delta.y * self.pan_speed));
        }
    }

    fn chase(&mut self, target: Vec2, delta: f32) {
        let position = self.camera.position;
        match self.mode {
            FollowMode::Static => self.camera.position = target,
            FollowMode::Tracing => {
                let t = (self.trace_rate * delta).clamp(0.0, 1.0);
                self.camera.position = position + (target - position) * t;
            }
            FollowMode::Distant => {
                let offset = target - position;
                let length = offset.magnitude();
                if length > self.distance {
                    self.camera.position = position + offset * ((length - self.distance) / length);
                }
            }
            FollowMode::Free => {}
        }
    }
}

impl SceneController for CameraController {
    fn pre_perform(&mut self, ctx: &mut ControllerContext<'_>) -> Result<(), SceneError> {
        *ctx.world.camera_mut() = self.camera.clone();
        Ok(())
    }

    fn post_update(&mut self, ctx: &mut ControllerContext<'_>) -> Result<(), SceneError> {
        let scroll = ctx.world.input().scroll();
        if scroll != 0 {
            self.camera.apply_zoom_steps(scroll);
        }

        match self.follow {
            Some(target) if self.mode != FollowMode::Free => {
                match ctx.world.position_of(target, &*ctx.physics) {
                    Ok(position) => self.chase(position, ctx.delta),
                    Err(SceneError::UnknownActor(_)) => {
                        log::debug!("Camera target {:?} is gone", target);
                        self.stop_following();
                    }
                    Err(err) => return Err(err),
                }
            }
            _ => self.pan(&*ctx.world),
        }

        *ctx.world.camera_mut() = self.camera.clone();
        Ok(())
    }

    fn pre_draw(&mut self, _world: &SceneWorld, surfaces: &mut Surfaces<'_>) {
        surfaces.batch.set_projection(&self.camera.combined());
    }

    fn pre_debug(&mut self, _world: &SceneWorld, gizmos: &mut dyn ShapeRenderer) {
        gizmos.set_projection(&self.camera.combined());
    }

    fn dispose(&mut self) {
        self.follow = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn controller() -> CameraController {
        CameraController::new(&CameraConfig::default())
    }

    #[test]
    fn test_tracing_eases_toward_target() {
        let mut camera = controller();
        camera.mode = FollowMode::Tracing;
        camera.trace_rate = 5.0;

        camera.chase(Vec2::new(100.0, 0.0), 0.1);
        assert_relative_eq!(camera.camera().position.x, 50.0, epsilon = 1e-4);
    }

    #[test]
    fn test_distant_keeps_target_on_the_dead_zone_edge() {
        let mut camera = controller();
        camera.mode = FollowMode::Distant;
        camera.distance = 10.0;

        camera.chase(Vec2::new(5.0, 0.0), 0.1);
        assert_eq!(camera.camera().position, Vec2::zeros());

        camera.chase(Vec2::new(30.0, 0.0), 0.1);
        assert_relative_eq!(camera.camera().position.x, 20.0, epsilon = 1e-4);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut camera = controller();
        let mut keys = crate::foundation::collections::SlotMap::<ActorKey, ()>::with_key();
        camera.follow(keys.insert(()), FollowMode::Static);

        camera.dispose();
        camera.dispose();
        assert_eq!(camera.target(), None);
    }
}
