//! In-game "back to menu" overlay

use crate::foundation::math::{Mat4, Orthographic3, Vec2, Vec3};
use crate::input::KeyCode;
use crate::render::{Rect, Surfaces, TextureId};
use crate::scene::{ControllerContext, SceneController, SceneError, SceneWorld};

/// Toggles a confirmation overlay with Escape
///
/// While the overlay is shown, Enter or Y confirms leaving the level and N
/// hides it again. The host polls [`MenuController::exit_requested`] and
/// switches screens.
#[derive(Debug)]
pub struct MenuController {
    texture: TextureId,
    size: Vec2,
    /// Overlay visibility
    pub show_menu: bool,
    exit_requested: bool,
}

impl MenuController {
    /// Overlay drawing `texture` at `size` pixels
    pub fn new(texture: TextureId, size: Vec2) -> Self {
        Self {
            texture,
            size,
            show_menu: false,
            exit_requested: false,
        }
    }

    /// Did the player confirm leaving
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    fn screen_projection(world: &SceneWorld) -> Mat4 {
        let camera = world.camera();
        Orthographic3::new(0.0, camera.viewport_width, 0.0, camera.viewport_height, -1.0, 1.0).to_homogeneous()
    }
}

impl SceneController for MenuController {
    fn pre_update(&mut self, ctx: &mut ControllerContext<'_>) -> Result<(), SceneError> {
        let input = ctx.world.input();
        if input.is_key_just_pressed(KeyCode::Escape) {
            self.show_menu = !self.show_menu;
        }

        if self.show_menu {
            if input.is_key_just_pressed(KeyCode::Enter) || input.is_key_just_pressed(KeyCode::Y) {
                log::info!("Leaving the level from the pause menu");
                self.exit_requested = true;
            } else if input.is_key_just_pressed(KeyCode::N) {
                self.show_menu = false;
            }
        }
        Ok(())
    }

    fn post_draw(&mut self, world: &SceneWorld, surfaces: &mut Surfaces<'_>) {
        if !self.show_menu {
            return;
        }
        let camera = world.camera();
        let previous = surfaces.batch.projection();
        surfaces.batch.set_projection(&Self::screen_projection(world));

        let center = Mat4::new_translation(&Vec3::new(
            camera.viewport_width * 0.5,
            camera.viewport_height * 0.5,
            0.0,
        ));
        surfaces.batch.begin();
        surfaces
            .batch
            .draw_sprite(&self.texture, &center, Rect::centered(self.size.x, self.size.y));
        surfaces.batch.end();

        surfaces.batch.set_projection(&previous);
    }
}
