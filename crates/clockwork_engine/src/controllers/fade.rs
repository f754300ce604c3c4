//! Full-screen fade transitions

use crate::foundation::math::Mat4;
use crate::render::{Color, Rect, ShapeKind, Surfaces};
use crate::scene::{ControllerContext, SceneController, SceneError, SceneWorld};

/// Direction of a fade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeKind {
    /// Overlay goes from clear to the fade color
    In,
    /// Overlay goes from the fade color to clear
    Out,
}

/// Draws a full-screen colored overlay whose alpha follows the fade progress
#[derive(Debug)]
pub struct FadeController {
    kind: FadeKind,
    duration: f32,
    /// Extra time held at the end before the fade counts as done
    pub delay: f32,
    /// Overlay color at full strength
    pub color: Color,
    started: bool,
    has_run: bool,
    tick: f32,
}

impl FadeController {
    /// Fade lasting `duration` seconds, optionally started immediately
    pub fn new(kind: FadeKind, duration: f32, start_now: bool) -> Self {
        let mut fade = Self {
            kind,
            duration,
            delay: 0.0,
            color: Color::BLACK,
            started: false,
            has_run: false,
            tick: 0.0,
        };
        if start_now {
            fade.start();
        }
        fade
    }

    /// Restart from the beginning
    pub fn start(&mut self) {
        self.started = true;
        self.has_run = true;
        self.tick = 0.0;
    }

    /// Advance by `delta` seconds; returns false when not running
    pub fn advance(&mut self, delta: f32) -> bool {
        if !self.started {
            return false;
        }
        self.tick += delta;
        let end = self.duration + self.delay;
        if self.tick >= end {
            self.tick = end;
            self.started = false;
        }
        true
    }

    /// Progress in `[0, 1]`
    pub fn current(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.tick.max(0.0) / self.duration).min(1.0)
    }

    /// Is the fade running
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Has the fade and its delay elapsed
    pub fn is_done(&self) -> bool {
        self.tick >= self.duration + self.delay
    }

    /// Overlay alpha for the current progress
    pub fn alpha(&self) -> f32 {
        match self.kind {
            FadeKind::In => (self.current() * self.color.a).min(1.0),
            FadeKind::Out => ((1.0 - self.current()) * self.color.a).max(0.0),
        }
    }
}

impl SceneController for FadeController {
    fn pre_perform(&mut self, ctx: &mut ControllerContext<'_>) -> Result<(), SceneError> {
        self.advance(ctx.delta);
        Ok(())
    }

    fn post_draw(&mut self, _world: &SceneWorld, surfaces: &mut Surfaces<'_>) {
        // a finished fade keeps its final overlay
        if !self.has_run {
            return;
        }
        let gizmos = &mut *surfaces.gizmos;
        let previous = gizmos.projection();
        gizmos.set_projection(&Mat4::identity());
        gizmos.set_transform(&Mat4::identity());
        gizmos.begin(ShapeKind::Filled);
        gizmos.draw_rect(Rect::new(-1.0, -1.0, 2.0, 2.0), self.color.with_alpha(self.alpha()));
        gizmos.end();
        gizmos.set_projection(&previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RecordingBatch, RecordingShapes, ShapeCall};
    use approx::assert_relative_eq;

    #[test]
    fn test_progress_and_delay() {
        let mut fade = FadeController::new(FadeKind::In, 2.0, true);
        fade.delay = 1.0;

        fade.advance(1.0);
        assert_relative_eq!(fade.current(), 0.5);
        assert_relative_eq!(fade.alpha(), 0.5);

        fade.advance(1.5);
        assert_relative_eq!(fade.current(), 1.0);
        assert!(fade.is_started());
        assert!(!fade.is_done());

        fade.advance(1.0);
        assert!(!fade.is_started());
        assert!(fade.is_done());
        assert!(!fade.advance(1.0));
    }

    #[test]
    fn test_fade_out_alpha_falls() {
        let mut fade = FadeController::new(FadeKind::Out, 1.0, true);
        assert_relative_eq!(fade.alpha(), 1.0);
        fade.advance(0.25);
        assert_relative_eq!(fade.alpha(), 0.75);
    }

    #[test]
    fn test_not_drawn_before_start() {
        let world = SceneWorld::default();
        let mut fade = FadeController::new(FadeKind::In, 1.0, false);
        let mut batch = RecordingBatch::new();
        let mut gizmos = RecordingShapes::new();

        fade.post_draw(&world, &mut Surfaces { batch: &mut batch, gizmos: &mut gizmos });
        assert!(gizmos.calls().is_empty());

        fade.start();
        fade.advance(0.5);
        fade.post_draw(&world, &mut Surfaces { batch: &mut batch, gizmos: &mut gizmos });
        assert!(gizmos
            .calls()
            .contains(&ShapeCall::Rect(Rect::new(-1.0, -1.0, 2.0, 2.0), Color::BLACK.with_alpha(0.5))));
    }

    #[test]
    fn test_zero_length_fade_waits_for_start() {
        let world = SceneWorld::default();
        let mut fade = FadeController::new(FadeKind::In, 0.0, false);
        let mut batch = RecordingBatch::new();
        let mut gizmos = RecordingShapes::new();
        assert!(fade.is_done());

        fade.post_draw(&world, &mut Surfaces { batch: &mut batch, gizmos: &mut gizmos });
        assert!(gizmos.calls().is_empty());

        fade.start();
        fade.advance(0.016);
        fade.post_draw(&world, &mut Surfaces { batch: &mut batch, gizmos: &mut gizmos });
        assert!(gizmos
            .calls()
            .contains(&ShapeCall::Rect(Rect::new(-1.0, -1.0, 2.0, 2.0), Color::BLACK)));
    }
}
