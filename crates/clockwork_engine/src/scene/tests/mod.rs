//! Scenario tests for scene orchestration
//!
//! Spy actors and controllers append events such as `"update:a"` to a
//! shared log so tests can assert exact call sequences across a frame.

mod orchestration;

use std::cell::RefCell;
use std::rc::Rc;

use super::{
    Actor, ActorContext, ActorDesc, ControllerContext, DrawContext, Frame, LayerId, Scene, SceneController,
    SceneError, SceneWorld,
};
use crate::foundation::collections::{ActorKey, BodyHandle};
use crate::input::InputSnapshot;
use crate::physics::{PhysicsBody, PhysicsWorld, SimplePhysicsWorld};
use crate::render::{
    draw_axes_gizmo, Rect, RecordingBatch, RecordingShapes, ShapeRenderer, SpriteBatch, Surfaces, TextureId,
};

pub(super) type Log = Rc<RefCell<Vec<String>>>;

pub(super) fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub(super) fn take(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

fn push(log: &Log, event: &str, name: &str) {
    log.borrow_mut().push(format!("{event}:{name}"));
}

type Hook = Box<dyn FnMut(&mut ActorContext<'_>) -> Result<(), SceneError>>;

/// Actor recording every callback it receives
pub(super) struct Spy {
    name: String,
    log: Log,
    on_update: Option<Hook>,
    vetoes: u32,
    fail_create: bool,
    body: Option<PhysicsBody>,
    claims: Option<BodyHandle>,
    leak_body: bool,
}

impl Spy {
    pub(super) fn new(name: &str, log: &Log) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            on_update: None,
            vetoes: 0,
            fail_create: false,
            body: None,
            claims: None,
            leak_body: false,
        }
    }

    pub(super) fn on_update(mut self, hook: impl FnMut(&mut ActorContext<'_>) -> Result<(), SceneError> + 'static) -> Self {
        self.on_update = Some(Box::new(hook));
        self
    }

    pub(super) fn vetoing(mut self, times: u32) -> Self {
        self.vetoes = times;
        self
    }

    pub(super) fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub(super) fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    pub(super) fn claiming(mut self, body: BodyHandle) -> Self {
        self.claims = Some(body);
        self
    }

    pub(super) fn leaking_body(mut self) -> Self {
        self.leak_body = true;
        self
    }

    pub(super) fn boxed(self) -> Box<dyn Actor> {
        Box::new(self)
    }
}

impl Actor for Spy {
    fn create(&mut self, _ctx: &mut ActorContext<'_>) -> Result<(), SceneError> {
        push(&self.log, "create", &self.name);
        if self.fail_create {
            return Err(SceneError::actor(0, "create refused"));
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, _delta: f32) -> Result<(), SceneError> {
        push(&self.log, "update", &self.name);
        match self.on_update.as_mut() {
            Some(hook) => hook(ctx),
            None => Ok(()),
        }
    }

    fn draw(&self, ctx: &DrawContext<'_>, batch: &mut dyn SpriteBatch) {
        push(&self.log, "draw", &self.name);
        batch.draw_sprite(&TextureId::new(self.name.clone()), &ctx.world_transform(), Rect::centered(1.0, 1.0));
    }

    fn debug(&self, ctx: &DrawContext<'_>, gizmos: &mut dyn ShapeRenderer) {
        push(&self.log, "debug", &self.name);
        draw_axes_gizmo(gizmos, &ctx.world_transform());
    }

    fn destroy(&mut self) -> bool {
        push(&self.log, "destroy", &self.name);
        if self.vetoes > 0 {
            self.vetoes -= 1;
            return false;
        }
        true
    }

    fn dispose(&mut self, physics: &mut dyn PhysicsWorld) -> Result<(), SceneError> {
        push(&self.log, "dispose", &self.name);
        if let Some(body) = self.body.take() {
            if self.leak_body {
                drop(body);
            } else {
                body.release(physics)?;
            }
        }
        Ok(())
    }

    fn body(&self) -> Option<BodyHandle> {
        self.body.as_ref().map(PhysicsBody::handle).or(self.claims)
    }

    fn on_hit(&mut self, _ctx: &mut ActorContext<'_>, _other: ActorKey) -> Result<(), SceneError> {
        push(&self.log, "hit", &self.name);
        Ok(())
    }
}

/// Controller recording every hook it receives
pub(super) struct Recorder {
    name: &'static str,
    log: Log,
}

impl Recorder {
    pub(super) fn new(name: &'static str, log: &Log) -> Self {
        Self { name, log: log.clone() }
    }
}

impl SceneController for Recorder {
    fn pre_perform(&mut self, _ctx: &mut ControllerContext<'_>) -> Result<(), SceneError> {
        push(&self.log, "pre_perform", self.name);
        Ok(())
    }

    fn post_perform(&mut self, _ctx: &mut ControllerContext<'_>) -> Result<(), SceneError> {
        push(&self.log, "post_perform", self.name);
        Ok(())
    }

    fn pre_update(&mut self, _ctx: &mut ControllerContext<'_>) -> Result<(), SceneError> {
        push(&self.log, "pre_update", self.name);
        Ok(())
    }

    fn post_update(&mut self, _ctx: &mut ControllerContext<'_>) -> Result<(), SceneError> {
        push(&self.log, "post_update", self.name);
        Ok(())
    }

    fn pre_draw(&mut self, _world: &SceneWorld, _surfaces: &mut Surfaces<'_>) {
        push(&self.log, "pre_draw", self.name);
    }

    fn post_draw(&mut self, _world: &SceneWorld, _surfaces: &mut Surfaces<'_>) {
        push(&self.log, "post_draw", self.name);
    }

    fn pre_debug(&mut self, _world: &SceneWorld, _gizmos: &mut dyn ShapeRenderer) {
        push(&self.log, "pre_debug", self.name);
    }

    fn post_debug(&mut self, _world: &SceneWorld, _gizmos: &mut dyn ShapeRenderer) {
        push(&self.log, "post_debug", self.name);
    }

    fn dispose(&mut self) {
        push(&self.log, "dispose", self.name);
    }
}

/// Scene with recording collaborators
pub(super) struct Harness {
    pub scene: Scene,
    pub physics: SimplePhysicsWorld,
    pub batch: RecordingBatch,
    pub gizmos: RecordingShapes,
    pub input: InputSnapshot,
}

impl Harness {
    pub(super) fn new() -> Self {
        Self {
            scene: Scene::default(),
            physics: SimplePhysicsWorld::new(),
            batch: RecordingBatch::new(),
            gizmos: RecordingShapes::new(),
            input: InputSnapshot::empty(),
        }
    }

    pub(super) fn add(&mut self, layer: LayerId, actor: Box<dyn Actor>) -> ActorKey {
        self.scene
            .add(layer, ActorDesc::new(0), actor, &mut self.physics)
            .expect("add actor")
    }

    pub(super) fn add_with(&mut self, layer: LayerId, desc: ActorDesc, actor: Box<dyn Actor>) -> ActorKey {
        self.scene
            .add(layer, desc, actor, &mut self.physics)
            .expect("add actor")
    }

    pub(super) fn frame(&mut self) -> Result<(), SceneError> {
        self.scene.perform(Frame {
            delta: 0.016,
            input: &self.input,
            physics: &mut self.physics,
            batch: &mut self.batch,
            gizmos: &mut self.gizmos,
        })
    }

    pub(super) fn sprites(&self) -> Vec<String> {
        self.batch.sprites().into_iter().map(|t| t.0.clone()).collect()
    }
}
