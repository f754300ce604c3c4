//! Actor contract
//!
//! An actor is a boxed behavior plus an [`ActorCore`] the scene keeps for it:
//! identity, flags, layer membership, transform node and body binding. The
//! scene hands each callback an explicit context instead of global state.

use std::any::Any;

use super::camera::Camera2D;
use super::error::SceneError;
use super::layer::LayerId;
use super::world::SceneWorld;
use crate::foundation::collections::{ActorKey, BodyHandle, NodeKey, TagKey};
use crate::foundation::math::{Mat4, Transform2D, Vec2};
use crate::input::InputSnapshot;
use crate::physics::PhysicsWorld;
use crate::render::{draw_axes_gizmo, ShapeRenderer, SpriteBatch};

/// Upcast support for typed lookups of boxed trait objects
pub trait AsAny: Any {
    /// Borrow as `Any`
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Where an actor is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Stored but `create` has not returned yet
    Unattached,
    /// Updated and drawn
    Live,
    /// Removal requested; skipped until the flush disposes it
    PendingRemoval,
    /// Disposed and dropped; also reported for stale keys
    Disposed,
}

/// Scene-side state of an actor
#[derive(Debug, Clone)]
pub struct ActorCore {
    id: i32,
    /// Gates update and draw
    pub active: bool,
    /// Gates draw only
    pub visible: bool,
    tag: Option<TagKey>,
    layer: LayerId,
    node: NodeKey,
    state: LifecycleState,
    body: Option<BodyHandle>,
    spawned_in: Option<u64>,
    last_update: Option<u64>,
}

impl ActorCore {
    pub(crate) fn new(id: i32, layer: LayerId, node: NodeKey) -> Self {
        Self {
            id,
            active: true,
            visible: true,
            tag: None,
            layer,
            node,
            state: LifecycleState::Unattached,
            body: None,
            spawned_in: None,
            last_update: None,
        }
    }

    /// Caller-assigned id
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Current tag
    pub fn tag(&self) -> Option<TagKey> {
        self.tag
    }

    /// Layer the actor paints into
    pub fn layer(&self) -> LayerId {
        self.layer
    }

    /// Transform node
    pub fn node(&self) -> NodeKey {
        self.node
    }

    /// Lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Owned physics body
    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub(crate) fn set_tag(&mut self, tag: Option<TagKey>) {
        self.tag = tag;
    }

    pub(crate) fn set_layer(&mut self, layer: LayerId) {
        self.layer = layer;
    }

    pub(crate) fn set_state(&mut self, state: LifecycleState) {
        self.state = state;
    }

    pub(crate) fn set_body(&mut self, body: Option<BodyHandle>) {
        self.body = body;
    }

    pub(crate) fn set_spawned_in(&mut self, epoch: Option<u64>) {
        self.spawned_in = epoch;
    }

    /// Should the update pass with this epoch visit the actor
    pub(crate) fn wants_update(&self, epoch: u64, layer: LayerId) -> bool {
        self.state == LifecycleState::Live
            && self.active
            && self.layer == layer
            && self.spawned_in != Some(epoch)
            && self.last_update != Some(epoch)
    }

    pub(crate) fn mark_updated(&mut self, epoch: u64) {
        self.last_update = Some(epoch);
    }

    pub(crate) fn is_drawable(&self) -> bool {
        self.state == LifecycleState::Live && self.active && self.visible
    }
}

/// Everything needed to insert an actor besides its behavior
#[derive(Debug, Clone)]
pub struct ActorDesc {
    /// Caller-assigned id
    pub id: i32,
    /// Tag name, created on first use
    pub tag: Option<String>,
    /// Initial local transform
    pub transform: Transform2D,
    /// Actor whose transform node becomes the parent
    pub parent: Option<ActorKey>,
    /// Initial `active` flag
    pub active: bool,
    /// Initial `visible` flag
    pub visible: bool,
}

impl ActorDesc {
    /// Active, visible, untagged actor at the origin
    pub fn new(id: i32) -> Self {
        Self {
            id,
            tag: None,
            transform: Transform2D::identity(),
            parent: None,
            active: true,
            visible: true,
        }
    }

    /// Builder pattern: set tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Builder pattern: set local transform
    pub fn with_transform(mut self, transform: Transform2D) -> Self {
        self.transform = transform;
        self
    }

    /// Builder pattern: attach under another actor's transform
    pub fn with_parent(mut self, parent: ActorKey) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Builder pattern: start hidden
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Builder pattern: start inactive
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Actor that can take damage from collisions
pub trait Damageable {
    /// Subtract health
    fn apply_damage(&mut self, amount: f32);

    /// Has the actor run out of health
    fn is_destroyed(&self) -> bool;
}

/// Actor that makes a sound when something hits it
pub trait ImpactSounding {
    /// Sound cue to play on impact
    fn impact_sound(&self) -> Option<&str>;
}

/// Per-frame behavior of a scene actor
///
/// Every hook has a default so simple actors implement only what they need.
/// Errors returned from a hook abort the current frame.
pub trait Actor: AsAny {
    /// Called exactly once, on first insertion into a layer
    fn create(&mut self, _ctx: &mut ActorContext<'_>) -> Result<(), SceneError> {
        Ok(())
    }

    /// Advance by `delta` seconds
    fn update(&mut self, _ctx: &mut ActorContext<'_>, _delta: f32) -> Result<(), SceneError> {
        Ok(())
    }

    /// Draw into the sprite batch
    fn draw(&self, _ctx: &DrawContext<'_>, _batch: &mut dyn SpriteBatch) {}

    /// Draw debug overlays
    fn debug(&self, ctx: &DrawContext<'_>, gizmos: &mut dyn ShapeRenderer) {
        draw_axes_gizmo(gizmos, &ctx.world_transform());
    }

    /// Accept a pending removal; returning false keeps the actor alive
    fn destroy(&mut self) -> bool {
        true
    }

    /// Release owned resources; called exactly once
    fn dispose(&mut self, _physics: &mut dyn PhysicsWorld) -> Result<(), SceneError> {
        Ok(())
    }

    /// Physics body owned by this actor
    fn body(&self) -> Option<BodyHandle> {
        None
    }

    /// Contact began with another actor's body
    fn on_hit(&mut self, _ctx: &mut ActorContext<'_>, _other: ActorKey) -> Result<(), SceneError> {
        Ok(())
    }

    /// Damage capability
    fn as_damageable_mut(&mut self) -> Option<&mut dyn Damageable> {
        None
    }

    /// Impact sound capability
    fn as_impact_sounding(&self) -> Option<&dyn ImpactSounding> {
        None
    }
}

/// Mutable access to the scene from inside an actor callback
pub struct ActorContext<'a> {
    key: ActorKey,
    world: &'a mut SceneWorld,
    physics: &'a mut dyn PhysicsWorld,
}

impl<'a> ActorContext<'a> {
    pub(crate) fn new(key: ActorKey, world: &'a mut SceneWorld, physics: &'a mut dyn PhysicsWorld) -> Self {
        Self { key, world, physics }
    }

    /// Key of the actor being called
    pub fn key(&self) -> ActorKey {
        self.key
    }

    /// Scene-side state of the actor being called
    pub fn core(&self) -> Result<&ActorCore, SceneError> {
        self.world.core(self.key)
    }

    /// Mutable scene-side state of the actor being called
    pub fn core_mut(&mut self) -> Result<&mut ActorCore, SceneError> {
        self.world.core_mut(self.key)
    }

    /// Id of the actor being called
    pub fn id(&self) -> Result<i32, SceneError> {
        Ok(self.core()?.id())
    }

    /// Read-only scene state
    pub fn world(&self) -> &SceneWorld {
        self.world
    }

    /// Physics collaborator
    pub fn physics(&mut self) -> &mut dyn PhysicsWorld {
        &mut *self.physics
    }

    /// Scene camera
    pub fn camera(&self) -> &Camera2D {
        self.world.camera()
    }

    /// Input for this frame
    pub fn input(&self) -> &InputSnapshot {
        self.world.input()
    }

    /// Request removal of this actor
    pub fn remove(&mut self) -> bool {
        self.world.remove(self.key)
    }

    /// Request removal of another actor
    pub fn remove_actor(&mut self, key: ActorKey) -> bool {
        self.world.remove(key)
    }

    /// Add a new actor; it is not updated until the next pass
    pub fn spawn(&mut self, layer: LayerId, desc: ActorDesc, actor: Box<dyn Actor>) -> Result<ActorKey, SceneError> {
        self.world.add(layer, desc, actor, &mut *self.physics)
    }

    /// Repaint this actor in another layer
    pub fn move_to(&mut self, layer: LayerId) -> Result<(), SceneError> {
        self.world.move_to(self.key, layer)
    }

    /// Change this actor's tag
    pub fn set_tag(&mut self, tag: Option<&str>) -> Result<(), SceneError> {
        self.world.set_tag(self.key, tag)
    }

    /// Local transform of this actor
    pub fn transform_mut(&mut self) -> Result<&mut Transform2D, SceneError> {
        self.world.transform_mut(self.key)
    }

    /// World transform of this actor
    pub fn world_transform(&self) -> Result<Mat4, SceneError> {
        self.world.world_transform(self.key)
    }

    /// Position, read from the body when the actor owns one
    pub fn position(&self) -> Result<Vec2, SceneError> {
        self.world.position_of(self.key, &*self.physics)
    }

    /// Move this actor, through its body when it owns one
    pub fn set_position(&mut self, position: Vec2) -> Result<(), SceneError> {
        self.world.set_position_of(self.key, position, &mut *self.physics)
    }

    /// Rotation in radians, read from the body when the actor owns one
    pub fn rotation(&self) -> Result<f32, SceneError> {
        self.world.rotation_of(self.key, &*self.physics)
    }

    /// Rotate this actor, through its body when it owns one
    pub fn set_rotation(&mut self, rotation: f32) -> Result<(), SceneError> {
        self.world.set_rotation_of(self.key, rotation, &mut *self.physics)
    }

    /// Queue a sound cue for the host to play
    pub fn play_sound(&mut self, cue: impl Into<String>) {
        self.world.push_sound_cue(cue.into());
    }

    /// Borrow another actor's behavior
    pub fn with_actor<R>(&self, key: ActorKey, f: impl FnOnce(&dyn Actor) -> R) -> Result<R, SceneError> {
        self.world.with_actor(key, f)
    }

    /// Mutably borrow another actor's behavior, e.g. to query capabilities
    pub fn with_actor_mut<R>(&mut self, key: ActorKey, f: impl FnOnce(&mut dyn Actor) -> R) -> Result<R, SceneError> {
        self.world.with_actor_mut(key, f)
    }
}

/// Read-only view handed to draw and debug callbacks
pub struct DrawContext<'a> {
    key: ActorKey,
    core: &'a ActorCore,
    world: &'a SceneWorld,
    physics: &'a dyn PhysicsWorld,
}

impl<'a> DrawContext<'a> {
    pub(crate) fn new(key: ActorKey, core: &'a ActorCore, world: &'a SceneWorld, physics: &'a dyn PhysicsWorld) -> Self {
        Self { key, core, world, physics }
    }

    /// Key of the actor being drawn
    pub fn key(&self) -> ActorKey {
        self.key
    }

    /// Scene-side state of the actor being drawn
    pub fn core(&self) -> &ActorCore {
        self.core
    }

    /// Read-only scene state
    pub fn world(&self) -> &SceneWorld {
        self.world
    }

    /// Physics collaborator
    pub fn physics(&self) -> &dyn PhysicsWorld {
        self.physics
    }

    /// Scene camera
    pub fn camera(&self) -> &Camera2D {
        self.world.camera()
    }

    /// World transform of the actor being drawn
    pub fn world_transform(&self) -> Mat4 {
        self.world
            .world_transform(self.key)
            .unwrap_or_else(|_| Mat4::identity())
    }

    /// Position of the actor being drawn
    pub fn position(&self) -> Vec2 {
        self.world
            .position_of(self.key, self.physics)
            .unwrap_or_else(|_| Vec2::zeros())
    }
}
