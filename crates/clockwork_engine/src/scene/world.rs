//! Scene storage and passes
//!
//! [`SceneWorld`] owns every actor, the layers that order them, the transform
//! tree, the tag registry and the body-to-actor map. Cross references are slot
//! map keys, so removing an actor never leaves a dangling pointer behind.
//!
//! During an update pass each layer walks a snapshot of its storage taken when
//! the layer's turn starts. Actors spawned while a pass is running record the
//! pass epoch and are skipped until the next one; removals only mark the actor
//! and are flushed once the layer finishes.

use std::collections::HashMap;

use super::actor::{Actor, ActorContext, ActorCore, ActorDesc, DrawContext, LifecycleState};
use super::camera::Camera2D;
use super::error::SceneError;
use super::layer::{Layer, LayerId};
use super::tag::TagRegistry;
use super::transform::TransformTree;
use crate::foundation::collections::{ActorKey, BodyHandle, SlotMap, TagKey};
use crate::foundation::math::{Mat4, Transform2D, Vec2};
use crate::input::InputSnapshot;
use crate::physics::{Contact, PhysicsError, PhysicsWorld};
use crate::render::{ShapeRenderer, SpriteBatch};

struct ActorSlot {
    core: ActorCore,
    behavior: Option<Box<dyn Actor>>,
}

/// Actors, layers and the state shared by their callbacks
pub struct SceneWorld {
    actors: SlotMap<ActorKey, ActorSlot>,
    layers: Vec<Layer>,
    transforms: TransformTree,
    tags: TagRegistry,
    bodies: HashMap<BodyHandle, ActorKey>,
    camera: Camera2D,
    input: InputSnapshot,
    epoch: u64,
    in_pass: bool,
    sound_cues: Vec<String>,
}

impl Default for SceneWorld {
    fn default() -> Self {
        Self::new(Camera2D::default())
    }
}

impl SceneWorld {
    /// Empty world with the seven standard layers
    pub fn new(camera: Camera2D) -> Self {
        Self {
            actors: SlotMap::with_key(),
            layers: LayerId::ALL.iter().map(|&id| Layer::new(id)).collect(),
            transforms: TransformTree::new(),
            tags: TagRegistry::new(),
            bodies: HashMap::new(),
            camera,
            input: InputSnapshot::default(),
            epoch: 0,
            in_pass: false,
            sound_cues: Vec::new(),
        }
    }

    /// Insert an actor into a layer and call its `create` hook
    ///
    /// When a pass is running the actor is drawn this frame but not updated
    /// until the next pass.
    ///
    /// An actor rejected for a stale parent is disposed before the error is
    /// returned. One claiming a body it does not hold is dropped untouched.
    pub fn add(
        &mut self,
        layer: LayerId,
        desc: ActorDesc,
        actor: Box<dyn Actor>,
        physics: &mut dyn PhysicsWorld,
    ) -> Result<ActorKey, SceneError> {
        let body = actor.body();
        if let Some(body) = body {
            // the body is not the actor's to release
            self.check_body_free(body, None, physics)?;
        }
        let parent_node = match desc.parent.map(|parent| self.core(parent)) {
            Some(Ok(core)) => Some(core.node()),
            Some(Err(err)) => return Err(Self::discard(desc.id, actor, physics, err)),
            None => None,
        };

        let node = match self.transforms.insert(desc.transform, parent_node) {
            Ok(node) => node,
            Err(err) => return Err(Self::discard(desc.id, actor, physics, err)),
        };
        let mut core = ActorCore::new(desc.id, layer, node);
        core.active = desc.active;
        core.visible = desc.visible;
        core.set_body(body);
        if self.in_pass {
            core.set_spawned_in(Some(self.epoch));
        }

        let key = self.actors.insert(ActorSlot {
            core,
            behavior: Some(actor),
        });
        self.layer_mut(layer).attach(key);
        if let Some(body) = body {
            self.bodies.insert(body, key);
        }
        if let Some(tag) = desc.tag.as_deref() {
            self.set_tag(key, Some(tag))?;
        }
        log::debug!("Actor {} created in {}", desc.id, layer);

        let created = match self.with_behavior(key, physics, |actor, ctx| actor.create(ctx)) {
            Ok(Ok(())) => self.rebind_body(key, physics),
            Ok(Err(err)) | Err(err) => Err(err),
        };
        if let Err(err) = created {
            log::error!("Actor {} failed to create: {}", desc.id, err);
            if let Err(cleanup) = self.dispose_actor(key, physics) {
                log::error!("Discarding actor {} failed: {}", desc.id, cleanup);
            }
            return Err(err);
        }

        if let Ok(core) = self.core_mut(key) {
            if core.state() == LifecycleState::Unattached {
                core.set_state(LifecycleState::Live);
            }
        }
        Ok(key)
    }

    /// Move a live actor to another layer without re-running `create`
    pub fn move_to(&mut self, key: ActorKey, layer: LayerId) -> Result<(), SceneError> {
        let core = self.core_mut(key)?;
        if core.state() == LifecycleState::PendingRemoval {
            log::error!("Cannot move actor {} while it is pending removal", core.id());
            return Err(SceneError::PendingRemoval(key));
        }
        let from = core.layer();
        if from == layer {
            return Ok(());
        }
        core.set_layer(layer);
        let id = core.id();
        self.layer_mut(from).detach(key);
        self.layer_mut(layer).attach(key);
        log::debug!("Actor {} moved from {} to {}", id, from, layer);
        Ok(())
    }

    /// Request removal of an actor
    ///
    /// The actor is skipped by every later update and draw and is disposed
    /// at the next flush. Returns false if the actor was already queued or
    /// no longer exists.
    pub fn remove(&mut self, key: ActorKey) -> bool {
        let Some(slot) = self.actors.get_mut(key) else {
            return false;
        };
        match slot.core.state() {
            LifecycleState::Live | LifecycleState::Unattached => {}
            LifecycleState::PendingRemoval | LifecycleState::Disposed => return false,
        }
        slot.core.set_state(LifecycleState::PendingRemoval);
        let layer = slot.core.layer();
        self.layer_mut(layer).queue_removal(key);
        true
    }

    /// Run one update pass over every layer, then flush every removal
    pub fn update(&mut self, delta: f32, physics: &mut dyn PhysicsWorld) -> Result<(), SceneError> {
        self.run_pass(|world| {
            for layer in LayerId::ALL {
                world.update_layer(layer, delta, physics)?;
            }
            world.flush_all(physics)
        })
    }

    /// Update the active actors of one layer, then flush its removals
    pub fn update_layer(
        &mut self,
        layer: LayerId,
        delta: f32,
        physics: &mut dyn PhysicsWorld,
    ) -> Result<(), SceneError> {
        self.run_pass(|world| {
            log::trace!("Updating {}", layer);
            let epoch = world.epoch;
            let snapshot = world.layer(layer).actors().to_vec();
            for key in snapshot {
                let Some(slot) = world.actors.get_mut(key) else {
                    continue;
                };
                if !slot.core.wants_update(epoch, layer) {
                    continue;
                }
                slot.core.mark_updated(epoch);
                world.with_behavior(key, physics, |actor, ctx| actor.update(ctx, delta))??;
                world.rebind_body(key, physics)?;
            }
            world.flush_layer(layer, physics)
        })
    }

    /// Dispose the actors queued for removal in one layer
    ///
    /// An actor whose `destroy` hook refuses goes back to live.
    pub fn flush_layer(&mut self, layer: LayerId, physics: &mut dyn PhysicsWorld) -> Result<(), SceneError> {
        for key in self.layer_mut(layer).take_pending() {
            let Some(slot) = self.actors.get(key) else {
                continue;
            };
            if slot.core.state() != LifecycleState::PendingRemoval {
                continue;
            }
            let accepted = self.with_behavior(key, physics, |actor, _| actor.destroy())?;
            if accepted {
                self.dispose_actor(key, physics)?;
            } else if let Ok(core) = self.core_mut(key) {
                log::debug!("Actor {} vetoed its removal", core.id());
                core.set_state(LifecycleState::Live);
            }
        }
        Ok(())
    }

    /// Flush the removal queues of every layer
    pub fn flush_all(&mut self, physics: &mut dyn PhysicsWorld) -> Result<(), SceneError> {
        for layer in LayerId::ALL {
            self.flush_layer(layer, physics)?;
        }
        Ok(())
    }

    /// Draw the active, visible, live actors of one layer in storage order
    pub fn draw_layer(&self, layer: LayerId, batch: &mut dyn SpriteBatch, physics: &dyn PhysicsWorld) {
        log::trace!("Drawing {}", layer);
        for &key in self.layer(layer).actors() {
            let Some(slot) = self.actors.get(key) else {
                continue;
            };
            let Some(behavior) = slot.behavior.as_deref() else {
                continue;
            };
            if slot.core.is_drawable() {
                behavior.draw(&DrawContext::new(key, &slot.core, self, physics), batch);
            }
        }
    }

    /// Draw debug overlays for every live actor of one layer, ignoring flags
    pub fn debug_layer(&self, layer: LayerId, gizmos: &mut dyn ShapeRenderer, physics: &dyn PhysicsWorld) {
        for &key in self.layer(layer).actors() {
            let Some(slot) = self.actors.get(key) else {
                continue;
            };
            let Some(behavior) = slot.behavior.as_deref() else {
                continue;
            };
            if slot.core.state() == LifecycleState::Live {
                behavior.debug(&DrawContext::new(key, &slot.core, self, physics), gizmos);
            }
        }
    }

    /// Dispose every actor without consulting `destroy`
    ///
    /// Keeps going after a failure and returns the first error.
    pub fn clear(&mut self, physics: &mut dyn PhysicsWorld) -> Result<(), SceneError> {
        let mut first_error = None;
        for layer in LayerId::ALL {
            for key in self.layer_mut(layer).take_all() {
                if let Err(err) = self.dispose_actor(key, physics) {
                    log::error!("Clearing {} failed: {}", layer, err);
                    first_error.get_or_insert(err);
                }
            }
        }
        // actors caught mid-create are not in a layer yet
        let leftovers: Vec<ActorKey> = self.actors.keys().collect();
        for key in leftovers {
            if let Err(err) = self.dispose_actor(key, physics) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Dispose an actor rejected before it was stored
    fn discard(id: i32, mut actor: Box<dyn Actor>, physics: &mut dyn PhysicsWorld, err: SceneError) -> SceneError {
        log::error!("Actor {} rejected: {}", id, err);
        if let Err(cleanup) = actor.dispose(physics) {
            log::error!("Discarding actor {} failed: {}", id, cleanup);
        }
        err
    }

    /// Call `dispose` once and unlink the actor from every index
    fn dispose_actor(&mut self, key: ActorKey, physics: &mut dyn PhysicsWorld) -> Result<(), SceneError> {
        let Some(slot) = self.actors.get_mut(key) else {
            return Ok(());
        };
        let mut behavior = slot.behavior.take().ok_or(SceneError::ActorBusy(key))?;
        let Some(ActorSlot { core, .. }) = self.actors.remove(key) else {
            return Ok(());
        };

        let disposed = behavior.dispose(physics);

        self.layer_mut(core.layer()).detach(key);
        if let Some(tag) = core.tag() {
            self.tags.unlink(tag, key);
        }
        if let Some(body) = core.body() {
            self.bodies.remove(&body);
        }
        self.transforms.remove(core.node())?;
        log::debug!("Actor {} disposed", core.id());

        disposed?;
        if let Some(body) = core.body() {
            if physics.contains(body) {
                log::error!("Actor {} left body {:?} in the physics world", core.id(), body);
                return Err(SceneError::BodyNotReleased { id: core.id() });
            }
        }
        Ok(())
    }

    /// Lifecycle state of an actor; stale keys report `Disposed`
    pub fn lifecycle(&self, key: ActorKey) -> LifecycleState {
        self.actors
            .get(key)
            .map_or(LifecycleState::Disposed, |slot| slot.core.state())
    }

    /// Does the key name a stored actor
    pub fn contains(&self, key: ActorKey) -> bool {
        self.actors.contains_key(key)
    }

    /// Number of stored actors
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Scene-side state of an actor
    pub fn core(&self, key: ActorKey) -> Result<&ActorCore, SceneError> {
        self.actors
            .get(key)
            .map(|slot| &slot.core)
            .ok_or(SceneError::UnknownActor(key))
    }

    /// Mutable scene-side state of an actor
    pub fn core_mut(&mut self, key: ActorKey) -> Result<&mut ActorCore, SceneError> {
        self.actors
            .get_mut(key)
            .map(|slot| &mut slot.core)
            .ok_or(SceneError::UnknownActor(key))
    }

    /// Typed access to an actor's behavior
    pub fn actor<T: Actor>(&self, key: ActorKey) -> Option<&T> {
        self.actors
            .get(key)?
            .behavior
            .as_deref()?
            .as_any()
            .downcast_ref::<T>()
    }

    /// Typed mutable access to an actor's behavior
    pub fn actor_mut<T: Actor>(&mut self, key: ActorKey) -> Option<&mut T> {
        self.actors
            .get_mut(key)?
            .behavior
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Borrow an actor's behavior
    pub fn with_actor<R>(&self, key: ActorKey, f: impl FnOnce(&dyn Actor) -> R) -> Result<R, SceneError> {
        let slot = self.actors.get(key).ok_or(SceneError::UnknownActor(key))?;
        let actor: &dyn Actor = slot.behavior.as_deref().ok_or(SceneError::ActorBusy(key))?;
        Ok(f(actor))
    }

    /// Mutably borrow an actor's behavior
    pub fn with_actor_mut<R>(&mut self, key: ActorKey, f: impl FnOnce(&mut dyn Actor) -> R) -> Result<R, SceneError> {
        let slot = self.actors.get_mut(key).ok_or(SceneError::UnknownActor(key))?;
        let actor: &mut dyn Actor = slot.behavior.as_deref_mut().ok_or(SceneError::ActorBusy(key))?;
        Ok(f(actor))
    }

    /// Actors of a layer in paint order
    pub fn layer_actors(&self, layer: LayerId) -> &[ActorKey] {
        self.layer(layer).actors()
    }

    /// A layer's storage
    pub fn layer(&self, layer: LayerId) -> &Layer {
        &self.layers[layer.index()]
    }

    fn layer_mut(&mut self, layer: LayerId) -> &mut Layer {
        &mut self.layers[layer.index()]
    }

    /// Tag registry
    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    /// Tag with the given name, created on first use
    pub fn tag(&mut self, name: &str) -> TagKey {
        self.tags.get_or_create(name)
    }

    /// Change an actor's tag, leaving the old tag's member list
    pub fn set_tag(&mut self, key: ActorKey, tag: Option<&str>) -> Result<(), SceneError> {
        let new = tag.map(|name| self.tags.get_or_create(name));
        let core = self.core_mut(key)?;
        let old = core.tag();
        if old == new {
            return Ok(());
        }
        core.set_tag(new);
        if let Some(old) = old {
            self.tags.unlink(old, key);
        }
        if let Some(new) = new {
            self.tags.link(new, key)?;
        }
        Ok(())
    }

    /// Members of the named tag
    pub fn tagged(&self, name: &str) -> &[ActorKey] {
        self.tags
            .find(name)
            .and_then(|tag| self.tags.members(tag).ok())
            .unwrap_or(&[])
    }

    /// First member of a tag carrying the given id
    pub fn find_by_id(&self, tag: TagKey, id: i32) -> Result<Option<ActorKey>, SceneError> {
        Ok(self
            .tags
            .members(tag)?
            .iter()
            .copied()
            .find(|&key| self.core(key).is_ok_and(|core| core.id() == id)))
    }

    /// Parent one actor's transform under another's, or detach with `None`
    pub fn set_parent(&mut self, child: ActorKey, parent: Option<ActorKey>) -> Result<(), SceneError> {
        let node = self.core(child)?.node();
        let parent_node = match parent {
            Some(parent) => Some(self.core(parent)?.node()),
            None => None,
        };
        self.transforms.set_parent(node, parent_node)
    }

    /// Transform tree
    pub fn transforms(&self) -> &TransformTree {
        &self.transforms
    }

    /// Local transform of an actor
    pub fn transform(&self, key: ActorKey) -> Result<&Transform2D, SceneError> {
        let node = self.core(key)?.node();
        self.transforms.local(node)
    }

    /// Mutable local transform of an actor
    pub fn transform_mut(&mut self, key: ActorKey) -> Result<&mut Transform2D, SceneError> {
        let node = self.core(key)?.node();
        self.transforms.local_mut(node)
    }

    /// World transform of an actor
    pub fn world_transform(&self, key: ActorKey) -> Result<Mat4, SceneError> {
        self.transforms.world(self.core(key)?.node())
    }

    /// Position of an actor: its body's when it owns one, its local transform's otherwise
    pub fn position_of(&self, key: ActorKey, physics: &dyn PhysicsWorld) -> Result<Vec2, SceneError> {
        let core = self.core(key)?;
        match core.body() {
            Some(body) => Ok(physics.position(body)?),
            None => Ok(self.transforms.local(core.node())?.translation()),
        }
    }

    /// Move an actor through its body, or its local transform without one
    pub fn set_position_of(
        &mut self,
        key: ActorKey,
        position: Vec2,
        physics: &mut dyn PhysicsWorld,
    ) -> Result<(), SceneError> {
        let core = self.core(key)?;
        if let Some(body) = core.body() {
            physics.set_position(body, position)?;
        }
        let node = core.node();
        self.transforms.local_mut(node)?.set_translation(position);
        Ok(())
    }

    /// Rotation of an actor in radians
    pub fn rotation_of(&self, key: ActorKey, physics: &dyn PhysicsWorld) -> Result<f32, SceneError> {
        let core = self.core(key)?;
        match core.body() {
            Some(body) => Ok(physics.rotation(body)?),
            None => Ok(self.transforms.local(core.node())?.rotation),
        }
    }

    /// Rotate an actor through its body, or its local transform without one
    pub fn set_rotation_of(
        &mut self,
        key: ActorKey,
        rotation: f32,
        physics: &mut dyn PhysicsWorld,
    ) -> Result<(), SceneError> {
        let core = self.core(key)?;
        if let Some(body) = core.body() {
            physics.set_rotation(body, rotation)?;
        }
        let node = core.node();
        self.transforms.local_mut(node)?.rotation = rotation;
        Ok(())
    }

    /// Copy every body pose into its actor's local transform
    pub fn sync_bodies(&mut self, physics: &dyn PhysicsWorld) -> Result<(), SceneError> {
        for slot in self.actors.values() {
            let Some(body) = slot.core.body() else {
                continue;
            };
            let local = self.transforms.local_mut(slot.core.node())?;
            local.set_translation(physics.position(body)?);
            local.rotation = physics.rotation(body)?;
        }
        Ok(())
    }

    /// Actor owning a body
    pub fn owner_of(&self, body: BodyHandle) -> Option<ActorKey> {
        self.bodies.get(&body).copied()
    }

    /// Deliver contact-begin events to both actors involved
    ///
    /// Bodies without an owner and actors pending removal are skipped.
    pub fn dispatch_contacts(&mut self, contacts: &[Contact], physics: &mut dyn PhysicsWorld) -> Result<(), SceneError> {
        for contact in contacts {
            let (Some(a), Some(b)) = (self.owner_of(contact.body_a), self.owner_of(contact.body_b)) else {
                continue;
            };
            for (actor, other) in [(a, b), (b, a)] {
                if self.lifecycle(actor) != LifecycleState::Live {
                    continue;
                }
                self.with_behavior(actor, physics, |behavior, ctx| behavior.on_hit(ctx, other))??;
            }
        }
        Ok(())
    }

    /// Scene camera
    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    /// Mutable scene camera
    pub fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }

    /// Input for the current frame
    pub fn input(&self) -> &InputSnapshot {
        &self.input
    }

    /// Replace the input for the current frame
    pub fn set_input(&mut self, input: InputSnapshot) {
        self.input = input;
    }

    pub(crate) fn push_sound_cue(&mut self, cue: String) {
        self.sound_cues.push(cue);
    }

    /// Take the sound cues queued since the last call
    pub fn drain_sound_cues(&mut self) -> Vec<String> {
        std::mem::take(&mut self.sound_cues)
    }

    /// Run a closure as one update pass; nested calls join the outer pass
    fn run_pass<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R, SceneError>) -> Result<R, SceneError> {
        if self.in_pass {
            return f(self);
        }
        self.epoch += 1;
        self.in_pass = true;
        let result = f(self);
        self.in_pass = false;
        result
    }

    /// Take the behavior out of its slot for the length of a callback
    fn with_behavior<R>(
        &mut self,
        key: ActorKey,
        physics: &mut dyn PhysicsWorld,
        f: impl FnOnce(&mut dyn Actor, &mut ActorContext<'_>) -> R,
    ) -> Result<R, SceneError> {
        let slot = self.actors.get_mut(key).ok_or(SceneError::UnknownActor(key))?;
        let mut behavior = slot.behavior.take().ok_or(SceneError::ActorBusy(key))?;
        let result = {
            let mut ctx = ActorContext::new(key, self, physics);
            f(&mut *behavior, &mut ctx)
        };
        if let Some(slot) = self.actors.get_mut(key) {
            slot.behavior = Some(behavior);
        }
        Ok(result)
    }

    fn check_body_free(
        &self,
        body: BodyHandle,
        claimant: Option<ActorKey>,
        physics: &dyn PhysicsWorld,
    ) -> Result<(), SceneError> {
        if let Some(&owner) = self.bodies.get(&body) {
            if Some(owner) != claimant {
                log::error!("Body {:?} is already owned by {:?}", body, owner);
                return Err(SceneError::BodyAlreadyOwned { body, owner });
            }
        }
        if !physics.contains(body) {
            return Err(PhysicsError::UnknownBody(body).into());
        }
        Ok(())
    }

    /// Pick up a body the actor created or replaced inside a callback
    fn rebind_body(&mut self, key: ActorKey, physics: &dyn PhysicsWorld) -> Result<(), SceneError> {
        let Some(slot) = self.actors.get(key) else {
            return Ok(());
        };
        let current = slot.behavior.as_deref().and_then(|actor| actor.body());
        let previous = slot.core.body();
        if current == previous {
            return Ok(());
        }
        if let Some(body) = current {
            self.check_body_free(body, Some(key), physics)?;
        }
        if let Some(body) = previous {
            self.bodies.remove(&body);
        }
        if let Some(body) = current {
            self.bodies.insert(body, key);
        }
        self.core_mut(key)?.set_body(current);
        Ok(())
    }
}
