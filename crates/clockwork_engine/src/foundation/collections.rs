//! Specialized collection types
//!
//! Every cross-object reference in the scene is a generational key into a
//! slot map, so a stale reference is detected instead of aliasing a newer
//! object stored in the same slot.

pub use slotmap::{SecondaryMap, SlotMap};

slotmap::new_key_type! {
    /// Handle of an actor stored in a scene
    pub struct ActorKey;

    /// Handle of a node in a transform tree
    pub struct NodeKey;

    /// Handle of an actor tag
    pub struct TagKey;

    /// Opaque reference to a rigid body owned by exactly one actor
    pub struct BodyHandle;
}
