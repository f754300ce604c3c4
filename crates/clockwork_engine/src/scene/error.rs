//! Scene error types

use thiserror::Error;

use crate::foundation::collections::{ActorKey, BodyHandle, NodeKey, TagKey};
use crate::physics::PhysicsError;

/// Errors raised by the scene and propagated from actors
///
/// Contract violations abort the frame: [`crate::scene::Scene::perform`]
/// returns the first error it meets.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The key does not name a live actor
    #[error("unknown actor {0:?}")]
    UnknownActor(ActorKey),

    /// The actor's behavior is running a callback and cannot be borrowed again
    #[error("actor {0:?} is busy in a callback")]
    ActorBusy(ActorKey),

    /// The actor was already queued for removal
    #[error("actor {0:?} is pending removal")]
    PendingRemoval(ActorKey),

    /// No layer is declared at the index
    #[error("no layer at index {0}")]
    UnknownLayer(usize),

    /// The key does not name a live transform node
    #[error("unknown transform node {0:?}")]
    UnknownNode(NodeKey),

    /// A node was made its own parent
    #[error("transform node {0:?} cannot parent itself")]
    SelfParenting(NodeKey),

    /// Re-parenting would create a cycle
    #[error("parenting {node:?} under {parent:?} would create a cycle")]
    ParentCycle {
        /// Node being re-parented
        node: NodeKey,
        /// Requested parent, a descendant of `node`
        parent: NodeKey,
    },

    /// The key does not name a live tag
    #[error("unknown tag {0:?}")]
    UnknownTag(TagKey),

    /// The body is already owned by another actor
    #[error("body {body:?} is already owned by actor {owner:?}")]
    BodyAlreadyOwned {
        /// Contested body
        body: BodyHandle,
        /// Current owner
        owner: ActorKey,
    },

    /// An actor finished dispose without releasing its body
    #[error("actor {id} was disposed without releasing its body")]
    BodyNotReleased {
        /// Actor id
        id: i32,
    },

    /// Physics collaborator failure
    #[error("physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Failure raised by actor or controller code
    #[error("actor {id}: {message}")]
    Actor {
        /// Actor id
        id: i32,
        /// Failure description
        message: String,
    },
}

impl SceneError {
    /// Failure raised from inside an actor callback
    pub fn actor(id: i32, message: impl Into<String>) -> Self {
        Self::Actor {
            id,
            message: message.into(),
        }
    }
}
