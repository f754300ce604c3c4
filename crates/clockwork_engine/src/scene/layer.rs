//! Scene layers
//!
//! A layer is an ordered bucket of actors. Storage order is paint order, and
//! removals are queued until the end of the layer's update pass.

use std::fmt;

use crate::foundation::collections::ActorKey;

/// The fixed set of scene layers, in paint order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerId {
    /// Backdrops
    Background,
    /// First gameplay layer
    Action1,
    /// Second gameplay layer
    Action2,
    /// Third gameplay layer
    Action3,
    /// Scenery drawn over gameplay
    Foreground,
    /// Interface
    Gui,
    /// Debug overlays
    Debug,
}

impl LayerId {
    /// Number of layers
    pub const COUNT: usize = 7;

    /// Every layer in declaration order
    pub const ALL: [LayerId; Self::COUNT] = [
        LayerId::Background,
        LayerId::Action1,
        LayerId::Action2,
        LayerId::Action3,
        LayerId::Foreground,
        LayerId::Gui,
        LayerId::Debug,
    ];

    /// Position in declaration order
    pub fn index(self) -> usize {
        self as usize
    }

    /// Layer at a declaration index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            LayerId::Background => "BACKGROUND",
            LayerId::Action1 => "ACTION_1",
            LayerId::Action2 => "ACTION_2",
            LayerId::Action3 => "ACTION_3",
            LayerId::Foreground => "FOREGROUND",
            LayerId::Gui => "GUI",
            LayerId::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered actor storage with a pending-removal queue
#[derive(Debug)]
pub struct Layer {
    id: LayerId,
    actors: Vec<ActorKey>,
    pending: Vec<ActorKey>,
}

impl Layer {
    /// Create an empty layer
    pub fn new(id: LayerId) -> Self {
        Self {
            id,
            actors: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Which layer this is
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Actors in paint order, including those pending removal
    pub fn actors(&self) -> &[ActorKey] {
        &self.actors
    }

    /// Number of stored actors
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// True if no actors are stored
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Is the actor stored here
    pub fn contains(&self, actor: ActorKey) -> bool {
        self.actors.contains(&actor)
    }

    /// Actors waiting for the removal flush
    pub fn pending(&self) -> &[ActorKey] {
        &self.pending
    }

    pub(crate) fn attach(&mut self, actor: ActorKey) {
        if !self.contains(actor) {
            self.actors.push(actor);
        }
    }

    pub(crate) fn detach(&mut self, actor: ActorKey) {
        self.actors.retain(|&a| a != actor);
        self.pending.retain(|&a| a != actor);
    }

    /// Queue a removal; returns false if already queued
    pub(crate) fn queue_removal(&mut self, actor: ActorKey) -> bool {
        if self.pending.contains(&actor) {
            return false;
        }
        self.pending.push(actor);
        true
    }

    pub(crate) fn take_pending(&mut self) -> Vec<ActorKey> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn take_all(&mut self) -> Vec<ActorKey> {
        self.pending.clear();
        std::mem::take(&mut self.actors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::SlotMap;

    #[test]
    fn test_layer_index_round_trip() {
        for (index, id) in LayerId::ALL.iter().enumerate() {
            assert_eq!(id.index(), index);
            assert_eq!(LayerId::from_index(index), Some(*id));
        }
        assert_eq!(LayerId::from_index(LayerId::COUNT), None);
        assert_eq!(LayerId::Action1.to_string(), "ACTION_1");
    }

    #[test]
    fn test_queue_removal_is_idempotent() {
        let mut keys: SlotMap<ActorKey, ()> = SlotMap::with_key();
        let a = keys.insert(());
        let b = keys.insert(());
        let mut layer = Layer::new(LayerId::Action1);
        layer.attach(a);
        layer.attach(b);
        layer.attach(a);

        assert_eq!(layer.actors(), &[a, b]);
        assert!(layer.queue_removal(a));
        assert!(!layer.queue_removal(a));
        assert_eq!(layer.take_pending(), vec![a]);
        assert!(layer.pending().is_empty());

        layer.queue_removal(b);
        layer.detach(b);
        assert_eq!(layer.actors(), &[a]);
        assert!(layer.pending().is_empty());
    }
}
