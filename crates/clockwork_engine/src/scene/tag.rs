//! Actor tags
//!
//! A tag is a named lookup index over actors ("player", "enemy"). Tags never
//! own their members; the scene keeps membership in step with each actor's
//! tag field.

use std::collections::HashMap;

use super::error::SceneError;
use crate::foundation::collections::{ActorKey, SlotMap, TagKey};

#[derive(Debug)]
struct Tag {
    name: String,
    members: Vec<ActorKey>,
}

/// Registry of named tags
#[derive(Debug, Default)]
pub struct TagRegistry {
    tags: SlotMap<TagKey, Tag>,
    by_name: HashMap<String, TagKey>,
}

impl TagRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag with the given name, created on first use
    pub fn get_or_create(&mut self, name: &str) -> TagKey {
        if let Some(&key) = self.by_name.get(name) {
            return key;
        }
        let key = self.tags.insert(Tag {
            name: name.to_string(),
            members: Vec::new(),
        });
        self.by_name.insert(name.to_string(), key);
        key
    }

    /// Existing tag with the given name
    pub fn find(&self, name: &str) -> Option<TagKey> {
        self.by_name.get(name).copied()
    }

    /// Is the key a live tag
    pub fn contains(&self, tag: TagKey) -> bool {
        self.tags.contains_key(tag)
    }

    /// Name of a tag
    pub fn name(&self, tag: TagKey) -> Result<&str, SceneError> {
        Ok(&self.tag(tag)?.name)
    }

    /// Members of a tag in the order they joined
    pub fn members(&self, tag: TagKey) -> Result<&[ActorKey], SceneError> {
        Ok(&self.tag(tag)?.members)
    }

    pub(crate) fn link(&mut self, tag: TagKey, actor: ActorKey) -> Result<(), SceneError> {
        let entry = self.tags.get_mut(tag).ok_or(SceneError::UnknownTag(tag))?;
        if !entry.members.contains(&actor) {
            entry.members.push(actor);
        }
        Ok(())
    }

    pub(crate) fn unlink(&mut self, tag: TagKey, actor: ActorKey) {
        if let Some(entry) = self.tags.get_mut(tag) {
            entry.members.retain(|&member| member != actor);
        }
    }

    fn tag(&self, tag: TagKey) -> Result<&Tag, SceneError> {
        self.tags.get(tag).ok_or(SceneError::UnknownTag(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_reuses_name() {
        let mut tags = TagRegistry::new();
        let player = tags.get_or_create("player");
        let enemy = tags.get_or_create("enemy");

        assert_eq!(tags.get_or_create("player"), player);
        assert_ne!(player, enemy);
        assert_eq!(tags.find("enemy"), Some(enemy));
        assert_eq!(tags.find("boss"), None);
        assert_eq!(tags.name(player).unwrap(), "player");
    }

    #[test]
    fn test_membership_is_a_set() {
        let mut keys: SlotMap<ActorKey, ()> = SlotMap::with_key();
        let actor = keys.insert(());
        let mut tags = TagRegistry::new();
        let tag = tags.get_or_create("player");

        tags.link(tag, actor).unwrap();
        tags.link(tag, actor).unwrap();
        assert_eq!(tags.members(tag).unwrap(), &[actor]);

        tags.unlink(tag, actor);
        assert!(tags.members(tag).unwrap().is_empty());
    }
}
