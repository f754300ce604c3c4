//! Hierarchical transforms
//!
//! Nodes live in a slot map and refer to each other by key. A parent owns its
//! ordered child list; the child's parent link is a plain back-reference.

use super::error::SceneError;
use crate::foundation::collections::{NodeKey, SlotMap};
use crate::foundation::math::{Mat4, Transform2D};

/// One node of a [`TransformTree`]
#[derive(Debug, Clone)]
pub struct TransformNode {
    /// Transform relative to the parent
    pub local: Transform2D,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

/// Arena of transform nodes forming a forest
#[derive(Debug, Default)]
pub struct TransformTree {
    nodes: SlotMap<NodeKey, TransformNode>,
}

impl TransformTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no nodes exist
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Is the key a live node
    pub fn contains(&self, node: NodeKey) -> bool {
        self.nodes.contains_key(node)
    }

    /// Insert a node, optionally under a parent
    pub fn insert(&mut self, local: Transform2D, parent: Option<NodeKey>) -> Result<NodeKey, SceneError> {
        if let Some(parent) = parent {
            self.node(parent)?;
        }
        let key = self.nodes.insert(TransformNode {
            local,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.push(key);
        }
        Ok(key)
    }

    /// Remove a node
    ///
    /// Children are handed to the removed node's parent (or become roots),
    /// keeping their local transforms and their order.
    pub fn remove(&mut self, node: NodeKey) -> Result<Transform2D, SceneError> {
        let removed = self.nodes.remove(node).ok_or(SceneError::UnknownNode(node))?;

        for &child in &removed.children {
            if let Some(child) = self.nodes.get_mut(child) {
                child.parent = removed.parent;
            }
        }

        if let Some(parent) = removed.parent.and_then(|p| self.nodes.get_mut(p)) {
            let at = parent.children.iter().position(|&c| c == node);
            if let Some(at) = at {
                parent.children.splice(at..=at, removed.children.iter().copied());
            }
        }

        Ok(removed.local)
    }

    /// Move a node under a new parent, or make it a root with `None`
    ///
    /// A no-op when the parent is unchanged. Parenting a node to itself or to
    /// one of its descendants is an error.
    pub fn set_parent(&mut self, node: NodeKey, parent: Option<NodeKey>) -> Result<(), SceneError> {
        let current = self.node(node)?.parent;
        if current == parent {
            return Ok(());
        }

        if let Some(parent) = parent {
            if parent == node {
                log::error!("Rejected self-parenting of {:?}", node);
                return Err(SceneError::SelfParenting(node));
            }
            self.node(parent)?;
            if self.is_ancestor(node, parent) {
                log::error!("Rejected cyclic parenting of {:?} under {:?}", node, parent);
                return Err(SceneError::ParentCycle { node, parent });
            }
        }

        if let Some(old) = current.and_then(|p| self.nodes.get_mut(p)) {
            old.children.retain(|&c| c != node);
        }
        if let Some(new) = parent.and_then(|p| self.nodes.get_mut(p)) {
            new.children.push(node);
        }
        if let Some(entry) = self.nodes.get_mut(node) {
            entry.parent = parent;
        }
        Ok(())
    }

    /// Parent of a node
    pub fn parent(&self, node: NodeKey) -> Result<Option<NodeKey>, SceneError> {
        Ok(self.node(node)?.parent)
    }

    /// Ordered children of a node
    pub fn children(&self, node: NodeKey) -> Result<&[NodeKey], SceneError> {
        Ok(&self.node(node)?.children)
    }

    /// Local transform of a node
    pub fn local(&self, node: NodeKey) -> Result<&Transform2D, SceneError> {
        Ok(&self.node(node)?.local)
    }

    /// Mutable local transform of a node
    pub fn local_mut(&mut self, node: NodeKey) -> Result<&mut Transform2D, SceneError> {
        self.nodes
            .get_mut(node)
            .map(|n| &mut n.local)
            .ok_or(SceneError::UnknownNode(node))
    }

    /// Is `ancestor` somewhere above `node`, or `node` itself
    pub fn is_ancestor(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut cursor = Some(node);
        while let Some(key) = cursor {
            if key == ancestor {
                return true;
            }
            cursor = self.nodes.get(key).and_then(|n| n.parent);
        }
        false
    }

    /// World transform: the local matrix composed with every ancestor's
    pub fn world(&self, node: NodeKey) -> Result<Mat4, SceneError> {
        let mut entry = self.node(node)?;
        let mut matrix = entry.local.to_matrix();
        while let Some(parent) = entry.parent {
            entry = self.node(parent)?;
            matrix = entry.local.to_matrix() * matrix;
        }
        Ok(matrix)
    }

    fn node(&self, node: NodeKey) -> Result<&TransformNode, SceneError> {
        self.nodes.get(node).ok_or(SceneError::UnknownNode(node))
    }
}
