//! Trie node representing one path component.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::info::FileInfo;

/// Fields guarded by a node's own lock.
#[derive(Debug, Default)]
pub(crate) struct NodeState {
    /// Child nodes keyed by component name.
    pub(crate) children: HashMap<String, Arc<TrieNode>>,
    /// File metadata; present iff this node terminates a file path.
    pub(crate) file: Option<Arc<FileInfo>>,
    /// Set once a prune has unlinked this node from its parent.
    pub(crate) detached: bool,
}

impl NodeState {
    /// Leafless and childless nodes are garbage once their last path is gone.
    pub(crate) fn is_prunable(&self) -> bool {
        self.file.is_none() && self.children.is_empty()
    }
}

/// One component of a slash-delimited path.
///
/// Each node locks only its own state; there is no tree-wide lock. When two
/// node locks are held at once, a parent is always locked before its child,
/// except in [`PathTrie::move_path`](super::PathTrie::move_path), which
/// orders the two parents by address and backs off instead of waiting.
#[derive(Debug)]
pub(crate) struct TrieNode {
    /// Component name. Separate lock so a rename never nests inside tree locks.
    name: RwLock<String>,
    state: RwLock<NodeState>,
}

impl TrieNode {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: RwLock::new(name.to_owned()),
            state: RwLock::new(NodeState::default()),
        }
    }

    pub(crate) fn name(&self) -> String {
        self.name.read().clone()
    }

    pub(crate) fn rename(&self, name: &str) {
        *self.name.write() = name.to_owned();
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, NodeState> {
        self.state.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, NodeState> {
        self.state.write()
    }

    pub(crate) fn try_write(&self) -> Option<RwLockWriteGuard<'_, NodeState>> {
        self.state.try_write()
    }

    /// Look up a child under a short read lock.
    pub(crate) fn child(&self, name: &str) -> Option<Arc<TrieNode>> {
        self.state.read().children.get(name).cloned()
    }

    /// Memory address used to order lock acquisition.
    pub(crate) fn addr(node: &Arc<TrieNode>) -> usize {
        Arc::as_ptr(node) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_prunable() {
        let node: TrieNode = TrieNode::new("dir");
        assert_eq!(node.name(), "dir");
        assert!(node.read().is_prunable());
        assert!(!node.read().detached);
    }

    #[test]
    fn test_node_with_child_is_not_prunable() {
        let node: TrieNode = TrieNode::new("dir");
        node.write()
            .children
            .insert("file".to_string(), Arc::new(TrieNode::new("file")));
        assert!(!node.read().is_prunable());
        assert!(node.child("file").is_some());
        assert!(node.child("other").is_none());
    }

    #[test]
    fn test_rename() {
        let node: TrieNode = TrieNode::new("old");
        node.rename("new");
        assert_eq!(node.name(), "new");
    }
}
