//! Concurrent prefix tree mapping object paths to file metadata.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLockWriteGuard};

use bucketfs_common::{is_strict_descendant, normalize_path, split_path, Components};

use super::info::FileInfo;
use super::node::{NodeState, TrieNode};

/// Thread-safe trie of slash-delimited paths.
///
/// Paths are split on `/` with empty components dropped, so `"/a//b/"` and
/// `"a/b"` are the same key. Leaves hold [`FileInfo`]; interior nodes are
/// directories. Directories left with no files beneath them are pruned when
/// their last file is deleted or moved away.
///
/// # Thread Safety
///
/// - Every node has its own `RwLock`; lookups hold at most one read lock at a time
/// - Missing nodes are created with double-checked locking
/// - The file counter is an atomic, updated while the leaf's lock is held
/// - [`move_path`](Self::move_path) is the only operation holding two
///   parent locks at once. Moves run one at a time so that no move can
///   re-parent a node under its own descendant.
pub struct PathTrie {
    root: Arc<TrieNode>,
    leaf_count: AtomicUsize,
    /// Serializes moves; the only operation that changes a node's ancestry.
    moves: Mutex<()>,
}

impl Default for PathTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PathTrie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self {
            root: Arc::new(TrieNode::new("")),
            leaf_count: AtomicUsize::new(0),
            moves: Mutex::new(()),
        }
    }

    /// Insert or overwrite the file at `path`.
    ///
    /// Intermediate directories are created as needed. Overwriting an
    /// existing file does not change [`count_files`](Self::count_files).
    /// An empty path is a no-op.
    ///
    /// # Arguments
    /// * `path` - Slash-delimited file path
    /// * `info` - Metadata to store
    ///
    /// # Returns
    /// The metadata previously stored at `path`, if any.
    pub fn insert(&self, path: &str, info: impl Into<Arc<FileInfo>>) -> Option<Arc<FileInfo>> {
        let components: Components<'_> = split_path(path);
        if components.is_empty() {
            return None;
        }
        let info: Arc<FileInfo> = info.into();

        loop {
            let node: Arc<TrieNode> = self.ensure_path(&components).0.pop()?;
            let mut state = node.write();
            if state.detached {
                // Pruned between creation and locking; walk again.
                continue;
            }
            let previous: Option<Arc<FileInfo>> = state.file.replace(info);
            if previous.is_none() {
                self.leaf_count.fetch_add(1, Ordering::AcqRel);
            }
            return previous;
        }
    }

    /// Create the directory nodes for `path` without marking a file.
    ///
    /// # Arguments
    /// * `path` - Slash-delimited directory path
    pub fn insert_dir(&self, path: &str) {
        let components: Components<'_> = split_path(path);
        if !components.is_empty() {
            self.ensure_path(&components);
        }
    }

    /// Look up the file at `path`.
    ///
    /// # Returns
    /// The stored metadata, or None if the path is missing or is a directory.
    pub fn get(&self, path: &str) -> Option<Arc<FileInfo>> {
        let node: Arc<TrieNode> = self.walk(&split_path(path))?;
        let state = node.read();
        state.file.clone()
    }

    /// Check whether `path` exists as a file or directory.
    ///
    /// The empty path names the root, which always exists.
    pub fn path_exists(&self, path: &str) -> bool {
        self.walk(&split_path(path)).is_some()
    }

    /// Delete the file at `path` and prune directories left empty.
    ///
    /// Pruning walks upward and stops at the first ancestor that is a file
    /// or still has children. Missing paths and directories are left alone.
    ///
    /// # Returns
    /// The removed metadata, or None if no file was at `path`.
    pub fn delete(&self, path: &str) -> Option<Arc<FileInfo>> {
        let components: Components<'_> = split_path(path);
        if components.is_empty() {
            return None;
        }
        let nodes: Vec<Arc<TrieNode>> = self.walk_recording(&components)?;
        let (removed, now_empty) = self.clear_leaf(nodes.last()?);
        let removed: Arc<FileInfo> = removed?;
        if now_empty {
            self.prune_empty_path(&nodes, &components);
        }
        Some(removed)
    }

    /// Remove the file at `path` but keep its node as a directory entry.
    ///
    /// # Returns
    /// The removed metadata, or None if no file was at `path`.
    pub fn delete_file(&self, path: &str) -> Option<Arc<FileInfo>> {
        let components: Components<'_> = split_path(path);
        if components.is_empty() {
            return None;
        }
        let node: Arc<TrieNode> = self.walk(&components)?;
        self.clear_leaf(&node).0
    }

    /// List every file at or below `prefix`.
    ///
    /// Each node is locked only long enough to copy its child list, so no
    /// lock is held while descending.
    ///
    /// # Returns
    /// Normalized paths in sorted order, or None if `prefix` does not exist.
    pub fn list_paths_with_prefix(&self, prefix: &str) -> Option<Vec<String>> {
        let components: Components<'_> = split_path(prefix);
        let start: Arc<TrieNode> = self.walk(&components)?;

        let mut paths: Vec<String> = Vec::new();
        let mut pending: Vec<(Arc<TrieNode>, String)> = vec![(start, normalize_path(prefix))];
        while let Some((node, path)) = pending.pop() {
            let (is_leaf, children) = {
                let state = node.read();
                let children: Vec<(String, Arc<TrieNode>)> = state
                    .children
                    .iter()
                    .map(|(name, child)| (name.clone(), Arc::clone(child)))
                    .collect();
                (state.file.is_some(), children)
            };
            for (name, child) in children {
                let child_path: String = if path.is_empty() {
                    name
                } else {
                    format!("{}/{}", path, name)
                };
                pending.push((child, child_path));
            }
            if is_leaf {
                paths.push(path);
            }
        }

        paths.sort_unstable();
        Some(paths)
    }

    /// Move the file or directory at `source` to `dest`.
    ///
    /// The whole subtree moves as one node relink, so file counts are
    /// unchanged. Missing destination parents are created; they are pruned
    /// again if the move fails.
    ///
    /// Moves are serialized against each other. Inserts, deletes and prunes
    /// never change which node is an ancestor of which, so while a move holds
    /// the move lock the descendant check on path components also holds for
    /// the resolved nodes. Two crossing moves such as `x -> y/x` and
    /// `y -> x/y` therefore cannot link the two directories into each other.
    ///
    /// Under the parent locks the move additionally fails if the destination
    /// parent is the moved node itself. This covers a source sitting directly
    /// under the root whose destination parent resolves back to the source.
    ///
    /// # Returns
    /// False if either path is empty, the paths are equal, `dest` lies inside
    /// `source`, `source` does not exist, `dest` is taken, or a concurrent
    /// operation changed either parent first.
    pub fn move_path(&self, source: &str, dest: &str) -> bool {
        let src: Components<'_> = split_path(source);
        let dst: Components<'_> = split_path(dest);
        if src.is_empty() || dst.is_empty() || src == dst || is_strict_descendant(&src, &dst) {
            return false;
        }
        let (src_dirs, src_name) = src.split_at(src.len() - 1);
        let (dst_dirs, dst_name) = dst.split_at(dst.len() - 1);
        let (src_name, dst_name): (&str, &str) = (src_name[0], dst_name[0]);

        let _serial = self.moves.lock();
        let Some(src_nodes) = self.walk_recording(src_dirs) else {
            return false;
        };
        let src_parent: Arc<TrieNode> = Arc::clone(&src_nodes[src_nodes.len() - 1]);
        if src_parent.child(src_name).is_none() {
            return false;
        }

        let (dst_nodes, created) = self.ensure_path(dst_dirs);
        let dst_parent: Arc<TrieNode> = Arc::clone(&dst_nodes[dst_nodes.len() - 1]);

        let outcome: Option<bool> = if Arc::ptr_eq(&src_parent, &dst_parent) {
            let mut state = src_parent.write();
            Self::relink(&mut state, None, src_name, dst_name, &dst_parent)
        } else {
            let (mut src_state, mut dst_state) = Self::lock_pair(&src_parent, &dst_parent);
            Self::relink(&mut src_state, Some(&mut *dst_state), src_name, dst_name, &dst_parent)
        };

        match outcome {
            Some(src_parent_empty) => {
                tracing::trace!("Moved {} -> {}", source, dest);
                if src_parent_empty {
                    self.prune_empty_path(&src_nodes, src_dirs);
                }
                true
            }
            None => {
                if created {
                    self.prune_empty_path(&dst_nodes, dst_dirs);
                }
                false
            }
        }
    }

    /// Number of files in the trie. O(1).
    pub fn count_files(&self) -> usize {
        self.leaf_count.load(Ordering::Acquire)
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// Read-only traversal to the node for `components`.
    fn walk(&self, components: &[&str]) -> Option<Arc<TrieNode>> {
        let mut node: Arc<TrieNode> = Arc::clone(&self.root);
        for component in components {
            node = node.child(component)?;
        }
        Some(node)
    }

    /// Read-only traversal returning every node from the root to the target.
    fn walk_recording(&self, components: &[&str]) -> Option<Vec<Arc<TrieNode>>> {
        let mut nodes: Vec<Arc<TrieNode>> = Vec::with_capacity(components.len() + 1);
        nodes.push(Arc::clone(&self.root));
        for component in components {
            let next: Arc<TrieNode> = nodes[nodes.len() - 1].child(component)?;
            nodes.push(next);
        }
        Some(nodes)
    }

    /// Traverse to `components`, creating missing nodes.
    ///
    /// # Returns
    /// Every node from the root to the target, and whether any node was created.
    fn ensure_path(&self, components: &[&str]) -> (Vec<Arc<TrieNode>>, bool) {
        'walk: loop {
            let mut created: bool = false;
            let mut nodes: Vec<Arc<TrieNode>> = Vec::with_capacity(components.len() + 1);
            nodes.push(Arc::clone(&self.root));
            for component in components {
                let parent: &Arc<TrieNode> = &nodes[nodes.len() - 1];
                match Self::get_or_create_child(parent, component) {
                    Some((child, was_created)) => {
                        created |= was_created;
                        nodes.push(child);
                    }
                    // Parent was pruned under us; the root never is.
                    None => continue 'walk,
                }
            }
            return (nodes, created);
        }
    }

    /// Double-checked child creation.
    ///
    /// # Returns
    /// The child and whether this call created it, or None if `parent` is detached.
    fn get_or_create_child(parent: &Arc<TrieNode>, name: &str) -> Option<(Arc<TrieNode>, bool)> {
        {
            let state = parent.read();
            if state.detached {
                return None;
            }
            if let Some(child) = state.children.get(name) {
                return Some((Arc::clone(child), false));
            }
        }

        let mut state = parent.write();
        if state.detached {
            return None;
        }
        if let Some(child) = state.children.get(name) {
            return Some((Arc::clone(child), false));
        }
        let child: Arc<TrieNode> = Arc::new(TrieNode::new(name));
        state.children.insert(name.to_owned(), Arc::clone(&child));
        Some((child, true))
    }

    /// Clear a node's file.
    ///
    /// # Returns
    /// The removed file (if the node was a leaf) and whether the node has no children.
    fn clear_leaf(&self, node: &Arc<TrieNode>) -> (Option<Arc<FileInfo>>, bool) {
        let mut state = node.write();
        let removed: Option<Arc<FileInfo>> = state.file.take();
        if removed.is_some() {
            self.leaf_count.fetch_sub(1, Ordering::AcqRel);
        }
        (removed, state.children.is_empty())
    }

    /// Unlink empty nodes along a recorded path, deepest first.
    ///
    /// `nodes[i]` is the parent of the node named `components[i]`, which is
    /// `nodes[i + 1]`. Stops at the first node that is a file, still has
    /// children, or was already replaced or unlinked by someone else.
    fn prune_empty_path(&self, nodes: &[Arc<TrieNode>], components: &[&str]) {
        for depth in (0..components.len()).rev() {
            let parent: &Arc<TrieNode> = &nodes[depth];
            let child: &Arc<TrieNode> = &nodes[depth + 1];
            let name: &str = components[depth];

            let mut parent_state = parent.write();
            if parent_state.detached {
                return;
            }
            match parent_state.children.get(name) {
                Some(current) if Arc::ptr_eq(current, child) => {}
                _ => return,
            }
            {
                let mut child_state = child.write();
                if !child_state.is_prunable() {
                    return;
                }
                child_state.detached = true;
            }
            parent_state.children.remove(name);
            tracing::trace!("Pruned empty directory node {}", name);

            if !parent_state.is_prunable() {
                return;
            }
        }
    }

    /// Lock two distinct nodes in address order.
    ///
    /// The second lock is only tried; on contention both are dropped and the
    /// pair retried, so this never waits while holding a lock that a
    /// parent-then-child locker (prune) might need.
    ///
    /// # Returns
    /// Guards in argument order.
    fn lock_pair<'a>(
        a: &'a Arc<TrieNode>,
        b: &'a Arc<TrieNode>,
    ) -> (RwLockWriteGuard<'a, NodeState>, RwLockWriteGuard<'a, NodeState>) {
        let a_first: bool = TrieNode::addr(a) < TrieNode::addr(b);
        let (first, second) = if a_first { (a, b) } else { (b, a) };
        loop {
            let first_guard = first.write();
            if let Some(second_guard) = second.try_write() {
                return if a_first {
                    (first_guard, second_guard)
                } else {
                    (second_guard, first_guard)
                };
            }
            drop(first_guard);
            std::thread::yield_now();
        }
    }

    /// Move child `src_name` of the locked source parent to `dst_name`.
    ///
    /// With `dst_state` None the destination parent is the source parent.
    /// Re-checks everything the unlocked traversal assumed.
    ///
    /// # Returns
    /// Whether the source parent is now prunable, or None if the move must fail.
    fn relink(
        src_state: &mut NodeState,
        dst_state: Option<&mut NodeState>,
        src_name: &str,
        dst_name: &str,
        dst_parent: &Arc<TrieNode>,
    ) -> Option<bool> {
        if src_state.detached {
            return None;
        }
        let child: Arc<TrieNode> = Arc::clone(src_state.children.get(src_name)?);
        if Arc::ptr_eq(&child, dst_parent) {
            return None;
        }

        match dst_state {
            None => {
                if src_state.children.contains_key(dst_name) {
                    return None;
                }
                src_state.children.remove(src_name);
                child.rename(dst_name);
                src_state.children.insert(dst_name.to_owned(), child);
            }
            Some(dst_state) => {
                if dst_state.detached || dst_state.children.contains_key(dst_name) {
                    return None;
                }
                src_state.children.remove(src_name);
                child.rename(dst_name);
                dst_state.children.insert(dst_name.to_owned(), child);
            }
        }
        Some(src_state.is_prunable())
    }
}

impl fmt::Debug for PathTrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathTrie")
            .field("files", &self.count_files())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn info(size: u64) -> FileInfo {
        FileInfo::new(size)
    }

    #[test]
    fn test_insert_and_get() {
        let trie: PathTrie = PathTrie::new();
        assert!(trie.insert("/a/b/c.txt", info(10)).is_none());

        let found: Arc<FileInfo> = trie.get("a/b/c.txt").unwrap();
        assert_eq!(found.size, 10);
        assert_eq!(trie.count_files(), 1);
    }

    #[test]
    fn test_slash_variants_are_the_same_key() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("dir/file", info(1));
        assert!(trie.get("/dir/file").is_some());
        assert!(trie.get("//dir//file/").is_some());
        assert!(trie.insert("/dir/file/", info(2)).is_some());
        assert_eq!(trie.count_files(), 1);
        assert_eq!(trie.get("dir/file").unwrap().size, 2);
    }

    #[test]
    fn test_overwrite_returns_previous_and_keeps_count() {
        let trie: PathTrie = PathTrie::new();
        let first: Arc<FileInfo> = Arc::new(info(1));
        trie.insert("f", Arc::clone(&first));
        let previous: Arc<FileInfo> = trie.insert("f", info(2)).unwrap();
        assert!(Arc::ptr_eq(&previous, &first));
        assert_eq!(trie.count_files(), 1);
    }

    #[test]
    fn test_empty_path_is_noop() {
        let trie: PathTrie = PathTrie::new();
        assert!(trie.insert("", info(1)).is_none());
        assert!(trie.insert("///", info(1)).is_none());
        assert_eq!(trie.count_files(), 0);
        assert!(trie.get("").is_none());
        assert!(trie.delete("").is_none());
        assert!(trie.path_exists(""));
    }

    #[test]
    fn test_get_directory_is_not_found() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("a/b/c", info(1));
        assert!(trie.get("a/b").is_none());
        assert!(trie.path_exists("a/b"));
        assert!(!trie.path_exists("a/x"));
    }

    #[test]
    fn test_insert_dir() {
        let trie: PathTrie = PathTrie::new();
        trie.insert_dir("/x/y/");
        assert!(trie.path_exists("x"));
        assert!(trie.path_exists("x/y"));
        assert!(trie.get("x/y").is_none());
        assert_eq!(trie.count_files(), 0);
    }

    #[test]
    fn test_delete_prunes_empty_ancestors() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("a/b/c/d.txt", info(1));
        trie.insert("a/e.txt", info(1));

        assert!(trie.delete("a/b/c/d.txt").is_some());
        assert!(!trie.path_exists("a/b/c/d.txt"));
        assert!(!trie.path_exists("a/b/c"));
        assert!(!trie.path_exists("a/b"));
        assert!(trie.path_exists("a"), "shared ancestor must survive");
        assert_eq!(trie.count_files(), 1);
    }

    #[test]
    fn test_delete_stops_at_leaf_ancestor() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("a", info(1));
        trie.insert("a/b/c", info(1));

        trie.delete("a/b/c");
        assert!(!trie.path_exists("a/b"));
        assert!(trie.get("a").is_some());
    }

    #[test]
    fn test_delete_keeps_node_with_children() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("a/b", info(1));
        trie.insert("a/b/c", info(2));

        assert_eq!(trie.delete("a/b").unwrap().size, 1);
        assert!(trie.path_exists("a/b"));
        assert!(trie.get("a/b/c").is_some());
        assert_eq!(trie.count_files(), 1);
    }

    #[test]
    fn test_delete_missing_or_directory_is_noop() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("a/b/c", info(1));
        assert!(trie.delete("a/x").is_none());
        assert!(trie.delete("a/b").is_none());
        assert!(trie.path_exists("a/b/c"));
        assert_eq!(trie.count_files(), 1);
    }

    #[test]
    fn test_delete_file_keeps_node() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("a/b", info(7));

        assert_eq!(trie.delete_file("a/b").unwrap().size, 7);
        assert!(trie.path_exists("a/b"));
        assert!(trie.get("a/b").is_none());
        assert_eq!(trie.count_files(), 0);
        assert!(trie.delete_file("a/b").is_none());

        // Node cycles back to a leaf.
        trie.insert("a/b", info(8));
        assert_eq!(trie.count_files(), 1);
    }

    #[test]
    fn test_list_paths_with_prefix() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("a/b/1", info(1));
        trie.insert("a/b/2", info(1));
        trie.insert("a/c/3", info(1));
        trie.insert("a/b", info(1));
        trie.insert("z", info(1));

        assert_eq!(
            trie.list_paths_with_prefix("/a/b/").unwrap(),
            vec!["a/b", "a/b/1", "a/b/2"]
        );
        assert_eq!(trie.list_paths_with_prefix("").unwrap().len(), 5);
        assert!(trie.list_paths_with_prefix("missing").is_none());
    }

    #[test]
    fn test_list_with_unnormalized_prefix() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("a/b/c", info(1));
        trie.insert("a/b", info(1));
        assert_eq!(
            trie.list_paths_with_prefix("//a//b/").unwrap(),
            vec!["a/b", "a/b/c"]
        );
    }

    #[test]
    fn test_list_empty_directory() {
        let trie: PathTrie = PathTrie::new();
        trie.insert_dir("empty");
        assert_eq!(trie.list_paths_with_prefix("empty"), Some(Vec::new()));
    }

    #[test]
    fn test_move_file() {
        let trie: PathTrie = PathTrie::new();
        let original: Arc<FileInfo> = Arc::new(info(3));
        trie.insert("src/f.txt", Arc::clone(&original));

        assert!(trie.move_path("src/f.txt", "dst/sub/g.txt"));
        assert!(!trie.path_exists("src/f.txt"));
        assert!(!trie.path_exists("src"), "emptied source parent is pruned");
        assert!(Arc::ptr_eq(&trie.get("dst/sub/g.txt").unwrap(), &original));
        assert_eq!(trie.count_files(), 1);
    }

    #[test]
    fn test_move_directory_subtree() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("x/d/1", info(1));
        trie.insert("x/d/e/2", info(2));
        trie.insert("x/keep", info(3));

        assert!(trie.move_path("x/d", "y/d2"));
        assert!(trie.get("y/d2/1").is_some());
        assert!(trie.get("y/d2/e/2").is_some());
        assert!(!trie.path_exists("x/d"));
        assert!(trie.path_exists("x"));
        assert_eq!(trie.count_files(), 3);
        assert_eq!(
            trie.list_paths_with_prefix("y").unwrap(),
            vec!["y/d2/1", "y/d2/e/2"]
        );
    }

    #[test]
    fn test_rename_within_same_parent() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("dir/old", info(1));
        assert!(trie.move_path("dir/old", "dir/new"));
        assert!(trie.get("dir/new").is_some());
        assert!(!trie.path_exists("dir/old"));
        assert!(trie.path_exists("dir"));
    }

    #[test]
    fn test_move_rejections() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("x/y/f", info(1));
        trie.insert("taken", info(2));

        assert!(!trie.move_path("x/y", "x/y/z"));
        assert!(!trie.move_path("x/y", "/x/y/"));
        assert!(!trie.move_path("", "a"));
        assert!(!trie.move_path("a", ""));
        assert!(!trie.move_path("missing", "b"));
        assert!(!trie.move_path("x/y/f", "taken"));

        assert!(trie.get("x/y/f").is_some());
        assert!(trie.get("taken").is_some());
        assert_eq!(trie.count_files(), 2);
    }

    #[test]
    fn test_rejected_move_leaves_no_new_directories() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("a", info(1));
        trie.insert("c/d/b", info(3));

        assert!(!trie.move_path("a", "c/d/b"));
        assert!(trie.path_exists("c/d"));
        assert!(trie.get("a").is_some());

        assert!(!trie.move_path("missing", "fresh/dir/x"));
        assert!(!trie.path_exists("fresh"));
    }

    #[test]
    fn test_prune_after_failed_move_removes_only_empty_dirs() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("keep/f", info(1));
        let components: [&str; 3] = ["keep", "tmp", "deeper"];
        let (nodes, created) = trie.ensure_path(&components);
        assert!(created);

        trie.prune_empty_path(&nodes, &components);
        assert!(!trie.path_exists("keep/tmp"));
        assert!(trie.get("keep/f").is_some());
    }

    #[test]
    fn test_insert_retries_past_pruned_node() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("a/b/f", info(1));
        let stale: Arc<TrieNode> = trie.walk(&["a", "b"]).unwrap();
        trie.delete("a/b/f");
        assert!(stale.read().detached);

        trie.insert("a/b/g", info(2));
        assert!(trie.get("a/b/g").is_some());
        assert_eq!(trie.count_files(), 1);
    }

    #[test]
    fn test_moved_name_is_updated() {
        let trie: PathTrie = PathTrie::new();
        trie.insert("a/b", info(1));
        assert!(trie.move_path("a/b", "c"));
        let node: Arc<TrieNode> = trie.walk(&["c"]).unwrap();
        assert_eq!(node.name(), "c");
    }
}
