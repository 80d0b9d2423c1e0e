//! Arena-backed store for a forest of parent-linked nodes.

use std::collections::{HashMap, HashSet};

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, warn};

use crate::domain::error::{StoreError, StoreResult};
use crate::domain::node::{NodeId, TreeNode};

/// In-memory repository of tree nodes.
///
/// Nodes live in a generational arena. `order` keeps arena indices in
/// collection (insertion) order, `index` maps ids to arena slots for O(1)
/// lookup. All mutation goes through validated operations, so between calls
/// the collection forms a forest: every parent resolves and no node is its
/// own ancestor. `initialize` is the exception, it trusts its input.
#[derive(Debug, Default)]
pub struct TreeStore {
    arena: Arena<TreeNode>,
    order: Vec<Index>,
    index: HashMap<NodeId, Index>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from raw nodes without structural validation.
    pub fn from_items(items: impl IntoIterator<Item = TreeNode>) -> Self {
        let mut store = Self::new();
        store.initialize(items);
        store
    }

    /// Replaces the whole collection.
    ///
    /// Parent existence and acyclicity are not checked. With duplicate ids,
    /// lookups resolve to the first occurrence.
    #[instrument(level = "debug", skip_all)]
    pub fn initialize(&mut self, items: impl IntoIterator<Item = TreeNode>) {
        self.arena.clear();
        self.order.clear();
        self.index.clear();

        for item in items {
            let id = item.id.clone();
            let idx = self.arena.insert(item);
            self.order.push(idx);
            if self.index.contains_key(&id) {
                warn!(%id, "duplicate id in bulk load, lookups resolve to first occurrence");
            } else {
                self.index.insert(id, idx);
            }
        }
        debug!(nodes = self.order.len(), "store initialized");
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: impl AsRef<str>) -> bool {
        self.index.contains_key(id.as_ref())
    }

    /// Nodes in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.order.iter().filter_map(|&idx| self.arena.get(idx))
    }

    /// The whole collection in collection order.
    pub fn get_all(&self) -> Vec<&TreeNode> {
        self.iter().collect()
    }

    /// Owned copy of the collection, suitable for history snapshots.
    pub fn snapshot(&self) -> Vec<TreeNode> {
        self.iter().cloned().collect()
    }

    #[instrument(level = "trace", skip(self, id), fields(id = id.as_ref()))]
    pub fn get_item_by_id(&self, id: impl AsRef<str>) -> Option<&TreeNode> {
        self.index
            .get(id.as_ref())
            .and_then(|&idx| self.arena.get(idx))
    }

    /// Direct children of `id` in collection order.
    #[instrument(level = "trace", skip(self, id), fields(id = id.as_ref()))]
    pub fn get_children(&self, id: impl AsRef<str>) -> Vec<&TreeNode> {
        let id = id.as_ref();
        self.iter().filter(|node| node.is_child_of(id)).collect()
    }

    /// All descendants of `id` in pre-order: each child is followed by its
    /// own descendants before the next sibling.
    #[instrument(level = "trace", skip(self, id), fields(id = id.as_ref()))]
    pub fn get_all_children(&self, id: impl AsRef<str>) -> Vec<&TreeNode> {
        let id = id.as_ref();
        let mut visited = HashSet::new();
        let mut descendants = Vec::new();
        self.collect_descendants(id, id, &mut visited, &mut descendants);
        descendants
    }

    fn collect_descendants<'a>(
        &'a self,
        origin: &str,
        id: &str,
        visited: &mut HashSet<Index>,
        out: &mut Vec<&'a TreeNode>,
    ) {
        for &idx in &self.order {
            let Some(node) = self.arena.get(idx) else {
                continue;
            };
            if !node.is_child_of(id) || node.id.as_str() == origin || !visited.insert(idx) {
                continue;
            }
            out.push(node);
            self.collect_descendants(origin, node.id.as_str(), visited, out);
        }
    }

    /// Ancestors of `id`, nearest first. Stops at a root or at the first
    /// parent id that does not resolve.
    #[instrument(level = "trace", skip(self, id), fields(id = id.as_ref()))]
    pub fn get_all_parents(&self, id: impl AsRef<str>) -> Vec<&TreeNode> {
        let mut ancestors = Vec::new();
        let Some(&start) = self.index.get(id.as_ref()) else {
            return ancestors;
        };
        let mut seen = HashSet::from([start]);
        let mut current = self.arena.get(start);

        while let Some(parent_id) = current.and_then(|node| node.parent.as_ref()) {
            let Some(&idx) = self.index.get(parent_id) else {
                break;
            };
            if !seen.insert(idx) {
                break;
            }
            current = self.arena.get(idx);
            if let Some(parent) = current {
                ancestors.push(parent);
            }
        }
        ancestors
    }

    /// Nodes without a resolvable parent, in collection order.
    pub fn roots(&self) -> Vec<&TreeNode> {
        self.iter()
            .filter(|node| match &node.parent {
                None => true,
                Some(parent) => !self.index.contains_key(parent),
            })
            .collect()
    }

    /// Appends a node after checking id uniqueness and parent existence.
    #[instrument(level = "debug", skip(self), fields(id = %item.id))]
    pub fn add_item(&mut self, item: TreeNode) -> StoreResult<()> {
        if self.index.contains_key(&item.id) {
            return Err(StoreError::DuplicateId(item.id));
        }
        if let Some(parent) = &item.parent {
            if !self.index.contains_key(parent) {
                return Err(StoreError::ParentNotFound {
                    id: item.id,
                    parent: parent.clone(),
                });
            }
        }

        let id = item.id.clone();
        let idx = self.arena.insert(item);
        self.order.push(idx);
        self.index.insert(id, idx);
        Ok(())
    }

    /// Removes `id` and all of its descendants.
    ///
    /// Returns the removed nodes in collection order. Survivors keep their
    /// relative order.
    #[instrument(level = "debug", skip(self, id), fields(id = id.as_ref()))]
    pub fn remove_item(&mut self, id: impl AsRef<str>) -> StoreResult<Vec<TreeNode>> {
        let id = id.as_ref();
        if !self.index.contains_key(id) {
            return Err(StoreError::NotFound(NodeId::from(id)));
        }

        let mut doomed: HashSet<NodeId> = self
            .get_all_children(id)
            .into_iter()
            .map(|node| node.id.clone())
            .collect();
        doomed.insert(NodeId::from(id));

        let mut removed = Vec::with_capacity(doomed.len());
        let arena = &mut self.arena;
        self.order.retain(|&idx| {
            let drop_it = arena.get(idx).map_or(true, |node| doomed.contains(&node.id));
            if drop_it {
                if let Some(node) = arena.remove(idx) {
                    removed.push(node);
                }
            }
            !drop_it
        });
        for doomed_id in &doomed {
            self.index.remove(doomed_id);
        }

        debug!(removed = removed.len(), "removed subtree");
        Ok(removed)
    }

    /// Replaces label and parent of an existing node in place.
    ///
    /// Reparenting to a different, non-null parent requires that parent to
    /// exist and be neither the node itself, one of its ancestors, nor one of
    /// its descendants. Moving to root is always allowed. Returns the previous version of the node.
    #[instrument(level = "debug", skip(self), fields(id = %item.id))]
    pub fn update_item(&mut self, item: TreeNode) -> StoreResult<TreeNode> {
        let Some(&idx) = self.index.get(&item.id) else {
            return Err(StoreError::NotFound(item.id));
        };
        let current_parent = self.arena.get(idx).and_then(|node| node.parent.as_ref());

        if item.parent.as_ref() != current_parent {
            if let Some(new_parent) = &item.parent {
                if !self.index.contains_key(new_parent) {
                    return Err(StoreError::NewParentNotFound {
                        id: item.id,
                        parent: new_parent.clone(),
                    });
                }
                if self.would_create_cycle(&item.id, new_parent) {
                    return Err(StoreError::Cycle {
                        id: item.id,
                        parent: new_parent.clone(),
                    });
                }
            }
        }

        match self.arena.get_mut(idx) {
            Some(node) => Ok(std::mem::replace(node, item)),
            None => Err(StoreError::NotFound(item.id)),
        }
    }

    /// True if `new_parent` is `id` itself, one of its current ancestors,
    /// or one of its descendants.
    fn would_create_cycle(&self, id: &NodeId, new_parent: &NodeId) -> bool {
        new_parent == id
            || self
                .get_all_parents(id)
                .iter()
                .any(|ancestor| &ancestor.id == new_parent)
            || self
                .get_all_parents(new_parent)
                .iter()
                .any(|ancestor| &ancestor.id == id)
    }
}
