//! Node arena and tree topology.
//!
//! Nodes live in slots addressed by [`NodeId`]. Destroyed slots go on a
//! free list and are recycled with a bumped generation.
//!
//! Child sets are kept in ascending `(z_index, insertion sequence)` order,
//! but only lazily: anything that can invalidate the order just marks the
//! parent dirty, and traversals call [`SceneTree::resort`] right before they
//! visit the children. A burst of z-index changes therefore costs a single
//! sort per frame.

use std::collections::VecDeque;
use std::fmt;

use crate::context::Notification;
use crate::error::{SceneError, SceneResult};
use crate::geometry::{Point, Rect};

use super::{NodeId, Widget};

/// Per-node data stored in the arena.
#[derive(Debug, Clone)]
pub struct NodeData {
    rect: Rect,
    z_index: i32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    children_dirty: bool,
    hidden: bool,
    /// Insertion sequence under the current parent; breaks z-index ties.
    seq: u64,
    name: &'static str,
}

impl NodeData {
    fn new(rect: Rect, z_index: i32, name: &'static str) -> Self {
        Self {
            rect,
            z_index,
            parent: None,
            children: Vec::new(),
            children_dirty: false,
            hidden: false,
            seq: 0,
            name,
        }
    }

    /// Rectangle relative to the parent's origin.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Z-order key.
    #[must_use]
    pub const fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Parent node, `None` for roots and detached nodes.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in their current order, which may be stale until the next
    /// traversal if [`NodeData::children_dirty`] is set.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// True when the child order needs a resort.
    #[must_use]
    pub const fn children_dirty(&self) -> bool {
        self.children_dirty
    }

    /// True when the node is hidden.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Widget name, for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

struct NodeEntry {
    data: NodeData,
    /// Taken out while one of its hooks runs.
    widget: Option<Box<dyn Widget>>,
}

struct Slot {
    generation: u32,
    entry: Option<NodeEntry>,
}

/// The node arena plus the tree structure over it.
pub struct SceneTree {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    len: usize,
    next_seq: u64,
    /// Hook notifications waiting for delivery.
    pending: VecDeque<Notification>,
}

impl SceneTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(256),
            free_list: Vec::new(),
            len: 0,
            next_seq: 0,
            pending: VecDeque::new(),
        }
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    /// Creates a node and, if `parent` is given, attaches it immediately.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `parent` is not a live node.
    pub fn insert(
        &mut self,
        rect: Rect,
        parent: Option<NodeId>,
        z_index: i32,
        widget: Box<dyn Widget>,
    ) -> SceneResult<NodeId> {
        if let Some(parent) = parent {
            self.data(parent)?;
        }

        let entry = NodeEntry {
            data: NodeData::new(rect, z_index, widget.name()),
            widget: Some(widget),
        };

        let id = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            NodeId::new(index, slot.generation)
        } else {
            let index = u32::try_from(self.slots.len()).map_err(|_| SceneError::ArenaFull)?;
            self.slots.push(Slot {
                generation: 0,
                entry: Some(entry),
            });
            NodeId::new(index, 0)
        };
        self.len += 1;

        if let Some(parent) = parent {
            self.add_child(parent, id)?;
        }
        Ok(id)
    }

    /// Destroys `node` and its whole subtree.
    ///
    /// The node is first detached from its parent. Returns every destroyed
    /// handle, root of the subtree first, so the caller can drop focus and
    /// hover references to them. Outside the crate nodes are destroyed
    /// through [`Scene::destroy`](crate::Scene::destroy) or
    /// [`EventCx::destroy`](super::EventCx::destroy).
    pub(crate) fn destroy(&mut self, node: NodeId) -> SceneResult<Vec<NodeId>> {
        if let Some(parent) = self.data(node)?.parent {
            self.remove_child(parent, node)?;
        }

        let mut removed = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let slot = &mut self.slots[id.index() as usize];
            if let Some(entry) = slot.entry.take() {
                stack.extend(entry.data.children.iter().rev().copied());
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push(id.index());
                self.len -= 1;
                removed.push(id);
            }
        }

        tracing::debug!(%node, count = removed.len(), "destroyed subtree");
        Ok(removed)
    }

    /// Returns true if `node` refers to a live node.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.entry(node).is_ok()
    }

    /// Number of live nodes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True when the tree holds no nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over every live node, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry.as_ref()?;
            let index = u32::try_from(index).ok()?;
            Some(NodeId::new(index, slot.generation))
        })
    }

    fn entry(&self, node: NodeId) -> SceneResult<&NodeEntry> {
        self.slots
            .get(node.index() as usize)
            .filter(|slot| slot.generation == node.generation())
            .and_then(|slot| slot.entry.as_ref())
            .ok_or(SceneError::StaleNode(node))
    }

    fn entry_mut(&mut self, node: NodeId) -> SceneResult<&mut NodeEntry> {
        self.slots
            .get_mut(node.index() as usize)
            .filter(|slot| slot.generation == node.generation())
            .and_then(|slot| slot.entry.as_mut())
            .ok_or(SceneError::StaleNode(node))
    }

    /// Read access to a node's data.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn data(&self, node: NodeId) -> SceneResult<&NodeData> {
        self.entry(node).map(|entry| &entry.data)
    }

    fn data_mut(&mut self, node: NodeId) -> SceneResult<&mut NodeData> {
        self.entry_mut(node).map(|entry| &mut entry.data)
    }

    pub(crate) fn take_widget(&mut self, node: NodeId) -> Option<Box<dyn Widget>> {
        self.entry_mut(node).ok()?.widget.take()
    }

    /// Puts a widget back after its hook ran. If the hook destroyed its own
    /// node, the widget is dropped here.
    pub(crate) fn restore_widget(&mut self, node: NodeId, widget: Box<dyn Widget>) {
        if let Ok(entry) = self.entry_mut(node) {
            entry.widget = Some(widget);
        }
    }

    pub(crate) fn notify(&mut self, notification: Notification) {
        self.pending.push_back(notification);
    }

    pub(crate) fn pop_notification(&mut self) -> Option<Notification> {
        self.pending.pop_front()
    }

    pub(crate) fn discard_notifications(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    // =========================================================================
    // Topology
    // =========================================================================

    /// Parent of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn parent(&self, node: NodeId) -> SceneResult<Option<NodeId>> {
        Ok(self.data(node)?.parent)
    }

    /// Children of `node` in their current, possibly stale, order.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn children(&self, node: NodeId) -> SceneResult<&[NodeId]> {
        Ok(&self.data(node)?.children)
    }

    /// Children of `node` in ascending paint order, resorting first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn sorted_children(&mut self, node: NodeId) -> SceneResult<&[NodeId]> {
        self.resort(node)?;
        self.children(node)
    }

    /// Rebuilds the child order of `node` if it is marked dirty.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn resort(&mut self, node: NodeId) -> SceneResult<()> {
        let data = self.data_mut(node)?;
        if !data.children_dirty {
            return Ok(());
        }
        let mut children = std::mem::take(&mut data.children);
        children.sort_by_key(|&child| {
            self.data(child)
                .map_or((i32::MAX, u64::MAX), |c| (c.z_index, c.seq))
        });

        let data = self.data_mut(node)?;
        data.children = children;
        data.children_dirty = false;
        tracing::trace!(%node, "resorted children");
        Ok(())
    }

    /// Makes `child` a child of `parent`.
    ///
    /// A no-op if it already is. If `child` has another parent it is moved,
    /// within this one call.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] for a dead handle and
    /// [`SceneError::WouldCycle`] if `parent` is `child` or one of its
    /// descendants.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.data(parent)?;
        let previous = self.data(child)?.parent;
        if previous == Some(parent) {
            return Ok(());
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(SceneError::WouldCycle { child, parent });
        }

        if let Some(previous) = previous {
            self.detach(previous, child)?;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        let data = self.data_mut(child)?;
        data.parent = Some(parent);
        data.seq = seq;

        let data = self.data_mut(parent)?;
        data.children.push(child);
        data.children_dirty = true;

        tracing::debug!(%parent, %child, ?previous, "attached child");
        Ok(())
    }

    /// Detaches `child` from `parent`. A no-op if it is not a child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] for a dead handle.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.data(parent)?;
        if self.data(child)?.parent != Some(parent) {
            return Ok(());
        }
        self.detach(parent, child)?;
        self.data_mut(child)?.parent = None;
        tracing::debug!(%parent, %child, "detached child");
        Ok(())
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        let data = self.data_mut(parent)?;
        data.children.retain(|&c| c != child);
        data.children_dirty = true;
        Ok(())
    }

    /// Moves `node` under `parent`, or detaches it when `parent` is `None`.
    ///
    /// # Errors
    ///
    /// Same as [`SceneTree::add_child`].
    pub fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> SceneResult<()> {
        match (parent, self.data(node)?.parent) {
            (Some(parent), _) => self.add_child(parent, node),
            (None, Some(previous)) => self.remove_child(previous, node),
            (None, None) => Ok(()),
        }
    }

    /// True if `ancestor` is a strict ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.data(node).ok().and_then(NodeData::parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.data(id).ok().and_then(NodeData::parent);
        }
        false
    }

    /// Number of ancestors above `node`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn depth(&self, node: NodeId) -> SceneResult<usize> {
        let mut depth = 0;
        let mut current = self.data(node)?.parent;
        while let Some(id) = current {
            depth += 1;
            current = self.data(id)?.parent;
        }
        Ok(depth)
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Z-order key of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn z_index(&self, node: NodeId) -> SceneResult<i32> {
        Ok(self.data(node)?.z_index)
    }

    /// Changes the z-order key and marks the parent's child order dirty.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn set_z_index(&mut self, node: NodeId, z_index: i32) -> SceneResult<()> {
        let data = self.data_mut(node)?;
        data.z_index = z_index;
        if let Some(parent) = data.parent {
            self.data_mut(parent)?.children_dirty = true;
        }
        Ok(())
    }

    /// Rectangle of `node` relative to its parent.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn rect(&self, node: NodeId) -> SceneResult<Rect> {
        Ok(self.data(node)?.rect)
    }

    /// Replaces the relative rectangle of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) -> SceneResult<()> {
        self.data_mut(node)?.rect = rect;
        Ok(())
    }

    /// Position of `node` in surface space: the sum of its own and every
    /// ancestor's relative position. Walks to the root on every call.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn absolute_position(&self, node: NodeId) -> SceneResult<Point> {
        let data = self.data(node)?;
        let mut position = data.rect.origin();
        let mut current = data.parent;
        while let Some(id) = current {
            let ancestor = self.data(id)?;
            position = position + ancestor.rect.origin();
            current = ancestor.parent;
        }
        Ok(position)
    }

    /// Rectangle of `node` in surface space.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn absolute_rect(&self, node: NodeId) -> SceneResult<Rect> {
        let origin = self.absolute_position(node)?;
        Ok(self.data(node)?.rect.with_origin(origin))
    }

    /// Offset of `node` from `other`, both in surface space.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if either node is not live.
    pub fn relative_position_from(&self, node: NodeId, other: NodeId) -> SceneResult<Point> {
        Ok(self.absolute_position(node)? - self.absolute_position(other)?)
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Hides `node` and every descendant.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn hide(&mut self, node: NodeId) -> SceneResult<()> {
        self.set_hidden(node, true)
    }

    /// Shows `node` and every descendant.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn show(&mut self, node: NodeId) -> SceneResult<()> {
        self.set_hidden(node, false)
    }

    /// True if `node` is hidden.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn is_hidden(&self, node: NodeId) -> SceneResult<bool> {
        Ok(self.data(node)?.hidden)
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) -> SceneResult<()> {
        self.data(node)?;
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let data = self.data_mut(id)?;
            data.hidden = hidden;
            stack.extend(data.children.iter().rev().copied());
            self.notify(Notification::Visibility { node: id, hidden });
        }
        Ok(())
    }
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SceneTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneTree")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}
