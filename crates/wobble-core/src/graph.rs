//! Retained 2D scene graph.
//!
//! Nodes live in a slot arena and are addressed by generational [`NodeId`]s,
//! so an id that outlived its node (a scene destroyed twice, an update that
//! arrives after teardown) simply stops resolving instead of aliasing a newer
//! node. Only nodes reachable from [`SceneGraph::root`] are drawn.

use glam::Vec2;

use crate::error::SceneError;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// CSS `rgba()` string for Canvas2D styles.
    pub fn to_css(self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({},{},{},{:.3})",
            c(self.r),
            c(self.g),
            c(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }
}

impl Transform {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Group,
    Circle { radius: f32 },
    Ellipse { rx: f32, ry: f32 },
    Rect { width: f32, height: f32 },
    Line { to: Vec2 },
    Polyline { points: Vec<Vec2> },
    Text { text: String, size: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Style {
    pub fill: Option<Rgba>,
    pub stroke: Option<Rgba>,
    pub stroke_width: f32,
    /// Shadow blur radius in pixels; 0 disables the glow.
    pub glow: f32,
}

impl Style {
    pub fn fill(color: Rgba) -> Self {
        Self {
            fill: Some(color),
            ..Default::default()
        }
    }

    pub fn stroke(color: Rgba, width: f32) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            ..Default::default()
        }
    }

    pub fn with_glow(mut self, glow: f32) -> Self {
        self.glow = glow;
        self
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub transform: Transform,
    pub style: Style,
    pub alpha: f32,
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, style: Style) -> Self {
        Self {
            kind,
            transform: Transform::default(),
            style,
            alpha: 1.0,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Callbacks for a depth-first walk over the drawable part of the graph.
pub trait Visitor {
    /// Called before a node's children. Return `false` to skip them.
    fn enter(&mut self, node: &Node) -> bool;
    fn leave(&mut self, node: &Node);
}

pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    live: usize,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut graph = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            live: 0,
        };
        graph.root = graph.create(NodeKind::Group, Style::default());
        graph
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, the stage root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live <= 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    /// Like [`get_mut`](Self::get_mut) but names the scene part that went missing.
    pub fn node_mut(&mut self, id: NodeId, what: &'static str) -> Result<&mut Node, SceneError> {
        self.get_mut(id).ok_or(SceneError::MissingNode(what))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Allocate a detached node.
    pub fn create(&mut self, kind: NodeKind, style: Style) -> NodeId {
        let node = Node::new(kind, style);
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Allocate a node directly under `parent`. `None` if the parent is gone.
    pub fn create_child(&mut self, parent: NodeId, kind: NodeKind, style: Style) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.create(kind, style);
        self.attach(parent, id);
        Some(id)
    }

    /// Move `child` under `parent`, detaching it from any previous parent.
    /// Refuses to create cycles.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) || child == self.root {
            return false;
        }
        if self.is_ancestor_or_self(child, parent) {
            return false;
        }
        self.detach(child);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
        true
    }

    /// Unlink a node from its parent. Returns whether it had one.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = None;
        }
        true
    }

    /// Remove a node and its whole subtree. Stale ids and the root are
    /// ignored. Returns the number of nodes freed.
    pub fn remove(&mut self, id: NodeId) -> usize {
        if id == self.root || !self.contains(id) {
            return 0;
        }
        self.detach(id);
        let mut stack = vec![id];
        let mut freed = 0;
        while let Some(cur) = stack.pop() {
            let slot = &mut self.slots[cur.index as usize];
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(cur.index);
                stack.extend(node.children);
                freed += 1;
            }
        }
        self.live -= freed;
        freed
    }

    /// Whether the node is reachable from the stage root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_ancestor_or_self(self.root, id)
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent(c);
        }
        false
    }

    /// Depth-first walk from the root over visible nodes.
    pub fn walk(&self, visitor: &mut impl Visitor) {
        self.walk_from(self.root, visitor);
    }

    fn walk_from(&self, id: NodeId, visitor: &mut impl Visitor) {
        let Some(node) = self.get(id) else {
            return;
        };
        if !node.visible {
            return;
        }
        if visitor.enter(node) {
            for child in &node.children {
                self.walk_from(*child, &mut *visitor);
            }
        }
        visitor.leave(node);
    }

    /// Start building a detached container. Nodes created through the
    /// builder are freed again unless [`ContainerBuilder::finish`] is called.
    pub fn build_container(&mut self) -> ContainerBuilder<'_> {
        let container = self.create(NodeKind::Group, Style::default());
        ContainerBuilder {
            graph: self,
            container,
            committed: false,
        }
    }
}

pub struct ContainerBuilder<'g> {
    graph: &'g mut SceneGraph,
    container: NodeId,
    committed: bool,
}

impl<'g> ContainerBuilder<'g> {
    #[inline]
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Add a node directly under the container.
    pub fn add(&mut self, kind: NodeKind, style: Style) -> NodeId {
        let id = self.graph.create(kind, style);
        self.graph.attach(self.container, id);
        id
    }

    /// Add a node under another node created by this builder. Parents
    /// outside the container are rejected.
    pub fn add_to(&mut self, parent: NodeId, kind: NodeKind, style: Style) -> Result<NodeId, SceneError> {
        if !self.graph.is_ancestor_or_self(self.container, parent) {
            return Err(SceneError::MissingNode("parent"));
        }
        self.graph
            .create_child(parent, kind, style)
            .ok_or(SceneError::MissingNode("parent"))
    }

    /// Mutable access to a node inside the container.
    pub fn node_mut(&mut self, id: NodeId, what: &'static str) -> Result<&mut Node, SceneError> {
        if !self.graph.is_ancestor_or_self(self.container, id) {
            return Err(SceneError::MissingNode(what));
        }
        self.graph.node_mut(id, what)
    }

    pub fn finish(mut self) -> NodeId {
        self.committed = true;
        self.container
    }
}

impl Drop for ContainerBuilder<'_> {
    fn drop(&mut self) {
        if !self.committed {
            let freed = self.graph.remove(self.container);
            log::debug!("[graph] discarded partial container ({} nodes)", freed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_ids_do_not_resolve_after_slot_reuse() {
        let mut g = SceneGraph::new();
        let a = g.create(NodeKind::Group, Style::default());
        assert_eq!(g.remove(a), 1);
        let b = g.create(NodeKind::Circle { radius: 2.0 }, Style::default());
        assert!(!g.contains(a));
        assert!(g.contains(b));
        assert_eq!(g.remove(a), 0);
        assert!(g.contains(b));
    }

    #[test]
    fn remove_frees_subtree_and_unlinks_parent() {
        let mut g = SceneGraph::new();
        let root = g.root();
        let c = g.create_child(root, NodeKind::Group, Style::default()).unwrap();
        let leaf = g.create_child(c, NodeKind::Circle { radius: 1.0 }, Style::default()).unwrap();
        assert!(g.is_attached(leaf));
        assert_eq!(g.len(), 3);
        assert_eq!(g.remove(c), 2);
        assert!(g.children(root).is_empty());
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn root_cannot_be_removed_or_reparented() {
        let mut g = SceneGraph::new();
        let root = g.root();
        let c = g.create(NodeKind::Group, Style::default());
        assert_eq!(g.remove(root), 0);
        assert!(!g.attach(c, root));
    }

    #[test]
    fn attach_rejects_cycles() {
        let mut g = SceneGraph::new();
        let a = g.create(NodeKind::Group, Style::default());
        let b = g.create_child(a, NodeKind::Group, Style::default()).unwrap();
        assert!(!g.attach(b, a));
        assert!(!g.attach(a, a));
        assert_eq!(g.parent(b), Some(a));
    }

    #[test]
    fn unfinished_builder_frees_its_nodes() {
        let mut g = SceneGraph::new();
        {
            let mut b = g.build_container();
            let body = b.add(NodeKind::Circle { radius: 3.0 }, Style::default());
            b.add_to(body, NodeKind::Group, Style::default()).unwrap();
        }
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn builder_stays_inside_its_container() {
        let mut g = SceneGraph::new();
        let root = g.root();
        let outsider = g.create(NodeKind::Group, Style::default());
        {
            let mut b = g.build_container();
            let body = b.add(NodeKind::Circle { radius: 3.0 }, Style::default());
            assert!(b.add_to(root, NodeKind::Group, Style::default()).is_err());
            assert!(b.add_to(outsider, NodeKind::Group, Style::default()).is_err());
            assert!(b.node_mut(root, "root").is_err());
            assert!(b.node_mut(outsider, "outsider").is_err());
            assert!(b.node_mut(body, "body").is_ok());
        }
        assert!(g.children(root).is_empty());
        assert!(g.children(outsider).is_empty());
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn finished_builder_keeps_container_detached() {
        let mut g = SceneGraph::new();
        let id = {
            let mut b = g.build_container();
            b.add(NodeKind::Circle { radius: 3.0 }, Style::default());
            b.finish()
        };
        assert!(g.contains(id));
        assert!(!g.is_attached(id));
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn css_color_is_clamped() {
        assert_eq!(Rgba::rgb(2.0, 0.0, 1.0).to_css(), "rgba(255,0,255,1.000)");
    }
}
