use std::collections::HashMap;

use crate::coords::Vec2;
use crate::paint::Color;

use super::attr::{AttrValue, Attribute};
use super::graph::{NodeId, SceneGraph};

/// Local transform of a node, relative to its parent.
///
/// `position` is the node's center in the parent's space; rotation and scale pivot
/// around it. `size` is the unscaled width/height of a sprite and is ignored for
/// containers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Radians.
    pub rotation: f32,
    pub size: Vec2,
    pub scale: Vec2,
    /// `[0, 1]`, multiplied down the tree.
    pub opacity: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            rotation: 0.0,
            size: Vec2::zero(),
            scale: Vec2::splat(1.0),
            opacity: 1.0,
        }
    }
}

impl Transform {
    #[inline]
    pub fn at(position: Vec2) -> Self {
        Self { position, ..Self::default() }
    }

    #[inline]
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    #[inline]
    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    #[inline]
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    #[inline]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn get(&self, attr: Attribute) -> AttrValue {
        match attr {
            Attribute::Position => AttrValue::Vec2(self.position),
            Attribute::Rotation => AttrValue::Scalar(self.rotation),
            Attribute::Size => AttrValue::Vec2(self.size),
            Attribute::Scale => AttrValue::Vec2(self.scale),
            Attribute::Opacity => AttrValue::Scalar(self.opacity),
        }
    }

    /// Writes `value` into `attr`. Returns `false` (and changes nothing) on a shape mismatch.
    pub fn set(&mut self, attr: Attribute, value: AttrValue) -> bool {
        match (attr, value) {
            (Attribute::Position, AttrValue::Vec2(v)) => self.position = v,
            (Attribute::Rotation, AttrValue::Scalar(v)) => self.rotation = v,
            (Attribute::Size, AttrValue::Vec2(v)) => self.size = v,
            (Attribute::Scale, AttrValue::Vec2(v)) => self.scale = v,
            (Attribute::Opacity, AttrValue::Scalar(v)) => self.opacity = v,
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Shape {
    /// Axis-aligned in local space, `size` wide and tall.
    Rect,
    /// Ellipse inscribed in the `size` box.
    Circle,
}

/// Drawable leaf payload.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sprite {
    pub shape: Shape,
    pub color: Color,
}

impl Sprite {
    #[inline]
    pub fn new(shape: Shape, color: Color) -> Self {
        Self { shape, color }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Container,
    Sprite(Sprite),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub transform: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn is_sprite(&self) -> bool {
        matches!(self.kind, NodeKind::Sprite(_))
    }
}

/// Transform of a node resolved into root space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WorldTransform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    /// Local size multiplied by the world scale.
    pub size: Vec2,
    pub opacity: f32,
}

impl WorldTransform {
    const IDENTITY: WorldTransform = WorldTransform {
        position: Vec2::zero(),
        rotation: 0.0,
        scale: Vec2::splat(1.0),
        size: Vec2::zero(),
        opacity: 1.0,
    };

    fn compose(parent: &WorldTransform, local: &Transform) -> WorldTransform {
        let scale = parent.scale.scaled(local.scale);
        WorldTransform {
            position: parent.position + local.position.scaled(parent.scale).rotated(parent.rotation),
            rotation: parent.rotation + local.rotation,
            scale,
            size: local.size.scaled(scale),
            opacity: parent.opacity * local.opacity,
        }
    }
}

/// Arena-backed scene tree.
///
/// A root container exists for the whole lifetime of the scene and cannot be removed.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                kind: NodeKind::Container,
                transform: Transform::default(),
                parent: None,
                children: Vec::new(),
            },
        );

        Self { nodes, root, next_id: 1 }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        // The root always exists.
        false
    }

    /// Adds a container under `parent`. Returns `None` if `parent` does not exist.
    pub fn add_container(&mut self, parent: NodeId, transform: Transform) -> Option<NodeId> {
        self.insert(parent, NodeKind::Container, transform)
    }

    /// Adds a sprite under `parent`. Returns `None` if `parent` does not exist.
    pub fn add_sprite(&mut self, parent: NodeId, sprite: Sprite, transform: Transform) -> Option<NodeId> {
        self.insert(parent, NodeKind::Sprite(sprite), transform)
    }

    fn insert(&mut self, parent: NodeId, kind: NodeKind, transform: Transform) -> Option<NodeId> {
        let id = NodeId(self.next_id);
        self.nodes.get_mut(&parent)?.children.push(id);
        self.next_id += 1;

        self.nodes.insert(
            id,
            Node {
                kind,
                transform,
                parent: Some(parent),
                children: Vec::new(),
            },
        );
        Some(id)
    }

    /// Removes `node` and its whole subtree. Returns the number of nodes removed.
    ///
    /// The root and unknown ids are left alone (returns `0`).
    pub fn remove(&mut self, node: NodeId) -> usize {
        if node == self.root {
            return 0;
        }
        let Some(parent) = self.nodes.get(&node).and_then(|n| n.parent) else {
            return 0;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|&c| c != node);
        }

        let mut removed = 0;
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.remove(&id) {
                stack.extend(n.children);
                removed += 1;
            }
        }
        removed
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    #[inline]
    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.nodes.get(&id).map(|n| &n.transform)
    }

    #[inline]
    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(&id).map(|n| &mut n.transform)
    }

    /// Resolves every node reachable from the root into root space, in paint order
    /// (pre-order: parents before children, siblings in insertion order).
    pub fn world_transforms(&self) -> Vec<(NodeId, WorldTransform)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root, WorldTransform::IDENTITY)];

        while let Some((id, parent)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let world = WorldTransform::compose(&parent, &node.transform);
            out.push((id, world));
            stack.extend(node.children.iter().rev().map(|&c| (c, world)));
        }

        out
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph for Scene {
    #[inline]
    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    #[inline]
    fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(&node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    #[inline]
    fn attribute(&self, node: NodeId, attr: Attribute) -> Option<AttrValue> {
        self.nodes.get(&node).map(|n| n.transform.get(attr))
    }

    fn set_attribute(&mut self, node: NodeId, attr: Attribute, value: AttrValue) {
        if let Some(n) = self.nodes.get_mut(&node) {
            if !n.transform.set(attr, value) {
                log::trace!("ignored {} write with mismatched value on {:?}", attr.as_str(), node);
            }
        }
    }

    #[inline]
    fn supports_size_interpolation(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(Node::is_sprite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite() -> Sprite {
        Sprite::new(Shape::Rect, Color::new(1.0, 1.0, 1.0, 1.0))
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    // ── structure ─────────────────────────────────────────────────────────

    #[test]
    fn new_scene_has_only_root() {
        let scene = Scene::new();
        assert_eq!(scene.len(), 1);
        assert!(scene.contains(scene.root()));
        assert!(scene.children(scene.root()).is_empty());
    }

    #[test]
    fn add_to_unknown_parent_fails() {
        let mut scene = Scene::new();
        assert_eq!(scene.add_container(NodeId::from_raw(999), Transform::default()), None);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn remove_drops_whole_subtree() {
        let mut scene = Scene::new();
        let root = scene.root();
        let group = scene.add_container(root, Transform::default()).unwrap();
        let a = scene.add_sprite(group, sprite(), Transform::default()).unwrap();
        let b = scene.add_sprite(group, sprite(), Transform::default()).unwrap();
        let keep = scene.add_sprite(root, sprite(), Transform::default()).unwrap();

        assert_eq!(scene.remove(group), 3);
        assert!(!scene.contains(group) && !scene.contains(a) && !scene.contains(b));
        assert_eq!(scene.children(root), &[keep]);
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut scene = Scene::new();
        let root = scene.root();
        assert_eq!(scene.remove(root), 0);
        assert!(scene.contains(root));
    }

    #[test]
    fn ids_are_not_reused() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.add_container(root, Transform::default()).unwrap();
        scene.remove(a);
        let b = scene.add_container(root, Transform::default()).unwrap();
        assert_ne!(a, b);
    }

    // ── SceneGraph ────────────────────────────────────────────────────────

    #[test]
    fn attributes_round_trip_through_graph() {
        let mut scene = Scene::new();
        let root = scene.root();
        let s = scene.add_sprite(root, sprite(), Transform::default()).unwrap();

        scene.set_attribute(s, Attribute::Position, AttrValue::Vec2(Vec2::new(3.0, 4.0)));
        scene.set_attribute(s, Attribute::Opacity, AttrValue::Scalar(0.25));

        assert_eq!(scene.attribute(s, Attribute::Position), Some(AttrValue::Vec2(Vec2::new(3.0, 4.0))));
        assert_eq!(scene.transform(s).unwrap().opacity, 0.25);
    }

    #[test]
    fn mismatched_write_is_ignored() {
        let mut scene = Scene::new();
        let root = scene.root();
        let s = scene.add_sprite(root, sprite(), Transform::default()).unwrap();

        scene.set_attribute(s, Attribute::Rotation, AttrValue::Vec2(Vec2::new(1.0, 1.0)));
        assert_eq!(scene.transform(s).unwrap().rotation, 0.0);
    }

    #[test]
    fn unknown_node_reads_none() {
        let scene = Scene::new();
        assert_eq!(scene.attribute(NodeId::from_raw(42), Attribute::Position), None);
        assert!(scene.children(NodeId::from_raw(42)).is_empty());
    }

    #[test]
    fn only_sprites_support_size_interpolation() {
        let mut scene = Scene::new();
        let root = scene.root();
        let group = scene.add_container(root, Transform::default()).unwrap();
        let s = scene.add_sprite(group, sprite(), Transform::default()).unwrap();

        assert!(!scene.supports_size_interpolation(root));
        assert!(!scene.supports_size_interpolation(group));
        assert!(scene.supports_size_interpolation(s));
    }

    // ── world transforms ──────────────────────────────────────────────────

    #[test]
    fn world_transforms_compose_parent_chain() {
        let mut scene = Scene::new();
        let root = scene.root();
        let group = scene
            .add_container(
                root,
                Transform::at(Vec2::new(100.0, 100.0))
                    .with_rotation(core::f32::consts::FRAC_PI_2)
                    .with_scale(Vec2::splat(2.0))
                    .with_opacity(0.5),
            )
            .unwrap();
        let s = scene
            .add_sprite(
                group,
                sprite(),
                Transform::at(Vec2::new(10.0, 0.0))
                    .with_size(Vec2::new(4.0, 6.0))
                    .with_opacity(0.5),
            )
            .unwrap();

        let world = scene.world_transforms();
        let ids: Vec<NodeId> = world.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![root, group, s]);

        let (_, w) = world[2];
        // (10, 0) scaled by 2 then rotated a quarter turn lands 20px below the group.
        assert!(close(w.position, Vec2::new(100.0, 120.0)));
        assert!(close(w.size, Vec2::new(8.0, 12.0)));
        assert!((w.opacity - 0.25).abs() < 1e-6);
        assert!((w.rotation - core::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
