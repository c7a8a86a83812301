use std::collections::HashMap;

use crate::scene::{walk_preorder, AttrValue, Attribute, NodeId, SceneGraph};

use super::config::InterpolationConfig;

type Slots = [Option<AttrValue>; Attribute::COUNT];

/// Snapshots of one node, indexed by [`Attribute::index`].
#[derive(Debug, Clone, Default)]
struct Shadow {
    /// Live values right before the most recent logic tick.
    previous: Slots,
    /// Live (post-logic) values right before the most recent render.
    current: Slots,
    /// Render pass that last visited this node.
    epoch: u64,
}

/// Side table of per-node snapshots owned by the scheduler.
///
/// Keeping this off the scene lets any [`SceneGraph`] be interpolated without
/// growing extra fields. Entries appear when a pass first meets a node and are
/// dropped by [`prune`](Self::prune) once a render no longer reaches it.
#[derive(Debug, Default)]
pub(crate) struct ShadowTable {
    entries: HashMap<NodeId, Shadow>,
    epoch: u64,
}

impl ShadowTable {
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn previous(&self, node: NodeId, attr: Attribute) -> Option<AttrValue> {
        self.entries.get(&node).and_then(|s| s.previous[attr.index()])
    }

    /// Copies live values into the `previous` slots. Runs before every logic tick.
    pub(crate) fn capture_previous<G>(&mut self, graph: &mut G, root: NodeId, attrs: InterpolationConfig)
    where
        G: SceneGraph + ?Sized,
    {
        let entries = &mut self.entries;
        walk_preorder(graph, root, |g, id| {
            if !g.contains(id) {
                return;
            }
            let shadow = entries.entry(id).or_default();
            for attr in attrs.enabled() {
                shadow.previous[attr.index()] = g.attribute(id, attr);
            }
        });
    }

    /// Stores live values as `current`, then overwrites live values with
    /// `previous + (current - previous) * fraction` wherever a `previous` exists.
    pub(crate) fn interpolate<G>(&mut self, graph: &mut G, root: NodeId, attrs: InterpolationConfig, fraction: f32)
    where
        G: SceneGraph + ?Sized,
    {
        self.epoch = self.epoch.wrapping_add(1);
        let epoch = self.epoch;
        let entries = &mut self.entries;

        walk_preorder(graph, root, |g, id| {
            if !g.contains(id) {
                return;
            }
            let sized = g.supports_size_interpolation(id);
            let shadow = entries.entry(id).or_default();
            shadow.epoch = epoch;

            for attr in attrs.enabled() {
                let slot = attr.index();
                let live = g.attribute(id, attr);
                shadow.current[slot] = live;

                if attr == Attribute::Size && !sized {
                    continue;
                }
                let (Some(prev), Some(live)) = (shadow.previous[slot], live) else {
                    continue;
                };
                if let Some(blended) = prev.lerp(live, fraction) {
                    g.set_attribute(id, attr, blended);
                }
            }
        });
    }

    /// Writes the `current` snapshots back, undoing [`interpolate`](Self::interpolate).
    pub(crate) fn restore<G>(&mut self, graph: &mut G, root: NodeId, attrs: InterpolationConfig)
    where
        G: SceneGraph + ?Sized,
    {
        let entries = &self.entries;
        walk_preorder(graph, root, |g, id| {
            let Some(shadow) = entries.get(&id) else {
                return;
            };
            for attr in attrs.enabled() {
                if let Some(value) = shadow.current[attr.index()] {
                    g.set_attribute(id, attr, value);
                }
            }
        });
    }

    /// Drops entries for nodes the latest render did not reach.
    pub(crate) fn prune(&mut self) {
        let epoch = self.epoch;
        let before = self.entries.len();
        self.entries.retain(|_, s| s.epoch == epoch);

        let dropped = before - self.entries.len();
        if dropped > 0 {
            log::trace!("dropped {dropped} stale shadow entries");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;
    use crate::scene::{Scene, Shape, Sprite, Transform};

    fn x_of(scene: &Scene, id: NodeId) -> f32 {
        scene.transform(id).unwrap().position.x
    }

    fn one_sprite() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let root = scene.root();
        let s = scene
            .add_sprite(root, Sprite::new(Shape::Circle, Color::default()), Transform::default())
            .unwrap();
        (scene, s)
    }

    #[test]
    fn capture_records_only_enabled_attributes() {
        let (mut scene, s) = one_sprite();
        let root = scene.root();
        let mut table = ShadowTable::default();

        table.capture_previous(&mut scene, root, InterpolationConfig::none().with(Attribute::Opacity, true));

        assert_eq!(table.previous(s, Attribute::Opacity), Some(AttrValue::Scalar(1.0)));
        assert_eq!(table.previous(s, Attribute::Position), None);
    }

    #[test]
    fn interpolate_without_previous_leaves_live_value() {
        let (mut scene, s) = one_sprite();
        let root = scene.root();
        scene.transform_mut(s).unwrap().position.x = 7.0;

        let mut table = ShadowTable::default();
        table.interpolate(&mut scene, root, InterpolationConfig::default(), 0.5);

        assert_eq!(x_of(&scene, s), 7.0);
    }

    #[test]
    fn interpolate_then_restore() {
        let (mut scene, s) = one_sprite();
        let root = scene.root();
        let attrs = InterpolationConfig::default();
        let mut table = ShadowTable::default();

        table.capture_previous(&mut scene, root, attrs);
        scene.transform_mut(s).unwrap().position = Vec2::new(10.0, 20.0);

        table.interpolate(&mut scene, root, attrs, 0.25);
        assert_eq!(scene.transform(s).unwrap().position, Vec2::new(2.5, 5.0));

        table.restore(&mut scene, root, attrs);
        assert_eq!(scene.transform(s).unwrap().position, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn prune_drops_unreached_nodes() {
        let (mut scene, s) = one_sprite();
        let root = scene.root();
        let attrs = InterpolationConfig::default();
        let mut table = ShadowTable::default();

        table.capture_previous(&mut scene, root, attrs);
        assert_eq!(table.len(), 2);

        scene.remove(s);
        table.interpolate(&mut scene, root, attrs, 0.5);
        table.prune();

        assert_eq!(table.len(), 1);
        assert_eq!(table.previous(s, Attribute::Position), None);
    }
}
