use super::attr::{AttrValue, Attribute};

/// Opaque node identity.
///
/// Ids handed out by [`Scene`](super::Scene) are never reused, so side tables keyed
/// by `NodeId` cannot alias a removed node with a new one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Tree view the frame scheduler snapshots, interpolates and restores.
///
/// Implementations report unknown nodes and absent attributes as empty/`None`
/// instead of panicking; the scheduler skips whatever is missing.
pub trait SceneGraph {
    fn contains(&self, node: NodeId) -> bool;

    /// Children in paint order. Empty for leaves and unknown nodes.
    fn children(&self, node: NodeId) -> &[NodeId];

    fn attribute(&self, node: NodeId, attr: Attribute) -> Option<AttrValue>;

    /// Writes a live attribute value. Unknown nodes and mismatched value shapes are ignored.
    fn set_attribute(&mut self, node: NodeId, attr: Attribute, value: AttrValue);

    /// Whether width/height may be interpolated on this node.
    ///
    /// Containers should return `false`: blending a container's size rescales its
    /// children mid-frame.
    fn supports_size_interpolation(&self, node: NodeId) -> bool;
}
