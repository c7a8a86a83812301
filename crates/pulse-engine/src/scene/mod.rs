//! Scene tree types.
//!
//! Responsibilities:
//! - define the [`SceneGraph`] seam the frame scheduler interpolates through
//! - provide one pre-order walk shared by every tree pass
//! - ship [`Scene`], an arena-backed tree with containers and sprites

mod attr;
mod graph;
mod tree;
mod walk;

pub use attr::{AttrValue, Attribute};
pub use graph::{NodeId, SceneGraph};
pub use tree::{Node, NodeKind, Scene, Shape, Sprite, Transform, WorldTransform};
pub use walk::walk_preorder;
