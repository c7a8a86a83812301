use super::graph::{NodeId, SceneGraph};

/// Visits `root` and every descendant in pre-order.
///
/// `visit` runs on a node before its children are read, so a visitor may mutate
/// the node it is handed. Traversal uses an explicit stack; depth is unbounded.
/// Unknown roots are visited once (the visitor is expected to skip them).
pub fn walk_preorder<G, F>(graph: &mut G, root: NodeId, mut visit: F)
where
    G: SceneGraph + ?Sized,
    F: FnMut(&mut G, NodeId),
{
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        visit(&mut *graph, id);
        // Reversed so the first child is popped next.
        stack.extend(graph.children(id).iter().rev().copied());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Scene, Transform};

    #[test]
    fn visits_in_preorder() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.add_container(root, Transform::default()).unwrap();
        let a1 = scene.add_container(a, Transform::default()).unwrap();
        let a2 = scene.add_container(a, Transform::default()).unwrap();
        let b = scene.add_container(root, Transform::default()).unwrap();
        let b1 = scene.add_container(b, Transform::default()).unwrap();

        let mut order = Vec::new();
        walk_preorder(&mut scene, root, |_, id| order.push(id));

        assert_eq!(order, vec![root, a, a1, a2, b, b1]);
    }

    #[test]
    fn subtree_walk_stays_inside_subtree() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.add_container(root, Transform::default()).unwrap();
        let a1 = scene.add_container(a, Transform::default()).unwrap();
        scene.add_container(root, Transform::default()).unwrap();

        let mut order = Vec::new();
        walk_preorder(&mut scene, a, |_, id| order.push(id));

        assert_eq!(order, vec![a, a1]);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let mut scene = Scene::new();
        let mut parent = scene.root();
        for _ in 0..50_000 {
            parent = scene.add_container(parent, Transform::default()).unwrap();
        }

        let root = scene.root();
        let mut count = 0usize;
        walk_preorder(&mut scene, root, |_, _| count += 1);
        assert_eq!(count, 50_001);
    }
}
