//! Tree traversal and target selection
//!
//! Nodes are located by [`NodePath`], the list of child indices from the
//! root. Mutations capture a path when they pick a target and resolve it
//! against the tree they are editing; the dotted string form
//! (`root.children[1]`) exists only for provenance display.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::ComponentKind;
use crate::types::{Container, Node};

/// Recursion guard for [`traverse`]. This is not the rulebook depth limit.
pub const TRAVERSAL_DEPTH_GUARD: usize = 10;

/// Location of a node as child indices from the root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// Path of the root node
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Path of the `index`-th child of this node
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Depth below the root (root is 0)
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Parent path and this node's index within the parent
    pub fn parent(&self) -> Option<(NodePath, usize)> {
        let (last, rest) = self.0.split_last()?;
        Some((NodePath(rest.to_vec()), *last))
    }

    /// Display path of a field on this node, e.g. `root.children[0].gap`
    pub fn field(&self, name: &str) -> String {
        format!("{}.{}", self, name)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for index in &self.0 {
            write!(f, ".children[{}]", index)?;
        }
        Ok(())
    }
}

/// Visit `node` and its descendants pre-order, stopping below the
/// traversal guard depth
pub fn traverse<'a, F>(node: &'a Node, visit: &mut F)
where
    F: FnMut(&'a Node, &NodePath),
{
    traverse_with_limit(node, TRAVERSAL_DEPTH_GUARD, visit);
}

/// Pre-order visit with an explicit depth limit (`usize::MAX` for none)
pub fn traverse_with_limit<'a, F>(node: &'a Node, max_depth: usize, visit: &mut F)
where
    F: FnMut(&'a Node, &NodePath),
{
    walk(node, NodePath::root(), max_depth, visit);
}

fn walk<'a, F>(node: &'a Node, path: NodePath, max_depth: usize, visit: &mut F)
where
    F: FnMut(&'a Node, &NodePath),
{
    visit(node, &path);
    if path.depth() >= max_depth {
        return;
    }
    if let Node::Container(container) = node {
        for (index, child) in container.children.iter().enumerate() {
            walk(child, path.child(index), max_depth, visit);
        }
    }
}

/// Paths of every node matching `predicate`, in traversal order
pub fn collect<P>(node: &Node, mut predicate: P) -> Vec<NodePath>
where
    P: FnMut(&Node, &NodePath) -> bool,
{
    let mut found = Vec::new();
    traverse(node, &mut |n, path| {
        if predicate(n, path) {
            found.push(path.clone());
        }
    });
    found
}

/// Uniformly sample one node matching `predicate`
pub fn random_matching<R, P>(node: &Node, rng: &mut R, predicate: P) -> Option<NodePath>
where
    R: Rng + ?Sized,
    P: FnMut(&Node, &NodePath) -> bool,
{
    collect(node, predicate).choose(rng).cloned()
}

/// Any node
pub fn random_node<R: Rng + ?Sized>(node: &Node, rng: &mut R) -> Option<NodePath> {
    random_matching(node, rng, |_, _| true)
}

/// Any container
pub fn random_container<R: Rng + ?Sized>(node: &Node, rng: &mut R) -> Option<NodePath> {
    random_matching(node, rng, |n, _| n.is_container())
}

/// Any leaf
pub fn random_leaf<R: Rng + ?Sized>(node: &Node, rng: &mut R) -> Option<NodePath> {
    random_matching(node, rng, |n, _| n.is_leaf())
}

/// Any leaf of the given component
pub fn random_component<R: Rng + ?Sized>(
    node: &Node,
    kind: ComponentKind,
    rng: &mut R,
) -> Option<NodePath> {
    random_matching(node, rng, |n, _| n.is_component(kind))
}

/// Whether any chart leaf exists in the tree
pub fn has_chart(node: &Node) -> bool {
    !collect(node, |n, _| n.is_chart()).is_empty()
}

/// Resolve a path to a node
pub fn node_at<'a>(root: &'a Node, path: &NodePath) -> Option<&'a Node> {
    let mut current = root;
    for &index in path.indices() {
        current = current.as_container()?.children.get(index)?;
    }
    Some(current)
}

/// Resolve a path to a node (mutable)
pub fn node_at_mut<'a>(root: &'a mut Node, path: &NodePath) -> Option<&'a mut Node> {
    let mut current = root;
    for &index in path.indices() {
        current = current.as_container_mut()?.children.get_mut(index)?;
    }
    Some(current)
}

/// The container holding the node at `path`, with the node's index in it
pub fn get_parent<'a>(root: &'a Node, path: &NodePath) -> Option<(&'a Container, usize)> {
    let (parent_path, index) = path.parent()?;
    let parent = node_at(root, &parent_path)?.as_container()?;
    Some((parent, index))
}

/// Mutable variant of [`get_parent`], used to splice children
pub fn get_parent_mut<'a>(
    root: &'a mut Node,
    path: &NodePath,
) -> Option<(&'a mut Container, usize)> {
    let (parent_path, index) = path.parent()?;
    let parent = node_at_mut(root, &parent_path)?.as_container_mut()?;
    if index < parent.children.len() {
        Some((parent, index))
    } else {
        None
    }
}

/// Number of levels in the tree (a lone root is depth 1)
pub fn tree_depth(node: &Node) -> usize {
    match node {
        Node::Leaf(_) => 1,
        Node::Container(c) => 1 + c.children.iter().map(tree_depth).max().unwrap_or(0),
    }
}

/// Largest child count of any container in the tree
pub fn max_fanout(node: &Node) -> usize {
    match node {
        Node::Leaf(_) => 0,
        Node::Container(c) => c
            .children
            .iter()
            .map(max_fanout)
            .max()
            .unwrap_or(0)
            .max(c.children.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Leaf};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::Map;

    fn text(content: &str) -> Node {
        Node::Leaf(Leaf::new(ComponentKind::Text, Map::new()).with_content(content))
    }

    fn sample_tree() -> Node {
        Node::Container(
            Container::new(Direction::Col)
                .with_child(text("title"))
                .with_child(Node::Container(
                    Container::new(Direction::Row)
                        .with_child(Node::Leaf(Leaf::new(ComponentKind::Icon, Map::new())))
                        .with_child(text("value")),
                )),
        )
    }

    fn deep_tree(levels: usize) -> Node {
        let mut node = text("bottom");
        for _ in 0..levels {
            node = Node::Container(Container::new(Direction::Col).with_child(node));
        }
        node
    }

    #[test]
    fn test_path_display() {
        assert_eq!(NodePath::root().to_string(), "root");
        let path = NodePath::root().child(1).child(0);
        assert_eq!(path.to_string(), "root.children[1].children[0]");
        assert_eq!(path.field("gap"), "root.children[1].children[0].gap");
    }

    #[test]
    fn test_traverse_pre_order() {
        let tree = sample_tree();
        let mut seen = Vec::new();
        traverse(&tree, &mut |node, path| seen.push((path.to_string(), node.label())));
        let paths: Vec<&str> = seen.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "root",
                "root.children[0]",
                "root.children[1]",
                "root.children[1].children[0]",
                "root.children[1].children[1]",
            ]
        );
    }

    #[test]
    fn test_traverse_guard_stops_runaway_depth() {
        let tree = deep_tree(15);
        let mut visited = 0;
        traverse(&tree, &mut |_, _| visited += 1);
        assert_eq!(visited, TRAVERSAL_DEPTH_GUARD + 1);

        let mut all = 0;
        traverse_with_limit(&tree, usize::MAX, &mut |_, _| all += 1);
        assert_eq!(all, 16);
    }

    #[test]
    fn test_collect_and_random_selection() {
        let tree = sample_tree();
        let texts = collect(&tree, |n, _| n.is_component(ComponentKind::Text));
        assert_eq!(texts.len(), 2);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let path = random_component(&tree, ComponentKind::Icon, &mut rng).unwrap();
            assert_eq!(path.to_string(), "root.children[1].children[0]");
        }
        assert!(random_component(&tree, ComponentKind::BarChart, &mut rng).is_none());
        assert!(!has_chart(&tree));
    }

    #[test]
    fn test_parent_resolution() {
        let mut tree = sample_tree();
        let path = NodePath::from_indices(vec![1, 1]);
        let (parent, index) = get_parent(&tree, &path).unwrap();
        assert_eq!(index, 1);
        assert_eq!(parent.direction, Some(Direction::Row));

        let (parent, index) = get_parent_mut(&mut tree, &path).unwrap();
        parent.children.remove(index);
        assert_eq!(max_fanout(&tree), 2);
        assert!(get_parent(&tree, &NodePath::root()).is_none());
        assert!(node_at(&tree, &NodePath::from_indices(vec![1, 1])).is_none());
    }

    #[test]
    fn test_depth_and_fanout() {
        assert_eq!(tree_depth(&sample_tree()), 3);
        assert_eq!(tree_depth(&deep_tree(4)), 5);
        assert_eq!(max_fanout(&sample_tree()), 2);
    }
}
