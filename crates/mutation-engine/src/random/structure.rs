//! Structural operations
//!
//! These edit a container's children list. Every operation keeps containers
//! non-empty and stays inside the rulebook's fan-out and depth limits.

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::Rng;
use serde_json::{json, Value};
use widget_dsl::tree::{self, NodePath};
use widget_dsl::{ComponentKind, Container, Direction, Node, WidgetDocument};

use super::generators::{leaf_for, random_node};
use super::{container_mut, leaf_mut, pick_container, pick_leaf, MutationContext};
use crate::records::Change;
use crate::sampling::pick;

pub(super) fn add_node(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let (max_children, max_depth) = (ctx.max_children, ctx.max_depth);
    // A new leaf under a container at depth d sits on level d + 2
    let path = pick_container(document, rng, |c, p| {
        c.children.len() < max_children && p.depth() + 2 <= max_depth
    })?;
    let node = random_node(ctx.palette, path.depth() + 3 <= max_depth, rng);
    let container = container_mut(document, &path)?;
    let index = rng.gen_range(0..=container.children.len());
    let label = node.label();
    container.children.insert(index, node);
    Some(Change::new(
        format!("Added {} node", label),
        path.child(index).to_string(),
        Value::Null,
        label,
    ))
}

pub(super) fn remove_node(
    document: &mut WidgetDocument,
    _ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_container(document, rng, |c, _| c.children.len() > 1)?;
    let container = container_mut(document, &path)?;
    let index = rng.gen_range(0..container.children.len());
    let removed = container.children.remove(index);
    Some(Change::new(
        format!("Removed {} node", removed.label()),
        path.child(index).to_string(),
        removed.label(),
        Value::Null,
    ))
}

pub(super) fn swap_children(
    document: &mut WidgetDocument,
    _ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_container(document, rng, |c, _| c.children.len() >= 2)?;
    let container = container_mut(document, &path)?;
    let len = container.children.len();
    let a = rng.gen_range(0..len);
    let mut b = rng.gen_range(0..len - 1);
    if b >= a {
        b += 1;
    }
    if container.children[a] == container.children[b] {
        return None;
    }
    let (first, second) = (a.min(b), a.max(b));
    container.children.swap(first, second);
    Some(Change::new(
        "Swapped children",
        path.field("children"),
        json!([first, second]),
        json!([second, first]),
    ))
}

pub(super) fn duplicate_node(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let max_children = ctx.max_children;
    let root = document.root();
    let path = pick_leaf(document, rng, |_, p| {
        tree::get_parent(root, p).map_or(false, |(parent, _)| parent.children.len() < max_children)
    })?;
    let (parent, index) = tree::get_parent_mut(document.root_mut(), &path)?;
    let copy = parent.children[index].clone();
    let label = copy.label();
    parent.children.insert(index + 1, copy);
    let copy_path = path.parent().map_or_else(NodePath::root, |(p, _)| p.child(index + 1));
    Some(Change::new(
        format!("Duplicated {} node", label),
        copy_path.to_string(),
        Value::Null,
        label,
    ))
}

pub(super) fn nest_node(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let max_depth = ctx.max_depth;
    let path = pick_leaf(document, rng, |_, p| !p.is_root() && p.depth() + 2 <= max_depth)?;
    let direction = if rng.gen_bool(0.5) {
        Direction::Row
    } else {
        Direction::Col
    };
    let gap = pick(&ctx.palette.gaps, rng).copied();
    let (parent, index) = tree::get_parent_mut(document.root_mut(), &path)?;
    let leaf = parent.children.remove(index);
    let before = leaf.label();
    let mut wrapper = Container::new(direction).with_child(leaf);
    wrapper.gap = gap;
    let wrapper = Node::Container(wrapper);
    let after = wrapper.label();
    parent.children.insert(index, wrapper);
    Some(Change::new(
        "Nested node in new container",
        path.to_string(),
        before,
        after,
    ))
}

pub(super) fn flatten_container(
    document: &mut WidgetDocument,
    _ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_container(document, rng, |c, p| !p.is_root() && c.children.len() == 1)?;
    let (parent, index) = tree::get_parent_mut(document.root_mut(), &path)?;
    let before = parent.children[index].label();
    let only_child = parent.children[index]
        .as_container_mut()
        .and_then(|c| c.children.pop())?;
    let after = only_child.label();
    parent.children[index] = only_child;
    Some(Change::new(
        "Flattened single-child container",
        path.to_string(),
        before,
        after,
    ))
}

pub(super) fn change_component_type(
    document: &mut WidgetDocument,
    ctx: &MutationContext<'_>,
    rng: &mut StdRng,
) -> Option<Change> {
    let path = pick_leaf(document, rng, |_, _| true)?;
    let leaf = leaf_mut(document, &path)?;
    let current = leaf.component.clone();
    let next = ComponentKind::ALL
        .into_iter()
        .filter(|k| k.name() != current)
        .choose(rng)?;
    let mut replacement = leaf_for(next, ctx.palette, rng);
    replacement.flex = leaf.flex;
    replacement.width = replacement.width.or_else(|| leaf.width.take());
    replacement.height = replacement.height.or_else(|| leaf.height.take());
    replacement.extra = std::mem::take(&mut leaf.extra);
    *leaf = replacement;
    Some(Change::new(
        "Changed component type",
        path.field("component"),
        current,
        next.name(),
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::MutationOp;
    use serde_json::json;
    use widget_dsl::tree::{max_fanout, tree_depth};

    const FULL_ROW: &str = r##"{"widget": {"root": {"type": "container", "direction": "row", "children": [
        {"type": "leaf", "component": "Text", "content": "1"}, {"type": "leaf", "component": "Text", "content": "2"},
        {"type": "leaf", "component": "Text", "content": "3"}, {"type": "leaf", "component": "Text", "content": "4"},
        {"type": "leaf", "component": "Text", "content": "5"}, {"type": "leaf", "component": "Text", "content": "6"},
        {"type": "leaf", "component": "Text", "content": "7"}, {"type": "leaf", "component": "Text", "content": "8"},
        {"type": "leaf", "component": "Text", "content": "9"}, {"type": "leaf", "component": "Text", "content": "10"}
    ]}}}"##;

    fn child_count(document: &widget_dsl::WidgetDocument) -> usize {
        document.root().as_container().unwrap().children.len()
    }

    #[test]
    fn test_remove_node_never_empties_single_child_container() {
        for seed in 0..20 {
            let mut document = doc(SIMPLE_SEED);
            let before = document.clone();
            assert!(run(MutationOp::RemoveNode, &mut document, seed).is_none());
            assert_eq!(document, before);
            assert_eq!(child_count(&document), 1);
        }
    }

    #[test]
    fn test_remove_node_on_larger_container() {
        let mut document = doc(RICH_SEED);
        let record = run(MutationOp::RemoveNode, &mut document, 1).unwrap();
        assert_eq!(record.after, json!(null));
        assert!(tree_depth(document.root()) >= 2);
    }

    #[test]
    fn test_add_node_respects_max_children() {
        let mut document = doc(FULL_ROW);
        assert!(run(MutationOp::AddNode, &mut document, 1).is_none());
        assert!(run(MutationOp::DuplicateNode, &mut document, 1).is_none());
        assert_eq!(child_count(&document), 10);

        let mut document = doc(SIMPLE_SEED);
        run(MutationOp::AddNode, &mut document, 1).unwrap();
        assert_eq!(child_count(&document), 2);
    }

    #[test]
    fn test_duplicate_inserts_next_sibling() {
        let mut document = doc(SIMPLE_SEED);
        let record = run(MutationOp::DuplicateNode, &mut document, 1).unwrap();
        assert_eq!(record.target_path, "root.children[1]");
        let children = &document.root().as_container().unwrap().children;
        assert_eq!(children[0], children[1]);
    }

    #[test]
    fn test_nest_then_flatten_restores_shape() {
        let mut document = doc(SIMPLE_SEED);
        let original = document.clone();
        let record = run(MutationOp::NestNode, &mut document, 1).unwrap();
        assert_eq!(record.target_path, "root.children[0]");
        assert_eq!(tree_depth(document.root()), 3);

        let record = run(MutationOp::FlattenContainer, &mut document, 1).unwrap();
        assert_eq!(record.target_path, "root.children[0]");
        assert_eq!(document, original);
    }

    #[test]
    fn test_flatten_skips_root() {
        let mut document = doc(SIMPLE_SEED);
        assert!(run(MutationOp::FlattenContainer, &mut document, 1).is_none());
    }

    #[test]
    fn test_swap_needs_distinct_children() {
        let mut document = doc(RICH_SEED);
        let record = run(MutationOp::SwapChildren, &mut document, 3).unwrap();
        let pair = record.before.as_array().unwrap();
        assert_ne!(pair[0], pair[1]);
        assert!(max_fanout(document.root()) <= 4);
    }

    #[test]
    fn test_change_component_type_picks_other_kind() {
        let mut document = doc(SIMPLE_SEED);
        let record = run(MutationOp::ChangeComponentType, &mut document, 5).unwrap();
        assert_eq!(record.before, json!("Text"));
        assert_ne!(record.after, json!("Text"));
        let leaf = document.root().as_container().unwrap().children[0].as_leaf().unwrap();
        assert_eq!(Some(leaf.component.as_str()), record.after.as_str());
    }
}
