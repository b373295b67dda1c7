//! Tree construction and breadcrumb path resolution
//!
//! Both functions are pure: they work on an already-fetched snapshot of the
//! flat category list and never touch the store. Malformed references degrade
//! instead of failing: a dangling parent makes a node a root, and cyclic
//! parent chains are cut short rather than looping.

use std::collections::{HashMap, HashSet};

use super::models::{Category, CategoryNode};

/// Build the category forest from the complete flat list.
///
/// Children appear under their parent in input order; roots keep input order
/// too, so output is deterministic for a fixed input ordering. Categories
/// without an id are excluded (only persisted records participate). A parent
/// id that does not resolve in the snapshot, including a category naming
/// itself, makes the node a root.
pub fn build_tree(categories: &[Category]) -> Vec<CategoryNode> {
    let ids: HashSet<i64> = categories.iter().filter_map(|c| c.id).collect();

    // Bucket child indices under their parent, in encounter order.
    let mut children_of: HashMap<i64, Vec<usize>> = HashMap::new();
    let mut roots: Vec<(i64, usize)> = Vec::new();
    for (idx, category) in categories.iter().enumerate() {
        let Some(id) = category.id else { continue };
        match category.parent {
            Some(parent) if parent != id && ids.contains(&parent) => {
                children_of.entry(parent).or_default().push(idx);
            }
            _ => roots.push((id, idx)),
        }
    }

    let mut visited: HashSet<i64> = HashSet::new();
    let mut forest: Vec<CategoryNode> = roots
        .into_iter()
        .map(|(id, idx)| attach(id, idx, categories, &children_of, &mut visited))
        .collect();

    // Members of a parent cycle are reachable from no root. Surface them in
    // input order so the forest still contains every category exactly once;
    // the back-edge that closed the cycle is dropped inside `attach`.
    for (idx, category) in categories.iter().enumerate() {
        if let Some(id) = category.id {
            if !visited.contains(&id) {
                forest.push(attach(id, idx, categories, &children_of, &mut visited));
            }
        }
    }

    forest
}

fn attach(
    id: i64,
    idx: usize,
    categories: &[Category],
    children_of: &HashMap<i64, Vec<usize>>,
    visited: &mut HashSet<i64>,
) -> CategoryNode {
    visited.insert(id);
    let mut node = CategoryNode::from_category(id, &categories[idx]);

    for &child_idx in children_of.get(&id).into_iter().flatten() {
        let Some(child_id) = categories[child_idx].id else { continue };
        if visited.contains(&child_id) {
            continue;
        }
        node.children
            .push(attach(child_id, child_idx, categories, children_of, visited));
    }

    node
}

/// Resolve the root-to-leaf ancestry chain for `leaf_id`.
///
/// Returns the empty path when the leaf is not in the snapshot. The climb is
/// capped at the snapshot size, so a cyclic parent chain terminates with
/// whatever was accumulated instead of hanging.
pub fn resolve_path(leaf_id: i64, categories: &[Category]) -> Vec<Category> {
    let by_id: HashMap<i64, &Category> = categories
        .iter()
        .filter_map(|c| c.id.map(|id| (id, c)))
        .collect();

    let Some(mut current) = by_id.get(&leaf_id).copied() else {
        return Vec::new();
    };

    let mut path = vec![current.clone()];
    for _ in 0..categories.len() {
        match current.parent.and_then(|parent| by_id.get(&parent).copied()) {
            Some(parent) => {
                path.push(parent.clone());
                current = parent;
            }
            None => break,
        }
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::category;

    fn node_count(nodes: &[CategoryNode]) -> usize {
        nodes.iter().map(|n| 1 + node_count(&n.children)).sum()
    }

    #[test]
    fn test_empty_input_yields_empty_forest() {
        assert!(build_tree(&[]).is_empty());
    }

    #[test]
    fn test_three_level_chain() {
        let categories = vec![
            category(1, "Doors", None),
            category(2, "Fire Doors", Some(1)),
            category(3, "Frames", Some(2)),
        ];

        let forest = build_tree(&categories);

        assert_eq!(forest.len(), 1);
        let root = &forest[0];
        assert_eq!(root.name, "Doors");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "Fire Doors");
        assert_eq!(root.children[0].children.len(), 1);
        assert_eq!(root.children[0].children[0].name, "Frames");
    }

    #[test]
    fn test_forest_contains_every_persisted_category_once() {
        let categories = vec![
            category(1, "Doors", None),
            category(2, "Seals", Some(1)),
            category(3, "Signage", None),
            category(4, "Extinguishers", Some(3)),
            category(5, "Hose Reels", Some(3)),
        ];

        assert_eq!(node_count(&build_tree(&categories)), categories.len());
    }

    #[test]
    fn test_unsaved_categories_are_excluded() {
        let mut unsaved = category(0, "Draft", None);
        unsaved.id = None;
        let categories = vec![category(1, "Doors", None), unsaved];

        assert_eq!(node_count(&build_tree(&categories)), 1);
    }

    #[test]
    fn test_dangling_parent_degrades_to_root() {
        let categories = vec![category(1, "Doors", None), category(2, "Seals", Some(99))];

        let forest = build_tree(&categories);

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[1].name, "Seals");
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn test_children_keep_input_order() {
        let categories = vec![
            category(1, "Doors", None),
            category(4, "Hinges", Some(1)),
            category(2, "Seals", Some(1)),
            category(3, "Closers", Some(1)),
        ];

        let forest = build_tree(&categories);
        let names: Vec<&str> = forest[0].children.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["Hinges", "Seals", "Closers"]);
    }

    #[test]
    fn test_self_parent_becomes_root_without_self_child() {
        let categories = vec![category(1, "Ouroboros", Some(1))];

        let forest = build_tree(&categories);

        assert_eq!(forest.len(), 1);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_two_node_cycle_terminates_and_keeps_both() {
        let categories = vec![category(1, "A", Some(2)), category(2, "B", Some(1))];

        let forest = build_tree(&categories);

        // Neither has a resolvable root, so the first in input order is
        // surfaced as a root with the other beneath it.
        assert_eq!(node_count(&forest), 2);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].name, "A");
        assert_eq!(forest[0].children[0].name, "B");
    }

    #[test]
    fn test_resolve_path_root_to_leaf() {
        let categories = vec![
            category(1, "Doors", None),
            category(2, "Fire Doors", Some(1)),
            category(3, "Frames", Some(2)),
        ];

        let path = resolve_path(3, &categories);
        let names: Vec<&str> = path.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["Doors", "Fire Doors", "Frames"]);
    }

    #[test]
    fn test_resolve_path_unknown_leaf_is_empty() {
        let categories = vec![category(1, "Doors", None)];

        assert!(resolve_path(99, &categories).is_empty());
    }

    #[test]
    fn test_resolve_path_cycle_is_bounded() {
        let categories = vec![category(1, "A", Some(2)), category(2, "B", Some(1))];

        let path = resolve_path(1, &categories);

        assert!(!path.is_empty());
        assert!(path.len() <= categories.len() + 1);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let categories = vec![category(1, "Doors", None), category(2, "Fire Doors", Some(1))];

        let forest = build_tree(&categories);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].name, "Doors");
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].name, "Fire Doors");

        let path = resolve_path(2, &categories);
        let slugs: Vec<&str> = path.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["doors", "fire-doors"]);
    }
}
