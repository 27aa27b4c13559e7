//! Tree Builder
//!
//! Turns the flat, ordered item list of one checklist into nested nodes.

use std::collections::HashMap;

use super::item::{Item, ItemNode};

/// Result of building a checklist tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltTree {
    /// Top-level nodes in position order
    pub roots: Vec<ItemNode>,
    /// Items not reachable from the top level (orphans, or members of a cycle)
    pub detached: Vec<Item>,
}

/// Build nested nodes from a flat item list.
///
/// Every sibling group is sorted by `position` with a stable sort, so input
/// order decides between equal positions. Items whose parent chain never
/// reaches the top level are returned in `detached` instead of being promoted.
pub fn build_tree(items: Vec<Item>) -> BuiltTree {
    let total = items.len();

    let mut children_map: HashMap<Option<u32>, Vec<Item>> = HashMap::new();
    for item in items {
        children_map.entry(item.parent_item_id).or_default().push(item);
    }

    for children in children_map.values_mut() {
        children.sort_by_key(|i| i.position);
    }

    // Each item lives in exactly one group, so the walk from the root group
    // visits an item at most once and cannot loop.
    fn attach(parent_id: Option<u32>, children_map: &mut HashMap<Option<u32>, Vec<Item>>) -> Vec<ItemNode> {
        let Some(group) = children_map.remove(&parent_id) else {
            return Vec::new();
        };
        group
            .into_iter()
            .map(|item| {
                let children = attach(Some(item.id), children_map);
                ItemNode { item, children }
            })
            .collect()
    }

    let roots = attach(None, &mut children_map);

    let mut detached: Vec<Item> = children_map.into_values().flatten().collect();
    detached.sort_by_key(|i| i.id);
    debug_assert_eq!(count_nodes(&roots) + detached.len(), total);

    BuiltTree { roots, detached }
}

/// Pre-order flattening that respects the order of `children`.
pub fn flatten(nodes: &[ItemNode]) -> Vec<Item> {
    fn collect(nodes: &[ItemNode], out: &mut Vec<Item>) {
        for node in nodes {
            out.push(node.item.clone());
            collect(&node.children, out);
        }
    }

    let mut out = Vec::new();
    collect(nodes, &mut out);
    out
}

pub fn count_nodes(nodes: &[ItemNode]) -> usize {
    nodes.iter().map(|n| 1 + count_nodes(&n.children)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(id: u32, parent: Option<u32>, position: i32) -> Item {
        Item {
            id,
            checklist_id: 1,
            parent_item_id: parent,
            name: format!("Item {}", id),
            position,
            is_checked: false,
        }
    }

    fn ids(nodes: &[ItemNode]) -> Vec<u32> {
        nodes.iter().map(|n| n.id()).collect()
    }

    #[test]
    fn test_empty_list_builds_empty_tree() {
        let built = build_tree(Vec::new());
        assert!(built.roots.is_empty());
        assert!(built.detached.is_empty());
    }

    #[test]
    fn test_single_item_is_a_leaf_root() {
        let mut suitcase = make_item(1, None, 0);
        suitcase.name = "Suitcase".to_string();
        let built = build_tree(vec![suitcase.clone()]);
        assert_eq!(built.roots, vec![ItemNode::leaf(suitcase)]);
    }

    #[test]
    fn test_nested_groups_follow_position() {
        let items = vec![
            make_item(1, None, 0),
            make_item(2, None, 1),
            make_item(4, Some(1), 1),
            make_item(3, Some(1), 0),
            make_item(5, Some(3), 0),
        ];

        let built = build_tree(items);

        assert_eq!(ids(&built.roots), vec![1, 2]);
        assert_eq!(ids(&built.roots[0].children), vec![3, 4]);
        assert_eq!(ids(&built.roots[0].children[0].children), vec![5]);
        assert!(built.roots[1].children.is_empty());
    }

    #[test]
    fn test_equal_positions_keep_input_order() {
        let items = vec![
            make_item(9, None, 0),
            make_item(3, None, 1),
            make_item(7, None, 1),
            make_item(5, None, 1),
        ];
        let built = build_tree(items);
        assert_eq!(ids(&built.roots), vec![9, 3, 7, 5]);
    }

    #[test]
    fn test_orphans_are_detached_not_promoted() {
        let items = vec![make_item(1, None, 0), make_item(2, Some(42), 0), make_item(3, Some(2), 0)];
        let built = build_tree(items);

        assert_eq!(ids(&built.roots), vec![1]);
        assert!(built.roots[0].children.is_empty());
        let detached: Vec<u32> = built.detached.iter().map(|i| i.id).collect();
        assert_eq!(detached, vec![2, 3]);
    }

    #[test]
    fn test_cycle_members_are_detached() {
        let items = vec![make_item(1, None, 0), make_item(2, Some(3), 0), make_item(3, Some(2), 0)];
        let built = build_tree(items);

        assert_eq!(ids(&built.roots), vec![1]);
        assert_eq!(built.detached.len(), 2);
    }

    #[test]
    fn test_flatten_then_rebuild_is_identity() {
        let items = vec![
            make_item(1, None, 0),
            make_item(2, None, 3),
            make_item(6, None, 1),
            make_item(3, Some(1), 0),
            make_item(4, Some(1), 2),
            make_item(5, Some(3), 0),
            make_item(7, Some(5), 0),
            make_item(8, Some(2), 0),
        ];

        let first = build_tree(items).roots;
        let rebuilt = build_tree(flatten(&first)).roots;

        assert_eq!(first, rebuilt);
        assert_eq!(count_nodes(&first), 8);
    }

    #[test]
    fn test_flatten_is_pre_order() {
        let items = vec![
            make_item(1, None, 0),
            make_item(2, None, 1),
            make_item(3, Some(1), 0),
            make_item(4, Some(3), 0),
        ];
        let flat: Vec<u32> = flatten(&build_tree(items).roots).iter().map(|i| i.id).collect();
        assert_eq!(flat, vec![1, 3, 4, 2]);
    }
}
