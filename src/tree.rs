//! Tree Utilities
//!
//! Structural edits on the local nested tree. Every helper searches the whole
//! tree recursively and reports whether the target was found.

use crate::models::{ItemKey, Node};

pub fn find(nodes: &[Node], key: ItemKey) -> Option<&Node> {
    for node in nodes {
        if node.key == key {
            return Some(node);
        }
        if let Some(found) = find(&node.children, key) {
            return Some(found);
        }
    }
    None
}

pub fn find_mut(nodes: &mut [Node], key: ItemKey) -> Option<&mut Node> {
    for node in nodes.iter_mut() {
        if node.key == key {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, key) {
            return Some(found);
        }
    }
    None
}

/// The sibling group that holds `key`
fn group_containing(nodes: &mut Vec<Node>, key: ItemKey) -> Option<&mut Vec<Node>> {
    if nodes.iter().any(|n| n.key == key) {
        return Some(nodes);
    }
    for node in nodes.iter_mut() {
        if let Some(group) = group_containing(&mut node.children, key) {
            return Some(group);
        }
    }
    None
}

/// Flip `is_checked` and return the new value
pub fn toggle(nodes: &mut [Node], key: ItemKey) -> Option<bool> {
    let node = find_mut(nodes, key)?;
    node.is_checked = !node.is_checked;
    Some(node.is_checked)
}

pub fn rename(nodes: &mut [Node], key: ItemKey, name: &str) -> bool {
    match find_mut(nodes, key) {
        Some(node) => {
            node.name = name.to_string();
            true
        }
        None => false,
    }
}

/// Shift every sibling at or after `from` down by one, as the server does
fn shift_from(group: &mut [Node], from: i32) {
    for sibling in group.iter_mut().filter(|n| n.position >= from) {
        sibling.position += 1;
    }
}

/// Place `node` directly after `anchor` in the anchor's sibling group.
///
/// Returns the position the node was given.
pub fn insert_after(nodes: &mut Vec<Node>, anchor: ItemKey, mut node: Node) -> Option<i32> {
    let group = group_containing(nodes, anchor)?;
    let index = group.iter().position(|n| n.key == anchor)?;
    let position = group[index].position + 1;

    shift_from(group, position);
    node.parent_item_id = group[index].parent_item_id;
    node.position = position;
    group.insert(index + 1, node);
    Some(position)
}

/// Make `node` the first child of `anchor`
pub fn insert_child(nodes: &mut [Node], anchor: ItemKey, mut node: Node) -> Option<i32> {
    let parent = find_mut(nodes, anchor)?;

    shift_from(&mut parent.children, 0);
    node.parent_item_id = parent.key.saved_id();
    node.position = 0;
    parent.children.insert(0, node);
    Some(0)
}

/// Detach `key` together with its whole subtree
pub fn remove(nodes: &mut Vec<Node>, key: ItemKey) -> Option<Node> {
    if let Some(index) = nodes.iter().position(|n| n.key == key) {
        return Some(nodes.remove(index));
    }
    nodes.iter_mut().find_map(|n| remove(&mut n.children, key))
}

/// Swap a provisional key for the durable id and position the server chose
pub fn confirm(nodes: &mut [Node], provisional: ItemKey, id: u32, position: i32) -> bool {
    match find_mut(nodes, provisional) {
        Some(node) => {
            node.key = ItemKey::Saved(id);
            node.position = position;
            for child in node.children.iter_mut() {
                child.parent_item_id = Some(id);
            }
            true
        }
        None => false,
    }
}

pub fn count(nodes: &[Node]) -> usize {
    nodes.iter().map(|n| 1 + count(&n.children)).sum()
}
