//! Tree rendering for listings and store dumps

use colored::Colorize;
use serde_json::Value;
use termtree::Tree;

use crate::application::services::AliasEntry;

/// Aliases as a tree: one node per alias, path (and description) below it.
pub fn alias_tree(title: &str, entries: &[AliasEntry]) -> Tree<String> {
    let leaves = entries.iter().map(|entry| {
        let mut node = Tree::new(entry.name.bold().to_string());
        node.push(entry.path.clone());
        if let Some(description) = &entry.description {
            node.push(description.dimmed().to_string());
        }
        node
    });
    Tree::new(title.to_string()).with_leaves(leaves)
}

/// Arbitrary JSON value as a tree. Scalars become `key: value` leaves.
pub fn json_tree(label: &str, value: &Value) -> Tree<String> {
    match value {
        Value::Object(map) => {
            let mut tree = Tree::new(label.to_string());
            for (key, child) in map {
                tree.push(json_node(key, child));
            }
            tree
        }
        Value::Array(items) => {
            let mut tree = Tree::new(label.to_string());
            for (i, child) in items.iter().enumerate() {
                tree.push(json_node(&i.to_string(), child));
            }
            tree
        }
        scalar => Tree::new(format!("{}: {}", label, scalar_text(scalar))),
    }
}

fn json_node(key: &str, value: &Value) -> Tree<String> {
    match value {
        Value::Object(_) | Value::Array(_) => json_tree(key, value),
        scalar => Tree::new(format!("{}: {}", key, scalar_text(scalar))),
    }
}

/// Strings without quotes, everything else as JSON.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
