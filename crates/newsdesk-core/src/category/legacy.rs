//! Legacy flattened category strings
//!
//! Early revisions stored a post's category as `"L1 > L2 > L3"` (or
//! `"L1 > L2"` for sections without children, or a bare standalone name like
//! `"Opinion"`). These helpers pick such strings apart without consulting
//! the taxonomy; resolving them is the resolver's job.

use super::builtin::{HIERARCHY_SEPARATOR, STANDALONE_CATEGORIES};
use super::taxonomy::Taxonomy;

/// Every selectable flattened string
///
/// Walks the tree the way the old editors listed it: each section's leaves
/// in place, standalone categories last.
pub fn flat_categories(taxonomy: &Taxonomy) -> Vec<String> {
    let mut flat = Vec::with_capacity(taxonomy.len());
    let mut standalone = Vec::new();

    for root in taxonomy.roots() {
        let sections = taxonomy.children(root.id);
        if sections.is_empty() {
            standalone.push(root.hierarchical_name.clone());
            continue;
        }
        for section in sections {
            let leaves = taxonomy.children(section.id);
            if leaves.is_empty() {
                flat.push(section.hierarchical_name.clone());
            } else {
                flat.extend(leaves.iter().map(|l| l.hierarchical_name.clone()));
            }
        }
    }

    flat.extend(standalone);
    flat
}

fn segments(flattened: &str) -> Vec<&str> {
    flattened.split(HIERARCHY_SEPARATOR).collect()
}

/// First segment ("News" for "News > Local")
pub fn top_segment(flattened: &str) -> &str {
    segments(flattened).first().copied().unwrap_or(flattened)
}

/// Second segment, empty when there is none
pub fn middle_segment(flattened: &str) -> &str {
    segments(flattened).get(1).copied().unwrap_or("")
}

/// Third segment, falling back to the second, then to the whole string
pub fn child_segment(flattened: &str) -> &str {
    let parts = segments(flattened);
    parts
        .get(2)
        .or_else(|| parts.get(1))
        .copied()
        .unwrap_or(flattened)
}

/// Most specific label; standalone names come back unchanged
pub fn leaf_label(flattened: &str) -> &str {
    if is_standalone(flattened) {
        return flattened;
    }
    segments(flattened).last().copied().unwrap_or(flattened)
}

pub fn is_standalone(name: &str) -> bool {
    STANDALONE_CATEGORIES.contains(&name)
}
