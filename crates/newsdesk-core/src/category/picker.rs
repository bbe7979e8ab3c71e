//! Hierarchical Picker Adapter
//!
//! Flattens the taxonomy into ordered rows for a grouped select control.
//! Headers are never selectable; only leaves are.

use serde::Serialize;

use super::taxonomy::Taxonomy;

/// One row of a category picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PickerEntry {
    /// Non-selectable group label
    #[serde(rename_all = "camelCase")]
    GroupHeader { level: u8, label: String },
    /// A category the user can pick
    #[serde(rename_all = "camelCase")]
    Selectable {
        node_id: u32,
        label: String,
        indent_level: u8,
    },
}

impl PickerEntry {
    pub fn is_selectable(&self) -> bool {
        matches!(self, Self::Selectable { .. })
    }

    pub fn label(&self) -> &str {
        match self {
            Self::GroupHeader { label, .. } | Self::Selectable { label, .. } => label,
        }
    }

    pub fn node_id(&self) -> Option<u32> {
        match self {
            Self::Selectable { node_id, .. } => Some(*node_id),
            Self::GroupHeader { .. } => None,
        }
    }
}

/// Build picker rows from the taxonomy
///
/// For each level 1 category in declaration order:
/// - without children (standalone, e.g. "Opinion"): one selectable row, indent 0
/// - otherwise a header, then per level 2 child either a selectable row
///   (indent 1) or, when it has children, a header followed by its level 3
///   children as selectable rows (indent 2)
pub fn build_picker_options(taxonomy: &Taxonomy) -> Vec<PickerEntry> {
    let mut entries = Vec::with_capacity(taxonomy.len() + 8);

    for root in taxonomy.roots() {
        let sections = taxonomy.children(root.id);
        if sections.is_empty() {
            entries.push(PickerEntry::Selectable {
                node_id: root.id,
                label: root.display_name.clone(),
                indent_level: 0,
            });
            continue;
        }

        entries.push(PickerEntry::GroupHeader {
            level: root.level,
            label: root.display_name.clone(),
        });

        for section in sections {
            let leaves = taxonomy.children(section.id);
            if leaves.is_empty() {
                entries.push(PickerEntry::Selectable {
                    node_id: section.id,
                    label: section.display_name.clone(),
                    indent_level: 1,
                });
                continue;
            }

            entries.push(PickerEntry::GroupHeader {
                level: section.level,
                label: section.display_name.clone(),
            });
            entries.extend(leaves.into_iter().map(|leaf| PickerEntry::Selectable {
                node_id: leaf.id,
                label: leaf.display_name.clone(),
                indent_level: 2,
            }));
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(level: u8, label: &str) -> PickerEntry {
        PickerEntry::GroupHeader {
            level,
            label: label.to_string(),
        }
    }

    fn selectable(node_id: u32, label: &str, indent_level: u8) -> PickerEntry {
        PickerEntry::Selectable {
            node_id,
            label: label.to_string(),
            indent_level,
        }
    }

    #[test]
    fn test_news_group_is_flat() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let entries = build_picker_options(&taxonomy);
        assert_eq!(entries[0], header(1, "News"));
        assert_eq!(entries[1], selectable(11, "Local", 1));
        assert_eq!(entries[6], selectable(16, "Media", 1));
    }

    #[test]
    fn test_food_and_wine_gets_subheader() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let entries = build_picker_options(&taxonomy);
        let start = entries
            .iter()
            .position(|e| *e == header(1, "Lifestyle"))
            .unwrap();
        assert_eq!(
            &entries[start..start + 6],
            &[
                header(1, "Lifestyle"),
                header(2, "Food and Wine"),
                selectable(211, "Restaurant Reviews", 2),
                selectable(212, "Wine Match", 2),
                selectable(22, "Sport", 1),
                selectable(23, "Travel", 1),
            ]
        );
    }

    #[test]
    fn test_standalone_category_is_selectable() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let entries = build_picker_options(&taxonomy);
        assert_eq!(entries.last(), Some(&selectable(4, "Opinion", 0)));
        assert!(!entries.contains(&header(1, "Opinion")));
    }

    #[test]
    fn test_entry_json_shape() {
        let json = serde_json::to_value(selectable(321, "Reviews", 2)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "selectable",
                "nodeId": 321,
                "label": "Reviews",
                "indentLevel": 2
            })
        );
        let json = serde_json::to_value(header(1, "News")).unwrap();
        assert_eq!(json["kind"], "group-header");
    }
}
