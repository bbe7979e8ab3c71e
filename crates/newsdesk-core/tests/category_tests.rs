use newsdesk_core::category::{HIERARCHY_SEPARATOR, SPECIAL_ROUTE_ALIASES};
use newsdesk_core::{
    build_picker_options, CategoryNode, CategoryResolver, PickerEntry, StorageFormat,
    StoredCategory, Taxonomy,
};

fn builtin() -> Taxonomy {
    Taxonomy::builtin().unwrap()
}

fn ids(nodes: &[&CategoryNode]) -> Vec<u32> {
    nodes.iter().map(|n| n.id).collect()
}

#[test]
fn test_every_node_resolves_by_id() {
    let taxonomy = builtin();
    let resolver = CategoryResolver::new(&taxonomy);

    for node in taxonomy.all() {
        let breadcrumb = resolver.resolve_by_id(node.id).unwrap();
        assert_eq!(breadcrumb.leaf(), node);
        assert_eq!(breadcrumb.len(), node.level as usize);
        assert_eq!(
            breadcrumb.labels().join(HIERARCHY_SEPARATOR),
            node.hierarchical_name
        );
        assert!(breadcrumb.root().is_root());
    }
}

#[test]
fn test_url_path_matches_id_resolution() {
    let taxonomy = builtin();
    let resolver = CategoryResolver::new(&taxonomy);

    for node in taxonomy.all() {
        let by_path = resolver.resolve_by_url_path(&node.url_path).unwrap();
        let by_id = resolver.resolve_by_id(node.id).unwrap();
        assert_eq!(by_path, by_id, "url path {}", node.url_path);
    }
}

#[test]
fn test_every_storage_format_round_trips() {
    let taxonomy = builtin();
    let resolver = CategoryResolver::new(&taxonomy);

    for node in taxonomy.all() {
        let breadcrumb = resolver.resolve_by_id(node.id).unwrap();

        let canonical = resolver.serialize_for_storage(&breadcrumb);
        assert_eq!(canonical, StoredCategory::Id(node.id));

        for format in StorageFormat::ALL {
            let stored = resolver.serialize_as(&breadcrumb, format);
            assert_eq!(stored.format(), format);
            let back = resolver.resolve(&stored).unwrap();
            assert_eq!(back.leaf(), node, "{} via {}", node.id, format);
        }
    }
}

#[test]
fn test_builtin_aliases_keep_their_targets() {
    let taxonomy = builtin();
    let resolver = CategoryResolver::new(&taxonomy);

    let expected = [
        ("localnews", 11),
        ("news/localnews", 11),
        ("news/local", 11),
        ("opinion", 4),
        ("arts/theatre/reviews", 321),
        ("artsentertainment/theatre/theatrereviews", 321),
    ];
    for (fragment, id) in expected {
        assert_eq!(
            resolver.resolve_by_url_path(fragment).unwrap().id(),
            id,
            "{}",
            fragment
        );
    }
    assert_eq!(SPECIAL_ROUTE_ALIASES.len(), expected.len());
}

#[test]
fn test_alias_precedence_over_canonical_path() {
    let taxonomy = builtin();
    // "news/world" is the canonical path of 13; an alias on the same string wins.
    let routing = newsdesk_core::RoutingConfig {
        deprecated_aliases: Vec::new(),
        extra_aliases: [("news/world".to_string(), 15)].into_iter().collect(),
    };
    let overridden = Taxonomy::builtin_with(&routing).unwrap();
    let resolver = CategoryResolver::new(&overridden);
    assert_eq!(resolver.resolve_by_url_path("news/world").unwrap().id(), 15);
    // Id resolution is unaffected.
    assert_eq!(resolver.resolve_by_id(13).unwrap().url_path(), "news/world");

    let resolver = CategoryResolver::new(&taxonomy);
    assert_eq!(resolver.resolve_by_url_path("news/world").unwrap().id(), 13);
}

#[test]
fn test_scenario_theatre_reviews_path() {
    let taxonomy = builtin();
    let resolver = CategoryResolver::new(&taxonomy);
    let breadcrumb = resolver
        .resolve_by_url_path("artsentertainment/theatre/theatrereviews")
        .unwrap();
    assert_eq!(
        breadcrumb.labels(),
        vec!["Arts and Entertainment", "Theatre", "Reviews"]
    );
    assert_eq!(breadcrumb.id(), 321);
}

#[test]
fn test_scenario_local_news_alias() {
    let taxonomy = builtin();
    let resolver = CategoryResolver::new(&taxonomy);
    let alias = resolver.resolve_by_url_path("localnews").unwrap();
    let canonical = resolver.resolve_by_url_path("news/localnews").unwrap();
    assert_eq!(alias, canonical);
    assert_eq!(alias.id(), 11);
}

#[test]
fn test_scenario_hierarchical_name() {
    let taxonomy = builtin();
    let resolver = CategoryResolver::new(&taxonomy);
    let breadcrumb = resolver
        .resolve_by_hierarchical_name("Lifestyle > Food and Wine > Wine Match")
        .unwrap();
    assert_eq!(breadcrumb.id(), 212);
    assert_eq!(ids(breadcrumb.nodes()), vec![2, 21, 212]);
}

#[test]
fn test_scenario_url_params() {
    let taxonomy = builtin();
    let resolver = CategoryResolver::new(&taxonomy);
    assert_eq!(
        resolver.build_url_from_params(
            Some("lifestyle"),
            Some("food-and-wine"),
            Some("restaurant-reviews")
        ),
        Ok(211)
    );
}

#[test]
fn test_scenario_unknown_path_is_a_value() {
    let taxonomy = builtin();
    let resolver = CategoryResolver::new(&taxonomy);
    let miss = resolver.resolve_by_url_path("does/not/exist").unwrap_err();
    assert_eq!(miss.query, StoredCategory::Path("does/not/exist".to_string()));
}

#[test]
fn test_scenario_picker_theatre_branch() {
    let taxonomy = builtin();
    let entries = build_picker_options(&taxonomy);

    let arts = entries
        .iter()
        .position(|e| {
            *e == PickerEntry::GroupHeader {
                level: 1,
                label: "Arts and Entertainment".to_string(),
            }
        })
        .unwrap();
    assert_eq!(
        entries[arts + 1],
        PickerEntry::Selectable {
            node_id: 31,
            label: "Games".to_string(),
            indent_level: 1,
        }
    );
    assert_eq!(
        entries[arts + 2],
        PickerEntry::GroupHeader {
            level: 2,
            label: "Theatre".to_string(),
        }
    );
    assert_eq!(
        entries[arts + 3],
        PickerEntry::Selectable {
            node_id: 321,
            label: "Reviews".to_string(),
            indent_level: 2,
        }
    );
}

#[test]
fn test_picker_only_leaves_selectable() {
    let taxonomy = builtin();
    let entries = build_picker_options(&taxonomy);

    for entry in &entries {
        match entry {
            PickerEntry::Selectable { node_id, .. } => {
                assert!(taxonomy.get(*node_id).is_some());
                assert!(!taxonomy.has_children(*node_id), "{} has children", node_id);
            }
            PickerEntry::GroupHeader { .. } => assert!(entry.node_id().is_none()),
        }
    }

    let selectable = entries.iter().filter(|e| e.is_selectable()).count();
    assert_eq!(selectable, taxonomy.leaves().count());
}

#[test]
fn test_display_name_first_match_wins() {
    let nodes = vec![
        node(1, "Arts", None, 1, "arts"),
        node(11, "Reviews", Some(1), 2, "arts/reviews"),
        node(2, "Food", None, 1, "food"),
        node(21, "Reviews", Some(2), 2, "food/reviews"),
    ];
    let taxonomy = Taxonomy::from_nodes(nodes, Vec::new()).unwrap();
    let resolver = CategoryResolver::new(&taxonomy);
    assert_eq!(resolver.resolve_by_display_name("Reviews").unwrap().id(), 11);
    assert_eq!(
        resolver
            .resolve_by_hierarchical_name("Food > Reviews")
            .unwrap()
            .id(),
        21
    );
}

#[test]
fn test_calls_are_idempotent() {
    let taxonomy = builtin();
    let resolver = CategoryResolver::new(&taxonomy);

    assert_eq!(build_picker_options(&taxonomy), build_picker_options(&taxonomy));
    assert_eq!(
        resolver.resolve_by_url_path("news/local"),
        resolver.resolve_by_url_path("news/local")
    );
    assert_eq!(
        resolver.build_url_from_params(Some("nowhere"), None, None),
        resolver.build_url_from_params(Some("nowhere"), None, None)
    );
    assert_eq!(taxonomy.url_mappings(), taxonomy.url_mappings());
}

#[test]
fn test_shared_taxonomy_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                let taxonomy = Taxonomy::shared().unwrap();
                let resolver = CategoryResolver::new(taxonomy);
                resolver.resolve_by_url_path("localnews").unwrap().id()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 11);
    }
}

fn node(id: u32, name: &str, parent_id: Option<u32>, level: u8, url: &str) -> CategoryNode {
    CategoryNode {
        id,
        name: name.to_string(),
        display_name: name.to_string(),
        parent_id,
        level,
        url_path: url.to_string(),
        hierarchical_name: String::new(),
    }
}
