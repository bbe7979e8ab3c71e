//! Post category fields
//!
//! Posts carry up to two category columns: `category_id` (current schema)
//! and the legacy `category` string, written either as a hierarchical name
//! by the editor or as a leaf label by older screens. Only these two fields
//! are read or written here; the rest of a post record passes through.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::category::{Breadcrumb, CategoryResolver, StoredCategory};
use crate::error::NotFound;

const CATEGORY_FIELD: &str = "category";
const CATEGORY_ID_FIELD: &str = "category_id";

/// The category columns of a post row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCategoryFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u32>,
}

impl PostCategoryFields {
    pub fn from_id(id: u32) -> Self {
        Self {
            category: None,
            category_id: Some(id),
        }
    }

    pub fn from_legacy(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            category_id: None,
        }
    }

    /// Read the two columns out of a JSON post object
    ///
    /// A numeric `category` is an id and fills `category_id` when that column
    /// is absent. Other non-string values are treated as absent.
    pub fn from_json(post: &Map<String, Value>) -> Self {
        Self {
            category: post
                .get(CATEGORY_FIELD)
                .and_then(Value::as_str)
                .map(str::to_string),
            category_id: post
                .get(CATEGORY_ID_FIELD)
                .and_then(json_id)
                .or_else(|| post.get(CATEGORY_FIELD).and_then(json_id)),
        }
    }

    /// Write the columns back, leaving every other field untouched
    pub fn write_json(&self, post: &mut Map<String, Value>) {
        match &self.category {
            Some(category) => {
                post.insert(CATEGORY_FIELD.to_string(), Value::from(category.as_str()));
            }
            None => {
                post.remove(CATEGORY_FIELD);
            }
        }
        match self.category_id {
            Some(id) => {
                post.insert(CATEGORY_ID_FIELD.to_string(), Value::from(id));
            }
            None => {
                post.remove(CATEGORY_ID_FIELD);
            }
        }
    }

    /// Stored values to try, most authoritative first
    pub fn candidates(&self) -> Vec<StoredCategory> {
        let mut candidates = Vec::with_capacity(3);
        if let Some(id) = self.category_id {
            candidates.push(StoredCategory::Id(id));
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.trim().is_empty()) {
            candidates.push(StoredCategory::Hierarchical(category.to_string()));
            candidates.push(StoredCategory::Display(category.to_string()));
        }
        candidates
    }

    pub fn is_empty(&self) -> bool {
        self.candidates().is_empty()
    }
}

fn json_id(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|id| u32::try_from(id).ok())
}

/// Resolve a post's category
///
/// `category_id` wins; otherwise the legacy string is tried as a
/// hierarchical name, then as a leaf label. A post without any category
/// misses with an empty hierarchical query.
pub fn resolve_post<'a>(
    resolver: &CategoryResolver<'a>,
    fields: &PostCategoryFields,
) -> Result<Breadcrumb<'a>, NotFound> {
    let candidates = fields.candidates();
    for candidate in &candidates {
        if let Ok(breadcrumb) = resolver.resolve(candidate) {
            return Ok(breadcrumb);
        }
    }
    let query = candidates
        .into_iter()
        .next()
        .unwrap_or_else(|| StoredCategory::Hierarchical(String::new()));
    Err(NotFound::new(query))
}

/// Canonical columns for a post: id set, legacy string as hierarchical name
pub fn upgrade_post(
    resolver: &CategoryResolver<'_>,
    fields: &PostCategoryFields,
) -> Result<PostCategoryFields, NotFound> {
    let breadcrumb = resolve_post(resolver, fields)?;
    Ok(PostCategoryFields {
        category: Some(breadcrumb.leaf().hierarchical_name.clone()),
        category_id: Some(breadcrumb.id()),
    })
}

/// Label to render for a post; `fallback` when nothing resolves
pub fn display_label(
    resolver: &CategoryResolver<'_>,
    fields: &PostCategoryFields,
    fallback: &str,
) -> String {
    resolve_post(resolver, fields)
        .map(|b| b.leaf().display_name.clone())
        .unwrap_or_else(|_| fallback.to_string())
}

/// What happened to one post during migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpgradeOutcome {
    AlreadyCanonical,
    Upgraded,
    Unresolved,
}

/// A post whose category could not be resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnresolvedPost {
    /// Position in the input batch
    pub index: usize,
    /// The post's `id` field, if it had one
    pub post_id: Option<Value>,
    pub fields: PostCategoryFields,
    /// Label the CMS renders for it
    pub label: String,
}

/// Summary of a migration batch
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub already_canonical: usize,
    pub upgraded: usize,
    pub unresolved: Vec<UnresolvedPost>,
    /// Posts per resolved category id
    pub by_category: BTreeMap<u32, usize>,
    /// Entries that were not JSON objects
    pub skipped: usize,
}

impl MigrationReport {
    fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            total: 0,
            already_canonical: 0,
            upgraded: 0,
            unresolved: Vec::new(),
            by_category: BTreeMap::new(),
            skipped: 0,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.skipped == 0
    }
}

/// Upgrade one post object in place
pub fn upgrade_post_json(
    resolver: &CategoryResolver<'_>,
    post: &mut Map<String, Value>,
) -> (UpgradeOutcome, Option<u32>) {
    let fields = PostCategoryFields::from_json(post);
    match upgrade_post(resolver, &fields) {
        Ok(upgraded) if upgraded == fields => (UpgradeOutcome::AlreadyCanonical, upgraded.category_id),
        Ok(upgraded) => {
            upgraded.write_json(post);
            (UpgradeOutcome::Upgraded, upgraded.category_id)
        }
        Err(_) => (UpgradeOutcome::Unresolved, None),
    }
}

/// Upgrade a batch of post objects in place and report what changed
///
/// Unresolved posts are left as they are.
pub fn migrate_posts(
    resolver: &CategoryResolver<'_>,
    posts: &mut [Value],
    fallback_label: &str,
) -> MigrationReport {
    let mut report = MigrationReport::new();

    for (index, post) in posts.iter_mut().enumerate() {
        report.total += 1;
        let Some(object) = post.as_object_mut() else {
            tracing::warn!(index, "skipping post entry that is not a JSON object");
            report.skipped += 1;
            continue;
        };

        let (outcome, id) = upgrade_post_json(resolver, object);
        if let Some(id) = id {
            *report.by_category.entry(id).or_insert(0) += 1;
        }
        match outcome {
            UpgradeOutcome::AlreadyCanonical => report.already_canonical += 1,
            UpgradeOutcome::Upgraded => report.upgraded += 1,
            UpgradeOutcome::Unresolved => {
                let fields = PostCategoryFields::from_json(object);
                tracing::debug!(index, ?fields, "post category did not resolve");
                report.unresolved.push(UnresolvedPost {
                    index,
                    post_id: object.get("id").cloned(),
                    fields,
                    label: fallback_label.to_string(),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Taxonomy;
    use serde_json::json;

    #[test]
    fn test_id_wins_over_legacy_string() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let resolver = CategoryResolver::new(&taxonomy);
        let fields = PostCategoryFields {
            category: Some("News > World".to_string()),
            category_id: Some(12),
        };
        assert_eq!(resolve_post(&resolver, &fields).unwrap().id(), 12);
    }

    #[test]
    fn test_legacy_display_name_fallback() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let resolver = CategoryResolver::new(&taxonomy);
        let fields = PostCategoryFields::from_legacy("Wine Match");
        let upgraded = upgrade_post(&resolver, &fields).unwrap();
        assert_eq!(upgraded.category_id, Some(212));
        assert_eq!(
            upgraded.category.as_deref(),
            Some("Lifestyle > Food and Wine > Wine Match")
        );
    }

    #[test]
    fn test_stale_id_falls_back_to_string() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let resolver = CategoryResolver::new(&taxonomy);
        let fields = PostCategoryFields {
            category: Some("Opinion".to_string()),
            category_id: Some(999),
        };
        assert_eq!(resolve_post(&resolver, &fields).unwrap().id(), 4);
    }

    #[test]
    fn test_empty_post_misses() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let resolver = CategoryResolver::new(&taxonomy);
        let fields = PostCategoryFields::default();
        assert!(fields.is_empty());
        assert!(resolve_post(&resolver, &fields).is_err());
        assert_eq!(
            display_label(&resolver, &fields, "Uncategorized"),
            "Uncategorized"
        );
    }

    #[test]
    fn test_json_round_trip_keeps_other_fields() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let resolver = CategoryResolver::new(&taxonomy);
        let mut post = json!({"id": 7, "title": "Opening night", "category": "Reviews"});
        let (outcome, id) = upgrade_post_json(&resolver, post.as_object_mut().unwrap());
        assert_eq!(outcome, UpgradeOutcome::Upgraded);
        assert_eq!(id, Some(321));
        assert_eq!(
            post,
            json!({
                "id": 7,
                "title": "Opening night",
                "category": "Arts and Entertainment > Theatre > Reviews",
                "category_id": 321
            })
        );
    }

    #[test]
    fn test_numeric_category_is_an_id() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let resolver = CategoryResolver::new(&taxonomy);

        let post = json!({"id": 9, "category": 321});
        let fields = PostCategoryFields::from_json(post.as_object().unwrap());
        assert_eq!(fields, PostCategoryFields::from_id(321));
        assert_eq!(resolve_post(&resolver, &fields).unwrap().id(), 321);

        // An explicit category_id still wins over a numeric category.
        let post = json!({"category": 321, "category_id": 11});
        let fields = PostCategoryFields::from_json(post.as_object().unwrap());
        assert_eq!(fields.category_id, Some(11));

        let mut posts = vec![json!({"id": 9, "category": 321}), json!({"category": -1})];
        let report = migrate_posts(&resolver, &mut posts, "Uncategorized");
        assert_eq!(report.upgraded, 1);
        assert_eq!(report.unresolved.len(), 1);
        assert_eq!(report.unresolved[0].index, 1);
        assert_eq!(
            posts[0],
            json!({
                "id": 9,
                "category": "Arts and Entertainment > Theatre > Reviews",
                "category_id": 321
            })
        );
    }

    #[test]
    fn test_migrate_posts_report() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let resolver = CategoryResolver::new(&taxonomy);
        let mut posts = vec![
            json!({"id": 1, "category": "News > Local", "category_id": 11}),
            json!({"id": 2, "category": "News > Local"}),
            json!({"id": 3, "category": "Crosswords"}),
            json!("not a post"),
        ];

        let report = migrate_posts(&resolver, &mut posts, "Uncategorized");
        assert_eq!(report.total, 4);
        assert_eq!(report.already_canonical, 1);
        assert_eq!(report.upgraded, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.by_category.get(&11), Some(&2));
        assert_eq!(report.unresolved.len(), 1);
        assert_eq!(report.unresolved[0].post_id, Some(json!(3)));
        assert_eq!(report.unresolved[0].label, "Uncategorized");
        assert!(!report.is_clean());
        assert_eq!(posts[1]["category_id"], json!(11));
        assert_eq!(posts[2], json!({"id": 3, "category": "Crosswords"}));
    }
}
