//! Category Resolver
//!
//! カテゴリの各表現（数値id、url path、hierarchical name ("A > B > C")、
//! 末端のdisplay name、breadcrumb）を相互に変換する。
//!
//! すべてのルックアップは [`Breadcrumb`] か型付きの [`NotFound`] を返す。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NotFound;

use super::builtin::{CategoryNode, HIERARCHY_SEPARATOR, URL_SEPARATOR};
use super::taxonomy::Taxonomy;

/// 保存済みの `Post.category` の値（書き込んだスキーマの形式でタグ付け）
///
/// 値から形式を推測せず、呼び出し側が形式を明示する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum StoredCategory {
    /// 数値のカテゴリid（現行スキーマ）
    Id(u32),
    /// url pathまたはレガシーURLエイリアス
    Path(String),
    /// Full path string, "Lifestyle > Food and Wine > Wine Match"
    Hierarchical(String),
    /// Leaf label only, "Wine Match"
    Display(String),
}

impl StoredCategory {
    pub fn format(&self) -> StorageFormat {
        match self {
            Self::Id(_) => StorageFormat::Id,
            Self::Path(_) => StorageFormat::Path,
            Self::Hierarchical(_) => StorageFormat::Hierarchical,
            Self::Display(_) => StorageFormat::Display,
        }
    }

    /// Parse a raw value that is known to be in `format`
    ///
    /// Only the id format can fail: a non-numeric id is malformed input, not
    /// a miss.
    pub fn parse(format: StorageFormat, raw: &str) -> Result<Self, std::num::ParseIntError> {
        Ok(match format {
            StorageFormat::Id => Self::Id(raw.trim().parse()?),
            StorageFormat::Path => Self::Path(raw.to_string()),
            StorageFormat::Hierarchical => Self::Hierarchical(raw.to_string()),
            StorageFormat::Display => Self::Display(raw.to_string()),
        })
    }
}

impl fmt::Display for StoredCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {}", id),
            Self::Path(path) => write!(f, "path '{}'", path),
            Self::Hierarchical(name) => write!(f, "hierarchical name '{}'", name),
            Self::Display(name) => write!(f, "display name '{}'", name),
        }
    }
}

/// カテゴリを書き込むときの表現
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    /// 数値id（正規の書き込み形式）
    #[default]
    Id,
    Path,
    Hierarchical,
    Display,
}

impl StorageFormat {
    pub const ALL: [StorageFormat; 4] = [
        StorageFormat::Id,
        StorageFormat::Path,
        StorageFormat::Hierarchical,
        StorageFormat::Display,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Path => "path",
            Self::Hierarchical => "hierarchical",
            Self::Display => "display",
        }
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| {
                format!(
                    "unknown storage format '{}' (expected one of: id, path, hierarchical, display)",
                    s
                )
            })
    }
}

/// Root-to-leaf chain of categories
///
/// Only the resolver builds these, so a breadcrumb is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb<'a> {
    nodes: Vec<&'a CategoryNode>,
    #[serde(skip)]
    leaf: &'a CategoryNode,
}

impl<'a> Breadcrumb<'a> {
    fn from_leaf(taxonomy: &'a Taxonomy, leaf: &'a CategoryNode) -> Self {
        let mut nodes = vec![leaf];
        let mut current = leaf;
        // Terminates: the taxonomy rejected cycles and missing parents.
        while let Some(parent) = taxonomy.parent(current) {
            nodes.push(parent);
            current = parent;
        }
        nodes.reverse();
        Self { nodes, leaf }
    }

    /// The most specific category
    pub fn leaf(&self) -> &'a CategoryNode {
        self.leaf
    }

    /// The level 1 category
    pub fn root(&self) -> &'a CategoryNode {
        self.nodes.first().copied().unwrap_or(self.leaf)
    }

    pub fn id(&self) -> u32 {
        self.leaf.id
    }

    pub fn nodes(&self) -> &[&'a CategoryNode] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CategoryNode> + '_ {
        self.nodes.iter().copied()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    pub fn labels(&self) -> Vec<&'a str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    /// Labels joined with " > "
    pub fn hierarchical_name(&self) -> String {
        self.labels().join(HIERARCHY_SEPARATOR)
    }

    pub fn url_path(&self) -> &'a str {
        &self.leaf.url_path
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// ルックアップのヒット・ミス時にresolverが呼ぶフック
///
/// 構築時に注入する。デフォルト実装はすべて何もしない。
pub trait ResolveObserver: Send + Sync {
    /// A url fragment matched the legacy alias table
    fn on_alias_hit(&self, _fragment: &str, _id: u32) {}

    /// A query matched a canonical representation
    fn on_hit(&self, _query: &StoredCategory, _id: u32) {}

    /// A query matched nothing
    fn on_miss(&self, _query: &StoredCategory) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ResolveObserver for NoopObserver {}

/// Observer that forwards lookups to `tracing` at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ResolveObserver for TracingObserver {
    fn on_alias_hit(&self, fragment: &str, id: u32) {
        tracing::debug!(fragment, id, "resolved legacy route alias");
    }

    fn on_hit(&self, query: &StoredCategory, id: u32) {
        tracing::debug!(%query, id, "resolved category");
    }

    fn on_miss(&self, query: &StoredCategory) {
        tracing::debug!(%query, "category not found");
    }
}

/// 検証済みタクソノミー上の双方向カテゴリ変換
pub struct CategoryResolver<'a> {
    taxonomy: &'a Taxonomy,
    observer: Box<dyn ResolveObserver + 'a>,
}

impl<'a> CategoryResolver<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self {
            taxonomy,
            observer: Box::new(NoopObserver),
        }
    }

    /// Replace the observer
    pub fn with_observer(mut self, observer: impl ResolveObserver + 'a) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn taxonomy(&self) -> &'a Taxonomy {
        self.taxonomy
    }

    /// Single node lookup; a miss is `None`
    pub fn get_category_by_id(&self, id: u32) -> Option<&'a CategoryNode> {
        self.taxonomy.get(id)
    }

    /// Root-to-leaf chain for `id` (empty for unknown ids)
    pub fn hierarchy(&self, id: u32) -> Vec<&'a CategoryNode> {
        self.resolve_by_id(id)
            .map(|b| b.nodes)
            .unwrap_or_default()
    }

    pub fn resolve_by_id(&self, id: u32) -> Result<Breadcrumb<'a>, NotFound> {
        let query = StoredCategory::Id(id);
        let node = self.taxonomy.get(id);
        self.finish(query, node)
    }

    /// Alias table first, then canonical url paths
    ///
    /// An alias wins even when another node's canonical path is the same
    /// string, so historically bookmarked links keep their target.
    pub fn resolve_by_url_path(&self, path: &str) -> Result<Breadcrumb<'a>, NotFound> {
        if let Some(id) = self.taxonomy.alias_target(path) {
            if let Some(node) = self.taxonomy.get(id) {
                self.observer.on_alias_hit(path, id);
                return Ok(Breadcrumb::from_leaf(self.taxonomy, node));
            }
        }
        let node = self.taxonomy.by_url_path(path);
        self.finish(StoredCategory::Path(path.to_string()), node)
    }

    pub fn resolve_by_hierarchical_name(&self, name: &str) -> Result<Breadcrumb<'a>, NotFound> {
        let node = self.taxonomy.by_hierarchical_name(name);
        self.finish(StoredCategory::Hierarchical(name.to_string()), node)
    }

    /// Exact match on the leaf label; the first match in declaration order wins
    pub fn resolve_by_display_name(&self, name: &str) -> Result<Breadcrumb<'a>, NotFound> {
        let node = self.taxonomy.by_display_name(name);
        self.finish(StoredCategory::Display(name.to_string()), node)
    }

    /// Resolve a tagged stored value
    pub fn resolve(&self, stored: &StoredCategory) -> Result<Breadcrumb<'a>, NotFound> {
        match stored {
            StoredCategory::Id(id) => self.resolve_by_id(*id),
            StoredCategory::Path(path) => self.resolve_by_url_path(path),
            StoredCategory::Hierarchical(name) => self.resolve_by_hierarchical_name(name),
            StoredCategory::Display(name) => self.resolve_by_display_name(name),
        }
    }

    /// Category id from router segments
    ///
    /// Segments nest: `subsubcategory` is only used under a non-empty
    /// `subcategory`. An empty `category` is a miss without any lookup.
    pub fn build_url_from_params(
        &self,
        category: Option<&str>,
        subcategory: Option<&str>,
        subsubcategory: Option<&str>,
    ) -> Result<u32, NotFound> {
        let Some(category) = category.filter(|c| !c.is_empty()) else {
            let query = StoredCategory::Path(String::new());
            self.observer.on_miss(&query);
            return Err(NotFound::new(query));
        };

        let mut path = category.to_string();
        if let Some(sub) = subcategory.filter(|s| !s.is_empty()) {
            path.push(URL_SEPARATOR);
            path.push_str(sub);
            if let Some(subsub) = subsubcategory.filter(|s| !s.is_empty()) {
                path.push(URL_SEPARATOR);
                path.push_str(subsub);
            }
        }

        self.resolve_by_url_path(&path).map(|b| b.id())
    }

    /// Canonical write path: always the numeric id
    pub fn serialize_for_storage(&self, breadcrumb: &Breadcrumb<'_>) -> StoredCategory {
        StoredCategory::Id(breadcrumb.id())
    }

    /// Emit an explicitly requested representation, for older schema readers
    pub fn serialize_as(&self, breadcrumb: &Breadcrumb<'_>, format: StorageFormat) -> StoredCategory {
        let leaf = breadcrumb.leaf();
        match format {
            StorageFormat::Id => StoredCategory::Id(leaf.id),
            StorageFormat::Path => StoredCategory::Path(leaf.url_path.clone()),
            StorageFormat::Hierarchical => StoredCategory::Hierarchical(breadcrumb.hierarchical_name()),
            StorageFormat::Display => StoredCategory::Display(leaf.display_name.clone()),
        }
    }

    /// 保存済みの任意の値を正規のid形式に変換
    pub fn normalize(&self, stored: &StoredCategory) -> Result<StoredCategory, NotFound> {
        let breadcrumb = self.resolve(stored)?;
        Ok(self.serialize_for_storage(&breadcrumb))
    }

    fn finish(
        &self,
        query: StoredCategory,
        node: Option<&'a CategoryNode>,
    ) -> Result<Breadcrumb<'a>, NotFound> {
        match node {
            Some(node) => {
                self.observer.on_hit(&query, node.id);
                Ok(Breadcrumb::from_leaf(self.taxonomy, node))
            }
            None => {
                self.observer.on_miss(&query);
                Err(NotFound::new(query))
            }
        }
    }
}

impl fmt::Debug for CategoryResolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryResolver")
            .field("categories", &self.taxonomy.len())
            .finish_non_exhaustive()
    }
}
