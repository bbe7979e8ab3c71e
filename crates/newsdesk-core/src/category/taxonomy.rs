//! Taxonomy
//!
//! カテゴリ定義の検証済み・読み取り専用ビュー。
//! 一度だけ構築し、以降のルックアップはすべて読み取りのみ。

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::OnceCell;

use crate::config::RoutingConfig;
use crate::error::TaxonomyError;

use super::builtin::{
    CategoryNode, BUILTIN_CATEGORIES, HIERARCHY_SEPARATOR, MAX_LEVEL, SPECIAL_ROUTE_ALIASES,
};

static SHARED: OnceCell<Taxonomy> = OnceCell::new();

/// 検証済みカテゴリタクソノミー
#[derive(Debug, Clone)]
pub struct Taxonomy {
    /// 宣言順
    nodes: Vec<CategoryNode>,
    by_id: HashMap<u32, usize>,
    by_url_path: HashMap<String, usize>,
    by_hierarchical_name: HashMap<String, usize>,
    children: HashMap<u32, Vec<usize>>,
    aliases: HashMap<String, u32>,
}

impl Taxonomy {
    /// ビルトインカテゴリとURLエイリアスから構築
    pub fn builtin() -> Result<Self, TaxonomyError> {
        Self::from_nodes(
            BUILTIN_CATEGORIES.iter().map(CategoryNode::from),
            builtin_aliases(),
        )
    }

    /// 設定のrouting節を適用したビルトインタクソノミー
    ///
    /// - 廃止されたエイリアスは除外
    /// - 追加エイリアスを登録（既存のidを指す必要がある）
    pub fn builtin_with(routing: &RoutingConfig) -> Result<Self, TaxonomyError> {
        let mut aliases: Vec<(String, u32)> = builtin_aliases()
            .into_iter()
            .filter(|(fragment, _)| !routing.deprecated_aliases.contains(fragment))
            .collect();

        aliases.extend(
            routing
                .extra_aliases
                .iter()
                .map(|(fragment, &id)| (fragment.clone(), id)),
        );

        Self::from_nodes(BUILTIN_CATEGORIES.iter().map(CategoryNode::from), aliases)
    }

    /// プロセス全体で共有するビルトインタクソノミー（初回アクセス時に検証）
    ///
    /// 検証が終わるまで全呼び出し元がブロックする。定義に不備があれば
    /// 全呼び出し元にエラーを返し、何も提供しない。
    pub fn shared() -> Result<&'static Taxonomy, TaxonomyError> {
        SHARED.get_or_try_init(Self::builtin)
    }

    /// 任意のノードから構築して検証する
    ///
    /// 入力ノードの `hierarchical_name` は無視し、親の連鎖から再計算する。
    pub fn from_nodes<N, A>(nodes: N, aliases: A) -> Result<Self, TaxonomyError>
    where
        N: IntoIterator<Item = CategoryNode>,
        A: IntoIterator<Item = (String, u32)>,
    {
        let mut nodes: Vec<CategoryNode> = nodes.into_iter().collect();

        let mut by_id = HashMap::with_capacity(nodes.len());
        let mut by_url_path = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            check_shape(node)?;
            if by_id.insert(node.id, idx).is_some() {
                return Err(TaxonomyError::DuplicateId { id: node.id });
            }
            if let Some(prev) = by_url_path.insert(node.url_path.clone(), idx) {
                return Err(TaxonomyError::DuplicateUrlPath {
                    path: node.url_path.clone(),
                    first: nodes[prev].id,
                    second: node.id,
                });
            }
        }

        let mut children: HashMap<u32, Vec<usize>> = HashMap::new();
        for (idx, node) in nodes.iter().enumerate() {
            let Some(parent_id) = node.parent_id else {
                continue;
            };
            let parent = by_id
                .get(&parent_id)
                .map(|&p| &nodes[p])
                .ok_or(TaxonomyError::UnknownParent {
                    id: node.id,
                    parent_id,
                })?;
            if parent.level + 1 != node.level {
                return Err(TaxonomyError::LevelMismatch {
                    id: node.id,
                    level: node.level,
                    parent_id,
                    parent_level: parent.level,
                });
            }
            children.entry(parent_id).or_default().push(idx);
        }

        let names = nodes
            .iter()
            .map(|node| hierarchical_name(node, &nodes, &by_id))
            .collect::<Result<Vec<_>, _>>()?;
        for (node, name) in nodes.iter_mut().zip(names) {
            node.hierarchical_name = name;
        }

        let mut by_hierarchical_name = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            if let Some(prev) = by_hierarchical_name.insert(node.hierarchical_name.clone(), idx) {
                return Err(TaxonomyError::DuplicateHierarchicalName {
                    name: node.hierarchical_name.clone(),
                    first: nodes[prev].id,
                    second: node.id,
                });
            }
        }

        let mut alias_map: HashMap<String, u32> = HashMap::new();
        for (fragment, target) in aliases {
            if !by_id.contains_key(&target) {
                return Err(TaxonomyError::UnknownAliasTarget { fragment, target });
            }
            match alias_map.get(&fragment) {
                Some(&first) if first != target => {
                    return Err(TaxonomyError::ConflictingAlias {
                        fragment,
                        first,
                        second: target,
                    });
                }
                _ => {
                    alias_map.insert(fragment, target);
                }
            }
        }

        Ok(Self {
            nodes,
            by_id,
            by_url_path,
            by_hierarchical_name,
            children,
            aliases: alias_map,
        })
    }

    /// idでカテゴリを取得
    pub fn get(&self, id: u32) -> Option<&CategoryNode> {
        self.by_id.get(&id).map(|&idx| &self.nodes[idx])
    }

    /// 全カテゴリ（宣言順）
    pub fn all(&self) -> &[CategoryNode] {
        &self.nodes
    }

    /// 直接の子（宣言順）。末端や未知のidでは空
    pub fn children(&self, id: u32) -> Vec<&CategoryNode> {
        self.children
            .get(&id)
            .map(|idxs| idxs.iter().map(|&idx| &self.nodes[idx]).collect())
            .unwrap_or_default()
    }

    pub fn has_children(&self, id: u32) -> bool {
        self.children.get(&id).is_some_and(|c| !c.is_empty())
    }

    /// レベル1カテゴリ
    pub fn roots(&self) -> impl Iterator<Item = &CategoryNode> {
        self.nodes.iter().filter(|n| n.is_root())
    }

    /// 子を持たないカテゴリ（単独のレベル1を含む）
    pub fn leaves(&self) -> impl Iterator<Item = &CategoryNode> {
        self.nodes.iter().filter(|n| !self.has_children(n.id))
    }

    pub fn parent(&self, node: &CategoryNode) -> Option<&CategoryNode> {
        node.parent_id.and_then(|id| self.get(id))
    }

    /// Exact match on canonical url path (aliases not consulted)
    pub fn by_url_path(&self, path: &str) -> Option<&CategoryNode> {
        self.by_url_path.get(path).map(|&idx| &self.nodes[idx])
    }

    /// Exact match on hierarchical name
    pub fn by_hierarchical_name(&self, name: &str) -> Option<&CategoryNode> {
        self.by_hierarchical_name
            .get(name)
            .map(|&idx| &self.nodes[idx])
    }

    /// First category in declaration order whose display name matches
    pub fn by_display_name(&self, name: &str) -> Option<&CategoryNode> {
        self.nodes.iter().find(|n| n.display_name == name)
    }

    /// Target id of a legacy route alias
    pub fn alias_target(&self, fragment: &str) -> Option<u32> {
        self.aliases.get(fragment).copied()
    }

    /// Route aliases sorted by fragment
    pub fn aliases(&self) -> BTreeMap<&str, u32> {
        self.aliases
            .iter()
            .map(|(fragment, &id)| (fragment.as_str(), id))
            .collect()
    }

    /// ルーティング可能な全文字列と解決先idの対応
    ///
    /// 正規のurl pathの上にエイリアスを重ね、resolverの優先順位と一致させる。
    pub fn url_mappings(&self) -> BTreeMap<String, u32> {
        let mut map: BTreeMap<String, u32> = self
            .nodes
            .iter()
            .map(|n| (n.url_path.clone(), n.id))
            .collect();
        for (fragment, &id) in &self.aliases {
            map.insert(fragment.clone(), id);
        }
        map
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn builtin_aliases() -> Vec<(String, u32)> {
    SPECIAL_ROUTE_ALIASES
        .iter()
        .map(|a| (a.fragment.to_string(), a.target))
        .collect()
}

fn check_shape(node: &CategoryNode) -> Result<(), TaxonomyError> {
    if node.name.trim().is_empty() || node.display_name.trim().is_empty() {
        return Err(TaxonomyError::EmptyName { id: node.id });
    }
    if node.url_path.trim().is_empty() {
        return Err(TaxonomyError::EmptyUrlPath { id: node.id });
    }
    if node.level == 0 || node.level > MAX_LEVEL {
        return Err(TaxonomyError::InvalidLevel {
            id: node.id,
            level: node.level,
        });
    }
    match (node.level, node.parent_id) {
        (1, Some(parent_id)) => Err(TaxonomyError::RootWithParent {
            id: node.id,
            parent_id,
        }),
        (level, None) if level > 1 => Err(TaxonomyError::MissingParentRef { id: node.id, level }),
        _ => Ok(()),
    }
}

/// ルートから `node` までのラベルを連結
///
/// レベル検証済みのため、親を辿るたびにレベルが1つ下がり必ずルートで止まる。
/// 親の循環は `LevelMismatch` として既に弾かれている。
fn hierarchical_name(
    node: &CategoryNode,
    nodes: &[CategoryNode],
    by_id: &HashMap<u32, usize>,
) -> Result<String, TaxonomyError> {
    let mut labels = vec![node.name.as_str()];
    let mut current = node;
    while let Some(parent_id) = current.parent_id {
        let idx = by_id.get(&parent_id).ok_or(TaxonomyError::UnknownParent {
            id: current.id,
            parent_id,
        })?;
        current = &nodes[*idx];
        labels.push(current.name.as_str());
    }
    labels.reverse();
    Ok(labels.join(HIERARCHY_SEPARATOR))
}
