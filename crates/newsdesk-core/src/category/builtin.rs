//! Builtin Category Definitions
//!
//! コード内で定義される3階層のカテゴリ。
//! idとurl pathは保存済みの記事や外部リンクから参照されるため、追記のみ可。
//! 番号の振り直しやパスの変更はしない。

use serde::{Deserialize, Serialize};

/// hierarchical nameの区切り ("News > Local")
pub const HIERARCHY_SEPARATOR: &str = " > ";

/// url pathのセグメント区切り
pub const URL_SEPARATOR: char = '/';

/// ノードが取りうる最深レベル
pub const MAX_LEVEL: u8 = 3;

/// ビルトインカテゴリ定義（宣言順）
///
/// レベル1を先に並べ、その後に各レベルの子を親ごとにまとめて並べる。
pub const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    // Level 1
    BuiltinCategory::root(1, "News", "news"),
    BuiltinCategory::root(2, "Lifestyle", "lifestyle"),
    BuiltinCategory::root(3, "Arts and Entertainment", "artsentertainment"),
    BuiltinCategory::root(4, "Opinion", "opinion"),
    // News
    BuiltinCategory::child(11, "Local", 1, 2, "news/localnews"),
    BuiltinCategory::child(12, "National", 1, 2, "news/nationalnews"),
    BuiltinCategory::child(13, "World", 1, 2, "news/world"),
    BuiltinCategory::child(14, "Features", 1, 2, "news/features"),
    BuiltinCategory::child(15, "Environment", 1, 2, "news/environment"),
    BuiltinCategory::child(16, "Media", 1, 2, "news/media"),
    // Lifestyle
    BuiltinCategory::child(21, "Food and Wine", 2, 2, "lifestyle/food-and-wine"),
    BuiltinCategory::child(22, "Sport", 2, 2, "lifestyle/sport"),
    BuiltinCategory::child(23, "Travel", 2, 2, "lifestyle/travel"),
    // Arts and Entertainment
    BuiltinCategory::child(31, "Games", 3, 2, "artsentertainment/games"),
    BuiltinCategory::child(32, "Theatre", 3, 2, "artsentertainment/theatre"),
    BuiltinCategory::child(33, "Film", 3, 2, "artsentertainment/film"),
    BuiltinCategory::child(34, "Music", 3, 2, "artsentertainment/music"),
    BuiltinCategory::child(35, "Galleries", 3, 2, "artsentertainment/galleries"),
    BuiltinCategory::child(36, "Books", 3, 2, "artsentertainment/books"),
    BuiltinCategory::child(
        37,
        "Drawn and Quartered",
        3,
        2,
        "artsentertainment/drawn-and-quartered",
    ),
    // Food and Wine
    BuiltinCategory::child(
        211,
        "Restaurant Reviews",
        21,
        3,
        "lifestyle/food-and-wine/restaurant-reviews",
    ),
    BuiltinCategory::child(212, "Wine Match", 21, 3, "lifestyle/food-and-wine/wine-match"),
    // Theatre
    BuiltinCategory::child(
        321,
        "Reviews",
        32,
        3,
        "artsentertainment/theatre/theatrereviews",
    ),
    // Galleries
    BuiltinCategory::child(
        351,
        "Exhibitions",
        35,
        3,
        "artsentertainment/galleries/exhibitions",
    ),
    BuiltinCategory::child(
        352,
        "Eye On The Street",
        35,
        3,
        "artsentertainment/galleries/eye-on-the-street",
    ),
];

/// 古い外部リンクのために残しているレガシーURL
///
/// 正規のurl pathより先に参照される。リンク生成には使わない。
pub const SPECIAL_ROUTE_ALIASES: &[RouteAlias] = &[
    RouteAlias::new("localnews", 11),
    RouteAlias::new("news/localnews", 11),
    RouteAlias::new("news/local", 11),
    RouteAlias::new("opinion", 4),
    RouteAlias::new("arts/theatre/reviews", 321),
    RouteAlias::new("artsentertainment/theatre/theatrereviews", 321),
];

/// 子を持たず、編集者が直接選択するレベル1カテゴリ
pub const STANDALONE_CATEGORIES: &[&str] = &["Opinion"];

/// ビルトインカテゴリ定義
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinCategory {
    /// 全レベルで一意な不変id
    pub id: u32,
    /// このノード単体のラベル
    pub name: &'static str,
    /// ピッカーに表示するラベル（ビルトインでは `name` と同じ）
    pub display_name: &'static str,
    /// 親ノード。レベル1のときのみ `None`
    pub parent_id: Option<u32>,
    /// 1, 2 or 3
    pub level: u8,
    /// スラッシュ区切りのルーティングパス
    pub url_path: &'static str,
}

impl BuiltinCategory {
    const fn root(id: u32, name: &'static str, url_path: &'static str) -> Self {
        Self {
            id,
            name,
            display_name: name,
            parent_id: None,
            level: 1,
            url_path,
        }
    }

    const fn child(
        id: u32,
        name: &'static str,
        parent_id: u32,
        level: u8,
        url_path: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            display_name: name,
            parent_id: Some(parent_id),
            level,
            url_path,
        }
    }
}

/// ノードidを直接指すレガシーURL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteAlias {
    pub fragment: &'static str,
    pub target: u32,
}

impl RouteAlias {
    pub const fn new(fragment: &'static str, target: u32) -> Self {
        Self { fragment, target }
    }
}

/// カテゴリノード（ランタイム用）
///
/// [`BuiltinCategory`] からtaxonomyが構築し、検証後に親の連鎖から
/// `hierarchical_name` を埋める。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub id: u32,
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u32>,
    pub level: u8,
    pub url_path: String,
    pub hierarchical_name: String,
}

impl CategoryNode {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl From<&BuiltinCategory> for CategoryNode {
    fn from(builtin: &BuiltinCategory) -> Self {
        Self {
            id: builtin.id,
            name: builtin.name.to_string(),
            display_name: builtin.display_name.to_string(),
            parent_id: builtin.parent_id,
            level: builtin.level,
            url_path: builtin.url_path.to_string(),
            // Filled in by the taxonomy after the parent chain is known
            hierarchical_name: builtin.name.to_string(),
        }
    }
}
