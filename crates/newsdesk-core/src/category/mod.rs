//! # Category Module
//!
//! 記事カテゴリの3階層タクソノミーと、CMS内でカテゴリが取る各表現の相互変換を提供する。
//!
//! ## 表現
//!
//! - **id**: 不変の数値。現行の保存形式 (`321`)
//! - **url path**: ルーティング用セグメント (`artsentertainment/theatre/theatrereviews`)
//! - **hierarchical name**: ラベルの完全パス (`Arts and Entertainment > Theatre > Reviews`)
//! - **display name**: 末端ラベルのみ (`Reviews`)
//! - **breadcrumb**: ルートから末端までのノード列
//!
//! 古い記事行は文字列形式のいずれかを保持している。[`StoredCategory`] は値が
//! どの形式かをタグとして持ち、resolverはどの形式からでも同じノードに戻す。
//!
//! ## モジュール構成
//!
//! - `builtin`: 静的タクソノミーとレガシーURLエイリアス
//! - `taxonomy`: 定義を検証済みのルックアップテーブル
//! - `resolver`: 表現間の変換
//! - `picker`: グループ化されたセレクト用の行
//! - `legacy`: `"L1 > L2 > L3"` 形式のフラット文字列ヘルパー
//!
//! ## 使用例
//!
//! ```rust
//! use newsdesk_core::category::{CategoryResolver, StoredCategory, Taxonomy};
//!
//! let taxonomy = Taxonomy::builtin().expect("builtin taxonomy is valid");
//! let resolver = CategoryResolver::new(&taxonomy);
//!
//! // 古いブックマークから現行のidへ
//! let breadcrumb = resolver.resolve_by_url_path("localnews").unwrap();
//! assert_eq!(breadcrumb.id(), 11);
//! assert_eq!(breadcrumb.hierarchical_name(), "News > Local");
//!
//! // レガシーな記事の値をid形式へ変換
//! let legacy = StoredCategory::Hierarchical("Lifestyle > Food and Wine > Wine Match".into());
//! assert_eq!(resolver.normalize(&legacy), Ok(StoredCategory::Id(212)));
//!
//! // 見つからない場合はpanicではなく値で返る
//! assert!(resolver.resolve_by_url_path("does/not/exist").is_err());
//! ```

mod builtin;
pub mod legacy;
mod picker;
mod resolver;
mod taxonomy;

// Re-exports
pub use builtin::{
    BuiltinCategory, CategoryNode, RouteAlias, BUILTIN_CATEGORIES, HIERARCHY_SEPARATOR,
    MAX_LEVEL, SPECIAL_ROUTE_ALIASES, STANDALONE_CATEGORIES, URL_SEPARATOR,
};
pub use picker::{build_picker_options, PickerEntry};
pub use resolver::{
    Breadcrumb, CategoryResolver, NoopObserver, ResolveObserver, StorageFormat, StoredCategory,
    TracingObserver,
};
pub use taxonomy::Taxonomy;
