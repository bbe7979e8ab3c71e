pub mod category;
pub mod config;
pub mod error;
pub mod post;

pub use config::{Config, DisplayConfig, RoutingConfig, StorageConfig, DEFAULT_FALLBACK_LABEL};
pub use error::{NewsdeskError, NotFound, Result, TaxonomyError};
pub use post::{
    display_label, migrate_posts, resolve_post, upgrade_post, upgrade_post_json, MigrationReport,
    PostCategoryFields, UnresolvedPost, UpgradeOutcome,
};

// Category system
pub use category::{
    build_picker_options, Breadcrumb, BuiltinCategory, CategoryNode, CategoryResolver,
    NoopObserver, PickerEntry, ResolveObserver, RouteAlias, StorageFormat, StoredCategory,
    Taxonomy, TracingObserver, BUILTIN_CATEGORIES, SPECIAL_ROUTE_ALIASES, STANDALONE_CATEGORIES,
};
