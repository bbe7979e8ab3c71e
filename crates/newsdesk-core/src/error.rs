use std::path::PathBuf;
use thiserror::Error;

use crate::category::StoredCategory;

/// Structural defect in a taxonomy definition.
///
/// Detected once while building a [`crate::category::Taxonomy`]. A taxonomy
/// that fails validation is never handed to a resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxonomyError {
    #[error("Duplicate category id: {id}")]
    DuplicateId { id: u32 },

    #[error("Duplicate url path '{path}' on categories {first} and {second}")]
    DuplicateUrlPath { path: String, first: u32, second: u32 },

    #[error("Category {id} has invalid level {level} (expected 1..=3)")]
    InvalidLevel { id: u32, level: u8 },

    #[error("Category {id} is level 1 but declares parent {parent_id}")]
    RootWithParent { id: u32, parent_id: u32 },

    #[error("Category {id} is level {level} but has no parent")]
    MissingParentRef { id: u32, level: u8 },

    #[error("Category {id} references unknown parent {parent_id}")]
    UnknownParent { id: u32, parent_id: u32 },

    #[error("Category {id} (level {level}) has parent {parent_id} at level {parent_level}")]
    LevelMismatch {
        id: u32,
        level: u8,
        parent_id: u32,
        parent_level: u8,
    },

    #[error("Hierarchical name '{name}' is shared by categories {first} and {second}")]
    DuplicateHierarchicalName { name: String, first: u32, second: u32 },

    #[error("Category {id} has an empty name")]
    EmptyName { id: u32 },

    #[error("Category {id} has an empty url path")]
    EmptyUrlPath { id: u32 },

    #[error("Route alias '{fragment}' points at unknown category {target}")]
    UnknownAliasTarget { fragment: String, target: u32 },

    #[error("Route alias '{fragment}' maps to both {first} and {second}")]
    ConflictingAlias {
        fragment: String,
        first: u32,
        second: u32,
    },
}

/// A lookup that matched no category.
///
/// This is an expected outcome, not a failure: callers decide whether a miss
/// renders as "Uncategorized", falls back to a default id, or is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Category not found: {query}")]
pub struct NotFound {
    pub query: StoredCategory,
}

impl NotFound {
    pub fn new(query: StoredCategory) -> Self {
        Self { query }
    }
}

#[derive(Debug, Error)]
pub enum NewsdeskError {
    #[error("Invalid taxonomy: {0}")]
    Taxonomy(#[from] TaxonomyError),

    #[error(transparent)]
    CategoryNotFound(#[from] NotFound),

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid value '{value}' for {key}: {message}")]
    InvalidConfigValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to parse posts file {path}: {message}")]
    PostsParse { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NewsdeskError>;

impl NewsdeskError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CategoryNotFound(_) => 2,
            Self::Taxonomy(_) => 3,
            Self::ConfigKeyNotFound { .. } => 4,
            Self::InvalidConfigValue { .. } => 5,
            Self::ConfigParse { .. } | Self::PostsParse { .. } => 6,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = NotFound::new(StoredCategory::Path("does/not/exist".to_string()));
        assert_eq!(
            err.to_string(),
            "Category not found: path 'does/not/exist'"
        );
    }

    #[test]
    fn test_exit_codes() {
        let miss: NewsdeskError = NotFound::new(StoredCategory::Id(999)).into();
        assert_eq!(miss.exit_code(), 2);

        let defect: NewsdeskError = TaxonomyError::DuplicateId { id: 1 }.into();
        assert_eq!(defect.exit_code(), 3);

        let key = NewsdeskError::ConfigKeyNotFound {
            key: "nope".to_string(),
        };
        assert_eq!(key.exit_code(), 4);
    }

    #[test]
    fn test_level_mismatch_message() {
        let err = TaxonomyError::LevelMismatch {
            id: 211,
            level: 3,
            parent_id: 2,
            parent_level: 1,
        };
        assert_eq!(
            err.to_string(),
            "Category 211 (level 3) has parent 2 at level 1"
        );
    }
}
