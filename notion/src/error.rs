use error_stack::Report;
use thiserror::Error;

use crate::key_path::KeyPath;

// Error message prefixes
const MSG_FAILED_TO_PREFIX: &str = "Failed to";
const MSG_INVALID_PREFIX: &str = "Invalid";

/// Result type for the `basic_notion` library
pub type Result<T> = std::result::Result<T, Report<Error>>;

/// Errors raised while reading, writing or building Notion item payloads
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The item was read or written before a payload was assigned
    #[error("Object {type_name} has no data")]
    NoData {
        /// Name of the item type
        type_name: &'static str,
    },

    /// A payload was assigned to an item that already has one
    #[error("Object {type_name} already has data")]
    AlreadyBound {
        /// Name of the item type
        type_name: &'static str,
    },

    /// A path traversal hit a missing key or a non-mapping intermediate value
    #[error("Key '{key}' not found while resolving {path}")]
    KeyNotFound {
        /// The segment that could not be resolved
        key:  String,
        /// The full path being resolved
        path: KeyPath,
    },

    /// A write was attempted on an attribute that is not editable
    #[error("Attribute {attr} of {type_name} is not editable")]
    NotEditable {
        /// Name of the item type
        type_name: &'static str,
        /// Name of the attribute
        attr:      String,
    },

    /// Attribute options violate the editable/derived/converter rules
    #[error("Invalid configuration for attribute {attr}: {reason}")]
    InvalidConfiguration {
        /// Name of the attribute
        attr:   String,
        /// The violated rule
        reason: &'static str,
    },

    /// A payload's discriminator does not match the wrapping type
    #[error("{type_name} expects {key} = '{expected}', found {found}")]
    DiscriminatorMismatch {
        /// Name of the item type
        type_name: &'static str,
        /// Discriminator key
        key:       &'static str,
        /// Expected discriminator value
        expected:  &'static str,
        /// Value found in the payload
        found:     String,
    },

    /// A name does not correspond to any declared (or editable) attribute
    #[error("Unknown attribute '{attr}' for {type_name}")]
    UnknownField {
        /// Name of the item type
        type_name: &'static str,
        /// The unknown name
        attr:      String,
    },

    /// A converter or typed (de)serialization failed
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// A key path was empty
    #[error("Invalid key path: {0}")]
    InvalidKeyPath(String),
}

impl Error {
    // Builder methods for common patterns

    /// Create a [`Error::KeyNotFound`] for `key` within `path`
    pub fn key_not_found(key: impl Into<String>, path: &KeyPath) -> Self {
        Self::KeyNotFound {
            key:  key.into(),
            path: path.clone(),
        }
    }

    /// Create a "Failed to convert X" error
    pub fn conversion_failed(what: &str, details: impl std::fmt::Display) -> Self {
        Self::Conversion(format!("{MSG_FAILED_TO_PREFIX} convert {what}: {details}"))
    }

    /// Create an "Invalid X" conversion error
    pub fn invalid_value(what: &str, details: impl std::fmt::Display) -> Self {
        Self::Conversion(format!("{MSG_INVALID_PREFIX} {what}: {details}"))
    }

    /// Create an [`Error::UnknownField`] for `attr` on `type_name`
    pub fn unknown_field(type_name: &'static str, attr: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name,
            attr: attr.into(),
        }
    }

    /// Returns `true` for [`Error::KeyNotFound`]
    ///
    /// Accessors surface this as "attribute not present" and callers commonly branch on it.
    pub const fn is_key_not_found(&self) -> bool { matches!(self, Self::KeyNotFound { .. }) }
}
