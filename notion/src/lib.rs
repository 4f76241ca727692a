//! Typed attribute accessors over Notion API JSON objects
//!
//! Notion pages, properties and blocks travel as deeply nested JSON. This crate lets item
//! types declare named attributes bound to key paths inside that JSON, then read and write
//! them through typed accessors, rebuild outgoing payloads from simple keyword values, and
//! keep server-computed ("derived") values from going stale after a local edit.
//!
//! ```
//! use basic_notion::NotionItem;
//! use basic_notion::model::NumberProperty;
//! use serde_json::json;
//!
//! let mut price = NumberProperty::from_value(json!({
//!     "id": "%3AUPp",
//!     "type": "number",
//!     "number": 12.5,
//! }))?;
//! assert_eq!(price.number()?, Some(12.5));
//!
//! price.set_number(Some(15.0))?;
//! assert_eq!(price.to_value()?["number"], json!(15.0));
//! # Ok::<(), error_stack::Report<basic_notion::Error>>(())
//! ```
//!
//! New item types are declared with [`notion_item!`], page models with [`notion_page!`].

mod attr;
pub mod convert;
mod error;
pub mod item;
mod json_path;
mod key_path;
mod macros;
pub mod model;
mod registry;

pub use attr::AttrDescriptor;
pub use attr::AttrOptions;
pub use attr::CheckedAttrOptions;
pub use attr::GetConverter;
pub use attr::SetConverter;
pub use attr::WriteOutcome;
pub use error::Error;
pub use error::Result;
pub use item::Discriminator;
pub use item::ItemBuilder;
pub use item::ItemData;
pub use item::NotionItem;
pub use item::UnknownAttrPolicy;
pub use json_path::JsonPathAccess;
pub use json_path::values_equal;
pub use key_path::KeyPath;
pub use registry::AttrKeys;
pub use registry::AttrRegistry;
pub use registry::AttrRegistryBuilder;

/// Accessor traits of the bundled item types
pub mod prelude {
    pub use crate::NotionItem;
    pub use crate::model::ListProperty;
    pub use crate::model::NotionBlockAttrs;
    pub use crate::model::NotionPageAttrs;
    pub use crate::model::PageItem;
    pub use crate::model::PageModel;
    pub use crate::model::PagePropertyAttrs;
    pub use crate::model::PropertyValue;
    pub use crate::model::TypedBlock;
    pub use crate::model::TypedProperty;
}

#[doc(hidden)]
pub mod __private {
    pub use paste::paste;
    pub use serde_json::Value;
}
