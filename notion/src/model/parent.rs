//! Parents of pages

use std::str::FromStr;

use error_stack::Report;
use serde_json::Map;
use serde_json::Value;
use strum::AsRefStr;
use strum::Display;
use strum::EnumString;

use crate::NotionItem;
use crate::error::Error;
use crate::error::Result;
use crate::item::MISSING_DISCRIMINATOR;
use crate::json_path::JsonPathAccess;
use crate::notion_item;

/// Parent kinds, as found under the `type` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ParentKind {
    /// Another page
    PageId,
    /// A database
    DatabaseId,
}

notion_item! {
    /// Page nested under another page
    pub struct ParentPage {
        discriminator: ("type", "page_id"),
        attrs: {
            /// Identifier of the parent page
            page_id: String = editable(),
        }
    }
}

impl ParentPage {
    /// Parent payload for the page `page_id`
    pub fn new(page_id: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert_field("type", ParentKind::PageId.to_string());
        data.insert_field("page_id", page_id.into());
        Self::from_item_data(data.into())
    }
}

notion_item! {
    /// Page stored in a database
    pub struct ParentDatabase {
        discriminator: ("type", "database_id"),
        attrs: {
            /// Identifier of the parent database
            database_id: String = editable(),
        }
    }
}

impl ParentDatabase {
    /// Parent payload for the database `database_id`
    pub fn new(database_id: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert_field("type", ParentKind::DatabaseId.to_string());
        data.insert_field("database_id", database_id.into());
        Self::from_item_data(data.into())
    }
}

/// Parent of a page, dispatched on the payload's `type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parent {
    /// Nested under a page
    Page(ParentPage),
    /// Stored in a database
    Database(ParentDatabase),
}

impl Parent {
    /// Wrap a parent payload
    ///
    /// # Errors
    ///
    /// Returns [`Error::DiscriminatorMismatch`] for a missing or unsupported `type`.
    pub fn from_data(data: Map<String, Value>) -> Result<Self> {
        let kind = data.get_field_str("type").and_then(|name| ParentKind::from_str(name).ok());
        match kind {
            Some(ParentKind::PageId) => Ok(Self::Page(ParentPage::from_data(data)?)),
            Some(ParentKind::DatabaseId) => Ok(Self::Database(ParentDatabase::from_data(data)?)),
            None => {
                let found = data
                    .get_field("type")
                    .map_or_else(|| MISSING_DISCRIMINATOR.to_string(), ToString::to_string);
                Err(Report::new(Error::DiscriminatorMismatch {
                    type_name: "Parent",
                    key: "type",
                    expected: "page_id or database_id",
                    found,
                }))
            },
        }
    }

    /// Kind of parent
    pub const fn kind(&self) -> ParentKind {
        match self {
            Self::Page(_) => ParentKind::PageId,
            Self::Database(_) => ParentKind::DatabaseId,
        }
    }

    /// Identifier of the parent object
    ///
    /// # Errors
    ///
    /// Fails when the identifier is missing.
    pub fn id(&self) -> Result<String> {
        match self {
            Self::Page(page) => page.page_id(),
            Self::Database(database) => database.database_id(),
        }
    }

    /// The parent payload as a JSON value
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] for an unbound parent.
    pub fn to_value(&self) -> Result<Value> {
        match self {
            Self::Page(page) => page.to_value(),
            Self::Database(database) => database.to_value(),
        }
    }
}

impl From<ParentPage> for Parent {
    fn from(page: ParentPage) -> Self { Self::Page(page) }
}

impl From<ParentDatabase> for Parent {
    fn from(database: ParentDatabase) -> Self { Self::Database(database) }
}
