//! Databases and create-database payloads

use chrono::DateTime;
use chrono::Utc;
use serde_json::Map;
use serde_json::Value;

use super::parent::Parent;
use super::parent::ParentDatabase;
use super::parent::ParentPage;
use super::property::TextProperty;
use super::property_list::PropertyList;
use super::schema::Schema;
use crate::NotionItem;
use crate::convert;
use crate::error::Result;
use crate::item::ItemData;
use crate::json_path::JsonPathAccess;
use crate::notion_item;

/// Title segments are joined without a separator
const TITLE_SEPARATOR: &str = "";

notion_item! {
    /// Database object returned by the Notion API
    pub struct NotionDatabase {
        discriminator: ("object", "database"),
        attrs: {
            /// Database identifier
            id: String,
            /// Public URL of the database
            url: String,
            /// Creation time
            created_time: Option<DateTime<Utc>> = derived().get_converter(convert::date_from_value),
            /// Last edit time
            last_edited_time: Option<DateTime<Utc>> = derived().get_converter(convert::date_from_value),
            /// Cover file object
            cover: Option<Value>,
            /// Icon emoji or file object
            icon: Option<Value>,
            /// Raw title segments
            title_data: Vec<Value> = editable()
                .key(&["title"])
                .set_converter(convert::rich_text_from_value),
            /// Raw property schemas keyed by property name
            properties_data: Map<String, Value> = key(&["properties"]),
            /// Raw parent payload
            parent_data: Map<String, Value> = key(&["parent"]),
        }
    }
}

impl NotionDatabase {
    /// Title segments
    ///
    /// # Errors
    ///
    /// Fails when the title is missing or not a list of segments.
    pub fn title(&self) -> Result<PropertyList<TextProperty>> {
        PropertyList::from_value(self.raw_attr("title_data")?, TITLE_SEPARATOR)
    }

    /// The database's parent
    ///
    /// # Errors
    ///
    /// Fails when the parent is missing or of an unsupported kind.
    pub fn parent(&self) -> Result<Parent> { Parent::from_data(self.parent_data()?) }

    /// Column schemas, keyed by property name
    ///
    /// # Errors
    ///
    /// Fails when `properties` is missing or holds an unsupported kind.
    pub fn schema(&self) -> Result<Schema> { Schema::from_properties_data(&self.properties_data()?) }

    /// Parent payload placing new pages in this database
    ///
    /// # Errors
    ///
    /// Fails when the database has no `id`.
    pub fn as_parent(&self) -> Result<ParentDatabase> { Ok(ParentDatabase::new(self.id()?)) }

    /// Create-database payload: `{"title": ..., "parent": ..., "properties": ...}`
    ///
    /// `title` is simplified rich text: a string or a list of strings and segments.
    ///
    /// # Errors
    ///
    /// Fails when `title` is not rich text or `parent` is unbound.
    pub fn make_database_data(
        title: impl Into<Value>,
        parent: ParentPage,
        properties: &Schema,
    ) -> Result<Map<String, Value>> {
        let mut data = Map::new();
        data.insert_field("title", convert::rich_text_from_value(title.into())?);
        data.insert_field("parent", parent.into_data()?);
        data.insert_field("properties", properties.make_spec());
        tracing::debug!(properties = properties.len(), "Built database payload");
        Ok(data)
    }

    /// A bound database built from [`Self::make_database_data`]
    ///
    /// # Errors
    ///
    /// As [`Self::make_database_data`].
    pub fn make_database(title: impl Into<Value>, parent: ParentPage, properties: &Schema) -> Result<Self> {
        Ok(Self::from_item_data(ItemData::bound(Self::make_database_data(
            title, parent, properties,
        )?)))
    }
}
