//! Pages, page models, page lists and create-page payloads

use chrono::DateTime;
use chrono::Utc;
use error_stack::Report;
use serde_json::Map;
use serde_json::Value;

use super::parent::Parent;
use super::property::PropertyValue;
use super::schema::PropertySchema;
use super::schema::Schema;
use crate::NotionItem;
use crate::attr::WriteOutcome;
use crate::convert;
use crate::error::Error;
use crate::error::Result;
use crate::item::ItemData;
use crate::json_path::JsonPathAccess;
use crate::json_path::values_equal;
use crate::key_path::KeyPath;
use crate::notion_item;

/// Payload key holding the property map
const PROPERTIES_KEY: &str = "properties";
/// Payload key holding the parent
const PARENT_KEY: &str = "parent";

notion_item! {
    /// Page object returned by the Notion API
    pub struct NotionPage {
        discriminator: ("object", "page"),
        attrs: {
            /// Page identifier
            id: String,
            /// Whether the page is archived
            archived: bool = editable(),
            /// Public URL of the page
            url: String,
            /// Creation time
            created_time: Option<DateTime<Utc>> = derived().get_converter(convert::date_from_value),
            /// Last edit time
            last_edited_time: Option<DateTime<Utc>> = derived().get_converter(convert::date_from_value),
            /// Cover file object
            cover: Option<Value>,
            /// Icon emoji or file object
            icon: Option<Value>,
            /// Raw property payloads keyed by property name
            properties_data: Map<String, Value> = key(&["properties"]),
            /// Raw parent payload
            parent_data: Map<String, Value> = key(&["parent"]),
        }
    }
}

/// Read and write access shared by [`NotionPage`] and page models
pub trait PageItem: NotionPageAttrs {
    /// The page's parent
    ///
    /// # Errors
    ///
    /// Fails when the parent is missing or of an unsupported kind.
    fn parent(&self) -> Result<Parent> { Parent::from_data(self.parent_data()?) }

    /// The property `name`, wrapped as `P`
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] when the page has no such property, or
    /// [`Error::DiscriminatorMismatch`](crate::Error::DiscriminatorMismatch) when it is of another kind.
    fn property<P: NotionItem>(&self, name: &str) -> Result<P> {
        let path = property_path(name);
        P::from_value(self.data()?.get_at(&path)?.clone())
    }

    /// Replace the property `name`
    ///
    /// Like attribute writes, an equal payload is left alone and a changed one clears the
    /// page's derived attributes. Numbers compare by value.
    ///
    /// # Errors
    ///
    /// Fails for an unbound page or property.
    fn set_property<P: NotionItem>(&mut self, name: &str, property: P) -> Result<WriteOutcome> {
        let path = property_path(name);
        let value = Value::Object(property.into_data()?);

        let data = self.data_mut()?;
        if data
            .get_at(&path)
            .is_ok_and(|current| values_equal(current, &value))
        {
            tracing::trace!(type_name = Self::TYPE_NAME, property = name, "Property unchanged, skipping write");
            return Ok(WriteOutcome::Unchanged);
        }

        data.set_at(&path, value);
        self.clear_derived_attrs()?;
        Ok(WriteOutcome::Written)
    }
}

impl PageItem for NotionPage {}

impl NotionPage {
    /// Start a create-page payload under `parent`
    pub fn make_page_data(parent: impl Into<Parent>) -> PageDataBuilder { PageDataBuilder::new(parent.into()) }
}

fn property_path(name: &str) -> KeyPath { KeyPath::single(name).prefixed(&KeyPath::single(PROPERTIES_KEY)) }

/// A page type with declared fields, usually generated by [`notion_page!`](crate::notion_page)
pub trait PageModel: PageItem {
    /// Schemas of the declared fields, keyed by field name
    fn schema() -> &'static Schema;

    /// Schema of the field `field`
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] when the model declares no such field.
    fn field_schema(field: &str) -> Result<&'static PropertySchema> {
        Self::schema()
            .get(field)
            .ok_or_else(|| Report::new(Error::unknown_field(Self::TYPE_NAME, field)))
    }

    /// Create-page payload under `parent` from simplified field values
    ///
    /// Each value is expanded by the property type declared for its field.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownField`] for an undeclared field, or the property type's conversion error.
    fn generate(parent: impl Into<Parent>, fields: &Map<String, Value>) -> Result<Map<String, Value>> {
        let mut builder = PageDataBuilder::new(parent.into());
        for (field, value) in fields {
            let schema = Self::field_schema(field)?;
            builder = builder.raw_property(schema.property_name(), schema.make_prop_from_value(value.clone())?);
        }
        tracing::debug!(type_name = Self::TYPE_NAME, fields = fields.len(), "Generated page payload");
        builder.build_data()
    }

    /// A bound page built by [`Self::generate`]
    ///
    /// # Errors
    ///
    /// As [`Self::generate`].
    fn make_page(parent: impl Into<Parent>, fields: &Map<String, Value>) -> Result<Self> {
        Ok(Self::from_item_data(ItemData::bound(Self::generate(parent, fields)?)))
    }
}

notion_item! {
    /// Page list returned by database queries
    pub struct NotionPageList {
        discriminator: ("object", "list"),
        attrs: {
            /// Raw page payloads
            results: Vec<Value>,
            /// Whether more pages follow
            has_more: bool,
            /// Cursor of the next batch, `None` on the last one
            next_cursor: Option<String>,
        }
    }
}

impl NotionPageList {
    /// The pages, wrapped as `P`
    ///
    /// # Errors
    ///
    /// Fails when `results` is missing or any entry is not a page.
    pub fn items<P: PageItem>(&self) -> Result<Vec<P>> {
        self.results()?.into_iter().map(P::from_value).collect()
    }
}

/// Builder for create-page request payloads
#[derive(Debug, Clone)]
pub struct PageDataBuilder {
    parent:     Parent,
    properties: Map<String, Value>,
}

impl PageDataBuilder {
    /// Start with no properties
    pub fn new(parent: Parent) -> Self {
        Self {
            parent,
            properties: Map::new(),
        }
    }

    /// Add the property `name` of kind `P` from a simplified value
    ///
    /// # Errors
    ///
    /// Propagates [`PropertyValue::make_from_value`] errors.
    pub fn property<P: PropertyValue>(mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let property = P::make_from_value(value.into())?;
        self.properties
            .insert(name.into(), Value::Object(property.into_data()?));
        Ok(self)
    }

    /// Add an already built property payload
    #[must_use]
    pub fn raw_property(mut self, name: impl Into<String>, data: Map<String, Value>) -> Self {
        self.properties.insert(name.into(), Value::Object(data));
        self
    }

    /// The request payload: `{"parent": ..., "properties": ...}`
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] for an unbound parent.
    pub fn build_data(self) -> Result<Map<String, Value>> {
        tracing::debug!(parent = %self.parent.kind(), properties = self.properties.len(), "Built page payload");
        let mut data = Map::new();
        data.insert_field(PARENT_KEY, self.parent.to_value()?);
        data.insert_field(PROPERTIES_KEY, self.properties);
        Ok(data)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, reason = "test assertions")]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::model::parent::ParentDatabase;
    use crate::model::parent::ParentKind;
    use crate::model::parent::ParentPage;
    use crate::model::property::NumberProperty;
    use crate::model::property::PropertyKind;
    use crate::model::property::SelectProperty;
    use crate::model::property_list::ListProperty;
    use crate::model::property_list::MultiSelectProperty;
    use crate::model::property_list::TitleProperty;

    fn page_payload() -> Value {
        json!({
            "object": "page",
            "id": "page-1",
            "created_time": "2021-05-01T12:00:00.000Z",
            "last_edited_time": "2021-05-02T08:30:00.000Z",
            "archived": false,
            "url": "https://www.notion.so/page-1",
            "cover": null,
            "icon": {"type": "emoji", "emoji": "📚"},
            "parent": {"type": "database_id", "database_id": "db-1"},
            "properties": {
                "Name": {
                    "id": "title",
                    "type": "title",
                    "title": [{"type": "text", "text": {"content": "Dune"}, "plain_text": "Dune"}],
                },
                "Price": {"id": "p%3D", "type": "number", "number": 9.5},
            },
        })
    }

    #[test]
    fn test_read_page() {
        let page = NotionPage::from_value(page_payload()).unwrap();
        assert_eq!(page.id().unwrap(), "page-1");
        assert!(!page.archived().unwrap());
        assert_eq!(page.cover().unwrap(), None);
        assert_eq!(
            page.created_time().unwrap(),
            Some(Utc.with_ymd_and_hms(2021, 5, 1, 12, 0, 0).unwrap())
        );

        let parent = page.parent().unwrap();
        assert_eq!(parent.kind(), ParentKind::DatabaseId);
        assert_eq!(parent.id().unwrap(), "db-1");

        let title = page.property::<TitleProperty>("Name").unwrap();
        assert_eq!(title.get_text().unwrap(), "Dune");
        assert_eq!(title.one_item().unwrap().content().unwrap(), "Dune");

        let price = page.property::<NumberProperty>("Price").unwrap();
        assert_eq!(price.number().unwrap(), Some(9.5));
    }

    #[test]
    fn test_property_errors() {
        let page = NotionPage::from_value(page_payload()).unwrap();

        let error = page.property::<NumberProperty>("Missing").unwrap_err();
        assert!(error.current_context().is_key_not_found());

        let error = page.property::<SelectProperty>("Price").unwrap_err();
        assert!(matches!(error.current_context(), Error::DiscriminatorMismatch { .. }));
    }

    #[test]
    fn test_set_property_clears_derived() {
        let mut page = NotionPage::from_value(page_payload()).unwrap();
        let mut price = page.property::<NumberProperty>("Price").unwrap();

        price.set_number(Some(9.5)).unwrap();
        assert_eq!(
            page.set_property("Price", price.clone()).unwrap(),
            WriteOutcome::Unchanged
        );
        assert!(page.last_edited_time().is_ok());

        price.set_number(Some(12.0)).unwrap();
        assert_eq!(page.set_property("Price", price).unwrap(), WriteOutcome::Written);
        assert_eq!(
            page.property::<NumberProperty>("Price").unwrap().number().unwrap(),
            Some(12.0)
        );
        assert!(page.last_edited_time().unwrap_err().current_context().is_key_not_found());
        assert!(page.created_time().unwrap_err().current_context().is_key_not_found());
    }

    #[test]
    fn test_archive_page() {
        let mut page = NotionPage::from_value(page_payload()).unwrap();
        page.set_archived(true).unwrap();
        assert!(page.archived().unwrap());
        assert!(page.created_time().is_err());
        assert!(page.set_url("https://example.com".to_string()).is_err());
    }

    #[test]
    fn test_make_page_data() {
        let data = NotionPage::make_page_data(ParentDatabase::new("db-1"))
            .property::<TitleProperty>("Name", "Dune")
            .unwrap()
            .property::<NumberProperty>("Price", 9.5)
            .unwrap()
            .property::<SelectProperty>("Genre", "Sci-fi")
            .unwrap()
            .build_data()
            .unwrap();

        assert_eq!(
            Value::Object(data),
            json!({
                "parent": {"type": "database_id", "database_id": "db-1"},
                "properties": {
                    "Name": {"type": "title", "title": [{"type": "text", "text": {"content": "Dune"}}]},
                    "Price": {"type": "number", "number": 9.5},
                    "Genre": {"type": "select", "select": {"name": "Sci-fi"}},
                },
            })
        );
    }

    #[test]
    fn test_make_page_data_raw_property() {
        let data = NotionPage::make_page_data(ParentPage::new("p-1"))
            .raw_property("Done", Map::new())
            .build_data()
            .unwrap();
        assert_eq!(
            Value::Object(data),
            json!({"parent": {"type": "page_id", "page_id": "p-1"}, "properties": {"Done": {}}})
        );
    }

    #[test]
    fn test_make_page_data_unbound_parent() {
        let error = NotionPage::make_page_data(ParentPage::unbound())
            .build_data()
            .unwrap_err();
        assert!(matches!(error.current_context(), Error::NoData { .. }));
    }

    #[test]
    fn test_set_property_integer_payload_rewritten_as_float() {
        let mut payload = page_payload();
        payload["properties"]["Count"] = json!({"id": "c", "type": "number", "number": 12});
        let mut page = NotionPage::from_value(payload).unwrap();

        let count = NumberProperty::from_value(json!({"id": "c", "type": "number", "number": 12.0})).unwrap();
        assert_eq!(page.set_property("Count", count).unwrap(), WriteOutcome::Unchanged);
        assert_eq!(page.data().unwrap()["properties"]["Count"]["number"], json!(12));
        assert!(page.last_edited_time().is_ok());

        let count = NumberProperty::from_value(json!({"id": "c", "type": "number", "number": 12.5})).unwrap();
        assert_eq!(page.set_property("Count", count).unwrap(), WriteOutcome::Written);
        assert!(page.last_edited_time().is_err());
    }

    crate::notion_page! {
        /// Entry of a reading list database
        struct ReadingListItem {
            /// Kind of entry
            item_type: SelectProperty = "Type",
            /// Entry title
            name: TitleProperty = "Name",
            /// Reading status
            status: SelectProperty = "Status",
            /// Authors of the entry
            authors: MultiSelectProperty = "Author",
        }
    }

    fn reading_list_payload() -> Value {
        json!({
            "object": "page",
            "id": "page-2",
            "created_time": "2021-06-01T09:00:00.000Z",
            "last_edited_time": "2021-06-01T09:00:00.000Z",
            "archived": false,
            "url": "https://www.notion.so/page-2",
            "parent": {"type": "database_id", "database_id": "db-1"},
            "properties": {
                "Type": {"id": "t", "type": "select", "select": {"id": "o1", "name": "Book", "color": "red"}},
                "Name": {"id": "title", "type": "title", "title": [{"type": "text", "text": {"content": "Dune"}}]},
                "Status": {"id": "s", "type": "select", "select": {"id": "o2", "name": "Reading", "color": "blue"}},
                "Author": {
                    "id": "a",
                    "type": "multi_select",
                    "multi_select": [{"id": "o3", "name": "Frank Herbert", "color": "gray"}],
                },
            },
        })
    }

    #[test]
    fn test_page_model_schema() {
        let schema = ReadingListItem::schema();
        assert_eq!(schema.len(), 4);
        assert_eq!(
            Value::Object(schema.make_spec()),
            json!({
                "Type": {"select": {}},
                "Name": {"title": {}},
                "Status": {"select": {}},
                "Author": {"multi_select": {}},
            })
        );

        let authors = ReadingListItem::authors_schema().unwrap();
        assert_eq!(authors.property_name(), "Author");
        assert_eq!(authors.kind(), PropertyKind::MultiSelect);

        let error = ReadingListItem::field_schema("Author").unwrap_err();
        assert!(matches!(error.current_context(), Error::UnknownField { .. }));
    }

    #[test]
    fn test_page_model_reads_fields() {
        let item = ReadingListItem::from_value(reading_list_payload()).unwrap();
        assert_eq!(item.id().unwrap(), "page-2");
        assert_eq!(item.parent().unwrap().id().unwrap(), "db-1");
        assert_eq!(item.item_type().unwrap().name().unwrap(), "Book");
        assert_eq!(item.item_type().unwrap().option_id().unwrap(), "o1");
        assert_eq!(item.name().unwrap().get_text().unwrap(), "Dune");
        assert_eq!(item.authors().unwrap().get_text().unwrap(), "Frank Herbert");

        let error = ReadingListItem::from_value(json!({"object": "database"})).unwrap_err();
        assert!(matches!(error.current_context(), Error::DiscriminatorMismatch { .. }));
    }

    #[test]
    fn test_page_model_generate() {
        let fields = json!({"name": ["Dune"], "item_type": "Book", "authors": ["Frank Herbert", "Brian Herbert"]});
        let data = ReadingListItem::generate(ParentDatabase::new("db-1"), fields.as_object().unwrap()).unwrap();
        assert_eq!(
            Value::Object(data),
            json!({
                "parent": {"type": "database_id", "database_id": "db-1"},
                "properties": {
                    "Name": {"type": "title", "title": [{"type": "text", "text": {"content": "Dune"}}]},
                    "Type": {"type": "select", "select": {"name": "Book"}},
                    "Author": {
                        "type": "multi_select",
                        "multi_select": [{"name": "Frank Herbert"}, {"name": "Brian Herbert"}],
                    },
                },
            })
        );

        let fields = json!({"Name": "Dune"});
        let error = ReadingListItem::generate(ParentDatabase::new("db-1"), fields.as_object().unwrap()).unwrap_err();
        assert_eq!(
            error.current_context(),
            &Error::UnknownField {
                type_name: "ReadingListItem",
                attr:      "Name".to_string(),
            }
        );
    }

    #[test]
    fn test_page_model_setter_clears_derived() {
        let mut item = ReadingListItem::from_value(reading_list_payload()).unwrap();

        assert_eq!(item.set_status(json!({"id": "s", "name": "Reading"})).unwrap(), WriteOutcome::Written);
        assert!(item.created_time().is_err());

        item.set_status("Done").unwrap();
        let status = item.status().unwrap();
        assert_eq!(status.name().unwrap(), "Done");
        assert!(status.option_id().unwrap_err().current_context().is_key_not_found());
    }

    #[test]
    fn test_page_list_items() {
        let list = NotionPageList::from_value(json!({
            "object": "list",
            "results": [reading_list_payload(), reading_list_payload()],
            "has_more": true,
            "next_cursor": "cursor-2",
        }))
        .unwrap();

        assert!(list.has_more().unwrap());
        assert_eq!(list.next_cursor().unwrap().as_deref(), Some("cursor-2"));

        let items = list.items::<ReadingListItem>().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name().unwrap().get_text().unwrap(), "Dune");

        let pages = list.items::<NotionPage>().unwrap();
        assert_eq!(pages[1].id().unwrap(), "page-2");
    }

    #[test]
    fn test_page_list_rejects_non_page_results() {
        let list = NotionPageList::from_value(json!({
            "object": "list",
            "results": [{"object": "database", "id": "db-1"}],
            "has_more": false,
            "next_cursor": null,
        }))
        .unwrap();

        assert_eq!(list.next_cursor().unwrap(), None);
        let error = list.items::<NotionPage>().unwrap_err();
        assert!(matches!(error.current_context(), Error::DiscriminatorMismatch { .. }));
    }
}
