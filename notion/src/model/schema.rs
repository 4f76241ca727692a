//! Property schemas of databases and page models
//!
//! A database lists its columns as `{"Name": {"id": "title", "type": "title", "title": {}}}`.
//! [`PropertySchema`] wraps one such entry and [`Schema`] an ordered set of them.

use serde_json::Map;
use serde_json::Value;

use super::property::CheckboxProperty;
use super::property::DateProperty;
use super::property::EmailProperty;
use super::property::NumberProperty;
use super::property::PageProperty;
use super::property::PhoneNumberProperty;
use super::property::PropertyKind;
use super::property::SelectProperty;
use super::property::TextProperty;
use super::property::TypedProperty;
use super::property::UrlProperty;
use super::property_list::MultiSelectProperty;
use super::property_list::RichTextProperty;
use super::property_list::TitleProperty;
use crate::NotionItem;
use crate::convert;
use crate::error::Result;
use crate::json_path::JsonPathAccess;

/// Declared type of one property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySchema {
    property_name: String,
    kind:          PropertyKind,
    data:          Map<String, Value>,
}

impl PropertySchema {
    /// Schema for a new property `property_name` of kind `kind`
    pub fn new(property_name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            property_name: property_name.into(),
            kind,
            data: Self::make_data(kind),
        }
    }

    /// Wrap a schema entry read from a database payload
    ///
    /// # Errors
    ///
    /// Fails when `type` is missing or names an unsupported kind.
    pub fn from_data(property_name: impl Into<String>, data: Map<String, Value>) -> Result<Self> {
        let property = PageProperty::from_data(data)?;
        let kind = property.kind()?;
        Ok(Self {
            property_name: property_name.into(),
            kind,
            data: property.into_data()?,
        })
    }

    /// Minimal schema payload for `kind`: `{"<kind>": {}}`
    pub fn make_data(kind: PropertyKind) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert_field(kind.to_string(), Map::new());
        data
    }

    /// Name of the property inside page payloads
    pub fn property_name(&self) -> &str { &self.property_name }

    /// Kind of the property
    pub const fn kind(&self) -> PropertyKind { self.kind }

    /// Property identifier, present on schemas read from a database
    pub fn id(&self) -> Option<&str> { self.data.get_field_str("id") }

    /// The raw schema payload
    pub const fn data(&self) -> &Map<String, Value> { &self.data }

    /// Create-database entry for this property, `{"<kind>": <configuration>}`
    ///
    /// Configuration read from a database (select options, number format) is kept.
    pub fn spec(&self) -> Map<String, Value> {
        let key = self.kind.to_string();
        let configuration = self
            .data
            .get_field(&key)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        let mut spec = Map::new();
        spec.insert_field(key, configuration);
        spec
    }

    /// Build a page property payload of this kind from a simplified value
    ///
    /// # Errors
    ///
    /// Propagates [`PropertyValue::make_from_value`](super::PropertyValue::make_from_value)
    /// errors of the matching property type.
    pub fn make_prop_from_value(&self, value: Value) -> Result<Map<String, Value>> {
        match self.kind {
            PropertyKind::Title => make_property::<TitleProperty>(value),
            PropertyKind::RichText => make_property::<RichTextProperty>(value),
            PropertyKind::Text => make_property::<TextProperty>(value),
            PropertyKind::Number => make_property::<NumberProperty>(value),
            PropertyKind::Checkbox => make_property::<CheckboxProperty>(value),
            PropertyKind::Select => make_property::<SelectProperty>(value),
            PropertyKind::MultiSelect => make_property::<MultiSelectProperty>(value),
            PropertyKind::Url => make_property::<UrlProperty>(value),
            PropertyKind::Email => make_property::<EmailProperty>(value),
            PropertyKind::PhoneNumber => make_property::<PhoneNumberProperty>(value),
            PropertyKind::Date => make_property::<DateProperty>(value),
        }
    }
}

fn make_property<P: TypedProperty>(value: Value) -> Result<Map<String, Value>> {
    P::make_from_value(value)?.into_data()
}

/// Ordered set of property schemas
///
/// Page models key entries by field name; schemas read from a database key them by property
/// name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema(Vec<(String, PropertySchema)>);

impl Schema {
    /// An empty schema
    pub const fn new() -> Self { Self(Vec::new()) }

    /// Add or replace the entry `key`
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, property: PropertySchema) -> Self {
        let key = key.into();
        match self.0.iter_mut().find(|(entry, _)| *entry == key) {
            Some((_, existing)) => *existing = property,
            None => self.0.push((key, property)),
        }
        self
    }

    /// Load the `properties` object of a database payload
    ///
    /// # Errors
    ///
    /// Fails when an entry is not an object or has an unsupported kind.
    pub fn from_properties_data(data: &Map<String, Value>) -> Result<Self> {
        let entries = data
            .iter()
            .map(|(name, value)| {
                let entry = convert::into_object("property schema", value.clone())?;
                Ok((name.clone(), PropertySchema::from_data(name.as_str(), entry)?))
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(properties = entries.len(), "Loaded property schema");
        Ok(Self(entries))
    }

    /// Entry `key`, if present
    pub fn get(&self, key: &str) -> Option<&PropertySchema> {
        self.0
            .iter()
            .find_map(|(entry, property)| (entry == key).then_some(property))
    }

    /// Whether `key` is present
    pub fn contains(&self, key: &str) -> bool { self.get(key).is_some() }

    /// Iterate `(key, schema)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertySchema)> {
        self.0
            .iter()
            .map(|(key, property)| (key.as_str(), property))
    }

    /// Number of entries
    pub const fn len(&self) -> usize { self.0.len() }

    /// Whether the schema has no entries
    pub const fn is_empty(&self) -> bool { self.0.is_empty() }

    /// The `properties` object of a create-database request, keyed by property name
    pub fn make_spec(&self) -> Map<String, Value> {
        self.0
            .iter()
            .map(|(_, property)| (property.property_name.clone(), Value::Object(property.spec())))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, reason = "test assertions")]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::Error;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn reading_list_schema() -> Schema {
        Schema::new()
            .with("name", PropertySchema::new("Name", PropertyKind::Title))
            .with("item_type", PropertySchema::new("Type", PropertyKind::Select))
            .with("authors", PropertySchema::new("Author", PropertyKind::MultiSelect))
    }

    #[test]
    fn test_make_spec() {
        let schema = reading_list_schema();
        assert_eq!(schema.len(), 3);
        assert!(schema.contains("item_type"));
        assert!(!schema.contains("Type"));
        assert_eq!(
            Value::Object(schema.make_spec()),
            json!({
                "Name": {"title": {}},
                "Type": {"select": {}},
                "Author": {"multi_select": {}},
            })
        );
    }

    #[test]
    fn test_with_replaces_existing_key() {
        let schema = reading_list_schema().with("name", PropertySchema::new("Title", PropertyKind::RichText));
        assert_eq!(schema.len(), 3);
        let name = schema.get("name").unwrap();
        assert_eq!(name.property_name(), "Title");
        assert_eq!(name.kind(), PropertyKind::RichText);
    }

    #[test]
    fn test_load_from_database_properties() {
        let schema = Schema::from_properties_data(&object(json!({
            "Name": {"id": "title", "name": "Name", "type": "title", "title": {}},
            "Type": {
                "id": "a%3Bc",
                "name": "Type",
                "type": "select",
                "select": {"options": [{"id": "o1", "name": "Book", "color": "red"}]},
            },
        })))
        .unwrap();

        let select = schema.get("Type").unwrap();
        assert_eq!(select.kind(), PropertyKind::Select);
        assert_eq!(select.id(), Some("a%3Bc"));
        assert_eq!(
            Value::Object(schema.make_spec()),
            json!({
                "Name": {"title": {}},
                "Type": {"select": {"options": [{"id": "o1", "name": "Book", "color": "red"}]}},
            })
        );
    }

    #[test]
    fn test_load_rejects_unsupported_kind() {
        let error = Schema::from_properties_data(&object(json!({
            "Total": {"id": "x", "type": "formula", "formula": {}},
        })))
        .unwrap_err();
        assert!(matches!(error.current_context(), Error::Conversion(_)));

        let error = Schema::from_properties_data(&object(json!({"Total": 3}))).unwrap_err();
        assert!(matches!(error.current_context(), Error::Conversion(_)));
    }

    #[test]
    fn test_make_prop_from_value_dispatches_on_kind() {
        let schema = reading_list_schema();
        let cases = [
            (
                "name",
                json!("Dune"),
                json!({"type": "title", "title": [{"type": "text", "text": {"content": "Dune"}}]}),
            ),
            (
                "item_type",
                json!("Book"),
                json!({"type": "select", "select": {"name": "Book"}}),
            ),
            (
                "authors",
                json!(["Frank Herbert"]),
                json!({"type": "multi_select", "multi_select": [{"name": "Frank Herbert"}]}),
            ),
        ];

        for (key, value, expected) in cases {
            let data = schema.get(key).unwrap().make_prop_from_value(value).unwrap();
            assert_eq!(Value::Object(data), expected, "Failed for: {key}");
        }

        let number = PropertySchema::new("Price", PropertyKind::Number);
        assert!(number.make_prop_from_value(json!([1, 2])).is_err());
    }
}
