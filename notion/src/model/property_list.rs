//! Properties holding a list of items: titles, rich text and multi-select options

use std::marker::PhantomData;

use error_stack::Report;
use itertools::Itertools;
use serde_json::Map;
use serde_json::Value;

use super::property::MultiSelectItem;
use super::property::PageProperty;
use super::property::PagePropertyAttrs;
use super::property::PropertyKind;
use super::property::PropertyValue;
use super::property::TextProperty;
use super::property::TypedProperty;
use crate::NotionItem;
use crate::convert;
use crate::error::Error;
use crate::error::Result;
use crate::item::ItemData;
use crate::json_path::JsonPathAccess;
use crate::key_path::KeyPath;
use crate::notion_item;

/// Separator used when joining item texts, unless the property overrides it
pub const DEFAULT_TEXT_SEPARATOR: &str = ",";

/// Item payloads of a list property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyList<P> {
    items:          Vec<Map<String, Value>>,
    text_separator: &'static str,
    item:           PhantomData<P>,
}

impl<P: PropertyValue> PropertyList<P> {
    /// Wrap item payloads
    pub const fn new(items: Vec<Map<String, Value>>, text_separator: &'static str) -> Self {
        Self {
            items,
            text_separator,
            item: PhantomData,
        }
    }

    /// Wrap a JSON array of item payloads
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] when `value` is not an array of objects.
    pub fn from_value(value: Value, text_separator: &'static str) -> Result<Self> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(Report::new(Error::invalid_value("property list", other))),
        };
        let items = items
            .into_iter()
            .map(|item| convert::into_object("property list item", item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(items, text_separator))
    }

    /// Build items from simplified values
    ///
    /// A list yields one item per element; any other value yields a single item.
    ///
    /// # Errors
    ///
    /// Propagates the item type's [`PropertyValue::make_from_value`] errors.
    pub fn make_from_value(value: Value, text_separator: &'static str) -> Result<Self> {
        let values = match value {
            Value::Array(values) => values,
            single => vec![single],
        };
        let items = values
            .into_iter()
            .map(|value| P::make_from_value(value)?.into_data())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(items, text_separator))
    }

    /// Number of items
    pub const fn len(&self) -> usize { self.items.len() }

    /// Whether the list has no items
    pub const fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Item at `index`, or `None` past the end
    ///
    /// # Errors
    ///
    /// Fails when the payload at `index` does not match the item type.
    pub fn get(&self, index: usize) -> Result<Option<P>> {
        self.items
            .get(index)
            .map(|item| P::from_data(item.clone()))
            .transpose()
    }

    /// Iterate the items
    pub fn iter(&self) -> impl Iterator<Item = Result<P>> + '_ {
        self.items.iter().map(|item| P::from_data(item.clone()))
    }

    /// Item texts joined with the list's separator
    ///
    /// # Errors
    ///
    /// Fails when any item cannot be rendered.
    pub fn get_text(&self) -> Result<String> {
        let texts = self
            .iter()
            .map(|item| item?.get_text())
            .collect::<Result<Vec<_>>>()?;
        Ok(texts.iter().join(self.text_separator))
    }

    /// The item payloads as a JSON array
    pub fn into_value(self) -> Value { Value::Array(self.items.into_iter().map(Value::Object).collect()) }
}

/// A property whose content is a list of item payloads
pub trait ListProperty: NotionItem {
    /// Type of the items
    type Item: PropertyValue;

    /// Payload key holding the items, equal to the property kind
    const LIST_KEY: &'static str;

    /// Separator used by [`PropertyList::get_text`]
    const TEXT_SEPARATOR: &'static str = DEFAULT_TEXT_SEPARATOR;

    /// The items
    ///
    /// # Errors
    ///
    /// Fails for an unbound item or a missing or malformed list.
    fn items(&self) -> Result<PropertyList<Self::Item>> {
        let value = self.data()?.get_at(&KeyPath::single(Self::LIST_KEY))?;
        PropertyList::from_value(value.clone(), Self::TEXT_SEPARATOR)
    }

    /// The only item
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] unless the list has exactly one item.
    fn one_item(&self) -> Result<Self::Item> {
        let items = self.items()?;
        match (items.len(), items.get(0)?) {
            (1, Some(item)) => Ok(item),
            (len, _) => Err(Report::new(Error::invalid_value(
                &format!("{} item count", Self::TYPE_NAME),
                format!("expected exactly one item, found {len}"),
            ))),
        }
    }
}

fn make_list_property<L: ListProperty>(value: Value) -> Result<L> {
    let items = PropertyList::<L::Item>::make_from_value(value, L::TEXT_SEPARATOR)?;

    let mut data = Map::new();
    if let Some(discriminator) = L::DISCRIMINATOR {
        data.insert_field(discriminator.key, discriminator.value);
    }
    data.insert_field(L::LIST_KEY, items.into_value());
    Ok(L::from_item_data(ItemData::bound(data)))
}

/// Declares a list property type over `PageProperty`
macro_rules! list_property {
    ($(#[$meta:meta])* $name:ident, $variant:ident, $kind:literal, $item:ty, $separator:expr) => {
        notion_item! {
            $(#[$meta])*
            pub struct $name {
                discriminator: ("type", $kind),
                extends: [PageProperty],
                attrs: {
                    /// Raw item payloads
                    items_data: Vec<Value> = editable().key(&[$kind]),
                }
            }
        }

        impl ListProperty for $name {
            type Item = $item;

            const LIST_KEY: &'static str = $kind;
            const TEXT_SEPARATOR: &'static str = $separator;
        }

        impl TypedProperty for $name {
            const KIND: PropertyKind = PropertyKind::$variant;
        }

        impl PropertyValue for $name {
            fn get_text(&self) -> Result<String> { self.items()?.get_text() }

            fn make_from_value(value: Value) -> Result<Self> { make_list_property(value) }
        }
    };
}

list_property!(
    /// Page title, a list of rich-text segments
    TitleProperty,
    Title,
    "title",
    TextProperty,
    ""
);

list_property!(
    /// Rich-text property, a list of rich-text segments
    RichTextProperty,
    RichText,
    "rich_text",
    TextProperty,
    ""
);

list_property!(
    /// Multi-select property, a list of options
    MultiSelectProperty,
    MultiSelect,
    "multi_select",
    MultiSelectItem,
    DEFAULT_TEXT_SEPARATOR
);
