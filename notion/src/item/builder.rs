//! Building fresh payloads from keyword values
//!
//! Only editable attributes can be supplied. Values pass through the attribute's set
//! converter and are written at its key path; the discriminator is seeded first.

use std::marker::PhantomData;

use error_stack::Report;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use strum::Display;

use super::ItemData;
use super::NotionItem;
use crate::error::Error;
use crate::error::Result;
use crate::json_path::JsonPathAccess;

/// What the builder does with names that are not editable attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "snake_case")]
pub enum UnknownAttrPolicy {
    /// Skip them silently
    #[default]
    Ignore,
    /// Fail with [`Error::UnknownField`]
    Reject,
}

/// Build the payload of `I` from keyword values
///
/// Editable attributes present in `kwargs` are written in registry order, after the
/// discriminator. Unset attributes are absent from the result, not `null`.
///
/// # Errors
///
/// [`Error::UnknownField`] for a name that is not an editable attribute when `I` rejects
/// unknown names, or the error of a set converter.
pub fn build_data<I: NotionItem>(kwargs: &Map<String, Value>) -> Result<Map<String, Value>> {
    let registry = I::attr_registry();

    if I::UNKNOWN_ATTRS == UnknownAttrPolicy::Reject
        && let Some(unknown) = kwargs
            .keys()
            .find(|name| !registry.editable_keys().contains(name))
    {
        return Err(Report::new(Error::unknown_field(I::TYPE_NAME, unknown.as_str())));
    }

    let mut data = Map::new();
    if let Some(discriminator) = I::DISCRIMINATOR {
        data.insert_field(discriminator.key, discriminator.value);
    }

    for descriptor in registry.editable_descriptors() {
        let Some(value) = kwargs.get(descriptor.name()) else {
            continue;
        };
        let value = descriptor.convert_for_write(value.clone())?;
        data.set_at(descriptor.key(), value);
    }

    tracing::debug!(
        type_name = I::TYPE_NAME,
        policy = %I::UNKNOWN_ATTRS,
        keys = data.len(),
        "Built item payload"
    );
    Ok(data)
}

/// Typed keyword collector for [`build_data`]
#[derive(Debug, Clone)]
pub struct ItemBuilder<I> {
    kwargs: Map<String, Value>,
    item:   PhantomData<I>,
}

impl<I: NotionItem> Default for ItemBuilder<I> {
    fn default() -> Self { Self::new() }
}

impl<I: NotionItem> ItemBuilder<I> {
    /// Start with no keyword values
    pub fn new() -> Self {
        Self {
            kwargs: Map::new(),
            item:   PhantomData,
        }
    }

    /// Add a keyword value
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }

    /// Add any serializable keyword value
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] when `value` does not serialize.
    pub fn with_serialized<T: Serialize>(mut self, name: &str, value: &T) -> Result<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| Report::new(Error::conversion_failed(&format!("keyword '{name}'"), e)))?;
        self.kwargs.insert(name.to_string(), value);
        Ok(self)
    }

    /// The collected keyword values
    pub const fn kwargs(&self) -> &Map<String, Value> { &self.kwargs }

    /// Build the payload
    ///
    /// # Errors
    ///
    /// As [`build_data`].
    pub fn build_data(&self) -> Result<Map<String, Value>> { build_data::<I>(&self.kwargs) }

    /// Build a bound item
    ///
    /// # Errors
    ///
    /// As [`build_data`].
    pub fn build(&self) -> Result<I> { Ok(I::from_item_data(ItemData::bound(self.build_data()?))) }
}
