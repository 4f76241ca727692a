//! Backing-object base shared by every Notion item type
//!
//! An item wraps at most one payload ([`ItemData`]). Types implement [`NotionItem`], usually
//! through [`notion_item!`](crate::notion_item), and get payload access, attribute reflection,
//! typed reads and writes, and payload building on top.

pub mod builder;

use error_stack::Report;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

pub use self::builder::ItemBuilder;
pub use self::builder::UnknownAttrPolicy;
use crate::attr::AttrDescriptor;
use crate::attr::WriteOutcome;
use crate::convert;
use crate::error::Error;
use crate::error::Result;
use crate::json_path::JsonPathAccess;
use crate::registry::AttrRegistry;

/// Placeholder reported when a payload carries no discriminator value
pub(crate) const MISSING_DISCRIMINATOR: &str = "<missing>";

/// Optional payload of an item
///
/// An item starts unbound and becomes bound once; there is no way back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemData(Option<Map<String, Value>>);

impl ItemData {
    /// No payload yet
    pub const fn unbound() -> Self { Self(None) }

    /// Wrap an existing payload
    pub const fn bound(data: Map<String, Value>) -> Self { Self(Some(data)) }

    /// Whether a payload is present
    pub const fn is_bound(&self) -> bool { self.0.is_some() }

    /// Assign the payload of an unbound item
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyBound`] when a payload is already present.
    pub fn bind(&mut self, type_name: &'static str, data: Map<String, Value>) -> Result<()> {
        if self.0.is_some() {
            return Err(Report::new(Error::AlreadyBound { type_name }));
        }
        self.0 = Some(data);
        Ok(())
    }

    /// The payload, if bound
    pub const fn get(&self) -> Option<&Map<String, Value>> { self.0.as_ref() }

    /// The payload for mutation, if bound
    pub const fn get_mut(&mut self) -> Option<&mut Map<String, Value>> { self.0.as_mut() }

    /// Take the payload out
    pub fn into_inner(self) -> Option<Map<String, Value>> { self.0 }
}

impl From<Map<String, Value>> for ItemData {
    fn from(data: Map<String, Value>) -> Self { Self::bound(data) }
}

/// Key and expected value tagging a payload's type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discriminator {
    /// Payload key holding the type tag
    pub key:   &'static str,
    /// Expected tag value
    pub value: &'static str,
}

impl Discriminator {
    /// Create a discriminator
    pub const fn new(key: &'static str, value: &'static str) -> Self { Self { key, value } }

    /// Check that `data` carries this discriminator
    ///
    /// # Errors
    ///
    /// Returns [`Error::DiscriminatorMismatch`] when the value differs or is absent.
    pub fn check(&self, type_name: &'static str, data: &Map<String, Value>) -> Result<()> {
        if data.get_field_str(self.key) == Some(self.value) {
            return Ok(());
        }

        let found = data
            .get_field(self.key)
            .map_or_else(|| MISSING_DISCRIMINATOR.to_string(), ToString::to_string);
        tracing::debug!(type_name, key = self.key, expected = self.value, %found, "Discriminator mismatch");
        Err(Report::new(Error::DiscriminatorMismatch {
            type_name,
            key: self.key,
            expected: self.value,
            found,
        }))
    }
}

/// A Notion object wrapping an optional JSON payload
pub trait NotionItem: Sized {
    /// Type name used in errors and logs
    const TYPE_NAME: &'static str;

    /// Discriminator every payload of this type must carry
    const DISCRIMINATOR: Option<Discriminator> = None;

    /// Builder behavior for names that are not editable attributes
    const UNKNOWN_ATTRS: UnknownAttrPolicy = UnknownAttrPolicy::Ignore;

    /// Attribute metadata of this type, including inherited attributes
    fn attr_registry() -> &'static AttrRegistry;

    /// The wrapped payload slot
    fn item_data(&self) -> &ItemData;

    /// The wrapped payload slot for mutation
    fn item_data_mut(&mut self) -> &mut ItemData;

    /// Wrap a payload slot without checks
    fn from_item_data(item_data: ItemData) -> Self;

    /// An item without payload
    fn unbound() -> Self { Self::from_item_data(ItemData::unbound()) }

    /// Wrap an existing payload, checking the discriminator
    ///
    /// # Errors
    ///
    /// Returns [`Error::DiscriminatorMismatch`] when the payload is tagged for another type.
    fn from_data(data: Map<String, Value>) -> Result<Self> {
        check_discriminator::<Self>(&data)?;
        Ok(Self::from_item_data(ItemData::bound(data)))
    }

    /// Wrap a JSON value, which must be an object
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] for non-object values, otherwise as [`Self::from_data`].
    fn from_value(value: Value) -> Result<Self> {
        Self::from_data(convert::into_object(Self::TYPE_NAME, value)?)
    }

    /// Assign the payload of an unbound item
    ///
    /// # Errors
    ///
    /// Returns [`Error::DiscriminatorMismatch`] or [`Error::AlreadyBound`].
    fn bind(&mut self, data: Map<String, Value>) -> Result<()> {
        check_discriminator::<Self>(&data)?;
        self.item_data_mut().bind(Self::TYPE_NAME, data)
    }

    /// Whether a payload is present
    fn is_bound(&self) -> bool { self.item_data().is_bound() }

    /// The payload
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] for an unbound item.
    fn data(&self) -> Result<&Map<String, Value>> {
        self.item_data().get().ok_or_else(|| {
            Report::new(Error::NoData {
                type_name: Self::TYPE_NAME,
            })
        })
    }

    /// The payload for mutation
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] for an unbound item.
    fn data_mut(&mut self) -> Result<&mut Map<String, Value>> {
        self.item_data_mut().get_mut().ok_or_else(|| {
            Report::new(Error::NoData {
                type_name: Self::TYPE_NAME,
            })
        })
    }

    /// Consume the item, returning its payload
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] for an unbound item.
    fn into_data(mut self) -> Result<Map<String, Value>> {
        std::mem::take(self.item_data_mut())
            .into_inner()
            .ok_or_else(|| {
                Report::new(Error::NoData {
                    type_name: Self::TYPE_NAME,
                })
            })
    }

    /// The payload as a JSON value
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] for an unbound item.
    fn to_value(&self) -> Result<Value> { Ok(Value::Object(self.data()?.clone())) }

    /// Descriptor of the attribute `name`
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] when the type declares no such attribute.
    fn attr(name: &str) -> Result<&'static AttrDescriptor> {
        Self::attr_registry()
            .descriptor(name)
            .ok_or_else(|| Report::new(Error::unknown_field(Self::TYPE_NAME, name)))
    }

    /// Read attribute `name` as JSON, after its get converter
    ///
    /// # Errors
    ///
    /// [`Error::UnknownField`], [`Error::NoData`], [`Error::KeyNotFound`] or a converter
    /// error.
    fn raw_attr(&self, name: &str) -> Result<Value> { Self::attr(name)?.get(self) }

    /// Read attribute `name` as `T`
    ///
    /// # Errors
    ///
    /// As [`Self::raw_attr`], plus [`Error::Conversion`] when the value does not
    /// deserialize into `T`.
    fn get_attr<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.raw_attr(name)?;
        serde_json::from_value(value)
            .map_err(|e| Report::new(Error::conversion_failed(&format!("attribute '{name}'"), e)))
    }

    /// Write attribute `name` from JSON
    ///
    /// # Errors
    ///
    /// [`Error::UnknownField`], [`Error::NotEditable`], [`Error::NoData`] or a converter
    /// error.
    fn set_raw_attr(&mut self, name: &str, value: Value) -> Result<WriteOutcome> {
        Self::attr(name)?.set(self, value)
    }

    /// Write attribute `name` from any serializable value
    ///
    /// # Errors
    ///
    /// As [`Self::set_raw_attr`], plus [`Error::Conversion`] when `value` does not serialize.
    fn set_attr<T: Serialize>(&mut self, name: &str, value: T) -> Result<WriteOutcome> {
        let value = serde_json::to_value(value)
            .map_err(|e| Report::new(Error::conversion_failed(&format!("attribute '{name}'"), e)))?;
        self.set_raw_attr(name, value)
    }

    /// Remove every derived attribute from the payload
    ///
    /// Attributes that are already absent are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] for an unbound item.
    fn clear_derived_attrs(&mut self) -> Result<()> {
        let registry = Self::attr_registry();
        let data = self.data_mut()?;
        let mut cleared = 0_usize;
        for (_, path) in registry.derived_keys().iter() {
            if data.delete_at(path).is_some() {
                cleared += 1;
            }
        }
        tracing::trace!(type_name = Self::TYPE_NAME, cleared, "Cleared derived attributes");
        Ok(())
    }

    /// Build a fresh payload from keyword values
    ///
    /// See [`builder::build_data`].
    ///
    /// # Errors
    ///
    /// [`Error::UnknownField`] under [`UnknownAttrPolicy::Reject`], or a set converter error.
    fn make_data(kwargs: &Map<String, Value>) -> Result<Map<String, Value>> {
        builder::build_data::<Self>(kwargs)
    }

    /// Build a bound item from keyword values
    ///
    /// # Errors
    ///
    /// As [`Self::make_data`].
    fn make(kwargs: &Map<String, Value>) -> Result<Self> {
        Ok(Self::from_item_data(ItemData::bound(Self::make_data(kwargs)?)))
    }

    /// Start a typed builder for this item
    fn builder() -> ItemBuilder<Self> { ItemBuilder::new() }
}

fn check_discriminator<I: NotionItem>(data: &Map<String, Value>) -> Result<()> {
    I::DISCRIMINATOR.map_or(Ok(()), |discriminator| discriminator.check(I::TYPE_NAME, data))
}
