//! Attribute descriptors: named accessors bound to a key path inside an item's payload
//!
//! An [`AttrDescriptor`] is declared once per attribute of an item type and shared by every
//! instance of that type. It never holds per-instance state; reads and writes go through the
//! owning item's payload.
//!
//! Options are collected with the `const` builder [`AttrOptions`] so that declarations made
//! with [`notion_item!`](crate::notion_item) are checked while compiling.

use error_stack::Report;
use serde_json::Value;

use crate::error::Error;
use crate::error::Result;
use crate::item::NotionItem;
use crate::json_path::JsonPathAccess;
use crate::json_path::values_equal;
use crate::key_path::KeyPath;

/// Transforms a raw stored value into the value exposed by the accessor
pub type GetConverter = fn(Value) -> Result<Value>;

/// Transforms an incoming value into its storable form
pub type SetConverter = fn(Value) -> Result<Value>;

const REASON_EDITABLE_AND_DERIVED: &str = "attribute cannot be editable and derived at the same time";
const REASON_SET_CONVERTER_NOT_EDITABLE: &str = "cannot use set_converter with non-editable attributes";
const REASON_EMPTY_KEY: &str = "key path must have at least one segment";

/// Declaration options for a single attribute
#[derive(Debug, Clone, Copy)]
pub struct AttrOptions {
    key:           Option<&'static [&'static str]>,
    editable:      bool,
    derived:       bool,
    clear_on_set:  bool,
    get_converter: Option<GetConverter>,
    set_converter: Option<SetConverter>,
}

impl Default for AttrOptions {
    fn default() -> Self { Self::new() }
}

impl AttrOptions {
    /// Read-only, non-derived attribute stored under its own name
    pub const fn new() -> Self {
        Self {
            key:           None,
            editable:      false,
            derived:       false,
            clear_on_set:  true,
            get_converter: None,
            set_converter: None,
        }
    }

    /// Store the attribute at an explicit key path instead of its name
    #[must_use]
    pub const fn key(mut self, key: &'static [&'static str]) -> Self {
        self.key = Some(key);
        self
    }

    /// Allow writes through the accessor
    #[must_use]
    pub const fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    /// Mark the value as computed by the remote system
    ///
    /// Derived attributes are removed from the payload whenever a sibling editable attribute
    /// changes.
    #[must_use]
    pub const fn derived(mut self) -> Self {
        self.derived = true;
        self
    }

    /// Keep derived attributes when this attribute is written
    #[must_use]
    pub const fn keep_derived(self) -> Self { self.clear_on_set(false) }

    /// Set whether a successful write clears derived attributes (default `true`)
    #[must_use]
    pub const fn clear_on_set(mut self, clear_on_set: bool) -> Self {
        self.clear_on_set = clear_on_set;
        self
    }

    /// Convert raw stored values on read
    #[must_use]
    pub const fn get_converter(mut self, converter: GetConverter) -> Self {
        self.get_converter = Some(converter);
        self
    }

    /// Convert incoming values on write (editable attributes only)
    #[must_use]
    pub const fn set_converter(mut self, converter: SetConverter) -> Self {
        self.set_converter = Some(converter);
        self
    }

    /// The rule these options violate, if any
    pub const fn violation(&self) -> Option<&'static str> {
        if self.editable && self.derived {
            return Some(REASON_EDITABLE_AND_DERIVED);
        }
        if !self.editable && self.set_converter.is_some() {
            return Some(REASON_SET_CONVERTER_NOT_EDITABLE);
        }
        if let Some(key) = self.key
            && key.is_empty()
        {
            return Some(REASON_EMPTY_KEY);
        }
        None
    }

    /// Validate in a `const` context
    ///
    /// Evaluated at compile time this rejects invalid options with a compilation error. Use
    /// [`AttrOptions::validate`] for options assembled at runtime.
    ///
    /// # Panics
    ///
    /// Panics when [`AttrOptions::violation`] reports a rule.
    pub const fn check(self) -> CheckedAttrOptions {
        assert!(
            self.violation().is_none(),
            "attribute options must not combine editable with derived, or set_converter without editable"
        );
        CheckedAttrOptions(self)
    }

    /// Validate options for the attribute `attr`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the violated rule.
    pub fn validate(self, attr: &str) -> Result<CheckedAttrOptions> {
        match self.violation() {
            Some(reason) => Err(Report::new(Error::InvalidConfiguration {
                attr: attr.to_string(),
                reason,
            })),
            None => Ok(CheckedAttrOptions(self)),
        }
    }
}

/// [`AttrOptions`] that passed validation
#[derive(Debug, Clone, Copy)]
pub struct CheckedAttrOptions(AttrOptions);

/// Result of writing an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The stored value already equalled the new value; nothing changed
    Unchanged,
    /// The value was stored (and derived attributes cleared if configured)
    Written,
}

/// Named accessor bound to a key path within an item's payload
#[derive(Debug, Clone)]
pub struct AttrDescriptor {
    name:          &'static str,
    key:           KeyPath,
    editable:      bool,
    derived:       bool,
    clear_on_set:  bool,
    get_converter: Option<GetConverter>,
    set_converter: Option<SetConverter>,
}

impl AttrDescriptor {
    /// Bind checked options to the attribute `name`
    ///
    /// Without an explicit key the attribute is stored under its own name.
    pub fn new(name: &'static str, options: CheckedAttrOptions) -> Self {
        let CheckedAttrOptions(options) = options;
        let key = options
            .key
            .map_or_else(|| KeyPath::single(name), KeyPath::from_static);
        Self {
            name,
            key,
            editable: options.editable,
            derived: options.derived,
            clear_on_set: options.clear_on_set,
            get_converter: options.get_converter,
            set_converter: options.set_converter,
        }
    }

    /// Validate `options` and bind them to the attribute `name`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when the options are inconsistent.
    pub fn try_new(name: &'static str, options: AttrOptions) -> Result<Self> {
        Ok(Self::new(name, options.validate(name)?))
    }

    /// Attribute name
    pub const fn name(&self) -> &'static str { self.name }

    /// Location of the value inside the payload
    pub const fn key(&self) -> &KeyPath { &self.key }

    /// Whether writes are permitted
    pub const fn is_editable(&self) -> bool { self.editable }

    /// Whether the value is computed by the remote system
    pub const fn is_derived(&self) -> bool { self.derived }

    /// Whether a successful write clears derived attributes
    pub const fn clears_on_set(&self) -> bool { self.clear_on_set }

    /// Apply the set converter, if any, to an incoming value
    ///
    /// # Errors
    ///
    /// Propagates the converter's error.
    pub fn convert_for_write(&self, value: Value) -> Result<Value> {
        match self.set_converter {
            Some(converter) => converter(value),
            None => Ok(value),
        }
    }

    /// Read the attribute from `item`, applying the get converter
    ///
    /// # Errors
    ///
    /// [`Error::NoData`] for an unbound item, [`Error::KeyNotFound`] when the value is
    /// absent, or the converter's error.
    pub fn get<I: NotionItem>(&self, item: &I) -> Result<Value> {
        let raw = item.data()?.get_at(&self.key)?.clone();
        match self.get_converter {
            Some(converter) => converter(raw),
            None => Ok(raw),
        }
    }

    /// Write `value` to the attribute of `item`
    ///
    /// Writing a value equal to the stored one is a no-op; numbers compare by value, so `12`
    /// equals `12.0`. Otherwise the value is stored and, with `clear_on_set`, every derived
    /// attribute of the item is removed.
    ///
    /// # Errors
    ///
    /// [`Error::NotEditable`] for read-only attributes, [`Error::NoData`] for an unbound item,
    /// or the set converter's error.
    pub fn set<I: NotionItem>(&self, item: &mut I, value: Value) -> Result<WriteOutcome> {
        if !self.editable {
            return Err(Report::new(Error::NotEditable {
                type_name: I::TYPE_NAME,
                attr:      self.name.to_string(),
            }));
        }

        let value = self.convert_for_write(value)?;
        let data = item.data_mut()?;
        if let Ok(current) = data.get_at(&self.key)
            && values_equal(current, &value)
        {
            tracing::trace!(type_name = I::TYPE_NAME, attr = self.name, "Value unchanged, skipping write");
            return Ok(WriteOutcome::Unchanged);
        }

        data.set_at(&self.key, value);
        if self.clear_on_set {
            // Derived values may conflict with the edit on the next update
            item.clear_derived_attrs()?;
        }
        Ok(WriteOutcome::Written)
    }
}
