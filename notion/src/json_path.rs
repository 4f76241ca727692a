//! Extension trait for key-path access into JSON objects
//!
//! This module provides the structural operations the attribute layer is built on:
//! - Reading a value at a [`KeyPath`]
//! - Writing a value at a [`KeyPath`], creating intermediate objects as needed
//! - Removing a value at a [`KeyPath`] without touching missing intermediates
//! - Type-safe single-field access using any type that implements `AsRef<str>`
//! - Comparing values the way the Notion API means them, with `12` equal to `12.0`

use std::cmp::Ordering;

use error_stack::Report;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;

use crate::error::Error;
use crate::error::Result;
use crate::key_path::KeyPath;

/// Extension trait for path-based JSON object access
pub trait JsonPathAccess {
    /// Get the value at `path`
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] when a segment is missing or an intermediate value is
    /// not an object.
    fn get_at(&self, path: &KeyPath) -> Result<&Value>;

    /// Set the value at `path`, overwriting any prior value
    ///
    /// Missing intermediate objects are created. A non-object intermediate value is replaced
    /// by an empty object; callers must not rely on that.
    fn set_at(&mut self, path: &KeyPath, value: Value);

    /// Remove the value at `path`, returning it if it was present
    ///
    /// A missing (or non-object) intermediate means the path is already absent: nothing is
    /// created and `None` is returned.
    fn delete_at(&mut self, path: &KeyPath) -> Option<Value>;

    /// Get field value using any type that can be a string reference
    fn get_field<T: AsRef<str>>(&self, field: T) -> Option<&Value>;

    /// Get field value as string
    fn get_field_str<T: AsRef<str>>(&self, field: T) -> Option<&str> {
        self.get_field(field).and_then(Value::as_str)
    }

    /// Insert field with value using any type that converts to String and any value that can
    /// become JSON
    fn insert_field<F, V>(&mut self, field: F, value: V)
    where
        F: Into<String>,
        V: Into<Value>;
}

impl JsonPathAccess for Map<String, Value> {
    fn get_at(&self, path: &KeyPath) -> Result<&Value> {
        let Some((last, parents)) = path.split_last() else {
            return Err(Report::new(Error::InvalidKeyPath(path.to_string())));
        };

        let mut current = self;
        for segment in parents {
            current = current
                .get(segment)
                .and_then(Value::as_object)
                .ok_or_else(|| Report::new(Error::key_not_found(segment, path)))?;
        }

        current
            .get(last)
            .ok_or_else(|| Report::new(Error::key_not_found(last, path)))
    }

    fn set_at(&mut self, path: &KeyPath, value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut current = self;
        for segment in parents {
            let entry = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Self::new()));
            if !entry.is_object() {
                tracing::debug!(%path, %segment, "Replacing non-object intermediate value");
                *entry = Value::Object(Self::new());
            }
            let Value::Object(next) = entry else {
                return;
            };
            current = next;
        }

        current.insert(last.clone(), value);
    }

    fn delete_at(&mut self, path: &KeyPath) -> Option<Value> {
        let (last, parents) = path.split_last()?;

        let mut current = self;
        for segment in parents {
            current = current.get_mut(segment)?.as_object_mut()?;
        }

        current.shift_remove(last)
    }

    fn get_field<T: AsRef<str>>(&self, field: T) -> Option<&Value> { self.get(field.as_ref()) }

    fn insert_field<F, V>(&mut self, field: F, value: V)
    where
        F: Into<String>,
        V: Into<Value>,
    {
        self.insert(field.into(), value.into());
    }
}

/// Structural equality with numbers compared by value
///
/// `serde_json` keeps integers and floats apart, so `12` and `12.0` differ under `==`.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => numbers_equal(left, right),
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right)
                    .all(|(left, right)| values_equal(left, right))
        },
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .all(|(key, value)| right.get(key).is_some_and(|other| values_equal(value, other)))
        },
        _ => left == right,
    }
}

fn numbers_equal(left: &Number, right: &Number) -> bool {
    if let (Some(left), Some(right)) = (left.as_i64(), right.as_i64()) {
        return left == right;
    }
    if let (Some(left), Some(right)) = (left.as_u64(), right.as_u64()) {
        return left == right;
    }
    match (left.as_f64(), right.as_f64()) {
        (Some(left), Some(right)) => left.partial_cmp(&right) == Some(Ordering::Equal),
        _ => false,
    }
}
