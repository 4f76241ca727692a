//! Per-type attribute metadata
//!
//! An [`AttrRegistry`] collects the descriptors declared on an item type and on every
//! ancestor it extends. It is built once per type and never changes afterwards.

use itertools::Itertools;

use crate::attr::AttrDescriptor;
use crate::attr::CheckedAttrOptions;
use crate::key_path::KeyPath;

/// Ordered attribute name to key path map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrKeys(Vec<(&'static str, KeyPath)>);

impl AttrKeys {
    /// Key path of `name`, if present
    pub fn get(&self, name: &str) -> Option<&KeyPath> {
        self.0
            .iter()
            .find_map(|(entry, path)| (*entry == name).then_some(path))
    }

    /// Whether `name` is present
    pub fn contains(&self, name: &str) -> bool { self.get(name).is_some() }

    /// Number of entries
    pub const fn len(&self) -> usize { self.0.len() }

    /// Whether there are no entries
    pub const fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Iterate `(name, key path)` pairs in merge order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &KeyPath)> {
        self.0.iter().map(|(name, path)| (*name, path))
    }

    /// Attribute names in merge order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ { self.0.iter().map(|(name, _)| *name) }

    fn from_descriptors<'a>(descriptors: impl Iterator<Item = &'a AttrDescriptor>) -> Self {
        Self(
            descriptors
                .map(|descriptor| (descriptor.name(), descriptor.key().clone()))
                .collect(),
        )
    }
}

/// Attribute metadata of one item type, merged over its ancestors
#[derive(Debug, Clone)]
pub struct AttrRegistry {
    type_name:   &'static str,
    descriptors: Vec<AttrDescriptor>,
    all:         AttrKeys,
    editable:    AttrKeys,
    derived:     AttrKeys,
}

impl AttrRegistry {
    /// Start collecting the attributes of `type_name`
    pub const fn builder(type_name: &'static str) -> AttrRegistryBuilder {
        AttrRegistryBuilder {
            type_name,
            own: Vec::new(),
            ancestors: Vec::new(),
        }
    }

    /// Name of the type this registry describes
    pub const fn type_name(&self) -> &'static str { self.type_name }

    /// Every attribute
    pub const fn all_keys(&self) -> &AttrKeys { &self.all }

    /// Attributes accepting writes
    pub const fn editable_keys(&self) -> &AttrKeys { &self.editable }

    /// Attributes computed by the remote system
    pub const fn derived_keys(&self) -> &AttrKeys { &self.derived }

    /// Descriptor of `name`, if declared on the type or an ancestor
    pub fn descriptor(&self, name: &str) -> Option<&AttrDescriptor> {
        self.descriptors
            .iter()
            .find(|descriptor| descriptor.name() == name)
    }

    /// Every descriptor in merge order
    pub fn descriptors(&self) -> impl Iterator<Item = &AttrDescriptor> { self.descriptors.iter() }

    /// Editable descriptors in merge order
    pub fn editable_descriptors(&self) -> impl Iterator<Item = &AttrDescriptor> {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.is_editable())
    }
}

/// Builder for [`AttrRegistry`]
#[derive(Debug)]
pub struct AttrRegistryBuilder {
    type_name: &'static str,
    own:       Vec<AttrDescriptor>,
    ancestors: Vec<&'static AttrRegistry>,
}

impl AttrRegistryBuilder {
    /// Declare an attribute on the type itself
    #[must_use]
    pub fn declare(self, name: &'static str, options: CheckedAttrOptions) -> Self {
        self.attr(AttrDescriptor::new(name, options))
    }

    /// Add an already built descriptor
    #[must_use]
    pub fn attr(mut self, descriptor: AttrDescriptor) -> Self {
        self.own.push(descriptor);
        self
    }

    /// Merge the attributes of an ancestor
    ///
    /// Ancestors are consulted in the order they are added, after the type's own attributes.
    #[must_use]
    pub fn inherit(mut self, ancestor: &'static AttrRegistry) -> Self {
        self.ancestors.push(ancestor);
        self
    }

    /// Merge own and inherited attributes
    ///
    /// The first descriptor seen for a name wins: own declarations first, then each ancestor
    /// in the order given. The editable and derived maps follow the winning descriptor, so
    /// re-declaring an attribute also overrides its policies.
    pub fn build(self) -> AttrRegistry {
        let Self {
            type_name,
            own,
            ancestors,
        } = self;

        let descriptors: Vec<AttrDescriptor> = own
            .into_iter()
            .chain(
                ancestors
                    .iter()
                    .flat_map(|ancestor| ancestor.descriptors().cloned()),
            )
            .unique_by(AttrDescriptor::name)
            .collect();

        let all = AttrKeys::from_descriptors(descriptors.iter());
        let editable = AttrKeys::from_descriptors(descriptors.iter().filter(|d| d.is_editable()));
        let derived = AttrKeys::from_descriptors(descriptors.iter().filter(|d| d.is_derived()));

        tracing::debug!(
            type_name,
            ancestors = ancestors.len(),
            attrs = all.len(),
            editable = editable.len(),
            derived = derived.len(),
            "Built attribute registry"
        );

        AttrRegistry {
            type_name,
            descriptors,
            all,
            editable,
            derived,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, reason = "test assertions")]
mod tests {
    use std::sync::LazyLock;

    use super::*;
    use crate::attr::AttrOptions;

    static BASE: LazyLock<AttrRegistry> = LazyLock::new(|| {
        AttrRegistry::builder("Base")
            .declare("id", AttrOptions::new().check())
            .declare("x", AttrOptions::new().key(&["a"]).editable().check())
            .declare("created_time", AttrOptions::new().derived().check())
            .build()
    });

    static OTHER: LazyLock<AttrRegistry> = LazyLock::new(|| {
        AttrRegistry::builder("Other")
            .declare("x", AttrOptions::new().key(&["c"]).check())
            .declare("y", AttrOptions::new().editable().check())
            .build()
    });

    #[test]
    fn test_own_declaration_wins() {
        let child = AttrRegistry::builder("Child")
            .declare("x", AttrOptions::new().key(&["b"]).editable().check())
            .inherit(&BASE)
            .build();

        assert_eq!(child.all_keys().get("x"), Some(&KeyPath::single("b")));
        assert_eq!(child.editable_keys().get("x"), Some(&KeyPath::single("b")));
        assert_eq!(
            child.all_keys().names().collect::<Vec<_>>(),
            ["x", "id", "created_time"]
        );
        assert_eq!(
            child.derived_keys().names().collect::<Vec<_>>(),
            ["created_time"]
        );
    }

    #[test]
    fn test_ancestors_in_listed_order() {
        let child = AttrRegistry::builder("Child")
            .inherit(&BASE)
            .inherit(&OTHER)
            .build();
        assert_eq!(child.all_keys().get("x"), Some(&KeyPath::single("a")));
        assert!(child.editable_keys().contains("y"));

        let reversed = AttrRegistry::builder("Reversed")
            .inherit(&OTHER)
            .inherit(&BASE)
            .build();
        assert_eq!(reversed.all_keys().get("x"), Some(&KeyPath::single("c")));
        assert!(!reversed.editable_keys().contains("x"));
    }

    #[test]
    fn test_redeclaration_overrides_policies() {
        let child = AttrRegistry::builder("Child")
            .declare("x", AttrOptions::new().key(&["a"]).check())
            .inherit(&BASE)
            .build();
        assert!(child.all_keys().contains("x"));
        assert!(!child.editable_keys().contains("x"));
        assert!(!child.descriptor("x").unwrap().is_editable());
    }

    #[test]
    fn test_empty_registry() {
        let registry = AttrRegistry::builder("Empty").build();
        assert!(registry.all_keys().is_empty());
        assert!(registry.descriptor("id").is_none());
        assert_eq!(registry.type_name(), "Empty");
    }
}
