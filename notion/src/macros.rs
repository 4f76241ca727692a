//! The `notion_item!` and `notion_page!` declaration macros

/// Declare a Notion item type and its attributes
///
/// Generates:
/// - the struct, wrapping an [`ItemData`](crate::ItemData)
/// - its [`NotionItem`](crate::NotionItem) impl, with a registry built once on first use
/// - typed getters `name()`, setters `set_name()` and descriptor lookups `name_attr()`
/// - a `<Type>Attrs` trait carrying the same accessors, implemented for the type and for
///   every type that lists it in `extends`
///
/// Attribute options are checked at compile time. Combining `editable()` with `derived()`,
/// or using `set_converter` without `editable()`, does not compile:
///
/// ```compile_fail
/// basic_notion::notion_item! {
///     /// Broken declaration
///     pub struct Broken {
///         attrs: {
///             /// Cannot be both
///             title: String = editable().derived(),
///         }
///     }
/// }
/// ```
///
/// ```
/// use basic_notion::NotionItem;
/// use serde_json::json;
///
/// basic_notion::notion_item! {
///     /// A tagged widget
///     pub struct Widget {
///         discriminator: ("object", "widget"),
///         attrs: {
///             /// Widget title
///             title: String = editable().key(&["title", "content"]),
///             /// Server side revision
///             revision: u64 = derived(),
///         }
///     }
/// }
///
/// let widget = Widget::builder().with("title", "Hi").build()?;
/// assert_eq!(widget.to_value()?, json!({"object": "widget", "title": {"content": "Hi"}}));
/// assert_eq!(widget.title()?, "Hi");
/// # Ok::<(), error_stack::Report<basic_notion::Error>>(())
/// ```
#[macro_export]
macro_rules! notion_item {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(discriminator: ($disc_key:literal, $disc_value:literal),)?
            $(extends: [$($parent:ident),* $(,)?],)?
            $(unknown_attrs: $policy:ident,)?
            attrs: {
                $(
                    $(#[$attr_meta:meta])*
                    $attr:ident : $ty:ty $(= $($opt:ident($($arg:expr),*)).+)?
                ),* $(,)?
            } $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        $vis struct $name {
            item_data: $crate::ItemData,
        }

        const _: () = {
            $(
                assert!(
                    $crate::AttrOptions::new() $($(.$opt($($arg),*))+)? .violation().is_none(),
                    concat!(
                        "invalid options for ",
                        stringify!($name),
                        "::",
                        stringify!($attr),
                        ": editable and derived are exclusive, set_converter requires editable"
                    ),
                );
            )*
        };

        impl $crate::NotionItem for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            $(
                const DISCRIMINATOR: ::core::option::Option<$crate::Discriminator> =
                    ::core::option::Option::Some($crate::Discriminator::new($disc_key, $disc_value));
            )?
            $(const UNKNOWN_ATTRS: $crate::UnknownAttrPolicy = $crate::UnknownAttrPolicy::$policy;)?

            fn attr_registry() -> &'static $crate::AttrRegistry {
                static REGISTRY: ::std::sync::LazyLock<$crate::AttrRegistry> =
                    ::std::sync::LazyLock::new(|| {
                        $crate::AttrRegistry::builder(stringify!($name))
                            $(
                                .declare(
                                    stringify!($attr),
                                    $crate::AttrOptions::new() $($(.$opt($($arg),*))+)? .check(),
                                )
                            )*
                            $($(
                                .inherit(<$parent as $crate::NotionItem>::attr_registry())
                            )*)?
                            .build()
                    });
                &REGISTRY
            }

            fn item_data(&self) -> &$crate::ItemData { &self.item_data }

            fn item_data_mut(&mut self) -> &mut $crate::ItemData { &mut self.item_data }

            fn from_item_data(item_data: $crate::ItemData) -> Self { Self { item_data } }
        }

        $crate::__private::paste! {
            impl $name {
                $(
                    #[doc = concat!("Read the `", stringify!($attr), "` attribute")]
                    $(#[$attr_meta])*
                    ///
                    /// # Errors
                    ///
                    /// Fails when the item is unbound, the value is absent, or it does not
                    /// convert to the attribute's type.
                    pub fn $attr(&self) -> $crate::Result<$ty> {
                        $crate::NotionItem::get_attr(self, stringify!($attr))
                    }

                    #[doc = concat!("Write the `", stringify!($attr), "` attribute")]
                    ///
                    /// # Errors
                    ///
                    /// Fails when the attribute is not editable, the item is unbound, or the
                    /// value does not convert.
                    pub fn [<set_ $attr>](&mut self, value: $ty) -> $crate::Result<$crate::WriteOutcome> {
                        $crate::NotionItem::set_attr(self, stringify!($attr), value)
                    }

                    #[doc = concat!("Descriptor of the `", stringify!($attr), "` attribute")]
                    ///
                    /// # Errors
                    ///
                    /// Never fails for a declared attribute.
                    pub fn [<$attr _attr>]() -> $crate::Result<&'static $crate::AttrDescriptor> {
                        <Self as $crate::NotionItem>::attr(stringify!($attr))
                    }
                )*
            }

            #[doc = concat!("Accessors of the attributes declared on [`", stringify!($name), "`]")]
            ///
            /// Implemented by the type itself and by every type that extends it.
            $vis trait [<$name Attrs>]: $crate::NotionItem {
                $(
                    #[doc = concat!("Read the `", stringify!($attr), "` attribute")]
                    ///
                    /// # Errors
                    ///
                    /// Fails when the item is unbound, the value is absent, or it does not
                    /// convert to the attribute's type.
                    fn $attr(&self) -> $crate::Result<$ty> {
                        $crate::NotionItem::get_attr(self, stringify!($attr))
                    }

                    #[doc = concat!("Write the `", stringify!($attr), "` attribute")]
                    ///
                    /// # Errors
                    ///
                    /// Fails when the attribute is not editable, the item is unbound, or the
                    /// value does not convert.
                    fn [<set_ $attr>](&mut self, value: $ty) -> $crate::Result<$crate::WriteOutcome> {
                        $crate::NotionItem::set_attr(self, stringify!($attr), value)
                    }
                )*
            }

            impl [<$name Attrs>] for $name {}

            $($(
                impl [<$parent Attrs>] for $name {}
            )*)?
        }
    };
}

/// Declare a page model: a page type whose properties are typed fields
///
/// Each field names its property type and the property's name inside the page payload.
/// Generates:
/// - the struct, its [`NotionItem`](crate::NotionItem) impl inheriting the attributes of
///   [`NotionPage`](crate::model::NotionPage), and the page accessor traits
/// - a [`PageModel`](crate::model::PageModel) impl whose schema lists every field
/// - typed getters `field()`, setters `set_field()` taking a simplified value, and schema
///   lookups `field_schema()`
///
/// ```
/// use basic_notion::model::ParentDatabase;
/// use basic_notion::model::SelectProperty;
/// use basic_notion::model::TitleProperty;
/// use basic_notion::prelude::*;
/// use serde_json::json;
///
/// basic_notion::notion_page! {
///     /// A book on the reading list
///     pub struct Book {
///         /// Book title
///         name: TitleProperty = "Name",
///         /// Reading status
///         status: SelectProperty = "Status",
///     }
/// }
///
/// let fields = json!({"name": "Dune", "status": "Reading"});
/// let mut book = Book::make_page(ParentDatabase::new("db-1"), fields.as_object().unwrap())?;
/// assert_eq!(book.name()?.get_text()?, "Dune");
///
/// book.set_status("Done")?;
/// assert_eq!(book.status()?.name()?, "Done");
/// assert_eq!(Book::status_schema()?.property_name(), "Status");
/// # Ok::<(), error_stack::Report<basic_notion::Error>>(())
/// ```
#[macro_export]
macro_rules! notion_page {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $prop:ty = $property_name:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        $vis struct $name {
            item_data: $crate::ItemData,
        }

        impl $crate::NotionItem for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const DISCRIMINATOR: ::core::option::Option<$crate::Discriminator> =
                <$crate::model::NotionPage as $crate::NotionItem>::DISCRIMINATOR;

            fn attr_registry() -> &'static $crate::AttrRegistry {
                static REGISTRY: ::std::sync::LazyLock<$crate::AttrRegistry> =
                    ::std::sync::LazyLock::new(|| {
                        $crate::AttrRegistry::builder(stringify!($name))
                            .inherit(<$crate::model::NotionPage as $crate::NotionItem>::attr_registry())
                            .build()
                    });
                &REGISTRY
            }

            fn item_data(&self) -> &$crate::ItemData { &self.item_data }

            fn item_data_mut(&mut self) -> &mut $crate::ItemData { &mut self.item_data }

            fn from_item_data(item_data: $crate::ItemData) -> Self { Self { item_data } }
        }

        impl $crate::model::NotionPageAttrs for $name {}

        impl $crate::model::PageItem for $name {}

        impl $crate::model::PageModel for $name {
            fn schema() -> &'static $crate::model::Schema {
                static SCHEMA: ::std::sync::LazyLock<$crate::model::Schema> =
                    ::std::sync::LazyLock::new(|| {
                        $crate::model::Schema::new()
                            $(
                                .with(
                                    stringify!($field),
                                    $crate::model::PropertySchema::new(
                                        $property_name,
                                        <$prop as $crate::model::TypedProperty>::KIND,
                                    ),
                                )
                            )*
                    });
                &SCHEMA
            }
        }

        $crate::__private::paste! {
            impl $name {
                $(
                    #[doc = concat!("Read the `", $property_name, "` property")]
                    $(#[$field_meta])*
                    ///
                    /// # Errors
                    ///
                    /// Fails when the page is unbound, the property is absent, or it is of
                    /// another kind.
                    pub fn $field(&self) -> $crate::Result<$prop> {
                        $crate::model::PageItem::property(self, $property_name)
                    }

                    #[doc = concat!("Replace the `", $property_name, "` property from a simplified value")]
                    ///
                    /// # Errors
                    ///
                    /// Fails when the page is unbound or the value does not convert.
                    pub fn [<set_ $field>](
                        &mut self,
                        value: impl ::core::convert::Into<$crate::__private::Value>,
                    ) -> $crate::Result<$crate::WriteOutcome> {
                        let property =
                            <$prop as $crate::model::PropertyValue>::make_from_value(value.into())?;
                        $crate::model::PageItem::set_property(self, $property_name, property)
                    }

                    #[doc = concat!("Schema of the `", $property_name, "` property")]
                    ///
                    /// # Errors
                    ///
                    /// Never fails for a declared field.
                    pub fn [<$field _schema>]() -> $crate::Result<&'static $crate::model::PropertySchema> {
                        <Self as $crate::model::PageModel>::field_schema(stringify!($field))
                    }
                )*
            }
        }
    };
}
