//! Page property values
//!
//! Every property payload carries its kind under `type` and its content under a key named
//! after the kind, e.g. `{"type": "number", "number": 12.5}`.

use error_stack::Report;
use serde_json::Map;
use serde_json::Value;
use strum::AsRefStr;
use strum::Display;
use strum::EnumString;
use strum::IntoStaticStr;

use crate::NotionItem;
use crate::convert;
use crate::error::Error;
use crate::error::Result;
use crate::item::ItemData;
use crate::json_path::JsonPathAccess;
use crate::notion_item;

/// Property kinds, as found under the `type` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum PropertyKind {
    /// Page title, a rich-text list
    Title,
    /// Rich-text list
    RichText,
    /// Single rich-text segment
    Text,
    /// Number
    Number,
    /// Checkbox
    Checkbox,
    /// Single select option
    Select,
    /// Multiple select options
    MultiSelect,
    /// URL
    Url,
    /// Email address
    Email,
    /// Phone number
    PhoneNumber,
    /// Date or date range
    Date,
}

/// Behavior shared by every concrete property type
pub trait PropertyValue: NotionItem {
    /// Text rendering of the property's content
    ///
    /// # Errors
    ///
    /// Fails when the content is missing or malformed.
    fn get_text(&self) -> Result<String>;

    /// Build a property from a simplified value
    ///
    /// An object is used as keyword values for the builder. Any other value is written to
    /// the type's only editable attribute.
    ///
    /// # Errors
    ///
    /// Fails for a scalar when the type does not have exactly one editable attribute, or
    /// when a set converter rejects the value.
    fn make_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(kwargs) => Self::make(&kwargs),
            scalar => make_from_scalar(scalar),
        }
    }
}

/// A property type with a fixed kind, usable as a page field or database column
pub trait TypedProperty: PropertyValue {
    /// Kind of the property, also its `type` discriminator
    const KIND: PropertyKind;
}

fn make_from_scalar<P: NotionItem>(value: Value) -> Result<P> {
    let mut editable = P::attr_registry().editable_descriptors();
    let (Some(descriptor), None) = (editable.next(), editable.next()) else {
        return Err(Report::new(Error::invalid_value(
            &format!("value for {}", P::TYPE_NAME),
            "scalar values need exactly one editable attribute",
        )));
    };

    let mut data = Map::new();
    if let Some(discriminator) = P::DISCRIMINATOR {
        data.insert_field(discriminator.key, discriminator.value);
    }
    data.set_at(descriptor.key(), descriptor.convert_for_write(value)?);
    Ok(P::from_item_data(ItemData::bound(data)))
}

fn kwargs_with(name: &str, value: Value) -> Map<String, Value> {
    let mut kwargs = Map::new();
    kwargs.insert_field(name, value);
    kwargs
}

notion_item! {
    /// Any property value, without checking its kind
    pub struct PageProperty {
        attrs: {
            /// Property identifier
            id: String,
            /// Property kind name
            property_type: String = key(&["type"]),
        }
    }
}

impl PageProperty {
    /// Parsed property kind
    ///
    /// # Errors
    ///
    /// Fails when `type` is missing or names an unsupported kind.
    pub fn kind(&self) -> Result<PropertyKind> {
        let name = self.property_type()?;
        name.parse()
            .map_err(|e| Report::new(Error::conversion_failed(&format!("property kind '{name}'"), e)))
    }
}

impl PropertyValue for PageProperty {
    fn get_text(&self) -> Result<String> { Ok(String::new()) }
}

notion_item! {
    /// Single rich-text segment
    pub struct TextProperty {
        discriminator: ("type", "text"),
        extends: [PageProperty],
        attrs: {
            /// Text content
            content: String = editable().key(&["text", "content"]),
            /// Link attached to the text
            link: Option<Value> = editable().key(&["text", "link"]),
            /// Bold annotation
            bold: bool = editable().key(&["annotations", "bold"]),
            /// Italic annotation
            italic: bool = editable().key(&["annotations", "italic"]),
            /// Strikethrough annotation
            strikethrough: bool = editable().key(&["annotations", "strikethrough"]),
            /// Underline annotation
            underline: bool = editable().key(&["annotations", "underline"]),
            /// Code annotation
            code: bool = editable().key(&["annotations", "code"]),
            /// Color annotation
            color: String = editable().key(&["annotations", "color"]),
            /// Rendered plain text
            plain_text: String = derived(),
            /// Rendered link target
            href: Option<String> = derived(),
        }
    }
}

impl TypedProperty for TextProperty {
    const KIND: PropertyKind = PropertyKind::Text;
}

impl PropertyValue for TextProperty {
    fn get_text(&self) -> Result<String> { self.content() }

    /// A string becomes the segment's content; objects are keyword values
    fn make_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(kwargs) => Self::make(&kwargs),
            content => Self::make(&kwargs_with("content", content)),
        }
    }
}

notion_item! {
    /// Number property
    pub struct NumberProperty {
        discriminator: ("type", "number"),
        extends: [PageProperty],
        attrs: {
            /// The number, `None` when empty
            number: Option<f64> = editable(),
        }
    }
}

impl TypedProperty for NumberProperty {
    const KIND: PropertyKind = PropertyKind::Number;
}

impl PropertyValue for NumberProperty {
    fn get_text(&self) -> Result<String> { Ok(self.number()?.map(|number| number.to_string()).unwrap_or_default()) }
}

notion_item! {
    /// Checkbox property
    pub struct CheckboxProperty {
        discriminator: ("type", "checkbox"),
        extends: [PageProperty],
        attrs: {
            /// Whether the box is checked
            checkbox: bool = editable(),
        }
    }
}

impl TypedProperty for CheckboxProperty {
    const KIND: PropertyKind = PropertyKind::Checkbox;
}

impl PropertyValue for CheckboxProperty {
    fn get_text(&self) -> Result<String> { Ok(self.checkbox()?.to_string()) }
}

notion_item! {
    /// Single select property
    ///
    /// Changing the option name drops the option id and color, which belong to the old
    /// option.
    pub struct SelectProperty {
        discriminator: ("type", "select"),
        extends: [PageProperty],
        attrs: {
            /// Option identifier
            option_id: String = derived().key(&["select", "id"]),
            /// Option name
            name: String = editable().key(&["select", "name"]),
            /// Option color
            color: String = derived().key(&["select", "color"]),
        }
    }
}

impl TypedProperty for SelectProperty {
    const KIND: PropertyKind = PropertyKind::Select;
}

impl PropertyValue for SelectProperty {
    fn get_text(&self) -> Result<String> { self.name() }
}

notion_item! {
    /// Option inside a multi-select list
    pub struct MultiSelectItem {
        attrs: {
            /// Option identifier
            option_id: String = derived().key(&["id"]),
            /// Option name
            name: String = editable(),
            /// Option color
            color: String = derived(),
        }
    }
}

impl PropertyValue for MultiSelectItem {
    fn get_text(&self) -> Result<String> { self.name() }
}

notion_item! {
    /// URL property
    pub struct UrlProperty {
        discriminator: ("type", "url"),
        extends: [PageProperty],
        attrs: {
            /// The URL, `None` when empty
            url: Option<String> = editable(),
        }
    }
}

impl TypedProperty for UrlProperty {
    const KIND: PropertyKind = PropertyKind::Url;
}

impl PropertyValue for UrlProperty {
    fn get_text(&self) -> Result<String> { Ok(self.url()?.unwrap_or_default()) }
}

notion_item! {
    /// Email property
    pub struct EmailProperty {
        discriminator: ("type", "email"),
        extends: [PageProperty],
        attrs: {
            /// The address, `None` when empty
            email: Option<String> = editable(),
        }
    }
}

impl TypedProperty for EmailProperty {
    const KIND: PropertyKind = PropertyKind::Email;
}

impl PropertyValue for EmailProperty {
    fn get_text(&self) -> Result<String> { Ok(self.email()?.unwrap_or_default()) }
}

notion_item! {
    /// Phone number property
    pub struct PhoneNumberProperty {
        discriminator: ("type", "phone_number"),
        extends: [PageProperty],
        attrs: {
            /// The number, `None` when empty
            phone_number: Option<String> = editable(),
        }
    }
}

impl TypedProperty for PhoneNumberProperty {
    const KIND: PropertyKind = PropertyKind::PhoneNumber;
}

impl PropertyValue for PhoneNumberProperty {
    fn get_text(&self) -> Result<String> { Ok(self.phone_number()?.unwrap_or_default()) }
}

notion_item! {
    /// Date property, a single date or a range
    pub struct DateProperty {
        discriminator: ("type", "date"),
        extends: [PageProperty],
        attrs: {
            /// Start date or timestamp
            start: Option<String> = editable()
                .key(&["date", "start"])
                .get_converter(convert::date_from_value)
                .set_converter(convert::date_to_value),
            /// End of the range, `None` for a single date
            end: Option<String> = editable()
                .key(&["date", "end"])
                .get_converter(convert::date_from_value)
                .set_converter(convert::date_to_value),
        }
    }
}

impl TypedProperty for DateProperty {
    const KIND: PropertyKind = PropertyKind::Date;
}

impl PropertyValue for DateProperty {
    fn get_text(&self) -> Result<String> {
        let start = self.start()?.unwrap_or_default();
        // A single date may omit `end` entirely
        let end = match self.end() {
            Ok(end) => end,
            Err(error) if error.current_context().is_key_not_found() => None,
            Err(error) => return Err(error),
        };
        match end {
            Some(end) => Ok(format!("{start} - {end}")),
            None => Ok(start),
        }
    }

    /// A scalar becomes the start date; objects are keyword values
    fn make_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(kwargs) => Self::make(&kwargs),
            start => Self::make(&kwargs_with("start", start)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, reason = "test assertions")]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::attr::WriteOutcome;

    #[test]
    fn test_discriminators_match_kinds() {
        fn check<P: TypedProperty>() {
            let discriminator = P::DISCRIMINATOR.unwrap();
            assert_eq!(discriminator.key, "type");
            assert_eq!(discriminator.value, P::KIND.as_ref(), "Failed for: {}", P::KIND);
        }

        check::<TextProperty>();
        check::<NumberProperty>();
        check::<CheckboxProperty>();
        check::<SelectProperty>();
        check::<UrlProperty>();
        check::<EmailProperty>();
        check::<PhoneNumberProperty>();
        check::<DateProperty>();
        assert_eq!(MultiSelectItem::DISCRIMINATOR, None);
    }

    #[test]
    fn test_integer_payload_rewritten_as_float_is_noop() {
        let mut number = NumberProperty::from_value(json!({
            "id": "p",
            "type": "number",
            "number": 12,
        }))
        .unwrap();
        let before = number.clone();

        assert_eq!(number.number().unwrap(), Some(12.0));
        assert_eq!(number.set_number(Some(12.0)).unwrap(), WriteOutcome::Unchanged);
        assert_eq!(number, before);
        assert_eq!(number.to_value().unwrap()["number"], json!(12));

        assert_eq!(number.set_number(Some(12.5)).unwrap(), WriteOutcome::Written);
        assert_eq!(number.to_value().unwrap()["number"], json!(12.5));
    }

    #[test]
    fn test_base_property_reads_any_kind() {
        let property = PageProperty::from_value(json!({
            "id": "%3AUPp",
            "type": "phone_number",
            "phone_number": "555",
        }))
        .unwrap();
        assert_eq!(property.id().unwrap(), "%3AUPp");
        assert_eq!(property.kind().unwrap(), PropertyKind::PhoneNumber);
        assert_eq!(property.get_text().unwrap(), "");

        let unknown = PageProperty::from_value(json!({"type": "formula"})).unwrap();
        assert!(matches!(
            unknown.kind().unwrap_err().current_context(),
            Error::Conversion(_)
        ));
    }

    #[test]
    fn test_make_from_scalar() {
        let cases = [
            (
                NumberProperty::make_from_value(json!(3)).unwrap().to_value().unwrap(),
                json!({"type": "number", "number": 3}),
            ),
            (
                CheckboxProperty::make_from_value(json!(true)).unwrap().to_value().unwrap(),
                json!({"type": "checkbox", "checkbox": true}),
            ),
            (
                SelectProperty::make_from_value(json!("Book")).unwrap().to_value().unwrap(),
                json!({"type": "select", "select": {"name": "Book"}}),
            ),
            (
                MultiSelectItem::make_from_value(json!("Tag")).unwrap().to_value().unwrap(),
                json!({"name": "Tag"}),
            ),
            (
                UrlProperty::make_from_value(json!("https://example.com")).unwrap().to_value().unwrap(),
                json!({"type": "url", "url": "https://example.com"}),
            ),
            (
                TextProperty::make_from_value(json!("Hi")).unwrap().to_value().unwrap(),
                json!({"type": "text", "text": {"content": "Hi"}}),
            ),
            (
                DateProperty::make_from_value(json!("2021-05-01")).unwrap().to_value().unwrap(),
                json!({"type": "date", "date": {"start": "2021-05-01"}}),
            ),
        ];

        for (actual, expected) in cases {
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_make_from_object() {
        let text = TextProperty::make_from_value(json!({"content": "Hi", "bold": true})).unwrap();
        assert_eq!(
            text.to_value().unwrap(),
            json!({
                "type": "text",
                "text": {"content": "Hi"},
                "annotations": {"bold": true},
            })
        );

        let date = DateProperty::make_from_value(json!({
            "start": "2021-05-01T10:00:00+02:00",
            "end": "2021-05-02",
        }))
        .unwrap();
        assert_eq!(
            date.to_value().unwrap(),
            json!({
                "type": "date",
                "date": {"start": "2021-05-01T08:00:00.000Z", "end": "2021-05-02"},
            })
        );
        assert_eq!(date.get_text().unwrap(), "2021-05-01T08:00:00.000Z - 2021-05-02");
    }

    #[test]
    fn test_scalar_needs_single_editable_attr() {
        let error = PageProperty::make_from_value(json!("x")).unwrap_err();
        assert!(matches!(error.current_context(), Error::Conversion(_)));
    }

    #[test]
    fn test_select_rename_drops_option_identity() {
        let mut select = SelectProperty::from_value(json!({
            "id": "p1",
            "type": "select",
            "select": {"id": "o1", "name": "Book", "color": "red"},
        }))
        .unwrap();
        assert_eq!(select.option_id().unwrap(), "o1");

        select.set_name("Book".to_string()).unwrap();
        assert_eq!(select.color().unwrap(), "red");

        select.set_name("Film".to_string()).unwrap();
        assert_eq!(
            select.to_value().unwrap(),
            json!({"id": "p1", "type": "select", "select": {"name": "Film"}})
        );
        assert_eq!(select.get_text().unwrap(), "Film");
    }

    #[test]
    fn test_text_rendering() {
        let number = NumberProperty::from_value(json!({"type": "number", "number": 12.5})).unwrap();
        assert_eq!(number.get_text().unwrap(), "12.5");

        let empty = NumberProperty::from_value(json!({"type": "number", "number": null})).unwrap();
        assert_eq!(empty.number().unwrap(), None);
        assert_eq!(empty.get_text().unwrap(), "");

        let single = DateProperty::from_value(json!({
            "type": "date",
            "date": {"start": "2021-05-01", "end": null},
        }))
        .unwrap();
        assert_eq!(single.get_text().unwrap(), "2021-05-01");
    }

    #[test]
    fn test_rich_text_segment_derived_values() {
        let mut text = TextProperty::from_value(json!({
            "type": "text",
            "text": {"content": "Hi", "link": null},
            "annotations": {"bold": false, "color": "default"},
            "plain_text": "Hi",
            "href": null,
        }))
        .unwrap();
        assert_eq!(text.plain_text().unwrap(), "Hi");
        assert_eq!(text.href().unwrap(), None);
        assert_eq!(text.link().unwrap(), None);

        text.set_bold(true).unwrap();
        assert!(text.bold().unwrap());
        assert!(text.plain_text().unwrap_err().current_context().is_key_not_found());
        assert_eq!(text.get_text().unwrap(), "Hi");
    }
}
