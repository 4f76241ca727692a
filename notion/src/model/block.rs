//! Content blocks
//!
//! A block payload carries `object: "block"`, its kind under `type` and the kind-specific
//! content under a key named after the kind:
//!
//! ```json
//! {"object": "block", "type": "to_do", "to_do": {"text": [...], "checked": false}}
//! ```

use chrono::DateTime;
use chrono::Utc;
use itertools::Itertools;
use serde_json::Map;
use serde_json::Value;
use strum::AsRefStr;
use strum::Display;
use strum::EnumString;

use super::property::TextProperty;
use super::property_list::PropertyList;
use crate::NotionItem;
use crate::convert;
use crate::error::Result;
use crate::json_path::JsonPathAccess;
use crate::notion_item;

/// Separator between blocks in [`blocks_text`]
const BLOCK_TEXT_SEPARATOR: &str = "\n";

/// Block kinds, as found under the `type` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum BlockKind {
    /// Paragraph
    Paragraph,
    /// Top level heading
    #[strum(serialize = "heading_1")]
    Heading1,
    /// Second level heading
    #[strum(serialize = "heading_2")]
    Heading2,
    /// Third level heading
    #[strum(serialize = "heading_3")]
    Heading3,
    /// Bulleted list entry
    BulletedListItem,
    /// Numbered list entry
    NumberedListItem,
    /// Collapsible toggle
    Toggle,
    /// Callout box
    Callout,
    /// Checklist entry
    ToDo,
    /// Code listing
    Code,
}

notion_item! {
    /// Any block, without checking its kind
    pub struct NotionBlock {
        discriminator: ("object", "block"),
        attrs: {
            /// Block identifier
            id: String,
            /// Block kind name
            block_type: String = key(&["type"]),
            /// Whether the block is archived
            archived: bool = editable(),
            /// Creation time
            created_time: Option<DateTime<Utc>> = derived().get_converter(convert::date_from_value),
            /// Creation time as sent by the server
            created_time_str: String = derived().key(&["created_time"]),
            /// Last edit time
            last_edited_time: Option<DateTime<Utc>> = derived().get_converter(convert::date_from_value),
            /// Last edit time as sent by the server
            last_edited_time_str: String = derived().key(&["last_edited_time"]),
        }
    }
}

impl NotionBlock {
    /// Parsed block kind, `None` for kinds this crate does not model
    ///
    /// # Errors
    ///
    /// Fails when `type` is missing.
    pub fn kind(&self) -> Result<Option<BlockKind>> { Ok(self.block_type()?.parse().ok()) }
}

/// A block of one specific kind
pub trait TypedBlock: NotionItem {
    /// The block kind
    const KIND: BlockKind;

    /// Rich-text segments of the block
    ///
    /// # Errors
    ///
    /// Fails for an unbound block or missing text.
    fn text_items(&self) -> Result<PropertyList<TextProperty>> {
        let value = self.raw_attr("text")?;
        PropertyList::from_value(value, "")
    }

    /// Plain text of the block
    ///
    /// # Errors
    ///
    /// As [`Self::text_items`].
    fn plain_text(&self) -> Result<String> { self.text_items()?.get_text() }

    /// Append-children request payload creating one block under `block_id`
    ///
    /// Produces `{"block_id": ..., "children": [payload]}`.
    ///
    /// # Errors
    ///
    /// As [`NotionItem::make_data`].
    fn make_as_children_data(block_id: &str, kwargs: &Map<String, Value>) -> Result<Map<String, Value>> {
        let child = Self::make_data(kwargs)?;
        let mut data = Map::new();
        data.insert_field("block_id", block_id);
        data.insert_field("children", vec![Value::Object(child)]);
        Ok(data)
    }
}

/// Declares a block kind whose content is a rich-text list at `<kind>.text`
macro_rules! text_block {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:ident, $key:literal
        $(, $extra:ident: $ty:ty = $extra_key:literal)*
    ) => {
        notion_item! {
            $(#[$meta])*
            pub struct $name {
                discriminator: ("type", $key),
                extends: [NotionBlock],
                unknown_attrs: Reject,
                attrs: {
                    /// Rich-text segments; accepts a string or a list of strings and segments
                    text: Vec<Value> = editable()
                        .key(&[$key, "text"])
                        .set_converter(convert::rich_text_from_value),
                    $(
                        #[doc = concat!("The `", $extra_key, "` field")]
                        $extra: $ty = editable().key(&[$key, $extra_key]),
                    )*
                }
            }
        }

        impl TypedBlock for $name {
            const KIND: BlockKind = BlockKind::$kind;
        }
    };
}

text_block!(
    /// Paragraph block
    ParagraphBlock, Paragraph, "paragraph"
);
text_block!(
    /// Top level heading block
    Heading1Block, Heading1, "heading_1"
);
text_block!(
    /// Second level heading block
    Heading2Block, Heading2, "heading_2"
);
text_block!(
    /// Third level heading block
    Heading3Block, Heading3, "heading_3"
);
text_block!(
    /// Bulleted list entry block
    BulletedListItemBlock, BulletedListItem, "bulleted_list_item"
);
text_block!(
    /// Numbered list entry block
    NumberedListItemBlock, NumberedListItem, "numbered_list_item"
);
text_block!(
    /// Toggle block
    ToggleBlock, Toggle, "toggle"
);
text_block!(
    /// Callout block
    CalloutBlock, Callout, "callout"
);
text_block!(
    /// Checklist entry block
    ToDoBlock, ToDo, "to_do",
    checked: bool = "checked"
);
text_block!(
    /// Code block
    CodeBlock, Code, "code",
    language: String = "language"
);

/// Joined plain text of a list of blocks, one line per block
///
/// # Errors
///
/// Fails when any block has no readable text.
pub fn blocks_text<B: TypedBlock>(blocks: &[B]) -> Result<String> {
    let lines = blocks
        .iter()
        .map(TypedBlock::plain_text)
        .collect::<Result<Vec<_>>>()?;
    Ok(lines.iter().join(BLOCK_TEXT_SEPARATOR))
}
