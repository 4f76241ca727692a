//! Notion object types built on [`notion_item!`](crate::notion_item)
//!
//! - [`property`] / [`property_list`]: page property values
//! - [`parent`]: page parents
//! - [`page`]: pages, page models, page lists and create-page payloads
//! - [`database`]: databases and create-database payloads
//! - [`schema`]: property schemas shared by databases and page models
//! - [`block`]: content blocks

pub mod block;
pub mod database;
pub mod page;
pub mod parent;
pub mod property;
pub mod property_list;
pub mod schema;

pub use block::BlockKind;
pub use block::BulletedListItemBlock;
pub use block::CalloutBlock;
pub use block::CodeBlock;
pub use block::Heading1Block;
pub use block::Heading2Block;
pub use block::Heading3Block;
pub use block::NotionBlock;
pub use block::NotionBlockAttrs;
pub use block::NumberedListItemBlock;
pub use block::ParagraphBlock;
pub use block::ToDoBlock;
pub use block::ToggleBlock;
pub use block::TypedBlock;
pub use database::NotionDatabase;
pub use database::NotionDatabaseAttrs;
pub use page::NotionPage;
pub use page::NotionPageAttrs;
pub use page::NotionPageList;
pub use page::NotionPageListAttrs;
pub use page::PageDataBuilder;
pub use page::PageItem;
pub use page::PageModel;
pub use parent::Parent;
pub use parent::ParentDatabase;
pub use parent::ParentKind;
pub use parent::ParentPage;
pub use property::CheckboxProperty;
pub use property::DateProperty;
pub use property::EmailProperty;
pub use property::MultiSelectItem;
pub use property::NumberProperty;
pub use property::PageProperty;
pub use property::PagePropertyAttrs;
pub use property::PhoneNumberProperty;
pub use property::PropertyKind;
pub use property::PropertyValue;
pub use property::SelectProperty;
pub use property::TextProperty;
pub use property::TypedProperty;
pub use property::UrlProperty;
pub use property_list::ListProperty;
pub use property_list::MultiSelectProperty;
pub use property_list::PropertyList;
pub use property_list::RichTextProperty;
pub use property_list::TitleProperty;
pub use schema::PropertySchema;
pub use schema::Schema;
