//! Admin fields
//!
//! A field binds a label to a column, fills itself from a [`Record`], renders
//! a preview for listings, and turns itself into a [`FormField`] for edit
//! forms. Every field carries a [`FieldCore`] with the shared value
//! lifecycle; [`FieldExt`] adds the common builder methods.
//!
//! ```rust
//! use acton_admin::fields::{Field, FieldExt, Text};
//! use acton_admin::query::Record;
//! use serde_json::json;
//!
//! let mut title = Text::new("Title").required();
//! title.fill(&Record::from_json("id", json!({"id": 1, "title": "Dune"})));
//! assert_eq!(title.preview(), "Dune");
//! ```
//!
//! [`Record`]: crate::query::Record
//! [`FormField`]: crate::forms::FormField

mod date_range;
pub(crate) mod field;
pub(crate) mod options;
pub mod relationships;
mod select;
mod text;

pub use date_range::DateRange;
pub use field::{Field, FieldCore, FieldExt, Formatter, PreviewCallback};
pub use options::{OptionItem, OptionProperties, OptionSet, Selected};
pub use relationships::{
    BelongsTo, BelongsToMany, Cardinality, HasOne, HasRelatedValues, HasRelation, RelatedValues,
    RelationDescriptor,
};
pub use select::Select;
pub use text::Text;
