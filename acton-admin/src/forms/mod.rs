//! Form building and rendering
//!
//! [`FormBuilder`] collects [`FormField`] controls, hidden inputs, and
//! [`ActionButton`]s; [`FormRenderer`] turns it into HTML. Relation
//! sub-forms are put together by [`RelationFormAssembler`].

mod assembler;
mod builder;
mod button;
mod field;
mod render;

pub use assembler::{FormAction, RelationForm, RelationFormAssembler};
pub use builder::FormBuilder;
pub use button::{ActionButton, Modal};
pub use field::{FieldFlags, FieldKind, FormField, InputType, SelectOption};
pub use render::{FormRenderOptions, FormRenderer};
