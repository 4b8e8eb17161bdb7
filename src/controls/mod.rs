//! Tuning controls bound to scene properties
//!
//! Controls live in a [`ControlPanel`]. Editing one queues a [`PropertyEdit`]
//! per [`Binding`]; the frame loop applies the queue once at the start of
//! every frame, before animation runs.

pub mod binding;
pub mod panel;

pub use binding::{
    Binding, ControlValue, Conversion, EditQueue, LightField, MaterialField, Property,
    PropertyEdit,
};
pub use panel::{Control, ControlHandle, ControlKind, ControlPanel, Folder};
