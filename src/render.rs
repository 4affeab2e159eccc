//! Rendering stages over a private CPU canvas.

pub(crate) mod background;
pub mod badge;
pub mod effects;
pub(crate) mod finish;
pub mod pipeline;
pub mod shape;
pub mod subject;
pub(crate) mod surface;
pub mod text;
