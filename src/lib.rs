//! pfpgen renders stylised profile pictures.
//!
//! A background-removed subject bitmap and a declarative [`GenerationSettings`] record go in; a
//! finished square image comes out. The pipeline runs four stages on a private CPU canvas:
//!
//! - background fill (colour, CSS-like gradient or image) clipped to the mask shape
//! - subject compositing with filters, drop shadow, margins and rotation
//! - an optional curved text badge
//! - foreground border, final image mask and encoding
//!
//! Rendering is a pure function of its inputs: the same subject and settings always produce the
//! same bytes.
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub mod encode;
pub mod paint;
pub mod render;
pub mod settings;
pub mod templates;

pub use crate::assets::decode::{Bitmap, DEFAULT_TRIM_ALPHA_THRESHOLD, SubjectBitmap, data_url_payload};
pub use crate::encode::{EncodedImage, encode_premul_rgba8};
pub use crate::foundation::core::{Affine, BezPath, Point, REFERENCE_SIZE, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{PfpError, PfpResult};
pub use crate::paint::color::CssColor;
pub use crate::paint::gradient::{CanvasGradient, FillStyle, css_gradient_to_fill};
pub use crate::render::pipeline::{RenderOpts, render, render_raster};
pub use crate::render::text::FontFace;
pub use crate::settings::{BackgroundShape, BorderLayer, GenerationSettings, OutputFormat, SettingsPatch};
pub use crate::templates::{BuiltinTemplate, Template, TemplateOutput, TemplateRegistry};
