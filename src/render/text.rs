//! Badge text shaping and font resolution.

use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use crate::foundation::error::{PfpError, PfpResult};

/// Font face used for the badge text: raw font file bytes plus the face index inside them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontFace {
    pub bytes: Arc<Vec<u8>>,
    pub index: u32,
}

impl FontFace {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
            index: 0,
        }
    }

    pub(crate) fn to_cpu(&self) -> vello_cpu::peniko::FontData {
        vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(self.bytes.as_ref().clone()),
            self.index,
        )
    }
}

/// A shaped glyph in visual order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapedGlyph {
    pub id: u32,
    pub advance: f32,
}

/// Parley contexts reused across shaping calls.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape `text` as a single line and return its glyphs with their advances.
    pub(crate) fn shape_line(
        &mut self,
        text: &str,
        face: &FontFace,
        size_px: f32,
        bold: bool,
    ) -> PfpResult<Vec<ShapedGlyph>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PfpError::validation("text size must be finite and > 0"));
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .iter()
            .find(|(_, fonts)| fonts.iter().any(|f| f.index() == face.index))
            .or_else(|| families.first())
            .map(|(id, _)| *id)
            .ok_or_else(|| PfpError::render("no font families registered from font bytes"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PfpError::render("registered font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        if bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.glyphs().map(|g| ShapedGlyph {
                    id: g.id,
                    advance: g.advance,
                }));
            }
        }
        Ok(glyphs)
    }
}

/// Default system sans-serif face, looked up once per weight.
pub(crate) fn system_sans(bold: bool) -> Option<FontFace> {
    static REGULAR: OnceLock<Option<FontFace>> = OnceLock::new();
    static BOLD: OnceLock<Option<FontFace>> = OnceLock::new();
    let cell = if bold { &BOLD } else { &REGULAR };
    cell.get_or_init(|| load_system_sans(bold)).clone()
}

fn load_system_sans(bold: bool) -> Option<FontFace> {
    use usvg::fontdb;

    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let query = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        weight: if bold {
            fontdb::Weight::BOLD
        } else {
            fontdb::Weight::NORMAL
        },
        ..Default::default()
    };
    let id = db.query(&query)?;
    let face = db.with_face_data(id, |data, index| FontFace {
        bytes: Arc::new(data.to_vec()),
        index,
    });
    match &face {
        Some(_) => tracing::debug!(bold, "resolved system sans-serif face"),
        None => tracing::warn!(bold, "system sans-serif face could not be read"),
    }
    face
}
