//! Curved text badge along the bottom-left arc of the canvas.
//!
//! Angles are radians in canvas space (y down, clockwise from +x).

use std::f64::consts::{FRAC_PI_2, TAU};

use kurbo::{Circle, Shape as _};

use crate::foundation::core::{Affine, Point, reference_scale};
use crate::foundation::error::PfpResult;
use crate::paint::color::{CssColor, resolve_color};
use crate::paint::gradient::CanvasGradient;
use crate::render::shape::stroke_outline;
use crate::render::surface::{Surface, affine_to_cpu, bezpath_to_cpu, cpu_color, image_paint};
use crate::render::text::{FontFace, TextLayoutEngine};
use crate::settings::GenerationSettings;

/// Arc centre: bottom-left, 135 degrees clockwise from +x.
pub const BADGE_CENTER_ANGLE_DEG: f64 = 135.0;
/// Gap between the canvas edge and the arc centre-line at the 1024px reference size.
pub const BADGE_PADDING: f64 = 40.0;
/// Ring width relative to the arc radius.
pub const BADGE_THICKNESS_RATIO: f64 = 0.175;
/// Font size relative to the ring width.
pub const BADGE_FONT_RATIO: f64 = 0.9;
/// Chip span relative to the text span.
pub const BADGE_ANGULAR_PADDING: f64 = 1.5;
/// Share of the uncovered ring used to fade the chip out on either side.
const CHIP_FADE_SHARE: f64 = 0.1;
/// Advance used per character when no font could be resolved.
const FALLBACK_ADVANCE_EM: f32 = 0.6;

/// Fixed badge arc for a given canvas size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BadgeArc {
    pub center: Point,
    pub radius: f64,
    pub thickness: f64,
    pub font_size: f64,
    pub center_angle: f64,
}

impl BadgeArc {
    pub fn for_canvas(side: f64) -> Self {
        let radius = side / 2.0 - BADGE_PADDING * reference_scale(side);
        let thickness = radius * BADGE_THICKNESS_RATIO;
        Self {
            center: Point::new(side / 2.0, side / 2.0),
            radius,
            thickness,
            font_size: thickness * BADGE_FONT_RATIO,
            center_angle: BADGE_CENTER_ANGLE_DEG.to_radians(),
        }
    }

    pub fn point_at(&self, angle: f64) -> Point {
        self.center + self.radius * kurbo::Vec2::new(angle.cos(), angle.sin())
    }
}

/// One character's slot along the arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphSlot {
    /// Angle where the slot starts.
    pub angle: f64,
    /// Angular width of the slot.
    pub span: f64,
}

impl GlyphSlot {
    pub fn mid(&self) -> f64 {
        self.angle + self.span / 2.0
    }
}

/// Angular layout of the (already reversed) badge text.
#[derive(Clone, Debug, PartialEq)]
pub struct BadgeLayout {
    /// Angular span covered by the text.
    pub text_span: f64,
    /// Angular span of the opaque chip behind the text.
    pub chip_span: f64,
    pub chip_start: f64,
    pub slots: Vec<GlyphSlot>,
}

impl BadgeLayout {
    /// Lay out glyph advances (pixels, visual order) centred on the arc.
    pub fn compute(arc: &BadgeArc, advances: &[f32], letter_spacing: f64) -> Self {
        let widths: Vec<f64> = advances
            .iter()
            .map(|&a| f64::from(a) * letter_spacing)
            .collect();
        let total: f64 = widths.iter().sum();
        let text_span = total / arc.radius;
        let chip_span = text_span * BADGE_ANGULAR_PADDING;

        let mut angle = arc.center_angle - text_span / 2.0;
        let slots = widths
            .iter()
            .map(|w| {
                let span = w / arc.radius;
                let slot = GlyphSlot { angle, span };
                angle += span;
                slot
            })
            .collect();

        Self {
            text_span,
            chip_span,
            chip_start: arc.center_angle - chip_span / 2.0,
            slots,
        }
    }

    /// Conic gradient painting the chip: opaque across the chip span, fading out over a
    /// short stretch on either side, transparent elsewhere.
    pub fn chip_gradient(&self, arc: &BadgeArc, color: CssColor) -> CanvasGradient {
        let clear = CssColor { a: 0.0, ..color };
        let f = (self.chip_span / TAU).clamp(0.0, 1.0);
        let fade = CHIP_FADE_SHARE * (1.0 - f);
        let mut g = CanvasGradient::conic(arc.center, self.chip_start);
        g.add_color_stop(0.0, color);
        g.add_color_stop(f, color);
        g.add_color_stop(f + fade, clear);
        g.add_color_stop(1.0 - fade, clear);
        g.add_color_stop(1.0, color);
        g
    }
}

/// Transform placing a glyph of advance `advance` upright and centred in `slot`.
pub fn glyph_transform(arc: &BadgeArc, slot: &GlyphSlot, advance: f64) -> Affine {
    let mid = slot.mid();
    Affine::translate(arc.point_at(mid).to_vec2())
        * Affine::rotate(mid + FRAC_PI_2)
        * Affine::scale(-1.0)
        * Affine::translate((-advance / 2.0, arc.font_size * 0.35))
}

/// Draw the badge chip and its text. Without a font only the chip is drawn.
#[tracing::instrument(skip_all, fields(text = %settings.badge_text))]
pub(crate) fn draw_badge(
    surface: &mut Surface,
    settings: &GenerationSettings,
    font: Option<&FontFace>,
) -> PfpResult<()> {
    let arc = BadgeArc::for_canvas(settings.side());
    let reversed: String = settings.badge_text.chars().rev().collect();

    let glyphs = match font {
        Some(face) => TextLayoutEngine::new().shape_line(
            &reversed,
            face,
            arc.font_size as f32,
            settings.badge_text_bold,
        )?,
        None => {
            tracing::warn!("no badge font available, drawing the chip without text");
            Vec::new()
        }
    };
    let advances: Vec<f32> = if font.is_some() {
        glyphs.iter().map(|g| g.advance).collect()
    } else {
        reversed
            .chars()
            .map(|_| arc.font_size as f32 * FALLBACK_ADVANCE_EM)
            .collect()
    };
    let layout = BadgeLayout::compute(&arc, &advances, settings.badge_text_letter_spacing);
    tracing::debug!(
        text_span = layout.text_span,
        chip_span = layout.chip_span,
        "badge layout"
    );

    let chip_color = CssColor::parse(&settings.badge_background_color).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "badge background colour unresolvable, using black");
        CssColor::rgba(0, 0, 0, 1.0)
    });
    let (w, h) = (surface.width(), surface.height());
    let chip_pixels = layout.chip_gradient(&arc, chip_color).rasterize(w, h);
    let chip_paint = image_paint(&chip_pixels, w, h)?;
    let ring = bezpath_to_cpu(&stroke_outline(
        &Circle::new(arc.center, arc.radius).to_path(0.1),
        arc.thickness,
    ));
    surface.draw(|ctx| {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(chip_paint);
        ctx.fill_path(&ring);
    })?;

    let Some(face) = font else {
        return Ok(());
    };
    let font_data = face.to_cpu();
    let text_color = cpu_color(resolve_color(&settings.badge_text_color));
    let font_size = arc.font_size as f32;
    surface.draw(|ctx| {
        ctx.set_paint(text_color);
        for (glyph, slot) in glyphs.iter().zip(&layout.slots) {
            let t = glyph_transform(&arc, slot, f64::from(glyph.advance));
            ctx.set_transform(affine_to_cpu(t));
            ctx.glyph_run(&font_data)
                .font_size(font_size)
                .fill_glyphs(std::iter::once(vello_cpu::Glyph {
                    id: glyph.id,
                    x: 0.0,
                    y: 0.0,
                }));
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/badge.rs"]
mod tests;
