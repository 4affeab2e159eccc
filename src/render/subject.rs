use crate::assets::decode::Bitmap;
use crate::foundation::core::{Affine, Vec2};
use crate::foundation::error::{PfpError, PfpResult};
use crate::render::effects::{DropShadow, color_matrix_in_place, filter_chain};
use crate::render::surface::{Surface, affine_to_cpu, image_paint};
use crate::settings::GenerationSettings;

/// Where the subject lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubjectPlacement {
    /// Uniform scale from subject pixels to canvas pixels.
    pub scale: f64,
    /// Top-left of the unrotated subject box.
    pub origin: Vec2,
    /// Scaled size of the subject box.
    pub size: Vec2,
    /// Rotation in degrees about the box centre.
    pub rotation_deg: f64,
}

impl SubjectPlacement {
    /// Fit inside the canvas, centre horizontally, sit on the bottom edge, then shift by the
    /// margins (fractions of half the canvas side).
    pub fn compute(subject_w: u32, subject_h: u32, settings: &GenerationSettings) -> Self {
        let side = settings.side();
        let (w, h) = (f64::from(subject_w), f64::from(subject_h));
        let scale = (side / w).min(side / h) * settings.subject_scale;
        let size = Vec2::new(w * scale, h * scale);
        let origin = Vec2::new(
            (side - size.x) / 2.0 + settings.subject_left_margin * side / 2.0,
            side - size.y - settings.subject_top_margin * side / 2.0,
        );
        Self {
            scale,
            origin,
            size,
            rotation_deg: settings.subject_rotation,
        }
    }

    /// Subject pixel space to canvas space.
    pub fn transform(&self) -> Affine {
        let center = self.origin + self.size / 2.0;
        Affine::translate(center)
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::translate(-center)
            * Affine::translate(self.origin)
            * Affine::scale(self.scale)
    }
}

/// Draw the subject with its filters and optional drop shadow.
#[tracing::instrument(skip_all, fields(w = subject.width(), h = subject.height()))]
pub(crate) fn composite_subject(
    surface: &mut Surface,
    subject: &Bitmap,
    settings: &GenerationSettings,
) -> PfpResult<()> {
    if subject.is_empty() {
        return Err(PfpError::validation("subject bitmap is empty"));
    }

    let chain = filter_chain(
        settings.subject_brightness,
        settings.subject_contrast,
        settings.subject_saturation,
    );
    let paint = if chain.is_empty() {
        image_paint(subject.premul_bytes(), subject.width(), subject.height())?
    } else {
        let mut pixels = subject.premul_bytes().to_vec();
        for m in &chain {
            color_matrix_in_place(&mut pixels, m);
        }
        image_paint(&pixels, subject.width(), subject.height())?
    };

    let placement = SubjectPlacement::compute(subject.width(), subject.height(), settings);
    tracing::debug!(?placement, filters = chain.len(), "placing subject");

    let (w, h) = (f64::from(subject.width()), f64::from(subject.height()));
    let transform = affine_to_cpu(placement.transform());
    let layer = surface.render_layer(|ctx| {
        ctx.set_transform(transform);
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
    });

    if settings.subject_shadow {
        let shadow = DropShadow::for_canvas(settings.side()).cast(
            layer.data_as_u8_slice(),
            surface.width(),
            surface.height(),
        )?;
        surface.composite_over(&shadow)?;
    }
    surface.composite_over(layer.data_as_u8_slice())
}

#[cfg(test)]
#[path = "../../tests/unit/render/subject.rs"]
mod tests;
