use crate::assets::decode::Bitmap;
use crate::foundation::error::PfpResult;
use crate::paint::color::resolve_color;
use crate::paint::gradient::{FillStyle, css_gradient_to_fill};
use crate::render::shape::ShapeGeometry;
use crate::render::surface::{Surface, bezpath_to_cpu, cpu_color};
use crate::settings::{BorderLayer, GenerationSettings};

/// Paint the background fill, the optional image and background-layer border, then clip
/// everything to the mask shape.
#[tracing::instrument(skip_all, fields(shape = %settings.background_shape))]
pub(crate) fn render_background(
    surface: &mut Surface,
    settings: &GenerationSettings,
    background_image: Option<&Bitmap>,
) -> PfpResult<()> {
    let shape = background_geometry(settings)?;

    fill_canvas(surface, &settings.brand_color)?;
    if let Some(img) = background_image {
        surface.draw_stretched(img)?;
    }
    if settings.border && settings.border_layer == BorderLayer::Background {
        draw_border(surface, settings)?;
    }

    tracing::debug!(?shape, "clipping background");
    surface.mask_in(&shape.to_path())
}

pub(crate) fn background_geometry(settings: &GenerationSettings) -> PfpResult<ShapeGeometry> {
    ShapeGeometry::background(
        &settings.background_shape,
        settings.side(),
        settings.background_scale,
        settings.background_vertical_position,
    )
}

/// Cover the canvas with a colour or gradient descriptor.
pub(crate) fn fill_canvas(surface: &mut Surface, style: &str) -> PfpResult<()> {
    let (w, h) = (surface.width(), surface.height());
    match css_gradient_to_fill(style, f64::from(w), f64::from(h)) {
        FillStyle::Gradient(g) => {
            let pixels = g.rasterize(w, h);
            surface.composite_over(&pixels)
        }
        FillStyle::Color(c) => {
            surface.fill(resolve_color(&c));
            Ok(())
        }
    }
}

/// Stroke the mask shape, inset so the stroke's outer edge follows the shape edge.
pub(crate) fn draw_border(surface: &mut Surface, settings: &GenerationSettings) -> PfpResult<()> {
    if !settings.border || settings.border_thickness <= 0.0 {
        return Ok(());
    }
    let t = settings.border_thickness;
    let outline = background_geometry(settings)?
        .border_line(t)
        .stroke_outline(t);
    let color = resolve_color(&settings.border_color);
    let path = bezpath_to_cpu(&outline);
    surface.draw(|ctx| {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(cpu_color(color));
        ctx.fill_path(&path);
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
