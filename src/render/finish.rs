use crate::encode::{EncodedImage, encode_premul_rgba8};
use crate::foundation::error::PfpResult;
use crate::render::background::draw_border;
use crate::render::shape::ShapeGeometry;
use crate::render::surface::Surface;
use crate::settings::{BorderLayer, GenerationSettings};

/// Foreground border and final image mask.
pub(crate) fn finish_canvas(surface: &mut Surface, settings: &GenerationSettings) -> PfpResult<()> {
    if settings.border && settings.border_layer == BorderLayer::Foreground {
        draw_border(surface, settings)?;
    }
    if settings.use_background_shape_as_image_mask
        && let Some(mask) = ShapeGeometry::full_canvas(&settings.background_shape, settings.side())?
    {
        tracing::debug!(?mask, "applying image mask");
        surface.mask_in(&mask.to_path())?;
    }
    Ok(())
}

/// Finish the canvas and encode it in the configured format.
#[tracing::instrument(skip_all, fields(format = settings.output_format.mime()))]
pub(crate) fn finish(surface: &mut Surface, settings: &GenerationSettings) -> PfpResult<EncodedImage> {
    finish_canvas(surface, settings)?;
    encode_premul_rgba8(
        surface.data(),
        surface.width(),
        surface.height(),
        settings.output_format,
    )
}
