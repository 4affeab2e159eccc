use crate::assets::decode::{Bitmap, SubjectBitmap};
use crate::encode::EncodedImage;
use crate::foundation::error::{PfpError, PfpResult};
use crate::render::background::render_background;
use crate::render::badge::draw_badge;
use crate::render::finish::{finish, finish_canvas};
use crate::render::subject::composite_subject;
use crate::render::surface::Surface;
use crate::render::text::{FontFace, system_sans};
use crate::settings::GenerationSettings;

/// Render configuration that is not part of the user-facing settings.
#[derive(Clone, Debug)]
pub struct RenderOpts {
    /// Face used for the badge text.
    pub badge_font: Option<FontFace>,
    /// Look up a system sans-serif face when `badge_font` is not set.
    pub system_font_fallback: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            badge_font: None,
            system_font_fallback: true,
        }
    }
}

impl RenderOpts {
    pub fn with_badge_font(mut self, face: FontFace) -> Self {
        self.badge_font = Some(face);
        self
    }

    /// Never touch system fonts; badges without an explicit font are drawn without text.
    pub fn without_system_fonts(mut self) -> Self {
        self.system_font_fallback = false;
        self
    }

    fn resolve_badge_font(&self, bold: bool) -> Option<FontFace> {
        match &self.badge_font {
            Some(face) => Some(face.clone()),
            None if self.system_font_fallback => system_sans(bold),
            None => None,
        }
    }
}

/// Render one profile picture and encode it as `settings.output_format`.
///
/// The subject and settings are only read. Fails before drawing anything when the shape is
/// unknown, the subject is empty or the background image does not decode.
#[tracing::instrument(skip_all, fields(size = settings.output_size))]
pub fn render(
    subject: &SubjectBitmap,
    settings: &GenerationSettings,
    opts: &RenderOpts,
) -> PfpResult<EncodedImage> {
    let mut surface = compose(subject, settings, opts)?;
    finish(&mut surface, settings)
}

/// Same as [`render`] but returns the finished canvas as straight RGBA instead of encoding it.
#[tracing::instrument(skip_all, fields(size = settings.output_size))]
pub fn render_raster(
    subject: &SubjectBitmap,
    settings: &GenerationSettings,
    opts: &RenderOpts,
) -> PfpResult<image::RgbaImage> {
    let mut surface = compose(subject, settings, opts)?;
    finish_canvas(&mut surface, settings)?;
    image::RgbaImage::from_raw(surface.width(), surface.height(), surface.to_rgba8_straight())
        .ok_or_else(|| PfpError::render("canvas buffer does not match its dimensions"))
}

/// Background, subject and badge stages on a fresh canvas.
fn compose(
    subject: &SubjectBitmap,
    settings: &GenerationSettings,
    opts: &RenderOpts,
) -> PfpResult<Surface> {
    settings.background_shape.ensure_known()?;
    if subject.is_empty() {
        return Err(PfpError::validation("subject bitmap is empty"));
    }
    let background_image = settings
        .background_image
        .as_deref()
        .map(Bitmap::decode_data_url)
        .transpose()?;

    let mut surface = Surface::new(settings.output_size, settings.output_size)?;
    render_background(&mut surface, settings, background_image.as_ref())?;
    composite_subject(&mut surface, subject, settings)?;
    if settings.badge_enabled {
        let font = opts.resolve_badge_font(settings.badge_text_bold);
        draw_badge(&mut surface, settings, font.as_ref())?;
    }
    Ok(surface)
}
