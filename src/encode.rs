//! Output encoding.

use std::io::Cursor;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{PfpError, PfpResult};
use crate::settings::OutputFormat;

/// A finished, encoded profile picture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// `data:<mime>;base64,...` form for direct display.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Encode premultiplied RGBA8 pixels.
///
/// PNG and WebP keep the alpha channel. JPEG has none, so pixels are flattened onto black.
pub fn encode_premul_rgba8(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
    format: OutputFormat,
) -> PfpResult<EncodedImage> {
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(PfpError::encode("pixel buffer does not match dimensions"));
    }

    let image = match format {
        OutputFormat::Jpeg => {
            let rgb: Vec<u8> = rgba8_premul
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            image::RgbImage::from_raw(width, height, rgb)
                .map(image::DynamicImage::ImageRgb8)
        }
        OutputFormat::Png | OutputFormat::Webp => {
            let straight: Vec<u8> = rgba8_premul
                .chunks_exact(4)
                .flat_map(|px| {
                    Rgba8Premul {
                        r: px[0],
                        g: px[1],
                        b: px[2],
                        a: px[3],
                    }
                    .to_straight_rgba()
                })
                .collect();
            image::RgbaImage::from_raw(width, height, straight)
                .map(image::DynamicImage::ImageRgba8)
        }
    }
    .ok_or_else(|| PfpError::encode("pixel buffer does not match dimensions"))?;

    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format.image_format())
        .with_context(|| format!("encode {}", format.mime()))
        .map_err(|e| PfpError::encode(format!("{e:#}")))?;

    tracing::debug!(mime = format.mime(), len = bytes.len(), "encoded output");
    Ok(EncodedImage {
        format,
        width,
        height,
        bytes,
    })
}
