use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{PfpError, PfpResult};

/// Alpha at or below which a pixel counts as background when trimming a subject.
pub const DEFAULT_TRIM_ALPHA_THRESHOLD: u8 = 48;

/// Decoded raster in premultiplied RGBA8, row-major.
///
/// Used for the background-removed subject and for background images. Pixel storage is shared,
/// so clones are cheap and renders never copy the caller's pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

/// The background-removed foreground image handed to the renderer.
pub type SubjectBitmap = Bitmap;

impl Bitmap {
    /// Build from straight (non-premultiplied) RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> PfpResult<Self> {
        check_len(width, height, rgba.len())?;
        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba),
        })
    }

    /// Build from pixels that are already premultiplied.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> PfpResult<Self> {
        check_len(width, height, rgba8_premul.len())?;
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Decode any raster format the `image` crate reads.
    pub fn decode(bytes: &[u8]) -> PfpResult<Self> {
        let dyn_img = image::load_from_memory(bytes)
            .context("decode image from memory")
            .map_err(|e| PfpError::decode(format!("{e:#}")))?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba8(width, height, rgba.into_raw())
    }

    /// Decode a `data:<mime>;base64,<payload>` URL.
    pub fn decode_data_url(url: &str) -> PfpResult<Self> {
        Self::decode(&data_url_payload(url)?)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn premul_bytes(&self) -> &[u8] {
        &self.rgba8_premul
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.rgba8_premul[(y as usize * self.width as usize + x as usize) * 4 + 3]
    }

    /// Crop rows and columns whose pixels all have alpha `<= alpha_threshold`.
    ///
    /// A bitmap with no pixel above the threshold trims to 0x0.
    pub fn trimmed(&self, alpha_threshold: u8) -> Self {
        let (w, h) = (self.width, self.height);
        let opaque = |x: u32, y: u32| self.alpha_at(x, y) > alpha_threshold;
        let row_has = |y: u32| (0..w).any(|x| opaque(x, y));

        let Some(top) = (0..h).find(|&y| row_has(y)) else {
            return Self {
                width: 0,
                height: 0,
                rgba8_premul: Arc::new(Vec::new()),
            };
        };
        let bottom = (top..h).rev().find(|&y| row_has(y)).unwrap_or(top);
        let col_has = |x: u32| (top..=bottom).any(|y| opaque(x, y));
        let left = (0..w).find(|&x| col_has(x)).unwrap_or(0);
        let right = (left..w).rev().find(|&x| col_has(x)).unwrap_or(left);

        if (left, top, right, bottom) == (0, 0, w - 1, h - 1) {
            return self.clone();
        }

        let (tw, th) = (right - left + 1, bottom - top + 1);
        let mut out = Vec::with_capacity(tw as usize * th as usize * 4);
        for y in top..=bottom {
            let start = (y as usize * w as usize + left as usize) * 4;
            out.extend_from_slice(&self.rgba8_premul[start..start + tw as usize * 4]);
        }
        tracing::debug!(
            from_w = w,
            from_h = h,
            to_w = tw,
            to_h = th,
            "trimmed transparent border"
        );
        Self {
            width: tw,
            height: th,
            rgba8_premul: Arc::new(out),
        }
    }
}

/// Extract and base64-decode the payload of a `data:` URL.
pub fn data_url_payload(url: &str) -> PfpResult<Vec<u8>> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| PfpError::decode("background image is not a data: URL"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| PfpError::decode("data: URL has no payload"))?;
    if !meta.ends_with(";base64") {
        return Err(PfpError::decode("data: URL payload is not base64"));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .context("decode base64 data: URL payload")
        .map_err(|e| PfpError::decode(format!("{e:#}")))
}

fn check_len(width: u32, height: u32, len: usize) -> PfpResult<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| PfpError::validation("bitmap size overflow"))?;
    if len != expected {
        return Err(PfpError::validation(format!(
            "bitmap byte length {len} does not match {width}x{height} rgba8"
        )));
    }
    Ok(())
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
