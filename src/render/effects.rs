//! Per-pixel passes used by the subject compositor: CSS filter colour matrices and the drop
//! shadow blur.

use crate::foundation::core::{Vec2, reference_scale};
use crate::foundation::error::{PfpError, PfpResult};
use crate::render::surface::mul_div255;

/// Row-major 4x5 matrix over straight RGBA in `[0, 1]`; column 5 is the constant term.
pub type ColorMatrix = [f32; 20];

/// Opacity of the drop shadow colour (black).
pub const SHADOW_ALPHA: f32 = 0.45;
/// Shadow offset at the 1024px reference size.
pub const SHADOW_OFFSET: (f64, f64) = (-10.0, 10.0);
/// CSS blur length at the 1024px reference size; the Gaussian sigma is half of it.
pub const SHADOW_BLUR: f64 = 15.0;

/// CSS `brightness(amount)`, amount as a fraction (1.0 is neutral).
pub fn brightness_matrix(amount: f32) -> ColorMatrix {
    [
        amount, 0.0, 0.0, 0.0, 0.0, //
        0.0, amount, 0.0, 0.0, 0.0, //
        0.0, 0.0, amount, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

/// CSS `contrast(amount)`.
pub fn contrast_matrix(amount: f32) -> ColorMatrix {
    let t = 0.5 - 0.5 * amount;
    [
        amount, 0.0, 0.0, 0.0, t, //
        0.0, amount, 0.0, 0.0, t, //
        0.0, 0.0, amount, 0.0, t, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

/// CSS `saturate(amount)`.
pub fn saturate_matrix(s: f32) -> ColorMatrix {
    [
        0.213 + 0.787 * s,
        0.715 - 0.715 * s,
        0.072 - 0.072 * s,
        0.0,
        0.0,
        0.213 - 0.213 * s,
        0.715 + 0.285 * s,
        0.072 - 0.072 * s,
        0.0,
        0.0,
        0.213 - 0.213 * s,
        0.715 - 0.715 * s,
        0.072 + 0.928 * s,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
        0.0,
    ]
}

/// Matrices for the non-neutral filters, in application order (brightness, contrast,
/// saturate). Inputs are percentages with 100 as neutral.
pub fn filter_chain(brightness_pct: f64, contrast_pct: f64, saturation_pct: f64) -> Vec<ColorMatrix> {
    let mut chain = Vec::new();
    if brightness_pct != 100.0 {
        chain.push(brightness_matrix((brightness_pct / 100.0) as f32));
    }
    if contrast_pct != 100.0 {
        chain.push(contrast_matrix((contrast_pct / 100.0) as f32));
    }
    if saturation_pct != 100.0 {
        chain.push(saturate_matrix((saturation_pct / 100.0) as f32));
    }
    chain
}

/// Apply `m` to premultiplied RGBA8 pixels in place, clamping the result.
pub fn color_matrix_in_place(buf: &mut [u8], m: &ColorMatrix) {
    for px in buf.chunks_exact_mut(4) {
        let pa = px[3] as f32 / 255.0;
        let inv_a = if pa > 0.0 { 1.0 / pa } else { 0.0 };
        let r = px[0] as f32 / 255.0 * inv_a;
        let g = px[1] as f32 / 255.0 * inv_a;
        let b = px[2] as f32 / 255.0 * inv_a;
        let a = pa;

        let out_r = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        let out_g = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        let out_b = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        let out_a = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);

        px[0] = (out_r * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        px[1] = (out_g * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        px[2] = (out_b * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        px[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

/// Drop shadow parameters resolved for one canvas size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropShadow {
    pub offset: Vec2,
    pub sigma: f64,
    pub alpha: f32,
}

impl DropShadow {
    /// The fixed subject shadow scaled to a `side` canvas.
    pub fn for_canvas(side: f64) -> Self {
        let k = reference_scale(side);
        Self {
            offset: Vec2::new(SHADOW_OFFSET.0 * k, SHADOW_OFFSET.1 * k),
            sigma: SHADOW_BLUR / 2.0 * k,
            alpha: SHADOW_ALPHA,
        }
    }

    /// Shadow layer (premultiplied black) cast by the premultiplied `layer`.
    pub fn cast(&self, layer: &[u8], width: u32, height: u32) -> PfpResult<Vec<u8>> {
        let (w, h) = (width as usize, height as usize);
        if layer.len() != w * h * 4 {
            return Err(PfpError::render(
                "shadow layer expects width*height*4 bytes",
            ));
        }
        let dx = self.offset.x.round() as isize;
        let dy = self.offset.y.round() as isize;
        let tint = (self.alpha.clamp(0.0, 1.0) * 255.0).round() as u16;

        let mut plane = vec![0u8; w * h];
        for y in 0..h {
            let sy = y as isize - dy;
            if sy < 0 || sy >= h as isize {
                continue;
            }
            for x in 0..w {
                let sx = x as isize - dx;
                if sx < 0 || sx >= w as isize {
                    continue;
                }
                let a = layer[(sy as usize * w + sx as usize) * 4 + 3];
                plane[y * w + x] = mul_div255(u16::from(a), tint);
            }
        }

        let radius = (self.sigma * 3.0).ceil().max(0.0) as u32;
        let blurred = if radius == 0 {
            plane
        } else {
            let kernel = gaussian_kernel_q16(radius, self.sigma as f32)?;
            blur_plane(&plane, w, h, &kernel)
        };

        let mut out = vec![0u8; w * h * 4];
        for (px, a) in out.chunks_exact_mut(4).zip(blurred) {
            px[3] = a;
        }
        Ok(out)
    }
}

pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> PfpResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(PfpError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&q| i64::from(q)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

/// Separable blur of a single-channel plane; samples outside the plane are transparent.
fn blur_plane(src: &[u8], w: usize, h: usize, k: &[u32]) -> Vec<u8> {
    let radius = (k.len() / 2) as isize;
    let mut tmp = vec![0u8; src.len()];
    let mut out = vec![0u8; src.len()];

    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sx = x as isize + ki as isize - radius;
                if sx >= 0 && (sx as usize) < w {
                    acc += u64::from(kw) * u64::from(row[sx as usize]);
                }
            }
            tmp[y * w + x] = q16_to_u8(acc);
        }
    }
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = y as isize + ki as isize - radius;
                if sy >= 0 && (sy as usize) < h {
                    acc += u64::from(kw) * u64::from(tmp[sy as usize * w + x]);
                }
            }
            out[y * w + x] = q16_to_u8(acc);
        }
    }
    out
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/effects.rs"]
mod tests;
