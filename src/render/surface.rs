use std::sync::Arc;

use crate::assets::decode::Bitmap;
use crate::foundation::core::{Affine, BezPath, Rgba8Premul};
use crate::foundation::error::{PfpError, PfpResult};

/// Square premultiplied RGBA8 canvas owned by a single render call.
///
/// Drawing never happens directly on the canvas pixmap: every draw renders into a fresh layer
/// which is then composited, so the canvas supports source-over and destination-in.
pub(crate) struct Surface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    ctx: Option<vello_cpu::RenderContext>,
}

impl Surface {
    pub(crate) fn new(width: u32, height: u32) -> PfpResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| PfpError::render("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| PfpError::render("surface height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(PfpError::render("surface must be non-empty"));
        }
        Ok(Self {
            width: w,
            height: h,
            pixmap: vello_cpu::Pixmap::new(w, h),
            ctx: None,
        })
    }

    pub(crate) fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub(crate) fn height(&self) -> u32 {
        u32::from(self.height)
    }

    pub(crate) fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> Rgba8Premul {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let d = self.data();
        Rgba8Premul {
            r: d[i],
            g: d[i + 1],
            b: d[i + 2],
            a: d[i + 3],
        }
    }

    /// Render `f` into a new transparent layer of the canvas size.
    pub(crate) fn render_layer(
        &mut self,
        f: impl FnOnce(&mut vello_cpu::RenderContext),
    ) -> vello_cpu::Pixmap {
        let (w, h) = (self.width, self.height);
        let mut ctx = match self.ctx.take() {
            Some(ctx) => ctx,
            None => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        f(&mut ctx);
        ctx.flush();
        let mut layer = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut layer);
        self.ctx = Some(ctx);
        layer
    }

    /// Source-over draw.
    pub(crate) fn draw(&mut self, f: impl FnOnce(&mut vello_cpu::RenderContext)) -> PfpResult<()> {
        let layer = self.render_layer(f);
        self.composite_over(layer.data_as_u8_slice())
    }

    /// Source-over composite of a premultiplied buffer of the canvas size.
    pub(crate) fn composite_over(&mut self, src: &[u8]) -> PfpResult<()> {
        premul_over_in_place(self.data_mut(), src)
    }

    /// Destination-in: keep canvas pixels only where `path` covers them.
    pub(crate) fn mask_in(&mut self, path: &BezPath) -> PfpResult<()> {
        let cpu_path = bezpath_to_cpu(path);
        let mask = self.render_layer(|ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            ctx.fill_path(&cpu_path);
        });
        mask_alpha_in_place(self.data_mut(), mask.data_as_u8_slice())
    }

    /// Fill the whole canvas with `color` using source-over.
    pub(crate) fn fill(&mut self, color: Rgba8Premul) {
        let src = color.to_array();
        for d in self.data_mut().chunks_exact_mut(4) {
            let out = over_px([d[0], d[1], d[2], d[3]], src);
            d.copy_from_slice(&out);
        }
    }

    /// Draw `bitmap` stretched over the whole canvas.
    pub(crate) fn draw_stretched(&mut self, bitmap: &Bitmap) -> PfpResult<()> {
        if bitmap.is_empty() {
            return Ok(());
        }
        let paint = image_paint(bitmap.premul_bytes(), bitmap.width(), bitmap.height())?;
        let sx = f64::from(self.width) / f64::from(bitmap.width());
        let sy = f64::from(self.height) / f64::from(bitmap.height());
        let (bw, bh) = (f64::from(bitmap.width()), f64::from(bitmap.height()));
        self.draw(|ctx| {
            ctx.set_transform(affine_to_cpu(Affine::scale_non_uniform(sx, sy)));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, bw, bh));
        })
    }

    /// Copy out straight-alpha RGBA8.
    pub(crate) fn to_rgba8_straight(&self) -> Vec<u8> {
        let mut out = self.data().to_vec();
        for px in out.chunks_exact_mut(4) {
            let s = Rgba8Premul {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
            .to_straight_rgba();
            px.copy_from_slice(&s);
        }
        out
    }
}

/// Paint colour for `c`; vello_cpu colours are straight alpha.
pub(crate) fn cpu_color(c: Rgba8Premul) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_straight_rgba();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn pixmap_from_premul_bytes(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> PfpResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PfpError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PfpError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(PfpError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

/// Image paint sampling `rgba8_premul` in its own pixel space.
pub(crate) fn image_paint(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> PfpResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(rgba8_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> PfpResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PfpError::render(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over_px([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Multiply every canvas pixel by the mask's alpha.
pub(crate) fn mask_alpha_in_place(dst: &mut [u8], mask: &[u8]) -> PfpResult<()> {
    if dst.len() != mask.len() {
        return Err(PfpError::render(
            "mask_alpha_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, m) in dst.chunks_exact_mut(4).zip(mask.chunks_exact(4)) {
        let w = u16::from(m[3]);
        for c in d.iter_mut() {
            *c = mul_div255(u16::from(*c), w);
        }
    }
    Ok(())
}

pub(crate) fn over_px(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let inv = 255u16 - u16::from(src[3]);
    std::array::from_fn(|i| src[i].saturating_add(mul_div255(u16::from(dst[i]), inv)))
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
