//! CSS-like gradient descriptors and their rasterisation.
//!
//! `brandColor` may hold either a colour string or a `linear-gradient(...)` /
//! `radial-gradient(...)` descriptor. Parsed gradients are resolved against the canvas size and
//! rasterised into premultiplied RGBA8 buffers that the renderer uses as image paints.

use std::f64::consts::TAU;

use crate::foundation::core::{Point, Vec2};
use crate::paint::color::{CssColor, split_function};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient in `[0, 1]`.
    pub offset: f64,
    pub color: CssColor,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GradientGeometry {
    /// Colour varies along the segment `start -> end`.
    Linear { start: Point, end: Point },
    /// Colour varies with distance from `center`, reaching offset 1 at `radius`.
    Radial { center: Point, radius: f64 },
    /// Colour varies with the clockwise angle around `center`, starting at `start_angle`
    /// radians from +x (y down).
    Conic { center: Point, start_angle: f64 },
}

/// Gradient resolved against canvas coordinates.
///
/// Built once and consumed by the fill that uses it.
#[derive(Debug)]
pub struct CanvasGradient {
    geometry: GradientGeometry,
    stops: Vec<ColorStop>,
}

impl CanvasGradient {
    pub fn linear(start: Point, end: Point) -> Self {
        Self::new(GradientGeometry::Linear { start, end })
    }

    pub fn radial(center: Point, radius: f64) -> Self {
        Self::new(GradientGeometry::Radial { center, radius })
    }

    pub fn conic(center: Point, start_angle: f64) -> Self {
        Self::new(GradientGeometry::Conic {
            center,
            start_angle,
        })
    }

    fn new(geometry: GradientGeometry) -> Self {
        Self {
            geometry,
            stops: Vec::new(),
        }
    }

    /// Append a stop; stops keep insertion order until rasterisation.
    pub fn add_color_stop(&mut self, offset: f64, color: CssColor) {
        self.stops.push(ColorStop {
            offset: offset.clamp(0.0, 1.0),
            color,
        });
    }

    pub fn geometry(&self) -> GradientGeometry {
        self.geometry
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Rasterise into a `width * height * 4` premultiplied RGBA8 buffer, sampling at pixel
    /// centres. A gradient without stops paints nothing.
    pub fn rasterize(self, width: u32, height: u32) -> Vec<u8> {
        let mut out = vec![0u8; width as usize * height as usize * 4];
        if self.stops.is_empty() {
            return out;
        }

        let mut ramp: Vec<(f64, [f64; 4])> = self
            .stops
            .iter()
            .map(|s| (s.offset, premul_f64(s.color)))
            .collect();
        // Stable: equal offsets keep insertion order, which makes hard edges.
        ramp.sort_by(|a, b| a.0.total_cmp(&b.0));

        let param = Parametrizer::new(self.geometry);
        for (i, px) in out.chunks_exact_mut(4).enumerate() {
            let x = (i % width as usize) as f64 + 0.5;
            let y = (i / width as usize) as f64 + 0.5;
            let t = param.at(Point::new(x, y));
            let c = sample_ramp(&ramp, t);
            for (dst, v) in px.iter_mut().zip(c) {
                *dst = v.round().clamp(0.0, 255.0) as u8;
            }
        }
        out
    }
}

/// Result of resolving a `brandColor`-style string.
#[derive(Debug)]
pub enum FillStyle {
    Gradient(CanvasGradient),
    /// The input did not look like a gradient and is used verbatim as a colour string.
    Color(String),
}

/// Parse `input` as a gradient laid out over a `width x height` canvas.
///
/// Strings that are not `linear-gradient(...)` or `radial-gradient(...)` come back unchanged as
/// [`FillStyle::Color`]. Individual stops that are not `rgb(...)`/`rgba(...)` followed by a
/// percentage are skipped with a warning.
pub fn css_gradient_to_fill(input: &str, width: f64, height: f64) -> FillStyle {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();
    let Some((name, inner)) = split_function(&lower) else {
        return FillStyle::Color(input.to_string());
    };
    let is_linear = match name {
        "linear-gradient" => true,
        "radial-gradient" => false,
        _ => return FillStyle::Color(input.to_string()),
    };

    let mut terms = split_top_level(inner);
    let angle = match terms.first().and_then(|t| parse_angle_deg(t)) {
        Some(a) => {
            terms.remove(0);
            Some(a)
        }
        None => None,
    };

    let center = Point::new(width / 2.0, height / 2.0);
    let mut gradient = if is_linear {
        // Absent angle means "to bottom".
        let (start, end) = linear_endpoints(angle.unwrap_or(180.0), width, height);
        CanvasGradient::linear(start, end)
    } else {
        CanvasGradient::radial(center, width.min(height) / 2.0)
    };

    for term in terms {
        match parse_stop(term) {
            Some((color, offset)) => {
                if !(0.0..=1.0).contains(&offset) {
                    tracing::warn!(stop = term, "gradient stop offset outside 0%..100%, clamping");
                }
                gradient.add_color_stop(offset, color);
            }
            None => tracing::warn!(stop = term, "skipping unparseable gradient stop"),
        }
    }

    FillStyle::Gradient(gradient)
}

/// Endpoints of a CSS linear gradient line through the canvas centre. `0deg` points up and
/// angles grow clockwise.
pub fn linear_endpoints(angle_deg: f64, width: f64, height: f64) -> (Point, Point) {
    let a = angle_deg.to_radians();
    let (sin, cos) = a.sin_cos();
    let half_len = ((width * sin).abs() + (height * cos).abs()) / 2.0;
    let dir = Vec2::new(sin, -cos);
    let c = Point::new(width / 2.0, height / 2.0);
    (c - dir * half_len, c + dir * half_len)
}

fn split_top_level(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                out.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(s[start..].trim());
    out.retain(|t| !t.is_empty());
    out
}

fn parse_angle_deg(term: &str) -> Option<f64> {
    let v = term.trim().strip_suffix("deg")?.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

fn parse_stop(term: &str) -> Option<(CssColor, f64)> {
    let term = term.trim();
    if !(term.starts_with("rgb(") || term.starts_with("rgba(")) {
        return None;
    }
    let close = term.find(')')?;
    let color = CssColor::parse(&term[..=close]).ok()?;
    let pct = term[close + 1..]
        .trim()
        .strip_suffix('%')?
        .trim()
        .parse::<f64>()
        .ok()?;
    pct.is_finite().then_some((color, pct / 100.0))
}

fn premul_f64(c: CssColor) -> [f64; 4] {
    let a = f64::from(c.a);
    [
        f64::from(c.r) * a,
        f64::from(c.g) * a,
        f64::from(c.b) * a,
        a * 255.0,
    ]
}

fn sample_ramp(ramp: &[(f64, [f64; 4])], t: f64) -> [f64; 4] {
    let (first, last) = match (ramp.first(), ramp.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return [0.0; 4],
    };
    if t < first.0 {
        return first.1;
    }
    if t >= last.0 {
        return last.1;
    }
    // Last stop at or before t; the next one is strictly after it.
    let i = ramp.partition_point(|s| s.0 <= t) - 1;
    let (o0, c0) = ramp[i];
    let (o1, c1) = ramp[i + 1];
    let f = (t - o0) / (o1 - o0);
    std::array::from_fn(|k| c0[k] + (c1[k] - c0[k]) * f)
}

struct Parametrizer {
    geometry: GradientGeometry,
    // Linear: direction over squared length.
    axis: Vec2,
}

impl Parametrizer {
    fn new(geometry: GradientGeometry) -> Self {
        let axis = match geometry {
            GradientGeometry::Linear { start, end } => {
                let d = end - start;
                let len2 = d.hypot2();
                if len2 > 0.0 { d / len2 } else { Vec2::ZERO }
            }
            _ => Vec2::ZERO,
        };
        Self { geometry, axis }
    }

    fn at(&self, p: Point) -> f64 {
        match self.geometry {
            GradientGeometry::Linear { start, .. } => (p - start).dot(self.axis),
            GradientGeometry::Radial { center, radius } => {
                if radius > 0.0 {
                    (p - center).hypot() / radius
                } else {
                    1.0
                }
            }
            GradientGeometry::Conic {
                center,
                start_angle,
            } => {
                let d = p - center;
                (d.y.atan2(d.x) - start_angle).rem_euclid(TAU) / TAU
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/gradient.rs"]
mod tests;
