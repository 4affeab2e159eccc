//! CSS color strings.
//!
//! Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()` (comma or space syntax,
//! numbers or percentages), `hsl()`/`hsla()` and a small set of named colors.

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{PfpError, PfpResult};

/// Straight-alpha color as written in CSS.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CssColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha in `[0, 1]`.
    pub a: f32,
}

impl CssColor {
    pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    pub fn parse(input: &str) -> PfpResult<Self> {
        let s = input.trim();
        let lower = s.to_ascii_lowercase();
        if let Some(hex) = lower.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| invalid(input));
        }
        if let Some((name, args)) = split_function(&lower) {
            return match name {
                "rgb" | "rgba" => parse_rgb_args(args).ok_or_else(|| invalid(input)),
                "hsl" | "hsla" => parse_hsl_args(args).ok_or_else(|| invalid(input)),
                _ => Err(invalid(input)),
            };
        }
        named(&lower).ok_or_else(|| invalid(input))
    }

    pub fn to_premul(self) -> Rgba8Premul {
        let a = (self.a * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, a)
    }

    /// Raise HSL lightness by `amount` percentage points.
    pub fn lighten(self, amount: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h, s, (l + amount / 100.0).clamp(0.0, 1.0), self.a)
    }

    /// Lower HSL lightness by `amount` percentage points.
    pub fn darken(self, amount: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h, s, (l - amount / 100.0).clamp(0.0, 1.0), self.a)
    }

    /// `rgb(r, g, b)` when opaque, `rgba(r, g, b, a)` otherwise.
    pub fn to_rgb_string(self) -> String {
        if self.a >= 1.0 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            let a = (self.a * 100.0).round() / 100.0;
            format!("rgba({}, {}, {}, {a})", self.r, self.g, self.b)
        }
    }

    /// Hue in `[0, 1)`, saturation and lightness in `[0, 1]`.
    pub fn to_hsl(self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        if max == min {
            return (0.0, 0.0, l);
        }
        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s, l)
    }

    pub fn from_hsl(h: f64, s: f64, l: f64, a: f32) -> Self {
        let to_u8 = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        if s == 0.0 {
            let v = to_u8(l);
            return Self::rgba(v, v, v, a);
        }
        let q = if l < 0.5 {
            l * (1.0 + s)
        } else {
            l + s - l * s
        };
        let p = 2.0 * l - q;
        Self::rgba(
            to_u8(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            to_u8(hue_to_rgb(p, q, h)),
            to_u8(hue_to_rgb(p, q, h - 1.0 / 3.0)),
            a,
        )
    }
}

/// Resolve a paint string to a color the way a canvas context does: unparseable strings leave
/// the default opaque black in place.
pub fn resolve_color(input: &str) -> Rgba8Premul {
    match CssColor::parse(input) {
        Ok(c) => c.to_premul(),
        Err(e) => {
            tracing::warn!(color = input, error = %e, "unresolvable color, using black");
            Rgba8Premul::black()
        }
    }
}

fn invalid(input: &str) -> PfpError {
    PfpError::validation(format!("invalid css color '{input}'"))
}

/// Split `name(args)` into its name and inner argument text.
pub(crate) fn split_function(s: &str) -> Option<(&str, &str)> {
    let open = s.find('(')?;
    let inner = s[open + 1..].trim_end().strip_suffix(')')?;
    Some((s[..open].trim(), inner))
}

fn parse_hex(hex: &str) -> Option<CssColor> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nib = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(CssColor::rgba(nib(0)?, nib(1)?, nib(2)?, 1.0)),
        4 => Some(CssColor::rgba(
            nib(0)?,
            nib(1)?,
            nib(2)?,
            f32::from(nib(3)?) / 255.0,
        )),
        6 => Some(CssColor::rgba(byte(0)?, byte(2)?, byte(4)?, 1.0)),
        8 => Some(CssColor::rgba(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            f32::from(byte(6)?) / 255.0,
        )),
        _ => None,
    }
}

fn split_args(args: &str) -> Vec<&str> {
    args.split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect()
}

fn parse_channel(tok: &str) -> Option<u8> {
    let v = if let Some(pct) = tok.strip_suffix('%') {
        pct.parse::<f64>().ok()? * 2.55
    } else {
        tok.parse::<f64>().ok()?
    };
    v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
}

fn parse_alpha(tok: &str) -> Option<f32> {
    let v = if let Some(pct) = tok.strip_suffix('%') {
        pct.parse::<f32>().ok()? / 100.0
    } else {
        tok.parse::<f32>().ok()?
    };
    v.is_finite().then(|| v.clamp(0.0, 1.0))
}

fn parse_rgb_args(args: &str) -> Option<CssColor> {
    let parts = split_args(args);
    let (r, g, b, a) = match parts.as_slice() {
        [r, g, b] => (r, g, b, None),
        [r, g, b, a] => (r, g, b, Some(a)),
        _ => return None,
    };
    let a = match a {
        Some(a) => parse_alpha(a)?,
        None => 1.0,
    };
    Some(CssColor::rgba(
        parse_channel(r)?,
        parse_channel(g)?,
        parse_channel(b)?,
        a,
    ))
}

fn parse_hsl_args(args: &str) -> Option<CssColor> {
    let parts = split_args(args);
    let (h, s, l, a) = match parts.as_slice() {
        [h, s, l] => (h, s, l, None),
        [h, s, l, a] => (h, s, l, Some(a)),
        _ => return None,
    };
    let h = h.trim_end_matches("deg").parse::<f64>().ok()?;
    let pct = |t: &str| -> Option<f64> {
        let v = t.trim_end_matches('%').parse::<f64>().ok()?;
        Some((v / 100.0).clamp(0.0, 1.0))
    };
    let a = match a {
        Some(a) => parse_alpha(a)?,
        None => 1.0,
    };
    Some(CssColor::from_hsl(
        (h / 360.0).rem_euclid(1.0),
        pct(s)?,
        pct(l)?,
        a,
    ))
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn named(name: &str) -> Option<CssColor> {
    let (r, g, b) = match name {
        "transparent" => return Some(CssColor::rgba(0, 0, 0, 0.0)),
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "purple" => (128, 0, 128),
        "orange" => (255, 165, 0),
        "pink" => (255, 192, 203),
        _ => return None,
    };
    Some(CssColor::rgba(r, g, b, 1.0))
}

#[cfg(test)]
#[path = "../../tests/unit/paint/color.rs"]
mod tests;
