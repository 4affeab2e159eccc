//! Mask shape geometry.
//!
//! Everything here is pure geometry in canvas pixels (y down); the stages turn it into paths.

use kurbo::{Circle, RoundedRect, Shape as _, Stroke, StrokeOpts};

use crate::foundation::core::{BezPath, Point, Rect, reference_scale};
use crate::foundation::error::PfpResult;
use crate::settings::{BackgroundShape, unknown_shape_error};

/// Corner radius of `ROUNDEDRECT` at the 1024px reference size.
pub const ROUNDED_RECT_RADIUS: f64 = 72.0;

const PATH_TOLERANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeGeometry {
    Circle { center: Point, radius: f64 },
    Rect(Rect),
    RoundedRect { rect: Rect, radius: f64 },
}

impl ShapeGeometry {
    /// Geometry of the background mask on a `side x side` canvas.
    ///
    /// `scale` is the shape size as a fraction of the canvas side and `position` the vertical
    /// anchor (1.0 sits the shape on the bottom edge). Both shapes share the same top edge
    /// for equal parameters.
    pub fn background(
        shape: &BackgroundShape,
        side: f64,
        scale: f64,
        position: f64,
    ) -> PfpResult<Self> {
        let extent = side * scale;
        let geom = match shape {
            BackgroundShape::Circle => Self::Circle {
                center: Point::new(side / 2.0, side - extent / 2.0 * (2.0 * position - 1.0)),
                radius: extent / 2.0,
            },
            BackgroundShape::Rect => Self::Rect(square_box(side, extent, position)),
            BackgroundShape::RoundedRect => Self::RoundedRect {
                rect: square_box(side, extent, position),
                radius: ROUNDED_RECT_RADIUS * reference_scale(side),
            },
            BackgroundShape::Unknown(name) => return Err(unknown_shape_error(name)),
        };
        Ok(geom)
    }

    /// Geometry of the final image mask: the shape at full canvas size. `RECT` needs no mask.
    pub fn full_canvas(shape: &BackgroundShape, side: f64) -> PfpResult<Option<Self>> {
        Ok(match shape {
            BackgroundShape::Rect => None,
            _ => Some(Self::background(shape, side, 1.0, 1.0)?),
        })
    }

    /// The same shape shrunk by `inset` on every side.
    pub fn inset(self, inset: f64) -> Self {
        match self {
            Self::Circle { center, radius } => Self::Circle {
                center,
                radius: (radius - inset).max(0.0),
            },
            Self::Rect(r) => Self::Rect(inset_rect(r, inset)),
            Self::RoundedRect { rect, radius } => Self::RoundedRect {
                rect: inset_rect(rect, inset),
                radius: (radius - inset).max(0.0),
            },
        }
    }

    /// Centre-line of a border of width `thickness` whose outer edge follows this shape.
    pub fn border_line(self, thickness: f64) -> Self {
        self.inset(thickness / 2.0)
    }

    pub fn to_path(&self) -> BezPath {
        match *self {
            Self::Circle { center, radius } => {
                Circle::new(center, radius).to_path(PATH_TOLERANCE)
            }
            Self::Rect(r) => r.to_path(PATH_TOLERANCE),
            Self::RoundedRect { rect, radius } => {
                let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
                RoundedRect::from_rect(rect, r).to_path(PATH_TOLERANCE)
            }
        }
    }

    /// Fillable outline of this shape stroked with `width`, centred on the shape edge.
    pub fn stroke_outline(&self, width: f64) -> BezPath {
        stroke_outline(&self.to_path(), width)
    }
}

/// Outline of `path` stroked with `width`; fill it non-zero.
pub fn stroke_outline(path: &BezPath, width: f64) -> BezPath {
    kurbo::stroke(
        path.iter(),
        &Stroke::new(width),
        &StrokeOpts::default(),
        PATH_TOLERANCE,
    )
}

fn square_box(side: f64, extent: f64, position: f64) -> Rect {
    let left = (side - extent) / 2.0;
    let top = side - extent * position;
    Rect::new(left, top, left + extent, top + extent)
}

fn inset_rect(r: Rect, inset: f64) -> Rect {
    let cx = r.center();
    let half_w = (r.width() / 2.0 - inset).max(0.0);
    let half_h = (r.height() / 2.0 - inset).max(0.0);
    Rect::new(cx.x - half_w, cx.y - half_h, cx.x + half_w, cx.y + half_h)
}

#[cfg(test)]
#[path = "../../tests/unit/render/shape.rs"]
mod tests;
