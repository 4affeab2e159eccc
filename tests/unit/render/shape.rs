use kurbo::Shape as _;

use super::*;
use crate::foundation::error::PfpError;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn default_circle_fills_canvas() {
    let g = ShapeGeometry::background(&BackgroundShape::Circle, 1024.0, 1.0, 1.0).unwrap();
    assert_eq!(
        g,
        ShapeGeometry::Circle {
            center: Point::new(512.0, 512.0),
            radius: 512.0
        }
    );
}

#[test]
fn circle_anchor_moves_centre_vertically() {
    let ShapeGeometry::Circle { center, radius } =
        ShapeGeometry::background(&BackgroundShape::Circle, 1000.0, 0.5, 0.5).unwrap()
    else {
        panic!("expected circle");
    };
    assert!(close(radius, 250.0));
    assert!(close(center.y, 1000.0));
    assert!(close(center.x, 500.0));
}

#[test]
fn rect_box_formula() {
    let ShapeGeometry::Rect(r) =
        ShapeGeometry::background(&BackgroundShape::Rect, 1000.0, 0.7, 1.0).unwrap()
    else {
        panic!("expected rect");
    };
    assert!(close(r.x0, 150.0));
    assert!(close(r.y0, 300.0));
    assert!(close(r.width(), 700.0));
    assert!(close(r.height(), 700.0));
}

#[test]
fn circle_and_rect_share_top_edge() {
    for (scale, pos) in [(1.0, 1.0), (0.75, 1.08), (0.8, 0.8), (1.2, 0.3)] {
        let ShapeGeometry::Circle { center, radius } =
            ShapeGeometry::background(&BackgroundShape::Circle, 512.0, scale, pos).unwrap()
        else {
            panic!("expected circle");
        };
        let ShapeGeometry::Rect(r) =
            ShapeGeometry::background(&BackgroundShape::Rect, 512.0, scale, pos).unwrap()
        else {
            panic!("expected rect");
        };
        assert!(close(center.y - radius, r.y0), "scale {scale} pos {pos}");
    }
}

#[test]
fn rounded_rect_radius_scales_with_canvas() {
    let ShapeGeometry::RoundedRect { radius, .. } =
        ShapeGeometry::background(&BackgroundShape::RoundedRect, 512.0, 1.0, 1.0).unwrap()
    else {
        panic!("expected rounded rect");
    };
    assert!(close(radius, 36.0));
}

#[test]
fn unknown_shape_is_a_config_error() {
    let shape = BackgroundShape::Unknown("TRIANGLE".into());
    assert!(matches!(
        ShapeGeometry::background(&shape, 100.0, 1.0, 1.0),
        Err(PfpError::Config(_))
    ));
    assert!(matches!(
        ShapeGeometry::full_canvas(&shape, 100.0),
        Err(PfpError::Config(_))
    ));
}

#[test]
fn full_canvas_masks() {
    assert_eq!(
        ShapeGeometry::full_canvas(&BackgroundShape::Rect, 256.0).unwrap(),
        None
    );
    assert_eq!(
        ShapeGeometry::full_canvas(&BackgroundShape::Circle, 256.0).unwrap(),
        Some(ShapeGeometry::Circle {
            center: Point::new(128.0, 128.0),
            radius: 128.0
        })
    );
    let Some(ShapeGeometry::RoundedRect { rect, radius }) =
        ShapeGeometry::full_canvas(&BackgroundShape::RoundedRect, 2048.0).unwrap()
    else {
        panic!("expected rounded rect");
    };
    assert_eq!(rect, Rect::new(0.0, 0.0, 2048.0, 2048.0));
    assert!(close(radius, 144.0));
}

#[test]
fn border_line_is_inset_by_half_thickness() {
    let shape = ShapeGeometry::background(&BackgroundShape::Rect, 200.0, 0.5, 1.0).unwrap();
    let ShapeGeometry::Rect(outer) = shape else {
        panic!("expected rect");
    };
    let ShapeGeometry::Rect(line) = shape.border_line(16.0) else {
        panic!("expected rect");
    };
    assert!(close(line.x0 - outer.x0, 8.0));
    assert!(close(line.y0 - outer.y0, 8.0));
    assert!(close(outer.x1 - line.x1, 8.0));
    assert!(close(outer.y1 - line.y1, 8.0));

    // The painted stroke reaches exactly the unstroked edge.
    let bbox = shape.border_line(16.0).stroke_outline(16.0).bounding_box();
    assert!((bbox.x0 - outer.x0).abs() < 0.01);
    assert!((bbox.y1 - outer.y1).abs() < 0.01);
}

#[test]
fn inset_never_goes_negative() {
    let c = ShapeGeometry::Circle {
        center: Point::new(0.0, 0.0),
        radius: 3.0,
    };
    assert_eq!(
        c.inset(10.0),
        ShapeGeometry::Circle {
            center: Point::new(0.0, 0.0),
            radius: 0.0
        }
    );
}
