use super::*;

fn px(buf: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
}

fn expect_gradient(style: FillStyle) -> CanvasGradient {
    match style {
        FillStyle::Gradient(g) => g,
        FillStyle::Color(s) => panic!("expected gradient, got colour {s}"),
    }
}

#[test]
fn three_stop_linear_keeps_offsets() {
    let g = expect_gradient(css_gradient_to_fill(
        "linear-gradient(45deg, rgba(255, 0, 0, 1) 0%, rgb(0, 255, 0) 25%, rgba(0,0,255,0.5) 100%)",
        100.0,
        100.0,
    ));
    let offsets: Vec<f64> = g.stops().iter().map(|s| s.offset).collect();
    assert_eq!(offsets, vec![0.0, 0.25, 1.0]);
    assert_eq!(g.stops()[1].color, CssColor::rgba(0, 255, 0, 1.0));
    assert!(matches!(g.geometry(), GradientGeometry::Linear { .. }));
}

#[test]
fn multiline_descriptor_parses() {
    let g = expect_gradient(css_gradient_to_fill(
        "linear-gradient(0deg,\n        rgb(250, 200, 220) 0%,\n        rgb(241, 51, 127) 50%,\n        rgb(150, 10, 60) 100%\n      )",
        64.0,
        64.0,
    ));
    assert_eq!(g.stops().len(), 3);
}

#[test]
fn non_gradient_strings_pass_through() {
    match css_gradient_to_fill("#F1337F", 10.0, 10.0) {
        FillStyle::Color(s) => assert_eq!(s, "#F1337F"),
        FillStyle::Gradient(_) => panic!("plain colour parsed as gradient"),
    }
    match css_gradient_to_fill("linear-gradient(rgb(0,0,0) 0%", 10.0, 10.0) {
        FillStyle::Color(s) => assert_eq!(s, "linear-gradient(rgb(0,0,0) 0%"),
        FillStyle::Gradient(_) => panic!("unterminated descriptor parsed as gradient"),
    }
}

#[test]
fn bad_stops_are_skipped() {
    let g = expect_gradient(css_gradient_to_fill(
        "linear-gradient(90deg, #fff 0%, rgb(1, 2, 3) 50%, rgb(4, 5, 6), rgb(7, 8, 9) 100%)",
        10.0,
        10.0,
    ));
    let offsets: Vec<f64> = g.stops().iter().map(|s| s.offset).collect();
    assert_eq!(offsets, vec![0.5, 1.0]);
}

#[test]
fn stops_keep_input_order() {
    let g = expect_gradient(css_gradient_to_fill(
        "radial-gradient(rgb(0,0,0) 80%, rgb(255,255,255) 20%)",
        10.0,
        10.0,
    ));
    let offsets: Vec<f64> = g.stops().iter().map(|s| s.offset).collect();
    assert_eq!(offsets, vec![0.8, 0.2]);
}

#[test]
fn radial_ignores_angle_and_centres_on_canvas() {
    let g = expect_gradient(css_gradient_to_fill(
        "radial-gradient(30deg, rgb(0,0,0) 0%, rgb(255,255,255) 100%)",
        200.0,
        100.0,
    ));
    assert_eq!(g.stops().len(), 2);
    assert_eq!(
        g.geometry(),
        GradientGeometry::Radial {
            center: Point::new(100.0, 50.0),
            radius: 50.0
        }
    );
}

#[test]
fn linear_endpoints_follow_css_angles() {
    let (s, e) = linear_endpoints(0.0, 100.0, 100.0);
    assert!((s.y - 100.0).abs() < 1e-9 && e.y.abs() < 1e-9);
    assert!((s.x - 50.0).abs() < 1e-9);

    let (s, e) = linear_endpoints(90.0, 100.0, 40.0);
    assert!(s.x.abs() < 1e-9 && (e.x - 100.0).abs() < 1e-9);
    assert!((s.y - 20.0).abs() < 1e-9);
}

#[test]
fn linear_raster_runs_bottom_to_top_at_zero_degrees() {
    let g = expect_gradient(css_gradient_to_fill(
        "linear-gradient(0deg, rgb(255, 255, 255) 0%, rgb(0, 0, 0) 100%)",
        4.0,
        100.0,
    ));
    let buf = g.rasterize(4, 100);
    let bottom = px(&buf, 4, 1, 99);
    let top = px(&buf, 4, 1, 0);
    assert!(bottom[0] > 250);
    assert!(top[0] < 5);
    assert_eq!(bottom[3], 255);
}

#[test]
fn equal_offsets_make_hard_edges() {
    let g = expect_gradient(css_gradient_to_fill(
        "radial-gradient(rgba(255, 255, 255, 1) 0%, rgba(255, 255, 255, 1) 50%, rgb(255, 0, 0) 50%, rgb(255, 0, 0) 100%)",
        100.0,
        100.0,
    ));
    let buf = g.rasterize(100, 100);
    // 20px from centre: inside the white disc. 30px: red ring.
    assert_eq!(px(&buf, 100, 70, 50), [255, 255, 255, 255]);
    assert_eq!(px(&buf, 100, 80, 50), [255, 0, 0, 255]);
}

#[test]
fn conic_wraps_from_start_angle() {
    let mut g = CanvasGradient::conic(Point::new(50.0, 50.0), 0.0);
    g.add_color_stop(0.0, CssColor::rgba(0, 0, 0, 1.0));
    g.add_color_stop(0.5, CssColor::rgba(0, 0, 0, 1.0));
    g.add_color_stop(0.5, CssColor::rgba(255, 255, 255, 1.0));
    g.add_color_stop(1.0, CssColor::rgba(255, 255, 255, 1.0));
    let buf = g.rasterize(100, 100);
    // Just below +x (y down) is early in the sweep; just above it is late.
    assert_eq!(px(&buf, 100, 90, 55)[0], 0);
    assert_eq!(px(&buf, 100, 90, 44)[0], 255);
}

#[test]
fn empty_gradient_is_transparent() {
    let g = CanvasGradient::linear(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
    assert!(g.rasterize(3, 3).iter().all(|&b| b == 0));
}

#[test]
fn translucent_stops_are_premultiplied() {
    let mut g = CanvasGradient::linear(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    g.add_color_stop(0.0, CssColor::rgba(255, 255, 255, 0.5));
    let buf = g.rasterize(2, 1);
    assert_eq!(px(&buf, 2, 0, 0), [128, 128, 128, 128]);
}
