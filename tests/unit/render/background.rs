use super::*;
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::PfpError;
use crate::settings::BackgroundShape;

fn settings(size: u32) -> GenerationSettings {
    GenerationSettings {
        output_size: size,
        ..GenerationSettings::default()
    }
}

fn render(s: &GenerationSettings, image: Option<&Bitmap>) -> Surface {
    let mut surface = Surface::new(s.output_size, s.output_size).unwrap();
    render_background(&mut surface, s, image).unwrap();
    surface
}

#[test]
fn default_circle_is_brand_coloured_and_clipped() {
    let surface = render(&settings(64), None);
    assert_eq!(surface.pixel(32, 32).to_array(), [241, 51, 127, 255]);
    assert_eq!(surface.pixel(0, 0), Rgba8Premul::transparent());
    assert_eq!(surface.pixel(63, 63), Rgba8Premul::transparent());
}

#[test]
fn rect_clip_follows_scale_and_anchor() {
    let s = GenerationSettings {
        background_shape: BackgroundShape::Rect,
        background_scale: 0.5,
        ..settings(64)
    };
    let surface = render(&s, None);
    assert_eq!(surface.pixel(32, 48).a, 255);
    assert_eq!(surface.pixel(32, 10), Rgba8Premul::transparent());
    assert_eq!(surface.pixel(5, 48), Rgba8Premul::transparent());
}

#[test]
fn background_border_hugs_the_shape_edge() {
    let s = GenerationSettings {
        background_shape: BackgroundShape::Rect,
        border: true,
        border_thickness: 8.0,
        border_color: "#FFFFFF".into(),
        ..settings(64)
    };
    let surface = render(&s, None);
    assert_eq!(surface.pixel(0, 32).to_array(), [255, 255, 255, 255]);
    assert_eq!(surface.pixel(6, 32).to_array(), [255, 255, 255, 255]);
    assert_eq!(surface.pixel(12, 32).to_array(), [241, 51, 127, 255]);
    assert_eq!(surface.pixel(32, 63).to_array(), [255, 255, 255, 255]);
}

#[test]
fn gradient_brand_colour_is_rasterised() {
    let s = GenerationSettings {
        background_shape: BackgroundShape::Rect,
        brand_color: "linear-gradient(90deg, rgb(0, 0, 0) 0%, rgb(255, 255, 255) 100%)".into(),
        ..settings(64)
    };
    let surface = render(&s, None);
    assert!(surface.pixel(1, 32).r < 20);
    assert!(surface.pixel(62, 32).r > 235);
}

#[test]
fn unresolvable_fill_paints_black() {
    let s = GenerationSettings {
        background_shape: BackgroundShape::Rect,
        brand_color: "definitely-not-a-colour".into(),
        ..settings(64)
    };
    let surface = render(&s, None);
    assert_eq!(surface.pixel(32, 32).to_array(), [0, 0, 0, 255]);
}

#[test]
fn background_image_covers_the_fill() {
    let img = Bitmap::from_rgba8(1, 1, vec![0, 0, 255, 255]).unwrap();
    let surface = render(&settings(64), Some(&img));
    assert_eq!(surface.pixel(32, 32).to_array(), [0, 0, 255, 255]);
}

#[test]
fn unknown_shape_fails_before_drawing() {
    let s = GenerationSettings {
        background_shape: BackgroundShape::Unknown("TRIANGLE".into()),
        ..settings(64)
    };
    let mut surface = Surface::new(64, 64).unwrap();
    let err = render_background(&mut surface, &s, None).unwrap_err();
    assert!(matches!(err, PfpError::Config(_)));
    assert!(surface.data().iter().all(|&b| b == 0));
}
