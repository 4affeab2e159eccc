use super::*;

#[test]
fn parses_hex_forms() {
    assert_eq!(
        CssColor::parse("#F1337F").unwrap(),
        CssColor::rgba(241, 51, 127, 1.0)
    );
    assert_eq!(
        CssColor::parse("#fff").unwrap(),
        CssColor::rgba(255, 255, 255, 1.0)
    );
    let c = CssColor::parse("#00000080").unwrap();
    assert_eq!((c.r, c.g, c.b), (0, 0, 0));
    assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    assert!(CssColor::parse("#12345").is_err());
    assert!(CssColor::parse("#zzzzzz").is_err());
}

#[test]
fn parses_rgb_functions() {
    assert_eq!(
        CssColor::parse("rgba(255, 255, 255, 1)").unwrap(),
        CssColor::rgba(255, 255, 255, 1.0)
    );
    assert_eq!(
        CssColor::parse("rgb(10 20 30 / 50%)").unwrap(),
        CssColor::rgba(10, 20, 30, 0.5)
    );
    assert_eq!(
        CssColor::parse("rgb(100%, 0%, 0%)").unwrap(),
        CssColor::rgba(255, 0, 0, 1.0)
    );
    assert!(CssColor::parse("rgb(1, 2)").is_err());
}

#[test]
fn parses_hsl_and_names() {
    assert_eq!(
        CssColor::parse("hsl(0, 100%, 50%)").unwrap(),
        CssColor::rgba(255, 0, 0, 1.0)
    );
    assert_eq!(
        CssColor::parse("White").unwrap(),
        CssColor::rgba(255, 255, 255, 1.0)
    );
    assert_eq!(CssColor::parse("transparent").unwrap().a, 0.0);
    assert!(CssColor::parse("not-a-color").is_err());
}

#[test]
fn lighten_and_darken_move_lightness() {
    let base = CssColor::parse("#F1337F").unwrap();
    let (_, _, l) = base.to_hsl();
    let (_, _, ll) = base.lighten(32.0).to_hsl();
    let (_, _, ld) = base.darken(24.0).to_hsl();
    assert!(ll > l);
    assert!(ld < l);
    assert_eq!(
        CssColor::rgba(0, 0, 0, 1.0).lighten(100.0),
        CssColor::rgba(255, 255, 255, 1.0)
    );
    assert_eq!(
        CssColor::rgba(255, 255, 255, 1.0).darken(100.0),
        CssColor::rgba(0, 0, 0, 1.0)
    );
}

#[test]
fn hsl_roundtrip_is_stable() {
    let c = CssColor::rgba(241, 51, 127, 1.0);
    let (h, s, l) = c.to_hsl();
    assert_eq!(CssColor::from_hsl(h, s, l, 1.0), c);
}

#[test]
fn rgb_string_matches_tinycolor_format() {
    assert_eq!(
        CssColor::rgba(241, 51, 127, 1.0).to_rgb_string(),
        "rgb(241, 51, 127)"
    );
    assert_eq!(
        CssColor::rgba(1, 2, 3, 0.456).to_rgb_string(),
        "rgba(1, 2, 3, 0.46)"
    );
}

#[test]
fn unresolvable_color_falls_back_to_black() {
    assert_eq!(resolve_color("linear-gradient(oops"), Rgba8Premul::black());
    assert_eq!(
        resolve_color("#ffffff"),
        Rgba8Premul::from_straight_rgba(255, 255, 255, 255)
    );
}
