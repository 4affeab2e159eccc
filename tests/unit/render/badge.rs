use super::*;
use crate::render::text::system_sans;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn arc_scales_with_canvas() {
    let arc = BadgeArc::for_canvas(1024.0);
    assert!(close(arc.radius, 472.0));
    assert!(close(arc.thickness, 472.0 * 0.175));
    assert!(close(arc.font_size, 472.0 * 0.175 * 0.9));
    let half = BadgeArc::for_canvas(512.0);
    assert!(close(half.radius, 236.0));
}

#[test]
fn arc_centre_is_bottom_left() {
    let arc = BadgeArc::for_canvas(1024.0);
    let p = arc.point_at(arc.center_angle);
    assert!(p.x < 512.0 && p.y > 512.0);
    assert!(close(512.0 - p.x, p.y - 512.0));
}

#[test]
fn slots_are_contiguous_and_centred() {
    let arc = BadgeArc::for_canvas(1024.0);
    let layout = BadgeLayout::compute(&arc, &[10.0, 20.0, 30.0], 1.0);
    assert!(close(layout.text_span, 60.0 / arc.radius));
    assert!(close(layout.chip_span, layout.text_span * 1.5));
    assert_eq!(layout.slots.len(), 3);
    for pair in layout.slots.windows(2) {
        assert!(close(pair[0].angle + pair[0].span, pair[1].angle));
    }
    let first = layout.slots[0];
    let last = layout.slots[2];
    assert!(close(
        (first.angle + last.angle + last.span) / 2.0,
        arc.center_angle
    ));
    assert!(close(layout.chip_start, arc.center_angle - layout.chip_span / 2.0));
}

#[test]
fn letter_spacing_strictly_widens_the_span() {
    let arc = BadgeArc::for_canvas(1024.0);
    let advances = [31.0, 40.5, 28.0, 44.0, 30.0];
    let spans: Vec<f64> = [0.25, 0.5, 1.0, 1.5, 2.0]
        .iter()
        .map(|&s| BadgeLayout::compute(&arc, &advances, s).chip_span)
        .collect();
    assert!(spans.windows(2).all(|w| w[1] > w[0]), "{spans:?}");
}

#[test]
fn chip_gradient_stops_are_ordered() {
    let arc = BadgeArc::for_canvas(256.0);
    let layout = BadgeLayout::compute(&arc, &[20.0; 8], 1.0);
    let g = layout.chip_gradient(&arc, CssColor::rgba(5, 118, 66, 1.0));
    let offsets: Vec<f64> = g.stops().iter().map(|s| s.offset).collect();
    assert_eq!(offsets.len(), 5);
    assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(g.stops()[0].color.a, 1.0);
    assert_eq!(g.stops()[2].color.a, 0.0);
    assert_eq!(g.stops()[4].color.a, 1.0);
}

#[test]
fn glyph_is_upright_at_the_bottom_of_the_ring() {
    let arc = BadgeArc::for_canvas(1024.0);
    let slot = GlyphSlot {
        angle: FRAC_PI_2 - 0.05,
        span: 0.1,
    };
    let t = glyph_transform(&arc, &slot, 40.0);
    let a = t * Point::new(0.0, 0.0);
    let b = t * Point::new(10.0, 0.0);
    assert!((b.x - a.x - 10.0).abs() < 1e-9);
    assert!((b.y - a.y).abs() < 1e-9);
    // Glyph centred on the bottom of the ring.
    let centre = t * Point::new(20.0, -arc.font_size * 0.35);
    assert!((centre.x - 512.0).abs() < 1e-9);
    assert!((centre.y - (512.0 + arc.radius)).abs() < 1e-9);
}

fn badge_settings(size: u32) -> GenerationSettings {
    GenerationSettings {
        output_size: size,
        badge_enabled: true,
        ..GenerationSettings::default()
    }
}

#[test]
fn chip_is_drawn_without_a_font() {
    let s = badge_settings(128);
    let mut surface = Surface::new(128, 128).unwrap();
    draw_badge(&mut surface, &s, None).unwrap();

    let arc = BadgeArc::for_canvas(128.0);
    let p = arc.point_at(arc.center_angle);
    let px = surface.pixel(p.x as u32, p.y as u32);
    assert_eq!(px.a, 255);
    assert!(px.r.abs_diff(5) <= 2 && px.g.abs_diff(118) <= 2 && px.b.abs_diff(66) <= 2);

    let opposite = arc.point_at(arc.center_angle + std::f64::consts::PI);
    assert_eq!(surface.pixel(opposite.x as u32, opposite.y as u32).a, 0);
}

#[test]
fn text_is_drawn_over_the_chip_when_a_font_exists() {
    let Some(face) = system_sans(true) else {
        eprintln!("skipping: no system sans-serif font");
        return;
    };
    let s = badge_settings(512);
    let mut surface = Surface::new(512, 512).unwrap();
    draw_badge(&mut surface, &s, Some(&face)).unwrap();

    let arc = BadgeArc::for_canvas(512.0);
    let p = arc.point_at(arc.center_angle);
    let r = (arc.thickness / 2.0) as i64;
    let mut found_text = false;
    for dy in -r..=r {
        for dx in -r..=r {
            let px = surface.pixel((p.x as i64 + dx) as u32, (p.y as i64 + dy) as u32);
            if px.r > 200 && px.g > 200 && px.b > 200 {
                found_text = true;
            }
        }
    }
    assert!(found_text);
}
