#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn horizontal(n: usize) -> Vec<Point> {
    (0..n).map(|i| pt(f64::from(u32::try_from(i).unwrap()) * 10.0, 50.0)).collect()
}

fn tail_only() -> RibbonStyle {
    RibbonStyle { gradient: GradientPolicy::TailFade, ..RibbonStyle::default() }
}

// =============================================================
// Ribbon::from_points
// =============================================================

#[test]
fn fewer_than_two_points_builds_nothing() {
    let style = RibbonStyle::default();
    assert!(Ribbon::from_points::<Point>(&[], &style).is_none());
    assert!(Ribbon::from_points(&[pt(1.0, 1.0)], &style).is_none());
    assert!(build_ribbon_path(&[pt(1.0, 1.0)], &style).is_none());
}

#[test]
fn sides_pair_index_for_index_with_input() {
    let ribbon = Ribbon::from_points(&horizontal(5), &RibbonStyle::default()).unwrap();
    assert_eq!(ribbon.len(), 5);
    assert_eq!(ribbon.left.len(), ribbon.right.len());
    assert_eq!(ribbon.half_widths.len(), 5);
}

#[test]
fn horizontal_line_is_symmetric_about_input() {
    let input = horizontal(3);
    let ribbon = Ribbon::from_points(&input, &RibbonStyle::default()).unwrap();
    for (i, p) in input.iter().enumerate() {
        let l = ribbon.left[i];
        let r = ribbon.right[i];
        assert!(approx_eq(l.x, p.x) && approx_eq(r.x, p.x));
        assert!(approx_eq(p.y - l.y, r.y - p.y));
        assert!(approx_eq(p.y - l.y, ribbon.half_widths[i]));
    }
}

#[test]
fn left_side_is_counter_clockwise_of_travel() {
    // Travelling +x in screen space (y down), the left offset sits at smaller y.
    let ribbon = Ribbon::from_points(&horizontal(2), &RibbonStyle::default()).unwrap();
    assert!(ribbon.left[0].y < 50.0);
    assert!(ribbon.right[0].y > 50.0);
}

#[test]
fn first_half_width_is_half_initial_width() {
    let ribbon = Ribbon::from_points(&horizontal(3), &RibbonStyle::default()).unwrap();
    assert!(approx_eq(ribbon.half_widths[0], INITIAL_LINE_WIDTH / 2.0));
    assert!(approx_eq(ribbon.half_widths[1], INITIAL_LINE_WIDTH / 2.0 / LINE_WIDTH_REDUCTION_FACTOR));
}

#[test]
fn half_width_tapers_monotonically_to_floor() {
    let ribbon = Ribbon::from_points(&horizontal(40), &RibbonStyle::default()).unwrap();
    for pair in ribbon.half_widths.windows(2) {
        assert!(pair[1] <= pair[0]);
    }
    let floor = MIN_LINE_WIDTH / 2.0;
    assert!(ribbon.half_widths.iter().all(|&w| w >= floor - EPSILON));
    assert!(approx_eq(*ribbon.half_widths.last().unwrap(), floor));
}

#[test]
fn last_point_uses_final_segment_angle() {
    let input = [pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)];
    let ribbon = Ribbon::from_points(&input, &RibbonStyle::default()).unwrap();
    let half = ribbon.half_widths[2];
    // Final segment heads +y, so the left offset lies towards +x.
    assert!(point_approx_eq(ribbon.left[2], pt(10.0 + half, 10.0)));
    assert!(point_approx_eq(ribbon.right[2], pt(10.0 - half, 10.0)));
}

#[test]
fn coincident_points_do_not_panic() {
    let input = [pt(5.0, 5.0), pt(5.0, 5.0), pt(5.0, 5.0)];
    let ribbon = Ribbon::from_points(&input, &RibbonStyle::default()).unwrap();
    assert!(ribbon.left.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
}

// =============================================================
// outline
// =============================================================

#[test]
fn two_point_outline_is_a_quad() {
    let ribbon = Ribbon::from_points(&horizontal(2), &RibbonStyle::default()).unwrap();
    let path = ribbon.outline();
    assert_eq!(
        path,
        vec![
            PathSegment::MoveTo(ribbon.left[0]),
            PathSegment::LineTo(ribbon.left[1]),
            PathSegment::LineTo(ribbon.right[1]),
            PathSegment::LineTo(ribbon.right[0]),
            PathSegment::LineTo(ribbon.left[0]),
            PathSegment::Close,
        ]
    );
}

#[test]
fn three_point_outline_curves_through_middle() {
    let ribbon = Ribbon::from_points(&horizontal(3), &RibbonStyle::default()).unwrap();
    let path = ribbon.outline();
    assert_eq!(
        path,
        vec![
            PathSegment::MoveTo(ribbon.left[0]),
            PathSegment::QuadTo { ctrl: ribbon.left[1], to: ribbon.left[2] },
            PathSegment::LineTo(ribbon.right[2]),
            PathSegment::QuadTo { ctrl: ribbon.right[1], to: ribbon.right[0] },
            PathSegment::LineTo(ribbon.left[0]),
            PathSegment::Close,
        ]
    );
}

#[test]
fn longer_outline_ends_curves_on_midpoints() {
    let ribbon = Ribbon::from_points(&horizontal(5), &RibbonStyle::default()).unwrap();
    let path = ribbon.outline();
    assert_eq!(path[1], PathSegment::QuadTo { ctrl: ribbon.left[1], to: midpoint(&ribbon.left[1], &ribbon.left[2]) });
    assert_eq!(path[3], PathSegment::QuadTo { ctrl: ribbon.left[3], to: ribbon.left[4] });
    assert_eq!(path[4], PathSegment::LineTo(ribbon.right[4]));
    assert_eq!(path[5], PathSegment::QuadTo { ctrl: ribbon.right[3], to: midpoint(&ribbon.right[3], &ribbon.right[2]) });
    assert_eq!(path[7], PathSegment::QuadTo { ctrl: ribbon.right[1], to: ribbon.right[0] });
}

#[test]
fn outline_is_closed_back_at_start() {
    let ribbon = Ribbon::from_points(&horizontal(6), &RibbonStyle::default()).unwrap();
    let path = ribbon.outline();
    assert_eq!(path.first(), Some(&PathSegment::MoveTo(ribbon.left[0])));
    assert_eq!(path[path.len() - 2], PathSegment::LineTo(ribbon.left[0]));
    assert_eq!(path.last(), Some(&PathSegment::Close));
}

// =============================================================
// gradient
// =============================================================

#[test]
fn fade_both_ends_has_four_stops() {
    let stops = GradientPolicy::FadeBothEnds.stops();
    let pairs: Vec<(f64, f64)> = stops.iter().map(|s| (s.offset, s.alpha)).collect();
    assert_eq!(pairs, vec![(0.0, 0.0), (0.3, 0.5), (0.99, 0.5), (1.0, 0.0)]);
}

#[test]
fn tail_fade_has_two_stops() {
    let stops = GradientPolicy::TailFade.stops();
    let pairs: Vec<(f64, f64)> = stops.iter().map(|s| (s.offset, s.alpha)).collect();
    assert_eq!(pairs, vec![(0.0, 0.0), (0.3, 0.5)]);
}

#[test]
fn default_policy_fades_both_ends() {
    assert_eq!(GradientPolicy::default(), GradientPolicy::FadeBothEnds);
}

#[test]
fn gradient_runs_along_left_side() {
    let path = build_ribbon_path(&horizontal(4), &tail_only()).unwrap();
    let ribbon = Ribbon::from_points(&horizontal(4), &tail_only()).unwrap();
    assert_eq!(path.gradient.from, ribbon.left[0]);
    assert_eq!(path.gradient.to, ribbon.left[3]);
    assert_eq!(path.gradient.stops.len(), 2);
}

#[test]
fn gradient_css_color_uses_rgb_and_alpha() {
    let gradient = Ribbon::from_points(&horizontal(2), &RibbonStyle::default())
        .unwrap()
        .gradient(&RibbonStyle::default())
        .unwrap();
    assert_eq!(gradient.css_color(GradientStop { offset: 0.3, alpha: 0.5 }), "rgba(255, 0, 0, 0.5)");
    assert_eq!(gradient.css_color(GradientStop { offset: 0.0, alpha: 0.0 }), "rgba(255, 0, 0, 0)");
}

#[test]
fn policy_serializes_snake_case() {
    assert_eq!(serde_json::to_string(&GradientPolicy::TailFade).unwrap(), "\"tail_fade\"");
    let p: GradientPolicy = serde_json::from_str("\"fade_both_ends\"").unwrap();
    assert_eq!(p, GradientPolicy::FadeBothEnds);
}
