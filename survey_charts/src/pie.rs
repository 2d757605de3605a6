//! Pie and donut layouts.
//!
//! Angles are in radians, measured in drawing coordinates (y grows downward),
//! so increasing angles go clockwise. The first slice starts at 12 o'clock.

use log::debug;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::config::*;

/// Angle of the first slice (12 o'clock).
pub const START_ANGLE: f64 = -FRAC_PI_2;

/// Distance of the label anchor from the center, as a fraction of the radius.
pub const LABEL_RADIUS_RATIO: f64 = 0.6;

/// One wedge of a pie or donut chart.
#[derive(PartialEq, Debug, Clone)]
pub struct Slice {
    pub label: String,
    pub value: u64,
    /// Share of the total, in `(0, 1]`.
    pub fraction: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    /// SVG path data of the closed wedge.
    pub path: String,
    pub label_point: Point,
}

impl Slice {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Lays out a pie centered at `(radius, radius)`, so it fits in a `2r x 2r` box.
///
/// Zero buckets are skipped. If nothing is left, the result is empty and the
/// caller should render its "no data" state.
///
/// ```
/// use survey_charts::{layout_pie, DemographicBreakdown};
///
/// let b = DemographicBreakdown::from_buckets("sesso", &[("F", 30), ("M", 10)]);
/// let slices = layout_pie(&b, 100.0)?;
/// assert_eq!(slices.len(), 2);
/// assert!((slices[0].fraction - 0.75).abs() < 1e-12);
/// # Ok::<(), survey_charts::LayoutError>(())
/// ```
pub fn layout_pie(
    breakdown: &DemographicBreakdown,
    radius: f64,
) -> Result<Vec<Slice>, LayoutError> {
    layout_pie_at(breakdown, Point::new(radius, radius), radius)
}

pub fn layout_pie_at(
    breakdown: &DemographicBreakdown,
    center: Point,
    radius: f64,
) -> Result<Vec<Slice>, LayoutError> {
    check_radius(radius)?;
    let slices = walk(breakdown, |label, value, fraction, start, end| {
        let bisector = (start + end) / 2.0;
        Slice {
            label: label.to_string(),
            value,
            fraction,
            start_angle: start,
            end_angle: end,
            path: wedge_path(center, radius, start, end),
            label_point: center.polar(radius * LABEL_RADIUS_RATIO, bisector),
        }
    });
    debug!(
        "layout_pie: {} slices for breakdown {:?}",
        slices.len(),
        breakdown.name
    );
    Ok(slices)
}

/// Lays out a donut: the same angles as [`layout_pie_at`], drawn as annular sectors.
/// Labels are anchored halfway between the two radii.
pub fn layout_donut(
    breakdown: &DemographicBreakdown,
    center: Point,
    outer_radius: f64,
    inner_radius: f64,
) -> Result<Vec<Slice>, LayoutError> {
    check_radius(outer_radius)?;
    if !inner_radius.is_finite() || inner_radius < 0.0 || inner_radius >= outer_radius {
        return Err(LayoutError::InvalidDonutRadii {
            outer: outer_radius,
            inner: inner_radius,
        });
    }
    let mid = (outer_radius + inner_radius) / 2.0;
    Ok(walk(breakdown, |label, value, fraction, start, end| Slice {
        label: label.to_string(),
        value,
        fraction,
        start_angle: start,
        end_angle: end,
        path: annular_path(center, outer_radius, inner_radius, start, end),
        label_point: center.polar(mid, (start + end) / 2.0),
    }))
}

fn check_radius(radius: f64) -> Result<(), LayoutError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidRadius(radius))
    }
}

// Walks the non-zero buckets in order. Angles come from the running integer sum,
// so the last slice ends exactly one turn after START_ANGLE. Sums saturate at u64::MAX.
fn walk<F>(breakdown: &DemographicBreakdown, mut make: F) -> Vec<Slice>
where
    F: FnMut(&str, u64, f64, f64, f64) -> Slice,
{
    let entries: Vec<&(String, u64)> =
        breakdown.buckets.iter().filter(|(_, v)| *v > 0).collect();
    let total: u64 = entries.iter().fold(0, |acc, (_, v)| acc.saturating_add(*v));
    if total == 0 {
        return Vec::new();
    }
    let mut slices = Vec::with_capacity(entries.len());
    let mut cumulative: u64 = 0;
    let mut start = START_ANGLE;
    for (label, value) in entries {
        cumulative = cumulative.saturating_add(*value);
        let end = START_ANGLE + (cumulative as f64 / total as f64) * TAU;
        let fraction = *value as f64 / total as f64;
        slices.push(make(label, *value, fraction, start, end));
        start = end;
    }
    slices
}

fn large_arc(start: f64, end: f64) -> u8 {
    if end - start > PI {
        1
    } else {
        0
    }
}

fn fmt_point(p: Point) -> String {
    format!("{:.2},{:.2}", p.x, p.y)
}

fn wedge_path(center: Point, r: f64, start: f64, end: f64) -> String {
    let p1 = center.polar(r, start);
    if end - start >= TAU - 1e-9 {
        // A single arc cannot close on its starting point: draw two halves.
        let half = center.polar(r, start + PI);
        return format!(
            "M{} L{} A{r:.2},{r:.2} 0 1,1 {} A{r:.2},{r:.2} 0 1,1 {} Z",
            fmt_point(center),
            fmt_point(p1),
            fmt_point(half),
            fmt_point(p1),
            r = r
        );
    }
    let p2 = center.polar(r, end);
    format!(
        "M{} L{} A{r:.2},{r:.2} 0 {},1 {} Z",
        fmt_point(center),
        fmt_point(p1),
        large_arc(start, end),
        fmt_point(p2),
        r = r
    )
}

fn annular_path(center: Point, outer: f64, inner: f64, start: f64, end: f64) -> String {
    let o1 = center.polar(outer, start);
    let i1 = center.polar(inner, start);
    if end - start >= TAU - 1e-9 {
        let o_half = center.polar(outer, start + PI);
        let i_half = center.polar(inner, start + PI);
        return format!(
            "M{} A{ro:.2},{ro:.2} 0 1,1 {} A{ro:.2},{ro:.2} 0 1,1 {} Z M{} A{ri:.2},{ri:.2} 0 1,0 {} A{ri:.2},{ri:.2} 0 1,0 {} Z",
            fmt_point(o1),
            fmt_point(o_half),
            fmt_point(o1),
            fmt_point(i1),
            fmt_point(i_half),
            fmt_point(i1),
            ro = outer,
            ri = inner
        );
    }
    let o2 = center.polar(outer, end);
    let i2 = center.polar(inner, end);
    let large = large_arc(start, end);
    format!(
        "M{} A{ro:.2},{ro:.2} 0 {large},1 {} L{} A{ri:.2},{ri:.2} 0 {large},0 {} Z",
        fmt_point(o1),
        fmt_point(o2),
        fmt_point(i2),
        fmt_point(i1),
        ro = outer,
        ri = inner,
        large = large
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn breakdown(buckets: &[(&str, u64)]) -> DemographicBreakdown {
        DemographicBreakdown::from_buckets("test", buckets)
    }

    #[test]
    fn angles_sum_to_a_full_turn() {
        let b = breakdown(&[("18-24", 7), ("25-34", 13), ("35-44", 3), ("45+", 1)]);
        let slices = layout_pie(&b, 80.0).unwrap();
        assert_eq!(slices.len(), 4);
        let sum: f64 = slices.iter().map(|s| s.sweep()).sum();
        assert!((sum - TAU).abs() < EPS, "sum was {}", sum);
        assert!((slices[0].start_angle - START_ANGLE).abs() < EPS);
        for w in slices.windows(2) {
            assert_eq!(w[1].start_angle, w[0].end_angle);
        }
    }

    #[test]
    fn slices_follow_insertion_order_and_skip_zeros() {
        let b = breakdown(&[("M", 2), ("Altro", 0), ("F", 6)]);
        let slices = layout_pie(&b, 10.0).unwrap();
        let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["M", "F"]);
        assert!((slices[0].fraction - 0.25).abs() < EPS);
        assert!((slices[1].sweep() - 0.75 * TAU).abs() < EPS);
    }

    #[test]
    fn degenerate_breakdowns_are_empty() {
        assert!(layout_pie(&breakdown(&[]), 50.0).unwrap().is_empty());
        assert!(layout_pie(&breakdown(&[("a", 0), ("b", 0)]), 50.0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn negative_radius_is_rejected() {
        let b = breakdown(&[("a", 1)]);
        assert_eq!(
            layout_pie(&b, -1.0),
            Err(LayoutError::InvalidRadius(-1.0))
        );
        assert!(layout_pie(&b, f64::NAN).is_err());
    }

    #[test]
    fn wedge_path_uses_large_arc_flag() {
        let b = breakdown(&[("big", 3), ("small", 1)]);
        let slices = layout_pie_at(&b, Point::new(0.0, 0.0), 10.0).unwrap();
        // The first wedge starts at 12 o'clock.
        assert!(slices[0].path.starts_with("M0.00,0.00 L0.00,-10.00 A10.00,10.00 0 1,1 "));
        assert!(slices[1].path.contains(" 0 0,1 "));
        assert!(slices[1].path.ends_with(" Z"));
    }

    #[test]
    fn label_anchor_on_bisector() {
        let b = breakdown(&[("a", 1), ("b", 1)]);
        let slices = layout_pie_at(&b, Point::new(0.0, 0.0), 10.0).unwrap();
        // First half goes from 12 o'clock to 6 o'clock through 3 o'clock.
        let p = slices[0].label_point;
        assert!((p.x - 6.0).abs() < EPS);
        assert!(p.y.abs() < EPS);
        let q = slices[1].label_point;
        assert!((q.x + 6.0).abs() < EPS);
    }

    #[test]
    fn single_slice_is_a_full_circle() {
        let b = breakdown(&[("only", 5), ("none", 0)]);
        let slices = layout_pie(&b, 10.0).unwrap();
        assert_eq!(slices.len(), 1);
        assert!((slices[0].sweep() - TAU).abs() < EPS);
        assert_eq!(slices[0].path.matches('A').count(), 2);
    }

    #[test]
    fn donut_shares_angles_with_pie() {
        let b = breakdown(&[("a", 1), ("b", 2), ("c", 5)]);
        let center = Point::new(50.0, 50.0);
        let pie = layout_pie_at(&b, center, 40.0).unwrap();
        let donut = layout_donut(&b, center, 40.0, 20.0).unwrap();
        assert_eq!(pie.len(), donut.len());
        for (p, d) in pie.iter().zip(donut.iter()) {
            assert_eq!(p.start_angle, d.start_angle);
            assert_eq!(p.end_angle, d.end_angle);
        }
        let anchor = donut[0].label_point;
        let mid = ((anchor.x - 50.0).powi(2) + (anchor.y - 50.0).powi(2)).sqrt();
        assert!((mid - 30.0).abs() < 1e-6);
        assert!(layout_donut(&b, center, 40.0, 40.0).is_err());
    }

    #[test]
    fn huge_counts_do_not_overflow() {
        let b = breakdown(&[("a", u64::MAX), ("b", 1), ("c", u64::MAX)]);
        assert_eq!(b.total(), u64::MAX);
        let slices = layout_pie(&b, 10.0).unwrap();
        assert_eq!(slices.len(), 3);
        let sum: f64 = slices.iter().map(|s| s.sweep()).sum();
        assert!((sum - TAU).abs() < EPS, "sum was {}", sum);
        assert!(slices.iter().all(|s| s.sweep() >= 0.0 && s.fraction.is_finite()));
        assert!((slices[2].end_angle - (START_ANGLE + TAU)).abs() < EPS);
    }
}
