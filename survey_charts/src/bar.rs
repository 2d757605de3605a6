//! Bar chart layouts, single series or grouped on a shared scale.

use log::debug;

/// Smallest height given to a non-zero bar, so that small values stay visible.
pub const MIN_BAR_HEIGHT_PX: u32 = 3;

/// One value to draw. `None` marks a missing measurement.
#[derive(PartialEq, Debug, Clone)]
pub struct BarInput {
    pub label: String,
    pub value: Option<f64>,
}

impl BarInput {
    pub fn new(label: &str, value: f64) -> BarInput {
        BarInput {
            label: label.to_string(),
            value: Some(value),
        }
    }

    pub fn missing(label: &str) -> BarInput {
        BarInput {
            label: label.to_string(),
            value: None,
        }
    }

    // Negative and NaN values are bad data and are drawn as zero.
    fn magnitude(&self) -> f64 {
        match self.value {
            Some(v) if v.is_finite() && v > 0.0 => v,
            _ => 0.0,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Bar {
    pub label: String,
    pub value: Option<f64>,
    pub height_px: u32,
    /// The value was missing: the render surface draws an empty placeholder.
    pub placeholder: bool,
}

/// A two-bar comparison between named aggregates.
#[derive(PartialEq, Debug, Clone)]
pub struct Comparison {
    pub left: Bar,
    pub right: Bar,
    /// `right - left`, when both values are known.
    pub delta: Option<f64>,
}

/// Scales every bar against the largest value, floored at 1.
///
/// ```
/// use survey_charts::{layout_bars, BarInput};
///
/// let bars = layout_bars(
///     &[BarInput::new("a", 5.0), BarInput::new("b", 10.0), BarInput::new("c", 2.0)],
///     100,
/// );
/// let heights: Vec<u32> = bars.iter().map(|b| b.height_px).collect();
/// assert_eq!(heights, vec![50, 100, 20]);
/// ```
pub fn layout_bars(values: &[BarInput], max_height_px: u32) -> Vec<Bar> {
    let scale_max = scale_max(values.iter());
    debug!(
        "layout_bars: {} bars, scale max {}",
        values.len(),
        scale_max
    );
    values
        .iter()
        .map(|v| bar(v, scale_max, max_height_px))
        .collect()
}

/// Lays out several series of bars against one shared maximum,
/// so that heights are comparable across groups.
pub fn layout_grouped(
    groups: &[(String, Vec<BarInput>)],
    max_height_px: u32,
) -> Vec<(String, Vec<Bar>)> {
    let scale_max = scale_max(groups.iter().flat_map(|(_, vs)| vs.iter()));
    groups
        .iter()
        .map(|(name, vs)| {
            (
                name.clone(),
                vs.iter()
                    .map(|v| bar(v, scale_max, max_height_px))
                    .collect(),
            )
        })
        .collect()
}

pub fn layout_comparison(left: &BarInput, right: &BarInput, max_height_px: u32) -> Comparison {
    let scale_max = scale_max([left, right].into_iter());
    let delta = match (left.value, right.value) {
        (Some(l), Some(r)) if l.is_finite() && r.is_finite() => Some(r - l),
        _ => None,
    };
    Comparison {
        left: bar(left, scale_max, max_height_px),
        right: bar(right, scale_max, max_height_px),
        delta,
    }
}

fn scale_max<'a, I>(values: I) -> f64
where
    I: Iterator<Item = &'a BarInput>,
{
    values.map(|v| v.magnitude()).fold(1.0, f64::max)
}

fn bar(input: &BarInput, scale_max: f64, max_height_px: u32) -> Bar {
    let magnitude = input.magnitude();
    let mut height_px = (magnitude / scale_max * max_height_px as f64).round() as u32;
    if magnitude > 0.0 {
        height_px = height_px.max(MIN_BAR_HEIGHT_PX.min(max_height_px));
    }
    Bar {
        label: input.label.clone(),
        value: input.value,
        height_px,
        placeholder: input.value.is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(values: &[f64]) -> Vec<BarInput> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| BarInput::new(&format!("b{}", i), *v))
            .collect()
    }

    fn heights(bars: &[Bar]) -> Vec<u32> {
        bars.iter().map(|b| b.height_px).collect()
    }

    #[test]
    fn all_zero_values_stay_flat() {
        let bars = layout_bars(&inputs(&[0.0, 0.0, 0.0]), 120);
        assert_eq!(heights(&bars), vec![0, 0, 0]);
    }

    #[test]
    fn tallest_bar_fills_the_height() {
        let bars = layout_bars(&inputs(&[5.0, 10.0, 2.0]), 180);
        assert_eq!(heights(&bars), vec![90, 180, 36]);
    }

    #[test]
    fn small_values_use_the_floor_of_one() {
        // With a maximum under 1, bars scale against 1.
        let bars = layout_bars(&inputs(&[0.5, 0.25]), 100);
        assert_eq!(heights(&bars), vec![50, 25]);
    }

    #[test]
    fn tiny_non_zero_values_remain_visible() {
        let bars = layout_bars(&inputs(&[1000.0, 1.0, 0.0]), 100);
        assert_eq!(heights(&bars), vec![100, MIN_BAR_HEIGHT_PX, 0]);
    }

    #[test]
    fn missing_and_bad_values_are_placeholders_or_zero() {
        let values = vec![
            BarInput::new("ok", 4.0),
            BarInput::missing("none"),
            BarInput::new("neg", -3.0),
            BarInput::new("nan", f64::NAN),
        ];
        let bars = layout_bars(&values, 40);
        assert_eq!(heights(&bars), vec![40, 0, 0, 0]);
        assert!(bars[1].placeholder);
        assert!(!bars[2].placeholder);
    }

    #[test]
    fn grouped_bars_share_one_scale() {
        let groups = vec![
            ("2023".to_string(), inputs(&[2.0, 4.0])),
            ("2024".to_string(), inputs(&[8.0, 1.0])),
        ];
        let out = layout_grouped(&groups, 80);
        assert_eq!(heights(&out[0].1), vec![20, 40]);
        assert_eq!(heights(&out[1].1), vec![80, 10]);
    }

    #[test]
    fn comparison_reports_delta() {
        let c = layout_comparison(
            &BarInput::new("Scuola", 3.0),
            &BarInput::new("Università", 4.5),
            90,
        );
        assert_eq!(c.left.height_px, 60);
        assert_eq!(c.right.height_px, 90);
        assert_eq!(c.delta, Some(1.5));
        let c2 = layout_comparison(&BarInput::missing("x"), &BarInput::new("y", 2.0), 90);
        assert_eq!(c2.delta, None);
        assert!(c2.left.placeholder);
    }
}
