//! Projections of pre-computed cross-tabulations into bar inputs.

use log::debug;

use crate::bar::BarInput;
use crate::config::*;

/// Average answer to `question_key` for every group of `dimension`, in the cross-tab's group order.
///
/// Groups without an average for this question yield a missing value.
/// An unknown dimension yields no bars.
pub fn group_average(crosstabs: &[CrossTab], dimension: &str, question_key: &str) -> Vec<BarInput> {
    let ct = match crosstabs.iter().find(|c| c.dimension == dimension) {
        Some(ct) => ct,
        None => {
            debug!("group_average: no cross-tab for dimension {:?}", dimension);
            return Vec::new();
        }
    };
    ct.groups
        .iter()
        .map(|g| BarInput {
            label: g.label.clone(),
            value: g.averages.get(question_key).copied(),
        })
        .collect()
}

/// Same as [`group_average`], but with one bar for each of `groups`, in that order.
///
/// Use it when the axis must show a fixed set of groups (all age ranges, for example)
/// even when the summary has no answers for some of them.
pub fn group_average_ordered(
    crosstabs: &[CrossTab],
    dimension: &str,
    question_key: &str,
    groups: &[String],
) -> Vec<BarInput> {
    let ct = crosstabs.iter().find(|c| c.dimension == dimension);
    groups
        .iter()
        .map(|g| BarInput {
            label: g.clone(),
            value: ct.and_then(|c| c.average(g, question_key)),
        })
        .collect()
}
