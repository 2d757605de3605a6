use log::{info, warn};

use crate::bar::*;
use crate::classify::InstituteClassifier;
use crate::config::*;
use crate::crosstab::*;
use crate::line::*;
use crate::pie::*;
use crate::session::Snapshot;

/// Which cross-tab projection to show as bars.
#[derive(PartialEq, Debug, Clone)]
pub struct CrossTabView {
    pub dimension: String,
    pub question: String,
    /// Fixed group order. When `None`, the order of the cross-tab is used.
    pub groups: Option<Vec<String>>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct DashboardOptions {
    pub pie_radius: f64,
    pub bar_max_height_px: u32,
    pub plot: PlotArea,
    /// The breakdown holding free-text institute names.
    pub institute_dimension: Option<String>,
    /// Questions drawn in the line chart. Empty means all of them.
    pub line_questions: Vec<String>,
    pub crosstab: Option<CrossTabView>,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        DashboardOptions {
            pie_radius: 120.0,
            bar_max_height_px: 200,
            plot: PlotArea::new(48.0, 16.0, 560.0, 240.0),
            institute_dimension: Some("istituto".to_string()),
            line_questions: Vec::new(),
            crosstab: None,
        }
    }
}

/// Every chart of the results page, derived from one snapshot.
#[derive(PartialEq, Debug, Clone)]
pub struct Dashboard {
    pub version: u64,
    /// Average answer per question.
    pub question_bars: Vec<Bar>,
    /// One pie per demographic breakdown, in summary order.
    pub pies: Vec<(String, Vec<Slice>)>,
    pub institute_groups: Vec<(Category, DemographicBreakdown)>,
    /// One slice per institute category.
    pub institute_pie: Vec<Slice>,
    pub lines: LineChart,
    pub crosstab_bars: Option<Vec<Bar>>,
}

impl Dashboard {
    pub fn derive(
        snapshot: &Snapshot,
        options: &DashboardOptions,
        classifier: &mut InstituteClassifier,
    ) -> Result<Dashboard, LayoutError> {
        let model = snapshot.model.as_ref();

        let averages: Vec<BarInput> = model
            .questions
            .iter()
            .map(|q| BarInput::new(q.display_label(), q.avg))
            .collect();
        let question_bars = layout_bars(&averages, options.bar_max_height_px);

        let mut pies = Vec::with_capacity(model.demographics.len());
        for b in model.demographics.iter() {
            pies.push((b.name.clone(), layout_pie(b, options.pie_radius)?));
        }

        let institute_groups = match &options.institute_dimension {
            Some(dim) => match model.breakdown(dim) {
                Some(b) => classifier.group_by_type(b),
                None => {
                    warn!("Dashboard::derive: no breakdown named {:?}", dim);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        let mut by_type = DemographicBreakdown::new("tipo istituto");
        for (cat, group) in institute_groups.iter() {
            by_type.add(cat.name(), group.total());
        }
        let institute_pie = layout_pie(&by_type, options.pie_radius)?;

        let series: Vec<SeriesInput> = if options.line_questions.is_empty() {
            model.questions.iter().map(SeriesInput::from_question).collect()
        } else {
            options
                .line_questions
                .iter()
                .filter_map(|key| {
                    let q = model.question(key);
                    if q.is_none() {
                        warn!("Dashboard::derive: unknown question {:?} for the line chart", key);
                    }
                    q.map(SeriesInput::from_question)
                })
                .collect()
        };
        let lines = layout_lines(&series, &LIKERT_DOMAIN, options.plot)?;

        let crosstab_bars = options.crosstab.as_ref().map(|view| {
            let inputs = match &view.groups {
                Some(groups) => group_average_ordered(
                    &model.crosstabs,
                    &view.dimension,
                    &view.question,
                    groups,
                ),
                None => group_average(&model.crosstabs, &view.dimension, &view.question),
            };
            layout_bars(&inputs, options.bar_max_height_px)
        });

        info!(
            "Dashboard::derive: snapshot {}: {} question bars, {} pies, \
             {} institute categories, {} line series",
            snapshot.version,
            question_bars.len(),
            pies.len(),
            institute_groups.len(),
            lines.series.len()
        );

        Ok(Dashboard {
            version: snapshot.version,
            question_bars,
            pies,
            institute_groups,
            institute_pie,
            lines,
            crosstab_bars,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Derived, SnapshotStore};

    fn model() -> StatsModel {
        let q = |key: &str, avg: f64, pairs: &[(LikertValue, u64)]| QuestionStat {
            key: key.to_string(),
            label: None,
            count: pairs.iter().map(|(_, c)| *c).sum(),
            avg,
            min: 1,
            max: 5,
            std: None,
            median: None,
            distribution: Distribution::from_pairs(pairs),
        };
        let mut eta = CrossTab::new("eta");
        eta.set("18-24", "q1", 4.0);
        StatsModel {
            total_responses: 23,
            questions: vec![
                q("q1", 4.0, &[(3, 3), (4, 10), (5, 10)]),
                q("q2", 2.0, &[(1, 8), (2, 8), (3, 7)]),
            ],
            demographics: vec![
                DemographicBreakdown::from_buckets(
                    "istituto",
                    &[("Liceo Scientifico", 12), ("Ingegneria", 8), ("ITS Meccanica", 3)],
                ),
                DemographicBreakdown::from_buckets("sesso", &[("F", 0), ("M", 0)]),
            ],
            crosstabs: vec![eta],
        }
    }

    #[test]
    fn derives_every_chart() {
        let mut store = SnapshotStore::new();
        let snap = store.publish(model());
        let options = DashboardOptions {
            crosstab: Some(CrossTabView {
                dimension: "eta".to_string(),
                question: "q1".to_string(),
                groups: Some(vec!["18-24".to_string(), "25-34".to_string()]),
            }),
            ..DashboardOptions::default()
        };
        let mut classifier = InstituteClassifier::new(None);
        let d = Dashboard::derive(&snap, &options, &mut classifier).unwrap();
        assert_eq!(d.version, snap.version);
        assert_eq!(d.question_bars[0].height_px, 200);
        assert_eq!(d.question_bars[1].height_px, 100);
        assert_eq!(d.pies.len(), 2);
        assert_eq!(d.pies[0].1.len(), 3);
        // All-zero breakdowns give an empty pie.
        assert!(d.pies[1].1.is_empty());
        let labels: Vec<&str> = d.institute_pie.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Scuola", "Università", "ITS"]);
        assert_eq!(d.lines.series.len(), 2);
        assert_eq!(d.lines.axes.max_y, 10);
        let ct = d.crosstab_bars.unwrap();
        assert_eq!(ct.len(), 2);
        assert!(ct[1].placeholder);
    }

    #[test]
    fn line_question_selection() {
        let mut store = SnapshotStore::new();
        let snap = store.publish(model());
        let options = DashboardOptions {
            line_questions: vec!["q2".to_string(), "nope".to_string()],
            institute_dimension: None,
            ..DashboardOptions::default()
        };
        let d = Dashboard::derive(&snap, &options, &mut InstituteClassifier::default()).unwrap();
        assert_eq!(d.lines.series.len(), 1);
        assert_eq!(d.lines.series[0].key, "q2");
        assert!(d.institute_pie.is_empty());
    }

    #[test]
    fn newer_dashboards_win() {
        let mut store = SnapshotStore::new();
        let old = store.publish(model());
        let new = store.publish(model());
        let options = DashboardOptions::default();
        let mut classifier = InstituteClassifier::new(None);
        let d_new = Dashboard::derive(&new, &options, &mut classifier).unwrap();
        let d_old = Dashboard::derive(&old, &options, &mut classifier).unwrap();
        let mut slot: Derived<Dashboard> = Derived::new();
        assert!(slot.offer(d_new.version, d_new));
        assert!(!slot.offer(d_old.version, d_old));
        assert_eq!(slot.version(), Some(new.version));
    }
}
