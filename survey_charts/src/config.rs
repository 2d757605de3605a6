// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// A point on a Likert scale.
pub type LikertValue = u8;

/// The ordinal domain shared by every question of the survey.
pub const LIKERT_DOMAIN: [LikertValue; 5] = [1, 2, 3, 4, 5];

/// Response counts per Likert value.
///
/// Values outside of `1..=5` are never stored: reading them returns 0.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Distribution {
    counts: [u64; 5],
}

impl Distribution {
    pub fn new() -> Distribution {
        Distribution::default()
    }

    /// Builds a distribution from (value, count) pairs.
    /// Out-of-domain values are dropped, repeated values accumulate.
    pub fn from_pairs(pairs: &[(LikertValue, u64)]) -> Distribution {
        let mut d = Distribution::new();
        for (value, count) in pairs {
            d.add(*value, *count);
        }
        d
    }

    /// Returns false if the value is outside of the Likert domain.
    pub fn add(&mut self, value: LikertValue, count: u64) -> bool {
        match Self::slot(value) {
            Some(idx) => {
                self.counts[idx] = self.counts[idx].saturating_add(count);
                true
            }
            None => false,
        }
    }

    pub fn count(&self, value: LikertValue) -> u64 {
        Self::slot(value).map(|idx| self.counts[idx]).unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0, |acc, c| acc.saturating_add(*c))
    }

    /// The largest count of any single value.
    pub fn peak(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LikertValue, u64)> + '_ {
        LIKERT_DOMAIN.into_iter().map(move |v| (v, self.count(v)))
    }

    fn slot(value: LikertValue) -> Option<usize> {
        if (1..=5).contains(&value) {
            Some((value - 1) as usize)
        } else {
            None
        }
    }
}

/// Aggregated answers to one Likert question.
#[derive(PartialEq, Debug, Clone)]
pub struct QuestionStat {
    pub key: String,
    /// Human label, if the summary provides one.
    pub label: Option<String>,
    pub count: u64,
    /// Supplied by the summary. It is not recomputed from the distribution.
    pub avg: f64,
    pub min: LikertValue,
    pub max: LikertValue,
    pub std: Option<f64>,
    pub median: Option<f64>,
    pub distribution: Distribution,
}

impl QuestionStat {
    pub fn display_label(&self) -> &str {
        match &self.label {
            Some(l) if !l.is_empty() => l.as_str(),
            _ => self.key.as_str(),
        }
    }

    /// Checks that the distribution adds up to the declared count.
    pub fn is_consistent(&self) -> bool {
        self.distribution.total() == self.count
    }
}

/// Counts per bucket for one demographic dimension (age range, sex, institute...).
///
/// The buckets keep their insertion order. The total does not have to match
/// the number of respondents since most demographic fields are optional.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct DemographicBreakdown {
    pub name: String,
    pub buckets: Vec<(String, u64)>,
}

impl DemographicBreakdown {
    pub fn new(name: &str) -> DemographicBreakdown {
        DemographicBreakdown {
            name: name.to_string(),
            buckets: Vec::new(),
        }
    }

    pub fn from_buckets(name: &str, buckets: &[(&str, u64)]) -> DemographicBreakdown {
        let mut b = DemographicBreakdown::new(name);
        for (label, count) in buckets {
            b.add(label, *count);
        }
        b
    }

    /// Adds to a bucket, creating it at the end if it does not exist yet.
    pub fn add(&mut self, label: &str, count: u64) {
        if let Some((_, c)) = self.buckets.iter_mut().find(|(l, _)| l == label) {
            *c = c.saturating_add(count);
        } else {
            self.buckets.push((label.to_string(), count));
        }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.buckets
            .iter()
            .find_map(|(l, c)| if l == label { Some(*c) } else { None })
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().fold(0, |acc, (_, c)| acc.saturating_add(*c))
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }
}

/// Per-question averages for one group of a cross-tabulation.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct CrossTabGroup {
    pub label: String,
    pub averages: HashMap<String, f64>,
}

/// Per-group averages along one demographic dimension, as computed by the summary service.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct CrossTab {
    pub dimension: String,
    pub groups: Vec<CrossTabGroup>,
}

impl CrossTab {
    pub fn new(dimension: &str) -> CrossTab {
        CrossTab {
            dimension: dimension.to_string(),
            groups: Vec::new(),
        }
    }

    pub fn set(&mut self, group: &str, question_key: &str, avg: f64) {
        let idx = match self.groups.iter().position(|g| g.label == group) {
            Some(idx) => idx,
            None => {
                self.groups.push(CrossTabGroup {
                    label: group.to_string(),
                    averages: HashMap::new(),
                });
                self.groups.len() - 1
            }
        };
        self.groups[idx]
            .averages
            .insert(question_key.to_string(), avg);
    }

    pub fn average(&self, group: &str, question_key: &str) -> Option<f64> {
        self.groups
            .iter()
            .find(|g| g.label == group)
            .and_then(|g| g.averages.get(question_key).copied())
    }
}

/// A full survey summary. Treated as an immutable snapshot once built.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct StatsModel {
    /// Number of submitted surveys.
    pub total_responses: u64,
    pub questions: Vec<QuestionStat>,
    pub demographics: Vec<DemographicBreakdown>,
    pub crosstabs: Vec<CrossTab>,
}

impl StatsModel {
    pub fn question(&self, key: &str) -> Option<&QuestionStat> {
        self.questions.iter().find(|q| q.key == key)
    }

    pub fn breakdown(&self, name: &str) -> Option<&DemographicBreakdown> {
        self.demographics.iter().find(|b| b.name == name)
    }

    pub fn crosstab(&self, dimension: &str) -> Option<&CrossTab> {
        self.crosstabs.iter().find(|c| c.dimension == dimension)
    }
}

// ********* Institute taxonomy ***********

/// The fixed institute taxonomy.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Category {
    Scuola,
    Universita,
    Its,
    Altro,
}

impl Category {
    /// Display order of the categories in grouped outputs.
    pub const ORDER: [Category; 4] = [
        Category::Scuola,
        Category::Universita,
        Category::Its,
        Category::Altro,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Scuola => "Scuola",
            Category::Universita => "Università",
            Category::Its => "ITS",
            Category::Altro => "Altro",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct UnknownCategory(pub String);

impl Error for UnknownCategory {}

impl Display for UnknownCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown institute category {:?}", self.0)
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scuola" => Ok(Category::Scuola),
            "università" | "universita" | "universitá" => Ok(Category::Universita),
            "its" => Ok(Category::Its),
            "altro" => Ok(Category::Altro),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// Explicit label -> category assignments, matched case-insensitively on the exact label.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct InstituteOverrideTable {
    entries: HashMap<String, Category>,
}

impl InstituteOverrideTable {
    pub fn new() -> InstituteOverrideTable {
        InstituteOverrideTable::default()
    }

    pub fn from_pairs(pairs: &[(&str, Category)]) -> InstituteOverrideTable {
        let mut t = InstituteOverrideTable::new();
        for (label, cat) in pairs {
            t.insert(label, *cat);
        }
        t
    }

    pub fn insert(&mut self, label: &str, category: Category) {
        self.entries.insert(Self::normalize(label), category);
    }

    pub fn get(&self, label: &str) -> Option<Category> {
        self.entries.get(&Self::normalize(label)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn normalize(label: &str) -> String {
        label.to_lowercase()
    }
}

// ******** Geometry primitives *********

#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// The point at `radius` from `self` along `angle` (radians, y axis pointing down).
    pub fn polar(&self, radius: f64, angle: f64) -> Point {
        Point {
            x: self.x + radius * angle.cos(),
            y: self.y + radius * angle.sin(),
        }
    }
}

/// The drawing area of a chart, in drawing coordinates (y grows downward).
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> PlotArea {
        PlotArea {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Errors for calls that break the contract of a layout function.
///
/// Bad data never produces one of these: layouts degrade to empty results instead.
#[derive(PartialEq, Debug, Clone)]
pub enum LayoutError {
    InvalidRadius(f64),
    InvalidDonutRadii { outer: f64, inner: f64 },
    EmptyDomain,
    OutOfDomain(LikertValue),
    InvalidPlotArea(PlotArea),
}

impl Error for LayoutError {}

impl Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::InvalidRadius(r) => write!(f, "Invalid radius {}", r),
            LayoutError::InvalidDonutRadii { outer, inner } => write!(
                f,
                "Invalid donut radii: inner {} must be in [0, {})",
                inner, outer
            ),
            LayoutError::EmptyDomain => write!(f, "The line chart domain is empty"),
            LayoutError::OutOfDomain(v) => {
                write!(f, "Value {} is outside of the Likert domain 1..5", v)
            }
            LayoutError::InvalidPlotArea(p) => write!(
                f,
                "Invalid plot area: width {} height {}",
                p.width, p.height
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_saturate_instead_of_overflowing() {
        let mut d = Distribution::from_pairs(&[(1, u64::MAX), (2, 5)]);
        assert!(d.add(1, 10));
        assert_eq!(d.count(1), u64::MAX);
        assert_eq!(d.total(), u64::MAX);

        let mut b = DemographicBreakdown::from_buckets("eta", &[("18-24", u64::MAX), ("25-34", 2)]);
        b.add("18-24", 1);
        assert_eq!(b.get("18-24"), Some(u64::MAX));
        assert_eq!(b.total(), u64::MAX);
    }

    #[test]
    fn override_labels_match_exactly_ignoring_case() {
        let t = InstituteOverrideTable::from_pairs(&[("XYZ Istituto", Category::Its)]);
        assert_eq!(t.get("xyz istituto"), Some(Category::Its));
        assert_eq!(t.get("XYZ ISTITUTO"), Some(Category::Its));
        assert_eq!(t.get(" xyz istituto"), None);
        assert_eq!(t.get("xyz istituto nord"), None);
    }
}
