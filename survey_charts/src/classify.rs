//! Heuristic classification of free-text institute names.
//!
//! Respondents type the name of their school or university by hand, so the
//! same kind of institute shows up under many spellings. The classifier maps
//! each label to one of the four [`Category`] values by looking first at an
//! optional override table and then at an ordered list of keyword rules.

use log::debug;
use std::collections::HashMap;

use crate::config::*;

/// One keyword rule of the heuristic. Rules are evaluated in order and the first match wins.
pub struct Rule {
    pub name: &'static str,
    pub category: Category,
    predicate: fn(&Label) -> bool,
}

impl Rule {
    pub fn matches(&self, label: &str) -> bool {
        (self.predicate)(&Label::new(label))
    }
}

/// The ordered rule list. University-like tokens come before school-like tokens.
pub static RULES: [Rule; 5] = [
    Rule {
        name: "university",
        category: Category::Universita,
        predicate: |l| l.contains_any(&["univers", "ateneo", "politec"]),
    },
    Rule {
        name: "its",
        category: Category::Its,
        predicate: |l| {
            l.has_word("its")
                || l.contains_any(&["istruzione tecnica superiore", "istituto tecnico superiore"])
        },
    },
    Rule {
        name: "afam",
        category: Category::Universita,
        predicate: |l| l.contains_any(&["accademia", "conservatorio", "afam"]),
    },
    Rule {
        name: "faculty",
        category: Category::Universita,
        predicate: |l| l.contains_any(FACULTY_KEYWORDS),
    },
    Rule {
        name: "school",
        category: Category::Scuola,
        predicate: |l| l.contains_any(SCHOOL_KEYWORDS) || l.has_any_word(SCHOOL_ABBREVIATIONS),
    },
];

// Names of degree courses and faculties, as respondents often write those
// instead of the university.
const FACULTY_KEYWORDS: &[&str] = &[
    "ingegneria",
    "medicina",
    "giurisprudenza",
    "farmacia",
    "architettura",
    "facoltà",
    "facolta",
    "dipartimento",
    "corso di laurea",
    "laurea",
];

const SCHOOL_KEYWORDS: &[&str] = &[
    "scuola",
    "liceo",
    "istituto",
    "convitto",
    "educandato",
    "ginnasio",
];

// Matched as whole words only: "its" inside "visits" is not an ITS.
const SCHOOL_ABBREVIATIONS: &[&str] = &[
    "iis", "iiss", "isis", "itis", "iti", "itc", "itt", "ite", "itet", "itg", "itas", "ipsia",
    "ipia", "ipsar", "ipseoa", "ipc", "ips", "ist", "cpia",
];

struct Label {
    text: String,
    words: Vec<String>,
}

impl Label {
    fn new(raw: &str) -> Label {
        let text = raw.trim().to_lowercase();
        let mut words: Vec<String> = Vec::new();
        // Dotted abbreviations ("I.I.S.") count both letter by letter and glued together.
        let undotted: String = text.chars().filter(|c| *c != '.').collect();
        for source in [text.as_str(), undotted.as_str()] {
            for w in source.split(|c: char| !c.is_alphanumeric()) {
                if !w.is_empty() && !words.iter().any(|x| x == w) {
                    words.push(w.to_string());
                }
            }
        }
        Label { text, words }
    }

    fn contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.text.contains(n))
    }

    fn has_word(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    fn has_any_word(&self, words: &[&str]) -> bool {
        words.iter().any(|w| self.has_word(w))
    }
}

/// Classifies an institute label.
///
/// An exact (case-insensitive) entry of `overrides` always wins over the heuristic.
/// Unknown labels fall through to [`Category::Altro`].
///
/// ```
/// use survey_charts::{classify, Category, InstituteOverrideTable};
///
/// assert_eq!(classify("Liceo Scientifico Galilei", None), Category::Scuola);
/// let overrides = InstituteOverrideTable::from_pairs(&[("xyz istituto", Category::Its)]);
/// assert_eq!(classify("XYZ Istituto", Some(&overrides)), Category::Its);
/// ```
pub fn classify(label: &str, overrides: Option<&InstituteOverrideTable>) -> Category {
    if let Some(cat) = overrides.and_then(|t| t.get(label)) {
        debug!("classify: {:?} -> {} (override)", label, cat);
        return cat;
    }
    classify_heuristic(label)
}

/// Applies the keyword rules only.
pub fn classify_heuristic(label: &str) -> Category {
    let l = Label::new(label);
    for rule in RULES.iter() {
        if (rule.predicate)(&l) {
            debug!(
                "classify: {:?} -> {} (rule {})",
                label, rule.category, rule.name
            );
            return rule.category;
        }
    }
    debug!("classify: {:?} -> {} (no rule)", label, Category::Altro);
    Category::Altro
}

/// Splits a breakdown of institute labels by category.
///
/// Categories come out in [`Category::ORDER`], and categories that received no label are omitted.
pub fn group_by_type(
    breakdown: &DemographicBreakdown,
    overrides: Option<&InstituteOverrideTable>,
) -> Vec<(Category, DemographicBreakdown)> {
    group_with(breakdown, |label| classify(label, overrides))
}

fn group_with<F>(
    breakdown: &DemographicBreakdown,
    mut classify_fn: F,
) -> Vec<(Category, DemographicBreakdown)>
where
    F: FnMut(&str) -> Category,
{
    let mut groups: Vec<(Category, DemographicBreakdown)> = Category::ORDER
        .iter()
        .map(|c| (*c, DemographicBreakdown::new(c.name())))
        .collect();
    for (label, count) in breakdown.buckets.iter() {
        let cat = classify_fn(label);
        if let Some((_, group)) = groups.iter_mut().find(|(c, _)| *c == cat) {
            group.add(label, *count);
        }
    }
    groups.retain(|(_, g)| !g.is_empty());
    groups
}

/// A classifier bound to one override table, memoizing the result for each distinct label.
#[derive(Debug, Clone, Default)]
pub struct InstituteClassifier {
    overrides: Option<InstituteOverrideTable>,
    cache: HashMap<String, Category>,
}

impl InstituteClassifier {
    pub fn new(overrides: Option<InstituteOverrideTable>) -> InstituteClassifier {
        InstituteClassifier {
            overrides,
            cache: HashMap::new(),
        }
    }

    pub fn overrides(&self) -> Option<&InstituteOverrideTable> {
        self.overrides.as_ref()
    }

    pub fn classify(&mut self, label: &str) -> Category {
        if let Some(cat) = self.cache.get(label) {
            return *cat;
        }
        let cat = classify(label, self.overrides.as_ref());
        self.cache.insert(label.to_string(), cat);
        cat
    }

    pub fn group_by_type(
        &mut self,
        breakdown: &DemographicBreakdown,
    ) -> Vec<(Category, DemographicBreakdown)> {
        group_with(breakdown, |label| self.classify(label))
    }

    /// Number of distinct labels seen so far.
    pub fn cached_labels(&self) -> usize {
        self.cache.len()
    }
}
