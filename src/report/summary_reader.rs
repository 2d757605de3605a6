// Reader for the JSON summary produced by the survey backend.

use crate::report::*;

use serde::{Deserialize, Serialize};

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct QuestionJs {
    pub key: String,
    pub label: Option<String>,
    #[serde(default)]
    pub count: Option<JSValue>,
    pub avg: Option<f64>,
    pub min: Option<JSValue>,
    pub max: Option<JSValue>,
    pub std: Option<f64>,
    pub median: Option<f64>,
    #[serde(default)]
    pub distribution: JSMap<String, JSValue>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SummaryJs {
    pub total: Option<JSValue>,
    #[serde(default)]
    pub questions: Vec<QuestionJs>,
    #[serde(default)]
    pub demographics: JSMap<String, JSValue>,
    #[serde(default)]
    pub crosstabs: JSMap<String, JSValue>,
}

pub fn read_summary(path: &str) -> SurveyResult<StatsModel> {
    info!("Attempting to read summary file {:?}", path);
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: SummaryJs = serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    debug!("read_summary: {} questions", js.questions.len());
    Ok(to_stats_model(&js))
}

/// Converts the wire shape. Malformed numbers are logged and read as zero or missing.
pub fn to_stats_model(js: &SummaryJs) -> StatsModel {
    let questions: Vec<QuestionStat> = js.questions.iter().map(to_question).collect();

    let mut demographics: Vec<DemographicBreakdown> = Vec::new();
    for (name, buckets) in js.demographics.iter() {
        let mut b = DemographicBreakdown::new(name);
        match buckets {
            JSValue::Object(m) => {
                for (label, count) in m.iter() {
                    b.add(label, read_js_count(count, name));
                }
            }
            x => warn!("to_stats_model: breakdown {:?} is not an object: {:?}", name, x),
        }
        demographics.push(b);
    }

    let mut crosstabs: Vec<CrossTab> = Vec::new();
    for (dimension, groups) in js.crosstabs.iter() {
        let mut ct = CrossTab::new(dimension);
        if let JSValue::Object(gm) = groups {
            for (group, averages) in gm.iter() {
                if let JSValue::Object(am) = averages {
                    for (question, avg) in am.iter() {
                        match read_js_float(avg) {
                            Some(v) => ct.set(group, question, v),
                            None => debug!(
                                "to_stats_model: no average for {}/{}/{}",
                                dimension, group, question
                            ),
                        }
                    }
                }
            }
        } else {
            warn!("to_stats_model: cross-tab {:?} is not an object", dimension);
        }
        crosstabs.push(ct);
    }

    StatsModel {
        total_responses: js
            .total
            .as_ref()
            .map(|t| read_js_count(t, "total"))
            .unwrap_or(0),
        questions,
        demographics,
        crosstabs,
    }
}

fn to_question(q: &QuestionJs) -> QuestionStat {
    let mut distribution = Distribution::new();
    for (value, count) in q.distribution.iter() {
        let c = read_js_count(count, &q.key);
        match value.trim().parse::<LikertValue>() {
            Ok(v) if distribution.add(v, c) => {}
            _ => warn!(
                "to_question: {}: dropping out-of-scale value {:?}",
                q.key, value
            ),
        }
    }
    let answered: Vec<LikertValue> = distribution
        .iter()
        .filter(|(_, c)| *c > 0)
        .map(|(v, _)| v)
        .collect();
    let min = q
        .min
        .as_ref()
        .and_then(read_js_likert)
        .unwrap_or_else(|| answered.first().copied().unwrap_or(1));
    let max = q
        .max
        .as_ref()
        .and_then(read_js_likert)
        .unwrap_or_else(|| answered.last().copied().unwrap_or(5));
    QuestionStat {
        key: q.key.clone(),
        label: q.label.clone(),
        count: q
            .count
            .as_ref()
            .map(|c| read_js_count(c, &q.key))
            .unwrap_or_else(|| distribution.total()),
        avg: q.avg.unwrap_or(0.0),
        min,
        max,
        std: q.std,
        median: q.median,
        distribution,
    }
}

fn read_js_count(x: &JSValue, context: &str) -> u64 {
    let parsed = match x {
        JSValue::Number(n) => n.as_u64(),
        JSValue::String(s) => s.trim().parse::<u64>().ok(),
        JSValue::Null => Some(0),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        warn!("{}: could not read count {:?}, using 0", context, x);
        0
    })
}

fn read_js_float(x: &JSValue) -> Option<f64> {
    match x {
        JSValue::Number(n) => n.as_f64(),
        JSValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn read_js_likert(x: &JSValue) -> Option<LikertValue> {
    let v = read_js_float(x)?;
    if (1.0..=5.0).contains(&v) {
        Some(v.round() as LikertValue)
    } else {
        None
    }
}
