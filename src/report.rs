use log::{debug, info, warn};

use snafu::{prelude::*, ErrorCompat, Snafu};
use survey_charts::*;

use std::fs;
use std::path::Path;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::report::config_reader::*;

pub mod config_reader;
pub mod overrides_reader;
pub mod summary_reader;
pub mod svg;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the report"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid chart settings"))]
    Layout { source: LayoutError },
    #[snafu(display(
        "No summary file: pass --summary or set summaryFile in the configuration"
    ))]
    MissingSummary {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// Where the report goes.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum OutputTarget {
    Stdout,
    Directory(String),
    Nowhere,
}

/// Everything `run_report` needs. Command-line values take precedence over the configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ReportOptions {
    pub config_path: Option<String>,
    pub summary_path: Option<String>,
    pub overrides_path: Option<String>,
    pub out: Option<String>,
    pub csv_path: Option<String>,
    pub reference_path: Option<String>,
}

impl From<&Args> for ReportOptions {
    fn from(args: &Args) -> Self {
        ReportOptions {
            config_path: args.config.clone(),
            summary_path: args.summary.clone(),
            overrides_path: args.overrides.clone(),
            out: args.out.clone(),
            csv_path: args.csv.clone(),
            reference_path: args.reference.clone(),
        }
    }
}

// Relative paths in a configuration file are relative to the file itself.
fn resolve(root: Option<&Path>, p: &str) -> String {
    match root {
        Some(r) if Path::new(p).is_relative() => r.join(p).display().to_string(),
        _ => p.to_string(),
    }
}

fn output_target(
    opts: &ReportOptions,
    config: &ReportConfig,
    root: Option<&Path>,
) -> OutputTarget {
    match (&opts.out, &config.output_settings.output_directory) {
        (Some(x), _) if x == "stdout" => OutputTarget::Stdout,
        (Some(x), _) if x.is_empty() => OutputTarget::Nowhere,
        (Some(x), _) => OutputTarget::Directory(x.clone()),
        (None, Some(x)) => OutputTarget::Directory(resolve(root, x)),
        (None, None) if opts.reference_path.is_some() => OutputTarget::Nowhere,
        (None, None) => OutputTarget::Stdout,
    }
}

fn write_file(dir: &Path, name: &str, contents: &str) -> SurveyResult<()> {
    let p = dir.join(name);
    let path = p.display().to_string();
    debug!("write_file: {} ({} bytes)", path, contents.len());
    fs::write(&p, contents).context(WritingOutputSnafu { path })
}

fn pie_file_name(breakdown: &str) -> String {
    let slug: String = breakdown
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("pie_{}.svg", slug)
}

fn format_avg(v: f64) -> String {
    format!("{:.2}", v)
}

fn bars_to_json(bars: &[Bar]) -> Vec<JSValue> {
    bars.iter()
        .map(|b| {
            json!({
                "label": b.label,
                "value": b.value.map(format_avg),
                "heightPx": b.height_px.to_string(),
            })
        })
        .collect()
}

/// The JSON summary of a report. It only holds exact values (counts, pixel heights,
/// rounded averages) so that it can be compared against a reference file.
pub fn build_summary_js(title: &str, model: &StatsModel, dashboard: &Dashboard) -> JSValue {
    let mut institutes: JSMap<String, JSValue> = JSMap::new();
    for (cat, group) in dashboard.institute_groups.iter() {
        let mut labels: JSMap<String, JSValue> = JSMap::new();
        for (label, count) in group.buckets.iter() {
            labels.insert(label.clone(), json!(count.to_string()));
        }
        institutes.insert(cat.name().to_string(), JSValue::Object(labels));
    }

    let mut breakdowns: JSMap<String, JSValue> = JSMap::new();
    for (name, slices) in dashboard.pies.iter() {
        let mut tally: JSMap<String, JSValue> = JSMap::new();
        for s in slices.iter() {
            tally.insert(s.label.clone(), json!(s.value.to_string()));
        }
        breakdowns.insert(name.clone(), JSValue::Object(tally));
    }

    let series: Vec<JSValue> = dashboard
        .lines
        .series
        .iter()
        .map(|s| json!({"key": s.key, "label": s.label, "hidden": s.hidden}))
        .collect();

    json!({
        "config": {
            "title": title,
            "snapshot": dashboard.version.to_string(),
        },
        "responses": model.total_responses.to_string(),
        "questions": bars_to_json(&dashboard.question_bars),
        "institutes": institutes,
        "breakdowns": breakdowns,
        "lines": {
            "maxY": dashboard.lines.axes.max_y.to_string(),
            "series": series,
        },
        "crosstab": dashboard.crosstab_bars.as_ref().map(|b| bars_to_json(b)),
    })
}

fn write_charts(
    dir: &str,
    title: &str,
    options: &DashboardOptions,
    dashboard: &Dashboard,
) -> SurveyResult<()> {
    let dir_p = Path::new(dir);
    fs::create_dir_all(dir_p).context(WritingOutputSnafu { path: dir })?;
    write_file(
        dir_p,
        "questions.svg",
        &svg::bars_svg(title, &dashboard.question_bars, options.bar_max_height_px),
    )?;
    write_file(dir_p, "lines.svg", &svg::lines_svg(title, &dashboard.lines))?;
    if !dashboard.institute_groups.is_empty() {
        write_file(
            dir_p,
            "institutes.svg",
            &svg::pie_svg("Tipo di istituto", &dashboard.institute_pie, options.pie_radius),
        )?;
    }
    for (name, slices) in dashboard.pies.iter() {
        write_file(
            dir_p,
            &pie_file_name(name),
            &svg::pie_svg(name, slices, options.pie_radius),
        )?;
    }
    if let (Some(bars), Some(view)) = (&dashboard.crosstab_bars, &options.crosstab) {
        let ct_title = format!("{} per {}", view.question, view.dimension);
        write_file(
            dir_p,
            "crosstab.svg",
            &svg::bars_svg(&ct_title, bars, options.bar_max_height_px),
        )?;
    }
    Ok(())
}

pub fn read_reference(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

pub fn run_report(opts: &ReportOptions) -> SurveyResult<JSValue> {
    let config = match &opts.config_path {
        Some(p) => read_config(p)?,
        None => ReportConfig::default(),
    };
    let root_p: Option<&Path> = opts.config_path.as_ref().and_then(|p| Path::new(p).parent());

    let summary_path = match (&opts.summary_path, &config.summary_file) {
        (Some(p), _) => p.clone(),
        (None, Some(p)) => resolve(root_p, p),
        (None, None) => return MissingSummarySnafu {}.fail(),
    };
    let overrides_path = match (&opts.overrides_path, &config.overrides_file) {
        (Some(p), _) => Some(p.clone()),
        (None, Some(p)) => Some(resolve(root_p, p)),
        (None, None) => None,
    };

    let model = summary_reader::read_summary(&summary_path)?;

    let mut session = ResultsSession::new();
    let snapshot = session.snapshots.publish(model);
    let overrides = session
        .overrides_or_load(|| overrides_reader::load_overrides(overrides_path.as_deref()))
        .cloned();
    let mut classifier = InstituteClassifier::new(overrides);

    let options = config.dashboard_options();
    let mut dashboard =
        Dashboard::derive(&snapshot, &options, &mut classifier).context(LayoutSnafu {})?;
    session.legend.apply(&mut dashboard.lines);
    info!(
        "run_report: {} institute labels classified",
        classifier.cached_labels()
    );

    let title = config.title();
    let csv = to_csv(&snapshot.model);
    if let Some(p) = &opts.csv_path {
        fs::write(p, &csv).context(WritingOutputSnafu { path: p.as_str() })?;
    }

    let result_js = build_summary_js(&title, &snapshot.model, &dashboard);
    let pretty_js_stats =
        serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;

    match output_target(opts, &config, root_p) {
        OutputTarget::Stdout => println!("{}", pretty_js_stats),
        OutputTarget::Directory(dir) => {
            info!("run_report: writing the report to {:?}", dir);
            write_charts(&dir, &title, &options, &dashboard)?;
            write_file(Path::new(&dir), "summary.csv", &csv)?;
            write_file(Path::new(&dir), "report.json", &pretty_js_stats)?;
        }
        OutputTarget::Nowhere => debug!("run_report: no output requested"),
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &opts.reference_path {
        let summary_ref = read_reference(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(result_js)
}

fn run_report_test(
    test_name: &str,
    config_lpath: &str,
    summary_lpath: &str,
) -> SurveyResult<JSValue> {
    let test_dir = option_env!("SURVEY_TEST_DIR")
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{}/tests/data", env!("CARGO_MANIFEST_DIR")));
    info!("Running test {}", test_name);
    let res = run_report(&ReportOptions {
        config_path: Some(format!("{}/{}/{}", test_dir, test_name, config_lpath)),
        reference_path: Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
        ..ReportOptions::default()
    });
    if let Err(e) = &res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(e) {
            eprintln!("trace: {}", bt);
        }
    }
    res
}

pub fn test_wrapper(test_name: &str) -> SurveyResult<JSValue> {
    run_report_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    )
}

#[cfg(test)]
mod tests {

    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn basic() {
        init();
        assert!(test_wrapper("basic").is_ok());
    }

    #[test]
    fn overrides_and_crosstab() {
        init();
        assert!(test_wrapper("overrides_and_crosstab").is_ok());
    }

    #[test]
    fn missing_overrides_file() {
        init();
        assert!(test_wrapper("missing_overrides").is_ok());
    }

    #[test]
    fn report_from_summary_alone() {
        init();
        let summary = format!("{}/tests/data/basic/basic_summary.json", env!("CARGO_MANIFEST_DIR"));
        let js = run_report(&ReportOptions {
            summary_path: Some(summary),
            out: Some(String::new()),
            ..ReportOptions::default()
        })
        .unwrap();
        assert_eq!(js["config"]["snapshot"], "1");
        assert_eq!(js["responses"], "25");
        assert_eq!(js["questions"][0]["value"], "4.20");
        assert_eq!(js["breakdowns"]["sesso"]["F"], "14");
    }

    #[test]
    fn missing_summary_is_an_error() {
        let res = run_report(&ReportOptions::default());
        assert!(matches!(res, Err(SurveyError::MissingSummary {})));
    }

    #[test]
    fn unreadable_summary_is_an_error() {
        let res = run_report(&ReportOptions {
            summary_path: Some("/nonexistent/summary.json".to_string()),
            out: Some(String::new()),
            ..ReportOptions::default()
        });
        assert!(matches!(res, Err(SurveyError::OpeningJson { .. })));
    }

    #[test]
    fn paths_resolve_against_the_config() {
        let root = Path::new("/data/survey");
        assert_eq!(resolve(Some(root), "summary.json"), "/data/survey/summary.json");
        assert_eq!(resolve(Some(root), "/tmp/s.json"), "/tmp/s.json");
        assert_eq!(resolve(None, "summary.json"), "summary.json");
    }

    #[test]
    fn output_targets() {
        let config = ReportConfig::default();
        let opts = |out: Option<&str>| ReportOptions {
            out: out.map(|s| s.to_string()),
            ..ReportOptions::default()
        };
        assert_eq!(output_target(&opts(None), &config, None), OutputTarget::Stdout);
        assert_eq!(output_target(&opts(Some("stdout")), &config, None), OutputTarget::Stdout);
        assert_eq!(output_target(&opts(Some("")), &config, None), OutputTarget::Nowhere);
        assert_eq!(
            output_target(&opts(Some("out")), &config, None),
            OutputTarget::Directory("out".to_string())
        );
        assert_eq!(pie_file_name("Fascia d'età"), "pie_fascia_d_età.svg");
    }
}
