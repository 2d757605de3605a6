use crate::report::*;

use serde::{Deserialize, Serialize};

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    pub title: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    /// Diameter of the pie charts, in pixels.
    #[serde(rename = "chartSize")]
    pub chart_size: Option<f64>,
    #[serde(rename = "barMaxHeight")]
    pub bar_max_height: Option<u32>,
    #[serde(rename = "plotWidth")]
    pub plot_width: Option<f64>,
    #[serde(rename = "plotHeight")]
    pub plot_height: Option<f64>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CrossTabSettings {
    pub dimension: String,
    pub question: String,
    pub groups: Option<Vec<String>>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "summaryFile")]
    pub summary_file: Option<String>,
    #[serde(rename = "overridesFile")]
    pub overrides_file: Option<String>,
    #[serde(rename = "instituteDimension")]
    pub institute_dimension: Option<String>,
    #[serde(rename = "lineQuestions")]
    pub line_questions: Option<Vec<String>>,
    pub crosstab: Option<CrossTabSettings>,
}

pub const DEFAULT_TITLE: &str = "Risultati del questionario";
pub const PLOT_MARGIN_LEFT: f64 = 48.0;
pub const PLOT_MARGIN_TOP: f64 = 16.0;

pub fn read_config(path: &str) -> SurveyResult<ReportConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ReportConfig =
        serde_json::from_str(&config_str).context(ParsingJsonSnafu { path })?;
    info!("config: {:?}", config);
    Ok(config)
}

impl ReportConfig {
    pub fn title(&self) -> String {
        self.output_settings
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        let defaults = DashboardOptions::default();
        let os = &self.output_settings;
        let plot = PlotArea::new(
            PLOT_MARGIN_LEFT,
            PLOT_MARGIN_TOP,
            os.plot_width.unwrap_or(defaults.plot.width),
            os.plot_height.unwrap_or(defaults.plot.height),
        );
        DashboardOptions {
            pie_radius: os
                .chart_size
                .map(|d| d / 2.0)
                .unwrap_or(defaults.pie_radius),
            bar_max_height_px: os.bar_max_height.unwrap_or(defaults.bar_max_height_px),
            plot,
            institute_dimension: match &self.institute_dimension {
                // An empty name turns the institute charts off.
                Some(x) if x.is_empty() => None,
                Some(x) => Some(x.clone()),
                None => defaults.institute_dimension,
            },
            line_questions: self.line_questions.clone().unwrap_or_default(),
            crosstab: self.crosstab.as_ref().map(|c| CrossTabView {
                dimension: c.dimension.clone(),
                question: c.question.clone(),
                groups: c.groups.clone(),
            }),
        }
    }
}
