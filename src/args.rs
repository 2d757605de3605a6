use clap::Parser;

/// Builds the charts and the CSV export of a survey from its aggregated summary.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON configuration of the report. Paths it mentions are relative to the file itself.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The aggregated summary in JSON format. Setting this option overrides the summaryFile
    /// entry of the configuration.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    /// (file path, optional) A JSON object mapping institute names to their category. Problems reading
    /// it are reported as warnings and the built-in rules are used instead.
    #[clap(long, value_parser)]
    pub overrides: Option<String>,

    /// (directory, 'stdout' or empty) Where to write the charts, the CSV export and the JSON report.
    /// With 'stdout', only the JSON report is printed. Setting this option overrides the outputDirectory
    /// of the configuration.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, optional) Also write the per-question CSV export to this file.
    #[clap(long, value_parser)]
    pub csv: Option<String>,

    /// (file path) A reference JSON report. If provided, surveyviz will check that the computed
    /// report matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
