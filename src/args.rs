use clap::Parser;

/// This is a descriptive-statistics program for Likert-scale survey exports.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON description of the analysis: dataset location, attribute
    /// columns, demographic columns and cache policy. For more information about the file
    /// format, read the documentation.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The survey export to aggregate. Setting this option overrides the path
    /// that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: 'csv' or 'xlsx'. If not specified, inferred from
    /// the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (list of column names or not specified) The attribute columns to aggregate, in order.
    /// Defaults to the emotional-resilience attribute set.
    #[clap(long, value_parser)]
    pub attributes: Option<Vec<String>>,

    /// (file path) A reference summary in JSON format. If provided, surveystat will check
    /// that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the analysis will be
    /// written in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the
    /// worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
