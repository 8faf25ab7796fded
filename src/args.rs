use clap::Parser;

/// This is a survey scorecard tabulation program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The spreadsheet containing the survey answers (.xlsx). The first row holds
    /// the column names: one column per questionnaire item (integers 1-5) and one per profile
    /// attribute (category labels). Columns are located by name, their order does not matter.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (file path, optional) A JSON description of the scorecard: the dimension-to-items
    /// mapping and the profile attributes. Without it, the built-in REMOTA scorecard is used.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path or 'stdout') If specified, the summary of the analysis will be written in
    /// JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (directory path) If specified, the Word report (.docx) will be written into this
    /// directory, named with the generation date.
    #[clap(long, value_parser)]
    pub report_dir: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, scorecard will check that
    /// the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (default: first sheet) The name of the worksheet to use in the Excel file.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (dimension name) If specified, the summary also carries the per-item tier
    /// distributions for this dimension.
    #[clap(long, value_parser)]
    pub dimension: Option<String>,

    /// (repeat the flag for each item) The items of the selected dimension to include in the
    /// per-item distributions. Defaults to all the items of the dimension. Selecting no item
    /// is not an error and produces no distributions.
    #[clap(long, value_parser)]
    pub items: Option<Vec<String>>,

    /// If passed as an argument, a blank item cell aborts the analysis instead of counting
    /// as zero in the dimension sums.
    #[clap(long, takes_value = false)]
    pub fail_on_blank: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
