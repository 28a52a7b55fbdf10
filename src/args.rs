use clap::Parser;

/// Analytics over the allocations of a spectrum auction.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the auction tables. If not provided, the bundled
    /// 2023-24 tables are used. For more information about the file format, read the manual of spectrum_core.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,

    /// (default json) The type of the data file: json or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default summary) The view to produce: summary, band, compare, opportunities or strategy.
    #[clap(short, long, value_parser)]
    pub view: Option<String>,

    /// (band identifier) The band shown by the band view, for example 1800MHz.
    #[clap(short, long, value_parser)]
    pub band: Option<String>,

    /// (list of comma-separated values or not specified) The regions shown by the compare view.
    /// If not specified, all the regions are shown.
    #[clap(long, value_parser, value_delimiter = ',')]
    pub regions: Option<Vec<String>>,

    /// (list of comma-separated values or not specified) The bands used by the compare view.
    /// If not specified, all the bands are used.
    #[clap(long, value_parser, value_delimiter = ',')]
    pub bands: Option<Vec<String>>,

    /// (default balanced) The bidding strategy: conservative, balanced, aggressive or future-ready.
    #[clap(short, long, value_parser)]
    pub strategy: Option<String>,

    /// The number of regions in the rankings.
    #[clap(short, long, value_parser)]
    pub top: Option<usize>,

    /// If passed as an argument, unknown regions and unknown bands are errors instead of zeros.
    #[clap(long, takes_value = false)]
    pub strict: bool,

    /// (file path, 'stdout' or empty) Where the JSON output is written. Defaults to the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a previous output in JSON format. If provided, specauction will
    /// check that the output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
