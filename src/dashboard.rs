use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use spectrum_core::*;

use std::fs;

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

pub mod dataset_reader;
pub mod io_xlsx;
pub mod views;

use crate::dashboard::dataset_reader::*;
use crate::dashboard::views::View;

#[derive(Debug, Snafu)]
pub enum DashboardError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {sheet} is empty or missing"))]
    EmptyExcel { sheet: String },
    #[snafu(display("Worksheet {sheet}, row {lineno}: could not understand cell {content}"))]
    ExcelWrongCellType {
        sheet: String,
        lineno: u64,
        content: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing output file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid dataset: {source}"))]
    InvalidDataset { source: SpectrumError },
    #[snafu(display("Analysis failed: {source}"))]
    Analysis { source: SpectrumError },
    #[snafu(display("Difference detected between the output and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashboardResult<T> = Result<T, DashboardError>;

fn load_registry(args: &Args) -> DashboardResult<DatasetRegistry> {
    match (args.data.as_deref(), args.input_type.as_deref()) {
        (None, None) => {
            info!("No dataset provided, using the bundled 2023-24 auction tables");
            builtin_registry()
        }
        (None, Some(x)) => whatever!("--input-type {:?} requires a --data file", x),
        (Some(path), None) | (Some(path), Some("json")) => read_dataset(path),
        (Some(path), Some("xlsx")) => io_xlsx::read_xlsx_dataset(path),
        (Some(_), Some(x)) => whatever!("Input type {:?} not supported (json or xlsx)", x),
    }
}

fn analysis_rules(args: &Args) -> AnalysisRules {
    if args.strict {
        AnalysisRules::STRICT_RULES
    } else {
        AnalysisRules::DEFAULT_RULES
    }
}

pub fn read_reference(path: &str) -> DashboardResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_reference: {} bytes", contents.len());
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

fn write_output(out: Option<&str>, pretty_js: &str) -> DashboardResult<()> {
    match out {
        None | Some("stdout") => {
            println!("{}", pretty_js);
        }
        Some("") => {
            debug!("write_output: empty output path, not writing anything");
        }
        Some(path) => {
            info!("Writing output to {:?}", path);
            fs::write(path, pretty_js).context(WritingOutputSnafu { path })?;
        }
    }
    Ok(())
}

/// Loads the dataset, renders the requested view and writes it out.
pub fn run_dashboard(args: &Args) -> DashboardResult<()> {
    let registry = load_registry(args)?;
    info!(
        "Dataset {:?}: {} bands, {} regions",
        registry.version(),
        registry.bands().len(),
        registry.regions().len()
    );

    let rules = analysis_rules(args);
    let view = View::from_args(args)?;
    info!("view: {:?} rules: {:?}", view, rules);

    let result_js = views::render(&registry, &view, &rules)?;
    let pretty_js = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_output(args.out.as_deref(), &pretty_js)?;

    // The reference output, if provided for comparison
    if let Some(reference_p) = args.reference.as_deref() {
        let reference = read_reference(reference_p)?;
        let pretty_reference =
            serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
        if pretty_reference != pretty_js {
            warn!("Found differences with the reference {:?}", reference_p);
            print_diff(pretty_reference.as_str(), pretty_js.as_str(), "\n");
            return ReferenceMismatchSnafu { path: reference_p }.fail();
        }
        info!("Output matches the reference {:?}", reference_p);
    }

    Ok(())
}
