use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use rowflow::config::{FormatOptions, LabelStyleConfig, SankeyConfig, SeriesConfig};
use rowflow::palette::Color;
use rowflow::table::ResultSet;
use rowflow::{sankey, series};
use serde::Serialize;

#[derive(Debug, clap::Parser)]
#[clap(
    name = "rowflow",
    about = "Reshapes tabular query results into chart-ready flow graphs and series.",
    version
)]
struct Cli {
    #[clap(subcommand)]
    subcommand: Subcommands,
}

#[derive(Debug, Parser)]
struct FormatArgs {
    /// Separator joining groupby values into one label
    #[clap(long, default_value = ", ")]
    separator: String,
    /// Rendered in place of null or missing values
    #[clap(long, default_value = "<NULL>")]
    null_string: String,
    /// strftime pattern for temporal columns, e.g. "%Y-%m-%d"
    #[clap(long)]
    date_format: Option<String>,
    /// Fixed decimal digits for numeric values
    #[clap(long)]
    number_precision: Option<usize>,
}

impl FormatArgs {
    fn into_options(self) -> FormatOptions {
        FormatOptions {
            separator: self.separator,
            null_string: self.null_string,
            date_format: self.date_format,
            number_precision: self.number_precision,
        }
    }
}

#[derive(Debug, Parser)]
struct SankeyArgs {
    #[clap(short, long)]
    input_file: String,
    #[clap(short, long)]
    output_file: String,
    /// Ordered path columns; consecutive pairs become flow hops
    #[clap(short, long, value_delimiter = ',', required = true)]
    groupby: Vec<String>,
    /// Metric column summed into edge weights
    #[clap(short, long)]
    metric: String,
    #[clap(short, long, default_value = "vivid")]
    color_scheme: String,
    #[clap(flatten)]
    format: FormatArgs,
    /// Apply the custom label style to --label-names
    #[clap(long)]
    show_label: bool,
    /// "; "-delimited node names to restyle
    #[clap(long, default_value = "")]
    label_names: String,
    #[clap(long)]
    bold: bool,
    #[clap(long, default_value = "#ff0000")]
    label_color: Color,
}

#[derive(Debug, Parser)]
struct SeriesArgs {
    #[clap(short, long)]
    input_file: String,
    #[clap(short, long)]
    output_file: String,
    /// Columns whose joined values name each data point
    #[clap(short, long, value_delimiter = ',', required = true)]
    groupby: Vec<String>,
    /// Metric column providing point values
    #[clap(short, long)]
    metric: String,
    /// Breakdown column splitting rows into stacked sub-series
    #[clap(short, long)]
    breakdown: Option<String>,
    /// Stack group name applied to every series
    #[clap(long)]
    stack: Option<String>,
    #[clap(short, long, default_value = "vivid")]
    color_scheme: String,
    #[clap(flatten)]
    format: FormatArgs,
}

#[derive(Debug, clap::Subcommand)]
enum Subcommands {
    /// Build sankey flow-graph chart data from a query result
    Sankey(SankeyArgs),
    /// Build column/pie series chart data from a query result
    Series(SeriesArgs),
}

fn read_result_set(path: &str) -> Result<ResultSet> {
    let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;
    serde_json::from_reader(file).with_context(|| format!("Failed to parse result set in {path}"))
}

fn write_chart_data<T: Serialize>(path: &str, data: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {path}"))?;
    serde_json::to_writer_pretty(file, data)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();
    match args.subcommand {
        Subcommands::Sankey(args) => {
            let result = read_result_set(&args.input_file)?;
            let config = SankeyConfig {
                groupby: args.groupby,
                metric: args.metric,
                color_scheme: args.color_scheme,
                format: args.format.into_options(),
                label_style: LabelStyleConfig {
                    show_label: args.show_label,
                    label_names: args.label_names,
                    bold: args.bold,
                    label_color: args.label_color,
                },
            };
            let chart = sankey::transform(&result, &config);
            println!("Writing sankey chart data to {}", args.output_file);
            write_chart_data(&args.output_file, &chart)
        }
        Subcommands::Series(args) => {
            let result = read_result_set(&args.input_file)?;
            let config = SeriesConfig {
                groupby: args.groupby,
                breakdown: args.breakdown,
                metric: args.metric,
                stack: args.stack,
                color_scheme: args.color_scheme,
                format: args.format.into_options(),
            };
            let chart = series::transform(&result, &config);
            println!("Writing series chart data to {}", args.output_file);
            write_chart_data(&args.output_file, &chart)
        }
    }
}
