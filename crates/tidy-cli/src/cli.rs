//! CLI argument definitions for the observatory.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use crate::pages::{
    DEFAULT_MAX_YEAR, DEFAULT_TREND_COUNTRIES, GdpRequest, IncomeRequest, MapRequest,
    PopulationRequest, TrendsRequest,
};

#[derive(Parser)]
#[command(
    name = "observatory",
    version,
    about = "Child mortality observatory over Gapminder country/year tables",
    long_about = "Load wide country/year CSV tables, reshape them to long form,\n\
                  join them on (country, year) and print or export the result\n\
                  of each page's filter chain."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Dataset catalog overriding the built-in sources.
    #[arg(long = "catalog", value_name = "TOML", global = true)]
    pub catalog: Option<PathBuf>,

    /// Export the page result to a .csv or .json file.
    #[arg(long = "output", short = 'o', value_name = "PATH", global = true)]
    pub output: Option<PathBuf>,

    /// Rows printed per table.
    #[arg(long = "limit", default_value_t = 20, global = true)]
    pub limit: usize,
}

#[derive(Subcommand)]
pub enum Command {
    /// Child mortality for every country in one year.
    Map(MapArgs),

    /// Child mortality and life expectancy over time.
    Trends(TrendsArgs),

    /// Child mortality and population for one country.
    Population(PopulationArgs),

    /// Child mortality against GDP per capita for the richest countries.
    Gdp(GdpArgs),

    /// Child mortality against daily income.
    Income(IncomeArgs),

    /// List the datasets of the catalog.
    Datasets,
}

#[derive(Args)]
pub struct MapArgs {
    /// Year to show (default: latest available, at most 2024).
    #[arg(long)]
    pub year: Option<i32>,
}

impl From<&MapArgs> for MapRequest {
    fn from(args: &MapArgs) -> Self {
        Self { year: args.year }
    }
}

#[derive(Args)]
pub struct TrendsArgs {
    /// Countries to include.
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = DEFAULT_TREND_COUNTRIES.map(String::from)
    )]
    pub countries: Vec<String>,

    /// First year, inclusive.
    #[arg(long, default_value_t = 1900)]
    pub from: i32,

    /// Last year, inclusive.
    #[arg(long, default_value_t = DEFAULT_MAX_YEAR)]
    pub to: i32,
}

impl From<&TrendsArgs> for TrendsRequest {
    fn from(args: &TrendsArgs) -> Self {
        Self {
            countries: args.countries.iter().cloned().collect(),
            from: args.from,
            to: args.to,
        }
    }
}

#[derive(Args)]
pub struct PopulationArgs {
    /// Country to show.
    #[arg(long, default_value = "India")]
    pub country: String,

    /// Keep only years divisible by this step.
    #[arg(long, default_value_t = 20)]
    pub every: u32,
}

impl From<&PopulationArgs> for PopulationRequest {
    fn from(args: &PopulationArgs) -> Self {
        Self {
            country: args.country.clone(),
            every: args.every,
        }
    }
}

#[derive(Args)]
pub struct GdpArgs {
    /// Year to show (default: latest available, at most 2024).
    #[arg(long)]
    pub year: Option<i32>,

    /// Number of countries with the highest GDP per capita.
    #[arg(long, default_value_t = 30)]
    pub top: usize,

    /// Countries to leave out.
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,
}

impl From<&GdpArgs> for GdpRequest {
    fn from(args: &GdpArgs) -> Self {
        Self {
            year: args.year,
            top: args.top,
            exclude: args.exclude.iter().cloned().collect(),
        }
    }
}

#[derive(Args)]
pub struct IncomeArgs {
    /// Year to show (default: latest available, at most --max-year).
    #[arg(long)]
    pub year: Option<i32>,

    /// Latest year considered.
    #[arg(long = "max-year", default_value_t = DEFAULT_MAX_YEAR)]
    pub max_year: i32,

    /// Countries to leave out.
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,
}

impl From<&IncomeArgs> for IncomeRequest {
    fn from(args: &IncomeArgs) -> Self {
        Self {
            year: args.year,
            max_year: args.max_year,
            exclude: args.exclude.iter().cloned().collect(),
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
