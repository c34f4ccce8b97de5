use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "metapool development team",
    version,
    about = "metapool CLI - Normalization, indexing and pooling picklists for plate-based sequencing library preparation.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to process input plates.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build DNA normalization picklists from plate-reader quantifications.
    Normalize(NormalizeArgs),
    /// Build a pooling picklist from qPCR or quantification results.
    Pool(PoolArgs),
    /// Build the index-addition picklist for a plate of samples.
    Index(IndexArgs),
    /// Map wells between the interleaved and column-block 384-well layouts.
    Reformat(ReformatArgs),
}

/// Arguments for the `normalize` subcommand.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Plate-reader export(s); one picklist is written per file.
    #[arg(short, long, required = true, num_args(1..), value_name = "PATH")]
    pub input: Vec<PathBuf>,

    /// Directory receiving the `<stem>.norm_picklist.tsv` files.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Plate reader that produced the inputs (e.g., 'Synergy_HT', 'SpectraMax_i3x').
    #[arg(long, value_name = "NAME")]
    pub plate_reader: Option<String>,

    /// Plate map whose sample names are written into the picklists.
    #[arg(long, value_name = "PATH")]
    pub plate_map: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the DNA mass (ng) delivered from every sample.
    #[arg(long, value_name = "FLOAT")]
    pub target_ng: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S volumes.max-vol=3000
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `pool` subcommand.
#[derive(Args, Debug)]
pub struct PoolArgs {
    /// Per-well measurement table (a qPCR export for Cp input).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the pooling picklist (CSV).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// What the measurements are: 'cp', 'dna' (ng/uL) or 'molar' (nM).
    #[arg(long, value_name = "KIND")]
    pub input_kind: Option<String>,

    /// Pooling policy, overriding the config file
    /// ('equal-volume', 'exclusion-floor', 'minimum-volume-floor').
    #[arg(long, value_name = "ID")]
    pub policy: Option<String>,

    /// Optional per-well weight table with `Well` and `Weight` columns.
    #[arg(long, value_name = "PATH")]
    pub weights: Option<PathBuf>,

    /// Name of the well column in the input table.
    #[arg(long, value_name = "NAME")]
    pub well_column: Option<String>,

    /// Name of the value column in the input table.
    #[arg(long, value_name = "NAME")]
    pub value_column: Option<String>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S qpcr.slope=-3.3
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `index` subcommand.
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Plate map listing each sample and its well.
    #[arg(short = 'm', long, required = true, value_name = "PATH")]
    pub plate_map: PathBuf,

    /// Index combination table (CSV).
    #[arg(short = 'x', long, required = true, value_name = "PATH")]
    pub combos: PathBuf,

    /// Path for the index picklist (TSV).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Position in the combination table of the first combination to use.
    #[arg(long, default_value_t = 0, value_name = "INT")]
    pub start_index: usize,

    /// Orient i5 sequences for this sequencer (e.g., 'NovaSeq', 'MiSeq').
    #[arg(long, value_name = "NAME")]
    pub sequencer: Option<String>,
}

/// Arguments for the `reformat` subcommand.
#[derive(Args, Debug)]
pub struct ReformatArgs {
    /// Wells of a 384-well plate (e.g., 'A1', 'B2').
    #[arg(required = true, num_args(1..), value_name = "WELL")]
    pub wells: Vec<String>,

    /// Map column-block positions back to the interleaved layout.
    #[arg(long)]
    pub inverse: bool,
}
