use crate::nlr::{DEFAULT_CUTOFF, DEFAULT_DOMAIN_THRESHOLD};
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

type ArgResult<T> = std::result::Result<T, String>;

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="nlrexpress",
          version=&**FULL_VERSION,
          about="NLR motif prediction and domain annotation",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Predict NLR-related motifs")]
    Predict(PredictArgs),
    #[clap(about = "Annotate proteins with NLR domains from predicted motifs")]
    Annotate(AnnotateArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("predict")))]
#[command(arg_required_else_help(true))]
pub struct PredictArgs {
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(help = "Protein FASTA file (optionally gzipped)")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub input: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-dir")]
    #[clap(help = "Output directory")]
    #[clap(value_name = "OUTPUT_DIR")]
    #[arg(value_parser = check_output_dir)]
    pub output_dir: PathBuf,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "4")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(short = 'd')]
    #[clap(long = "database")]
    #[clap(help = "Target database for the jackhmmer profile search")]
    #[clap(value_name = "DATABASE")]
    #[clap(default_value = "hmmer_db/targetDB.fasta")]
    pub database: PathBuf,

    #[clap(short = 'm')]
    #[clap(long = "models")]
    #[clap(help = "Directory with the motif models")]
    #[clap(value_name = "MODELS_DIR")]
    #[clap(default_value = "models")]
    pub models_dir: PathBuf,

    #[clap(long = "cutoff")]
    #[clap(value_name = "PROB")]
    #[clap(help = "Minimum motif probability to report a hit")]
    #[clap(default_value_t = DEFAULT_CUTOFF)]
    #[arg(value_parser = ensure_unit_float)]
    pub cutoff: f64,

    #[clap(long = "annotate")]
    #[clap(help = "Also write the domain summary")]
    pub annotate: bool,

    #[clap(long = "domain-threshold")]
    #[clap(value_name = "PROB")]
    #[clap(help = "Minimum motif probability for a hit to count towards a domain")]
    #[clap(default_value_t = DEFAULT_DOMAIN_THRESHOLD)]
    #[arg(value_parser = ensure_unit_float)]
    pub domain_threshold: f64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "catalog")]
    #[clap(value_name = "CATALOG")]
    #[clap(help = "Motif catalog file (name family left right span model)")]
    #[arg(value_parser = check_file_exists)]
    pub catalog: Option<PathBuf>,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "jackhmmer")]
    #[clap(value_name = "JACKHMMER")]
    #[clap(help = "jackhmmer executable")]
    #[clap(default_value = "jackhmmer")]
    pub jackhmmer: PathBuf,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "search-timeout")]
    #[clap(value_name = "SECONDS")]
    #[clap(help = "Abort the profile search after this many seconds")]
    pub search_timeout: Option<u64>,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "reuse-profiles")]
    #[clap(help = "Skip the profile search when its output already exists")]
    pub reuse_profiles: bool,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("annotate")))]
#[command(arg_required_else_help(true))]
pub struct AnnotateArgs {
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(help = "Hit table written by predict")]
    #[clap(value_name = "HITS")]
    #[arg(value_parser = check_file_exists)]
    pub input: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-dir")]
    #[clap(help = "Output directory")]
    #[clap(value_name = "OUTPUT_DIR")]
    #[arg(value_parser = check_output_dir)]
    pub output_dir: PathBuf,

    #[clap(long = "domain-threshold")]
    #[clap(value_name = "PROB")]
    #[clap(help = "Minimum motif probability for a hit to count towards a domain")]
    #[clap(default_value_t = DEFAULT_DOMAIN_THRESHOLD)]
    #[arg(value_parser = ensure_unit_float)]
    pub domain_threshold: f64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "catalog")]
    #[clap(value_name = "CATALOG")]
    #[clap(help = "Motif catalog file (name family left right span model)")]
    #[arg(value_parser = check_file_exists)]
    pub catalog: Option<PathBuf>,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "fail-fast")]
    #[clap(help = "Stop at the first protein with an unknown motif")]
    pub fail_fast: bool,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_output_dir(s: &str) -> ArgResult<PathBuf> {
    let path = Path::new(s);
    if path.exists() && !path.is_dir() {
        return Err(format!("Output path is not a directory: {}", path.display()));
    }
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(path.to_path_buf())
}

fn threads_in_range(s: &str) -> ArgResult<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn check_file_exists(s: &str) -> ArgResult<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn ensure_unit_float(s: &str) -> ArgResult<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "The value must be between 0.0 and 1.0, got: {}",
            value
        ))
    } else {
        Ok(value)
    }
}
