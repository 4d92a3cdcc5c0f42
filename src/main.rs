use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use trivysum::{
    config::Config,
    gate::exit_codes,
    logging,
    model::Threshold,
    output::{ColorChoice, OutputFormat},
    RunOptions,
};

#[derive(Parser)]
#[command(name = "trivysum")]
#[command(
    author,
    version,
    about = "Summarize a Trivy JSON report and gate on severity"
)]
struct Cli {
    /// Path to Trivy JSON output file
    #[arg(short, long)]
    input: PathBuf,

    /// Exit with code 1 if any vulnerability at or above this severity is found
    #[arg(short, long, value_enum, ignore_case = true)]
    fail_on: Option<FailLevel>,

    /// Also save the summary (without colors) to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long)]
    format: Option<String>,

    /// When to use colors (auto, always, never)
    #[arg(long)]
    color: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum FailLevel {
    #[value(name = "CRITICAL")]
    Critical,
    #[value(name = "HIGH")]
    High,
    #[value(name = "MEDIUM")]
    Medium,
    #[value(name = "LOW")]
    Low,
}

impl From<FailLevel> for Threshold {
    fn from(level: FailLevel) -> Self {
        match level {
            FailLevel::Critical => Threshold::Critical,
            FailLevel::High => Threshold::High,
            FailLevel::Medium => Threshold::Medium,
            FailLevel::Low => Threshold::Low,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            println!("[ERROR] {}", e);
            ExitCode::from(exit_codes::FAILURE)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let config = Config::load(cli.config.as_deref())?;

    let format = match cli.format {
        Some(f) => OutputFormat::from_str(&f).map_err(|e| anyhow::anyhow!(e))?,
        None => config.format,
    };
    let color = match cli.color {
        Some(c) => ColorChoice::from_str(&c).map_err(|e| anyhow::anyhow!(e))?,
        None => config.color,
    };

    let options = RunOptions {
        fail_on: cli.fail_on.map(Threshold::from).or(config.fail_on),
        output: cli.output,
        format,
        color: color.use_color(),
        limits: config.display.limits(),
        ignore: config.ignore,
        ..RunOptions::new(cli.input)
    };

    let mut stdout = io::stdout().lock();
    Ok(trivysum::run_reporting(&options, &mut stdout))
}
