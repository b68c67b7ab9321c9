//! CLI entry point for the solar data dashboard.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde_json::{Value, json};
use solar_eda::{
    AnalysisMode, AnalysisOutput, ChartArtifact, DashboardConfig, DashboardShell, SessionState,
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Solar Data Analysis Dashboard",
    long_about = "Exploratory analysis of solar sensor exports.\n\n\
                  MODES:\n  \
                  summary-statistics, missing-values, outliers, negative-values,\n  \
                  time-series-plot, area-plot, impact-of-cleaning, correlation-analysis,\n  \
                  wind-analysis, temperature-analysis, histograms\n\n\
                  EXAMPLES:\n  \
                  # Summary statistics of an export\n  \
                  solar-eda -i benin-malanville.csv\n\n  \
                  # Every analysis, charts written to ./outputs\n  \
                  solar-eda -i benin-malanville.csv --all\n\n  \
                  # Interactive session\n  \
                  solar-eda --interactive"
)]
struct Args {
    /// CSV file to upload
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Analysis to run (label or kebab-case); repeatable
    #[arg(short, long = "mode")]
    modes: Vec<AnalysisMode>,

    /// Run all eleven analyses
    #[arg(long)]
    all: bool,

    /// Directory where charts are written
    #[arg(short, long, default_value = "./outputs")]
    output: PathBuf,

    /// Print results as JSON instead of tables
    ///
    /// Disables logging so stdout only contains the JSON document.
    #[arg(long)]
    json: bool,

    /// Start a line-oriented session (upload, mode, modes, status, help, quit)
    #[arg(long)]
    interactive: bool,

    /// Site label used in chart titles
    #[arg(long, default_value = solar_eda::config::DEFAULT_SITE_NAME)]
    site: String,

    /// Number of rows kept from an upload
    #[arg(long, default_value_t = solar_eda::config::DEFAULT_ROW_CAP)]
    row_cap: usize,

    /// Clean uploads (infinities, timestamps, median imputation, duplicates)
    /// before analysing them
    #[arg(long)]
    clean: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// Logging is disabled entirely in JSON mode.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let config = DashboardConfig::builder()
        .row_cap(args.row_cap)
        .site_name(&args.site)
        .clean_uploads(args.clean)
        .build()?;
    let mut shell = DashboardShell::new(config)?;

    if let Some(input) = &args.input {
        let session = shell.upload_file(input)?;
        info!(
            "Dataset ready: {} rows x {} columns",
            session.data().height(),
            session.data().width()
        );
    }

    if args.interactive {
        return run_interactive(&mut shell, &args);
    }

    if args.input.is_none() {
        return Err(anyhow!("No input file given (use --input or --interactive)"));
    }

    let modes: Vec<AnalysisMode> = if args.all {
        AnalysisMode::ALL.to_vec()
    } else if args.modes.is_empty() {
        vec![AnalysisMode::SummaryStatistics]
    } else {
        args.modes.clone()
    };

    run_modes(&shell, &modes, &args)
}

/// Run the requested modes once and report every result.
fn run_modes(shell: &DashboardShell, modes: &[AnalysisMode], args: &Args) -> Result<()> {
    let mut records = Vec::with_capacity(modes.len());
    let mut failures = 0;

    for &mode in modes {
        let output = shell.select(mode);
        if output.is_error() {
            failures += 1;
        }

        if args.json {
            records.push(json_record(mode, &output, &args.output)?);
        } else {
            print_output(mode, &output, &args.output)?;
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    if failures > 0 {
        return Err(anyhow!("{} of {} analyses failed", failures, modes.len()));
    }
    Ok(())
}

/// Write a chart into the output directory as `<mode>.svg`.
fn save_chart(mode: AnalysisMode, chart: &ChartArtifact, dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Creating output directory {}", dir.display()))?;
        info!("Created output directory: {}", dir.display());
    }
    let path = dir.join(format!("{}.svg", mode.slug()));
    chart.write_to(&path)?;
    debug!("Wrote '{}' to {}", chart.title, path.display());
    Ok(path)
}

fn json_record(mode: AnalysisMode, output: &AnalysisOutput, dir: &Path) -> Result<Value> {
    let record = match output {
        AnalysisOutput::Chart { chart } => {
            let path = save_chart(mode, chart, dir)?;
            json!({
                "mode": mode.label(),
                "kind": "chart",
                "title": chart.title,
                "file": path.display().to_string(),
            })
        }
        other => {
            let mut value = serde_json::to_value(other)?;
            value["mode"] = json!(mode.label());
            value
        }
    };
    Ok(record)
}

/// Print one result for a human reader.
///
/// Uses `println!` rather than logging: this is the command's output.
fn print_output(mode: AnalysisMode, output: &AnalysisOutput, dir: &Path) -> Result<()> {
    println!("\n{}", "=".repeat(80));
    println!("{}", mode.heading().to_uppercase());
    println!("{}", "=".repeat(80));

    match output {
        AnalysisOutput::Prompt { message } => println!("{message}"),
        AnalysisOutput::Summary { statistics } => print!("{statistics}"),
        AnalysisOutput::Counts { report } => print!("{report}"),
        AnalysisOutput::Chart { chart } => {
            let path = save_chart(mode, chart, dir)?;
            println!("{} -> {}", chart.title, path.display());
        }
        AnalysisOutput::Error { code, message } => {
            eprintln!("  ! [{code}] {message}");
        }
    }
    Ok(())
}

const HELP: &str = "\
Commands:
  upload <path>   load a CSV file
  mode <name|n>   run an analysis (label, kebab-case or number)
  modes           list analyses
  status          show the loaded dataset
  help            show this message
  quit            leave the session";

/// Line-oriented dashboard session on stdin.
fn run_interactive(shell: &mut DashboardShell, args: &Args) -> Result<()> {
    println!("Solar Data Analysis Dashboard");
    println!("{HELP}");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let (command, rest) = match line.trim().split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line.trim(), ""),
        };

        match command {
            "" => {}
            "quit" | "exit" | "q" => break,
            "help" | "?" => println!("{HELP}"),
            "modes" => {
                for (i, mode) in AnalysisMode::ALL.iter().enumerate() {
                    println!("  {:>2}. {}", i + 1, mode);
                }
            }
            "status" => match shell.state() {
                SessionState::AwaitingUpload => println!("No dataset loaded."),
                SessionState::Ready(session) => println!(
                    "{}: {} rows x {} columns ({} rows in file)",
                    session.name(),
                    session.data().height(),
                    session.data().width(),
                    session.rows_parsed()
                ),
            },
            "upload" => match shell.upload_file(rest) {
                Ok(session) => println!(
                    "Loaded {}: {} rows x {} columns",
                    session.name(),
                    session.data().height(),
                    session.data().width()
                ),
                Err(e) => eprintln!("Upload failed: {e}"),
            },
            "mode" => match parse_mode_arg(rest) {
                Ok(mode) => print_output(mode, &shell.select(mode), &args.output)?,
                Err(e) => eprintln!("{e}"),
            },
            other => eprintln!("Unknown command '{other}'. Type 'help' for commands."),
        }
    }

    Ok(())
}

/// A mode given by name or by its 1-based menu number.
fn parse_mode_arg(arg: &str) -> Result<AnalysisMode, String> {
    if let Ok(n) = arg.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| AnalysisMode::ALL.get(i).copied())
            .ok_or_else(|| format!("No analysis number {n}"));
    }
    arg.parse()
}
