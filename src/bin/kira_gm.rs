use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use kira_genome_map::app::{App, NoopSink, ProgressEvent, ProgressSink, summarize};
use kira_genome_map::config::ConfigLoader;
use kira_genome_map::error::{ErrorKind, KiraError};
use kira_genome_map::output::{DEFAULT_OUTPUT_PATH, JsonOutput, OutputMode, write_catalog};
use kira_genome_map::ucsc::UcscHttpClient;

#[derive(Parser)]
#[command(name = "kira-gm")]
#[command(about = "Build a JSON map of UCSC chromosome sizes and cytobands per genome alias")]
#[command(version, author)]
struct Cli {
    /// JSON config with aliases, base URL and chromosome set (default: ./kira-gm.json if present)
    #[arg(long)]
    config: Option<String>,

    /// Destination file for the genome map
    #[arg(long, short, default_value = DEFAULT_OUTPUT_PATH)]
    output: Utf8PathBuf,

    /// Print the genome map to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Override the UCSC goldenPath base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Emit a JSON build summary instead of a human message
    #[arg(long)]
    non_interactive: bool,

    /// Suppress progress messages
    #[arg(long, short)]
    quiet: bool,
}

struct LogSink;

impl ProgressSink for LogSink {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => tracing::info!("{} ({:.2}s)", event.message, elapsed.as_secs_f64()),
            None => tracing::info!("{}", event.message),
        }
    }
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(kira) = report.downcast_ref::<KiraError>() {
            return ExitCode::from(map_exit_code(kira));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &KiraError) -> u8 {
    match error.kind() {
        ErrorKind::Config => 2,
        ErrorKind::Transport | ErrorKind::Decode => 3,
        ErrorKind::Format => 4,
        ErrorKind::Filesystem => 1,
    }
}

fn run() -> miette::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let mut config = ConfigLoader::resolve(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url.trim().trim_end_matches('/').to_string();
    }

    let client = UcscHttpClient::new()?;
    let app = App::new(client);
    let catalog = if cli.quiet {
        app.build(&config, &NoopSink)?
    } else {
        app.build(&config, &LogSink)?
    };

    if cli.stdout {
        JsonOutput::print_catalog(&catalog).into_diagnostic()?;
        return Ok(());
    }

    write_catalog(&cli.output, &catalog)?;
    match output_mode {
        OutputMode::NonInteractive => {
            JsonOutput::print_summary(&summarize(&config, &catalog)).into_diagnostic()?
        }
        OutputMode::Interactive => println!("Wrote genome metadata to {}", cli.output),
    }
    Ok(())
}
