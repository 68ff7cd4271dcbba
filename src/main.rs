//! wav2mp3 CLI entry point

use clap::Parser;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use wav2mp3::config::{Cli, Settings};
use wav2mp3::pipeline::{self, CancelFlag};
use wav2mp3::RunSummary;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Console logging outside a run; each run adds its own log file
    init_logging(&cli);

    // Build settings from CLI
    let settings = Settings::from_cli(&cli);

    // Validate inputs
    if let Err(e) = validate_inputs(&cli) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    // First Ctrl-C stops new and in-flight conversions
    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!("\nInterrupted, finishing up...");
        handler_flag.cancel();
    }) {
        warn!("Could not install interrupt handler: {}", e);
    }

    // Failed files do not change the exit status
    match pipeline::run_with_cancel(&settings, &cancel) {
        Ok(summary) => {
            if cli.json {
                print_json(&summary);
            } else {
                print_summary(&summary, &settings);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = cli.log_level().as_str().to_ascii_lowercase();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn validate_inputs(cli: &Cli) -> Result<(), String> {
    if !cli.source.is_dir() {
        return Err(format!(
            "Source directory does not exist: {}\n\n  Tip: Check the path is correct and accessible.\n  Example:\n    wav2mp3 ~/Music/masters ~/Music/mp3 320k",
            cli.source.display()
        ));
    }
    Ok(())
}

fn print_json(summary: &RunSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize summary: {}", e),
    }
}

fn print_summary(summary: &RunSummary, settings: &Settings) {
    println!();
    if summary.dry_run {
        println!("=== DRY RUN (nothing was written) ===");
    }
    println!("Files found:    {}", summary.total_files);
    if summary.dry_run {
        println!("Would convert:  {}", summary.would_convert);
    } else {
        println!("Converted:      {}", summary.converted);
    }
    println!("Skipped:        {}", summary.skipped);
    println!("Failed:         {}", summary.failed);
    if summary.cancelled > 0 {
        println!("Cancelled:      {}", summary.cancelled);
    }
    println!();
    println!(
        "Log: {}",
        settings
            .destination
            .join(wav2mp3::logging::LOG_FILE_NAME)
            .display()
    );
}
