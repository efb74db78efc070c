// src/main.rs

use clap::Parser;
use color_eyre::eyre::Result;
use std::process;
use tracing::{error, info};
use vanguard_wp::cli::Cli;
use vanguard_wp::ui::{Console, StdinPrompt, TerminalConsole, is_interactive};
use vanguard_wp::{
    logging, ExitStatus, GateOutcome, GateReport, HttpTarget, ScanGate, ScanOptions, SignatureDatabase, Target,
};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too, with a success status.
            let status = if e.use_stderr() { ExitStatus::CliOptionError } else { ExitStatus::Ok };
            let _ = e.print();
            process::exit(status.code());
        }
    };
    let options = cli.into_options(is_interactive());

    if let Err(e) = color_eyre::install() {
        eprintln!("Warning: Failed to install error reporter: {}", e);
    }
    match logging::initialize_logging(options.verbose) {
        Ok(path) => info!(log = %path.display(), "Logging initialized."),
        Err(e) => eprintln!("Warning: Failed to initialize logging: {}", e),
    }
    info!(
        options = %serde_json::to_string(&options).unwrap_or_default(),
        "Starting pre-scan gate."
    );

    let status = match run(&options).await {
        Ok(status) => status,
        Err(report) => {
            error!(error = %report, "Unexpected failure.");
            eprintln!("{:?}", report);
            ExitStatus::Exception
        }
    };
    info!(%status, code = status.code(), "Exiting.");
    process::exit(status.code());
}

async fn run(options: &ScanOptions) -> Result<ExitStatus> {
    let mut console = TerminalConsole::stdout();
    let mut prompt = StdinPrompt;

    let db = SignatureDatabase::new(
        &options.db_dir,
        options.db_source.clone(),
        options.request_timeout,
        &options.user_agent,
    )?;
    let mut target = options.url.clone().map(|url| HttpTarget::new(url, options)).transpose()?;

    let outcome = ScanGate::new(options, &mut console, &mut prompt)
        .run(&db, target.as_mut().map(|t| t as &mut dyn Target))
        .await;

    match outcome {
        Ok(outcome) => {
            if let GateOutcome::Proceed(report) = &outcome {
                console.ready(&summary(options, report));
            }
            Ok(outcome.exit_status())
        }
        Err(e) => {
            error!(error = %e, "Pre-scan gate aborted.");
            console.aborted(&e.to_string());
            Ok(e.exit_status())
        }
    }
}

fn summary(options: &ScanOptions, report: &GateReport) -> String {
    let url = options.url.as_ref().map(|u| u.as_str()).unwrap_or_default();
    let last_update = report
        .last_update
        .map(|d| d.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    format!(
        "{} is ready to be scanned (server module: {}, database last updated: {})",
        url, report.server, last_update
    )
}
