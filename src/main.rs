//! pg2xlsx - Export the result of a PostgreSQL query to an xlsx spreadsheet.

use pg2xlsx::cli::Cli;
use pg2xlsx::config::Config;
use pg2xlsx::credentials::{ConsolePrompt, PgPassFile};
use pg2xlsx::error::{ExportError, Result};
use pg2xlsx::export::{self, RunOutcome};
use pg2xlsx::logging;
use tracing::debug;

fn main() {
    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.verbose);

    if let Err(e) = run(cli) {
        debug!("Aborting with {}", e.category());
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration file
    let config_path = cli.config_path();
    debug!("Loading config from: {}", config_path.display());
    let file = Config::load_from_file(&config_path)?;

    let config = cli.to_export_config(&file)?;
    let store = PgPassFile::default_location();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ExportError::internal(format!("unable to start runtime: {e}")))?;

    match runtime.block_on(export::run(&config, &store, &ConsolePrompt))? {
        RunOutcome::Connected(target) => println!("Connection OK: {target}"),
        RunOutcome::Exported(summary) => debug!(
            "Exported {} rows to {}",
            summary.rows,
            summary.output.display()
        ),
    }

    Ok(())
}
