use std::process::ExitCode;

use stockcache::{config::is_informational, pipeline, Cli, Outcome};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    // ─── 1) config (.env first so RUST_LOG can come from it) ──────────
    let config = match Cli::load() {
        Ok(cli) => cli.into_config(),
        Err(e) if is_informational(&e) => {
            print!("{e}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            // every failure exits 1, argument errors included
            println!("\nrun failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    // ─── 2) init logging ──────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!(
        endpoint = %config.endpoint,
        out_dir = %config.out_dir.display(),
        schema = ?config.code_schema,
        "startup"
    );

    // ─── 3) fetch → un-pivot → write ──────────────────────────────────
    match pipeline::run(&config) {
        Ok(Outcome::NoData) => {
            info!("no data to process; exit");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Written(summary)) => {
            info!(
                stores = summary.stores,
                products = summary.product_columns,
                skipped = summary.skipped_rows,
                files = summary.files.len(),
                "all done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "run failed");
            println!("\nrun failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}
