use clap::Parser;
use log::info;

use aep_snapshot::cli::Args;
use aep_snapshot::runner;

fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first (needed for log setup)
    let args = Args::parse();
    runner::init_logger(args.verbosity, args.log_file.as_deref())?;
    info!("aep-snapshot v{}", env!("CARGO_PKG_VERSION"));

    let summary = runner::run(&args)?;
    println!(
        "Exported {} of {} document(s), {} failed, {} item(s) skipped",
        summary.succeeded,
        summary.succeeded + summary.failed,
        summary.failed,
        summary.skipped_items
    );

    if !summary.all_ok() {
        std::process::exit(1);
    }
    Ok(())
}
