use clap::Parser;
use lilsync::commands::schedule::Scheduler;
use lilsync::commands::{cleanup, sync};
use lilsync::config::Cli;
use lilsync::{logging, ui, Config, FileLogger, LogSink};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Convert CLI args to Config - this validates immediately
    let config = match Config::try_from(cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = logging::init_tracing() {
        eprintln!("warning: console logging unavailable: {}", err);
    }

    if config.cleanup {
        let report = cleanup::run(&config)?;
        ui::print_cleanup_summary(&report);
        return Ok(());
    }

    println!("lilsync v{}", lilsync::VERSION);
    println!("  Source: {}", config.source.display());
    println!("  Replica: {}", config.replica.display());
    println!("  Log file: {}", config.log_file.display());
    if config.replica_missing() {
        println!(
            "Replica folder {} does not exist; it will be created on the first pass.",
            config.replica.display()
        );
    }

    let logger = Arc::new(FileLogger::open(&config.log_file)?);

    if config.once {
        sync::run(&config, logger.as_ref())?;
        return Ok(());
    }

    println!("  Interval: {}s (ctrl-c to stop)", config.interval.as_secs());
    let log: Arc<dyn LogSink> = logger;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let stats = runtime.block_on(Scheduler::new(config, log).run());

    println!(
        "Stopped after {} pass(es), {} aborted, {} tick(s) dropped while busy.",
        stats.passes_completed, stats.passes_aborted, stats.ticks_skipped
    );
    Ok(())
}
