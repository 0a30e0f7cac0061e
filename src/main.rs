use std::sync::Arc;

use clap::Parser;
use dirty_tracker::cli::commands::{cmd_replay, cmd_snapshot, cmd_surfaces};
use dirty_tracker::cli::config::{Cli, Commands, load_config, resolve_trace_path};
use dirty_tracker::trace::logger::TraceLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Trace path: CLI > config > off
    let tracer = resolve_trace_path(cli.trace.as_deref(), &config).map(|path| {
        if cli.verbose > 0 {
            eprintln!("Tracing to {}", path);
        }
        Arc::new(TraceLogger::new(path))
    });

    match cli.command {
        Commands::Replay {
            scenario,
            format,
            output,
        } => {
            let format = format.unwrap_or_else(|| config.replay.format.clone());
            let output = output.or_else(|| config.replay.output.clone());
            let all_passed = cmd_replay(
                &scenario,
                &format,
                output.as_deref(),
                &config,
                tracer,
                cli.verbose,
            )?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Snapshot {
            surface,
            fields,
            sorted_keys,
        } => {
            print!("{}", cmd_snapshot(&surface, fields.as_deref(), sorted_keys, &config)?);
        }
        Commands::Surfaces => {
            print!("{}", cmd_surfaces());
        }
    }

    Ok(())
}
