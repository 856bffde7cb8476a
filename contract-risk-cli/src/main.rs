use std::io::Write;
use std::process;

use clap::Parser;
use contract_risk_cli::Cli;

fn run(cli: Cli) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli.execute(&mut out)?;
    out.flush()?;
    Ok(())
}

fn main() {
    // RUST_LOG overrides the default; stderr keeps stdout clean for JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  Caused by: {err}");
            source = err.source();
        }

        process::exit(1);
    }
}
