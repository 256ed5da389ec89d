use anyhow::{Context, Result};
use bench_plots::report::{generate_report, parse_cli};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // diagnostics go to stderr, stdout only gets the completion line
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let (csvin, outdir) = parse_cli();
    info!(
        "read data from {} and plot to {}",
        csvin.display(),
        outdir.display()
    );
    let written = generate_report(&csvin, &outdir)
        .with_context(|| format!("report from {} failed", csvin.display()))?;
    info!("{} plot(s) written", written.len());
    println!("Reports written to {}", outdir.display());
    Ok(())
}
