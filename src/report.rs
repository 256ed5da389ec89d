use super::scatter::SCATTER_SPECS;
use super::{ReportError, Table, DEFAULT_CSV, DEFAULT_OUTDIR, VERSION};
use clap::{App, Arg};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

fn cli_app() -> App<'static, 'static> {
    let arg_csvin = Arg::with_name("input_csvfile")
        .help("benchmark csv table with a header row")
        .long("csv")
        .takes_value(true)
        .default_value(DEFAULT_CSV);
    let arg_outdir = Arg::with_name("output_dir")
        .help("directory for the png plots, created if missing")
        .long("outdir")
        .takes_value(true)
        .default_value(DEFAULT_OUTDIR);
    App::new("bench_report")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to plot scatter charts from a benchmark csv table")
        .arg(arg_csvin)
        .arg(arg_outdir)
}

/// Takes the CLI arguments: the input csv and the output directory.
pub fn parse_cli() -> (PathBuf, PathBuf) {
    let cli_args = cli_app().get_matches();
    paths_from_matches(&cli_args)
}

/// Same as `parse_cli` on explicit arguments, the first one is the program name.
pub fn parse_cli_from<I, T>(args: I) -> Result<(PathBuf, PathBuf), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli_args = cli_app().get_matches_from_safe(args)?;
    Ok(paths_from_matches(&cli_args))
}

fn paths_from_matches(cli_args: &clap::ArgMatches) -> (PathBuf, PathBuf) {
    let csvin = PathBuf::from(cli_args.value_of("input_csvfile").unwrap_or(DEFAULT_CSV));
    let outdir = PathBuf::from(cli_args.value_of("output_dir").unwrap_or(DEFAULT_OUTDIR));
    (csvin, outdir)
}

/// creates the directory and all its missing parents, fine if it already exists
pub fn ensure_dir(dir: &Path) -> Result<(), ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Dir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Loads the table and writes every scatter plot whose columns are present.
/// Nothing is written if the table cannot be loaded.
/// A failing plot does not stop the others; the first failure is returned at the end.
/// Returns the written files, in the order of `SCATTER_SPECS`.
pub fn generate_report(csvin: &Path, outdir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    let table = Table::from_csv(csvin)?;
    ensure_dir(outdir)?;
    let mut written = Vec::with_capacity(SCATTER_SPECS.len());
    let mut first_err = None;
    for spec in SCATTER_SPECS.iter() {
        match spec.render(&table, outdir) {
            Ok(Some(fout)) => written.push(fout),
            Ok(None) => {}
            Err(e) => {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
    }
    debug!(written = written.len(), "report done");
    match first_err {
        Some(e) => Err(e),
        None => Ok(written),
    }
}
