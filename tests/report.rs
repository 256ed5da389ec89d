use bench_plots::report::generate_report;
use bench_plots::scatter::SCATTER_SPECS;
use bench_plots::{ReportError, TableError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const PROVE: &str = "prove_vs_constraints.png";
const MEMORY: &str = "memory_vs_params.png";
const GAS: &str = "evm_gas_vs_params.png";

fn write_csv(dir: &TempDir, data: &str) -> PathBuf {
    let csvin = dir.path().join("bench.csv");
    fs::write(&csvin, data).unwrap();
    csvin
}

fn is_png(path: &Path) -> bool {
    let bytes = fs::read(path).unwrap();
    bytes.starts_with(&[0x89, b'P', b'N', b'G'])
}

#[test]
fn prove_plot_only_when_both_columns_present() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write_csv(&dir, "constraints,prove_ms\n1,10\n2,20\n3,30\n");
    let outdir = dir.path().join("out");

    let written = generate_report(&csvin, &outdir).unwrap();

    assert_eq!(written, vec![outdir.join(PROVE)]);
    assert!(is_png(&outdir.join(PROVE)));
    assert!(!outdir.join(MEMORY).exists());
    assert!(!outdir.join(GAS).exists());
}

#[test]
fn params_plots_tolerate_missing_values() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write_csv(&dir, "params,memory_mb,evm_gas\n1,5,100\n2,,200\n");
    let outdir = dir.path().join("out");

    generate_report(&csvin, &outdir).unwrap();

    assert!(is_png(&outdir.join(MEMORY)));
    assert!(is_png(&outdir.join(GAS)));
    assert!(!outdir.join(PROVE).exists());
}

#[test]
fn header_only_table_gives_empty_plots() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write_csv(&dir, "prove_ms,constraints,memory_mb,params,evm_gas\n");
    let outdir = dir.path().join("out");

    let written = generate_report(&csvin, &outdir).unwrap();

    assert_eq!(written.len(), SCATTER_SPECS.len());
    for spec in SCATTER_SPECS.iter() {
        assert!(is_png(&outdir.join(spec.filename)));
    }
}

#[test]
fn unrecognized_columns_write_no_plots() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write_csv(&dir, "circuit_name,verify_ms\nsha256,3\n");
    let outdir = dir.path().join("nested").join("out");

    let written = generate_report(&csvin, &outdir).unwrap();

    assert!(written.is_empty());
    assert!(outdir.is_dir());
    assert_eq!(fs::read_dir(&outdir).unwrap().count(), 0);
}

#[test]
fn missing_csv_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let outdir = dir.path().join("out");

    let err = generate_report(&dir.path().join("nope.csv"), &outdir).unwrap_err();

    assert!(matches!(err, ReportError::Load { .. }));
    assert!(!outdir.exists());
}

#[test]
fn empty_csv_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write_csv(&dir, "");
    let outdir = dir.path().join("out");

    let err = generate_report(&csvin, &outdir).unwrap_err();

    assert!(matches!(
        err,
        ReportError::Load {
            source: TableError::Empty,
            ..
        }
    ));
    assert!(!outdir.exists());
}

#[test]
fn short_rows_still_plot() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write_csv(&dir, "constraints,prove_ms\n1,10\n2\n3,30\n");
    let outdir = dir.path().join("out");

    let written = generate_report(&csvin, &outdir).unwrap();

    assert_eq!(written, vec![outdir.join(PROVE)]);
    assert!(is_png(&outdir.join(PROVE)));
}

#[test]
fn extreme_values_still_plot() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write_csv(
        &dir,
        "constraints,prove_ms,params,evm_gas\n-1e308,1,0,1\n1e308,2,1.7e308,2\n",
    );
    let outdir = dir.path().join("out");

    generate_report(&csvin, &outdir).unwrap();

    assert!(is_png(&outdir.join(PROVE)));
    assert!(is_png(&outdir.join(GAS)));
}

#[test]
fn failing_plot_does_not_stop_the_others() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write_csv(
        &dir,
        "constraints,prove_ms,params,memory_mb,evm_gas\n1,10,2,64,21000\n",
    );
    let outdir = dir.path().join("out");
    // a directory where the first png should go makes that plot fail
    fs::create_dir_all(outdir.join(PROVE)).unwrap();

    let err = generate_report(&csvin, &outdir).unwrap_err();

    match err {
        ReportError::Render { path, .. } => assert_eq!(path, outdir.join(PROVE)),
        other => panic!("expected a render error, got {:?}", other),
    }
    assert!(is_png(&outdir.join(MEMORY)));
    assert!(is_png(&outdir.join(GAS)));
}

#[test]
fn rerun_overwrites_the_same_files() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write_csv(
        &dir,
        "constraints,prove_ms,params,evm_gas\n10,1.5,3,21000\n20,,4,42000\n",
    );
    let outdir = dir.path().join("out");

    let first = generate_report(&csvin, &outdir).unwrap();
    let second = generate_report(&csvin, &outdir).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, vec![outdir.join(PROVE), outdir.join(GAS)]);
    assert!(!outdir.join(MEMORY).exists());
}

#[test]
fn binary_prints_completion_line() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write_csv(&dir, "constraints,prove_ms\n1,10\n");
    let outdir = dir.path().join("out");

    let output = Command::new(env!("CARGO_BIN_EXE_bench_report"))
        .arg("--csv")
        .arg(&csvin)
        .arg("--outdir")
        .arg(&outdir)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim_end(), format!("Reports written to {}", outdir.display()));
    assert!(outdir.join(PROVE).exists());
}

#[test]
fn binary_fails_on_missing_csv() {
    let dir = tempfile::tempdir().unwrap();
    let outdir = dir.path().join("out");

    let output = Command::new(env!("CARGO_BIN_EXE_bench_report"))
        .arg("--csv")
        .arg(dir.path().join("nope.csv"))
        .arg("--outdir")
        .arg(&outdir)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(!outdir.exists());
}

#[test]
fn binary_fails_on_empty_csv() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write_csv(&dir, "");

    let output = Command::new(env!("CARGO_BIN_EXE_bench_report"))
        .arg("--csv")
        .arg(&csvin)
        .arg("--outdir")
        .arg(dir.path().join("out"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn binary_rejects_unknown_arguments() {
    let output = Command::new(env!("CARGO_BIN_EXE_bench_report"))
        .arg("--format")
        .arg("svg")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
