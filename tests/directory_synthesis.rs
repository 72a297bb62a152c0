//! Integration tests for directory discovery, batch synthesis and output.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use testsynth::config::{load_config_from_dir, ParallelConfig};
use testsynth::{
    collect_source_units, synthesize_batch, synthesize_directory, write_report, SynthConfig,
    SynthError, UnitOutcome,
};

fn fixture_project() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/project")
}

/// Helper to create a temp directory with source files.
fn create_project(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    for (name, content) in files {
        let path = temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write source file");
    }
    temp_dir
}

#[test]
fn test_fixture_project_discovery_skips_existing_tests() {
    let units = collect_source_units(&fixture_project(), &SynthConfig::default()).unwrap();
    let names: Vec<&str> = units.iter().map(|u| u.name.as_str()).collect();

    assert_eq!(
        names,
        vec!["broken.py", "mathops.py", "pkg/__init__.py", "pkg/shapes.py"]
    );
}

#[test]
fn test_fixture_project_batch_reports_in_order() {
    let report = synthesize_directory(&fixture_project(), &SynthConfig::default()).unwrap();

    let names: Vec<&str> = report.outcomes.iter().map(UnitOutcome::unit_name).collect();
    assert_eq!(
        names,
        vec!["broken.py", "mathops.py", "pkg/__init__.py", "pkg/shapes.py"]
    );
    assert_eq!(report.summary.generated, 3);
    assert_eq!(report.summary.failed, 1);

    let diagnostic = report.diagnostics().next().unwrap();
    assert_eq!(diagnostic.unit, "broken.py");
    match &diagnostic.error {
        SynthError::Parse { line, .. } => assert!(line.is_some()),
        other => panic!("expected parse error, got {:?}", other),
    }

    let shapes = report.outcomes[3].module().unwrap();
    assert_eq!(shapes.import_path, "pkg.shapes");
    assert!(shapes.render().contains("from pkg.shapes import calculate_area\n"));
}

#[test]
fn test_written_modules_land_in_output_dir() {
    let out = TempDir::new().unwrap();
    let report = synthesize_directory(&fixture_project(), &SynthConfig::default()).unwrap();

    let written = write_report(&report, out.path()).unwrap();
    assert!(written.skipped.is_empty());
    let mut files: Vec<String> = written
        .paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, vec!["test_mathops.py", "test_pkg.py", "test_shapes.py"]);

    let mathops = fs::read_to_string(out.path().join("test_mathops.py")).unwrap();
    assert!(mathops.starts_with("# Generated by testsynth from mathops.py\n"));
    assert!(mathops.contains("class TestMathops:\n"));
    assert!(mathops.contains("        assert multiply(4, 5) == 20\n"));
    assert!(mathops.contains("def test_subtract_positive_integers(self):"));
}

#[test]
fn test_sibling_packages_are_all_written() {
    let dir = create_project(&[
        ("alpha/__init__.py", ""),
        ("alpha/core.py", "def multiply(a, b):\n    return a * b\n"),
        ("beta/__init__.py", ""),
        ("beta/io.py", "def process_file(path):\n    return path\n"),
    ]);
    let out = TempDir::new().unwrap();
    let report = synthesize_directory(dir.path(), &SynthConfig::default()).unwrap();

    let written = write_report(&report, out.path()).unwrap();
    assert!(written.skipped.is_empty());
    assert_eq!(written.paths.len(), 4);
    for file in ["test_alpha.py", "test_core.py", "test_beta.py", "test_io.py"] {
        assert!(out.path().join(file).exists(), "{file} was not written");
    }
}

#[test]
fn test_sequential_and_parallel_batches_agree() {
    let dir = create_project(&[
        ("a.py", "def add(a, b):\n    return a + b\n"),
        ("b.py", "def divide(a, b):\n    return a / b\n"),
        ("c.py", "class OrderService:\n    def create_order(self):\n        pass\n"),
        ("d.py", "def broken(:\n"),
        ("e.py", "def calculate_area(w, h):\n    return w * h\n"),
    ]);
    let units = collect_source_units(dir.path(), &SynthConfig::default()).unwrap();

    let parallel = synthesize_batch(&units, &SynthConfig::default());
    let sequential = synthesize_batch(
        &units,
        &SynthConfig {
            parallel: ParallelConfig::sequential(),
            ..SynthConfig::default()
        },
    );

    assert_eq!(parallel, sequential);
    assert_eq!(parallel.to_json().unwrap(), sequential.to_json().unwrap());
}

#[test]
fn test_config_file_drives_discovery_and_classification() {
    let dir = create_project(&[
        (
            ".testsynth.toml",
            r#"
            [ignore]
            patterns = ["vendor/*"]

            [classifier]
            threshold = 0.9
            "#,
        ),
        ("vendor/lib.py", "def add(a, b):\n    return a + b\n"),
        ("ops.py", "def add(a, b):\n    return a + b\n"),
    ]);

    let config = load_config_from_dir(dir.path());
    assert_eq!(config.ignore.patterns, vec!["vendor/*"]);

    let report = synthesize_directory(dir.path(), &config).unwrap();
    assert_eq!(report.summary.units, 1);

    // add(a, b) scores below 0.9 without a qualifier or guard
    let module = report.modules().next().unwrap();
    assert_eq!(module.tests.len(), 1);
    assert!(module.render().contains("assert callable(add)"));
}

#[test]
fn test_missing_root_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(synthesize_directory(&missing, &SynthConfig::default()).is_err());
}
