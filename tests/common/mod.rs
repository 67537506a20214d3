#![allow(dead_code)]

use dotnet_sdkgen::{generate_sdk_from_spec, GenerateOptions, GenerationReport, GeneratorConfig};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Absolute path of a file under `tests/fixtures/`.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Generate `fixture_name` into `output` with the given namespace.
pub fn generate(fixture_name: &str, output: &Path, namespace: &str, dry_run: bool) -> GenerationReport {
    let config = GeneratorConfig::new(output, namespace);
    generate_sdk_from_spec(&fixture(fixture_name), &config, GenerateOptions { dry_run })
        .expect("generation succeeds")
}

/// Every file under `root`, keyed by its `/`-separated relative path.
pub fn read_tree(root: &Path) -> BTreeMap<String, String> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            (relative, fs::read_to_string(e.path()).unwrap())
        })
        .collect()
}
